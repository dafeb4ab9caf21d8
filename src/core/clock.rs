use std::time::Instant;

use super::timer::Accumulator;

/// Most fixed steps run in one tick before time is dropped
const MAX_FIXED_STEPS: u8 = 10;

/// Timing handed to each update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTime {
    /// Seconds covered by this update
    pub elapsed: f32,
    /// Seconds of game time so far, this update included
    pub total: f64,
    /// Updates run so far, this one included
    pub frame_count: u64,
}

/// Game clock: variable timestep by default, optionally fixed
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    fixed: Option<Accumulator>,
    total: f64,
    frame_count: u64,
}

impl Clock {
    /// Variable timestep clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            fixed: None,
            total: 0.0,
            frame_count: 0,
        }
    }

    /// Clock that runs updates at exactly `hz`
    pub fn fixed(hz: f32) -> Self {
        Self {
            fixed: Some(Accumulator::new(hz, MAX_FIXED_STEPS)),
            ..Self::new()
        }
    }

    /// Advance by wall-clock time since the previous tick; returns that time
    pub fn tick(&mut self, update: impl FnMut(StepTime)) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.advance(delta, update);
        delta
    }

    /// Advance by an explicit delta. Calls `update` once in variable mode
    /// and zero or more times in fixed mode.
    pub fn advance(&mut self, delta: f32, mut update: impl FnMut(StepTime)) {
        let fixed = self
            .fixed
            .as_mut()
            .map(|acc| (acc.timestep(), acc.tick(delta)));

        match fixed {
            None => self.step(delta, &mut update),
            Some((timestep, steps)) => {
                for _ in 0..steps {
                    self.step(timestep, &mut update);
                }
            }
        }
    }

    /// Forget the time spent suspended so the next delta starts from now
    pub fn reset_elapsed(&mut self) {
        self.last_tick = Instant::now();
        if let Some(acc) = &mut self.fixed {
            acc.reset();
        }
    }

    /// Number of updates run so far. Zero means nothing to render yet.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn step(&mut self, elapsed: f32, update: &mut impl FnMut(StepTime)) {
        self.total += elapsed as f64;
        self.frame_count += 1;
        update(StepTime {
            elapsed,
            total: self.total,
            frame_count: self.frame_count,
        });
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
