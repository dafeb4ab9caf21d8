/// Fixed timestep accumulator - yields whole steps for deterministic updates
#[derive(Debug, Clone)]
pub struct Accumulator {
    timestep: f32,
    accumulator: f32,
    max_steps: u8,
}

impl Accumulator {
    /// Create accumulator with fixed timestep
    pub fn new(hz: f32, max_steps: u8) -> Self {
        Self {
            timestep: 1.0 / hz,
            accumulator: 0.0,
            max_steps,
        }
    }

    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Number of fixed steps owed after adding `delta`.
    /// Time beyond `max_steps` is discarded so a long stall can't spiral.
    pub fn tick(&mut self, delta: f32) -> u32 {
        self.accumulator += delta;

        let owed = (self.accumulator / self.timestep) as u32;
        let steps = owed.min(self.max_steps as u32);

        if owed > steps {
            self.accumulator = 0.0;
        } else {
            self.accumulator -= steps as f32 * self.timestep;
        }

        steps
    }

    /// Drop any partial step, e.g. after a resume
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// First fire happens once a full interval has passed
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Returns the time covered by this window when it fires
    pub fn try_tick(&mut self, delta: f32) -> Option<f32> {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            let window = self.time_since_last;
            self.time_since_last = 0.0;
            Some(window)
        } else {
            None
        }
    }
}

/// Frames-per-second over a sliding one-shot window
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window: Throttled,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            window: Throttled::new(interval),
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count a frame; returns the fresh FPS value when the window closes
    pub fn frame(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.window.try_tick(delta)?;
        self.fps = self.frames as f32 / elapsed;
        self.frames = 0;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
