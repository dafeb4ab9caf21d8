use glam::{Vec2, Vec3};

use crate::types::Vertex;

const FACE_NORMALS: [Vec3; 6] = [
    Vec3::Z,
    Vec3::NEG_Z,
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
];

const FACE_UVS: [Vec2; 4] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
];

/// Indexed triangle list ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Axis-aligned box centred on the origin, four vertices per face.
    ///
    /// With `inverted` the normals face into the box and triangles are
    /// front-facing (counter-clockwise) from the inside, which is what a
    /// room needs. Otherwise it is an ordinary outward box.
    pub fn cuboid(size: Vec3, inverted: bool) -> Self {
        let half = size / 2.0;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for normal in FACE_NORMALS {
            let side1 = Vec3::new(normal.y, normal.z, normal.x);
            let side2 = normal.cross(side1);
            let corners = [
                normal - side1 - side2,
                normal - side1 + side2,
                normal + side1 + side2,
                normal + side1 - side2,
            ];

            let base = vertices.len() as u16;
            // Corner order winds counter-clockwise seen from inside
            if inverted {
                indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            } else {
                indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
            }

            let face_normal = if inverted { -normal } else { normal };
            for (corner, uv) in corners.iter().zip(FACE_UVS) {
                let uv = if inverted { Vec2::new(1.0 - uv.x, uv.y) } else { uv };
                vertices.push(Vertex {
                    position: (*corner * half).to_array(),
                    normal: face_normal.to_array(),
                    uv: uv.to_array(),
                });
            }
        }

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_counts() {
        let mesh = Mesh::cuboid(Vec3::ONE, true);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn inverted_normals_point_inward() {
        let mesh = Mesh::cuboid(Vec3::new(8.0, 6.0, 12.0), true);
        for v in &mesh.vertices {
            let position = Vec3::from_array(v.position);
            let normal = Vec3::from_array(v.normal);
            assert!(position.dot(normal) < 0.0);
        }
    }

    #[test]
    fn outward_normals_point_outward() {
        let mesh = Mesh::cuboid(Vec3::new(2.0, 2.0, 2.0), false);
        for v in &mesh.vertices {
            let position = Vec3::from_array(v.position);
            let normal = Vec3::from_array(v.normal);
            assert!(position.dot(normal) > 0.0);
        }
    }
}
