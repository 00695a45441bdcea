use std::f32::consts::TAU;

use glam::Vec3;

use super::XorShift32;

/// Floats per vertex: position (3), normal (3), color (3), texcoord (2).
pub(crate) const VERTEX_FLOATS: usize = 11;

/// Byte stride of one interleaved vertex.
pub(crate) const VERTEX_STRIDE: i32 = (VERTEX_FLOATS * 4) as i32;

/// Polar-angle jitter applied to tile corners, in radians.
const THETA_JITTER: f32 = 0.0025;

/// Scale factor that tucks the occluder sphere just inside the tiles.
const OCCLUDER_SCALE: f32 = 0.99;

/// An interleaved triangle-soup vertex buffer.
pub(crate) struct Mesh {
    pub data: Vec<f32>,
}

impl Mesh {
    pub(crate) fn vertex_count(&self) -> i32 {
        (self.data.len() / VERTEX_FLOATS) as i32
    }
}

/// Procedural mirror-ball geometry.
///
/// The ball is built from `bands / 2` latitude rows of square-ish mirror
/// tiles. Rows nearer the poles hold fewer tiles so every tile stays close
/// to the same physical size. Tile corners are jittered slightly and each
/// tile picks one facet normal at random from the directions suggested by
/// its corners, which is what breaks the reflections up into sparkles.
pub(crate) struct Ball {
    radius: f32,
    bands: u32,
    tint: [f32; 3],
}

impl Ball {
    pub(crate) fn new(radius: f32, bands: u32, tint: [f32; 3]) -> Self {
        Self {
            // degenerate inputs would produce an empty or inside-out ball
            radius: radius.max(f32::EPSILON),
            bands: bands.max(8),
            tint,
        }
    }

    pub(crate) fn bands(&self) -> u32 {
        self.bands
    }

    fn point(&self, theta: f32, phi: f32) -> Vec3 {
        Vec3::new(
            self.radius * theta.sin() * phi.sin(),
            self.radius * theta.cos(),
            self.radius * theta.sin() * phi.cos(),
        )
    }

    /// Builds the mirror tiles.
    pub(crate) fn build_tiles(&self, rng: &mut XorShift32) -> Mesh {
        let n = self.bands as f32;
        let mut data = Vec::new();
        for i in 0..self.bands / 2 {
            let shift = rng.next_f32();
            let theta0 = i as f32 * TAU / n;
            let theta1 = (i + 1) as f32 * TAU / n;
            let theta = (theta0 + theta1) / 2.0;
            let phi_jitter = THETA_JITTER / theta.sin();
            // tile count shrinks with the row's circumference
            let m = (theta.sin() * n).floor().max(1.0) as u32;
            for j in 0..m {
                let phi0 = j as f32 * TAU / m as f32 + shift;
                let phi1 = (j + 1) as f32 * TAU / m as f32 + shift;
                let v0 = self.point(
                    theta0 + THETA_JITTER * rng.next_f32(),
                    phi0 + phi_jitter * rng.next_f32(),
                );
                let v1 = self.point(
                    theta0 + THETA_JITTER * rng.next_f32(),
                    phi1 - phi_jitter * rng.next_f32(),
                );
                let v2 = self.point(
                    theta1 - THETA_JITTER * rng.next_f32(),
                    phi1 - phi_jitter * rng.next_f32(),
                );
                let v3 = self.point(
                    theta1 - THETA_JITTER * rng.next_f32(),
                    phi0 + phi_jitter * rng.next_f32(),
                );
                let candidates = [
                    v0,
                    v1,
                    v2,
                    v3,
                    v0 + v1,
                    v1 + v2,
                    v2 + v3,
                    v3 + v0,
                    v0 + v1 + v2 + v3,
                ];
                let normal = candidates[rng.below(candidates.len() as u32) as usize].normalize();
                let t0 = [0.15, 0.15];
                let t1 = [0.15, 0.85];
                let t2 = [0.85, 0.85];
                let t3 = [0.85, 0.15];
                for (v, t) in [(v0, t0), (v2, t2), (v1, t1), (v0, t0), (v3, t3), (v2, t2)] {
                    push_vertex(&mut data, v, normal, self.tint, t);
                }
            }
        }
        Mesh { data }
    }

    /// Builds the dark inner sphere that fills the gaps between tiles.
    pub(crate) fn build_occluder(&self) -> Mesh {
        let n = self.bands as f32;
        let black = [0.0, 0.0, 0.0];
        let uv = [0.0, 0.0];
        let mut data = Vec::new();
        for i in 0..self.bands / 2 {
            let theta0 = i as f32 * TAU / n;
            let theta1 = (i + 1) as f32 * TAU / n;
            for j in 0..self.bands {
                let phi0 = j as f32 * TAU / n;
                let phi1 = (j + 1) as f32 * TAU / n;
                let corners = [
                    self.point(theta0, phi0),
                    self.point(theta0, phi1),
                    self.point(theta1, phi1),
                    self.point(theta1, phi0),
                ];
                let [v0, v1, v2, v3] = corners.map(|v| v * OCCLUDER_SCALE);
                let [n0, n1, n2, n3] = corners.map(|v| v.normalize());
                for (v, normal) in [(v0, n0), (v2, n2), (v1, n1), (v0, n0), (v3, n3), (v2, n2)] {
                    push_vertex(&mut data, v, normal, black, uv);
                }
            }
        }
        Mesh { data }
    }
}

fn push_vertex(data: &mut Vec<f32>, position: Vec3, normal: Vec3, color: [f32; 3], uv: [f32; 2]) {
    data.extend_from_slice(&[
        position.x, position.y, position.z, normal.x, normal.y, normal.z, color[0], color[1],
        color[2], uv[0], uv[1],
    ]);
}
