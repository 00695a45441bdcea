pub(crate) mod ball;
pub(crate) mod camera;
pub(crate) mod env;
#[cfg(target_family = "wasm")]
pub(crate) mod program;
#[cfg(target_family = "wasm")]
pub(crate) mod renderer;
pub(crate) mod shaders;
#[cfg(target_family = "wasm")]
pub(crate) mod texture;

/// Tiny xorshift generator for geometry jitter and texture scatter.
///
/// The output never has to be cryptographic or even well distributed; it
/// only has to be cheap, deterministic for a given seed, and available on
/// wasm without pulling in an RNG crate.
pub(crate) struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub(crate) fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Uniform-ish float in `[0, 1)`.
    pub(crate) fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform-ish integer in `[0, bound)`.
    pub(crate) fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound.max(1)
    }
}

/// Column-major off-axis perspective matrix, OpenGL clip conventions.
pub(crate) fn frustum(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> [f32; 16] {
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -(2.0 * far * near) / (far - near);
    [
        2.0 * near / (right - left),
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 * near / (top - bottom),
        0.0,
        0.0,
        a,
        b,
        c,
        -1.0,
        0.0,
        0.0,
        d,
        0.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec4};

    #[test]
    fn xorshift_is_deterministic_and_in_range() {
        let mut a = XorShift32::new(12345);
        let mut b = XorShift32::new(12345);
        for _ in 0..1000 {
            let x = a.next_f32();
            assert_eq!(x, b.next_f32());
            assert!((0.0..1.0).contains(&x));
        }
        for _ in 0..1000 {
            assert!(a.below(9) < 9);
        }
    }

    #[test]
    fn xorshift_rejects_zero_seed() {
        // state 0 is a fixed point of xorshift
        let mut rng = XorShift32::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn frustum_maps_near_and_far_planes_to_clip_bounds() {
        let m = Mat4::from_cols_array(&frustum(-0.1, 0.1, -0.1, 0.1, 0.1, 300.0));

        let near = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((near.z / near.w - -1.0).abs() < 1e-5);

        let far = m * Vec4::new(0.0, 0.0, -300.0, 1.0);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn frustum_corner_hits_clip_edge() {
        let m = Mat4::from_cols_array(&frustum(-0.2, 0.2, -0.1, 0.1, 0.1, 300.0));
        let corner = m * Vec4::new(0.2, 0.1, -0.1, 1.0);
        assert!((corner.x / corner.w - 1.0).abs() < 1e-5);
        assert!((corner.y / corner.w - 1.0).abs() < 1e-5);
    }
}
