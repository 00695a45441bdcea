use std::ops::Mul;

use glam::{Quat, Vec3};

/// A dual quaternion: `real + ε · dual`.
///
/// Unit dual quaternions encode a rigid transform (rotation plus
/// translation) in eight floats, compose by multiplication, and blend
/// without the artifacts of matrix interpolation. The vertex shaders
/// consume them directly in the palette layout produced by
/// [`Pose::palette`](super::Pose::palette).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DualQuat {
    pub real: Quat,
    pub dual: Quat,
}

impl DualQuat {
    pub(crate) const IDENTITY: Self = Self {
        real: Quat::IDENTITY,
        dual: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
    };

    pub(crate) const fn new(real: Quat, dual: Quat) -> Self {
        Self { real, dual }
    }

    pub(crate) const fn from_rotation(rotation: Quat) -> Self {
        Self {
            real: rotation,
            dual: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
        }
    }

    pub(crate) fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Self::from_rotation(Quat::from_axis_angle(axis.normalize(), angle))
    }

    pub(crate) fn from_translation(translation: Vec3) -> Self {
        Self {
            real: Quat::IDENTITY,
            dual: Quat::from_xyzw(
                translation.x / 2.0,
                translation.y / 2.0,
                translation.z / 2.0,
                0.0,
            ),
        }
    }

    pub(crate) fn conjugate(self) -> Self {
        Self {
            real: self.real.conjugate(),
            dual: self.dual.conjugate(),
        }
    }

    /// Magnitude of the real part. 1 for a normalized transform.
    pub(crate) fn magnitude(self) -> f32 {
        self.real.length()
    }

    /// Rescales so the real part has unit norm and the dual part is
    /// orthogonal to it (removes numeric drift after long products).
    pub(crate) fn normalize(self) -> Self {
        let inv_len = 1.0 / self.real.length();
        let real = self.real * inv_len;
        let dual = self.dual * inv_len;
        Self {
            real,
            dual: dual - real * real.dot(dual),
        }
    }

    /// Exact reciprocal: `conjugate / |q|²` with the dual-number norm,
    /// so it holds for non-unit dual quaternions too.
    pub(crate) fn inverse(self) -> Self {
        let a = self.real.length_squared();
        let b = 2.0 * self.real.dot(self.dual);
        let real_conj = self.real.conjugate();
        let dual_conj = self.dual.conjugate();
        Self {
            real: real_conj / a,
            dual: (dual_conj * a - real_conj * b) / (a * a),
        }
    }

    /// The translation component of this transform.
    pub(crate) fn translation(self) -> Vec3 {
        (self.dual * self.real.conjugate()).xyz() * 2.0
    }

    /// Applies this transform to a point.
    ///
    /// Matches the skinning formula in the vertex shaders:
    /// `p' = rot(r, p) + 2 (r_w d_v − d_w r_v + r_v × d_v)`.
    pub(crate) fn transform_point(self, point: Vec3) -> Vec3 {
        let dq = self.normalize();
        let r = dq.real;
        let d = dq.dual;
        let translation = 2.0 * (r.w * d.xyz() - d.w * r.xyz() + r.xyz().cross(d.xyz()));
        r * point + translation
    }

    /// Normalized linear blend between two transforms.
    ///
    /// Takes the short way around when the rotations sit on opposite
    /// hemispheres.
    pub(crate) fn nlerp(self, mut other: Self, t: f32) -> Self {
        if self.real.dot(other.real) < 0.0 {
            other = Self {
                real: -other.real,
                dual: -other.dual,
            };
        }
        let u = 1.0 - t;
        Self {
            real: self.real * u + other.real * t,
            dual: self.dual * u + other.dual * t,
        }
        .normalize()
    }
}

impl Default for DualQuat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for DualQuat {
    type Output = Self;

    /// Composition; `(a * b).transform_point(p)` applies `b` first.
    fn mul(self, rhs: Self) -> Self {
        Self {
            real: self.real * rhs.real,
            dual: self.real * rhs.dual + self.dual * rhs.real,
        }
    }
}
