use super::DualQuat;

/// An ordered set of bone transforms, flattened into the uniform palette
/// the vertex shaders read.
///
/// The disco ball only ever needs single-bone poses (one for the camera,
/// one for the spinning ball), but the palette layout is the general one:
/// eight floats per bone.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Pose {
    bones: Vec<DualQuat>,
}

impl Pose {
    pub(crate) fn new(bones: Vec<DualQuat>) -> Self {
        Self { bones }
    }

    pub(crate) fn single(bone: DualQuat) -> Self {
        Self { bones: vec![bone] }
    }

    pub(crate) fn len(&self) -> usize {
        self.bones.len()
    }

    /// Per-bone normalized blend towards `that`.
    pub(crate) fn blend(&self, that: &Pose, t: f32) -> Pose {
        Pose {
            bones: self
                .bones
                .iter()
                .zip(&that.bones)
                .map(|(a, b)| a.nlerp(*b, t))
                .collect(),
        }
    }

    pub(crate) fn inverse(&self) -> Pose {
        Pose {
            bones: self.bones.iter().map(|bone| bone.inverse()).collect(),
        }
    }

    /// Bone-wise composition with `that`.
    pub(crate) fn compose(&self, that: &Pose) -> Pose {
        Pose {
            bones: self
                .bones
                .iter()
                .zip(&that.bones)
                .map(|(a, b)| *a * *b)
                .collect(),
        }
    }

    /// Flattens to `[real.x, real.y, real.z, real.w, dual.x, dual.y,
    /// dual.z, dual.w]` per bone, the layout of the `u_transform` and
    /// `u_camera` uniform arrays.
    pub(crate) fn palette(&self) -> Vec<f32> {
        let mut palette = Vec::with_capacity(self.bones.len() * 8);
        for bone in &self.bones {
            palette.extend_from_slice(&[
                bone.real.x,
                bone.real.y,
                bone.real.z,
                bone.real.w,
                bone.dual.x,
                bone.dual.y,
                bone.dual.z,
                bone.dual.w,
            ]);
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn palette_layout_is_real_then_dual() {
        let bone = DualQuat::from_translation(Vec3::new(2.0, 4.0, 6.0));
        let palette = Pose::single(bone).palette();
        // identity rotation, half the translation in the dual vector part
        assert_eq!(palette, vec![0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn palette_concatenates_bones_in_order() {
        let a = DualQuat::IDENTITY;
        let b = DualQuat::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let palette = Pose::new(vec![a, b]).palette();
        assert_eq!(palette.len(), 16);
        assert_eq!(&palette[0..4], &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&palette[12..16], &[0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn blend_endpoints_match_inputs() {
        let a = Pose::single(DualQuat::from_axis_angle(Vec3::Y, 0.4));
        let b = Pose::single(DualQuat::from_translation(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(a.blend(&b, 0.0).palette(), a.palette());
        let blended = a.blend(&b, 1.0);
        for (got, want) in blended.palette().iter().zip(b.palette()) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn compose_with_inverse_is_identity() {
        let pose = Pose::new(vec![
            DualQuat::from_rotation(Quat::from_axis_angle(Vec3::Z, 1.2)),
            DualQuat::from_translation(Vec3::new(-1.0, 3.0, 0.5)),
        ]);
        let identity = pose.compose(&pose.inverse());
        assert_eq!(identity.len(), 2);
        for (got, want) in identity
            .palette()
            .iter()
            .zip(Pose::new(vec![DualQuat::IDENTITY; 2]).palette())
        {
            assert!((got - want).abs() < 1e-5);
        }
    }
}
