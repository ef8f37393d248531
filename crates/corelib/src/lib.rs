//! Core types: math re-exports, Transform, bone hierarchy and pose composition.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod error;
pub mod pose;
pub mod shared;
pub mod skeleton;
pub mod transform;
pub mod uniform;

pub use error::{HierarchyError, HierarchyResult};
pub use pose::Pose;
pub use skeleton::{BoneDefinition, BoneId, BoneNode, Skeleton};
pub use uniform::UniformSink;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translate_then_scale_matrix() {
        let t = transform::Transform::from_trs(
            vec3(1.0, 2.0, 3.0),
            Quat::IDENTITY,
            vec3(2.0, 2.0, 2.0),
        );
        // Last column holds translation, diagonal holds scale (no rotation).
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_quaternion_falls_back_to_identity_rotation() {
        let t = transform::Transform::from_trs(
            Vec3::ZERO,
            Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
            Vec3::ONE,
        );
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn from_matrix_round_trips_trs() {
        let t = transform::Transform::from_trs(
            vec3(0.5, -1.0, 2.0),
            Quat::from_rotation_y(0.7),
            vec3(1.0, 2.0, 1.0),
        );
        let back = transform::Transform::from_matrix(t.matrix());
        assert!(back.translation.abs_diff_eq(t.translation, 1e-5));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-5));
    }
}
