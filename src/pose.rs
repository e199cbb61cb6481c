use std::fmt;

use nalgebra::{Isometry3, Rotation3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Which part of the pose directional input adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoseMode {
    /// Rotation around an axis, in radians.
    Rotation,
    /// Translation along an axis, in scene units.
    Translation,
}

impl fmt::Display for PoseMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PoseMode::Rotation => write!(f, "rotation"),
            PoseMode::Translation => write!(f, "translation"),
        }
    }
}

/// Position and orientation of the sheet in the world.
///
/// The orientation is stored as Euler angles applied in XYZ order, the
/// position as a translation offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    rotation: Vector3<f32>,
    translation: Vector3<f32>,
}

impl Pose {
    pub fn identity() -> Self {
        Pose::default()
    }

    pub fn rotation(&self) -> &Vector3<f32> {
        &self.rotation
    }

    pub fn translation(&self) -> &Vector3<f32> {
        &self.translation
    }

    pub fn rotate(&mut self, axis: Axis, delta: f32) {
        self.rotation[axis.index()] += delta;
    }

    pub fn translate(&mut self, axis: Axis, delta: f32) {
        self.translation[axis.index()] += delta;
    }

    /// Adjusts the component of the pose selected by `mode`.
    pub fn adjust(&mut self, mode: PoseMode, axis: Axis, delta: f32) {
        match mode {
            PoseMode::Rotation => self.rotate(axis, delta),
            PoseMode::Translation => self.translate(axis, delta),
        }
    }

    /// Current value of the component of the pose selected by `mode`.
    pub fn component(&self, mode: PoseMode, axis: Axis) -> f32 {
        match mode {
            PoseMode::Rotation => self.rotation[axis.index()],
            PoseMode::Translation => self.translation[axis.index()],
        }
    }

    /// The transform from sheet-local into world space.
    pub fn to_isometry(&self) -> Isometry3<f32> {
        let rotation = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z);

        Isometry3::from_parts(
            Translation3::from(self.translation),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use nalgebra::Point3;

    use super::*;

    #[test]
    fn test_pose_rotate_and_back_restores_angle() {
        let mut pose = Pose::identity();
        pose.rotate(Axis::X, 0.3);

        pose.rotate(Axis::X, -0.05);
        pose.rotate(Axis::X, 0.05);

        assert!(approx::relative_eq!(pose.rotation().x, 0.3));
        assert_eq!(pose.rotation().y, 0.0);
        assert_eq!(pose.rotation().z, 0.0);
    }

    #[test]
    fn test_pose_translate_touches_only_translation() {
        let mut pose = Pose::identity();

        pose.translate(Axis::Y, 0.05);
        pose.translate(Axis::Y, 0.05);

        assert!(approx::relative_eq!(pose.translation().y, 0.1));
        assert_eq!(pose.rotation(), &Vector3::zeros());
    }

    #[test]
    fn test_pose_adjust_dispatches_on_mode() {
        let mut pose = Pose::identity();

        pose.adjust(PoseMode::Rotation, Axis::Z, 0.05);
        pose.adjust(PoseMode::Translation, Axis::X, -0.05);

        assert_eq!(pose.component(PoseMode::Rotation, Axis::Z), 0.05);
        assert_eq!(pose.component(PoseMode::Translation, Axis::X), -0.05);
        assert_eq!(pose.component(PoseMode::Rotation, Axis::X), 0.0);
    }

    #[test]
    fn test_pose_identity_isometry() {
        let isometry = Pose::identity().to_isometry();
        let point = Point3::new(0.5, -0.5, 0.0);

        assert!(approx::relative_eq!(isometry * point, point));
    }

    #[test]
    fn test_pose_isometry_rotates_then_translates() {
        let mut pose = Pose::identity();
        pose.rotate(Axis::X, FRAC_PI_2);
        pose.translate(Axis::Z, 1.0);

        let transformed = pose.to_isometry() * Point3::new(0.0, 1.0, 0.0);

        assert!(approx::relative_eq!(
            transformed,
            Point3::new(0.0, 0.0, 2.0),
            epsilon = 0.0001
        ));
    }

    #[test]
    fn test_pose_isometry_euler_order_xyz() {
        let mut pose = Pose::identity();
        pose.rotate(Axis::X, FRAC_PI_2);
        pose.rotate(Axis::Z, FRAC_PI_2);

        // Z is applied first: X -> Y, then X rotates Y -> Z
        let transformed = pose.to_isometry() * Point3::new(1.0, 0.0, 0.0);

        assert!(approx::relative_eq!(
            transformed,
            Point3::new(0.0, 0.0, 1.0),
            epsilon = 0.0001
        ));
    }
}
