use std::error;
use std::fmt;

use nalgebra::Point3;

use crate::config::WrapConfig;
use crate::input::{Action, PoseBinding};
use crate::pose::{Axis, PoseMode};
use crate::raycast::Ray;
use crate::sheet::WrapSheet;
use crate::solid::TargetSolid;

/// The engine can't operate because a scene part isn't attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapError {
    SolidMissing,
    SheetMissing,
}

impl error::Error for WrapError {}

impl fmt::Display for WrapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WrapError::SolidMissing => write!(f, "No target solid is attached."),
            WrapError::SheetMissing => write!(f, "No wrap sheet is attached."),
        }
    }
}

/// Outcome of a single wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WrapReport {
    /// Sum of hits over all vertex rays. Diagnostic only.
    pub collisions: usize,
    pub hit_vertices: usize,
    pub missed_vertices: usize,
}

/// Constants driving the wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapParams {
    /// Depth every vertex ray starts from.
    pub standoff: f32,
    /// Offset added to the depth of the nearest hit.
    pub clearance: f32,
}

/// Projects the sheet onto the solid.
///
/// For each vertex, in index order, a ray is cast from the vertex moved to
/// the standoff depth towards the solid's position. On a hit the vertex depth
/// becomes the depth of the nearest hit plus clearance, otherwise the vertex
/// stays at the standoff depth. All depths are recomputed on every call, so
/// wrapping an unchanged scene twice gives the same result.
///
/// Vertices are read in sheet-local space, the solid's position in world
/// space.
pub fn wrap_sheet(solid: &TargetSolid, sheet: &mut WrapSheet, params: &WrapParams) -> WrapReport {
    let mut report = WrapReport::default();
    let target = *solid.position();

    for index in 0..sheet.vertex_count() {
        let vertex = sheet.vertex(index);
        let origin = Point3::new(vertex.x, vertex.y, params.standoff);
        let depth = match cast_towards(solid, origin, &target) {
            Some((collisions, hit_depth)) => {
                report.collisions += collisions;
                report.hit_vertices += 1;
                hit_depth + params.clearance
            }
            None => {
                report.missed_vertices += 1;
                params.standoff
            }
        };

        sheet.set_vertex_depth(index, depth);
    }

    sheet.mark_dirty();

    report
}

/// Casts a ray from `origin` to `target`, returning the hit count and the
/// depth of the nearest hit.
fn cast_towards(
    solid: &TargetSolid,
    origin: Point3<f32>,
    target: &Point3<f32>,
) -> Option<(usize, f32)> {
    // A vertex right at the target has no direction to cast in.
    if origin == *target {
        return None;
    }

    let ray = Ray::towards(origin, target);
    let hits = solid.intersect_ray(&ray);

    hits.first().map(|nearest| (hits.len(), nearest.point.z))
}

/// Owns the scene parts and the constants of one scene variant, and runs
/// wraps and pose adjustments on them.
#[derive(Debug, Clone)]
pub struct WrapEngine {
    params: WrapParams,
    pose_binding: PoseBinding,
    solid: Option<TargetSolid>,
    sheet: Option<WrapSheet>,
}

impl WrapEngine {
    /// Creates an engine with nothing attached.
    pub fn new(params: WrapParams, pose_binding: PoseBinding) -> Self {
        WrapEngine {
            params,
            pose_binding,
            solid: None,
            sheet: None,
        }
    }

    /// Creates an engine with the solid and sheet described by `config`
    /// attached.
    pub fn from_config(config: &WrapConfig) -> Self {
        let mut engine = WrapEngine::new(
            WrapParams {
                standoff: config.standoff,
                clearance: config.clearance,
            },
            config.pose,
        );
        engine.attach_solid(config.solid.build());
        engine.attach_sheet(WrapSheet::new(config.sheet));

        engine
    }

    pub fn params(&self) -> &WrapParams {
        &self.params
    }

    pub fn pose_binding(&self) -> &PoseBinding {
        &self.pose_binding
    }

    pub fn attach_solid(&mut self, solid: TargetSolid) -> Option<TargetSolid> {
        self.solid.replace(solid)
    }

    pub fn attach_sheet(&mut self, sheet: WrapSheet) -> Option<WrapSheet> {
        self.sheet.replace(sheet)
    }

    pub fn detach_solid(&mut self) -> Option<TargetSolid> {
        self.solid.take()
    }

    pub fn detach_sheet(&mut self) -> Option<WrapSheet> {
        self.sheet.take()
    }

    pub fn solid(&self) -> Option<&TargetSolid> {
        self.solid.as_ref()
    }

    pub fn solid_mut(&mut self) -> Option<&mut TargetSolid> {
        self.solid.as_mut()
    }

    pub fn sheet(&self) -> Option<&WrapSheet> {
        self.sheet.as_ref()
    }

    pub fn sheet_mut(&mut self) -> Option<&mut WrapSheet> {
        self.sheet.as_mut()
    }

    /// Wraps the sheet onto the solid.
    ///
    /// Fails without touching anything if either part is missing.
    pub fn wrap(&mut self) -> Result<WrapReport, WrapError> {
        let solid = self.solid.as_ref().ok_or(WrapError::SolidMissing)?;
        let sheet = self.sheet.as_mut().ok_or(WrapError::SheetMissing)?;

        let report = wrap_sheet(solid, sheet, &self.params);

        log::info!("Number of collisions: {}", report.collisions);
        log::debug!(
            "Wrapped {} vertices onto {}: {} hit, {} missed",
            sheet.vertex_count(),
            solid.shape().name(),
            report.hit_vertices,
            report.missed_vertices,
        );

        Ok(report)
    }

    /// Adjusts one component of the sheet pose by `delta`.
    ///
    /// Like `wrap`, fails without touching anything if either part is
    /// missing.
    pub fn adjust_pose(&mut self, mode: PoseMode, axis: Axis, delta: f32) -> Result<(), WrapError> {
        self.solid.as_ref().ok_or(WrapError::SolidMissing)?;
        let sheet = self.sheet.as_mut().ok_or(WrapError::SheetMissing)?;
        sheet.pose_mut().adjust(mode, axis, delta);

        log::debug!(
            "Sheet {} {} is now {}",
            mode,
            axis,
            sheet.pose().component(mode, axis),
        );

        Ok(())
    }

    /// Runs an action, returning the wrap report if the action was a wrap.
    pub fn handle_action(&mut self, action: Action) -> Result<Option<WrapReport>, WrapError> {
        match action {
            Action::AdjustPose { mode, axis, delta } => {
                self.adjust_pose(mode, axis, delta)?;
                Ok(None)
            }
            Action::Wrap => self.wrap().map(Some),
            Action::Ignore => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::raycast::FaceSide;
    use crate::sheet::SheetDimensions;
    use crate::solid::{IntersectionMode, Shape};

    use super::*;

    fn sphere_engine() -> WrapEngine {
        WrapEngine::from_config(&WrapConfig::sphere())
    }

    fn sheet_depths(engine: &WrapEngine) -> Vec<f32> {
        engine
            .sheet()
            .expect("Sheet should be attached")
            .vertices()
            .iter()
            .map(|v| v.z)
            .collect()
    }

    #[test]
    fn test_wrap_sphere_depths_match_projection_towards_center() {
        let mut engine = sphere_engine();

        let report = engine.wrap().expect("Wrap should succeed");

        // Rays aimed at the center of a sphere always hit it first at
        // distance |origin| - radius.
        let sheet = engine.sheet().expect("Sheet should be attached");
        for vertex in sheet.vertices() {
            let origin = Point3::new(vertex.x, vertex.y, 3.0);
            let expected_depth = 3.0 * 2.0 / origin.coords.norm() + 0.01;
            assert!(
                approx::relative_eq!(vertex.z, expected_depth, epsilon = 0.0001),
                "{} != {}",
                vertex.z,
                expected_depth,
            );
        }
        assert_eq!(report.hit_vertices, 121);
        assert_eq!(report.missed_vertices, 0);
        assert_eq!(report.collisions, 121);
    }

    #[test]
    fn test_wrap_sphere_center_vertex() {
        let mut engine = sphere_engine();

        engine.wrap().expect("Wrap should succeed");

        // The 10x10 grid has its 61st vertex in the middle
        let center = engine.sheet().expect("Sheet should be attached").vertex(60);
        assert_eq!(center.x, 0.0);
        assert_eq!(center.y, 0.0);
        assert!(approx::relative_eq!(center.z, 2.01, epsilon = 0.0001));
    }

    #[test]
    fn test_wrap_double_sided_counts_entry_and_exit() {
        let mut config = WrapConfig::sphere();
        config.solid.side = FaceSide::Double;
        let mut engine = WrapEngine::from_config(&config);

        let report = engine.wrap().expect("Wrap should succeed");

        assert_eq!(report.collisions, 2 * 121);
        assert_eq!(report.hit_vertices, 121);
    }

    #[test]
    fn test_wrap_misses_snap_to_standoff() {
        // Ray origins inside the sphere only see back faces, which the
        // front side culls.
        let mut config = WrapConfig::sphere();
        config.standoff = 1.0;
        let mut engine = WrapEngine::from_config(&config);

        let report = engine.wrap().expect("Wrap should succeed");

        assert!(sheet_depths(&engine).iter().all(|&depth| depth == 1.0));
        assert_eq!(report.collisions, 0);
        assert_eq!(report.missed_vertices, 121);
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let mut engine = WrapEngine::from_config(&WrapConfig::cylinder());

        let first_report = engine.wrap().expect("Wrap should succeed");
        let first_depths = sheet_depths(&engine);
        let second_report = engine.wrap().expect("Wrap should succeed");
        let second_depths = sheet_depths(&engine);

        assert_eq!(first_report, second_report);
        assert_eq!(first_depths, second_depths);
    }

    #[test]
    fn test_wrap_marks_sheet_dirty() {
        let mut engine = sphere_engine();

        engine.wrap().expect("Wrap should succeed");

        assert!(engine.sheet_mut().expect("Sheet should be attached").take_dirty());
    }

    #[test]
    fn test_wrap_cylinder_depths_follow_solid_hits() {
        let config = WrapConfig::cylinder();
        let mut engine = WrapEngine::from_config(&config);

        engine.wrap().expect("Wrap should succeed");

        let solid = engine.solid().expect("Solid should be attached");
        let sheet = engine.sheet().expect("Sheet should be attached");
        for vertex in sheet.vertices() {
            let origin = Point3::new(vertex.x, vertex.y, 1.0);
            let hits = solid.intersect_ray(&Ray::towards(origin, solid.position()));
            let expected_depth = match hits.first() {
                Some(hit) => hit.point.z + 0.01,
                None => 1.0,
            };
            assert_eq!(vertex.z, expected_depth);
        }
    }

    #[test]
    fn test_wrap_keeps_topology() {
        let mut engine = sphere_engine();
        let sheet = engine.sheet().expect("Sheet should be attached");
        let faces_before = sheet.mesh().faces().to_vec();
        let adjacency_before = sheet.mesh().adjacency();

        for _ in 0..3 {
            engine.wrap().expect("Wrap should succeed");
            engine
                .adjust_pose(PoseMode::Rotation, Axis::X, 0.05)
                .expect("Pose adjustment should succeed");
        }

        let sheet = engine.sheet().expect("Sheet should be attached");
        assert_eq!(sheet.vertex_count(), 121);
        assert_eq!(sheet.mesh().faces(), faces_before.as_slice());
        assert_eq!(sheet.mesh().adjacency(), adjacency_before);
    }

    #[test]
    fn test_wrap_follows_moved_solid() {
        let mut engine = sphere_engine();
        engine
            .solid_mut()
            .expect("Solid should be attached")
            .set_position(Point3::new(0.0, 0.0, -0.5));

        engine.wrap().expect("Wrap should succeed");

        let center = engine.sheet().expect("Sheet should be attached").vertex(60);
        assert!(approx::relative_eq!(center.z, 1.51, epsilon = 0.0001));
    }

    #[test]
    fn test_wrap_without_solid_fails_and_keeps_sheet() {
        let mut engine = sphere_engine();
        engine.detach_solid();

        assert_eq!(engine.wrap(), Err(WrapError::SolidMissing));
        let sheet = engine.sheet().expect("Sheet should be attached");
        assert!(sheet.vertices().iter().all(|v| v.z == 0.0));
        assert!(!sheet.is_dirty());
    }

    #[test]
    fn test_wrap_without_sheet_fails() {
        let mut engine = sphere_engine();
        engine.detach_sheet();

        assert_eq!(engine.wrap(), Err(WrapError::SheetMissing));
    }

    #[test]
    fn test_adjust_pose_without_solid_fails_and_keeps_pose() {
        let mut engine = sphere_engine();
        engine.detach_solid();

        assert_eq!(
            engine.adjust_pose(PoseMode::Rotation, Axis::X, -0.05),
            Err(WrapError::SolidMissing)
        );
        let sheet = engine.sheet().expect("Sheet should be attached");
        assert_eq!(sheet.pose().rotation().x, 0.0);
    }

    #[test]
    fn test_adjust_pose_without_sheet_fails() {
        let mut engine = WrapEngine::new(
            WrapParams {
                standoff: 3.0,
                clearance: 0.01,
            },
            WrapConfig::sphere().pose,
        );
        engine.attach_solid(TargetSolid::new(
            Shape::Sphere {
                radius: 2.0,
                width_segments: 32,
                height_segments: 32,
            },
            Point3::origin(),
            FaceSide::Front,
            IntersectionMode::Analytic,
        ));

        assert_eq!(
            engine.adjust_pose(PoseMode::Rotation, Axis::X, 0.05),
            Err(WrapError::SheetMissing)
        );
    }

    #[test]
    fn test_increase_then_decrease_restores_pose() {
        let mut engine = WrapEngine::from_config(&WrapConfig::cylinder());
        let pose_before = *engine.sheet().expect("Sheet should be attached").pose();

        engine
            .handle_action(Action::AdjustPose {
                mode: PoseMode::Translation,
                axis: Axis::Y,
                delta: 0.05,
            })
            .expect("Pose adjustment should succeed");
        engine
            .handle_action(Action::AdjustPose {
                mode: PoseMode::Translation,
                axis: Axis::Y,
                delta: -0.05,
            })
            .expect("Pose adjustment should succeed");

        let pose_after = *engine.sheet().expect("Sheet should be attached").pose();
        assert!(approx::relative_eq!(
            pose_after.translation().y,
            pose_before.translation().y
        ));
    }

    #[test]
    fn test_handle_action_wrap_returns_report() {
        let mut engine = sphere_engine();

        let report = engine
            .handle_action(Action::Wrap)
            .expect("Wrap should succeed");

        assert_eq!(report.map(|r| r.hit_vertices), Some(121));
        assert_eq!(engine.handle_action(Action::Ignore), Ok(None));
    }

    #[test]
    fn test_wrap_sheet_with_custom_dimensions() {
        let solid = TargetSolid::new(
            Shape::Sphere {
                radius: 1.0,
                width_segments: 16,
                height_segments: 16,
            },
            Point3::origin(),
            FaceSide::Front,
            IntersectionMode::Analytic,
        );
        let mut sheet = WrapSheet::new(SheetDimensions {
            width: 4.0,
            height: 2.0,
            width_segments: 4,
            height_segments: 2,
        });

        let report = wrap_sheet(
            &solid,
            &mut sheet,
            &WrapParams {
                standoff: 2.0,
                clearance: 0.0,
            },
        );

        assert_eq!(sheet.vertex_count(), 15);
        assert_eq!(report.hit_vertices, 15);
        for vertex in sheet.vertices() {
            let origin = Point3::new(vertex.x, vertex.y, 2.0);
            let expected_depth = 2.0 / origin.coords.norm();
            assert!(approx::relative_eq!(vertex.z, expected_depth, epsilon = 0.0001));
        }
    }
}
