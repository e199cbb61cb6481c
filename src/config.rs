use std::error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::input::{InputSymbol, Key, KeyBinding, KeyBindings, PoseBinding};
use crate::pose::{Axis, PoseMode};
use crate::raycast::FaceSide;
use crate::sheet::SheetDimensions;
use crate::solid::{IntersectionMode, Shape, TargetSolid};

pub const DEFAULT_CLEARANCE: f32 = 0.01;
pub const DEFAULT_POSE_STEP: f32 = 0.05;

#[derive(Debug, Clone)]
pub enum ConfigError {
    DeserializingError(ron::de::Error),
    SerializingError(ron::error::Error),
    Invalid(&'static str),
    FileNotFound,
    PermissionDenied,
    UnexpectedError,
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::DeserializingError(err) => write!(
                f,
                "An error occurred while deserializing config file: {}",
                err
            ),
            ConfigError::SerializingError(err) => {
                write!(f, "An error occurred while serializing config: {}", err)
            }
            ConfigError::Invalid(reason) => write!(f, "Invalid config: {}.", reason),
            ConfigError::FileNotFound => write!(f, "File was not found."),
            ConfigError::PermissionDenied => {
                write!(f, "Permission denied while accessing the file.")
            }
            ConfigError::UnexpectedError => write!(f, "An unexpected error occurred."),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound,
            io::ErrorKind::PermissionDenied => ConfigError::PermissionDenied,
            _ => ConfigError::UnexpectedError,
        }
    }
}

/// The target solid as described in a config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidConfig {
    pub shape: Shape,
    pub position: Point3<f32>,
    pub side: FaceSide,
    pub intersection_mode: IntersectionMode,
}

impl SolidConfig {
    pub fn build(&self) -> TargetSolid {
        TargetSolid::new(
            self.shape,
            self.position,
            self.side,
            self.intersection_mode,
        )
    }
}

/// A complete scene variant: the solid, the sheet, the wrap constants and
/// the input bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapConfig {
    pub solid: SolidConfig,
    pub sheet: SheetDimensions,
    /// Depth the ray origin of every vertex is moved to before casting.
    pub standoff: f32,
    /// Offset added to the depth of a hit, keeping the sheet off the surface.
    pub clearance: f32,
    pub pose: PoseBinding,
    pub key_bindings: KeyBindings,
}

impl WrapConfig {
    /// Sheet tilted around X in front of a sphere.
    pub fn sphere() -> Self {
        WrapConfig {
            solid: SolidConfig {
                shape: Shape::Sphere {
                    radius: 2.0,
                    width_segments: 32,
                    height_segments: 32,
                },
                position: Point3::origin(),
                side: FaceSide::Front,
                intersection_mode: IntersectionMode::Analytic,
            },
            sheet: default_sheet(),
            standoff: 3.0,
            clearance: DEFAULT_CLEARANCE,
            pose: PoseBinding {
                mode: PoseMode::Rotation,
                axis: Axis::X,
                step: DEFAULT_POSE_STEP,
            },
            // ArrowUp tilts the top of the sheet away from the viewer
            key_bindings: KeyBindings(vec![
                KeyBinding {
                    key: Key::ArrowUp,
                    symbol: InputSymbol::Decrease,
                },
                KeyBinding {
                    key: Key::ArrowDown,
                    symbol: InputSymbol::Increase,
                },
                KeyBinding {
                    key: Key::Enter,
                    symbol: InputSymbol::Confirm,
                },
            ]),
        }
    }

    /// Sheet sliding along Y in front of an upright cylinder.
    pub fn cylinder() -> Self {
        WrapConfig {
            solid: SolidConfig {
                shape: Shape::Cylinder {
                    radius: 1.0,
                    height: 5.0,
                    radial_segments: 32,
                    height_segments: 1,
                },
                position: Point3::origin(),
                side: FaceSide::Front,
                intersection_mode: IntersectionMode::Analytic,
            },
            sheet: default_sheet(),
            standoff: 1.0,
            clearance: DEFAULT_CLEARANCE,
            pose: PoseBinding {
                mode: PoseMode::Translation,
                axis: Axis::Y,
                step: DEFAULT_POSE_STEP,
            },
            key_bindings: KeyBindings(vec![
                KeyBinding {
                    key: Key::ArrowUp,
                    symbol: InputSymbol::Increase,
                },
                KeyBinding {
                    key: Key::ArrowDown,
                    symbol: InputSymbol::Decrease,
                },
                KeyBinding {
                    key: Key::Enter,
                    symbol: InputSymbol::Confirm,
                },
            ]),
        }
    }

    /// Checks the config describes a constructible scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = |values: &[f32]| values.iter().all(|value| value.is_finite());

        if !finite(&[
            self.standoff,
            self.clearance,
            self.pose.step,
            self.solid.position.x,
            self.solid.position.y,
            self.solid.position.z,
            self.sheet.width,
            self.sheet.height,
        ]) {
            return Err(ConfigError::Invalid("all numbers must be finite"));
        }

        match self.solid.shape {
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(ConfigError::Invalid("sphere radius must be positive"));
                }
                if width_segments < 3 || height_segments < 3 {
                    return Err(ConfigError::Invalid(
                        "sphere needs at least 3 width and 3 height segments",
                    ));
                }
            }
            Shape::Cylinder {
                radius,
                height,
                radial_segments,
                height_segments,
            } => {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(ConfigError::Invalid("cylinder radius must be positive"));
                }
                if !height.is_finite() || height <= 0.0 {
                    return Err(ConfigError::Invalid("cylinder height must be positive"));
                }
                if radial_segments < 3 || height_segments < 1 {
                    return Err(ConfigError::Invalid(
                        "cylinder needs at least 3 radial and 1 height segment",
                    ));
                }
            }
        }

        if self.sheet.width <= 0.0 || self.sheet.height <= 0.0 {
            return Err(ConfigError::Invalid("sheet size must be positive"));
        }
        if self.sheet.width_segments < 1 || self.sheet.height_segments < 1 {
            return Err(ConfigError::Invalid("sheet needs at least 1 segment"));
        }
        if self.clearance < 0.0 {
            return Err(ConfigError::Invalid("clearance can't be negative"));
        }
        if self.pose.step <= 0.0 {
            return Err(ConfigError::Invalid("pose step must be positive"));
        }

        Ok(())
    }
}

fn default_sheet() -> SheetDimensions {
    SheetDimensions {
        width: 1.0,
        height: 1.0,
        width_segments: 10,
        height_segments: 10,
    }
}

/// Reads and validates a config from a RON file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<WrapConfig, ConfigError> {
    let file = File::open(path)?;
    let buf_reader = BufReader::new(file);
    let config: WrapConfig =
        ron::de::from_reader(buf_reader).map_err(ConfigError::DeserializingError)?;

    config.validate()?;

    Ok(config)
}

/// Parses and validates a config from a RON string.
pub fn from_ron_str(contents: &str) -> Result<WrapConfig, ConfigError> {
    let config: WrapConfig =
        ron::de::from_str(contents).map_err(ConfigError::DeserializingError)?;

    config.validate()?;

    Ok(config)
}

pub fn to_ron_string(config: &WrapConfig) -> Result<String, ConfigError> {
    let pretty_config = ron::ser::PrettyConfig::default();
    ron::ser::to_string_pretty(config, pretty_config).map_err(ConfigError::SerializingError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(WrapConfig::sphere().validate().is_ok());
        assert!(WrapConfig::cylinder().validate().is_ok());
    }

    #[test]
    fn test_sphere_preset_constants() {
        let config = WrapConfig::sphere();

        assert_eq!(config.standoff, 3.0);
        assert_eq!(config.clearance, 0.01);
        assert_eq!(config.pose.mode, PoseMode::Rotation);
        assert_eq!(config.pose.step, 0.05);
        assert_eq!(
            config.key_bindings.symbol(Key::ArrowUp),
            Some(InputSymbol::Decrease)
        );
    }

    #[test]
    fn test_cylinder_preset_constants() {
        let config = WrapConfig::cylinder();

        assert_eq!(config.standoff, 1.0);
        assert_eq!(config.pose.mode, PoseMode::Translation);
        assert_eq!(
            config.solid.shape,
            Shape::Cylinder {
                radius: 1.0,
                height: 5.0,
                radial_segments: 32,
                height_segments: 1,
            }
        );
    }

    #[test]
    fn test_ron_round_trip_of_preset() {
        let config = WrapConfig::cylinder();

        let contents = to_ron_string(&config).expect("Failed to serialize config");
        let parsed = from_ron_str(&contents).expect("Failed to parse config");

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_non_positive_radius() {
        let mut config = WrapConfig::sphere();
        config.solid.shape = Shape::Sphere {
            radius: 0.0,
            width_segments: 32,
            height_segments: 32,
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_negative_clearance() {
        let mut config = WrapConfig::sphere();
        config.clearance = -0.01;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_sheet_segments() {
        let mut config = WrapConfig::cylinder();
        config.sheet.width_segments = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_nan_standoff() {
        let mut config = WrapConfig::cylinder();
        config.standoff = f32::NAN;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_ron_str_malformed() {
        assert!(matches!(
            from_ron_str("(solid: nonsense"),
            Err(ConfigError::DeserializingError(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            open("this/config/does/not/exist.ron"),
            Err(ConfigError::FileNotFound)
        ));
    }
}
