use orient_core::{AngleUnit, RotationOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial selector values and field formatting.
    pub display: DisplayConfig,
    /// Conversion behavior.
    pub conversion: ConversionConfig,
    /// 3D view and window settings.
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Unit selected at startup.
    pub angle_unit: AngleUnit,
    /// Rotation order selected at startup.
    pub rotation_order: RotationOrder,
    /// Decimal places kept when a derived representation is written back.
    pub decimals: u32,
    /// Keyboard nudge step, in the active unit.
    pub nudge_step: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Degrees,
            rotation_order: RotationOrder::XYZ,
            decimals: 6,
            nudge_step: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// How the rotation order feeds into the quaternion conversions.
    pub order_policy: QuaternionOrderPolicy,
    /// Normalize user-entered quaternions before converting. Near-zero input
    /// is rejected when enabled.
    pub normalize_quaternion_input: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuaternionOrderPolicy {
    /// One yaw-pitch-roll formula for XYZ and ZYX, identity for the other
    /// orders. Quaternion to Euler always uses the same extraction.
    #[default]
    Legacy,
    /// Both directions compose in the selected order, matching the frame.
    OrderAware,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Camera elevation above the XY plane, in degrees.
    pub elevation_deg: f64,
    /// Camera azimuth around Z, in degrees from +X.
    pub azimuth_deg: f64,
    /// Length of the drawn basis vectors.
    pub axis_length: f64,
    /// Half-extent of the fixed view cube.
    pub bounds: f64,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            elevation_deg: 20.0,
            azimuth_deg: 170.0,
            axis_length: 1.0,
            bounds: 1.0,
            window_width: 800,
            window_height: 800,
        }
    }
}
