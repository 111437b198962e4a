use glam::DQuat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Three rotation angles about the X (roll), Y (pitch) and Z (yaw) axes.
///
/// The struct carries no unit of its own. The math in [`crate::convert`]
/// always works in radians; the controller stores the values as they appear
/// in the angle fields and converts at use time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl EulerAngles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Apply `f` to each angle.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.roll), f(self.pitch), f(self.yaw))
    }

    /// Angle for a single axis.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.roll,
            Axis::Y => self.pitch,
            Axis::Z => self.yaw,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.roll = value,
            Axis::Y => self.pitch = value,
            Axis::Z => self.yaw = value,
        }
    }
}

/// One of the three elementary rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Map an order character to its axis. Only upper-case letters count.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Axis::X),
            'Y' => Some(Axis::Y),
            'Z' => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Sequence in which the axis rotations are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationOrder {
    #[default]
    XYZ,
    ZYX,
    YXZ,
    ZXY,
}

impl RotationOrder {
    pub const ALL: [RotationOrder; 4] = [
        RotationOrder::XYZ,
        RotationOrder::ZYX,
        RotationOrder::YXZ,
        RotationOrder::ZXY,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RotationOrder::XYZ => "XYZ",
            RotationOrder::ZYX => "ZYX",
            RotationOrder::YXZ => "YXZ",
            RotationOrder::ZXY => "ZXY",
        }
    }

    /// Axes in composition order, leftmost factor first.
    pub fn axes(self) -> [Axis; 3] {
        match self {
            RotationOrder::XYZ => [Axis::X, Axis::Y, Axis::Z],
            RotationOrder::ZYX => [Axis::Z, Axis::Y, Axis::X],
            RotationOrder::YXZ => [Axis::Y, Axis::X, Axis::Z],
            RotationOrder::ZXY => [Axis::Z, Axis::X, Axis::Y],
        }
    }

    /// The next order in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|o| *o == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotationOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == upper)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Unit the angle fields are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert a field value in this unit to radians.
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value.to_radians(),
            AngleUnit::Radians => value,
        }
    }

    /// Convert radians to a field value in this unit.
    pub fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value.to_degrees(),
            AngleUnit::Radians => value,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            AngleUnit::Degrees => AngleUnit::Radians,
            AngleUnit::Radians => AngleUnit::Degrees,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            AngleUnit::Degrees => "deg",
            AngleUnit::Radians => "rad",
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for AngleUnit {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleUnit::Degrees),
            "rad" | "radian" | "radians" => Ok(AngleUnit::Radians),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// A selector string that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized value: {0:?}")]
pub struct UnknownVariant(pub String);

/// Which representation the user wrote last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    #[default]
    Euler,
    Quaternion,
}

/// The orientation being edited, held in both representations.
///
/// `source` names the authoritative side; the other one was derived from it
/// and may have lost information (gimbal lock, display rounding).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Angle field values, in whatever unit the controller has active.
    pub euler: EulerAngles,
    /// Quaternion field values. Not necessarily unit length.
    pub quaternion: DQuat,
    pub source: Representation,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            euler: EulerAngles::ZERO,
            quaternion: DQuat::IDENTITY,
            source: Representation::Euler,
        }
    }
}

impl Orientation {
    /// Angle fields interpreted in `unit` and converted to radians.
    pub fn euler_radians(&self, unit: AngleUnit) -> EulerAngles {
        self.euler.map(|v| unit.to_radians(v))
    }
}
