//! Rotation representations and the conversions between them.

pub mod convert;
pub mod types;

pub use convert::{
    euler_to_matrix, euler_to_quaternion, euler_to_quaternion_ordered, normalize_quaternion,
    quaternion_to_euler, quaternion_to_euler_ordered, round_to, RotationError,
};
pub use types::{
    AngleUnit, Axis, EulerAngles, Orientation, Representation, RotationOrder, UnknownVariant,
};
