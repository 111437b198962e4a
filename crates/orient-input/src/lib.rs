pub mod console;
pub mod controller;
pub mod keyboard;

use glam::DQuat;
use orient_core::{AngleUnit, Axis, EulerAngles, RotationOrder};

/// A request from the presentation layer to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Convert Euler fields (in the active unit and order) to a quaternion.
    ApplyEuler(EulerAngles),
    /// Convert quaternion fields to Euler angles in the active unit.
    ApplyQuaternion(DQuat),
    /// Re-run the quaternion conversion on the stored quaternion fields.
    ReapplyQuaternion,
    /// Add `delta` (active unit) to one Euler field and apply.
    Nudge { axis: Axis, delta: f64 },
    SetUnit(AngleUnit),
    CycleUnit,
    SetOrder(RotationOrder),
    CycleOrder,
    /// Back to the identity orientation.
    Reset,
    /// Log the current state.
    Show,
    Help,
    Quit,
}
