use crate::ControlAction;
use orient_core::Axis;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, ModifiersState};

/// Maps key presses in the view window to controller actions.
///
/// - `1` / `2` / `3`: nudge roll / pitch / yaw by the step (Shift: backwards)
/// - `U`: toggle degrees / radians
/// - `O`: next rotation order
/// - `Q`: convert the stored quaternion back to Euler angles
/// - `R`: reset to identity
/// - `F1`: help, `Esc`: quit
pub struct KeyBindings {
    modifiers: ModifiersState,
    /// Nudge step in the active unit.
    nudge_step: f64,
}

impl KeyBindings {
    pub fn new(nudge_step: f64) -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            nudge_step,
        }
    }

    pub fn on_modifiers_changed(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    pub fn on_key(&self, key: KeyCode, state: ElementState) -> Option<ControlAction> {
        if state != ElementState::Pressed {
            return None;
        }

        let step = if self.modifiers.shift_key() {
            -self.nudge_step
        } else {
            self.nudge_step
        };
        let nudge = |axis| Some(ControlAction::Nudge { axis, delta: step });

        match key {
            KeyCode::Digit1 => nudge(Axis::X),
            KeyCode::Digit2 => nudge(Axis::Y),
            KeyCode::Digit3 => nudge(Axis::Z),
            KeyCode::KeyU => Some(ControlAction::CycleUnit),
            KeyCode::KeyO => Some(ControlAction::CycleOrder),
            KeyCode::KeyQ => Some(ControlAction::ReapplyQuaternion),
            KeyCode::KeyR => Some(ControlAction::Reset),
            KeyCode::F1 => Some(ControlAction::Help),
            KeyCode::Escape => Some(ControlAction::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_nudge_axes() {
        let keys = KeyBindings::new(5.0);
        assert_eq!(
            keys.on_key(KeyCode::Digit2, ElementState::Pressed),
            Some(ControlAction::Nudge { axis: Axis::Y, delta: 5.0 })
        );
    }

    #[test]
    fn shift_reverses_nudge() {
        let mut keys = KeyBindings::new(5.0);
        keys.on_modifiers_changed(ModifiersState::SHIFT);
        assert_eq!(
            keys.on_key(KeyCode::Digit3, ElementState::Pressed),
            Some(ControlAction::Nudge { axis: Axis::Z, delta: -5.0 })
        );

        keys.on_modifiers_changed(ModifiersState::empty());
        assert_eq!(
            keys.on_key(KeyCode::Digit1, ElementState::Pressed),
            Some(ControlAction::Nudge { axis: Axis::X, delta: 5.0 })
        );
    }

    #[test]
    fn releases_and_unbound_keys_are_ignored() {
        let keys = KeyBindings::new(5.0);
        assert_eq!(keys.on_key(KeyCode::KeyU, ElementState::Released), None);
        assert_eq!(keys.on_key(KeyCode::KeyZ, ElementState::Pressed), None);
    }

    #[test]
    fn selector_keys() {
        let keys = KeyBindings::new(1.0);
        assert_eq!(keys.on_key(KeyCode::KeyU, ElementState::Pressed), Some(ControlAction::CycleUnit));
        assert_eq!(keys.on_key(KeyCode::KeyO, ElementState::Pressed), Some(ControlAction::CycleOrder));
        assert_eq!(keys.on_key(KeyCode::Escape, ElementState::Pressed), Some(ControlAction::Quit));
    }
}
