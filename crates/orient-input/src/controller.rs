use crate::console::HELP;
use crate::ControlAction;
use glam::{DMat3, DQuat};
use orient_config::{AppConfig, QuaternionOrderPolicy};
use orient_core::{
    euler_to_matrix, euler_to_quaternion, euler_to_quaternion_ordered, normalize_quaternion,
    quaternion_to_euler, quaternion_to_euler_ordered, round_to, AngleUnit, Axis, EulerAngles,
    Orientation, Representation, RotationError, RotationOrder,
};
use orient_renderer::{FrameRenderer, RenderSurface};
use tokio::sync::watch;
use tracing::{debug, info};

/// Startup selections and conversion behavior for the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub order: RotationOrder,
    pub unit: AngleUnit,
    pub decimals: u32,
    pub order_policy: QuaternionOrderPolicy,
    pub normalize_quaternion_input: bool,
}

impl ControllerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            order: config.display.rotation_order,
            unit: config.display.angle_unit,
            decimals: config.display.decimals,
            order_policy: config.conversion.order_policy,
            normalize_quaternion_input: config.conversion.normalize_quaternion_input,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// State published to subscribers after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationSnapshot {
    pub orientation: Orientation,
    pub order: RotationOrder,
    pub unit: AngleUnit,
    /// Matrix of the most recent render.
    pub rotation: DMat3,
}

impl OrientationSnapshot {
    /// One-line description of both representations.
    pub fn summary(&self) -> String {
        let e = self.orientation.euler;
        let q = self.orientation.quaternion;
        format!(
            "roll {} pitch {} yaw {} [{}] | q ({}, {}, {}, {}) | {}",
            e.roll, e.pitch, e.yaw, self.unit, q.x, q.y, q.z, q.w, self.order
        )
    }
}

/// What the caller should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Owns the edited orientation and keeps its two representations in step.
///
/// Every apply operation converts, stores both sides, and ends with a full
/// render on the surface. Unit and order changes only take effect on the
/// next apply.
pub struct InteractionController<S> {
    orientation: Orientation,
    order: RotationOrder,
    unit: AngleUnit,
    decimals: u32,
    order_policy: QuaternionOrderPolicy,
    normalize_quaternion_input: bool,
    frame_renderer: FrameRenderer,
    surface: S,
    updates: watch::Sender<OrientationSnapshot>,
}

impl<S: RenderSurface> InteractionController<S> {
    /// Start at identity and draw the initial frame.
    pub fn new(settings: ControllerSettings, frame_renderer: FrameRenderer, surface: S) -> Self {
        let orientation = Orientation::default();
        let (updates, _) = watch::channel(OrientationSnapshot {
            orientation,
            order: settings.order,
            unit: settings.unit,
            rotation: DMat3::IDENTITY,
        });

        let mut controller = Self {
            orientation,
            order: settings.order,
            unit: settings.unit,
            decimals: settings.decimals,
            order_policy: settings.order_policy,
            normalize_quaternion_input: settings.normalize_quaternion_input,
            frame_renderer,
            surface,
            updates,
        };
        controller.render();
        controller
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn order(&self) -> RotationOrder {
        self.order
    }

    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    pub fn snapshot(&self) -> OrientationSnapshot {
        self.updates.borrow().clone()
    }

    /// Receive a snapshot after every render or selector change.
    pub fn subscribe(&self) -> watch::Receiver<OrientationSnapshot> {
        self.updates.subscribe()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Euler fields → quaternion. `roll`, `pitch`, `yaw` are in `unit`.
    pub fn apply_euler_input(
        &mut self,
        roll: f64,
        pitch: f64,
        yaw: f64,
        order: RotationOrder,
        unit: AngleUnit,
    ) {
        self.order = order;
        self.unit = unit;

        let fields = EulerAngles::new(roll, pitch, yaw);
        let radians = fields.map(|v| unit.to_radians(v));
        let quaternion = match self.order_policy {
            QuaternionOrderPolicy::Legacy => euler_to_quaternion(radians, order.as_str()),
            QuaternionOrderPolicy::OrderAware => euler_to_quaternion_ordered(radians, order),
        };

        self.orientation = Orientation {
            euler: fields,
            quaternion: self.round_quaternion(quaternion),
            source: Representation::Euler,
        };
        debug!(?fields, %order, %unit, quaternion = ?self.orientation.quaternion, "Euler applied");

        self.render();
    }

    /// Quaternion fields → Euler angles expressed in `unit`.
    ///
    /// The quaternion is used as entered unless normalization is enabled, in
    /// which case a near-zero quaternion is rejected and nothing changes.
    pub fn apply_quaternion_input(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        w: f64,
        unit: AngleUnit,
    ) -> Result<(), RotationError> {
        let raw = DQuat::from_xyzw(x, y, z, w);
        let quaternion = if self.normalize_quaternion_input {
            self.round_quaternion(normalize_quaternion(raw)?)
        } else {
            raw
        };
        self.unit = unit;

        let radians = match self.order_policy {
            QuaternionOrderPolicy::Legacy => quaternion_to_euler(quaternion),
            QuaternionOrderPolicy::OrderAware => quaternion_to_euler_ordered(quaternion, self.order),
        };
        let decimals = self.decimals;
        let fields = radians.map(|v| round_to(unit.from_radians(v), decimals));

        self.orientation = Orientation {
            euler: fields,
            quaternion,
            source: Representation::Quaternion,
        };
        debug!(?quaternion, %unit, ?fields, "Quaternion applied");

        self.render();
        Ok(())
    }

    /// Select how angle fields are read from now on. The stored values are
    /// not converted.
    pub fn change_unit(&mut self, unit: AngleUnit) {
        self.unit = unit;
        self.updates.send_modify(|snapshot| snapshot.unit = unit);
        info!(%unit, "Angle unit selected");
    }

    /// Select the order used by the next conversion.
    pub fn set_order(&mut self, order: RotationOrder) {
        self.order = order;
        self.updates.send_modify(|snapshot| snapshot.order = order);
        info!(%order, "Rotation order selected");
    }

    pub fn reset(&mut self) {
        self.orientation = Orientation::default();
        info!("Orientation reset");
        self.render();
    }

    pub fn handle(&mut self, action: ControlAction) -> Result<Outcome, RotationError> {
        match action {
            ControlAction::ApplyEuler(angles) => {
                self.apply_euler_input(angles.roll, angles.pitch, angles.yaw, self.order, self.unit)
            }
            ControlAction::ApplyQuaternion(q) => {
                self.apply_quaternion_input(q.x, q.y, q.z, q.w, self.unit)?
            }
            ControlAction::ReapplyQuaternion => {
                let q = self.orientation.quaternion;
                self.apply_quaternion_input(q.x, q.y, q.z, q.w, self.unit)?
            }
            ControlAction::Nudge { axis, delta } => self.nudge(axis, delta),
            ControlAction::SetUnit(unit) => self.change_unit(unit),
            ControlAction::CycleUnit => self.change_unit(self.unit.toggle()),
            ControlAction::SetOrder(order) => self.set_order(order),
            ControlAction::CycleOrder => self.set_order(self.order.next()),
            ControlAction::Reset => self.reset(),
            ControlAction::Show => info!("{}", self.snapshot().summary()),
            ControlAction::Help => info!("\n{HELP}"),
            ControlAction::Quit => return Ok(Outcome::Exit),
        }
        Ok(Outcome::Continue)
    }

    fn nudge(&mut self, axis: Axis, delta: f64) {
        let mut fields = self.orientation.euler;
        fields.set(axis, fields.get(axis) + delta);
        self.apply_euler_input(fields.roll, fields.pitch, fields.yaw, self.order, self.unit);
    }

    fn round_quaternion(&self, q: DQuat) -> DQuat {
        let d = self.decimals;
        DQuat::from_xyzw(round_to(q.x, d), round_to(q.y, d), round_to(q.z, d), round_to(q.w, d))
    }

    /// Rebuild the frame from the Euler fields in the active unit and order.
    fn render(&mut self) {
        let radians = self.orientation.euler_radians(self.unit);
        let rotation = euler_to_matrix(radians, self.order.as_str());
        let request = self.frame_renderer.render(&rotation);
        self.surface.present(&request);

        self.updates.send_replace(OrientationSnapshot {
            orientation: self.orientation,
            order: self.order,
            unit: self.unit,
            rotation,
        });
    }
}
