use glam::{DMat3, DVec3};
use orient_config::ViewConfig;
use orient_core::Axis;

/// Caption drawn with every frame.
pub const FRAME_TITLE: &str = "Rotated frame (red=X green=Y blue=Z)";

/// One basis vector of the rotated frame, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisArrow {
    pub axis: Axis,
    /// Arrow end point (the rotated unit axis times the axis length).
    pub tip: DVec3,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Text placed at the tip.
    pub label: &'static str,
}

/// Everything a display surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub arrows: [AxisArrow; 3],
    /// The view is fixed to `[-bounds, bounds]` on every axis.
    pub bounds: f64,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub title: &'static str,
}

/// A display that clears and redraws on every request.
///
/// Arrow labels and the caption are carried for surfaces that can draw text;
/// the wgpu line view draws geometry only.
pub trait RenderSurface {
    fn present(&mut self, request: &RenderRequest);
}

/// Turns a rotation matrix into drawable basis vectors.
///
/// Holds view settings only; each call is independent of the previous one.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    axis_length: f64,
    bounds: f64,
    elevation_deg: f64,
    azimuth_deg: f64,
}

impl FrameRenderer {
    pub fn new(view: &ViewConfig) -> Self {
        Self {
            axis_length: view.axis_length,
            bounds: view.bounds,
            elevation_deg: view.elevation_deg,
            azimuth_deg: view.azimuth_deg,
        }
    }

    /// The columns of `rotation`, scaled to the axis length.
    pub fn basis_vectors(&self, rotation: &DMat3) -> [AxisArrow; 3] {
        Axis::ALL.map(|axis| {
            let column = match axis {
                Axis::X => rotation.x_axis,
                Axis::Y => rotation.y_axis,
                Axis::Z => rotation.z_axis,
            };
            AxisArrow {
                axis,
                tip: column * self.axis_length,
                color: axis_color(axis),
                label: axis.label(),
            }
        })
    }

    pub fn render(&self, rotation: &DMat3) -> RenderRequest {
        RenderRequest {
            arrows: self.basis_vectors(rotation),
            bounds: self.bounds,
            elevation_deg: self.elevation_deg,
            azimuth_deg: self.azimuth_deg,
            title: FRAME_TITLE,
        }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

pub fn axis_color(axis: Axis) -> [f32; 3] {
    match axis {
        Axis::X => [1.0, 0.0, 0.0],
        Axis::Y => [0.0, 0.8, 0.0],
        Axis::Z => [0.0, 0.0, 1.0],
    }
}
