pub mod camera;
pub mod frame;
pub mod geometry;
pub mod pipeline;
pub mod view;

pub use frame::{AxisArrow, FrameRenderer, RenderRequest, RenderSurface, FRAME_TITLE};
