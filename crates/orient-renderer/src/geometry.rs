use crate::frame::{AxisArrow, RenderRequest};
use bytemuck::{Pod, Zeroable};
use glam::DVec3;

/// Color of the bounding cube edges.
pub const BOUNDS_COLOR: [f32; 3] = [0.35, 0.35, 0.4];

/// Arrowhead length as a fraction of the arrow length.
const HEAD_FRACTION: f64 = 0.12;

/// Vertex format for the line list.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    fn new(position: DVec3, color: [f32; 3]) -> Self {
        Self {
            position: position.as_vec3().to_array(),
            color,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Build the line list for a request: each arrow (shaft + two head strokes)
/// followed by the twelve edges of the bounds cube.
pub fn build_frame_lines(request: &RenderRequest) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(3 * 6 + 12 * 2);
    for arrow in &request.arrows {
        push_arrow(&mut vertices, arrow);
    }
    push_cube(&mut vertices, request.bounds);
    vertices
}

fn push_arrow(out: &mut Vec<LineVertex>, arrow: &AxisArrow) {
    let tip = arrow.tip;
    let length = tip.length();
    let dir = tip.normalize_or_zero();

    // Any vector not parallel to the shaft gives the plane of the head.
    let helper = if dir.z.abs() < 0.9 { DVec3::Z } else { DVec3::X };
    let side = dir.cross(helper).normalize_or_zero();

    let head = length * HEAD_FRACTION;
    let base = tip - dir * head;

    out.push(LineVertex::new(DVec3::ZERO, arrow.color));
    out.push(LineVertex::new(tip, arrow.color));
    for sign in [1.0, -1.0] {
        out.push(LineVertex::new(tip, arrow.color));
        out.push(LineVertex::new(base + side * (sign * head * 0.5), arrow.color));
    }
}

fn push_cube(out: &mut Vec<LineVertex>, bounds: f64) {
    let corner = |i: usize| {
        DVec3::new(
            if i & 1 == 0 { -bounds } else { bounds },
            if i & 2 == 0 { -bounds } else { bounds },
            if i & 4 == 0 { -bounds } else { bounds },
        )
    };

    // Corners differing in exactly one bit share an edge.
    for a in 0..8 {
        for bit in [1, 2, 4] {
            if a & bit == 0 {
                out.push(LineVertex::new(corner(a), BOUNDS_COLOR));
                out.push(LineVertex::new(corner(a | bit), BOUNDS_COLOR));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameRenderer;
    use glam::DMat3;

    fn identity_request() -> RenderRequest {
        FrameRenderer::default().render(&DMat3::IDENTITY)
    }

    #[test]
    fn line_list_has_expected_size() {
        let lines = build_frame_lines(&identity_request());
        assert_eq!(lines.len(), 42); // 3 * 6 + 12 * 2
        assert_eq!(lines.len() % 2, 0);
    }

    #[test]
    fn shafts_start_at_origin_and_end_at_tip() {
        let request = identity_request();
        let lines = build_frame_lines(&request);
        for (i, arrow) in request.arrows.iter().enumerate() {
            let shaft = &lines[i * 6..i * 6 + 2];
            assert_eq!(shaft[0].position, [0.0, 0.0, 0.0]);
            assert_eq!(shaft[1].position, arrow.tip.as_vec3().to_array());
            assert!(shaft.iter().all(|v| v.color == arrow.color));
        }
    }

    #[test]
    fn head_strokes_sit_behind_tip() {
        let lines = build_frame_lines(&identity_request());
        // X arrow: strokes end short of x = 1, spread in y.
        let left = lines[3].position;
        let right = lines[5].position;
        assert!((left[0] - 0.88).abs() < 1e-6);
        assert!((right[0] - 0.88).abs() < 1e-6);
        assert!((left[1] + right[1]).abs() < 1e-6);
        assert!(left[1].abs() > 0.0);
    }

    #[test]
    fn cube_edges_lie_on_bounds() {
        let lines = build_frame_lines(&identity_request());
        let cube = &lines[18..];
        assert_eq!(cube.len(), 24);
        for v in cube {
            assert!(v.position.iter().all(|c| c.abs() == 1.0));
            assert_eq!(v.color, BOUNDS_COLOR);
        }
        for edge in cube.chunks(2) {
            let differing = (0..3)
                .filter(|&k| edge[0].position[k] != edge[1].position[k])
                .count();
            assert_eq!(differing, 1);
        }
    }

    #[test]
    fn degenerate_arrow_does_not_produce_nan() {
        let mut request = identity_request();
        request.arrows[0].tip = DVec3::ZERO;
        let lines = build_frame_lines(&request);
        assert!(lines
            .iter()
            .all(|v| v.position.iter().all(|c| c.is_finite())));
    }
}
