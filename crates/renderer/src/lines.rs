//! Line-list visualisation of a posed skeleton.

use corelib::{Pose, Skeleton};

use crate::vertex::LineVertex;

const DEPTH_COLORS: [[f32; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [1.0, 0.8, 0.2],
    [0.2, 0.8, 1.0],
    [0.9, 0.3, 0.6],
];

fn depth_color(depth: usize) -> [f32; 3] {
    DEPTH_COLORS[depth % DEPTH_COLORS.len()]
}

/// One segment per parent-to-child edge, between world-space joint origins,
/// in pre-order. Each end is coloured by its bone's depth.
pub fn skeleton_lines(skeleton: &Skeleton, pose: &Pose) -> Vec<LineVertex> {
    let mut out = Vec::with_capacity(2 * skeleton.len().saturating_sub(1));
    for id in skeleton.depth_first() {
        let Some(parent) = skeleton.node(id).parent() else {
            continue;
        };
        let depth = skeleton.depth(id);
        out.push(LineVertex {
            pos: pose.world(parent).w_axis.truncate().to_array(),
            color: depth_color(depth - 1),
        });
        out.push(LineVertex {
            pos: pose.world(id).w_axis.truncate().to_array(),
            color: depth_color(depth),
        });
    }
    out
}
