//! Skeleton debug visualization

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Target for debug overlay draw calls
pub trait DebugDrawSink {
    /// Draw a coordinate frame (axes) at the given transform
    fn draw_coordinates(&mut self, transform: &Mat4, size: f32);

    /// Draw a joint shape between a joint and one of its children
    fn draw_joint(&mut self, from: Vec3, to: Vec3, transform: &Mat4, size: f32, color: Vec3);
}

/// Sizes and colors used when debug drawing skeletons
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawStyle {
    /// Axis length of per-joint coordinate frames
    pub coordinate_size: f32,
    /// Size of parent/child joint shapes
    pub joint_size: f32,
    /// Color of edges leaving the root joint
    pub root_color: [f32; 3],
    /// Color of edges leading to `highlight_joint`
    pub highlight_color: [f32; 3],
    /// Color of every other edge
    pub joint_color: [f32; 3],
    /// Joint whose incoming edge gets `highlight_color`
    pub highlight_joint: Option<String>,
    /// Also draw each joint's bind offset frame
    pub draw_bind_offsets: bool,
}

impl Default for DebugDrawStyle {
    fn default() -> Self {
        Self {
            coordinate_size: 4.5,
            joint_size: 1.0,
            root_color: [1.0, 0.0, 0.0],
            highlight_color: [1.0, 1.0, 0.0],
            joint_color: [0.0, 1.0, 0.0],
            highlight_joint: None,
            draw_bind_offsets: false,
        }
    }
}

/// A recorded joint draw call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLine {
    pub from: Vec3,
    pub to: Vec3,
    pub transform: Mat4,
    pub size: f32,
    pub color: Vec3,
}

/// Debug draw sink that records calls instead of rendering them
#[derive(Clone, Debug, Default)]
pub struct DebugDrawRecorder {
    pub coordinates: Vec<(Mat4, f32)>,
    pub joints: Vec<JointLine>,
}

impl DebugDrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.coordinates.clear();
        self.joints.clear();
    }
}

impl DebugDrawSink for DebugDrawRecorder {
    fn draw_coordinates(&mut self, transform: &Mat4, size: f32) {
        self.coordinates.push((*transform, size));
    }

    fn draw_joint(&mut self, from: Vec3, to: Vec3, transform: &Mat4, size: f32, color: Vec3) {
        self.joints.push(JointLine {
            from,
            to,
            transform: *transform,
            size,
            color,
        });
    }
}
