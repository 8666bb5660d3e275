//! Debug protocol - JSON command/response definitions
//!
//! One JSON object per line in each direction. Matrices are column-major
//! `[f32; 16]`, quaternions are `[x, y, z, w]`.

use serde::{Deserialize, Serialize};

/// Commands sent from a debug client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum DebugCommand {
    /// Ping (health check)
    Ping,
    /// List loaded takes
    ListTakes,
    /// Get the take played each tick
    GetActiveTake,
    /// Select the take played each tick
    SetActiveTake { name: String },
    /// Sample a take once at the given time
    PlayTake { name: String, time: f32 },
    /// Get joint count, root and skeleton transform
    GetSkeletonInfo,
    /// Get one joint by id or name
    GetJoint {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Get the skinning matrix uniforms of every joint
    GetJointUniforms,
    /// Set the skeleton transform (only specified fields are updated)
    SetSkeletonTransform {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translation: Option<[f32; 3]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<[f32; 4]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<f32>,
    },
    /// Capture the skeleton debug draw calls
    DebugDraw,
}

/// Responses from debug server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DebugResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    None,
    Pong { message: String },
    Takes {
        takes: Vec<TakeInfo>,
        active: Option<String>,
    },
    ActiveTake { active: Option<String> },
    SkeletonInfo {
        joint_count: usize,
        root: Option<usize>,
        initialized: bool,
        translation: [f32; 3],
        rotation: [f32; 4],
        scale: f32,
        bounds: Option<BoundsInfo>,
    },
    Joint(JointInfo),
    JointUniforms { uniforms: Vec<UniformInfo> },
    DebugDraw {
        coordinate_frames: usize,
        joints: Vec<JointLineInfo>,
    },
    ParamsUpdated { description: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeInfo {
    pub name: String,
    pub duration: f32,
    pub num_frames: u32,
    pub keyframe_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsInfo {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointInfo {
    pub id: usize,
    pub name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub model_space_transform: [f32; 16],
    pub final_transform: [f32; 16],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformInfo {
    pub name: String,
    pub matrix: [f32; 16],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointLineInfo {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub color: [f32; 3],
}

impl DebugResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }

    pub fn updated(description: impl Into<String>) -> Self {
        Self::ok(ResponseData::ParamsUpdated {
            description: description.into(),
        })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}
