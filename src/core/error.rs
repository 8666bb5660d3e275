//! Error types for the animation runtime

use thiserror::Error;

use crate::animation::{JointId, JointRef};

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("Joint not found: {0}")]
    JointNotFound(JointRef),

    #[error("Take not found: {0:?}")]
    TakeNotFound(String),

    #[error("Joint already exists: id {id}, name {name:?}")]
    DuplicateJoint { id: JointId, name: String },

    #[error("Joint id {0} exceeds the joint limit")]
    JointLimit(JointId),

    #[error("Invalid joint hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Skeleton has not been initialized")]
    SkeletonNotInitialized,

    #[error("No skeleton bound to animator")]
    SkeletonNotBound,

    #[error("Bound skeleton no longer exists")]
    SkeletonDropped,

    #[error("No active take selected")]
    NoActiveTake,

    #[error("Invalid keyframe timestamp {time} for joint {joint:?}")]
    InvalidTimestamp { joint: String, time: f32 },

    #[error("Invalid sample at {time} for joint {joint:?}: {reason}")]
    InvalidSample {
        joint: String,
        time: f32,
        reason: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural problems found while validating a joint hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("no root joint")]
    NoRoot,

    #[error("multiple root joints: {0:?}")]
    MultipleRoots(Vec<JointId>),

    #[error("root joint is {found}, expected {expected}")]
    RootMismatch { expected: JointId, found: JointId },

    #[error("joint {parent} lists missing child {child}")]
    DanglingChild { parent: JointId, child: JointId },

    #[error("joint {joint} references missing parent {parent}")]
    DanglingParent { joint: JointId, parent: JointId },

    #[error("joint {joint} is listed as a child of {listed_by} but its parent is {parent:?}")]
    ParentMismatch {
        joint: JointId,
        listed_by: JointId,
        parent: Option<JointId>,
    },

    #[error("cycle through joint {0}")]
    Cycle(JointId),
}
