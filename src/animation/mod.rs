//! Skeletal animation system

pub mod joint;
pub mod skeleton;
pub mod take;
pub mod loader;
pub mod config;
pub mod animator;
pub mod debug_draw;
pub mod gpu_animation;
pub mod system;
pub mod inspector;

pub use joint::{Joint, JointId, JointRef};
pub use skeleton::{Skeleton, MAX_JOINTS};
pub use take::{JointTransform, KeyFrame, Take};
pub use loader::{AnimationLoader, JsonTakeLoader};
pub use config::{AnimationConfig, TakeSelection};
pub use animator::{apply_take, Animator};
pub use debug_draw::{DebugDrawRecorder, DebugDrawSink, DebugDrawStyle, JointLine};
pub use gpu_animation::{joint_uniform_name, GpuJointTransform, JointPalette, UniformSink};
pub use system::{AnimationStats, AnimationSystem};
pub use inspector::AnimationInspector;
