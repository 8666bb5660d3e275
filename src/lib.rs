//! Armature - skeletal animation runtime: joint hierarchies, keyframed
//! takes and skinning matrix output

pub mod core;
pub mod math;
pub mod animation;
pub mod scene;
