//! Mathematical utilities and data structures

pub mod aabb;
pub mod transform;

pub use aabb::Aabb;
pub use transform::{compose_transform, translation_of};
