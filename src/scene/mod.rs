//! Scene entity components

pub mod mesh;

pub use mesh::{MeshComponent, SkinnedMesh, StaticMesh};
