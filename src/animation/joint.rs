//! A single joint of a skeletal hierarchy

use std::fmt;

use glam::Mat4;

/// Identifier of a joint within its skeleton. Dense, starting at zero.
pub type JointId = usize;

/// Reference to a joint by id or by name, used in lookup errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JointRef {
    Id(JointId),
    Name(String),
}

impl fmt::Display for JointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// A single bone: bind pose data, hierarchy links and the transforms
/// written by animation sampling.
///
/// Bind transforms are fixed at construction. Sampling only writes the
/// model-space and final transforms.
#[derive(Clone, Debug)]
pub struct Joint {
    id: JointId,
    name: String,
    local_bind_transform: Mat4,
    model_bind_transform: Mat4,
    inverse_model_bind_transform: Mat4,
    local_bind_offset_transform: Mat4,
    model_space_transform: Mat4,
    final_transform: Mat4,
    parent: Option<JointId>,
    children: Vec<JointId>,
}

impl Joint {
    /// Create a joint from its model bind transform (joint space to model root).
    /// The inverse bind transform is derived; the current pose starts at bind.
    pub fn new(id: JointId, name: impl Into<String>, model_bind_transform: Mat4) -> Self {
        Self {
            id,
            name: name.into(),
            local_bind_transform: Mat4::IDENTITY,
            model_bind_transform,
            inverse_model_bind_transform: model_bind_transform.inverse(),
            local_bind_offset_transform: Mat4::IDENTITY,
            model_space_transform: model_bind_transform,
            final_transform: model_bind_transform,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the parent joint
    pub fn with_parent(mut self, parent: JointId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the child joints. Repeated ids are kept once.
    pub fn with_children(mut self, children: impl IntoIterator<Item = JointId>) -> Self {
        self.children.clear();
        for child in children {
            self.add_child(child);
        }
        self
    }

    /// Set the imported joint-space-to-parent bind transform
    pub fn with_local_bind_transform(mut self, transform: Mat4) -> Self {
        self.local_bind_transform = transform;
        self
    }

    /// Override the derived inverse bind transform with an imported one
    pub fn with_inverse_model_bind_transform(mut self, transform: Mat4) -> Self {
        self.inverse_model_bind_transform = transform;
        self
    }

    pub fn id(&self) -> JointId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    pub fn children(&self) -> &[JointId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn local_bind_transform(&self) -> Mat4 {
        self.local_bind_transform
    }

    pub fn model_bind_transform(&self) -> Mat4 {
        self.model_bind_transform
    }

    pub fn inverse_model_bind_transform(&self) -> Mat4 {
        self.inverse_model_bind_transform
    }

    /// Bind offset relative to the parent joint, computed by the skeleton
    pub fn local_bind_offset_transform(&self) -> Mat4 {
        self.local_bind_offset_transform
    }

    /// Current model-space pose
    pub fn model_space_transform(&self) -> Mat4 {
        self.model_space_transform
    }

    /// Last sampled transform delivered to skinning
    pub fn final_transform(&self) -> Mat4 {
        self.final_transform
    }

    pub fn set_model_space_transform(&mut self, transform: Mat4) {
        self.model_space_transform = transform;
    }

    pub fn set_final_transform(&mut self, transform: Mat4) {
        self.final_transform = transform;
    }

    pub(crate) fn set_local_bind_offset_transform(&mut self, transform: Mat4) {
        self.local_bind_offset_transform = transform;
    }

    pub(crate) fn add_child(&mut self, child: JointId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }
}
