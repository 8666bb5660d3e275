//! Skeletal joint hierarchy: storage, lookup, bind pose and skinning output

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use super::debug_draw::{DebugDrawSink, DebugDrawStyle};
use super::gpu_animation::{joint_uniform_name, UniformSink};
use super::joint::{Joint, JointId, JointRef};
use crate::core::error::{Error, HierarchyError};
use crate::core::types::Result;
use crate::math::{compose_transform, translation_of, Aabb};

/// Maximum number of joints per skeleton (GPU uniform array limit).
/// Joint ids must be below this value.
pub const MAX_JOINTS: usize = 128;

/// A hierarchical skeleton composed of joints.
///
/// Joints live in an arena indexed by their id, with a secondary name index.
/// The hierarchy is validated once by [`Skeleton::initialize`]; every walk
/// afterwards relies on it being a single rooted tree.
#[derive(Clone, Debug)]
pub struct Skeleton {
    joints: Vec<Option<Joint>>,
    names: HashMap<String, JointId>,
    joint_count: usize,
    root: Option<JointId>,
    initialized: bool,

    scale: f32,
    rotation: Quat,
    translation: Vec3,
    root_transform: Mat4,

    global_transform: Mat4,
    global_transform_inverse: Mat4,
}

impl Skeleton {
    /// Create an empty skeleton
    pub fn new() -> Self {
        Self {
            joints: Vec::new(),
            names: HashMap::new(),
            joint_count: 0,
            root: None,
            initialized: false,
            scale: 1.0,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            root_transform: Mat4::IDENTITY,
            global_transform: Mat4::IDENTITY,
            global_transform_inverse: Mat4::IDENTITY,
        }
    }

    /// Add a joint to the skeleton.
    ///
    /// A joint whose id or name is already present is rejected. Parent links
    /// are mirrored into the parent's child list, in whichever order the two
    /// joints arrive. Adding a joint invalidates a previous `initialize`.
    pub fn add_joint(&mut self, mut joint: Joint) -> Result<()> {
        let id = joint.id();
        if id >= MAX_JOINTS {
            return Err(Error::JointLimit(id));
        }
        if self.contains_joint(id) || self.names.contains_key(joint.name()) {
            log::error!("Rejecting duplicate joint {} {:?}", id, joint.name());
            return Err(Error::DuplicateJoint {
                id,
                name: joint.name().to_string(),
            });
        }

        // Adopt joints added earlier that name this one as their parent
        for existing in self.joints.iter().flatten() {
            if existing.parent() == Some(id) {
                joint.add_child(existing.id());
            }
        }
        if let Some(parent) = joint.parent().and_then(|p| self.joint_slot_mut(p)) {
            parent.add_child(id);
        }

        if self.joints.len() <= id {
            self.joints.resize_with(id + 1, || None);
        }
        self.names.insert(joint.name().to_string(), id);
        self.joints[id] = Some(joint);
        self.joint_count += 1;
        self.initialized = false;
        Ok(())
    }

    /// Validate the hierarchy and compute per-joint bind offsets.
    /// Must run after all joints are added and before sampling.
    pub fn initialize(&mut self) -> Result<()> {
        self.calculate_joint_local_bind_offset_transforms()?;
        log::info!(
            "Skeleton initialized: {} joints, root {:?}",
            self.joint_count,
            self.root
        );
        Ok(())
    }

    /// Whether the hierarchy has been validated since the last structural change
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Check that the joints form a single rooted tree.
    /// Returns the root id, or `None` for an empty skeleton.
    pub fn validate(&self) -> std::result::Result<Option<JointId>, HierarchyError> {
        if self.joint_count == 0 {
            return Ok(None);
        }

        let roots: Vec<JointId> = self.joints().filter(|j| j.is_root()).map(Joint::id).collect();
        let root = match roots.len() {
            0 => return Err(HierarchyError::NoRoot),
            1 => roots[0],
            _ => return Err(HierarchyError::MultipleRoots(roots)),
        };
        if let Some(expected) = self.root {
            if expected != root {
                return Err(HierarchyError::RootMismatch { expected, found: root });
            }
        }

        for joint in self.joints() {
            if let Some(parent_id) = joint.parent() {
                // add_joint mirrors the child link, so only the parent can be missing
                if !self.contains_joint(parent_id) {
                    return Err(HierarchyError::DanglingParent {
                        joint: joint.id(),
                        parent: parent_id,
                    });
                }
            }
            for &child_id in joint.children() {
                let child = self.joint(child_id).ok_or(HierarchyError::DanglingChild {
                    parent: joint.id(),
                    child: child_id,
                })?;
                if child.parent() != Some(joint.id()) {
                    return Err(HierarchyError::ParentMismatch {
                        joint: child_id,
                        listed_by: joint.id(),
                        parent: child.parent(),
                    });
                }
            }
        }

        let mut visited = vec![false; self.joints.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if visited[id] {
                return Err(HierarchyError::Cycle(id));
            }
            visited[id] = true;
            if let Some(joint) = self.joint(id) {
                stack.extend_from_slice(joint.children());
            }
        }

        // With consistent links, anything not reached from the root hangs off a cycle
        if let Some(detached) = self.joints().find(|j| !visited[j.id()]) {
            return Err(HierarchyError::Cycle(self.find_cycle_member(detached.id())));
        }

        Ok(Some(root))
    }

    /// Follow parent links from `start` until a joint repeats
    fn find_cycle_member(&self, start: JointId) -> JointId {
        let mut seen = vec![false; self.joints.len()];
        let mut current = start;
        while !seen[current] {
            seen[current] = true;
            match self.joint(current).and_then(Joint::parent) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// For every non-root joint store `inverse(parentModelBind * inverseModelBind)`
    /// as its local bind offset; the root gets identity.
    pub fn calculate_joint_local_bind_offset_transforms(&mut self) -> Result<()> {
        let root = self.validate()?;

        let offsets: Vec<(JointId, Mat4)> = self
            .joints()
            .map(|joint| {
                let offset = match joint.parent().and_then(|p| self.joint(p)) {
                    Some(parent) => (parent.model_bind_transform()
                        * joint.inverse_model_bind_transform())
                    .inverse(),
                    None => Mat4::IDENTITY,
                };
                (joint.id(), offset)
            })
            .collect();

        for (id, offset) in offsets {
            if let Some(joint) = self.joint_slot_mut(id) {
                joint.set_local_bind_offset_transform(offset);
            }
        }

        self.root = root;
        self.initialized = true;
        Ok(())
    }

    /// Explicitly designate the root joint. Checked by `initialize`.
    pub fn set_root_joint_id(&mut self, id: JointId) {
        self.root = Some(id);
        self.initialized = false;
    }

    pub fn root_joint_id(&self) -> Option<JointId> {
        self.root
    }

    pub fn root_joint(&self) -> Option<&Joint> {
        self.root.and_then(|id| self.joint(id))
    }

    /// Get the number of joints in the skeleton
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    pub fn is_empty(&self) -> bool {
        self.joint_count == 0
    }

    /// Iterate joints in id order
    pub fn joints(&self) -> impl Iterator<Item = &Joint> + '_ {
        self.joints.iter().flatten()
    }

    /// Iterate joints mutably in id order
    pub fn joints_mut(&mut self) -> impl Iterator<Item = &mut Joint> + '_ {
        self.joints.iter_mut().flatten()
    }

    /// Get a joint by id
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id).and_then(Option::as_ref)
    }

    /// Get a joint by id for writing sampled transforms
    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joint_slot_mut(id)
    }

    fn joint_slot_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id).and_then(Option::as_mut)
    }

    /// Get a joint by exact name
    pub fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.names.get(name).and_then(|&id| self.joint(id))
    }

    pub fn joint_by_name_mut(&mut self, name: &str) -> Option<&mut Joint> {
        let id = *self.names.get(name)?;
        self.joint_slot_mut(id)
    }

    /// First joint (in id order) whose name is contained in `query`.
    /// Matches imported names that carry a namespace prefix or suffix.
    pub fn joint_by_partial_name(&self, query: &str) -> Option<&Joint> {
        self.joints().find(|j| query.contains(j.name()))
    }

    pub fn contains_joint(&self, id: JointId) -> bool {
        self.joint(id).is_some()
    }

    pub fn contains_joint_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Find a joint id by name
    pub fn joint_id(&self, name: &str) -> Result<JointId> {
        self.names.get(name).copied().ok_or_else(|| {
            log::warn!("Skeleton joint id not found for name {:?}", name);
            Error::JointNotFound(JointRef::Name(name.to_string()))
        })
    }

    /// Find a joint name by id
    pub fn joint_name(&self, id: JointId) -> Result<&str> {
        self.joint(id).map(Joint::name).ok_or_else(|| {
            log::warn!("Skeleton joint name not found for id {}", id);
            Error::JointNotFound(JointRef::Id(id))
        })
    }

    /// Current model-space transform of a joint
    pub fn joint_transform(&self, id: JointId) -> Result<Mat4> {
        self.joint(id).map(Joint::model_space_transform).ok_or_else(|| {
            log::warn!("Skeleton joint transform not found for id {}", id);
            Error::JointNotFound(JointRef::Id(id))
        })
    }

    /// Reset every joint's model-space transform to its model bind transform
    pub fn set_to_bind_pose(&mut self) {
        for joint in self.joints_mut() {
            let bind = joint.model_bind_transform();
            joint.set_model_space_transform(bind);
        }
    }

    /// Set the model-space transform of a joint and all its descendants to
    /// `transform * modelBind`. Every joint uses the same `transform`.
    pub fn transform_joint_and_children(&mut self, id: JointId, transform: Mat4) -> Result<()> {
        if !self.initialized {
            return Err(Error::SkeletonNotInitialized);
        }
        if !self.contains_joint(id) {
            return Err(Error::JointNotFound(JointRef::Id(id)));
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(joint) = self.joint_slot_mut(current) else {
                continue;
            };
            let updated = transform * joint.model_bind_transform();
            joint.set_model_space_transform(updated);
            stack.extend_from_slice(joint.children());
        }
        Ok(())
    }

    /// Compose the skeleton's own scale, rotation and translation
    pub fn build_root_transform(&self) -> Mat4 {
        compose_transform(self.translation, self.rotation, Vec3::splat(self.scale))
    }

    fn update_root_transform(&mut self) {
        self.root_transform = self.build_root_transform();
    }

    /// Cached skeleton-level transform applied on top of every joint
    pub fn root_transform(&self) -> Mat4 {
        self.root_transform
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.update_root_transform();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.update_root_transform();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.update_root_transform();
    }

    /// Store the imported scene-root transform and its inverse
    pub fn set_global_transform(&mut self, transform: Mat4) {
        self.global_transform = transform;
        self.global_transform_inverse = transform.inverse();
    }

    pub fn global_transform(&self) -> Mat4 {
        self.global_transform
    }

    pub fn global_transform_inverse(&self) -> Mat4 {
        self.global_transform_inverse
    }

    /// Skinning matrix of one joint: `root * modelSpace * inverseModelBind`
    fn skinning_matrix(&self, joint: &Joint) -> Mat4 {
        self.root_transform * joint.model_space_transform() * joint.inverse_model_bind_transform()
    }

    /// Emit `joints[<ID>]` skinning matrices to a uniform sink
    pub fn set_joint_uniforms(&self, sink: &mut dyn UniformSink) {
        for joint in self.joints() {
            let matrix = self.skinning_matrix(joint);
            sink.set_uniform_mat4(&joint_uniform_name(joint.id()), &matrix);
        }
    }

    /// Skinning matrices indexed by joint id; unused ids hold identity
    pub fn joint_matrices(&self) -> Vec<Mat4> {
        self.joints
            .iter()
            .map(|slot| slot.as_ref().map_or(Mat4::IDENTITY, |j| self.skinning_matrix(j)))
            .collect()
    }

    /// Bounds of every joint's current position, root transform applied
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.joints()
                .map(|j| translation_of(&(self.root_transform * j.model_space_transform()))),
        )
    }

    /// Draw one coordinate frame per joint and one joint shape per
    /// parent/child edge, walking depth-first from the root.
    pub fn debug_draw(&self, sink: &mut dyn DebugDrawSink, style: &DebugDrawStyle) {
        if !self.initialized {
            log::warn!("Skipping debug draw of uninitialized skeleton");
            return;
        }
        let Some(root) = self.root else {
            return;
        };

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(joint) = self.joint(id) else {
                continue;
            };
            let world = self.root_transform * joint.model_space_transform();

            if style.draw_bind_offsets {
                let offset = self.root_transform * joint.local_bind_offset_transform();
                sink.draw_coordinates(&offset, style.coordinate_size);
            }
            sink.draw_coordinates(&world, style.coordinate_size);

            let start = translation_of(&world);
            for &child_id in joint.children() {
                let Some(child) = self.joint(child_id) else {
                    continue;
                };
                let end = translation_of(&(self.root_transform * child.model_space_transform()));
                let color = if joint.is_root() {
                    style.root_color
                } else if style.highlight_joint.as_deref() == Some(child.name()) {
                    style.highlight_color
                } else {
                    style.joint_color
                };
                sink.draw_joint(start, end, &world, style.joint_size, Vec3::from(color));
            }
            stack.extend(joint.children().iter().rev());
        }
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::debug_draw::DebugDrawRecorder;
    use std::f32::consts::FRAC_PI_2;

    /// root (0) -> spine (1) -> head (2), root -> hip (3)
    fn create_test_skeleton() -> Skeleton {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY)).unwrap();
        skeleton
            .add_joint(
                Joint::new(1, "spine", Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
                    .with_parent(0),
            )
            .unwrap();
        skeleton
            .add_joint(
                Joint::new(2, "head", Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)))
                    .with_parent(1),
            )
            .unwrap();
        skeleton
            .add_joint(
                Joint::new(3, "hip", Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)))
                    .with_parent(0),
            )
            .unwrap();
        skeleton.initialize().unwrap();
        skeleton
    }

    struct RecordingSink(Vec<(String, Mat4)>);

    impl UniformSink for RecordingSink {
        fn set_uniform_mat4(&mut self, name: &str, value: &Mat4) {
            self.0.push((name.to_string(), *value));
        }
    }

    #[test]
    fn test_add_joint_links_children() {
        let skeleton = create_test_skeleton();
        assert_eq!(skeleton.joint_count(), 4);
        assert_eq!(skeleton.root_joint_id(), Some(0));
        assert_eq!(skeleton.joint(0).unwrap().children(), &[1, 3]);
        assert_eq!(skeleton.joint(1).unwrap().children(), &[2]);
        assert!(skeleton.is_initialized());
    }

    #[test]
    fn test_child_added_before_parent() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(1, "child", Mat4::IDENTITY).with_parent(0)).unwrap();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY)).unwrap();
        skeleton.initialize().unwrap();
        assert_eq!(skeleton.joint(0).unwrap().children(), &[1]);
    }

    #[test]
    fn test_duplicate_joint_rejected() {
        let mut skeleton = create_test_skeleton();
        let by_id = skeleton.add_joint(Joint::new(1, "other", Mat4::IDENTITY).with_parent(0));
        assert!(matches!(by_id, Err(Error::DuplicateJoint { id: 1, .. })));
        let by_name = skeleton.add_joint(Joint::new(9, "spine", Mat4::IDENTITY).with_parent(0));
        assert!(matches!(by_name, Err(Error::DuplicateJoint { id: 9, .. })));
        // Rejected inserts leave the skeleton untouched
        assert_eq!(skeleton.joint_count(), 4);
        assert!(skeleton.is_initialized());
        assert_eq!(skeleton.joint_name(1).unwrap(), "spine");
    }

    #[test]
    fn test_joint_limit() {
        let mut skeleton = Skeleton::new();
        let result = skeleton.add_joint(Joint::new(MAX_JOINTS, "far", Mat4::IDENTITY));
        assert!(matches!(result, Err(Error::JointLimit(id)) if id == MAX_JOINTS));
    }

    #[test]
    fn test_lookups() {
        let skeleton = create_test_skeleton();
        assert_eq!(skeleton.joint_id("head").unwrap(), 2);
        assert_eq!(skeleton.joint_name(3).unwrap(), "hip");
        assert!(skeleton.joint_by_name("spine").is_some());
        assert!(skeleton.contains_joint(2));
        assert!(skeleton.contains_joint_name("hip"));
        assert_eq!(skeleton.joint_by_partial_name("rig:head_end").unwrap().id(), 2);

        assert!(matches!(
            skeleton.joint_id("tail"),
            Err(Error::JointNotFound(JointRef::Name(ref n))) if n == "tail"
        ));
        assert!(matches!(
            skeleton.joint_name(42),
            Err(Error::JointNotFound(JointRef::Id(42)))
        ));
        assert!(skeleton.joint_transform(42).is_err());
        assert!(skeleton.joint(42).is_none());
        assert!(skeleton.joint_by_name("tail").is_none());
        assert!(skeleton.joint_by_partial_name("tail").is_none());
    }

    #[test]
    fn test_joints_iterate_in_id_order() {
        let skeleton = create_test_skeleton();
        let ids: Vec<JointId> = skeleton.joints().map(Joint::id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_validate_no_root() {
        crate::core::logging::init_for_tests();
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "a", Mat4::IDENTITY).with_parent(1)).unwrap();
        skeleton.add_joint(Joint::new(1, "b", Mat4::IDENTITY).with_parent(0)).unwrap();
        assert!(matches!(
            skeleton.initialize(),
            Err(Error::Hierarchy(HierarchyError::NoRoot))
        ));
        assert!(!skeleton.is_initialized());
    }

    #[test]
    fn test_validate_multiple_roots() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "a", Mat4::IDENTITY)).unwrap();
        skeleton.add_joint(Joint::new(1, "b", Mat4::IDENTITY)).unwrap();
        assert_eq!(skeleton.validate(), Err(HierarchyError::MultipleRoots(vec![0, 1])));
    }

    #[test]
    fn test_validate_cycle() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY)).unwrap();
        skeleton.add_joint(Joint::new(1, "a", Mat4::IDENTITY).with_parent(2)).unwrap();
        skeleton.add_joint(Joint::new(2, "b", Mat4::IDENTITY).with_parent(1)).unwrap();
        skeleton.add_joint(Joint::new(3, "c", Mat4::IDENTITY).with_parent(2)).unwrap();
        match skeleton.validate() {
            Err(HierarchyError::Cycle(id)) => assert!(id == 1 || id == 2),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_dangling_links() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY).with_children([5])).unwrap();
        assert_eq!(
            skeleton.validate(),
            Err(HierarchyError::DanglingChild { parent: 0, child: 5 })
        );

        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY)).unwrap();
        skeleton.add_joint(Joint::new(1, "arm", Mat4::IDENTITY).with_parent(7)).unwrap();
        assert_eq!(
            skeleton.validate(),
            Err(HierarchyError::DanglingParent { joint: 1, parent: 7 })
        );
    }

    #[test]
    fn test_validate_parent_mismatch() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY).with_children([1, 2])).unwrap();
        skeleton.add_joint(Joint::new(1, "a", Mat4::IDENTITY).with_parent(0)).unwrap();
        skeleton.add_joint(Joint::new(2, "b", Mat4::IDENTITY).with_parent(1)).unwrap();
        assert_eq!(
            skeleton.validate(),
            Err(HierarchyError::ParentMismatch { joint: 2, listed_by: 0, parent: Some(1) })
        );
    }

    #[test]
    fn test_validate_root_mismatch() {
        let mut skeleton = create_test_skeleton();
        skeleton.set_root_joint_id(1);
        assert_eq!(
            skeleton.validate(),
            Err(HierarchyError::RootMismatch { expected: 1, found: 0 })
        );
    }

    #[test]
    fn test_empty_skeleton_initializes() {
        let mut skeleton = Skeleton::new();
        skeleton.initialize().unwrap();
        assert!(skeleton.is_empty());
        assert_eq!(skeleton.root_joint_id(), None);
        assert!(skeleton.bounds().is_none());
        assert!(skeleton.joint_matrices().is_empty());
    }

    #[test]
    fn test_local_bind_offsets() {
        let skeleton = create_test_skeleton();
        assert_eq!(skeleton.joint(0).unwrap().local_bind_offset_transform(), Mat4::IDENTITY);

        // head bind at y=2 under spine at y=1: inverse(spineBind * headInvBind)
        let head = skeleton.joint(2).unwrap();
        let expected = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        assert!(head.local_bind_offset_transform().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_bind_pose_uniforms() {
        let mut skeleton = create_test_skeleton();
        skeleton.transform_joint_and_children(0, Mat4::from_rotation_z(FRAC_PI_2)).unwrap();
        skeleton.set_to_bind_pose();

        for joint in skeleton.joints() {
            assert_eq!(joint.model_space_transform(), joint.model_bind_transform());
        }

        let mut sink = RecordingSink(Vec::new());
        skeleton.set_joint_uniforms(&mut sink);
        assert_eq!(sink.0.len(), 4);
        assert_eq!(sink.0[0].0, "joints[0]");
        assert_eq!(sink.0[3].0, "joints[3]");
        for (_, matrix) in &sink.0 {
            assert!(matrix.abs_diff_eq(Mat4::IDENTITY, 1e-6));
        }
    }

    #[test]
    fn test_transform_joint_and_children() {
        let mut skeleton = create_test_skeleton();
        let offset = Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0));
        skeleton.transform_joint_and_children(1, offset).unwrap();

        // spine and head move, root and hip keep their pose
        let head = skeleton.joint(2).unwrap();
        assert_eq!(head.model_space_transform(), offset * head.model_bind_transform());
        let spine = skeleton.joint(1).unwrap();
        assert_eq!(spine.model_space_transform(), offset * spine.model_bind_transform());
        assert_eq!(skeleton.joint_transform(0).unwrap(), Mat4::IDENTITY);
        let hip = skeleton.joint(3).unwrap();
        assert_eq!(hip.model_space_transform(), hip.model_bind_transform());

        assert!(skeleton.transform_joint_and_children(42, offset).is_err());
    }

    #[test]
    fn test_transform_requires_initialize() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY)).unwrap();
        assert!(matches!(
            skeleton.transform_joint_and_children(0, Mat4::IDENTITY),
            Err(Error::SkeletonNotInitialized)
        ));
    }

    #[test]
    fn test_root_transform() {
        let mut skeleton = create_test_skeleton();
        assert_eq!(skeleton.root_transform(), Mat4::IDENTITY);

        skeleton.set_translation(Vec3::new(1.0, 0.0, 0.0));
        skeleton.set_rotation(Quat::from_rotation_z(FRAC_PI_2));
        skeleton.set_scale(2.0);

        let expected = Mat4::from_quat(Quat::from_rotation_z(FRAC_PI_2))
            * Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
            * Mat4::from_scale(Vec3::splat(2.0));
        assert!(skeleton.root_transform().abs_diff_eq(expected, 1e-6));
        assert_eq!(skeleton.root_transform(), skeleton.build_root_transform());

        // Rotation is applied to the translation
        let t = translation_of(&skeleton.root_transform());
        assert!(t.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn test_global_transform() {
        let mut skeleton = Skeleton::new();
        let global = Mat4::from_translation(Vec3::new(0.0, -4.0, 0.0));
        skeleton.set_global_transform(global);
        assert_eq!(skeleton.global_transform(), global);
        assert!((skeleton.global_transform() * skeleton.global_transform_inverse())
            .abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_joint_matrices_with_gaps() {
        let mut skeleton = Skeleton::new();
        skeleton.add_joint(Joint::new(0, "root", Mat4::IDENTITY)).unwrap();
        skeleton
            .add_joint(Joint::new(2, "tip", Mat4::from_translation(Vec3::X)).with_parent(0))
            .unwrap();
        skeleton.initialize().unwrap();
        skeleton.transform_joint_and_children(0, Mat4::from_translation(Vec3::Z)).unwrap();

        let matrices = skeleton.joint_matrices();
        assert_eq!(matrices.len(), 3);
        assert_eq!(matrices[1], Mat4::IDENTITY);
        assert!(matrices[2].abs_diff_eq(Mat4::from_translation(Vec3::Z), 1e-6));
    }

    #[test]
    fn test_bounds() {
        let mut skeleton = create_test_skeleton();
        let bounds = skeleton.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 0.0));

        skeleton.set_translation(Vec3::new(0.0, 0.0, 10.0));
        let bounds = skeleton.bounds().unwrap();
        assert_eq!(bounds.min.z, 10.0);
    }

    #[test]
    fn test_debug_draw() {
        let skeleton = create_test_skeleton();
        let style = DebugDrawStyle {
            highlight_joint: Some("head".to_string()),
            ..Default::default()
        };
        let mut recorder = DebugDrawRecorder::new();
        skeleton.debug_draw(&mut recorder, &style);

        // One frame per joint, one line per edge
        assert_eq!(recorder.coordinates.len(), 4);
        assert_eq!(recorder.joints.len(), 3);

        let root_color = Vec3::from(style.root_color);
        let highlight = Vec3::from(style.highlight_color);
        let to_head = recorder
            .joints
            .iter()
            .find(|line| line.to == Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        assert_eq!(to_head.color, highlight);
        assert_eq!(to_head.from, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(
            recorder.joints.iter().filter(|line| line.color == root_color).count(),
            2
        );

        recorder.clear();
        let style = DebugDrawStyle {
            draw_bind_offsets: true,
            ..Default::default()
        };
        skeleton.debug_draw(&mut recorder, &style);
        assert_eq!(recorder.coordinates.len(), 8);
    }
}
