//! Take playback over a bound skeleton

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Weak};

use glam::Mat4;
use parking_lot::RwLock;

use super::config::{AnimationConfig, TakeSelection};
use super::joint::JointId;
use super::loader::AnimationLoader;
use super::skeleton::Skeleton;
use super::take::Take;
use crate::core::error::Error;
use crate::core::types::{Result, SharedSkeleton};

/// Plays named takes on one skeleton.
///
/// The animator does not own its skeleton: it holds a weak reference so the
/// mesh that owns the skeleton controls its lifetime.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    skeleton: Option<Weak<RwLock<Skeleton>>>,
    takes: HashMap<String, Take>,
    current_take: Option<String>,
    config: AnimationConfig,
}

impl Animator {
    /// Create an unbound animator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnimationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Bind the skeleton that sampling writes to
    pub fn bind_skeleton(&mut self, skeleton: &SharedSkeleton) {
        self.skeleton = Some(Arc::downgrade(skeleton));
    }

    /// Whether a skeleton is bound and still alive
    pub fn is_bound(&self) -> bool {
        self.skeleton.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }

    /// The bound skeleton, if it is still alive
    pub fn skeleton(&self) -> Result<SharedSkeleton> {
        let weak = self.skeleton.as_ref().ok_or(Error::SkeletonNotBound)?;
        weak.upgrade().ok_or(Error::SkeletonDropped)
    }

    /// Add a take. A take with the same name is replaced.
    pub fn add_take(&mut self, take: Take) {
        if !take.has_valid_duration() {
            log::warn!(
                "Take {:?} has unusable duration {}; it will always sample frame 0",
                take.name(),
                take.duration()
            );
        }
        if self.takes.insert(take.name().to_string(), take).is_some() {
            log::debug!("Replaced existing take");
        }
    }

    pub fn take(&self, name: &str) -> Option<&Take> {
        self.takes.get(name)
    }

    /// Names of every take, sorted
    pub fn take_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.takes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn take_count(&self) -> usize {
        self.takes.len()
    }

    /// Name of the active take
    pub fn current_take(&self) -> Option<&str> {
        self.current_take.as_deref()
    }

    /// Select the take played by [`Animator::do_animation`]
    pub fn set_current_take(&mut self, name: &str) -> Result<()> {
        if !self.takes.contains_key(name) {
            log::warn!("Cannot select unknown take {:?}", name);
            return Err(Error::TakeNotFound(name.to_string()));
        }
        self.current_take = Some(name.to_string());
        Ok(())
    }

    /// Load takes through `loader` and add them all.
    ///
    /// With [`TakeSelection::Last`] the last loaded take becomes active,
    /// replacing any previous selection. Returns the loaded take names in
    /// file order.
    pub fn load_animations(&mut self, loader: &dyn AnimationLoader, path: &Path) -> Result<Vec<String>> {
        let takes = loader.load_animations(path)?;
        let names: Vec<String> = takes.iter().map(|t| t.name().to_string()).collect();
        for take in takes {
            self.add_take(take);
        }

        if let Some(last) = names.last() {
            let select = match self.config.take_selection {
                TakeSelection::Last => true,
                TakeSelection::Keep => self.current_take.is_none(),
            };
            if select {
                self.current_take = Some(last.clone());
            }
        }

        log::info!(
            "Loaded {} takes from {} (active: {:?})",
            names.len(),
            path.display(),
            self.current_take
        );
        Ok(names)
    }

    /// Sample the named take at `time` and write every joint's final
    /// transform on the bound skeleton.
    pub fn play_take(&self, name: &str, time: f32) -> Result<()> {
        let skeleton = self.skeleton().inspect_err(|e| {
            log::error!("Cannot play take {:?}: {}", name, e);
        })?;
        let take = self.takes.get(name).ok_or_else(|| {
            log::warn!("Take not found: {:?}", name);
            Error::TakeNotFound(name.to_string())
        })?;

        let mut skeleton = skeleton.write();
        apply_take(&mut skeleton, take, time)
    }

    /// Play the active take at `game_time`
    pub fn do_animation(&self, game_time: f32) -> Result<()> {
        let name = self.current_take.as_deref().ok_or(Error::NoActiveTake)?;
        self.play_take(name, game_time)
    }
}

/// Sample `take` at `time` over the whole hierarchy of `skeleton`.
///
/// Walks depth-first from the root. Each joint's local matrix comes from its
/// keyframe track (identity when the take does not animate it), is composed
/// with the accumulated parent transform, and `parent * local * modelBind`
/// is stored as the final transform. Joints not reachable from the root are
/// left untouched.
pub fn apply_take(skeleton: &mut Skeleton, take: &Take, time: f32) -> Result<()> {
    if skeleton.is_empty() {
        return Ok(());
    }
    if !skeleton.is_initialized() {
        return Err(Error::SkeletonNotInitialized);
    }
    let Some(root) = skeleton.root_joint_id() else {
        return Ok(());
    };

    let frame = take.frame_number(time);
    log::trace!("Sampling take {:?} at frame {}", take.name(), frame);

    let mut stack: Vec<(JointId, Mat4)> = vec![(root, Mat4::IDENTITY)];
    while let Some((id, parent_transform)) = stack.pop() {
        let Some(joint) = skeleton.joint_mut(id) else {
            continue;
        };

        let local = take
            .keyframe(joint.name())
            .map_or(Mat4::IDENTITY, |keyframe| keyframe.sample(frame).to_local_matrix());
        let local_anim = parent_transform * local;
        let final_transform = local_anim * joint.model_bind_transform();
        joint.set_final_transform(final_transform);
        joint.set_model_space_transform(final_transform);

        stack.extend(joint.children().iter().rev().map(|&child| (child, local_anim)));
    }
    Ok(())
}
