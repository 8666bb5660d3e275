//! Per-tick animation pass over every animated entity

use hecs::{Entity, World};
use rayon::prelude::*;

use super::animator::Animator;
use super::debug_draw::{DebugDrawSink, DebugDrawStyle};
use crate::scene::MeshComponent;

/// Result counts of one animation pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationStats {
    /// Animators that sampled their active take
    pub animated: usize,
    /// Animators that reported an error
    pub failed: usize,
}

/// Drives every entity's [`Animator`].
///
/// Entities are independent, so the pass runs in parallel; each animator
/// only locks the skeleton it is bound to. The pass returns once every
/// skeleton is written, so rendering can read them afterwards.
#[derive(Debug, Default)]
pub struct AnimationSystem;

impl AnimationSystem {
    pub fn new() -> Self {
        Self
    }

    /// Bind each entity's animator to the skeleton of its skinned mesh.
    /// Returns the number of animators bound.
    pub fn bind_skinned_meshes(&self, world: &mut World) -> usize {
        let mut bound = 0;
        for (entity, (animator, mesh)) in world.query_mut::<(&mut Animator, &MeshComponent)>() {
            match mesh.skeleton() {
                Some(skeleton) => {
                    animator.bind_skeleton(skeleton);
                    bound += 1;
                }
                None => log::debug!("Entity {:?} has an animator but a static mesh", entity),
            }
        }
        bound
    }

    /// Play every animator's active take at `game_time`
    pub fn update(&self, world: &World, game_time: f32) -> AnimationStats {
        let mut query = world.query::<&Animator>();
        let animators: Vec<(Entity, &Animator)> = query.iter().collect();

        let failed = animators
            .par_iter()
            .filter(|(entity, animator)| match animator.do_animation(game_time) {
                Ok(()) => false,
                Err(e) => {
                    log::warn!("Animation failed for entity {:?}: {}", entity, e);
                    true
                }
            })
            .count();

        let stats = AnimationStats {
            animated: animators.len() - failed,
            failed,
        };
        log::trace!("Animation pass at {:.3}s: {:?}", game_time, stats);
        stats
    }

    /// Debug draw the skeleton of every skinned mesh
    pub fn draw_skeletons(&self, world: &World, sink: &mut dyn DebugDrawSink, style: &DebugDrawStyle) {
        for (_, mesh) in world.query::<&MeshComponent>().iter() {
            if let Some(skeleton) = mesh.skeleton() {
                skeleton.read().debug_draw(sink, style);
            }
        }
    }
}
