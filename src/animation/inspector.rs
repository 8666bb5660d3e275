//! Debug protocol handler for one animated skeleton

use armature_debug::{
    BoundsInfo, DebugCommand, DebugHandler, DebugResponse, JointInfo, JointLineInfo, ResponseData,
    TakeInfo, UniformInfo,
};
use glam::{Mat4, Quat, Vec3};

use super::animator::Animator;
use super::debug_draw::{DebugDrawRecorder, DebugDrawStyle};
use super::gpu_animation::UniformSink;
use super::joint::Joint;
use crate::core::types::SharedSkeleton;

/// Answers debug commands against an animator and the skeleton it drives
pub struct AnimationInspector {
    animator: Animator,
    skeleton: SharedSkeleton,
    style: DebugDrawStyle,
}

impl AnimationInspector {
    /// Bind `animator` to `skeleton` and inspect both
    pub fn new(mut animator: Animator, skeleton: SharedSkeleton) -> Self {
        animator.bind_skeleton(&skeleton);
        let style = animator.config().debug_draw.clone();
        Self {
            animator,
            skeleton,
            style,
        }
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    fn list_takes(&self) -> DebugResponse {
        let takes = self
            .animator
            .take_names()
            .into_iter()
            .filter_map(|name| self.animator.take(&name))
            .map(|take| TakeInfo {
                name: take.name().to_string(),
                duration: take.duration(),
                num_frames: take.num_frames(),
                keyframe_count: take.keyframes().len(),
            })
            .collect();
        DebugResponse::ok(ResponseData::Takes {
            takes,
            active: self.animator.current_take().map(str::to_string),
        })
    }

    fn skeleton_info(&self) -> DebugResponse {
        let skeleton = self.skeleton.read();
        DebugResponse::ok(ResponseData::SkeletonInfo {
            joint_count: skeleton.joint_count(),
            root: skeleton.root_joint_id(),
            initialized: skeleton.is_initialized(),
            translation: skeleton.translation().to_array(),
            rotation: skeleton.rotation().to_array(),
            scale: skeleton.scale(),
            bounds: skeleton.bounds().map(|b| BoundsInfo {
                min: b.min.to_array(),
                max: b.max.to_array(),
            }),
        })
    }

    fn joint(&self, id: Option<usize>, name: Option<&str>) -> DebugResponse {
        let skeleton = self.skeleton.read();
        let joint = match (id, name) {
            (Some(id), _) => skeleton.joint(id),
            (None, Some(name)) => skeleton.joint_by_name(name),
            (None, None) => return DebugResponse::error("GetJoint needs an id or a name"),
        };
        match joint {
            Some(joint) => DebugResponse::ok(ResponseData::Joint(joint_info(joint))),
            None => DebugResponse::error("Joint not found"),
        }
    }

    fn joint_uniforms(&self) -> DebugResponse {
        let mut collector = UniformCollector::default();
        self.skeleton.read().set_joint_uniforms(&mut collector);
        DebugResponse::ok(ResponseData::JointUniforms {
            uniforms: collector.0,
        })
    }

    fn set_skeleton_transform(
        &mut self,
        translation: Option<[f32; 3]>,
        rotation: Option<[f32; 4]>,
        scale: Option<f32>,
    ) -> DebugResponse {
        let mut skeleton = self.skeleton.write();
        let mut changed = Vec::new();
        if let Some(t) = translation {
            skeleton.set_translation(Vec3::from_array(t));
            changed.push("translation");
        }
        if let Some(r) = rotation {
            skeleton.set_rotation(Quat::from_array(r).normalize());
            changed.push("rotation");
        }
        if let Some(s) = scale {
            skeleton.set_scale(s);
            changed.push("scale");
        }
        DebugResponse::updated(format!("Skeleton {}", changed.join(", ")))
    }

    fn debug_draw(&self) -> DebugResponse {
        let mut recorder = DebugDrawRecorder::new();
        self.skeleton.read().debug_draw(&mut recorder, &self.style);
        DebugResponse::ok(ResponseData::DebugDraw {
            coordinate_frames: recorder.coordinates.len(),
            joints: recorder
                .joints
                .iter()
                .map(|line| JointLineInfo {
                    from: line.from.to_array(),
                    to: line.to.to_array(),
                    color: line.color.to_array(),
                })
                .collect(),
        })
    }
}

impl DebugHandler for AnimationInspector {
    fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse {
        match cmd {
            DebugCommand::Ping => DebugResponse::pong(),
            DebugCommand::ListTakes => self.list_takes(),
            DebugCommand::GetActiveTake => DebugResponse::ok(ResponseData::ActiveTake {
                active: self.animator.current_take().map(str::to_string),
            }),
            DebugCommand::SetActiveTake { name } => match self.animator.set_current_take(&name) {
                Ok(()) => DebugResponse::updated(format!("Active take {name:?}")),
                Err(e) => DebugResponse::error(e.to_string()),
            },
            DebugCommand::PlayTake { name, time } => match self.animator.play_take(&name, time) {
                Ok(()) => DebugResponse::updated(format!("Played {name:?} at {time}")),
                Err(e) => DebugResponse::error(e.to_string()),
            },
            DebugCommand::GetSkeletonInfo => self.skeleton_info(),
            DebugCommand::GetJoint { id, name } => self.joint(id, name.as_deref()),
            DebugCommand::GetJointUniforms => self.joint_uniforms(),
            DebugCommand::SetSkeletonTransform {
                translation,
                rotation,
                scale,
            } => self.set_skeleton_transform(translation, rotation, scale),
            DebugCommand::DebugDraw => self.debug_draw(),
        }
    }
}

fn joint_info(joint: &Joint) -> JointInfo {
    JointInfo {
        id: joint.id(),
        name: joint.name().to_string(),
        parent: joint.parent(),
        children: joint.children().to_vec(),
        model_space_transform: joint.model_space_transform().to_cols_array(),
        final_transform: joint.final_transform().to_cols_array(),
    }
}

#[derive(Default)]
struct UniformCollector(Vec<UniformInfo>);

impl UniformSink for UniformCollector {
    fn set_uniform_mat4(&mut self, name: &str, value: &Mat4) {
        self.0.push(UniformInfo {
            name: name.to_string(),
            matrix: value.to_cols_array(),
        });
    }
}
