//! Loading takes from animation files

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::take::{JointTransform, KeyFrame, Take};
use crate::core::error::Error;
use crate::core::types::Result;

/// Source of takes parsed from an animation asset
pub trait AnimationLoader {
    fn load_animations(&self, path: &Path) -> Result<Vec<Take>>;
}

/// Loads takes from a JSON document:
///
/// ```json
/// { "takes": [ { "name": "idle", "duration": 1.0, "num_frames": 2,
///     "keyframes": [ { "joint": "root", "samples": [
///         { "time": 0.0, "translation": [0, 0, 0] },
///         { "time": 1.0, "translation": [0, 1, 0], "rotation": [0, 0, 0, 1] } ] } ] } ] }
/// ```
///
/// Rotations are `[x, y, z, w]` quaternions and are normalized on load.
/// Omitted transform parts default to identity. Zero-length rotations and
/// non-finite components are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonTakeLoader;

impl JsonTakeLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse takes from an in-memory JSON document
    pub fn parse(&self, json: &str) -> Result<Vec<Take>> {
        let file: TakeFile = serde_json::from_str(json)?;
        file.takes.into_iter().map(TakeDesc::into_take).collect()
    }
}

impl AnimationLoader for JsonTakeLoader {
    fn load_animations(&self, path: &Path) -> Result<Vec<Take>> {
        let json = fs::read_to_string(path)?;
        let takes = self.parse(&json)?;
        log::debug!("Parsed {} takes from {}", takes.len(), path.display());
        Ok(takes)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TakeFile {
    takes: Vec<TakeDesc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TakeDesc {
    name: String,
    duration: f32,
    num_frames: u32,
    #[serde(default)]
    keyframes: Vec<KeyFrameDesc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyFrameDesc {
    joint: String,
    #[serde(default)]
    samples: Vec<SampleDesc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SampleDesc {
    time: f32,
    #[serde(default)]
    translation: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
}

impl SampleDesc {
    /// Build the sample transform, rejecting values that would poison the
    /// joint matrices with NaN
    fn transform(&self, joint: &str) -> Result<JointTransform> {
        let invalid = |reason| Error::InvalidSample {
            joint: joint.to_string(),
            time: self.time,
            reason,
        };

        let mut transform = JointTransform::default();
        if let Some(t) = self.translation {
            transform.translation = Vec3::from_array(t);
            if !transform.translation.is_finite() {
                return Err(invalid("non-finite translation"));
            }
        }
        if let Some(r) = self.rotation {
            let rotation = Vec4::from_array(r);
            if !rotation.is_finite() {
                return Err(invalid("non-finite rotation"));
            }
            let rotation = rotation.try_normalize().ok_or_else(|| invalid("zero-length rotation"))?;
            transform.rotation = Quat::from_vec4(rotation);
        }
        if let Some(s) = self.scale {
            transform.scale = Vec3::from_array(s);
            if !transform.scale.is_finite() {
                return Err(invalid("non-finite scale"));
            }
        }
        Ok(transform)
    }
}

impl TakeDesc {
    fn into_take(self) -> Result<Take> {
        let mut take = Take::new(self.name, self.duration, self.num_frames);
        for desc in self.keyframes {
            let mut keyframe = KeyFrame::new(desc.joint.clone());
            for sample in &desc.samples {
                keyframe.insert(sample.time, sample.transform(&desc.joint)?)?;
            }
            take.add_keyframe(keyframe);
        }
        Ok(take)
    }
}
