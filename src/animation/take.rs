//! Animation takes and per-joint keyframe tracks

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::math::compose_transform;

/// Sampled local transform of one joint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl JointTransform {
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::default()
        }
    }

    /// Interpolate towards `other`: lerp for translation and scale, slerp for rotation
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }

    /// Local joint matrix, `R * T * S`
    pub fn to_local_matrix(&self) -> Mat4 {
        compose_transform(self.translation, self.rotation, self.scale)
    }
}

impl Default for JointTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Time-sampled transforms of one joint, keyed by joint name.
/// Sample times are in frame units and kept sorted.
#[derive(Clone, Debug)]
pub struct KeyFrame {
    joint_name: String,
    samples: Vec<(f32, JointTransform)>,
}

impl KeyFrame {
    /// Create an empty track. An empty track leaves its joint unanimated.
    pub fn new(joint_name: impl Into<String>) -> Self {
        Self {
            joint_name: joint_name.into(),
            samples: Vec::new(),
        }
    }

    /// Insert a sample, keeping samples ordered by time.
    /// A sample at an existing time replaces it.
    pub fn insert(&mut self, time: f32, transform: JointTransform) -> Result<()> {
        if !time.is_finite() {
            return Err(Error::InvalidTimestamp {
                joint: self.joint_name.clone(),
                time,
            });
        }
        let pos = self.samples.partition_point(|(t, _)| *t < time);
        match self.samples.get_mut(pos) {
            Some(existing) if existing.0 == time => existing.1 = transform,
            _ => self.samples.insert(pos, (time, transform)),
        }
        Ok(())
    }

    /// Builder form of [`KeyFrame::insert`]
    pub fn with_sample(mut self, time: f32, transform: JointTransform) -> Result<Self> {
        self.insert(time, transform)?;
        Ok(self)
    }

    pub fn joint_name(&self) -> &str {
        &self.joint_name
    }

    pub fn samples(&self) -> &[(f32, JointTransform)] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample the track at a frame number.
    ///
    /// Brackets `frame` between the first sample later than it and that
    /// sample's predecessor. Frames before the first sample clamp to it and
    /// frames at or past the last sample hold the last one.
    pub fn sample(&self, frame: f32) -> JointTransform {
        let Some(&(_, first)) = self.samples.first() else {
            return JointTransform::default();
        };

        let next = self.samples.partition_point(|(t, _)| *t <= frame);
        if next == 0 {
            return first;
        }
        let (start_time, start) = self.samples[next - 1];
        let Some(&(end_time, end)) = self.samples.get(next) else {
            return start;
        };

        if frame - start_time < f32::EPSILON {
            return start;
        }
        let t = (frame - start_time) / (end_time - start_time);
        start.interpolate(&end, t)
    }
}

/// A named animation clip: one keyframe track per animated joint
#[derive(Clone, Debug)]
pub struct Take {
    name: String,
    duration: f32,
    num_frames: u32,
    keyframes: Vec<KeyFrame>,
    index: HashMap<String, usize>,
}

impl Take {
    /// Create a take lasting `duration` seconds over `num_frames` sampled frames
    pub fn new(name: impl Into<String>, duration: f32, num_frames: u32) -> Self {
        Self {
            name: name.into(),
            duration,
            num_frames,
            keyframes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a joint track, replacing any track for the same joint
    pub fn add_keyframe(&mut self, keyframe: KeyFrame) {
        match self.index.get(keyframe.joint_name()) {
            Some(&i) => self.keyframes[i] = keyframe,
            None => {
                self.index.insert(keyframe.joint_name().to_string(), self.keyframes.len());
                self.keyframes.push(keyframe);
            }
        }
    }

    pub fn with_keyframe(mut self, keyframe: KeyFrame) -> Self {
        self.add_keyframe(keyframe);
        self
    }

    /// Track for a joint, if the joint is animated by this take
    pub fn keyframe(&self, joint_name: &str) -> Option<&KeyFrame> {
        self.index.get(joint_name).map(|&i| &self.keyframes[i])
    }

    pub fn keyframes(&self) -> &[KeyFrame] {
        &self.keyframes
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn num_frames(&self) -> u32 {
        self.num_frames
    }

    /// Whether the duration can be used to map time to frames
    pub fn has_valid_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// Map game time to a frame number, looping over the duration.
    ///
    /// Frames span `0..=num_frames - 1`. Takes with fewer than two frames or
    /// an unusable duration always map to frame 0.
    pub fn frame_number(&self, time: f32) -> f32 {
        if !self.has_valid_duration() || self.num_frames < 2 || !time.is_finite() {
            return 0.0;
        }
        let wrapped = time.rem_euclid(self.duration);
        // rem_euclid rounds tiny negative times up to the duration itself
        let wrapped = if wrapped >= self.duration { 0.0 } else { wrapped };
        wrapped / self.duration * (self.num_frames - 1) as f32
    }

    /// Total number of samples across every track
    pub fn sample_count(&self) -> usize {
        self.keyframes.iter().map(KeyFrame::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn two_key_track() -> KeyFrame {
        KeyFrame::new("root")
            .with_sample(0.0, JointTransform::default())
            .unwrap()
            .with_sample(
                4.0,
                JointTransform::new(
                    Vec3::new(8.0, 0.0, 0.0),
                    Quat::from_rotation_y(FRAC_PI_2),
                    Vec3::splat(3.0),
                ),
            )
            .unwrap()
    }

    #[test]
    fn test_joint_transform_default() {
        let t = JointTransform::default();
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_local_matrix_order() {
        let t = JointTransform::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::splat(2.0),
        );
        // Rotation applies to the translation, scale does not
        let m = t.to_local_matrix();
        assert!(m.w_axis.truncate().abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
        assert!(m.x_axis.truncate().abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut track = KeyFrame::new("arm");
        track.insert(2.0, JointTransform::default()).unwrap();
        track.insert(0.0, JointTransform::default()).unwrap();
        track.insert(1.0, JointTransform::default()).unwrap();
        let times: Vec<f32> = track.samples().iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_insert_replaces_same_time() {
        let mut track = KeyFrame::new("arm");
        track.insert(1.0, JointTransform::default()).unwrap();
        track.insert(1.0, JointTransform::from_translation(Vec3::X)).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track.samples()[0].1.translation, Vec3::X);
    }

    #[test]
    fn test_insert_rejects_non_finite() {
        let mut track = KeyFrame::new("arm");
        let result = track.insert(f32::NAN, JointTransform::default());
        assert!(matches!(result, Err(Error::InvalidTimestamp { ref joint, .. }) if joint == "arm"));
        assert!(track.insert(f32::INFINITY, JointTransform::default()).is_err());
        assert!(track.is_empty());
    }

    #[test]
    fn test_empty_track_samples_identity() {
        let track = KeyFrame::new("arm");
        assert_eq!(track.sample(3.0), JointTransform::default());
    }

    #[test]
    fn test_sample_exact_keys() {
        let track = two_key_track();
        assert_eq!(track.sample(0.0), track.samples()[0].1);
        assert_eq!(track.sample(4.0), track.samples()[1].1);
    }

    #[test]
    fn test_sample_midpoint() {
        let track = two_key_track();
        let mid = track.sample(2.0);
        assert!(mid.translation.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
        assert!(mid.scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
        let expected = Quat::IDENTITY.slerp(Quat::from_rotation_y(FRAC_PI_2), 0.5);
        assert!(mid.rotation.abs_diff_eq(expected, 1e-5));
        assert!(mid.rotation.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2 / 2.0), 1e-5));
    }

    #[test]
    fn test_sample_clamps_outside_range() {
        let track = KeyFrame::new("arm")
            .with_sample(1.0, JointTransform::from_translation(Vec3::X))
            .unwrap()
            .with_sample(2.0, JointTransform::from_translation(Vec3::Y))
            .unwrap();
        assert_eq!(track.sample(0.0).translation, Vec3::X);
        assert_eq!(track.sample(5.0).translation, Vec3::Y);
    }

    #[test]
    fn test_single_sample_track() {
        let track = KeyFrame::new("arm")
            .with_sample(3.0, JointTransform::from_translation(Vec3::Z))
            .unwrap();
        assert_eq!(track.sample(0.0).translation, Vec3::Z);
        assert_eq!(track.sample(10.0).translation, Vec3::Z);
    }

    #[test]
    fn test_take_keyframe_lookup() {
        let take = Take::new("walk", 1.0, 30)
            .with_keyframe(KeyFrame::new("hip"))
            .with_keyframe(two_key_track());
        assert_eq!(take.keyframes().len(), 2);
        assert!(take.keyframe("root").is_some());
        assert!(take.keyframe("head").is_none());
        assert_eq!(take.sample_count(), 2);
    }

    #[test]
    fn test_take_replaces_keyframe() {
        let mut take = Take::new("walk", 1.0, 30);
        take.add_keyframe(two_key_track());
        take.add_keyframe(KeyFrame::new("root"));
        assert_eq!(take.keyframes().len(), 1);
        assert!(take.keyframe("root").unwrap().is_empty());
    }

    #[test]
    fn test_frame_number() {
        let take = Take::new("walk", 2.0, 5);
        assert_eq!(take.frame_number(0.0), 0.0);
        assert_eq!(take.frame_number(1.0), 2.0);
        assert_eq!(take.frame_number(2.5), 1.0);
        // Negative time wraps forward
        assert_eq!(take.frame_number(-0.5), 3.0);
    }

    #[test]
    fn test_frame_number_wraps_just_below_zero() {
        let take = Take::new("idle", 1.0, 2);
        assert_eq!(take.frame_number(-1e-8), 0.0);
        assert_eq!(take.frame_number(-1e-8), take.frame_number(1.0));
        assert!(take.frame_number(-1e-3) > 0.99);
    }

    #[test]
    fn test_frame_number_degenerate_takes() {
        assert_eq!(Take::new("zero", 0.0, 10).frame_number(1.3), 0.0);
        assert_eq!(Take::new("negative", -1.0, 10).frame_number(1.3), 0.0);
        assert_eq!(Take::new("nan", f32::NAN, 10).frame_number(1.3), 0.0);
        assert_eq!(Take::new("still", 1.0, 1).frame_number(0.7), 0.0);
        assert_eq!(Take::new("walk", 1.0, 10).frame_number(f32::INFINITY), 0.0);
        assert!(!Take::new("zero", 0.0, 10).has_valid_duration());
    }
}
