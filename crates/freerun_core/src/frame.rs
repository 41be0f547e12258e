//! One sampled frame of a recording.

use crate::error::{CoreError, CoreResult};
use freerun_codec::{CodecResult, DocumentBuilder, Value};
use glam::{EulerRot, Quat, Vec3};

/// Animation id written while animation capture is not implemented.
pub const PLACEHOLDER_ANIMATION_ID: i32 = 1;

/// Animation frame written while animation capture is not implemented.
pub const PLACEHOLDER_ANIMATION_FRAME: f32 = 0.0;

/// Number of scalars in a serialized frame record.
pub const FRAME_FIELD_COUNT: usize = 10;

/// A single recorded frame.
///
/// Serialized as a flat array of [`FRAME_FIELD_COUNT`] scalars:
///
/// ```text
/// [x, y, z, roll, pitch, yaw, animation_id, animation_frame, 0, 0]
///  f32 ×3   f32 ×3 (degrees)  i32           f32              i32 ×2
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// World-space position.
    pub position: [f32; 3],
    /// Roll (X), pitch (Y) and yaw (Z) in degrees.
    pub rotation: [f32; 3],
    /// Animation identifier.
    pub animation_id: i32,
    /// Animation frame.
    pub animation_frame: f32,
    reserved: [i32; 2],
}

impl Frame {
    /// Creates a frame with placeholder animation fields.
    #[must_use]
    pub const fn new(position: [f32; 3], rotation: [f32; 3]) -> Self {
        Self {
            position,
            rotation,
            animation_id: PLACEHOLDER_ANIMATION_ID,
            animation_frame: PLACEHOLDER_ANIMATION_FRAME,
            reserved: [0; 2],
        }
    }

    /// Samples a frame from a translation and orientation.
    ///
    /// The orientation is decomposed as `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    #[must_use]
    pub fn from_pose(translation: Vec3, orientation: Quat) -> Self {
        let (yaw, pitch, roll) = orientation.to_euler(EulerRot::ZYX);
        Self::new(
            translation.to_array(),
            [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()],
        )
    }

    /// Replaces the animation fields.
    #[must_use]
    pub const fn with_animation(mut self, id: i32, frame: f32) -> Self {
        self.animation_id = id;
        self.animation_frame = frame;
        self
    }

    /// Returns the two reserved integers.
    #[must_use]
    pub const fn reserved(&self) -> [i32; 2] {
        self.reserved
    }

    /// Appends this frame as an unkeyed array to the open container.
    ///
    /// # Errors
    ///
    /// Returns a codec contract error if no container is open, the open
    /// container is a map, or the document is sealed.
    pub fn append_to(&self, doc: &mut DocumentBuilder) -> CodecResult<()> {
        doc.begin_array(None)?;
        for v in self.position.iter().chain(&self.rotation) {
            doc.add_float(None, *v)?;
        }
        doc.add_int(None, self.animation_id)?;
        doc.add_float(None, self.animation_frame)?;
        for v in self.reserved {
            doc.add_int(None, v)?;
        }
        doc.end()
    }

    /// Decodes a frame record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecording` unless `value` is an array of exactly
    /// [`FRAME_FIELD_COUNT`] scalars of the expected types.
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| CoreError::invalid_recording("frame record is not an array"))?;
        if items.len() != FRAME_FIELD_COUNT {
            return Err(CoreError::invalid_recording(format!(
                "frame record has {} fields, expected {FRAME_FIELD_COUNT}",
                items.len()
            )));
        }

        let float = |i: usize| {
            items[i].as_float().ok_or_else(|| {
                CoreError::invalid_recording(format!("frame field {i} is not a float"))
            })
        };
        let int = |i: usize| {
            items[i].as_int().ok_or_else(|| {
                CoreError::invalid_recording(format!("frame field {i} is not an int"))
            })
        };

        Ok(Self {
            position: [float(0)?, float(1)?, float(2)?],
            rotation: [float(3)?, float(4)?, float(5)?],
            animation_id: int(6)?,
            animation_frame: float(7)?,
            reserved: [int(8)?, int(9)?],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(&b).all(|(x, y)| (x - y).abs() < EPS)
    }

    #[test]
    fn frame_identity_pose() {
        let frame = Frame::from_pose(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        assert_eq!(frame.position, [1.0, 2.0, 3.0]);
        assert!(close(frame.rotation, [0.0, 0.0, 0.0]));
        assert_eq!(frame.animation_id, PLACEHOLDER_ANIMATION_ID);
        assert_eq!(frame.animation_frame, PLACEHOLDER_ANIMATION_FRAME);
        assert_eq!(frame.reserved(), [0, 0]);
    }

    #[test]
    fn frame_single_axis_rotations() {
        let roll = Frame::from_pose(Vec3::ZERO, Quat::from_rotation_x(30f32.to_radians()));
        assert!(close(roll.rotation, [30.0, 0.0, 0.0]));

        let pitch = Frame::from_pose(Vec3::ZERO, Quat::from_rotation_y(20f32.to_radians()));
        assert!(close(pitch.rotation, [0.0, 20.0, 0.0]));

        let yaw = Frame::from_pose(Vec3::ZERO, Quat::from_rotation_z(-45f32.to_radians()));
        assert!(close(yaw.rotation, [0.0, 0.0, -45.0]));
    }

    #[test]
    fn frame_record_shape() {
        let frame = Frame::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]).with_animation(7, 0.5);

        let mut doc = DocumentBuilder::new();
        doc.begin_array(None).unwrap();
        frame.append_to(&mut doc).unwrap();
        doc.end().unwrap();

        // root + record + 10 scalars
        assert_eq!(doc.node_count(), 2 + FRAME_FIELD_COUNT);
        assert_eq!(doc.payload_size(), 4 * FRAME_FIELD_COUNT as u64);

        let root = freerun_codec::read_document(&doc.to_bytes().unwrap()).unwrap();
        let decoded = Frame::from_value(&root.as_array().unwrap()[0]).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn frame_from_value_rejects_wrong_arity() {
        let value = Value::Array(vec![Value::Float(0.0); 9]);
        assert!(matches!(
            Frame::from_value(&value),
            Err(CoreError::InvalidRecording { .. })
        ));
    }

    #[test]
    fn frame_from_value_rejects_wrong_types() {
        let mut items = vec![Value::Float(0.0); FRAME_FIELD_COUNT];
        items[6] = Value::Float(1.0);
        assert!(Frame::from_value(&Value::Array(items)).is_err());

        assert!(Frame::from_value(&Value::Int(3)).is_err());
    }
}
