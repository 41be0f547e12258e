//! Human-readable view of a recording.
//!
//! The binary document is canonical. This view exists for eyeballing a
//! capture and diffing two runs; nothing reads it back.
//!
//! ```text
//! HackName: null
//! MaterialCode: [Sand, NoCollide, Puddle, Lawn, Soil]
//! ActionName: [Wait, Move, ...]
//! ActionNameCap: [SpinCapStart, FlyingWaitR, StayR]
//! DataArray:
//! - [1.00, 2.00, 3.00, 0.00, 90.00, 0.00, !l 1, 0.000, !l 0, !l 0]
//! ```

use crate::recording::Recording;
use crate::schema::{
    ACTION_NAME_CAP_KEY, ACTION_NAME_KEY, DATA_ARRAY_KEY, HACK_NAME_KEY, MATERIAL_CODE_KEY,
};
use std::fmt;

/// Renders a recording as text through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct TextExport<'a>(pub &'a Recording);

impl fmt::Display for TextExport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rec = self.0;
        writeln!(f, "{HACK_NAME_KEY}: {}", rec.hack_name)?;
        writeln!(f, "{MATERIAL_CODE_KEY}: [{}]", rec.material_codes.join(", "))?;
        writeln!(f, "{ACTION_NAME_KEY}: [{}]", rec.action_names.join(", "))?;
        writeln!(f, "{ACTION_NAME_CAP_KEY}: [{}]", rec.action_name_caps.join(", "))?;
        writeln!(f, "{DATA_ARRAY_KEY}:")?;
        for frame in &rec.frames {
            let [x, y, z] = frame.position;
            let [roll, pitch, yaw] = frame.rotation;
            let [r0, r1] = frame.reserved();
            writeln!(
                f,
                "- [{x:.2}, {y:.2}, {z:.2}, {roll:.2}, {pitch:.2}, {yaw:.2}, !l {}, {:.3}, !l {r0}, !l {r1}]",
                frame.animation_id, frame.animation_frame
            )?;
        }
        Ok(())
    }
}

/// Renders a recording as text.
#[must_use]
pub fn to_text(recording: &Recording) -> String {
    TextExport(recording).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::schema::{ACTION_NAMES, ACTION_NAME_CAPS, MATERIAL_CODES};
    use freerun_codec::DocumentLayout;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn recording(frames: Vec<Frame>) -> Recording {
        Recording {
            hack_name: "null".to_string(),
            material_codes: strings(&MATERIAL_CODES),
            action_names: strings(&ACTION_NAMES),
            action_name_caps: strings(&ACTION_NAME_CAPS),
            frames,
            layout: DocumentLayout {
                version: 1,
                header_size: 0,
                payload_size: 0,
                key_count: 0,
                node_count: 0,
            },
        }
    }

    #[test]
    fn text_header_lines() {
        let text = to_text(&recording(Vec::new()));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "HackName: null");
        assert_eq!(lines[1], "MaterialCode: [Sand, NoCollide, Puddle, Lawn, Soil]");
        assert_eq!(lines[3], "ActionNameCap: [SpinCapStart, FlyingWaitR, StayR]");
        assert_eq!(lines[4], "DataArray:");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn text_frame_line() {
        let frame = Frame::new([1.0, -0.5, 2.25], [0.0, 90.0, 0.0]);
        let text = to_text(&recording(vec![frame]));

        assert_eq!(
            text.lines().last().unwrap(),
            "- [1.00, -0.50, 2.25, 0.00, 90.00, 0.00, !l 1, 0.000, !l 0, !l 0]"
        );
    }
}
