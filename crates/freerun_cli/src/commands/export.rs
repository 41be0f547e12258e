//! Export command implementation.

use super::load_document;
use freerun_core::{to_text, Recording};
use std::fs;
use std::path::Path;

/// Runs the export command.
pub fn run(
    path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = render(path, format)?;

    match output {
        Some(out) => {
            fs::write(out, rendered)?;
            tracing::info!(path = %out.display(), "export written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Renders the recording at `path` in the requested format.
pub fn render(path: &Path, format: &str) -> Result<String, Box<dyn std::error::Error>> {
    let doc = load_document(path)?;

    match format {
        "json" => {
            let mut json = serde_json::to_string_pretty(&doc.root)?;
            json.push('\n');
            Ok(json)
        }
        _ => Ok(to_text(&Recording::from_document(doc)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::write_recording;

    #[test]
    fn export_text_lists_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_recording(dir.path(), &[[1.0, 2.0, 3.0]]);

        let text = render(&path, "text").unwrap();
        assert!(text.starts_with("HackName: null\n"));
        assert!(text.ends_with(
            "- [1.00, 2.00, 3.00, 0.00, 0.00, 0.00, !l 1, 0.000, !l 0, !l 0]\n"
        ));
    }

    #[test]
    fn export_json_is_value_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_recording(dir.path(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);

        let json: serde_json::Value =
            serde_json::from_str(&render(&path, "json").unwrap()).unwrap();
        assert_eq!(json["HackName"], "null");
        assert_eq!(json["MaterialCode"][0], "Sand");
        assert_eq!(json["DataArray"].as_array().unwrap().len(), 2);
        assert_eq!(json["DataArray"][1][0], 4.0);
        assert_eq!(json["DataArray"][1][6], 1);
    }

    #[test]
    fn export_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_recording(dir.path(), &[]);
        let out = dir.path().join("run.txt");

        run(&path, "text", Some(&out)).unwrap();
        assert!(fs::read_to_string(&out).unwrap().ends_with("DataArray:\n"));
    }
}
