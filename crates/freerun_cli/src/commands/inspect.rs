//! Inspect command implementation.

use super::load_document;
use freerun_core::Recording;
use serde::Serialize;
use std::path::Path;

/// Recording inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Recording path.
    pub path: String,
    /// Document format version.
    pub version: u8,
    /// Header region size in bytes.
    pub header_size: u64,
    /// Payload region size in bytes.
    pub payload_size: u64,
    /// Total size in bytes.
    pub total_size: u64,
    /// Node descriptors in the header.
    pub node_count: u32,
    /// Key table, in stored order.
    pub keys: Vec<String>,
    /// `HackName` value.
    pub hack_name: String,
    /// Number of recorded frames.
    pub frame_count: usize,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Collects layout and recording statistics for the file at `path`.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let doc = load_document(path)?;
    let keys = doc.keys.clone();
    let recording = Recording::from_document(doc)?;
    let layout = recording.layout;

    Ok(InspectResult {
        path: path.display().to_string(),
        version: layout.version,
        header_size: layout.header_size,
        payload_size: layout.payload_size,
        total_size: layout.header_size + layout.payload_size,
        node_count: layout.node_count,
        keys,
        hack_name: recording.hack_name,
        frame_count: recording.frames.len(),
    })
}

fn print_text_output(result: &InspectResult) {
    println!("Freerun Recording Inspection");
    println!("============================");
    println!();
    println!("Path:    {}", result.path);
    println!("Format:  v{}", result.version);
    println!();
    println!("Layout:");
    println!("  Header:  {}", format_size(result.header_size));
    println!("  Payload: {}", format_size(result.payload_size));
    println!("  Total:   {}", format_size(result.total_size));
    println!("  Nodes:   {}", result.node_count);
    println!();
    println!("Recording:");
    println!("  Hack name: {}", result.hack_name);
    println!("  Frames:    {}", result.frame_count);
    println!("  Keys:      {}", result.keys.join(", "));
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
