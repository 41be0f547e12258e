//! Fixed top-level layout of a recording document.
//!
//! ```text
//! {
//!   HackName:      string
//!   MaterialCode:  [string; 5]
//!   ActionName:    [string; 11]
//!   ActionNameCap: [string; 3]
//!   DataArray:     [frame record, ...]
//! }
//! ```

use freerun_codec::{CodecResult, DocumentBuilder};

/// Key of the hack name string.
pub const HACK_NAME_KEY: &str = "HackName";

/// Key of the material code table.
pub const MATERIAL_CODE_KEY: &str = "MaterialCode";

/// Key of the action name table.
pub const ACTION_NAME_KEY: &str = "ActionName";

/// Key of the capture action name table.
pub const ACTION_NAME_CAP_KEY: &str = "ActionNameCap";

/// Key of the frame array.
pub const DATA_ARRAY_KEY: &str = "DataArray";

/// Surface materials, in table order.
pub const MATERIAL_CODES: [&str; 5] = ["Sand", "NoCollide", "Puddle", "Lawn", "Soil"];

/// Actions, in table order.
pub const ACTION_NAMES: [&str; 11] = [
    "Wait",
    "Move",
    "Jump",
    "Jump2",
    "Jump3",
    "SpinCapStart",
    "NoDamageDown",
    "DamageLand",
    "SquatStart",
    "JumpBroad",
    "JumpReverse",
];

/// Capture actions, in table order.
pub const ACTION_NAME_CAPS: [&str; 3] = ["SpinCapStart", "FlyingWaitR", "StayR"];

/// Opens the root map, writes the lookup tables and opens `DataArray`.
///
/// Frames are appended next; closing `DataArray` and the root is left to
/// the caller.
pub(crate) fn write_preamble(doc: &mut DocumentBuilder, hack_name: &str) -> CodecResult<()> {
    doc.begin_map(None)?;
    doc.add_string(Some(HACK_NAME_KEY), hack_name)?;
    write_table(doc, MATERIAL_CODE_KEY, &MATERIAL_CODES)?;
    write_table(doc, ACTION_NAME_KEY, &ACTION_NAMES)?;
    write_table(doc, ACTION_NAME_CAP_KEY, &ACTION_NAME_CAPS)?;
    doc.begin_array(Some(DATA_ARRAY_KEY))
}

fn write_table(doc: &mut DocumentBuilder, key: &str, names: &[&str]) -> CodecResult<()> {
    doc.begin_array(Some(key))?;
    for name in names {
        doc.add_string(None, name)?;
    }
    doc.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_leaves_data_array_open() {
        let mut doc = DocumentBuilder::new();
        write_preamble(&mut doc, "null").unwrap();

        assert_eq!(doc.depth(), 2);
        assert_eq!(doc.open_len(), Some(0));
        assert!(!doc.is_sealed());
    }

    #[test]
    fn preamble_node_count() {
        let mut doc = DocumentBuilder::new();
        write_preamble(&mut doc, "null").unwrap();

        // root, HackName, three tables with their strings, DataArray
        let expected = 1 + 1 + (1 + 5) + (1 + 11) + (1 + 3) + 1;
        assert_eq!(doc.node_count(), expected);
    }
}
