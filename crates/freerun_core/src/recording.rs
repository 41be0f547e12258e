//! Reading a persisted recording back.

use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;
use crate::schema::{
    ACTION_NAME_CAP_KEY, ACTION_NAME_KEY, DATA_ARRAY_KEY, HACK_NAME_KEY, MATERIAL_CODE_KEY,
};
use freerun_codec::{Document, DocumentLayout, DocumentReader, Value};
use freerun_storage::GrowableFileStore;
use std::path::Path;

/// A decoded recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// `HackName` value.
    pub hack_name: String,
    /// `MaterialCode` table.
    pub material_codes: Vec<String>,
    /// `ActionName` table.
    pub action_names: Vec<String>,
    /// `ActionNameCap` table.
    pub action_name_caps: Vec<String>,
    /// Frames in recording order.
    pub frames: Vec<Frame>,
    /// Region sizes of the source document.
    pub layout: DocumentLayout,
}

impl Recording {
    /// Reads the recording file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read, or a codec or
    /// `InvalidRecording` error if its contents are not a recording.
    pub fn read(path: impl AsRef<Path>) -> CoreResult<Self> {
        let store = GrowableFileStore::new(path.as_ref());
        let size = store.size()?;
        let len = usize::try_from(size).map_err(|_| {
            CoreError::invalid_recording(format!("file of {size} bytes cannot be addressed"))
        })?;
        let bytes = store.read_at(0, len)?;
        Self::from_bytes(&bytes)
    }

    /// Decodes a recording from its serialized bytes.
    ///
    /// # Errors
    ///
    /// Returns a codec error if `bytes` is not a well-formed document, or
    /// `InvalidRecording` if the document is not a recording.
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        Self::from_document(DocumentReader::new(bytes).read()?)
    }

    /// Interprets a decoded document as a recording.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecording` if a top-level key is missing or holds the
    /// wrong kind of value, or if a frame record is malformed.
    pub fn from_document(doc: Document) -> CoreResult<Self> {
        let root = &doc.root;
        if root.as_map().is_none() {
            return Err(CoreError::invalid_recording("root is not a map"));
        }

        let hack_name = field(root, HACK_NAME_KEY)?
            .as_text()
            .ok_or_else(|| CoreError::invalid_recording("HackName is not a string"))?
            .to_string();

        let frames = field(root, DATA_ARRAY_KEY)?
            .as_array()
            .ok_or_else(|| CoreError::invalid_recording("DataArray is not an array"))?
            .iter()
            .map(Frame::from_value)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            hack_name,
            material_codes: names(root, MATERIAL_CODE_KEY)?,
            action_names: names(root, ACTION_NAME_KEY)?,
            action_name_caps: names(root, ACTION_NAME_CAP_KEY)?,
            frames,
            layout: doc.layout,
        })
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

fn field<'a>(root: &'a Value, key: &str) -> CoreResult<&'a Value> {
    root.get(key)
        .ok_or_else(|| CoreError::invalid_recording(format!("missing {key}")))
}

fn names(root: &Value, key: &str) -> CoreResult<Vec<String>> {
    let items = field(root, key)?
        .as_array()
        .ok_or_else(|| CoreError::invalid_recording(format!("{key} is not an array")))?;
    items
        .iter()
        .map(|item| {
            item.as_text()
                .map(str::to_string)
                .ok_or_else(|| CoreError::invalid_recording(format!("{key} holds a non-string")))
        })
        .collect()
}
