//! Stack-based document builder.

use crate::error::{CodecError, CodecResult};
use crate::format::{
    NodeKind, FIXED_HEADER_SIZE, FORMAT_TAG, INDEX_SIZE, KEY_LEN_SIZE, SCALAR_SIZE,
    STRING_LEN_SIZE,
};
use crate::value::Value;
use bytes::{BufMut, BytesMut};
use freerun_storage::{MemoryStream, Stream};
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Body {
    Map(Vec<usize>),
    Array(Vec<usize>),
    Text(String),
    Int(i32),
    Float(f32),
}

impl Body {
    fn kind(&self) -> NodeKind {
        match self {
            Body::Map(_) => NodeKind::Map,
            Body::Array(_) => NodeKind::Array,
            Body::Text(_) => NodeKind::String,
            Body::Int(_) => NodeKind::Int,
            Body::Float(_) => NodeKind::Float,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    /// Index into the key table; present exactly when the parent is a map.
    key: Option<u32>,
    body: Body,
}

/// Builds a map/array/scalar tree and serializes it in one pass.
///
/// Nodes live in an arena in creation order. Because a container only
/// receives children while it is on top of the stack, creation order is
/// also pre-order, which is the order the binary layout stores them in.
///
/// The exact output size is known before anything is written:
/// [`header_size`](Self::header_size) plus
/// [`payload_size`](Self::payload_size) equals the byte count returned by
/// [`serialize`](Self::serialize).
///
/// # Example
///
/// ```rust
/// use freerun_codec::{read_document, DocumentBuilder};
///
/// let mut doc = DocumentBuilder::new();
/// doc.begin_map(None).unwrap();
/// doc.add_string(Some("name"), "run").unwrap();
/// doc.begin_array(Some("points")).unwrap();
/// doc.add_float(None, 1.5).unwrap();
/// doc.end().unwrap();
/// doc.end().unwrap();
///
/// let bytes = doc.to_bytes().unwrap();
/// assert_eq!(bytes.len() as u64, doc.header_size() + doc.payload_size());
/// let value = read_document(&bytes).unwrap();
/// assert_eq!(value.get("name").and_then(|v| v.as_text()), Some("run"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    nodes: Vec<Node>,
    keys: Vec<String>,
    key_index: HashMap<String, u32>,
    stack: Vec<usize>,
    sealed: bool,
}

impl DocumentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a map. `key` is required inside a map and forbidden elsewhere.
    ///
    /// # Errors
    ///
    /// Returns a contract error if the key rule is broken or the document
    /// is sealed.
    pub fn begin_map(&mut self, key: Option<&str>) -> CodecResult<()> {
        let index = self.attach(key, Body::Map(Vec::new()))?;
        self.stack.push(index);
        Ok(())
    }

    /// Opens an array. `key` is required inside a map and forbidden elsewhere.
    ///
    /// # Errors
    ///
    /// Returns a contract error if the key rule is broken or the document
    /// is sealed.
    pub fn begin_array(&mut self, key: Option<&str>) -> CodecResult<()> {
        let index = self.attach(key, Body::Array(Vec::new()))?;
        self.stack.push(index);
        Ok(())
    }

    /// Closes the innermost open container. Closing the root seals the
    /// document.
    ///
    /// # Errors
    ///
    /// Returns `Sealed` after the root is closed, or `UnbalancedEnd` if
    /// nothing was ever opened.
    pub fn end(&mut self) -> CodecResult<()> {
        if self.sealed {
            return Err(CodecError::Sealed);
        }
        self.stack.pop().ok_or(CodecError::UnbalancedEnd)?;
        if self.stack.is_empty() {
            self.sealed = true;
        }
        Ok(())
    }

    /// Appends a string to the open container.
    ///
    /// # Errors
    ///
    /// Returns a contract error if the key rule is broken, no container is
    /// open, or the document is sealed.
    pub fn add_string(&mut self, key: Option<&str>, value: &str) -> CodecResult<()> {
        if u32::try_from(value.len()).is_err() {
            return Err(CodecError::TooLarge {
                what: "string",
                len: value.len(),
            });
        }
        self.attach(key, Body::Text(value.to_string())).map(drop)
    }

    /// Appends an integer to the open container.
    ///
    /// # Errors
    ///
    /// Same as [`add_string`](Self::add_string).
    pub fn add_int(&mut self, key: Option<&str>, value: i32) -> CodecResult<()> {
        self.attach(key, Body::Int(value)).map(drop)
    }

    /// Appends a float to the open container.
    ///
    /// # Errors
    ///
    /// Same as [`add_string`](Self::add_string).
    pub fn add_float(&mut self, key: Option<&str>, value: f32) -> CodecResult<()> {
        self.attach(key, Body::Float(value)).map(drop)
    }

    /// Appends a whole subtree.
    ///
    /// # Errors
    ///
    /// Same as the individual operations it expands to.
    pub fn add_value(&mut self, key: Option<&str>, value: &Value) -> CodecResult<()> {
        match value {
            Value::Map(entries) => {
                self.begin_map(key)?;
                for (k, v) in entries {
                    self.add_value(Some(k), v)?;
                }
                self.end()
            }
            Value::Array(items) => {
                self.begin_array(key)?;
                for v in items {
                    self.add_value(None, v)?;
                }
                self.end()
            }
            Value::Text(s) => self.add_string(key, s),
            Value::Int(n) => self.add_int(key, *n),
            Value::Float(f) => self.add_float(key, *f),
        }
    }

    /// Returns true once the root container has been closed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Returns the number of open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the number of nodes added so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of children of the innermost open container.
    #[must_use]
    pub fn open_len(&self) -> Option<usize> {
        let top = *self.stack.last()?;
        match &self.nodes[top].body {
            Body::Map(children) | Body::Array(children) => Some(children.len()),
            _ => None,
        }
    }

    /// Byte size of the header: tag, key table, and node descriptors.
    #[must_use]
    pub fn header_size(&self) -> u64 {
        let keys: u64 = self
            .keys
            .iter()
            .map(|k| KEY_LEN_SIZE + k.len() as u64)
            .sum();
        let descriptors: u64 = self
            .nodes
            .iter()
            .map(|node| {
                let mut size = 1;
                if node.key.is_some() {
                    size += INDEX_SIZE;
                }
                if node.body.kind().is_container() {
                    size += INDEX_SIZE;
                }
                size
            })
            .sum();
        FIXED_HEADER_SIZE + keys + descriptors
    }

    /// Byte size of the payload: all scalar and string data.
    #[must_use]
    pub fn payload_size(&self) -> u64 {
        self.nodes
            .iter()
            .map(|node| match &node.body {
                Body::Map(_) | Body::Array(_) => 0,
                Body::Text(s) => STRING_LEN_SIZE + s.len() as u64,
                Body::Int(_) | Body::Float(_) => SCALAR_SIZE,
            })
            .sum()
    }

    /// Total serialized size.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.header_size() + self.payload_size()
    }

    /// Writes the header then the payload to `stream`.
    ///
    /// Returns the number of bytes written, which always equals
    /// [`total_size`](Self::total_size).
    ///
    /// # Errors
    ///
    /// Returns `NotSealed` if the root is still open (or was never opened),
    /// or a stream error if a write fails.
    pub fn serialize(&self, stream: &mut dyn Stream) -> CodecResult<u64> {
        if !self.sealed {
            return Err(CodecError::NotSealed);
        }

        let header = self.encode_header();
        let payload = self.encode_payload();
        debug_assert_eq!(header.len() as u64, self.header_size());
        debug_assert_eq!(payload.len() as u64, self.payload_size());

        stream.write(&header)?;
        stream.write(&payload)?;
        stream.flush()?;

        Ok((header.len() + payload.len()) as u64)
    }

    /// Serializes into a freshly allocated buffer.
    ///
    /// # Errors
    ///
    /// Returns `NotSealed` if the root is still open.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let size = usize::try_from(self.total_size()).map_err(|_| CodecError::TooLarge {
            what: "document",
            len: usize::MAX,
        })?;
        let mut stream = MemoryStream::zeroed(size);
        self.serialize(&mut stream)?;
        Ok(stream.into_inner())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn encode_header(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.header_size() as usize);

        buf.put_slice(&FORMAT_TAG);
        buf.put_u32_le(self.keys.len() as u32);
        for key in &self.keys {
            buf.put_u16_le(key.len() as u16);
            buf.put_slice(key.as_bytes());
        }

        buf.put_u32_le(self.nodes.len() as u32);
        for node in &self.nodes {
            buf.put_u8(node.body.kind() as u8);
            if let Some(key) = node.key {
                buf.put_u32_le(key);
            }
            if let Body::Map(children) | Body::Array(children) = &node.body {
                buf.put_u32_le(children.len() as u32);
            }
        }

        buf
    }

    #[allow(clippy::cast_possible_truncation)]
    fn encode_payload(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.payload_size() as usize);

        for node in &self.nodes {
            match &node.body {
                Body::Map(_) | Body::Array(_) => {}
                Body::Text(s) => {
                    buf.put_u32_le(s.len() as u32);
                    buf.put_slice(s.as_bytes());
                }
                Body::Int(n) => buf.put_i32_le(*n),
                Body::Float(f) => buf.put_f32_le(*f),
            }
        }

        buf
    }

    /// Validates the key rule against the open container and adds `body`.
    fn attach(&mut self, key: Option<&str>, body: Body) -> CodecResult<usize> {
        if self.sealed {
            return Err(CodecError::Sealed);
        }

        let key_slot = match self.stack.last() {
            None => {
                if !body.kind().is_container() {
                    return Err(CodecError::NoOpenContainer);
                }
                if let Some(k) = key {
                    return Err(CodecError::KeyNotAllowed { key: k.to_string() });
                }
                None
            }
            Some(&parent) => match (&self.nodes[parent].body, key) {
                (Body::Map(_), None) => return Err(CodecError::KeyRequired),
                (Body::Map(siblings), Some(k)) => {
                    if siblings.iter().any(|&s| self.key_of(s) == Some(k)) {
                        return Err(CodecError::DuplicateKey { key: k.to_string() });
                    }
                    Some(k)
                }
                (_, Some(k)) => {
                    return Err(CodecError::KeyNotAllowed { key: k.to_string() });
                }
                (_, None) => None,
            },
        };

        let key = match key_slot {
            Some(k) => Some(self.intern(k)?),
            None => None,
        };

        let index = self.nodes.len();
        self.nodes.push(Node { key, body });

        if let Some(&parent) = self.stack.last() {
            if let Body::Map(children) | Body::Array(children) = &mut self.nodes[parent].body {
                children.push(index);
            }
        }

        Ok(index)
    }

    fn key_of(&self, node: usize) -> Option<&str> {
        self.nodes[node]
            .key
            .map(|k| self.keys[k as usize].as_str())
    }

    fn intern(&mut self, key: &str) -> CodecResult<u32> {
        if let Some(&index) = self.key_index.get(key) {
            return Ok(index);
        }
        if u16::try_from(key.len()).is_err() {
            return Err(CodecError::TooLarge {
                what: "key",
                len: key.len(),
            });
        }
        let index = u32::try_from(self.keys.len()).map_err(|_| CodecError::TooLarge {
            what: "key table",
            len: self.keys.len(),
        })?;
        self.keys.push(key.to_string());
        self.key_index.insert(key.to_string(), index);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_document;

    fn nested() -> DocumentBuilder {
        let mut doc = DocumentBuilder::new();
        doc.begin_map(None).unwrap();
        doc.add_string(Some("name"), "koopa").unwrap();
        doc.begin_array(Some("rows")).unwrap();
        for row in 0..3 {
            doc.begin_array(None).unwrap();
            doc.add_int(None, row).unwrap();
            doc.add_float(None, row as f32 * 0.5).unwrap();
            doc.end().unwrap();
        }
        doc.end().unwrap();
        doc.end().unwrap();
        doc
    }

    #[test]
    fn builder_seals_on_root_end() {
        let doc = nested();
        assert!(doc.is_sealed());
        assert_eq!(doc.depth(), 0);
        assert_eq!(doc.node_count(), 1 + 1 + 1 + 3 * 3);
    }

    #[test]
    fn builder_header_bytes() {
        let mut doc = DocumentBuilder::new();
        doc.begin_map(None).unwrap();
        doc.add_int(Some("a"), 7).unwrap();
        doc.end().unwrap();

        let bytes = doc.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                b'F', 1, // tag
                1, 0, 0, 0, // key count
                1, 0, b'a', // key "a"
                2, 0, 0, 0, // node count
                0, 1, 0, 0, 0, // map, 1 child
                3, 0, 0, 0, 0, // int, key 0
                7, 0, 0, 0, // payload
            ]
        );
        assert_eq!(doc.header_size(), 23);
        assert_eq!(doc.payload_size(), 4);
    }

    #[test]
    fn builder_size_matches_written_bytes() {
        let doc = nested();
        let mut stream = MemoryStream::zeroed(doc.total_size() as usize);
        let written = doc.serialize(&mut stream).unwrap();
        assert_eq!(written, doc.header_size() + doc.payload_size());
        assert!(stream.end_of_input());
    }

    #[test]
    fn builder_keys_are_deduplicated() {
        let mut doc = DocumentBuilder::new();
        doc.begin_array(None).unwrap();
        for _ in 0..2 {
            doc.begin_map(None).unwrap();
            doc.add_int(Some("id"), 1).unwrap();
            doc.end().unwrap();
        }
        doc.end().unwrap();

        // fixed part, one key "id", then array + 2 × (unkeyed map + keyed int)
        assert_eq!(doc.header_size(), 10 + 4 + 5 + 2 * (5 + 5));
    }

    #[test]
    fn builder_map_requires_key() {
        let mut doc = DocumentBuilder::new();
        doc.begin_map(None).unwrap();
        assert!(matches!(doc.add_int(None, 1), Err(CodecError::KeyRequired)));
        assert!(matches!(doc.begin_array(None), Err(CodecError::KeyRequired)));
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn builder_array_rejects_key() {
        let mut doc = DocumentBuilder::new();
        doc.begin_array(None).unwrap();
        let result = doc.add_float(Some("x"), 1.0);
        assert!(matches!(result, Err(CodecError::KeyNotAllowed { .. })));
    }

    #[test]
    fn builder_root_rejects_key() {
        let mut doc = DocumentBuilder::new();
        let result = doc.begin_map(Some("root"));
        assert!(matches!(result, Err(CodecError::KeyNotAllowed { .. })));
    }

    #[test]
    fn builder_duplicate_key_rejected() {
        let mut doc = DocumentBuilder::new();
        doc.begin_map(None).unwrap();
        doc.add_int(Some("a"), 1).unwrap();
        let result = doc.add_string(Some("a"), "again");
        assert!(matches!(result, Err(CodecError::DuplicateKey { .. })));
    }

    #[test]
    fn builder_scalar_without_container_fails() {
        let mut doc = DocumentBuilder::new();
        assert!(matches!(
            doc.add_int(None, 1),
            Err(CodecError::NoOpenContainer)
        ));
    }

    #[test]
    fn builder_end_without_begin_fails() {
        let mut doc = DocumentBuilder::new();
        assert!(matches!(doc.end(), Err(CodecError::UnbalancedEnd)));
    }

    #[test]
    fn builder_rejects_changes_after_seal() {
        let mut doc = nested();
        assert!(matches!(doc.begin_map(None), Err(CodecError::Sealed)));
        assert!(matches!(doc.add_int(None, 1), Err(CodecError::Sealed)));
        assert!(matches!(doc.end(), Err(CodecError::Sealed)));
    }

    #[test]
    fn builder_serialize_requires_seal() {
        let mut doc = DocumentBuilder::new();
        assert!(matches!(doc.to_bytes(), Err(CodecError::NotSealed)));

        doc.begin_map(None).unwrap();
        let mut stream = MemoryStream::zeroed(64);
        assert!(matches!(
            doc.serialize(&mut stream),
            Err(CodecError::NotSealed)
        ));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn builder_undersized_stream_fails() {
        let doc = nested();
        let mut stream = MemoryStream::zeroed(doc.header_size() as usize);
        assert!(matches!(
            doc.serialize(&mut stream),
            Err(CodecError::Storage(_))
        ));
    }

    #[test]
    fn builder_open_len_tracks_top() {
        let mut doc = DocumentBuilder::new();
        assert_eq!(doc.open_len(), None);
        doc.begin_array(None).unwrap();
        doc.add_int(None, 1).unwrap();
        doc.add_int(None, 2).unwrap();
        assert_eq!(doc.open_len(), Some(2));
    }

    #[test]
    fn builder_add_value_matches_reader() {
        let value = Value::Map(vec![
            ("label".to_string(), Value::from("x")),
            (
                "grid".to_string(),
                Value::Array(vec![
                    Value::Array(vec![Value::Int(1), Value::Float(2.5)]),
                    Value::Array(vec![]),
                ]),
            ),
            ("empty".to_string(), Value::Map(vec![])),
        ]);

        let mut doc = DocumentBuilder::new();
        doc.add_value(None, &value).unwrap();
        assert!(doc.is_sealed());

        let decoded = read_document(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, value);
    }
}
