//! Document reader.
//!
//! Parses the binary layout back into a [`Value`] tree. The reader shares
//! only the layout constants with the builder, so it doubles as an
//! independent check of what the builder wrote.

use crate::error::{CodecError, CodecResult};
use crate::format::{NodeKind, FORMAT_TAG};
use crate::value::Value;
use bytes::Buf;
use serde::Serialize;

/// Decode a document from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a well-formed document.
pub fn read_document(bytes: &[u8]) -> CodecResult<Value> {
    DocumentReader::new(bytes).read().map(|doc| doc.root)
}

/// Region sizes of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentLayout {
    /// Format version from the tag.
    pub version: u8,
    /// Bytes in the header region.
    pub header_size: u64,
    /// Bytes in the payload region.
    pub payload_size: u64,
    /// Entries in the key table.
    pub key_count: u32,
    /// Node descriptors in the header.
    pub node_count: u32,
}

/// A fully parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Root container.
    pub root: Value,
    /// Key table in stored order.
    pub keys: Vec<String>,
    /// Region sizes.
    pub layout: DocumentLayout,
}

#[derive(Debug, Clone, Copy)]
struct Descriptor {
    kind: NodeKind,
    key: Option<u32>,
    children: u32,
}

/// Containers still waiting for children while decoding.
struct Open {
    key: Option<String>,
    kind: NodeKind,
    expected: u32,
    items: Vec<(Option<String>, Value)>,
}

impl Open {
    fn finish(self) -> (Option<String>, Value) {
        let value = match self.kind {
            NodeKind::Map => Value::Map(
                self.items
                    .into_iter()
                    .map(|(k, v)| (k.unwrap_or_default(), v))
                    .collect(),
            ),
            _ => Value::Array(self.items.into_iter().map(|(_, v)| v).collect()),
        };
        (self.key, value)
    }
}

/// A single-use document reader over a byte slice.
pub struct DocumentReader<'a> {
    data: &'a [u8],
    len: usize,
}

impl<'a> DocumentReader<'a> {
    /// Create a new reader for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            len: data.len(),
        }
    }

    /// Parses the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error on a bad tag, truncated input, invalid UTF-8, a key
    /// index out of range, an inconsistent tree, or trailing bytes.
    pub fn read(mut self) -> CodecResult<Document> {
        self.need(FORMAT_TAG.len())?;
        let found = [self.data.get_u8(), self.data.get_u8()];
        if found != FORMAT_TAG {
            return Err(CodecError::InvalidTag { found });
        }

        let keys = self.read_keys()?;
        let descriptors = self.read_descriptors(keys.len())?;
        let header_size = self.consumed();

        let root = self.read_payload(&descriptors, &keys)?;
        let payload_size = self.consumed() - header_size;

        if self.data.has_remaining() {
            return Err(CodecError::TrailingBytes {
                count: self.data.remaining(),
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let layout = DocumentLayout {
            version: found[1],
            header_size,
            payload_size,
            key_count: keys.len() as u32,
            node_count: descriptors.len() as u32,
        };

        Ok(Document { root, keys, layout })
    }

    fn consumed(&self) -> u64 {
        (self.len - self.data.remaining()) as u64
    }

    fn need(&self, n: usize) -> CodecResult<()> {
        if self.data.remaining() < n {
            return Err(CodecError::UnexpectedEof);
        }
        Ok(())
    }

    fn read_u32(&mut self) -> CodecResult<u32> {
        self.need(4)?;
        Ok(self.data.get_u32_le())
    }

    fn read_text(&mut self, len: usize) -> CodecResult<String> {
        self.need(len)?;
        let (bytes, rest) = self.data.split_at(len);
        self.data = rest;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    fn read_keys(&mut self) -> CodecResult<Vec<String>> {
        let count = self.read_u32()? as usize;
        // Each key needs at least its two-byte length prefix.
        if count > self.data.remaining() / 2 {
            return Err(CodecError::UnexpectedEof);
        }

        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            self.need(2)?;
            let len = self.data.get_u16_le() as usize;
            keys.push(self.read_text(len)?);
        }
        Ok(keys)
    }

    fn read_descriptors(&mut self, key_count: usize) -> CodecResult<Vec<Descriptor>> {
        let count = self.read_u32()? as usize;
        if count == 0 {
            return Err(CodecError::invalid_structure("document has no root"));
        }
        if count > self.data.remaining() {
            return Err(CodecError::UnexpectedEof);
        }

        let mut descriptors = Vec::with_capacity(count);
        // (kind, children still expected) for each open container
        let mut open: Vec<(NodeKind, u32)> = Vec::new();

        for i in 0..count {
            if i > 0 && open.is_empty() {
                return Err(CodecError::invalid_structure("nodes after the root"));
            }

            self.need(1)?;
            let byte = self.data.get_u8();
            let kind = NodeKind::try_from(byte)
                .map_err(|b| CodecError::invalid_structure(format!("unknown node kind {b}")))?;

            let keyed = matches!(open.last(), Some((NodeKind::Map, _)));
            let key = if keyed {
                let index = self.read_u32()?;
                if index as usize >= key_count {
                    return Err(CodecError::invalid_structure(format!(
                        "key index {index} out of range"
                    )));
                }
                Some(index)
            } else {
                None
            };

            if i == 0 && !kind.is_container() {
                return Err(CodecError::invalid_structure("root is not a container"));
            }

            let children = if kind.is_container() {
                self.read_u32()?
            } else {
                0
            };

            descriptors.push(Descriptor {
                kind,
                key,
                children,
            });

            if let Some((_, remaining)) = open.last_mut() {
                *remaining -= 1;
            }
            if children > 0 {
                open.push((kind, children));
            }
            while matches!(open.last(), Some((_, 0))) {
                open.pop();
            }
        }

        if !open.is_empty() {
            return Err(CodecError::invalid_structure(
                "node count smaller than declared children",
            ));
        }

        Ok(descriptors)
    }

    fn read_scalar(&mut self, kind: NodeKind) -> CodecResult<Value> {
        match kind {
            NodeKind::String => {
                let len = self.read_u32()? as usize;
                self.read_text(len).map(Value::Text)
            }
            NodeKind::Int => {
                self.need(4)?;
                Ok(Value::Int(self.data.get_i32_le()))
            }
            NodeKind::Float => {
                self.need(4)?;
                Ok(Value::Float(self.data.get_f32_le()))
            }
            NodeKind::Map | NodeKind::Array => {
                Err(CodecError::invalid_structure("container has no payload"))
            }
        }
    }

    fn read_payload(&mut self, descriptors: &[Descriptor], keys: &[String]) -> CodecResult<Value> {
        let mut open: Vec<Open> = Vec::new();

        for d in descriptors {
            let key = d.key.map(|k| keys[k as usize].clone());

            let mut finished = if d.kind.is_container() {
                let container = Open {
                    key,
                    kind: d.kind,
                    expected: d.children,
                    items: Vec::new(),
                };
                if d.children > 0 {
                    open.push(container);
                    None
                } else {
                    Some(container.finish())
                }
            } else {
                Some((key, self.read_scalar(d.kind)?))
            };

            while let Some((key, value)) = finished.take() {
                let Some(top) = open.last_mut() else {
                    // Descriptor validation guarantees the root is last.
                    return Ok(value);
                };
                top.items.push((key, value));
                if top.items.len() == top.expected as usize {
                    finished = open.pop().map(Open::finish);
                }
            }
        }

        Err(CodecError::invalid_structure("root never closed"))
    }
}
