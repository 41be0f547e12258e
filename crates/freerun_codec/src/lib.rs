//! # Freerun Codec
//!
//! Hierarchical binary documents for Freerun recordings.
//!
//! A document is a tree of maps, arrays, and scalars (strings, 32-bit ints,
//! 32-bit floats). It is written once and sealed:
//!
//! 1. Build the tree with [`DocumentBuilder`]'s stack API
//! 2. Query [`DocumentBuilder::header_size`] and
//!    [`DocumentBuilder::payload_size`] to size the destination exactly
//! 3. [`DocumentBuilder::serialize`] into any [`freerun_storage::Stream`]
//!
//! [`read_document`] parses the bytes back into a [`Value`] tree for
//! inspection and tests.
//!
//! ## Usage
//!
//! ```
//! use freerun_codec::{read_document, DocumentBuilder, Value};
//!
//! let mut doc = DocumentBuilder::new();
//! doc.begin_map(None).unwrap();
//! doc.add_int(Some("count"), 2).unwrap();
//! doc.end().unwrap();
//!
//! let bytes = doc.to_bytes().unwrap();
//! let decoded = read_document(&bytes).unwrap();
//! assert_eq!(decoded.get("count"), Some(&Value::Int(2)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod error;
mod format;
mod reader;
mod value;

pub use builder::DocumentBuilder;
pub use error::{CodecError, CodecResult};
pub use format::{NodeKind, FORMAT_TAG, FORMAT_VERSION};
pub use reader::{read_document, Document, DocumentLayout, DocumentReader};
pub use value::Value;
