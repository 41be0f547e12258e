//! Binary layout constants.
//!
//! ```text
//! header
//!   tag         [u8; 2]     b'F', version
//!   key_count   u32
//!   keys        { len: u16, utf8 }  × key_count
//!   node_count  u32
//!   nodes       descriptor × node_count, pre-order
//!     kind        u8
//!     key_index   u32   only when the parent is a map
//!     child_count u32   only for maps and arrays
//! payload (scalars in pre-order)
//!   string      len: u32, utf8
//!   int         i32
//!   float       f32
//! ```
//!
//! All integers are little-endian.

/// Current format version.
pub const FORMAT_VERSION: u8 = 1;

/// Leading two bytes of every document.
pub const FORMAT_TAG: [u8; 2] = [b'F', FORMAT_VERSION];

/// Size of the fixed part of the header (tag + key count + node count).
pub(crate) const FIXED_HEADER_SIZE: u64 = 2 + 4 + 4;

/// Length prefix of a key in the key table.
pub(crate) const KEY_LEN_SIZE: u64 = 2;

/// Length prefix of a string in the payload.
pub(crate) const STRING_LEN_SIZE: u64 = 4;

/// Size of a key index or child count in a node descriptor.
pub(crate) const INDEX_SIZE: u64 = 4;

/// Size of an int or float payload value.
pub(crate) const SCALAR_SIZE: u64 = 4;

/// Node kind stored in the first byte of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeKind {
    /// Keyed container.
    Map = 0,
    /// Ordered container.
    Array = 1,
    /// UTF-8 string scalar.
    String = 2,
    /// 32-bit signed integer scalar.
    Int = 3,
    /// 32-bit float scalar.
    Float = 4,
}

impl NodeKind {
    /// Returns true for maps and arrays.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Map | NodeKind::Array)
    }
}

impl TryFrom<u8> for NodeKind {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(NodeKind::Map),
            1 => Ok(NodeKind::Array),
            2 => Ok(NodeKind::String),
            3 => Ok(NodeKind::Int),
            4 => Ok(NodeKind::Float),
            other => Err(other),
        }
    }
}
