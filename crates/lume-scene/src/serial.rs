//! Byte codec for call nodes.
//!
//! The store persists call nodes as opaque byte blobs. Encoding is
//! bincode over the node's serde representation, which fixes the field
//! order to the struct declaration: module tag, definition tag, function
//! index, semantic, name, mutability flag, parameter types, return type,
//! arguments, guard conditions.

use std::fmt;

use crate::call::FunctionCall;

/// A (de)serialization failure.
#[derive(Debug)]
pub struct CodecError(bincode::Error);

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call node codec error: {}", self.0)
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Encode a call node's full state.
pub fn serialize(call: &FunctionCall) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(call).map_err(CodecError)
}

/// Decode a call node previously encoded with [`serialize`].
pub fn deserialize(bytes: &[u8]) -> Result<FunctionCall, CodecError> {
    bincode::deserialize(bytes).map_err(CodecError)
}
