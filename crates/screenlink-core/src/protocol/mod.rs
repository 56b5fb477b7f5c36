//! Shared store schema: key names and the JSON value codec.

pub mod codec;
pub mod keys;

pub use codec::{decode_value, encode_value, CodecError};
pub use keys::*;
