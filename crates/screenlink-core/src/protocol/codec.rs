//! JSON codec for values kept in the shared store.
//!
//! Stored values are plain JSON text.  Decoding is strict about shape (a
//! screen entry missing `lastUpdated` is rejected) so callers can skip
//! malformed entries instead of acting on half-read data.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur while encoding or decoding a stored value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be serialized.
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored text is not valid JSON of the expected shape.
    #[error("malformed stored value: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encodes `value` as compact JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails (e.g. a non-finite
/// float inside a type that rejects it).
pub fn encode_value<T: Serialize>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(CodecError::Encode)
}

/// Decodes JSON text into `T`.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the text is not valid JSON or does not
/// match the shape of `T`.
pub fn decode_value<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::screen::ScreenEntry;
    use crate::protocol::keys::VideoTime;

    #[test]
    fn test_decode_screen_entry_from_wire_json() {
        // Arrange
        let text = r#"{"screenX":10,"screenY":-20,"screenWidth":1920,"screenHeight":1080,
                       "width":640,"height":480,"lastUpdated":1700000000000}"#;

        // Act
        let entry: ScreenEntry = decode_value(text).expect("decode");

        // Assert
        assert_eq!(entry.screen_x, 10);
        assert_eq!(entry.screen_y, -20);
        assert_eq!(entry.last_updated, 1_700_000_000_000);
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let result: Result<ScreenEntry, _> = decode_value("{not json");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_entry_missing_fields() {
        let result: Result<ScreenEntry, _> = decode_value(r#"{"screenX":1,"screenY":2}"#);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_encode_video_time() {
        let text = encode_value(&VideoTime { time: 3.0 }).expect("encode");
        assert_eq!(text, r#"{"time":3.0}"#);
    }
}
