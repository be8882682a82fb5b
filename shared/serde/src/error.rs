use thiserror::Error;

/// Errors that can occur while reading a value from a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The buffer ended before the value was fully read
    #[error("Unexpected end of buffer after reading {bits_read} bits")]
    UnexpectedEnd { bits_read: usize },

    /// A tag / discriminant had no known meaning
    #[error("Invalid {kind} tag {tag} read from buffer")]
    InvalidTag { kind: &'static str, tag: u64 },

    /// A string was read which is not valid UTF-8
    #[error("String of {length} bytes read from buffer is not valid UTF-8")]
    InvalidUtf8 { length: usize },

    /// A decoded integer does not fit in the requested type
    #[error("Decoded integer {value} does not fit in {target}")]
    IntegerOutOfRange { value: i128, target: &'static str },

    /// A decoded length exceeds the configured limit
    #[error("Decoded {kind} length {length} exceeds the limit of {limit}")]
    LengthLimitExceeded {
        kind: &'static str,
        length: u64,
        limit: u64,
    },

    /// Values were nested deeper than the decoder allows
    #[error("Nested values exceed the depth limit of {limit}")]
    NestingLimitExceeded { limit: usize },
}
