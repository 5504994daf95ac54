use thiserror::Error;

/// Errors that can occur while reading values from an incoming byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before the value could be fully read
    #[error("Unexpected end of payload: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A length-prefixed string did not contain valid UTF-8
    #[error("String payload of {length} bytes is not valid UTF-8")]
    InvalidUtf8 { length: usize },
}
