use std::fmt;

/// Errors produced while building, running or training a network.
#[derive(Debug)]
pub enum NetError {
    /// Adjacent layers disagree on their shared dimension.
    ArchitectureMismatch {
        /// Index the rejected layer would have had in the network.
        layer: usize,
        /// Output size of the previous layer.
        expected: usize,
        /// Input size of the rejected layer.
        got: usize,
    },

    /// A vector does not have the length the layer or network requires.
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "input", "target").
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// The network has no layers to run.
    EmptyNetwork,

    /// An operation was called out of protocol order.
    PreconditionViolation(&'static str),

    /// Invalid configuration — caught before any computation.
    InvalidConfig(String),

    /// Malformed dataset bytes.
    Dataset(String),

    Io(std::io::Error),

    Json(serde_json::Error),
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArchitectureMismatch { layer, expected, got } => write!(
                f,
                "architecture mismatch at layer {layer}: previous layer outputs {expected}, layer expects {got} inputs"
            ),
            Self::ShapeMismatch { what, expected, got } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            Self::EmptyNetwork => write!(f, "network has no layers"),
            Self::PreconditionViolation(msg) => write!(f, "precondition violated: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Dataset(msg) => write!(f, "dataset error: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for NetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, NetError>;
