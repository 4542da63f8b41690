use std::fmt;

/// Hard failures from the remote store or allocator.
///
/// Unresolved parents are not errors — they are soft conditions carried
/// in [`crate::model::Disposition`]. Everything here aborts processing
/// and propagates to the caller.
#[derive(Debug)]
pub enum SyncError {
    /// Identifier allocator call failed; the pool cannot refill.
    Allocation { status: u16, body: String },
    /// Non-404 failure on an entity lookup.
    Lookup { status: u16, body: String },
    /// Non-200 response on an entity create/update.
    Write { status: u16, body: String },
    /// Transport-level failure (DNS, TLS, connection).
    Network(String),
    /// Response body did not have the expected shape.
    Parse(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { status, body } => {
                write!(f, "failed to allocate ids ({status}): {body}")
            }
            Self::Lookup { status, body } => {
                write!(f, "entity lookup failed ({status}): {body}")
            }
            Self::Write { status, body } => {
                write!(f, "entity write failed ({status}): {body}")
            }
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl SyncError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Allocation { status, .. }
            | Self::Lookup { status, .. }
            | Self::Write { status, .. } => Some(*status),
            Self::Network(_) | Self::Parse(_) => None,
        }
    }
}
