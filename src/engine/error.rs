use crate::model::{GroupId, TableId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Zero or oversized seat count for a table or party.
    InvalidSize(u32),
    DuplicateTable(TableId),
    /// The group was already seen (waiting, seated or departed).
    AlreadyTracked(GroupId),
    LimitExceeded(&'static str),
    InvalidConfig(String),
    ServiceUnavailable(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidSize(n) => write!(f, "invalid size: {n}"),
            EngineError::DuplicateTable(id) => write!(f, "duplicate table: {id}"),
            EngineError::AlreadyTracked(id) => write!(f, "group already tracked: {id}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            EngineError::ServiceUnavailable(e) => write!(f, "seating service unavailable: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
