use crate::model::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A host primitive rejected the call.
    #[error("host call failed: {0}")]
    Host(String),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("invalid settings: {0}")]
    Settings(#[source] serde_json::Error),

    #[error("invalid canvas data: {0}")]
    Data(#[source] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code for host-facing envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Host(_) => "host",
            Error::UnknownNode(_) => "unknown_node",
            Error::Settings(_) => "settings",
            Error::Data(_) => "data",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
