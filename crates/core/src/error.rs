use crate::state::StoreError;

/// Failure taxonomy shared by every transaction handler.
///
/// `op` fields carry the handler name (`"CreateAsset"`, `"ReadAssets"`, ...)
/// so a failure can be traced back to the transaction that produced it.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("the asset {cid} already exists")]
    AlreadyExists { cid: String },

    #[error("the asset {cid} does not exist")]
    NotFound { cid: String },

    #[error("invalid asset type: '{value}'")]
    InvalidEnumValue { value: String },

    #[error("{op}: failed to marshal asset: {source}")]
    Encoding {
        op: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{op}: failed to unmarshal asset: {source}")]
    Decoding {
        op: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{op}: failed to read from world state: {source}")]
    StoreRead {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{op}: failed to write to world state: {source}")]
    StoreWrite {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl CoreError {
    /// Name of the handler that failed, when the error carries one.
    pub fn op(&self) -> Option<&'static str> {
        match self {
            Self::Encoding { op, .. }
            | Self::Decoding { op, .. }
            | Self::StoreRead { op, .. }
            | Self::StoreWrite { op, .. } => Some(*op),
            Self::AlreadyExists { .. } | Self::NotFound { .. } | Self::InvalidEnumValue { .. } => {
                None
            }
        }
    }
}
