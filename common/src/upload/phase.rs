/// Identifies one orchestrated upload. A ticket goes stale as soon as a newer
/// file is dropped; results carrying a stale ticket are discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTicket {
    pub(crate) generation: u64,
    pub file_id: String,
}

/// Where the current upload slot stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    /// Nothing in flight.
    Idle,
    /// File registered, columns being read. There is no timeout: a read that
    /// never resolves keeps the slot here.
    Reading { file_id: String },
    /// Columns known, waiting out the settle delay before mapping.
    Settling { file_id: String },
    /// The wizard is open for this file.
    Mapping { file_id: String },
    /// The read failed; the message is shown to the user.
    Failed { file_id: String, message: String },
}

impl UploadPhase {
    /// Whether the dashboard should show its processing indicator.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Reading { .. } | Self::Settling { .. })
    }

    pub fn file_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Reading { file_id }
            | Self::Settling { file_id }
            | Self::Mapping { file_id }
            | Self::Failed { file_id, .. } => Some(file_id),
        }
    }
}
