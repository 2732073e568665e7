use crate::StopId;

/// How the session chooses its target stop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "mode", content = "stop_id"))]
pub enum TargetSelection {
    /// Follow the nearest stop as the location or stop list changes.
    #[default]
    Auto,
    /// Stay pinned to a specific stop until cleared.
    Manual(StopId),
}

impl TargetSelection {
    /// The pinned stop, if any.
    #[must_use]
    pub const fn pinned(&self) -> Option<&StopId> {
        match self {
            Self::Auto => None,
            Self::Manual(id) => Some(id),
        }
    }
}
