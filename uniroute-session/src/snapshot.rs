//! Read-only views of the session handed to the presentation layer.

use serde::Serialize;
use uniroute_core::{
    RouteSummary, Stop, StopId, StopSourceError, TargetSelection, UserLocation, Viewport,
};

/// Stop list failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopListFailure {
    /// Human-readable cause.
    pub message: String,
    /// Whether retrying the load may succeed.
    pub retryable: bool,
}

impl From<&StopSourceError> for StopListFailure {
    fn from(error: &StopSourceError) -> Self {
        Self {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

/// Everything needed to render the session at one point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionSnapshot {
    /// The user's position, when known.
    pub location: Option<UserLocation>,
    /// Stops in source order.
    pub stops: Vec<Stop>,
    /// How the target is chosen.
    pub selection: TargetSelection,
    /// The stop currently treated as the destination.
    pub resolved_target: Option<Stop>,
    /// Walking estimate to [`SessionSnapshot::resolved_target`].
    pub route_summary: Option<RouteSummary>,
    /// Whether a routed estimate is still pending.
    pub is_routing: bool,
    /// Suggested map viewport.
    pub viewport: Viewport,
    /// Last stop list failure, cleared by a successful load.
    pub stop_list_error: Option<StopListFailure>,
    /// No position could be obtained; the viewport shows the default centre.
    pub location_unavailable: bool,
}

/// Change notifications published by [`crate::LocationSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The user's position was replaced or cleared.
    LocationChanged(Option<UserLocation>),
    /// A new stop list was applied.
    StopsReplaced {
        /// Number of stops in the new list.
        count: usize,
    },
    /// The resolved target switched to another stop, or to none.
    TargetChanged(Option<StopId>),
    /// The walking estimate changed.
    RouteUpdated(Option<RouteSummary>),
    /// Loading the stop list failed; the previous list is kept.
    StopListLoadFailed(StopSourceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(StopSourceError::Server { url: "http://stops.test".to_owned(), status: 503 }, true)]
    #[case(StopSourceError::Unauthorized, false)]
    fn failure_carries_retry_hint(#[case] error: StopSourceError, #[case] retryable: bool) {
        let failure = StopListFailure::from(&error);
        assert_eq!(failure.retryable, retryable);
        assert_eq!(failure.message, error.to_string());
    }

    #[rstest]
    fn empty_snapshot_serialises_for_the_presentation_layer() {
        let value = serde_json::to_value(SessionSnapshot::default()).expect("serialise");
        assert_eq!(value.get("location"), Some(&json!(null)));
        assert_eq!(value.get("selection"), Some(&json!({ "mode": "auto" })));
        assert_eq!(value.get("is_routing"), Some(&json!(false)));
        assert_eq!(value.get("stops"), Some(&json!([])));
    }
}
