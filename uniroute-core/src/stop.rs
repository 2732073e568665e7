//! Transit stops and their identifiers.

use std::fmt;

use crate::Coordinate;

/// Placeholder the stop API uses for a missing reference point.
const MISSING_REFERENCE_POINT: &str = "N/A";

/// Identifier of a [`Stop`].
///
/// Stop sources hand out either integers or strings; both normalise to the
/// same textual form so `StopId::from(7)` equals `StopId::from("7")`.
///
/// # Examples
/// ```
/// use uniroute_core::StopId;
///
/// assert_eq!(StopId::from(7_u64), StopId::from("7"));
/// assert_eq!(StopId::from("A12").as_str(), "A12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StopId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StopId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<u64> for StopId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for StopId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::StopId;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawStopId {
        Signed(i64),
        Unsigned(u64),
        Text(String),
    }

    impl Serialize for StopId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.0)
        }
    }

    impl<'de> Deserialize<'de> for StopId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(match RawStopId::deserialize(deserializer)? {
                RawStopId::Signed(id) => Self::from(id),
                RawStopId::Unsigned(id) => Self::from(id),
                RawStopId::Text(id) => Self::from(id),
            })
        }
    }
}

/// A transit stop loaded from the stop source.
///
/// Stops are immutable for the lifetime of a session; a refreshed list
/// replaces the previous one wholesale.
///
/// # Examples
/// ```
/// use uniroute_core::{Coordinate, Stop};
///
/// let stop = Stop::new(1_u64, Coordinate { latitude: -23.56, longitude: -46.655 })
///     .with_name("Av. Paulista, 1000");
/// assert_eq!(stop.display_name(), "Av. Paulista, 1000");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Unique identifier.
    pub id: StopId,
    /// Human-readable name, if the source provides one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Position of the stop.
    pub coordinate: Coordinate,
    /// Free-form description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Street address text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address_details: Option<String>,
    /// Nearby landmark that helps riders find the stop.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference_point: Option<String>,
}

impl Stop {
    /// Construct a stop without metadata.
    pub fn new(id: impl Into<StopId>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: None,
            coordinate,
            description: None,
            address_details: None,
            reference_point: None,
        }
    }

    /// Set the stop name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the address text.
    #[must_use]
    pub fn with_address_details(mut self, address: impl Into<String>) -> Self {
        self.address_details = Some(address.into());
        self
    }

    /// Set the reference point. `"N/A"` and blank values are dropped.
    #[must_use]
    pub fn with_reference_point(mut self, reference_point: impl Into<String>) -> Self {
        let reference_point = reference_point.into();
        let trimmed = reference_point.trim();
        self.reference_point = if trimmed.is_empty() || trimmed == MISSING_REFERENCE_POINT {
            None
        } else {
            Some(reference_point)
        };
        self
    }

    /// Name for display, falling back to `"Stop <id>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| format!("Stop {}", self.id), str::to_owned)
    }
}
