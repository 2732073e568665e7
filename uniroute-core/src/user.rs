//! The signed-in user record as seen by the location core.
//!
//! Persistence and authentication live elsewhere; only the optional saved
//! address matters here.

use crate::Coordinate;

/// An address stored on the user record.
///
/// Coordinates are optional on the address form, so an address may exist
/// without a usable position.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedAddress {
    /// Street line as typed by the user.
    #[cfg_attr(feature = "serde", serde(default))]
    pub street: Option<String>,
    /// Position of the address, when the user supplied one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub coordinate: Option<Coordinate>,
}

impl SavedAddress {
    /// Address with a known position.
    #[must_use]
    pub const fn at(coordinate: Coordinate) -> Self {
        Self {
            street: None,
            coordinate: Some(coordinate),
        }
    }
}

/// The current user record.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentUser {
    /// Display name.
    pub name: String,
    /// Saved home or work address.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<SavedAddress>,
}

impl CurrentUser {
    /// Position of the saved address, if both exist.
    ///
    /// # Examples
    /// ```
    /// use uniroute_core::{Coordinate, CurrentUser, SavedAddress};
    ///
    /// let home = Coordinate { latitude: -7.12, longitude: -34.86 };
    /// let user = CurrentUser {
    ///     name: "Ana".into(),
    ///     address: Some(SavedAddress::at(home)),
    /// };
    /// assert_eq!(user.saved_coordinate(), Some(home));
    /// assert_eq!(CurrentUser::default().saved_coordinate(), None);
    /// ```
    #[must_use]
    pub fn saved_coordinate(&self) -> Option<Coordinate> {
        self.address.as_ref().and_then(|address| address.coordinate)
    }
}
