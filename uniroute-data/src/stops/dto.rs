//! Wire format of the stop API.
//!
//! The API has served both PascalCase and camelCase field names, so every
//! field accepts either spelling. Identifiers may be integers or strings.
//! Entries without an identifier or a valid position are skipped with a
//! warning rather than failing the whole list.

use std::fmt;

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use uniroute_core::{Coordinate, Stop, StopId, StopSourceError, StopTime};

/// Identifier as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<WireId> for StopId {
    fn from(value: WireId) -> Self {
        match value {
            WireId::Number(number) => Self::from(number),
            WireId::Text(text) => Self::from(text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StopDto {
    #[serde(rename = "id", alias = "Id", default)]
    id: Option<WireId>,
    #[serde(rename = "name", alias = "Name", default)]
    name: Option<String>,
    #[serde(rename = "description", alias = "Description", default)]
    description: Option<String>,
    #[serde(rename = "latitude", alias = "Latitude", default)]
    latitude: Option<f64>,
    #[serde(rename = "longitude", alias = "Longitude", default)]
    longitude: Option<f64>,
    #[serde(rename = "addressDetails", alias = "AddressDetails", default)]
    address_details: Option<String>,
    #[serde(rename = "referencePoint", alias = "ReferencePoint", default)]
    reference_point: Option<String>,
    #[serde(rename = "stopTimes", alias = "StopTimes", default)]
    stop_times: Vec<StopTimeDto>,
}

#[derive(Debug, Deserialize)]
struct StopTimeDto {
    #[serde(rename = "id", alias = "Id")]
    id: WireId,
    #[serde(rename = "routeName", alias = "RouteName", default)]
    route_name: Option<String>,
    #[serde(rename = "arrivalTime", alias = "ArrivalTime")]
    arrival_time: String,
    #[serde(rename = "delay", alias = "Delay", default)]
    delay: Option<i32>,
}

impl From<StopTimeDto> for StopTime {
    fn from(dto: StopTimeDto) -> Self {
        Self {
            id: dto.id.to_string(),
            route_name: non_blank(dto.route_name),
            arrival_time: dto.arrival_time,
            delay_minutes: dto.delay,
        }
    }
}

/// A decoded stop with any arrivals embedded alongside it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StopEntry {
    pub(crate) stop: Stop,
    pub(crate) times: Vec<StopTime>,
}

impl StopDto {
    fn into_entry(self, index: usize) -> Option<StopEntry> {
        let Some(id) = self.id else {
            warn!("skipping stop #{index}: missing id");
            return None;
        };
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            warn!("skipping stop {id}: missing coordinates");
            return None;
        };
        let coordinate = match Coordinate::new(latitude, longitude) {
            Ok(coordinate) => coordinate,
            Err(err) => {
                warn!("skipping stop {id}: {err}");
                return None;
            }
        };

        let mut stop = Stop::new(id, coordinate);
        if let Some(name) = non_blank(self.name) {
            stop = stop.with_name(name);
        }
        if let Some(description) = non_blank(self.description) {
            stop = stop.with_description(description);
        }
        if let Some(address) = non_blank(self.address_details) {
            stop = stop.with_address_details(address);
        }
        if let Some(reference) = self.reference_point {
            stop = stop.with_reference_point(reference);
        }
        Some(StopEntry {
            stop,
            times: self.stop_times.into_iter().map(StopTime::from).collect(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_document(body: &str) -> Result<Vec<Value>, StopSourceError> {
    let document: Value = serde_json::from_str(body).map_err(|err| StopSourceError::Parse {
        message: err.to_string(),
    })?;
    match document {
        Value::Array(items) => Ok(items),
        other => {
            warn!("expected a JSON array of entries, got {}", kind_of(&other));
            Ok(Vec::new())
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode a stop list, skipping malformed entries.
///
/// # Errors
///
/// Returns [`StopSourceError::Parse`] when `body` is not JSON at all.
pub(crate) fn decode_stops(body: &str) -> Result<Vec<StopEntry>, StopSourceError> {
    let entries = parse_document(body)?
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<StopDto>(item) {
            Ok(dto) => dto.into_entry(index),
            Err(err) => {
                warn!("skipping stop #{index}: {err}");
                None
            }
        })
        .collect();
    Ok(entries)
}

/// Decode a list of arrivals, skipping malformed entries.
///
/// # Errors
///
/// Returns [`StopSourceError::Parse`] when `body` is not JSON at all.
pub(crate) fn decode_stop_times(body: &str) -> Result<Vec<StopTime>, StopSourceError> {
    let times = parse_document(body)?
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, item)| match serde_json::from_value::<StopTimeDto>(item) {
                Ok(dto) => Some(StopTime::from(dto)),
                Err(err) => {
                    warn!("skipping stop time #{index}: {err}");
                    None
                }
            },
        )
        .collect();
    Ok(times)
}
