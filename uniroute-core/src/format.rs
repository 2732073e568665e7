//! Human-readable distance and duration labels for the presentation layer.

/// Format a distance: whole metres below one kilometre, otherwise kilometres
/// with one decimal place.
///
/// # Examples
/// ```
/// use uniroute_core::format_distance;
///
/// assert_eq!(format_distance(0.1508), "151m");
/// assert_eq!(format_distance(1.26), "1.3km");
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "kilometre to metre conversion for display"
)]
#[must_use]
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{:.0}m", (distance_km * 1000.0).round())
    } else {
        format!("{distance_km:.1}km")
    }
}

/// Format walking minutes as `"12 min"` or `"1 h 5 min"`.
///
/// # Examples
/// ```
/// use uniroute_core::format_walking_time;
///
/// assert_eq!(format_walking_time(12), "12 min");
/// assert_eq!(format_walking_time(65), "1 h 5 min");
/// assert_eq!(format_walking_time(120), "2 h");
/// ```
#[must_use]
pub fn format_walking_time(minutes: u32) -> String {
    let hours = minutes / 60;
    let remainder = minutes % 60;
    match (hours, remainder) {
        (0, _) => format!("{remainder} min"),
        (_, 0) => format!("{hours} h"),
        _ => format!("{hours} h {remainder} min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0m")]
    #[case(0.9994, "999m")]
    #[case(1.0, "1.0km")]
    #[case(12.34, "12.3km")]
    fn formats_distances(#[case] km: f64, #[case] expected: &str) {
        assert_eq!(format_distance(km), expected);
    }

    #[rstest]
    #[case(0, "0 min")]
    #[case(59, "59 min")]
    #[case(60, "1 h")]
    #[case(61, "1 h 1 min")]
    fn formats_walking_time(#[case] minutes: u32, #[case] expected: &str) {
        assert_eq!(format_walking_time(minutes), expected);
    }
}
