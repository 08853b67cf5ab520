//! Human-readable distance and duration strings for progress summaries.

/// Format a distance in metres.
///
/// Below 1 km the value is rounded to the nearest 10 m ("850 m"); below
/// 100 km one decimal is kept ("1.2 km"); beyond that whole kilometres.
/// Negative or non-finite input formats as "0 m".
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters <= 0.0 {
        return "0 m".to_string();
    }
    if meters < 1_000.0 {
        let rounded = ((meters / 10.0).round() * 10.0) as u64;
        if rounded >= 1_000 {
            return "1.0 km".to_string();
        }
        return format!("{rounded} m");
    }
    let km = meters / 1_000.0;
    if km < 100.0 {
        format!("{km:.1} km")
    } else {
        format!("{} km", km.round() as u64)
    }
}

/// Format a duration in seconds: "45 s", "12 min", "1 h 05 min".
///
/// Negative or non-finite input formats as "0 s".
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0 s".to_string();
    }
    let total = seconds.round() as u64;
    if total < 60 {
        return format!("{total} s");
    }
    let minutes = (total + 30) / 60;
    if minutes < 60 {
        return format!("{minutes} min");
    }
    format!("{} h {:02} min", minutes / 60, minutes % 60)
}
