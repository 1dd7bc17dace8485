//! Display helpers for playback positions

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up
///
/// Negative and non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Format seconds as `m:ss` with unbounded minutes; `--:--` for invalid input
pub fn format_time_short(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--".to_string();
    }

    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
