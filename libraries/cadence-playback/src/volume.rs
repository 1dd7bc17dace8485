//! Range limits for volume, rate and seek positions

/// Lowest accepted playback rate
pub const MIN_RATE: f32 = 0.5;

/// Highest accepted playback rate
pub const MAX_RATE: f32 = 2.0;

/// Clamp a volume into `[0, 1]`; `None` for NaN
pub fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        return None;
    }
    Some(volume.clamp(0.0, 1.0))
}

/// Clamp a playback rate into `[0.5, 2.0]`; `None` for NaN
pub fn clamp_rate(rate: f32) -> Option<f32> {
    if rate.is_nan() {
        return None;
    }
    Some(rate.clamp(MIN_RATE, MAX_RATE))
}

/// Clamp a seek target into `[0, duration]`
///
/// A duration of 0 means "not known yet"; only the lower bound applies then.
/// Returns `None` for NaN, or for an infinite target with no known duration.
pub fn clamp_position(time: f64, duration: f64) -> Option<f64> {
    if time.is_nan() {
        return None;
    }
    if duration.is_finite() && duration > 0.0 {
        return Some(time.clamp(0.0, duration));
    }
    time.is_finite().then(|| time.max(0.0))
}
