//! Time unit conversion at the player boundary.
//!
//! Players speak fractional seconds; everything inside the core is integer
//! milliseconds.

/// Convert player seconds to milliseconds, rounding down.
///
/// Returns `None` for negative or non-finite input, which players report
/// while a duration is still unknown.
pub fn secs_to_ms(secs: f64) -> Option<u64> {
    if secs.is_finite() && secs >= 0.0 {
        Some((secs * 1000.0).floor() as u64)
    } else {
        None
    }
}

/// Convert milliseconds to player seconds.
pub fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ms() {
        assert_eq!(secs_to_ms(0.0), Some(0));
        assert_eq!(secs_to_ms(1.5), Some(1500));
        assert_eq!(secs_to_ms(0.0019), Some(1));
        assert_eq!(secs_to_ms(-1.0), None);
        assert_eq!(secs_to_ms(f64::NAN), None);
        assert_eq!(secs_to_ms(f64::INFINITY), None);
    }

    #[test]
    fn test_ms_to_secs() {
        assert_eq!(ms_to_secs(0), 0.0);
        assert_eq!(ms_to_secs(90_500), 90.5);
    }
}
