/// Clamp a similarity value into [0, 1]. Non-finite input maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Whole-percent display of a [0, 1] value. Only for display; callers keep the raw value.
pub fn display_percent(value: f64) -> u8 {
    (clamp_unit(value) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(display_percent(0.82), 82);
        assert_eq!(display_percent(0.75), 75);
        assert_eq!(display_percent(0.9), 90);
        assert_eq!(display_percent(0.005), 1);
        assert_eq!(display_percent(1.7), 100);
        assert_eq!(display_percent(-0.2), 0);
        assert_eq!(display_percent(f64::NAN), 0);
    }
}
