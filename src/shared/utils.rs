//! Utility functions and helpers

/// Calculate percentage change
pub fn calculate_percentage_change(old_value: f64, new_value: f64) -> f64 {
    if old_value > 0.0 {
        ((new_value - old_value) / old_value) * 100.0
    } else {
        0.0
    }
}

/// Format a USD amount for display
pub fn format_usd(value: f64) -> String {
    if value >= 1.0 {
        format!("${:.2}", value)
    } else {
        format!("${:.6}", value)
    }
}

/// Format a 24h volume figure in a compact form
pub fn format_volume(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.2}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

/// Format a signed percentage with its sign
pub fn format_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_change() {
        assert_eq!(calculate_percentage_change(100.0, 150.0), 50.0);
        assert_eq!(calculate_percentage_change(0.0, 150.0), 0.0);
    }

    #[test]
    fn test_volume_formatting() {
        assert_eq!(format_volume(2_500_000_000.0), "$2.50B");
        assert_eq!(format_volume(1_500_000.0), "$1.50M");
        assert_eq!(format_volume(12_345.0), "$12.35K");
        assert_eq!(format_volume(42.0), "$42.00");
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(format_percent(6.2), "+6.20%");
        assert_eq!(format_percent(-3.0), "-3.00%");
    }
}
