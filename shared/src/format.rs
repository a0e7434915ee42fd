//! pt-BR display formatting for the estimator output.

/// Shown instead of an amount that cannot be rendered exactly.
pub const UNAVAILABLE: &str = "—";

/// `R$ 1.234,56`. Non-finite amounts, or ones too large to count in cents, render as
/// [`UNAVAILABLE`].
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round();
    if !cents.is_finite() || cents >= u64::MAX as f64 {
        return UNAVAILABLE.to_string();
    }
    let cents = cents as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}R$ {},{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// `"45 min"` under an hour, `"2h05"` otherwise.
pub fn format_duration(minutes: f64) -> String {
    let total = if minutes.is_finite() {
        minutes.max(0.0).round() as u64
    } else {
        0
    };
    if total < 60 {
        format!("{total} min")
    } else {
        format!("{}h{:02}", total / 60, total % 60)
    }
}

pub fn format_distance(km: f64) -> String {
    format!("{km:.1} km").replace('.', ",")
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    while value >= 1000 {
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.push(value.to_string());
    groups.reverse();
    groups.join(".")
}
