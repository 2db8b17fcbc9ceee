//! Shared rendering helpers used by every tool family.

/// Format a pnl decimal string to four places with an explicit sign for
/// non-negative values. Unparseable input is shown verbatim.
pub fn fmt_pnl(raw: &str) -> String {
    match raw.parse::<f64>() {
        Ok(value) => format!("{:+.4}", value),
        Err(_) => raw.to_string(),
    }
}

/// Pnl variant for optional fields; absent renders `N/A`.
pub fn fmt_opt_pnl(raw: &Option<String>) -> String {
    match raw {
        Some(v) => fmt_pnl(v),
        None => "N/A".to_string(),
    }
}

pub fn opt_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

pub fn opt_num<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "N/A".to_string(),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn running_label(is_running: bool) -> &'static str {
    if is_running {
        "RUNNING"
    } else {
        "STOPPED"
    }
}

pub fn role_label(role: i64) -> &'static str {
    match role {
        1 => "Admin",
        2 => "User",
        _ => "Unknown",
    }
}

pub fn risk_mode_label(code: &str) -> &'static str {
    match code {
        "1" => "Conservative",
        "2" => "Moderate",
        "3" => "Kamikaze",
        _ => "Unknown",
    }
}

pub fn bot_mode_label(code: &str) -> &'static str {
    match code {
        "n" => "Normal",
        "m" => "Manual",
        "gs" => "Graceful Stop",
        "t" => "TP Only",
        "p" => "Panic",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_pnl_positive_gets_plus_sign() {
        assert_eq!(fmt_pnl("1.5"), "+1.5000");
        assert_eq!(fmt_pnl("0"), "+0.0000");
    }

    #[test]
    fn test_fmt_pnl_negative_keeps_native_sign() {
        assert_eq!(fmt_pnl("-0.25"), "-0.2500");
    }

    #[test]
    fn test_fmt_pnl_rounds_to_four_places() {
        assert_eq!(fmt_pnl("12.345678"), "+12.3457");
    }

    #[test]
    fn test_fmt_pnl_unparseable_passes_through() {
        assert_eq!(fmt_pnl("n/a"), "n/a");
    }

    #[test]
    fn test_fmt_opt_pnl_absent() {
        assert_eq!(fmt_opt_pnl(&None), "N/A");
        assert_eq!(fmt_opt_pnl(&Some("2".to_string())), "+2.0000");
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(bot_mode_label("gs"), "Graceful Stop");
        assert_eq!(bot_mode_label("x"), "Unknown");
        assert_eq!(risk_mode_label("3"), "Kamikaze");
        assert_eq!(role_label(1), "Admin");
    }
}
