// ---------------------------------------------------------------------------
// Number formatting for cards, tables and chart labels (en-US conventions)
// ---------------------------------------------------------------------------

/// How a KPI value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiFormat {
    Currency,
    Percentage,
    Number,
}

/// Whether a KPI change is good news, bad news or no news.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSentiment {
    Good,
    Bad,
    Neutral,
}

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render `value` with `decimals` fixed places, grouping the integer part.
/// With `trim`, trailing fractional zeros (and a bare point) are removed.
fn grouped(value: f64, decimals: usize, trim: bool) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };
    let frac = if trim { frac_part.trim_end_matches('0') } else { frac_part };
    let is_zero = int_part.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');

    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Grouped number with up to three fractional digits: `1234.5` → `1,234.5`.
pub fn format_number(value: f64) -> String {
    grouped(value, 3, true)
}

/// Grouped integer: `52340` → `52,340`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = group_digits(&digits);
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Dollar figure with exactly two decimals: `485.2` → `$485.20`.
pub fn format_currency(value: f64) -> String {
    let body = grouped(value, 2, false);
    match body.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${body}"),
    }
}

/// Dollar sign in front of [`format_number`]: `3000` → `$3,000`.
pub fn format_dollars(value: f64) -> String {
    let body = format_number(value);
    match body.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${body}"),
    }
}

/// One decimal place with a percent sign.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Compact dollar label for chart axes and bars: `$2.4M`, `$89.5K`.
pub fn format_compact_dollars(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{sign}${:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}${:.1}K", abs / 1_000.0)
    } else {
        format!("{sign}${abs:.0}")
    }
}

pub fn format_kpi(value: f64, format: KpiFormat) -> String {
    match format {
        KpiFormat::Currency => format_currency(value),
        KpiFormat::Percentage => format_percentage(value),
        KpiFormat::Number => format_number(value),
    }
}

/// Classify a KPI change.
///
/// Access, satisfaction and generic-fill metrics improve upward; every other
/// metric is a cost where a drop is good.
pub fn trend_sentiment(title: &str, change: f64) -> TrendSentiment {
    if change == 0.0 || !change.is_finite() {
        return TrendSentiment::Neutral;
    }
    let title = title.to_lowercase();
    let positive_is_good = ["access", "satisfaction", "generic"]
        .iter()
        .any(|k| title.contains(k));
    if (change > 0.0) == positive_is_good {
        TrendSentiment::Good
    } else {
        TrendSentiment::Bad
    }
}

/// `"2.8% vs last period"`, magnitude only; direction is shown by the arrow.
pub fn format_change(change: f64, label: Option<&str>) -> String {
    format!("{:.1}% {}", change.abs(), label.unwrap_or("vs last period"))
}

/// Arrow glyph for a change.
pub fn trend_arrow(change: f64) -> &'static str {
    if change > 0.0 {
        "▲"
    } else if change < 0.0 {
        "▼"
    } else {
        "–"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(24_580_000.0), "24,580,000");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(0.12345), "0.123");
        assert_eq!(format_number(-1500.25), "-1,500.25");
        assert_eq!(format_number(-0.0001), "0");
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(50_650), "50,650");
        assert_eq!(format_count(-1_000_000), "-1,000,000");
        assert_eq!(format_count(12), "12");
    }

    #[test]
    fn currency_has_two_decimals() {
        assert_eq!(format_currency(485.23), "$485.23");
        assert_eq!(format_currency(485.2), "$485.20");
        assert_eq!(format_currency(24_580_000.0), "$24,580,000.00");
        assert_eq!(format_currency(-12.5), "-$12.50");
    }

    #[test]
    fn dollars_follow_number_rules() {
        assert_eq!(format_dollars(3000.0), "$3,000");
        assert_eq!(format_dollars(125_000.0), "$125,000");
        assert_eq!(format_dollars(28.5), "$28.5");
    }

    #[test]
    fn kpi_formats() {
        assert_eq!(format_kpi(8.4, KpiFormat::Percentage), "8.4%");
        assert_eq!(format_kpi(96.24, KpiFormat::Percentage), "96.2%");
        assert_eq!(format_kpi(50_650.0, KpiFormat::Number), "50,650");
        assert_eq!(format_compact_dollars(2_460_000.0), "$2.5M");
        assert_eq!(format_compact_dollars(89_500.0), "$89.5K");
    }

    #[test]
    fn cost_metrics_improve_downward() {
        assert_eq!(trend_sentiment("PMPM Cost", -2.8), TrendSentiment::Good);
        assert_eq!(trend_sentiment("PMPM Cost", 1.0), TrendSentiment::Bad);
        assert_eq!(trend_sentiment("Cost Reduction", 2.1), TrendSentiment::Bad);
    }

    #[test]
    fn access_metrics_improve_upward() {
        assert_eq!(trend_sentiment("Member Access", 0.3), TrendSentiment::Good);
        assert_eq!(trend_sentiment("Generic Fill Rate", -1.0), TrendSentiment::Bad);
        assert_eq!(trend_sentiment("Member Access", 0.0), TrendSentiment::Neutral);
    }

    #[test]
    fn change_label() {
        assert_eq!(format_change(-2.8, None), "2.8% vs last period");
        assert_eq!(format_change(1.84, Some("YoY")), "1.8% YoY");
    }
}
