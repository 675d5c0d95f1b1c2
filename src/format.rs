//! Number formatting for KPI cards, axis labels and the data table.

/// `1234.5` → `"1,234.50"`.
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `1234.5` → `"$1,234.50"`, `-3.0` → `"-$3.00"`.
pub fn currency(value: f64) -> String {
    let s = thousands(value, 2);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${s}"),
    }
}

/// Profit margin with one decimal, or `N/A` when it is undefined.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "N/A".to_string(),
    }
}

/// Integer count with thousands separators.
pub fn count(n: usize) -> String {
    thousands(n as f64, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0.0, 2), "0.00");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(1234567.891, 2), "1,234,567.89");
    }

    #[test]
    fn currency_puts_sign_before_symbol() {
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(-3.0), "-$3.00");
        assert_eq!(currency(-0.001), "$0.00");
    }

    #[test]
    fn undefined_margin_is_na() {
        assert_eq!(percent(Some(20.0)), "20.0%");
        assert_eq!(percent(None), "N/A");
    }

    #[test]
    fn counts_have_separators() {
        assert_eq!(count(12345), "12,345");
    }
}
