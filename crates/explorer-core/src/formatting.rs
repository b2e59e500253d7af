/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use explorer_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // "0.50" → ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a listing price as whole US dollars with thousands separators.
///
/// # Examples
///
/// ```
/// use explorer_core::formatting::format_price;
///
/// assert_eq!(format_price(12_500.0), "$12,500");
/// assert_eq!(format_price(499.6), "$500");
/// assert_eq!(format_price(0.0), "$0");
/// ```
pub fn format_price(amount: f64) -> String {
    if amount < 0.0 {
        format!("$-{}", format_number(amount.abs(), 0))
    } else {
        format!("${}", format_number(amount, 0))
    }
}

/// Compact axis label for a dollar amount: `"$0"`, `"$950"`, `"$45k"`,
/// `"$1.2M"`.
///
/// # Examples
///
/// ```
/// use explorer_core::formatting::format_price_compact;
///
/// assert_eq!(format_price_compact(45_000.0), "$45k");
/// assert_eq!(format_price_compact(2_500.0), "$2.5k");
/// assert_eq!(format_price_compact(1_200_000.0), "$1.2M");
/// assert_eq!(format_price_compact(950.0), "$950");
/// ```
pub fn format_price_compact(amount: f64) -> String {
    let abs = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("${sign}{}M", trim_decimal(abs / 1_000_000.0))
    } else if abs >= 1_000.0 {
        format!("${sign}{}k", trim_decimal(abs / 1_000.0))
    } else {
        format!("${sign}{}", abs.round() as u64)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// One decimal place, dropped when it is zero (`45.0` → `"45"`).
fn trim_decimal(value: f64) -> String {
    let s = format!("{:.1}", value);
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_000.0, 0), "1,000");
    }

    #[test]
    fn test_format_number_millions() {
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_rounds_up() {
        assert_eq!(format_number(1.005, 2), "1.01");
    }

    // ── format_price ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(18_995.0), "$18,995");
        assert_eq!(format_price(1_000_000.0), "$1,000,000");
        assert_eq!(format_price(-250.0), "$-250");
    }

    // ── format_price_compact ─────────────────────────────────────────────────

    #[test]
    fn test_format_price_compact_thresholds() {
        assert_eq!(format_price_compact(0.0), "$0");
        assert_eq!(format_price_compact(999.0), "$999");
        assert_eq!(format_price_compact(1_000.0), "$1k");
        assert_eq!(format_price_compact(100_000.0), "$100k");
        assert_eq!(format_price_compact(1_000_000.0), "$1M");
    }
}
