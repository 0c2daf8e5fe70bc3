//! Formatting money amounts for text shown to users, e.g. in bill reminders.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `amount` as rupiah rounded to a whole number, with `.` separating
/// the thousands, e.g. "Rp150.000".
pub fn format_rupiah(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| rupiah_formatter("Rp"));

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| rupiah_formatter("-Rp"));

    let amount = amount.round();

    let (formatter, prefix) = if amount < 0.0 {
        (negative_fmt, "-Rp")
    } else if amount > 0.0 {
        (positive_fmt, "Rp")
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "Rp0".to_owned();
    };

    match formatter {
        Some(formatter) => formatter.fmt_string(amount.abs()),
        None => format!("{prefix}{}", amount.abs()),
    }
}

fn rupiah_formatter(prefix: &str) -> Option<Formatter> {
    let formatter = Formatter::currency(prefix)
        .and_then(|formatter| formatter.separator('.'))
        .map(|formatter| formatter.precision(Precision::Decimals(0)));

    match formatter {
        Ok(formatter) => Some(formatter),
        Err(error) => {
            tracing::error!("Could not create the rupiah formatter for {prefix:?}: {error:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_rupiah;

    #[test]
    fn zero_has_currency_prefix() {
        assert_eq!(format_rupiah(0.0), "Rp0");
        assert_eq!(format_rupiah(0.2), "Rp0");
    }

    #[test]
    fn thousands_are_separated_by_dots() {
        assert_eq!(format_rupiah(150_000.0), "Rp150.000");
        assert_eq!(format_rupiah(1_234_567.4), "Rp1.234.567");
        assert_eq!(format_rupiah(999.0), "Rp999");
    }

    #[test]
    fn negative_amount_has_sign_before_prefix() {
        assert_eq!(format_rupiah(-2_500.0), "-Rp2.500");
    }
}
