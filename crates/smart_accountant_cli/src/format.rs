//! Text rendering helpers for amounts and tables.

use num_format::{Locale, ToFormattedString};

/// Renders `value` with thousands separators and at most two decimals,
/// followed by the currency symbol.
pub fn format_amount(value: f64, currency: &str) -> String {
    format!("{} {currency}", format_number(value))
}

pub fn format_number(value: f64) -> String {
    let rounded = (value.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let mut out = String::new();
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&whole.to_formatted_string(&Locale::en));
    if cents > 0 {
        let fraction = format!("{cents:02}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

/// Label shown for an invoice status column.
pub fn status_label(paid: bool) -> &'static str {
    if paid {
        "مدفوعة"
    } else {
        "معلقة"
    }
}

/// Shortens `text` to `max_chars`, marking the cut with `…`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
