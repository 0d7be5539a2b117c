/// Placeholder for values that cannot be shown as a number.
pub const NOT_AVAILABLE: &str = "n/a";

/// Integer part of `value` with comma thousands separators: `12345.9` → `"12,345"`.
///
/// The fraction is truncated toward zero, not rounded. Non-finite input
/// renders as `"n/a"`.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let int = value.trunc() as i64;
    let digits = int.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if int < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Round to `decimals` places; exact halves go to the even neighbour.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
