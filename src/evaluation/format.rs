//! printf-style `%g` formatting for score output

/// Format `value` like C's `%.{precision}g`, with `%+` when `plus` is set
///
/// Uses the shortest of fixed and exponential notation the way `%g` does:
/// exponential when the decimal exponent is below -4 or at least
/// `precision`, trailing zeros removed in both forms.
pub fn format_g(value: f64, precision: usize, plus: bool) -> String {
    let body = if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value < 0.0 { "-inf" } else { "inf" }.to_string()
    } else if value == 0.0 {
        if value.is_sign_negative() { "-0" } else { "0" }.to_string()
    } else {
        let precision = precision.max(1);
        let sci = format!("{:.*e}", precision - 1, value);
        let (mantissa, exp) = match sci.split_once('e') {
            Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
            None => (sci.as_str(), 0),
        };

        if exp < -4 || exp >= precision as i32 {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
        } else {
            let decimals = (precision as i32 - 1 - exp).max(0) as usize;
            trim_fraction(&format!("{:.*}", decimals, value)).to_string()
        }
    };

    if plus && !body.starts_with('-') {
        format!("+{body}")
    } else {
        body
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
