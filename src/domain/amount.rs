/// Amounts are plain `f64`: entries come from free-form user input and the
/// engine only guarantees finiteness, not a fixed precision.
pub type Amount = f64;

// ASCII rather than the locale's no-break space, so terminal columns line up.
const GROUP_SEPARATOR: char = ' ';
const DECIMAL_SEPARATOR: char = ',';

/// Coerce user text into a number, leniently.
///
/// Blank text is `0`, decimal literals (`"12"`, `"1."`, `".5"`, `"-2.5e3"`),
/// `Infinity` and unsigned `0x`/`0o`/`0b` integers are accepted; anything
/// else yields NaN rather than an error. Callers decide what NaN means.
pub fn to_number(input: &str) -> Amount {
    let input = input.trim();
    if input.is_empty() {
        return 0.0;
    }

    match input {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(input) {
        return value;
    }

    // `f64::from_str` also accepts "inf", "nan" and friends, so restrict the
    // alphabet to a plain decimal literal first.
    if !input
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }

    input.parse().unwrap_or(f64::NAN)
}

fn parse_radix_literal(input: &str) -> Option<Amount> {
    if input.len() < 2 || !input.starts_with('0') {
        return None;
    }
    let radix = match input.as_bytes()[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &input[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * radix as f64 + d as f64,
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

/// Format an amount for display.
/// Integral values print without decimals, everything else with exactly two,
/// and the integer part is grouped by thousands.
/// Example: 200.0 -> "200", 1234.5 -> "1 234,50", -0.333 -> "-0,33"
pub fn format_amount(value: Amount) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let integral = value.fract() == 0.0;
    let rendered = if integral {
        format!("{:.0}", value.abs())
    } else {
        format!("{:.2}", value.abs())
    };

    let (units, decimals) = match rendered.split_once('.') {
        Some((units, decimals)) => (units, Some(decimals)),
        None => (rendered.as_str(), None),
    };

    // Rounding can turn a tiny negative into zero; don't print "-0".
    let is_zero = units.chars().all(|c| c == '0')
        && decimals.is_none_or(|d| d.chars().all(|c| c == '0'));
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    let mut out = String::with_capacity(rendered.len() + units.len() / 3 + 1);
    out.push_str(sign);
    out.push_str(&group_thousands(units));
    if let Some(decimals) = decimals {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(decimals);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(c);
    }
    grouped
}
