//! Text rendering of engine output for display.

/// Render a value for a results panel: `-` for missing or `NaN`, otherwise at
/// most four fraction digits (half away from zero) with thousands grouping.
pub fn format_value(value: Option<f64>) -> String {
    let x = match value {
        Some(x) if !x.is_nan() => x,
        _ => return "-".to_string(),
    };
    let sign = if x.is_sign_negative() { "-" } else { "" };
    if x.is_infinite() {
        return format!("{sign}∞");
    }

    let (int_part, frac_part) = round_decimal(&format!("{}", x.abs()), 4);
    let grouped = group_thousands(&int_part);
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Like [`format_value`], but very small p-values read `< 0.0001`.
pub fn format_p_value(p: f64) -> String {
    if p < 0.0001 {
        "< 0.0001".to_string()
    } else {
        format_value(Some(p))
    }
}

/// Shortest round-trip text of a number, switching to exponent form
/// (`1e+21`, `1.5e-7`) outside `[1e-6, 1e21)`.
pub fn number_label(x: f64) -> String {
    let x = x + 0.0; // -0 prints as 0
    let magnitude = x.abs();
    if x == 0.0 || !x.is_finite() || (1e-6..1e21).contains(&magnitude) {
        return format!("{x}");
    }

    let exp_form = format!("{x:e}");
    match exp_form.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exp_form,
    }
}

/// Round a plain decimal string to `digits` fraction digits, half away from
/// zero, dropping trailing zeros. Returns the integer and fraction parts.
fn round_decimal(text: &str, digits: usize) -> (String, String) {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));

    if frac_part.len() <= digits {
        return (int_part.to_string(), frac_part.trim_end_matches('0').to_string());
    }

    let round_up = frac_part.as_bytes()[digits] >= b'5';
    let mut kept: Vec<u8> = int_part.bytes().chain(frac_part.bytes().take(digits)).collect();

    if round_up {
        let mut idx = kept.len();
        loop {
            if idx == 0 {
                kept.insert(0, b'1');
                break;
            }
            idx -= 1;
            if kept[idx] == b'9' {
                kept[idx] = b'0';
            } else {
                kept[idx] += 1;
                break;
            }
        }
    }

    let split = kept.len() - digits;
    let int_out = String::from_utf8_lossy(&kept[..split]).into_owned();
    let frac_out = String::from_utf8_lossy(&kept[split..])
        .trim_end_matches('0')
        .to_string();
    (int_out, frac_out)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(f64::NAN)), "-");
        assert_eq!(format_value(Some(18.0)), "18");
        assert_eq!(format_value(Some(22.142857142857142)), "22.1429");
        assert_eq!(format_value(Some(1234.56789)), "1,234.5679");
        assert_eq!(format_value(Some(-0.5)), "-0.5");
        assert_eq!(format_value(Some(0.03125)), "0.0313");
        assert_eq!(format_value(Some(9.99996)), "10");
        assert_eq!(format_value(Some(999999.99999)), "1,000,000");
        assert_eq!(format_value(Some(f64::INFINITY)), "∞");
    }

    #[test]
    fn test_format_p_value() {
        assert_eq!(format_p_value(0.00001), "< 0.0001");
        assert_eq!(format_p_value(0.0273), "0.0273");
    }

    #[test]
    fn test_number_label() {
        assert_eq!(number_label(23.0), "23");
        assert_eq!(number_label(2.5), "2.5");
        assert_eq!(number_label(-0.0), "0");
        assert_eq!(number_label(1e21), "1e+21");
        assert_eq!(number_label(1.5e-7), "1.5e-7");
        assert_eq!(number_label(0.000001), "0.000001");
    }
}
