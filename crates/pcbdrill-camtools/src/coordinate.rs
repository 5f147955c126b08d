//! Excellon coordinate decoding
//!
//! Turns a raw coordinate token plus the active [`FormatSpec`] into
//! millimeters. Tokens with an explicit decimal point are read as-is;
//! tokens without one are fixed-width digit strings whose alignment depends
//! on the zero suppression mode.

use pcbdrill_core::{FormatError, FormatSpec, ZeroSuppression};

/// Decode a coordinate token to millimeters.
///
/// # Errors
///
/// [`FormatError::InvalidToken`] for anything other than an optional sign,
/// digits and at most one decimal point, or for a digit string wider than
/// the format; [`FormatError::AmbiguousDecimal`]
/// when the token has no decimal point and the format has no decimal digits.
pub fn decode(token: &str, spec: &FormatSpec) -> Result<f64, FormatError> {
    let raw = token.trim();
    let (sign, body) = split_sign(raw);

    if body.is_empty() {
        return Err(invalid(raw, "no digits"));
    }

    if let Some(bad) = body.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
        return Err(invalid(raw, format!("unexpected character '{}'", bad)));
    }

    let magnitude = if body.contains('.') {
        if body.matches('.').count() > 1 {
            return Err(invalid(raw, "more than one decimal point"));
        }
        if body == "." {
            return Err(invalid(raw, "no digits"));
        }
        parse_decimal(raw, body)?
    } else {
        if spec.decimal_digits == 0 {
            return Err(FormatError::AmbiguousDecimal {
                token: raw.to_string(),
            });
        }
        let width = usize::from(spec.integer_digits) + usize::from(spec.decimal_digits);
        if body.len() > width {
            return Err(invalid(
                raw,
                format!("{} digits do not fit format {}", body.len(), spec),
            ));
        }
        let normalized = place_decimal(body, spec);
        parse_decimal(raw, &normalized)?
    };

    Ok(sign * spec.unit.to_mm(magnitude))
}

/// Insert the implied decimal point into a digit-only string.
fn place_decimal(digits: &str, spec: &FormatSpec) -> String {
    let decimals = usize::from(spec.decimal_digits);
    match spec.zero_suppression {
        ZeroSuppression::Lz => {
            // Left-aligned: the integer field comes first and is complete.
            let int_len = digits.len().min(usize::from(spec.integer_digits));
            let (int_part, frac_part) = digits.split_at(int_len);
            format!("0{}.{}0", int_part, frac_part)
        }
        ZeroSuppression::Tz => {
            // Right-aligned: the last `decimals` characters are the fraction.
            if digits.len() <= decimals {
                format!("0.{:0>width$}", digits, width = decimals)
            } else {
                let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
                format!("{}.{}", int_part, frac_part)
            }
        }
    }
}

fn parse_decimal(token: &str, text: &str) -> Result<f64, FormatError> {
    text.parse::<f64>()
        .map_err(|e| invalid(token, format!("not a number: {}", e)))
}

fn split_sign(raw: &str) -> (f64, &str) {
    if let Some(rest) = raw.strip_prefix('-') {
        (-1.0, rest)
    } else if let Some(rest) = raw.strip_prefix('+') {
        (1.0, rest)
    } else {
        (1.0, raw)
    }
}

fn invalid(token: &str, reason: impl Into<String>) -> FormatError {
    FormatError::InvalidToken {
        token: token.to_string(),
        reason: reason.into(),
    }
}
