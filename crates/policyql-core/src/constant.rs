//! Module: constant
//! Responsibility: render raw operands as target-language literals.
//! Does not own: operator selection or the effective operand type.
//! Boundary: every user-supplied operand reaches generated code through here.

use crate::{error::CompileError, operator::OperandStereotype, schema::DataType};

/// Render `raw` as a literal of `data_type`.
///
/// Numbers and booleans pass through unchanged once they are known to be
/// well-formed; strings and dates are quoted and escaped. String lists have
/// no literal form.
pub fn render_constant(
    data_type: DataType,
    raw: &str,
    stereotype: Option<OperandStereotype>,
) -> Result<String, CompileError> {
    match data_type {
        DataType::Number => {
            let allow_negative = stereotype != Some(OperandStereotype::TimeSpan);
            if is_decimal_literal(raw, allow_negative) {
                Ok(raw.to_string())
            } else {
                Err(CompileError::invalid_literal(data_type, raw))
            }
        }
        DataType::Boolean => match raw {
            "true" | "false" => Ok(raw.to_string()),
            _ => Err(CompileError::invalid_literal(data_type, raw)),
        },
        DataType::String => Ok(quote_string(raw)),
        DataType::Time => Ok(format!("Dates.parseIso({})", quote_string(raw))),
        DataType::StringList => Err(CompileError::UnsupportedConstant { data_type }),
    }
}

/// Quote `raw` as a string literal.
///
/// Backslash is escaped before quote and dollar so the escapes those
/// introduce are never escaped a second time.
#[must_use]
pub fn quote_string(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for ch in raw.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '$' => quoted.push_str("\\$"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');

    quoted
}

// [+-]? (digits (. digits?)? | . digits) ([eE] [+-]? digits)?
fn is_decimal_literal(raw: &str, allow_negative: bool) -> bool {
    let unsigned = match raw.as_bytes().first() {
        Some(b'-') if !allow_negative => return false,
        Some(b'-' | b'+') => &raw[1..],
        _ => raw,
    };

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };

    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => {
            digits(whole) && digits(fraction) && !(whole.is_empty() && fraction.is_empty())
        }
        None => !mantissa.is_empty() && digits(mantissa),
    };
    let exponent_ok = exponent.is_none_or(|exponent| {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);

        !exponent.is_empty() && digits(exponent)
    });

    mantissa_ok && exponent_ok
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileErrorKind;
    use proptest::prelude::*;

    // Reads a quoted literal back using the target language's escape rules.
    fn unquote(literal: &str) -> Option<String> {
        let body = literal.strip_prefix('"')?.strip_suffix('"')?;
        let mut out = String::new();
        let mut chars = body.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => out.push(chars.next()?),
                '"' => return None,
                _ => out.push(ch),
            }
        }

        Some(out)
    }

    #[test]
    fn string_escaping_is_order_sensitive() {
        let rendered = render_constant(DataType::String, "a\\\"$", None).unwrap();

        assert_eq!(rendered, r#""a\\\"\$""#);
    }

    #[test]
    fn string_without_specials_is_only_quoted() {
        assert_eq!(
            render_constant(DataType::String, "foo", None).unwrap(),
            "\"foo\""
        );
    }

    #[test]
    fn numbers_and_booleans_pass_through() {
        assert_eq!(render_constant(DataType::Number, "42", None).unwrap(), "42");
        assert_eq!(
            render_constant(DataType::Number, "-3.25", None).unwrap(),
            "-3.25"
        );
        assert_eq!(
            render_constant(DataType::Boolean, "false", None).unwrap(),
            "false"
        );
    }

    #[test]
    fn signed_and_exponent_numbers_pass_through() {
        for raw in ["+5", "1e3", "1.5E-3", "-2e+10", "1.", ".5", "0"] {
            assert_eq!(render_constant(DataType::Number, raw, None).unwrap(), raw);
        }
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        for raw in ["", "v", "1) || true", ".", "e3", "1e", "1e+", "NaN", "--1", "+-1", "1.2.3"] {
            let err = render_constant(DataType::Number, raw, None).unwrap_err();
            assert_eq!(err.kind(), CompileErrorKind::InvalidLiteral, "{raw:?}");
        }
    }

    #[test]
    fn time_spans_must_not_be_negative() {
        let span = Some(OperandStereotype::TimeSpan);

        assert_eq!(render_constant(DataType::Number, "30", span).unwrap(), "30");
        assert_eq!(render_constant(DataType::Number, "1e2", span).unwrap(), "1e2");
        for raw in ["-30", "-1e2"] {
            assert!(matches!(
                render_constant(DataType::Number, raw, span),
                Err(CompileError::InvalidLiteral { value, .. }) if value == raw
            ));
        }
    }

    #[test]
    fn booleans_accept_only_canonical_spellings() {
        assert!(render_constant(DataType::Boolean, "TRUE", None).is_err());
        assert!(render_constant(DataType::Boolean, "1", None).is_err());
    }

    #[test]
    fn time_wraps_escaped_value_in_parse_call() {
        assert_eq!(
            render_constant(DataType::Time, "2024-01-31T00:00:00Z", None).unwrap(),
            "Dates.parseIso(\"2024-01-31T00:00:00Z\")"
        );
        assert_eq!(
            render_constant(DataType::Time, "x\")", None).unwrap(),
            "Dates.parseIso(\"x\\\")\")"
        );
    }

    #[test]
    fn string_lists_have_no_constant_form() {
        assert_eq!(
            render_constant(DataType::StringList, "a", None),
            Err(CompileError::UnsupportedConstant {
                data_type: DataType::StringList
            })
        );
    }

    proptest! {
        #[test]
        fn quoted_strings_round_trip(raw in any::<String>()) {
            let quoted = quote_string(&raw);
            prop_assert_eq!(unquote(&quoted), Some(raw));
        }

        #[test]
        fn quoted_strings_never_close_early(raw in "[a-z\"\\\\$ ]{0,16}") {
            let quoted = quote_string(&raw);
            let body = &quoted[1..quoted.len() - 1];
            let mut escaped = false;
            for ch in body.chars() {
                prop_assert!(escaped || ch != '"');
                escaped = !escaped && ch == '\\';
            }
        }
    }
}
