//! Marks cell parsing.
//!
//! Marks cells are free text typed by graders: `"85"`, `"7.5"`, `""`,
//! `"pending"`, occasionally `"85/100"`. Parsing never fails; anything
//! without a numeric value reads as "not yet graded".

/// Parse a marks cell.
///
/// Leading whitespace is skipped and the longest prefix matching a decimal
/// float literal (`[+-]digits[.digits][e[+-]digits]`, or `.digits...`) is
/// taken, so `"85/100"` yields `85.0`. Missing, blank, non-numeric and
/// non-finite cells yield `None`.
pub fn parse_marks(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim_start();
    let len = numeric_prefix_len(text.as_bytes());
    if len == 0 {
        return None;
    }
    text[..len].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Length in bytes of the float literal at the start of `s`, or 0.
fn numeric_prefix_len(s: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < s.len() && s[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(s.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_end = digits_from(i);
    let mut end = int_end;
    let mut mantissa_digits = int_end - i;

    if end < s.len() && s[end] == b'.' {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    // The exponent only counts if at least one digit follows it.
    if end < s.len() && matches!(s[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < s.len() && matches!(s[j], b'+' | b'-') {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }

    end
}
