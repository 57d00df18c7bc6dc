//! Numeric safety for currency amounts. Every amount the core touches goes
//! through `sanitize` so a single corrupt record cannot poison aggregation
//! with NaN or infinity.

use serde::{Deserialize, Deserializer};

/// Non-finite values are coerced to zero rather than propagated.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Round-half-up at the cent boundary.
pub fn round2(value: f64) -> f64 {
    (sanitize(value) * 100.0).round() / 100.0
}

/// Deserialize an amount from a JSON number or a numeric string; both forms
/// occur in the wild. Malformed strings become zero.
pub fn de_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    let raw = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => n,
        RawAmount::Text(s) => s.trim().parse().unwrap_or(0.0),
    };
    Ok(sanitize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "de_lenient")]
        amount: f64,
    }

    #[test]
    fn sanitize_zeroes_non_finite() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize(12.5), 12.5);
    }

    #[test]
    fn round2_is_half_up_at_the_cent() {
        // 0.125 and 0.375 are exactly representable, so the half-cent case
        // is not disturbed by binary representation error
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(10.004), 10.0);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }

    #[test]
    fn lenient_amount_accepts_numbers_and_numeric_strings() {
        let w: Wrapper = serde_json::from_str(r#"{"amount": 42.5}"#).unwrap();
        assert_eq!(w.amount, 42.5);
        let w: Wrapper = serde_json::from_str(r#"{"amount": "42.5"}"#).unwrap();
        assert_eq!(w.amount, 42.5);
        let w: Wrapper = serde_json::from_str(r#"{"amount": " 7 "}"#).unwrap();
        assert_eq!(w.amount, 7.0);
    }

    #[test]
    fn lenient_amount_coerces_garbage_to_zero() {
        let w: Wrapper = serde_json::from_str(r#"{"amount": "not a number"}"#).unwrap();
        assert_eq!(w.amount, 0.0);
    }
}
