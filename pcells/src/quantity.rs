//! Physical lengths with exact decimal storage.
//!
//! Device parameters arrive as strings such as `"4u"` or `"0.13um"`, or as
//! bare numbers in metres. They are parsed once, at the boundary, into a
//! [`PhysicalQuantity`]; generators only ever see microns as `f64`.

use std::fmt::Display;
use std::str::FromStr;

use arcstr::ArcStr;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Engineering prefixes and their powers of ten, largest first.
const PREFIXES: [(&str, i32); 11] = [
    ("T", 12),
    ("G", 9),
    ("M", 6),
    ("k", 3),
    ("", 0),
    ("m", -3),
    ("u", -6),
    ("n", -9),
    ("p", -12),
    ("f", -15),
    ("a", -18),
];

/// An error parsing a [`PhysicalQuantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid quantity `{input}`: {reason}")]
pub struct ParseQuantityError {
    input: ArcStr,
    reason: &'static str,
}

impl ParseQuantityError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }
}

/// A length, stored exactly in metres.
///
/// The value is kept normalized, so `"4u"` and `"4.000um"` compare and hash equal.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PhysicalQuantity(Decimal);

impl PhysicalQuantity {
    /// Creates a quantity from a value in metres.
    pub fn from_metres(value: Decimal) -> Self {
        Self(value.normalize())
    }

    /// Creates a quantity from a value in microns.
    ///
    /// # Example
    ///
    /// ```
    /// # use pcells::PhysicalQuantity;
    /// let w = PhysicalQuantity::from_microns(0.13).unwrap();
    /// assert_eq!(w.to_string(), "130n");
    /// ```
    pub fn from_microns(value: f64) -> Result<Self, ParseQuantityError> {
        let um = Decimal::try_from(value)
            .map_err(|_| ParseQuantityError::new(&value.to_string(), "not a finite number"))?;
        // Sub-femtometre digits are floating-point noise.
        Ok(Self::from_metres(um.round_dp(9) * pow10(-6)))
    }

    /// The value in metres.
    #[inline]
    pub fn metres(&self) -> Decimal {
        self.0
    }

    /// The value in microns.
    pub fn to_microns(&self) -> f64 {
        match self.0.checked_mul(pow10(6)) {
            Some(um) => um.to_f64().unwrap_or(f64::NAN),
            None => self.0.to_f64().unwrap_or(f64::NAN) * 1e6,
        }
    }

    pub fn is_sign_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

fn pow10(exp: i32) -> Decimal {
    if exp >= 0 {
        Decimal::from(10i64.pow(exp as u32))
    } else {
        Decimal::new(1, exp.unsigned_abs())
    }
}

/// Splits `s` into its numeric part and its suffix.
fn split_number(s: &str) -> (&str, &str) {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    // An exponent only counts if digits follow it, so `1e` is not a number.
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    s.split_at(i)
}

/// Returns the power of ten denoted by a unit suffix.
///
/// A lone `m` is the milli prefix; a trailing `m` after any prefix is the metre unit.
fn suffix_exponent(suffix: &str) -> Option<i32> {
    let mut chars = suffix.chars();
    let Some(first) = chars.next() else {
        return Some(0);
    };
    let prefix = match first {
        'T' => 12,
        'G' => 9,
        'M' => 6,
        'k' => 3,
        'm' => -3,
        'u' | 'µ' | 'μ' => -6,
        'n' => -9,
        'p' => -12,
        'f' => -15,
        'a' => -18,
        _ => return None,
    };
    match chars.as_str() {
        "" | "m" => Some(prefix),
        _ => None,
    }
}

impl FromStr for PhysicalQuantity {
    type Err = ParseQuantityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ParseQuantityError::new(input, "empty string"));
        }
        let (number, suffix) = split_number(s);
        if number.is_empty() {
            return Err(ParseQuantityError::new(input, "expected a number"));
        }
        let exp = suffix_exponent(suffix.trim())
            .ok_or_else(|| ParseQuantityError::new(input, "unknown unit suffix"))?;
        let value = if number.contains(['e', 'E']) {
            Decimal::from_scientific(number)
        } else {
            Decimal::from_str(number)
        }
        .map_err(|_| ParseQuantityError::new(input, "malformed number"))?;
        let value = value
            .checked_mul(pow10(exp))
            .ok_or_else(|| ParseQuantityError::new(input, "out of range"))?;
        Ok(Self::from_metres(value))
    }
}

impl Display for PhysicalQuantity {
    /// Formats the quantity in engineering notation, e.g. `4u` or `130n`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_zero() {
            return write!(f, "0");
        }
        for (prefix, exp) in PREFIXES {
            let Some(scaled) = self.0.checked_mul(pow10(-exp)) else {
                continue;
            };
            if scaled.abs() >= Decimal::ONE || exp == -18 {
                return write!(f, "{}{prefix}", scaled.normalize());
            }
        }
        write!(f, "{}", self.0)
    }
}

/// Formats a value in engineering notation with up to four significant digits.
///
/// Used for derived electrical values such as resistance and capacitance.
pub fn format_engineering(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let exp = ((value.abs().log10() / 3.0).floor() as i32 * 3).clamp(-18, 12);
    let scaled = value / 10f64.powi(exp);
    let digits = (3 - scaled.abs().log10().floor() as i32).clamp(0, 3) as usize;
    let mut text = format!("{scaled:.digits$}");
    if text.contains('.') {
        text.truncate(text.trim_end_matches('0').trim_end_matches('.').len());
    }
    if let Some((prefix, _)) = PREFIXES.iter().find(|(_, e)| *e == exp) {
        text.push_str(prefix);
    }
    text
}

impl Serialize for PhysicalQuantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Text(String),
    Int(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for PhysicalQuantity {
    /// Accepts a string with an optional SI prefix, or a bare number of metres.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        match QuantityRepr::deserialize(deserializer)? {
            QuantityRepr::Text(s) => s.parse().map_err(D::Error::custom),
            QuantityRepr::Int(v) => Ok(Self::from_metres(Decimal::from(v))),
            QuantityRepr::Float(v) => Decimal::try_from(v)
                .map(|m| Self::from_metres(m.round_dp(15)))
                .map_err(|_| D::Error::custom(format!("invalid quantity `{v}`"))),
        }
    }
}

/// Serde helpers for integer counts written either as numbers or as strings.
pub mod count {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountRepr {
        Int(u32),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        use serde::de::Error;
        match CountRepr::deserialize(deserializer)? {
            CountRepr::Int(v) => Ok(v),
            CountRepr::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid count `{s}`"))),
        }
    }

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*value)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn q(s: &str) -> PhysicalQuantity {
        s.parse().unwrap()
    }

    #[test]
    fn parses_si_prefixes() {
        assert_eq!(q("4u").metres(), dec!(0.000004));
        assert_eq!(q("0.13um").metres(), dec!(0.00000013));
        assert_eq!(q("130n"), q("0.13u"));
        assert_eq!(q("4e-6"), q("4u"));
        assert_eq!(q("4E-6"), q("4µm"));
        assert_eq!(q("1.5").metres(), dec!(1.5));
        assert_eq!(q("2m").metres(), dec!(0.002));
        assert_eq!(q("2mm").metres(), dec!(0.002));
        assert_eq!(q("3k").metres(), dec!(3000));
        assert_eq!(q(" 10p ").metres(), dec!(0.00000000001));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<PhysicalQuantity>().is_err());
        assert!("u".parse::<PhysicalQuantity>().is_err());
        assert!("4x".parse::<PhysicalQuantity>().is_err());
        assert!("4uu".parse::<PhysicalQuantity>().is_err());
        assert!("1.2.3u".parse::<PhysicalQuantity>().is_err());
    }

    #[test]
    fn equal_values_hash_equal() {
        use std::collections::HashSet;
        let set: HashSet<_> = ["4u", "4.000um", "4000n", "4e-6"].into_iter().map(q).collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn formats_engineering_notation() {
        assert_eq!(q("4u").to_string(), "4u");
        assert_eq!(q("0.13u").to_string(), "130n");
        assert_eq!(q("1.5").to_string(), "1.5");
        assert_eq!(q("2500n").to_string(), "2.5u");
        assert_eq!(q("0").to_string(), "0");
        assert_eq!(q("-4u").to_string(), "-4u");
        assert_eq!(q(&q("1.14u").to_string()), q("1.14u"));
    }

    #[test]
    fn converts_to_microns() {
        assert_eq!(q("4u").to_microns(), 4.0);
        assert_eq!(q("0.13u").to_microns(), 0.13);
        assert_eq!(PhysicalQuantity::from_microns(1.14).unwrap(), q("1.14u"));
    }

    #[test]
    fn serde_accepts_strings_and_numbers() {
        let v: PhysicalQuantity = serde_json::from_str("\"4u\"").unwrap();
        assert_eq!(v, q("4u"));
        let v: PhysicalQuantity = serde_json::from_str("4e-6").unwrap();
        assert_eq!(v, q("4u"));
        let v: PhysicalQuantity = serde_json::from_str("2").unwrap();
        assert_eq!(v, q("2"));
        assert_eq!(serde_json::to_string(&q("130n")).unwrap(), "\"130n\"");
        assert!(serde_json::from_str::<PhysicalQuantity>("\"4 apples\"").is_err());
    }

    #[test]
    fn engineering_values() {
        assert_eq!(format_engineering(1234.6), "1.235k");
        assert_eq!(format_engineering(35.0), "35");
        assert_eq!(format_engineering(1.5e-15), "1.5f");
        assert_eq!(format_engineering(2.1666e-15), "2.167f");
        assert_eq!(format_engineering(-0.5), "-500m");
        assert_eq!(format_engineering(0.0), "0");
    }
}
