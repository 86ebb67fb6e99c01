use std::fmt::Display;


/// A numeric value produced by the evaluator.
///
/// Integers stay integers as long as the operations applied to them are
/// closed over integers, anything else turns into a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// A fixed-width integer.
    Int(i64),
    /// A double precision float.
    Float(f64),
}

impl Number {
    /// The value as a float, possibly losing precision for very large integers.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v
        }
    }

    /// Absolute value as a float, used for bound checks.
    pub fn magnitude(self) -> f64 {
        self.as_f64().abs()
    }

    /// Returns the integer if this is [`Number::Int`].
    pub fn as_int(self) -> Option<i64> {
        match self {
            Number::Int(v) => Some(v),
            Number::Float(_) => None
        }
    }

    /// Whether the value is zero, of either sign.
    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(v) => v == 0,
            Number::Float(v) => v == 0.0
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl Display for Number {
    /// Integers print as plain decimals. Floats always carry a fractional
    /// part or an exponent, switching to exponent form below `1e-4` and from
    /// `1e16` on (`3.0`, `0.5`, `1e+16`, `1.5e-05`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{}", float_text(*v))
        }
    }
}

fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let text = value.to_string();
        if text.contains('.') { text } else { format!("{text}.0") }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}
