//! Runtime numbers produced by the semantic pass.
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Value::Int(i) => i == 0,
            Value::Float(f) => f == 0.0,
        }
    }

    pub fn is_truthy(self) -> bool {
        !self.is_zero()
    }

    /// `Some` when the value has no fractional part and fits an `i64`.
    pub fn as_integral(self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Some(f as i64)
            }
            Value::Float(_) => None,
        }
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Int(b as i64)
    }

    pub fn add(self, rhs: Value) -> Value {
        int_or_float(self, rhs, i64::checked_add, |a, b| a + b)
    }

    pub fn sub(self, rhs: Value) -> Value {
        int_or_float(self, rhs, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(self, rhs: Value) -> Value {
        int_or_float(self, rhs, i64::checked_mul, |a, b| a * b)
    }

    /// True division; the caller rules out a zero divisor.
    pub fn div(self, rhs: Value) -> Value {
        Value::Float(self.as_f64() / rhs.as_f64())
    }

    /// Remainder; the caller rules out a zero divisor.
    pub fn rem(self, rhs: Value) -> Value {
        int_or_float(self, rhs, i64::checked_rem, |a, b| a % b)
    }

    pub fn pow(self, rhs: Value) -> Value {
        if let (Value::Int(base), Value::Int(exp)) = (self, rhs) {
            if let Ok(exp) = u32::try_from(exp) {
                if let Some(v) = base.checked_pow(exp) {
                    return Value::Int(v);
                }
            }
        }
        Value::Float(self.as_f64().powf(rhs.as_f64()))
    }
}

fn int_or_float(
    lhs: Value,
    rhs: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        if let Some(v) = int_op(a, b) {
            return Value::Int(v);
        }
    }
    Value::Float(float_op(lhs.as_f64(), rhs.as_f64()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the ".0" on whole floats
            Value::Float(x) => write!(f, "{x:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_ops_stay_int_until_overflow() {
        assert_eq!(Value::Int(2).add(Value::Int(3)), Value::Int(5));
        assert_eq!(Value::Int(i64::MAX).add(Value::Int(1)), Value::Float(i64::MAX as f64 + 1.0));
        assert_eq!(Value::Int(2).mul(Value::Float(1.5)), Value::Float(3.0));
    }

    #[test]
    fn division_is_true_division() {
        assert_eq!(Value::Int(7).div(Value::Int(2)), Value::Float(3.5));
        assert_eq!(Value::Int(6).div(Value::Int(2)).as_integral(), Some(3));
    }

    #[test]
    fn power_rules() {
        assert_eq!(Value::Int(2).pow(Value::Int(10)), Value::Int(1024));
        assert_eq!(Value::Int(2).pow(Value::Int(-1)), Value::Float(0.5));
        assert_eq!(Value::Float(4.0).pow(Value::Float(0.5)), Value::Float(2.0));
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }
}
