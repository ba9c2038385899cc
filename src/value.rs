//! Typed views over loosely-typed setting values
//!
//! Settings are stored as JSON scalars. [`SettingValue`] converts between the
//! stored representation and the concrete type a caller asks for, with a
//! fixed coercion table. A failed coercion is not an error: callers of
//! [`SettingsStore::get`](crate::SettingsStore::get) receive their supplied
//! default instead.
//!
//! The coercion table:
//!
//! | stored \ requested | `String` | `bool` | integer | `f64` |
//! |---|---|---|---|---|
//! | string | itself | `"true"`/`"false"`, trimmed, ASCII case-insensitive | trimmed decimal parse | trimmed float parse |
//! | number | decimal rendering | exactly `0` or `1` | integral and in range | lossless |
//! | bool | `"true"`/`"false"` | itself | `false` → 0, `true` → 1 | fails |
//! | null / array / object | fails | fails | fails | fails |

use serde_json::Value;

/// Conversion between a stored JSON scalar and a concrete setting type.
///
/// `from_value` returns `None` when the stored value cannot represent the
/// requested type; the store resolves that to the caller's default.
pub trait SettingValue: Sized {
    /// Coerce a stored JSON value into this type.
    fn from_value(value: &Value) -> Option<Self>;

    /// Convert this value into its stored JSON representation.
    fn into_value(self) -> Value;
}

impl SettingValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl SettingValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl SettingValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                // Accept integral floats such as 60.0
                n.as_f64().and_then(|f| {
                    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                        Some(f as i64)
                    } else {
                        None
                    }
                })
            }),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Number(self.into())
    }
}

impl SettingValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        serde_json::Number::from_f64(self).map_or(Value::Null, Value::Number)
    }
}

/// Narrower integer types coerce through `i64`; out-of-range values fail.
macro_rules! impl_setting_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SettingValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    i64::from_value(value).and_then(|n| n.try_into().ok())
                }

                fn into_value(self) -> Value {
                    Value::Number(self.into())
                }
            }
        )*
    };
}

impl_setting_value_int!(i32, u32, u64);

// =============================================================================
// Tests
// =============================================================================
