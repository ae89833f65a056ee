//! Value
//!
//! The key an edge is recorded under: the value a harness chose at a decision point.
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

/// A chosen value.
///
/// Integers are kept exact, so two distinct 64-bit choices never share an
/// edge. Equality and hashing are numeric and total: `3_u8`, `3_i64` and
/// `3.0` are the same key, `-0.0` and `0.0` are the same key, and every NaN
/// is the same key.
#[derive(Clone, Copy, Debug)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// Canonical identity of a value.
#[derive(PartialEq, Eq, Hash)]
enum Key {
    Integral(i128),
    Float(u64),
}

// 2^127; every integral float below this converts to `i128` exactly.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

impl Value {
    pub fn new(v: f64) -> Self {
        Value::Float(v)
    }

    /// The numeric representation used as a training feature.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(i) => i as f64,
            Value::UInt(u) => u as f64,
            Value::Float(f) => f,
        }
    }

    fn key(&self) -> Key {
        match *self {
            Value::Int(i) => Key::Integral(i as i128),
            Value::UInt(u) => Key::Integral(u as i128),
            Value::Float(f) if f.is_nan() => Key::Float(f64::NAN.to_bits()),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < I128_BOUND => Key::Integral(f as i128),
            Value::Float(f) => Key::Float(f.to_bits()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

// JSON has no NaN or infinity, those are written as strings.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Value::Int(i) => serializer.serialize_i64(i),
            Value::UInt(u) => serializer.serialize_u64(u),
            Value::Float(f) if f.is_nan() => serializer.serialize_str("NaN"),
            Value::Float(f) if f == f64::INFINITY => serializer.serialize_str("inf"),
            Value::Float(f) if f == f64::NEG_INFINITY => serializer.serialize_str("-inf"),
            Value::Float(f) => serializer.serialize_f64(f),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, or one of \"NaN\", \"inf\", \"-inf\"")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::UInt(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        match v {
            "NaN" => Ok(Value::Float(f64::NAN)),
            "inf" => Ok(Value::Float(f64::INFINITY)),
            "-inf" => Ok(Value::Float(f64::NEG_INFINITY)),
            _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

macro_rules! value_from {
    ($variant:ident, $wide:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $wide)
                }
            }
        )*
    };
}

value_from!(Int, i64, i8, i16, i32, i64, isize);
value_from!(UInt, u64, u8, u16, u32, u64, usize);
value_from!(Float, f64, f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::UInt(v as u64)
    }
}
