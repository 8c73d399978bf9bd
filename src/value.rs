//! The decoded value tree.
//!
//! A `Value` is a deliberately narrow tagged union: a tree of scalars, byte strings,
//! and ordered containers. It carries no knowledge of the wire format that produced
//! it — `format` and `builder` are responsible for assembling one; this module only
//! gives the assembled tree a shape and a handful of accessors in the same vein as
//! other tagged-union value types (`as_foo` returning `Option<&Foo>`).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

/// A decoded MessagePack array.
///
/// Two shapes depending on [`crate::config::Config::use_list`] at decode time: a
/// growable `Vec` (the default) or an immutable boxed slice once the array is known
/// to be complete and will not be mutated further.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    List(Vec<Value>),
    Tuple(Box<[Value]>),
}

impl Array {
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Array::List(vec) => vec,
            Array::Tuple(boxed) => boxed,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// A decoded `str`-family payload.
///
/// `Text` when [`crate::config::Config::string_encoding`] was configured and the
/// bytes were (possibly lossily) decoded to UTF-8; `Bytes` when no encoding was
/// configured, in which case the payload is handed back exactly as it arrived on the
/// wire, undecoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Str {
    Text(String),
    Bytes(Vec<u8>),
}

impl Str {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Str::Text(s) => s.as_bytes(),
            Str::Bytes(b) => b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Str::Text(s) => Some(s),
            Str::Bytes(_) => None,
        }
    }
}

/// A fully decoded MessagePack value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Bin(Vec<u8>),
    Str(Str),
    Array(Array),
    /// Ordered key-value pairs. Duplicate keys have already been resolved last-wins
    /// by the builder unless an `object_pairs_hook` asked to see the raw pair list.
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bin(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&Str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }
}
