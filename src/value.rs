//! Tagged-union setting value
//!
//! A [`Value`] holds exactly one datum of a fixed set of primitive kinds or a
//! string. The kind of a value assigned to a key must always match the kind
//! of that key's declared default; changing a key's declared type after values
//! have been persisted requires a [`crate::Migration`] pass.
//!
//! Strings come in two ownership modes (see [`Str`]): borrowed references to
//! program-embedded literals, and owned fixed-capacity copies. Equality and
//! length are agnostic to the mode backing a given instance.

use core::fmt;

use crate::{FALSE_LITERAL, STR_CAPACITY, TRUE_LITERAL};

/// String value with explicit ownership mode
///
/// `Borrowed` points into immutable program-embedded memory and is never
/// copied. `Owned` holds a fixed-capacity copy made on construction.
#[derive(Debug, Clone)]
pub enum Str {
    /// Reference to a program-embedded string literal
    Borrowed(&'static str),
    /// Fixed-capacity copy (max [`STR_CAPACITY`] bytes)
    Owned(heapless::String<STR_CAPACITY>),
}

impl Str {
    /// Copy `text` into an owned buffer
    ///
    /// Returns `None` if `text` exceeds [`STR_CAPACITY`].
    pub fn copied(text: &str) -> Option<Self> {
        heapless::String::try_from(text).ok().map(Str::Owned)
    }

    /// View the string content, regardless of ownership mode
    pub fn as_str(&self) -> &str {
        match self {
            Str::Borrowed(s) => s,
            Str::Owned(s) => s.as_str(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<&'static str> for Str {
    fn from(s: &'static str) -> Self {
        Str::Borrowed(s)
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Str {}

impl PartialEq<&str> for Str {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind discriminant of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Str,
}

/// Setting value (closed sum over the supported kinds)
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(Str),
}

macro_rules! value_from {
    ($($prim:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$prim> for Value {
                fn from(v: $prim) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Str => Str,
}

impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Value::Str(Str::Borrowed(s))
    }
}

macro_rules! value_as {
    ($($fn_name:ident -> $prim:ty, $variant:ident),* $(,)?) => {
        $(
            /// Extract the held value, or `None` on kind mismatch
            pub fn $fn_name(&self) -> Option<$prim> {
                match self {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        )*
    };
}

impl Value {
    value_as! {
        as_bool -> bool, Bool,
        as_i8 -> i8, I8,
        as_u8 -> u8, U8,
        as_i16 -> i16, I16,
        as_u16 -> u16, U16,
        as_i32 -> i32, I32,
        as_u32 -> u32, U32,
        as_i64 -> i64, I64,
        as_u64 -> u64, U64,
        as_f32 -> f32, F32,
        as_f64 -> f64, F64,
    }

    /// View the held string, or `None` if the kind is not `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Kind discriminant of the held value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::I8(_) => ValueKind::I8,
            Value::U8(_) => ValueKind::U8,
            Value::I16(_) => ValueKind::I16,
            Value::U16(_) => ValueKind::U16,
            Value::I32(_) => ValueKind::I32,
            Value::U32(_) => ValueKind::U32,
            Value::I64(_) => ValueKind::I64,
            Value::U64(_) => ValueKind::U64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// Parse `text` into the same kind as `reference`
    ///
    /// Booleans accept the canonical [`TRUE_LITERAL`] plus, with the
    /// `extended-bool` feature, the truthy aliases "true", "1", "on", "yes"
    /// and "y"; anything else parses as `false`, never a failure. Numeric
    /// parsing is strict whole-string: trailing characters fail the parse.
    /// Strings are copied and fail only if they exceed [`STR_CAPACITY`].
    pub fn from_str(text: &str, reference: &Value) -> Option<Value> {
        match reference.kind() {
            ValueKind::Bool => Some(Value::Bool(parse_bool(text))),
            ValueKind::I8 => text.parse().ok().map(Value::I8),
            ValueKind::U8 => text.parse().ok().map(Value::U8),
            ValueKind::I16 => text.parse().ok().map(Value::I16),
            ValueKind::U16 => text.parse().ok().map(Value::U16),
            ValueKind::I32 => text.parse().ok().map(Value::I32),
            ValueKind::U32 => text.parse().ok().map(Value::U32),
            ValueKind::I64 => text.parse().ok().map(Value::I64),
            ValueKind::U64 => text.parse().ok().map(Value::U64),
            ValueKind::F32 => text.parse().ok().map(Value::F32),
            ValueKind::F64 => text.parse().ok().map(Value::F64),
            ValueKind::Str => Str::copied(text).map(Value::Str),
        }
    }
}

#[cfg(feature = "extended-bool")]
fn parse_bool(text: &str) -> bool {
    text == TRUE_LITERAL || text == "1" || text == "on" || text == "yes" || text == "y"
}

#[cfg(not(feature = "extended-bool"))]
fn parse_bool(text: &str) -> bool {
    text == TRUE_LITERAL
}

impl fmt::Display for Value {
    /// Canonical textual representation, used by backup and [`Value::from_str`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => f.write_str(if *v { TRUE_LITERAL } else { FALSE_LITERAL }),
            Value::I8(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s.as_str()),
        }
    }
}
