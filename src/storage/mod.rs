//! Storage backend abstraction
//!
//! The engine persists values through this trait; concrete backends (flash
//! NVS, filesystem) live outside this crate. Implementations must guarantee:
//!
//! - `remove` on an absent key returns success (idempotent)
//! - each `store_*` is atomic from the caller's perspective: either fully
//!   visible to a subsequent `load_*` or not persisted at all
//! - `has_key` agrees with the union of all typed `load_*` calls
//!
//! Stored bytes do not self-describe their type beyond what a key's declared
//! default implies; a typed `load_*` returns `None` when the stored entry
//! does not match the requested kind.

pub mod memory;

pub use memory::MemoryStorage;

use crate::{Str, Value, ValueKind};

/// Durable key-value backend contract
///
/// Default methods refuse everything so partial backends can implement only
/// the kinds they support.
pub trait Storage {
    /// Open the backend under `name`; returns `true` on success
    fn begin(&mut self, name: &str) -> bool;

    /// Close the backend
    fn end(&mut self) {}

    fn has_key(&self, key: &str) -> bool {
        let _ = key;
        false
    }

    /// Remove a key; returns `true` if removed or absent
    fn remove(&mut self, key: &str) -> bool {
        let _ = key;
        false
    }

    /// Remove every key
    fn remove_all(&mut self) -> bool {
        false
    }

    fn store_bool(&mut self, key: &str, value: bool) -> bool {
        let _ = (key, value);
        false
    }
    fn store_i8(&mut self, key: &str, value: i8) -> bool {
        let _ = (key, value);
        false
    }
    fn store_u8(&mut self, key: &str, value: u8) -> bool {
        let _ = (key, value);
        false
    }
    fn store_i16(&mut self, key: &str, value: i16) -> bool {
        let _ = (key, value);
        false
    }
    fn store_u16(&mut self, key: &str, value: u16) -> bool {
        let _ = (key, value);
        false
    }
    fn store_i32(&mut self, key: &str, value: i32) -> bool {
        let _ = (key, value);
        false
    }
    fn store_u32(&mut self, key: &str, value: u32) -> bool {
        let _ = (key, value);
        false
    }
    fn store_i64(&mut self, key: &str, value: i64) -> bool {
        let _ = (key, value);
        false
    }
    fn store_u64(&mut self, key: &str, value: u64) -> bool {
        let _ = (key, value);
        false
    }
    fn store_f32(&mut self, key: &str, value: f32) -> bool {
        let _ = (key, value);
        false
    }
    fn store_f64(&mut self, key: &str, value: f64) -> bool {
        let _ = (key, value);
        false
    }
    fn store_str(&mut self, key: &str, value: &str) -> bool {
        let _ = (key, value);
        false
    }

    fn load_bool(&self, key: &str) -> Option<bool> {
        let _ = key;
        None
    }
    fn load_i8(&self, key: &str) -> Option<i8> {
        let _ = key;
        None
    }
    fn load_u8(&self, key: &str) -> Option<u8> {
        let _ = key;
        None
    }
    fn load_i16(&self, key: &str) -> Option<i16> {
        let _ = key;
        None
    }
    fn load_u16(&self, key: &str) -> Option<u16> {
        let _ = key;
        None
    }
    fn load_i32(&self, key: &str) -> Option<i32> {
        let _ = key;
        None
    }
    fn load_u32(&self, key: &str) -> Option<u32> {
        let _ = key;
        None
    }
    fn load_i64(&self, key: &str) -> Option<i64> {
        let _ = key;
        None
    }
    fn load_u64(&self, key: &str) -> Option<u64> {
        let _ = key;
        None
    }
    fn load_f32(&self, key: &str) -> Option<f32> {
        let _ = key;
        None
    }
    fn load_f64(&self, key: &str) -> Option<f64> {
        let _ = key;
        None
    }
    fn load_str(&self, key: &str) -> Option<Str> {
        let _ = key;
        None
    }
}

/// Kinds that can be loaded from storage with a concrete Rust type
///
/// This is the typed-load seam used by [`crate::Migration::migrate`], where
/// the caller names the previously stored type.
pub trait StoredType: Sized {
    fn load<S: Storage>(storage: &S, key: &str) -> Option<Self>;
}

macro_rules! stored_type {
    ($($prim:ty => $load:ident),* $(,)?) => {
        $(
            impl StoredType for $prim {
                fn load<S: Storage>(storage: &S, key: &str) -> Option<Self> {
                    storage.$load(key)
                }
            }
        )*
    };
}

stored_type! {
    bool => load_bool,
    i8 => load_i8,
    u8 => load_u8,
    i16 => load_i16,
    u16 => load_u16,
    i32 => load_i32,
    u32 => load_u32,
    i64 => load_i64,
    u64 => load_u64,
    f32 => load_f32,
    f64 => load_f64,
    Str => load_str,
}

/// Store a value under the typed slot matching its kind
pub(crate) fn store_value<S: Storage>(storage: &mut S, key: &str, value: &Value) -> bool {
    match value {
        Value::Bool(v) => storage.store_bool(key, *v),
        Value::I8(v) => storage.store_i8(key, *v),
        Value::U8(v) => storage.store_u8(key, *v),
        Value::I16(v) => storage.store_i16(key, *v),
        Value::U16(v) => storage.store_u16(key, *v),
        Value::I32(v) => storage.store_i32(key, *v),
        Value::U32(v) => storage.store_u32(key, *v),
        Value::I64(v) => storage.store_i64(key, *v),
        Value::U64(v) => storage.store_u64(key, *v),
        Value::F32(v) => storage.store_f32(key, *v),
        Value::F64(v) => storage.store_f64(key, *v),
        Value::Str(s) => storage.store_str(key, s.as_str()),
    }
}

/// Load a value typed by `kind`; `None` if absent or stored as another kind
pub(crate) fn load_value<S: Storage>(storage: &S, key: &str, kind: ValueKind) -> Option<Value> {
    match kind {
        ValueKind::Bool => storage.load_bool(key).map(Value::Bool),
        ValueKind::I8 => storage.load_i8(key).map(Value::I8),
        ValueKind::U8 => storage.load_u8(key).map(Value::U8),
        ValueKind::I16 => storage.load_i16(key).map(Value::I16),
        ValueKind::U16 => storage.load_u16(key).map(Value::U16),
        ValueKind::I32 => storage.load_i32(key).map(Value::I32),
        ValueKind::U32 => storage.load_u32(key).map(Value::U32),
        ValueKind::I64 => storage.load_i64(key).map(Value::I64),
        ValueKind::U64 => storage.load_u64(key).map(Value::U64),
        ValueKind::F32 => storage.load_f32(key).map(Value::F32),
        ValueKind::F64 => storage.load_f64(key).map(Value::F64),
        ValueKind::Str => storage.load_str(key).map(Value::Str),
    }
}
