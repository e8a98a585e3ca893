//! In-memory storage backend
//!
//! Volatile [`Storage`] implementation used by the test suite and by
//! applications that want the engine semantics without persistence. Entries
//! carry a kind tag, so a typed load only succeeds when the stored kind
//! matches, like a real NVS backend.
//!
//! Write and removal failures can be injected for error-path testing.

use heapless::FnvIndexMap;

use super::Storage;
use crate::{Str, Value, MAX_KEYS, MAX_KEY_LEN};

/// In-memory key-value store with failure injection
///
/// # Example
///
/// ```
/// use settings_store::{MemoryStorage, Storage};
///
/// let mut storage = MemoryStorage::new();
/// assert!(storage.begin("app"));
/// assert!(storage.store_u32("count", 7));
/// assert_eq!(storage.load_u32("count"), Some(7));
/// // Stored as u32, not readable as i32
/// assert_eq!(storage.load_i32("count"), None);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: FnvIndexMap<heapless::String<MAX_KEY_LEN>, Value, MAX_KEYS>,
    fail_writes: bool,
    fail_removes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `store_*` call fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every subsequent `remove`/`remove_all` call fail
    pub fn set_fail_removes(&mut self, fail: bool) {
        self.fail_removes = fail;
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, key: &str, value: Value) -> bool {
        if self.fail_writes {
            return false;
        }
        let Ok(name) = heapless::String::try_from(key) else {
            return false;
        };
        self.entries.insert(name, value).is_ok()
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let name = heapless::String::<MAX_KEY_LEN>::try_from(key).ok()?;
        self.entries.get(&name)
    }
}

macro_rules! memory_slot {
    ($($store:ident / $load:ident: $prim:ty => $variant:ident),* $(,)?) => {
        $(
            fn $store(&mut self, key: &str, value: $prim) -> bool {
                self.put(key, Value::$variant(value))
            }

            fn $load(&self, key: &str) -> Option<$prim> {
                match self.lookup(key) {
                    Some(Value::$variant(v)) => Some(*v),
                    _ => None,
                }
            }
        )*
    };
}

impl Storage for MemoryStorage {
    fn begin(&mut self, _name: &str) -> bool {
        true
    }

    fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.fail_removes {
            return false;
        }
        if let Ok(name) = heapless::String::<MAX_KEY_LEN>::try_from(key) {
            self.entries.remove(&name);
        }
        // Removing an absent key is a success
        true
    }

    fn remove_all(&mut self) -> bool {
        if self.fail_removes {
            return false;
        }
        self.entries.clear();
        true
    }

    memory_slot! {
        store_bool / load_bool: bool => Bool,
        store_i8 / load_i8: i8 => I8,
        store_u8 / load_u8: u8 => U8,
        store_i16 / load_i16: i16 => I16,
        store_u16 / load_u16: u16 => U16,
        store_i32 / load_i32: i32 => I32,
        store_u32 / load_u32: u32 => U32,
        store_i64 / load_i64: i64 => I64,
        store_u64 / load_u64: u64 => U64,
        store_f32 / load_f32: f32 => F32,
        store_f64 / load_f64: f64 => F64,
    }

    fn store_str(&mut self, key: &str, value: &str) -> bool {
        match Str::copied(value) {
            Some(s) => self.put(key, Value::Str(s)),
            None => false,
        }
    }

    fn load_str(&self, key: &str) -> Option<Str> {
        match self.lookup(key) {
            Some(Value::Str(s)) => Some(s.clone()),
            _ => None,
        }
    }
}
