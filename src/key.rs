//! Key definitions and the sorted key registry
//!
//! A [`Key`] pairs a `'static` name with a default [`Value`]; the declared
//! default fixes the kind every stored value for that key must have. Names
//! are referenced, never copied, so callers must supply stable storage
//! (string literals in practice).
//!
//! The [`KeyRegistry`] keeps keys sorted by name at all times and resolves
//! lookups by binary search on string content; pointer identity is never
//! relied on for correctness.

use crate::{log_debug, log_warn};
use crate::{Value, ENABLE_SUFFIX, MAX_KEYS, MAX_KEY_LEN, PASSWORD_SUFFIX};

/// Named, typed setting slot with a default value
#[derive(Debug, Clone)]
pub struct Key {
    /// Key name (referenced, not copied; max [`MAX_KEY_LEN`] bytes)
    pub name: &'static str,
    /// Default value; its kind is the key's declared kind
    pub default: Value,
}

impl Key {
    pub fn new(name: &'static str, default: Value) -> Self {
        Self { name, default }
    }

    /// True if the key toggles a feature (name ends in [`ENABLE_SUFFIX`])
    pub fn is_enable_key(&self) -> bool {
        self.name.ends_with(ENABLE_SUFFIX)
    }

    /// True if the key holds a secret (name ends in [`PASSWORD_SUFFIX`])
    pub fn is_password_key(&self) -> bool {
        self.name.ends_with(PASSWORD_SUFFIX)
    }
}

/// Ordered collection of keys, sorted by name for O(log n) lookup
#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: heapless::Vec<Key, MAX_KEYS>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self {
            keys: heapless::Vec::new(),
        }
    }

    /// Register a key, keeping the collection sorted
    ///
    /// Returns `false` without registering if the name exceeds
    /// [`MAX_KEY_LEN`], the name is already registered (the registry is
    /// keyed, not list-like), or the registry is full.
    pub fn insert(&mut self, key: Key) -> bool {
        if key.name.len() > MAX_KEY_LEN {
            log_warn!("configure({}): name too long", key.name);
            return false;
        }
        match self.keys.binary_search_by(|k| k.name.cmp(key.name)) {
            Ok(_) => {
                log_warn!("configure({}): duplicate key", key.name);
                false
            }
            Err(pos) => {
                if self.keys.insert(pos, key).is_err() {
                    log_warn!("configure(): registry full");
                    return false;
                }
                log_debug!("configure({})", self.keys[pos].name);
                true
            }
        }
    }

    /// Look up a key by name (binary search, full string comparison)
    pub fn lookup(&self, name: &str) -> Option<&Key> {
        self.index_of(name).map(|i| &self.keys[i])
    }

    /// Index of a key by name, if registered
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.keys.binary_search_by(|k| k.name.cmp(name)).ok()
    }

    pub fn get(&self, index: usize) -> Option<&Key> {
        self.keys.get(index)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// All keys in name order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }
}
