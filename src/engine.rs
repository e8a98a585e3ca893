//! Settings engine
//!
//! Orchestrates the key registry, the storage backend, and an in-memory
//! cache. Reads hit the cache first, fall back to a typed storage load, and
//! fall back again to the key's default (which is never pinned into the
//! cache). Writes run a strict pipeline: unknown-key check, type check,
//! default short-circuit, global validator, per-key validator, physical
//! write, cache update, change notification. A failed write leaves cache and
//! registry untouched.
//!
//! The engine is a plain state machine: Unopened -> Open (`begin`) -> Closed
//! (`end`), reusable back to Open with a fresh `begin`. While closed, `get`
//! returns defaults without touching storage and every mutation reports
//! [`Status::Disabled`].

use core::fmt;
use core::mem::size_of;

use heapless::FnvIndexMap;

use crate::key::{Key, KeyRegistry};
use crate::storage::{load_value, store_value, Storage};
use crate::{log_debug, log_error, log_info, log_warn};
use crate::{Status, Str, Value, ValueKind, MAX_KEYS, PASSWORD_MASK};

/// Validator predicate over (key name, candidate value)
pub type ValidatorFn = fn(&str, &Value) -> bool;

/// Change notification callback, receives (key name, new value)
pub type ChangeFn = fn(&str, &Value);

/// Restore-completion callback
pub type RestoredFn = fn();

/// Typed, cached settings registry over a [`Storage`] backend
///
/// # Example
///
/// ```
/// use settings_store::{MemoryStorage, Settings, Status, Value};
///
/// let mut settings = Settings::new(MemoryStorage::new());
/// settings.configure("mqtt_port", 1883u16, None);
/// assert!(settings.begin("app", false));
///
/// assert_eq!(settings.get("mqtt_port"), Some(Value::U16(1883)));
/// assert_eq!(settings.set("mqtt_port", 8883u16, true), Status::Persisted);
/// assert_eq!(settings.get("mqtt_port"), Some(Value::U16(8883)));
/// ```
pub struct Settings<S: Storage> {
    storage: S,
    name: Option<&'static str>,
    registry: KeyRegistry,
    cache: FnvIndexMap<&'static str, Value, MAX_KEYS>,
    validators: FnvIndexMap<&'static str, ValidatorFn, MAX_KEYS>,
    global_validator: Option<ValidatorFn>,
    change_callback: Option<ChangeFn>,
    restored_callback: Option<RestoredFn>,
}

impl<S: Storage> Settings<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            name: None,
            registry: KeyRegistry::new(),
            cache: FnvIndexMap::new(),
            validators: FnvIndexMap::new(),
            global_validator: None,
            change_callback: None,
            restored_callback: None,
        }
    }

    /// Register a key with its default value and optional validator
    ///
    /// Must be called before [`Settings::begin`]. Returns `false` if the name
    /// is too long, already registered, or the registry is full.
    pub fn configure<V: Into<Value>>(
        &mut self,
        name: &'static str,
        default: V,
        validator: Option<ValidatorFn>,
    ) -> bool {
        if !self.registry.insert(Key::new(name, default.into())) {
            return false;
        }
        if let Some(validator) = validator {
            self.validators.insert(name, validator).ok();
        }
        true
    }

    /// Open the storage backend and transition to the Open state
    ///
    /// With `preload`, eagerly loads every registered key's stored value into
    /// the cache, front-loading the cost at startup instead of first access.
    pub fn begin(&mut self, name: &'static str, preload: bool) -> bool {
        log_info!("initializing settings '{}'", name);
        if !self.storage.begin(name) {
            log_error!("failed to open storage backend");
            return false;
        }
        if preload {
            log_info!("preloading settings '{}'", name);
            for i in 0..self.registry.len() {
                let (key, kind) = {
                    let k = &self.registry.keys()[i];
                    (k.name, k.default.kind())
                };
                if let Some(value) = load_value(&self.storage, key, kind) {
                    self.cache.insert(key, value).ok();
                    log_debug!("get({}): cached", key);
                }
            }
        }
        self.name = Some(name);
        true
    }

    /// Close the storage backend and drop the cache
    pub fn end(&mut self) {
        self.name = None;
        self.storage.end();
        self.cache.clear();
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// True while the engine is Open
    pub fn enabled(&self) -> bool {
        self.name.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Register the change notification callback
    pub fn on_change(&mut self, callback: ChangeFn) {
        self.change_callback = Some(callback);
    }

    /// Register the restore-completion callback
    pub fn on_restored(&mut self, callback: RestoredFn) {
        self.restored_callback = Some(callback);
    }

    /// Install or remove the global validator (applies to every key)
    pub fn set_validator(&mut self, validator: Option<ValidatorFn>) {
        self.global_validator = validator;
    }

    /// Install or remove a per-key validator
    ///
    /// Returns `false` if the key is not registered.
    pub fn set_key_validator(&mut self, key: &str, validator: Option<ValidatorFn>) -> bool {
        let Some(name) = self.key_ref(key) else {
            log_warn!("set_key_validator({}): unknown key", key);
            return false;
        };
        match validator {
            Some(validator) => {
                self.validators.insert(name, validator).ok();
            }
            None => {
                self.validators.remove(name);
            }
        }
        true
    }

    /// True if the key is registered
    pub fn configured(&self, key: &str) -> bool {
        self.registry.lookup(key).is_some()
    }

    /// True if an explicit value is persisted for the key
    pub fn stored(&self, key: &str) -> bool {
        self.enabled() && self.storage.has_key(key)
    }

    /// All registered keys in name order
    pub fn keys(&self) -> &[Key] {
        self.registry.keys()
    }

    /// Key definition by name
    pub fn key(&self, name: &str) -> Option<&Key> {
        self.registry.lookup(name)
    }

    /// Resolve an arbitrary buffer to the registered `'static` name
    pub fn key_ref(&self, buffer: &str) -> Option<&'static str> {
        self.registry.lookup(buffer).map(|k| k.name)
    }

    /// Value of a key, or its default if not set; `None` for unknown keys
    ///
    /// Cache miss loads from storage typed by the key's declared kind and
    /// populates the cache; an absent load returns the default without
    /// caching it, so defaults stay live until an explicit write. While the
    /// engine is closed, returns the default without touching storage.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let Some(idx) = self.registry.index_of(key) else {
            log_warn!("get({}): unknown key", key);
            return None;
        };
        let name = self.registry.keys()[idx].name;
        if !self.enabled() {
            log_warn!("get({}): engine disabled", name);
            return Some(self.registry.keys()[idx].default.clone());
        }
        if let Some(value) = self.cache.get(name) {
            return Some(value.clone());
        }
        let kind = self.registry.keys()[idx].default.kind();
        match load_value(&self.storage, name, kind) {
            Some(value) => {
                self.cache.insert(name, value.clone()).ok();
                log_debug!("get({}): cached", name);
                Some(value)
            }
            None => Some(self.registry.keys()[idx].default.clone()),
        }
    }

    /// Like [`Settings::get`], with password-key strings replaced by
    /// [`PASSWORD_MASK`]
    ///
    /// This is the projection to use when rendering values externally;
    /// secrets are never masked internally.
    pub fn get_masked(&mut self, key: &str) -> Option<Value> {
        let secret = self.registry.lookup(key)?.is_password_key();
        let value = self.get(key)?;
        if secret && value.kind() == ValueKind::Str {
            Some(Value::Str(Str::Borrowed(PASSWORD_MASK)))
        } else {
            Some(value)
        }
    }

    /// True unless the key holds a non-empty string
    pub fn is_empty(&mut self, key: &str) -> bool {
        match self.get(key) {
            Some(value) => value.as_str().map_or(true, str::is_empty),
            None => true,
        }
    }

    /// True if the key holds a string equal to `text`
    pub fn is_equal(&mut self, key: &str, text: &str) -> bool {
        match self.get(key) {
            Some(value) => value.as_str() == Some(text),
            None => false,
        }
    }

    /// Set the value of a key
    ///
    /// See the module docs for the validation pipeline. The change callback
    /// fires only after a successful physical write and cache update, and
    /// receives the new value.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V, fire: bool) -> Status {
        self.set_value(key, value.into(), fire)
    }

    /// Set a string key from borrowed text (copied into the value)
    pub fn set_str(&mut self, key: &str, value: &str, fire: bool) -> Status {
        match Str::copied(value) {
            Some(s) => self.set_value(key, Value::Str(s), fire),
            None => {
                log_warn!("set({}): value too long", key);
                Status::InvalidValue
            }
        }
    }

    /// Apply a batch of settings in two ordered passes
    ///
    /// All non-enable keys are written first, then all enable keys, so a
    /// feature's dependent settings are persisted before the flag that
    /// activates the feature flips. Returns whether any entry actually
    /// changed storage.
    pub fn set_all(&mut self, settings: &[(&str, Value)], fire: bool) -> bool {
        let mut updated = false;
        for enable_pass in [false, true] {
            for i in 0..self.registry.len() {
                let (name, is_enable) = {
                    let k = &self.registry.keys()[i];
                    (k.name, k.is_enable_key())
                };
                if is_enable != enable_pass {
                    continue;
                }
                if let Some((_, value)) = settings.iter().find(|(n, _)| *n == name) {
                    updated |= self.set_value(name, value.clone(), fire).storage_updated();
                }
            }
        }
        updated
    }

    /// Remove the persisted value of a key, reverting it to its default
    ///
    /// On success the cache entry is evicted and the change callback fires
    /// with the default value, signaling the reversion.
    pub fn unset(&mut self, key: &str, fire: bool) -> Status {
        if !self.enabled() {
            log_warn!("unset({}): engine disabled", key);
            return Status::Disabled;
        }
        let Some(idx) = self.registry.index_of(key) else {
            log_warn!("unset({}): unknown key", key);
            return Status::UnknownKey;
        };
        let name = self.registry.keys()[idx].name;
        if !self.storage.remove(name) {
            log_error!("unset({}): storage removal failed", name);
            return Status::RemoveFailed;
        }
        self.cache.remove(name);
        log_debug!("unset({}): removed", name);
        if fire {
            if let Some(callback) = self.change_callback {
                let default = self.registry.keys()[idx].default.clone();
                callback(name, &default);
            }
        }
        Status::Removed
    }

    /// Remove every persisted key and empty the cache; irreversible
    pub fn clear(&mut self) {
        self.storage.remove_all();
        self.cache.clear();
    }

    /// Serialize settings as `name=value` lines in registry order
    ///
    /// With `include_defaults` false, only keys actually present in storage
    /// are emitted.
    pub fn backup<W: fmt::Write>(&mut self, out: &mut W, include_defaults: bool) -> fmt::Result {
        for i in 0..self.registry.len() {
            let name = self.registry.keys()[i].name;
            if include_defaults || self.stored(name) {
                if let Some(value) = self.get(name) {
                    writeln!(out, "{}={}", name, value)?;
                }
            }
        }
        Ok(())
    }

    /// Write a masked `name=value` listing for diagnostics
    pub fn dump<W: fmt::Write>(&mut self, out: &mut W) -> fmt::Result {
        for i in 0..self.registry.len() {
            let name = self.registry.keys()[i].name;
            if let Some(value) = self.get_masked(name) {
                writeln!(out, "{}={}", name, value)?;
            }
        }
        Ok(())
    }

    /// Parse and apply a backup
    ///
    /// Strictly line-based: each line is `name=value` where the key is the
    /// full text before the first `=`; lines without `=` and unknown keys are
    /// skipped. A value that fails to parse for a known key aborts the whole
    /// restore without partial application. Change notifications are
    /// suppressed; the restore-completion callback fires once if at least one
    /// field changed.
    pub fn restore(&mut self, data: &str) -> bool {
        let mut settings: heapless::Vec<(&'static str, Value), MAX_KEYS> = heapless::Vec::new();
        for line in data.lines() {
            let Some((name, raw)) = line.split_once('=') else {
                continue;
            };
            let Some(key) = self.registry.lookup(name) else {
                continue;
            };
            match Value::from_str(raw, &key.default) {
                Some(value) => {
                    settings.push((key.name, value)).ok();
                }
                None => {
                    log_warn!("restore({}): invalid data", name);
                    return false;
                }
            }
        }
        self.restore_values(&settings)
    }

    /// Apply pre-parsed settings with notifications suppressed
    pub fn restore_values(&mut self, settings: &[(&str, Value)]) -> bool {
        log_debug!("restoring {} settings", settings.len());
        let restored = self.set_all(settings, false);
        if restored {
            log_debug!("settings restored");
            if let Some(callback) = self.restored_callback {
                callback();
            }
        } else {
            log_debug!("no change detected");
        }
        restored
    }

    /// Approximate memory footprint of registry, cache, and validators
    ///
    /// Informational only; everything is held in fixed-capacity structures.
    pub fn memory_usage(&self) -> usize {
        self.registry.len() * size_of::<Key>()
            + self.cache.len() * (size_of::<&str>() + size_of::<Value>())
            + self.validators.len() * (size_of::<&str>() + size_of::<ValidatorFn>())
    }

    fn set_value(&mut self, key: &str, value: Value, fire: bool) -> Status {
        if !self.enabled() {
            log_warn!("set({}): engine disabled", key);
            return Status::Disabled;
        }

        let Some(idx) = self.registry.index_of(key) else {
            log_warn!("set({}): unknown key", key);
            return Status::UnknownKey;
        };
        let name = self.registry.keys()[idx].name;

        if value.kind() != self.registry.keys()[idx].default.kind() {
            log_warn!("set({}): invalid type", name);
            return Status::InvalidType;
        }

        // Key not persisted and set to its default value: skip the write
        let persisted = self.storage.has_key(name);
        if !persisted && self.registry.keys()[idx].default == value {
            log_debug!("set({}): defaulted", name);
            return Status::Defaulted;
        }

        if let Some(validator) = self.global_validator {
            if !validator(name, &value) {
                log_debug!("set({}): invalid value", name);
                return Status::InvalidValue;
            }
        }
        if let Some(validator) = self.validators.get(name) {
            if !validator(name, &value) {
                log_debug!("set({}): invalid value", name);
                return Status::InvalidValue;
            }
        }

        if !store_value(&mut self.storage, name, &value) {
            log_error!("set({}): storage write failed", name);
            return Status::WriteFailed;
        }
        log_debug!("set({}): persisted", name);

        self.cache.insert(name, value.clone()).ok();

        if fire {
            if let Some(callback) = self.change_callback {
                callback(name, &value);
            }
        }

        Status::Persisted
    }
}
