//! Schema migration
//!
//! Converts values already persisted under an earlier representation into the
//! shape required by the current key registry. Migration operates directly on
//! storage, bypassing the cache, and must run before [`Settings::begin`]
//! opens the engine for normal use.

use crate::storage::{store_value, Storage, StoredType};
use crate::{log_debug, log_error, log_info};
use crate::{Settings, Status, Value, ValueKind};

/// One-time storage migration pass for a [`Settings`] engine
///
/// # Example
///
/// ```
/// use settings_store::{MemoryStorage, Migration, Settings, Storage, Value};
///
/// let mut storage = MemoryStorage::new();
/// storage.store_i32("speed", 42);
///
/// let mut settings = Settings::new(storage);
/// settings.configure("speed", 0i32, None);
///
/// let mut migration = Migration::new(&mut settings);
/// migration.begin("app");
/// let _ = migration.migrate::<i32, _>("speed", |old| Some(Value::I32(old * 2)));
/// migration.end();
///
/// settings.begin("app", false);
/// assert_eq!(settings.get("speed"), Some(Value::I32(84)));
/// ```
pub struct Migration<'a, S: Storage> {
    settings: &'a mut Settings<S>,
}

impl<'a, S: Storage> Migration<'a, S> {
    pub fn new(settings: &'a mut Settings<S>) -> Self {
        Self { settings }
    }

    /// Open storage for the migration pass
    pub fn begin(&mut self, name: &str) -> bool {
        log_info!("migrating settings '{}'", name);
        self.settings.storage_mut().begin(name)
    }

    /// Close storage after the migration pass
    pub fn end(&mut self) {
        self.settings.storage_mut().end();
        log_info!("migration ended");
    }

    /// Migrate one key from a previously stored type
    ///
    /// Loads the stored value typed as `FROM` and applies `transform`:
    ///
    /// - key not registered, or nothing stored as `FROM`: [`Status::UnknownKey`]
    ///   (nothing to migrate, also the already-migrated case)
    /// - `transform` yields `None`: the key is removed (explicit opt-out)
    /// - transformed kind differs from the key's declared kind:
    ///   [`Status::InvalidType`], storage untouched — never a silent coercion
    /// - otherwise the migrated value is stored
    pub fn migrate<FROM, F>(&mut self, key: &str, transform: F) -> Status
    where
        FROM: StoredType,
        F: FnOnce(FROM) -> Option<Value>,
    {
        let Some(k) = self.settings.key(key) else {
            return Status::UnknownKey;
        };
        let (name, kind) = (k.name, k.default.kind());

        let Some(old) = FROM::load(self.settings.storage(), name) else {
            return Status::UnknownKey;
        };

        let Some(migrated) = transform(old) else {
            self.settings.storage_mut().remove(name);
            log_debug!("migrate({}): removed", name);
            return Status::Removed;
        };

        if migrated.kind() != kind {
            log_error!("migrate({}): invalid type", name);
            return Status::InvalidType;
        }

        if !store_value(self.settings.storage_mut(), name, &migrated) {
            log_error!("migrate({}): storage write failed", name);
            return Status::WriteFailed;
        }
        log_debug!("migrate({}): persisted", name);
        Status::Persisted
    }

    /// Re-type every non-string key still stored as a raw string
    ///
    /// Legacy format pass: parses each stored string against the key's
    /// declared kind, removes the string entry, and stores the typed value.
    /// Failures are counted instead of aborting, so a partial migration is
    /// preferable to none. Returns the error count (0 = fully migrated).
    pub fn migrate_from_string(&mut self) -> usize {
        let mut errors = 0;
        for i in 0..self.settings.keys().len() {
            let (name, kind) = {
                let k = &self.settings.keys()[i];
                (k.name, k.default.kind())
            };
            if kind == ValueKind::Str {
                continue;
            }
            if !self.settings.storage().has_key(name) {
                continue;
            }
            // Not stored as a string means already migrated
            let Some(text) = self.settings.storage().load_str(name) else {
                continue;
            };
            let reference = self.settings.keys()[i].default.clone();
            let Some(converted) = Value::from_str(text.as_str(), &reference) else {
                log_error!("migrate_from_string({}): failed to convert", name);
                errors += 1;
                continue;
            };
            if !self.settings.storage_mut().remove(name) {
                log_error!("migrate_from_string({}): failed to remove string value", name);
                errors += 1;
                continue;
            }
            if !store_value(self.settings.storage_mut(), name, &converted) {
                log_error!("migrate_from_string({}): failed to store typed value", name);
                errors += 1;
                continue;
            }
            log_debug!("migrate_from_string({}): persisted", name);
        }
        if errors > 0 {
            log_error!("migrate_from_string(): {} error(s)", errors);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, Str};

    #[test]
    fn test_migrate_transforms_stored_value() {
        let mut storage = MemoryStorage::new();
        storage.store_i32("speed", 42);

        let mut settings = Settings::new(storage);
        settings.configure("speed", 0i32, None);

        let mut migration = Migration::new(&mut settings);
        migration.begin("test");
        assert_eq!(
            migration.migrate::<i32, _>("speed", |old| Some(Value::I32(old * 2))),
            Status::Persisted
        );
        migration.end();

        settings.begin("test", false);
        assert_eq!(settings.get("speed"), Some(Value::I32(84)));
    }

    #[test]
    fn test_migrate_across_kinds() {
        let mut storage = MemoryStorage::new();
        storage.store_i32("port", 8883);

        let mut settings = Settings::new(storage);
        // Key is now declared u16; the stored value predates the change
        settings.configure("port", 0u16, None);

        let mut migration = Migration::new(&mut settings);
        assert_eq!(
            migration.migrate::<i32, _>("port", |old| Some(Value::U16(old as u16))),
            Status::Persisted
        );

        settings.begin("test", false);
        assert_eq!(settings.get("port"), Some(Value::U16(8883)));
    }

    #[test]
    fn test_migrate_unknown_or_unstored_key() {
        let mut settings = Settings::new(MemoryStorage::new());
        settings.configure("speed", 0i32, None);

        let mut migration = Migration::new(&mut settings);
        assert_eq!(
            migration.migrate::<i32, _>("bogus", |old| Some(Value::I32(old))),
            Status::UnknownKey
        );
        // Registered but nothing stored: nothing to migrate
        assert_eq!(
            migration.migrate::<i32, _>("speed", |old| Some(Value::I32(old))),
            Status::UnknownKey
        );
    }

    #[test]
    fn test_migrate_opt_out_removes_key() {
        let mut storage = MemoryStorage::new();
        storage.store_i32("speed", 42);

        let mut settings = Settings::new(storage);
        settings.configure("speed", 0i32, None);

        let mut migration = Migration::new(&mut settings);
        assert_eq!(
            migration.migrate::<i32, _>("speed", |_old| None),
            Status::Removed
        );
        assert!(!settings.storage().has_key("speed"));
    }

    #[test]
    fn test_migrate_rejects_kind_mismatch() {
        let mut storage = MemoryStorage::new();
        storage.store_i32("speed", 42);

        let mut settings = Settings::new(storage);
        settings.configure("speed", 0i32, None);

        let mut migration = Migration::new(&mut settings);
        assert_eq!(
            migration.migrate::<i32, _>("speed", |old| Some(Value::U32(old as u32))),
            Status::InvalidType
        );
        // Storage untouched on refusal
        assert_eq!(settings.storage().load_i32("speed"), Some(42));
    }

    #[test]
    fn test_migrate_from_string_bulk() {
        let mut storage = MemoryStorage::new();
        storage.store_str("port", "8883");
        storage.store_str("debug_enable", "true");
        storage.store_str("ratio", "not_a_number");
        storage.store_str("host", "legacy.local");

        let mut settings = Settings::new(storage);
        settings.configure("port", 0u16, None);
        settings.configure("debug_enable", false, None);
        settings.configure("ratio", 0.0f32, None);
        settings.configure("host", "", None);

        let mut migration = Migration::new(&mut settings);
        migration.begin("test");
        assert_eq!(migration.migrate_from_string(), 1);
        migration.end();

        settings.begin("test", false);
        assert_eq!(settings.get("port"), Some(Value::U16(8883)));
        assert_eq!(settings.get("debug_enable"), Some(Value::Bool(true)));
        // String keys are skipped, not re-typed
        assert_eq!(
            settings.storage().load_str("host"),
            Some(Str::copied("legacy.local").unwrap())
        );
        // The unconvertible entry stays as a string
        assert_eq!(
            settings.storage().load_str("ratio"),
            Some(Str::copied("not_a_number").unwrap())
        );
    }

    #[test]
    fn test_migrate_from_string_skips_already_typed() {
        let mut storage = MemoryStorage::new();
        storage.store_u16("port", 8883);

        let mut settings = Settings::new(storage);
        settings.configure("port", 0u16, None);

        let mut migration = Migration::new(&mut settings);
        assert_eq!(migration.migrate_from_string(), 0);
        assert_eq!(settings.storage().load_u16("port"), Some(8883));
    }
}
