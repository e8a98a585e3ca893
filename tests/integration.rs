//! End-to-end scenarios against the in-memory storage backend

use std::sync::Mutex;

use settings_store::{
    MemoryStorage, Migration, Settings, Status, Storage, Value, PASSWORD_MASK,
};

fn wifi_settings() -> Settings<MemoryStorage> {
    let mut settings = Settings::new(MemoryStorage::new());
    assert!(settings.configure("wifi_ssid", "", None));
    assert!(settings.configure("wifi_pwd", "", None));
    assert!(settings.configure("wifi_enable", false, None));
    assert!(settings.configure("ntp_server", "pool.ntp.org", None));
    assert!(settings.configure("ntp_interval", 3600u32, None));
    settings
}

#[test]
fn wifi_scenario_orders_and_masks() {
    static ORDER: Mutex<Vec<String>> = Mutex::new(Vec::new());

    let mut settings = wifi_settings();
    settings.on_change(|key, _value| {
        ORDER.lock().unwrap().push(key.to_string());
    });
    assert!(settings.begin("app", false));

    let updated = settings.set_all(
        &[
            ("wifi_enable", Value::Bool(true)),
            ("wifi_pwd", Value::from("abc")),
        ],
        true,
    );
    assert!(updated);

    // The password must be persisted strictly before the enable flag flips
    assert_eq!(ORDER.lock().unwrap().as_slice(), ["wifi_pwd", "wifi_enable"]);

    // External projection renders the mask, never the secret
    assert_eq!(
        settings.get_masked("wifi_pwd").unwrap().as_str(),
        Some(PASSWORD_MASK)
    );
    assert_eq!(settings.get("wifi_pwd").unwrap().as_str(), Some("abc"));
}

#[test]
fn backup_restore_round_trip() {
    let mut settings = wifi_settings();
    assert!(settings.begin("app", false));

    assert_eq!(settings.set_str("wifi_ssid", "home-net", true), Status::Persisted);
    assert_eq!(settings.set("wifi_enable", true, true), Status::Persisted);
    assert_eq!(settings.set("ntp_interval", 600u32, true), Status::Persisted);

    let mut backup = String::new();
    settings.backup(&mut backup, true).unwrap();

    // Wipe everything, then replay the backup
    settings.clear();
    assert!(!settings.stored("wifi_ssid"));
    assert!(settings.restore(&backup));

    assert_eq!(settings.get("wifi_ssid").unwrap().as_str(), Some("home-net"));
    assert_eq!(settings.get("wifi_enable"), Some(Value::Bool(true)));
    assert_eq!(settings.get("ntp_interval"), Some(Value::U32(600)));
    assert_eq!(
        settings.get("ntp_server").unwrap().as_str(),
        Some("pool.ntp.org")
    );
}

#[test]
fn migration_runs_before_begin_and_bypasses_cache() {
    // A previous firmware revision stored the interval as i32
    let mut storage = MemoryStorage::new();
    assert!(storage.store_i32("ntp_interval", 42));

    let mut settings = Settings::new(storage);
    assert!(settings.configure("ntp_interval", 3600u32, None));

    let mut migration = Migration::new(&mut settings);
    assert!(migration.begin("app"));
    assert_eq!(
        migration.migrate::<i32, _>("ntp_interval", |old| Some(Value::U32((old * 2) as u32))),
        Status::Persisted
    );
    migration.end();

    assert!(settings.begin("app", false));
    assert_eq!(settings.get("ntp_interval"), Some(Value::U32(84)));
}

#[test]
fn persisted_values_survive_reopen() {
    let mut storage = MemoryStorage::new();
    assert!(storage.store_u32("ntp_interval", 600));

    let mut settings = Settings::new(storage);
    assert!(settings.configure("ntp_interval", 3600u32, None));
    assert!(settings.begin("app", true));
    assert_eq!(settings.get("ntp_interval"), Some(Value::U32(600)));

    // Close and reopen: the cache is rebuilt from storage
    settings.end();
    assert_eq!(settings.get("ntp_interval"), Some(Value::U32(3600)));
    assert!(settings.begin("app", false));
    assert_eq!(settings.get("ntp_interval"), Some(Value::U32(600)));
}
