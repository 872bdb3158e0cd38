use budgetbud_config::{Config, ConfigError, ConfigManager, Theme};
use budgetbud_domain::Frequency;
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.default_frequency, Frequency::Weekly);
    assert_eq!(cfg.top_categories, 5);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    assert_eq!(manager.load().expect("defaults"), Config::default());

    let mut cfg = Config::default();
    cfg.set("currency", "eur").expect("currency");
    cfg.set("default_frequency", "Bi-Weekly").expect("frequency");
    cfg.last_user = Some("alice".into());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "EUR");
    assert_eq!(loaded.default_frequency, Frequency::Biweekly);
    assert_eq!(loaded.last_user.as_deref(), Some("alice"));
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn set_rejects_unknown_keys_and_bad_values() {
    let mut cfg = Config::default();

    assert!(matches!(
        cfg.set("colour", "on"),
        Err(ConfigError::UnknownKey(key)) if key == "colour"
    ));
    assert!(matches!(
        cfg.set("top_categories", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set("default_frequency", "daily"),
        Err(ConfigError::InvalidValue { .. })
    ));
    cfg.set("theme", "DARK").expect("theme");
    cfg.set("ui_color_enabled", "off").expect("color");
    assert_eq!(cfg.theme, Theme::Dark);
    assert!(!cfg.ui_color_enabled);
}

#[test]
fn unknown_theme_falls_back_to_system() {
    let raw = r#"{"locale":"en-US","currency":"USD","theme":"neon"}"#;
    let cfg: Config = serde_json::from_str(raw).expect("parse");
    assert_eq!(cfg.theme, Theme::System);
    assert_eq!(cfg.top_categories, 5);
}

#[test]
fn backups_round_trip_through_restore() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("locale", "pt-PT").expect("locale");
    let name = manager.backup(&cfg, Some("Before trip")).expect("backup");
    assert!(name.starts_with("config_"));
    assert!(name.ends_with("_before-trip.json"));
    assert_eq!(manager.list_backups().expect("list"), vec![name.clone()]);

    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.locale, "pt-PT");
    assert_eq!(manager.load().expect("load").locale, "pt-PT");

    assert!(matches!(
        manager.restore("config_19990101_000000.json"),
        Err(ConfigError::Io(_))
    ));
}
