use aliasdesk_settings::{
    AliasSettings, SettingsStore, DEFAULT_ALIAS_ROOT, DEFAULT_ITEM_NAME_VALIDATION,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");

    let store = SettingsStore::load(&path).expect("load defaults");
    let settings = store.settings();
    assert_eq!(settings.max_item_name_length, 100);
    assert_eq!(settings.alias_root, DEFAULT_ALIAS_ROOT);
    assert_eq!(settings.alias_template, "System/Alias");
    assert_eq!(settings.link_field, "Linked Item");
    assert_eq!(settings.item_name_validation, DEFAULT_ITEM_NAME_VALIDATION);
    assert!(!path.exists(), "loading defaults must not create the file");
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("settings.json");

    let mut store = SettingsStore::new(path.clone(), AliasSettings::default());
    store
        .update(|settings| {
            settings.max_item_name_length = 40;
            settings.alias_root = "/sitecore/system/Short Urls".to_string();
        })
        .expect("save");

    let reloaded = SettingsStore::load(&path).expect("reload");
    assert_eq!(reloaded.settings().max_item_name_length, 40);
    assert_eq!(reloaded.settings().alias_root, "/sitecore/system/Short Urls");
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn partial_and_invalid_values_fall_back_to_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "max_item_name_length": 0,
            "item_name_validation": "",
            "link_field": "Target"
        }"#,
    )
    .expect("write legacy settings");

    let store = SettingsStore::load(&path).expect("load partial file");
    let settings = store.settings();
    assert_eq!(settings.version, 1);
    assert_eq!(
        settings.max_item_name_length, 100,
        "zero length limit should fall back to default"
    );
    assert_eq!(settings.item_name_validation, DEFAULT_ITEM_NAME_VALIDATION);
    assert_eq!(
        settings.link_field, "Target",
        "specified field name should be preserved"
    );
    assert_eq!(settings.alias_root, DEFAULT_ALIAS_ROOT);
}

#[test]
fn malformed_file_reports_parse_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(&path, "{ not json").expect("write");

    let err = SettingsStore::load(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse settings"));
}
