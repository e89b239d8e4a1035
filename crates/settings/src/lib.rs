pub mod alias_settings;

pub use alias_settings::{
    AliasSettings, SettingsError, SettingsStore, DEFAULT_ALIAS_ROOT, DEFAULT_ALIAS_TEMPLATE,
    DEFAULT_APPLICATION, DEFAULT_CONTENT_ROOT, DEFAULT_ITEM_NAME_VALIDATION, DEFAULT_LINK_FIELD,
    DEFAULT_MAX_ITEM_NAME_LENGTH,
};
