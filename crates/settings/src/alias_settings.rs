use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SETTINGS_VERSION: u32 = 1;

/// Default item-name rule: a word character, `*` or `$`, followed by word
/// characters, whitespace, `-` or `$`, with an optional `(n)` suffix.
pub const DEFAULT_ITEM_NAME_VALIDATION: &str = r"^[\w\*\$][\w\s\-\$]*(\(\d{1,}\)){0,1}$";
pub const DEFAULT_MAX_ITEM_NAME_LENGTH: usize = 100;
pub const DEFAULT_ALIAS_ROOT: &str = "/sitecore/system/Aliases";
pub const DEFAULT_ALIAS_TEMPLATE: &str = "System/Alias";
pub const DEFAULT_LINK_FIELD: &str = "Linked Item";
pub const DEFAULT_CONTENT_ROOT: &str = "/sitecore/content";
pub const DEFAULT_APPLICATION: &str = "Content Editor/Ribbons/Chunks/Page Urls";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize settings {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Configuration consumed by the alias dialog.
/// 別名對話框所使用的設定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_item_name_validation")]
    pub item_name_validation: String,
    #[serde(default = "default_max_item_name_length")]
    pub max_item_name_length: usize,
    #[serde(default = "default_alias_root")]
    pub alias_root: String,
    #[serde(default = "default_alias_template")]
    pub alias_template: String,
    #[serde(default = "default_link_field")]
    pub link_field: String,
    #[serde(default = "default_content_root")]
    pub content_root: String,
    #[serde(default = "default_application")]
    pub application: String,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_item_name_validation() -> String {
    DEFAULT_ITEM_NAME_VALIDATION.to_string()
}

fn default_max_item_name_length() -> usize {
    DEFAULT_MAX_ITEM_NAME_LENGTH
}

fn default_alias_root() -> String {
    DEFAULT_ALIAS_ROOT.to_string()
}

fn default_alias_template() -> String {
    DEFAULT_ALIAS_TEMPLATE.to_string()
}

fn default_link_field() -> String {
    DEFAULT_LINK_FIELD.to_string()
}

fn default_content_root() -> String {
    DEFAULT_CONTENT_ROOT.to_string()
}

fn default_application() -> String {
    DEFAULT_APPLICATION.to_string()
}

impl Default for AliasSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            item_name_validation: default_item_name_validation(),
            max_item_name_length: DEFAULT_MAX_ITEM_NAME_LENGTH,
            alias_root: default_alias_root(),
            alias_template: default_alias_template(),
            link_field: default_link_field(),
            content_root: default_content_root(),
            application: default_application(),
        }
    }
}

impl AliasSettings {
    /// Repairs blank or out-of-range values with their defaults.
    /// 以預設值修正空白或超出範圍的設定。
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = SETTINGS_VERSION;
        }
        if self.item_name_validation.trim().is_empty() {
            self.item_name_validation = default_item_name_validation();
        }
        if self.max_item_name_length == 0 {
            self.max_item_name_length = DEFAULT_MAX_ITEM_NAME_LENGTH;
        }
        sanitize_path(&mut self.alias_root, DEFAULT_ALIAS_ROOT);
        sanitize_path(&mut self.content_root, DEFAULT_CONTENT_ROOT);
        if self.alias_template.trim().is_empty() {
            self.alias_template = default_alias_template();
        }
        if self.link_field.trim().is_empty() {
            self.link_field = default_link_field();
        }
        if self.application.trim().is_empty() {
            self.application = default_application();
        }
    }
}

fn sanitize_path(value: &mut String, fallback: &str) {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.trim_start_matches('/').is_empty() {
        *value = fallback.to_string();
    } else if trimmed.starts_with('/') {
        *value = trimmed.to_string();
    } else {
        *value = format!("/{trimmed}");
    }
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    data: AliasSettings,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, settings: AliasSettings) -> Self {
        Self {
            path: path.into(),
            data: settings,
        }
    }

    /// Loads settings, falling back to defaults when the file is missing.
    /// 載入設定；檔案不存在時使用預設值。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut data = AliasSettings::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let contents = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: AliasSettings =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        Ok(Self { path, data })
    }

    pub fn settings(&self) -> &AliasSettings {
        &self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), SettingsError>
    where
        F: FnMut(&mut AliasSettings),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload =
            serde_json::to_string_pretty(&self.data).map_err(|source| SettingsError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| SettingsError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_normalizes_root_paths() {
        let mut settings = AliasSettings {
            alias_root: "sitecore/system/Aliases/".into(),
            content_root: "  ".into(),
            ..AliasSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.alias_root, "/sitecore/system/Aliases");
        assert_eq!(settings.content_root, DEFAULT_CONTENT_ROOT);
    }
}
