use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tree::{ContentTree, ALIAS_TEMPLATE};
use crate::util::write_atomic;

/// On-disk home of the content tree (`content.json`).
/// 內容樹的磁碟檔案（`content.json`）。
///
/// With [`ContentTreeStore::with_alias_root`] set, a loaded tree must carry
/// the alias template and the alias root node, otherwise alias editing has
/// nowhere to write and the load fails up front.
#[derive(Debug, Clone)]
pub struct ContentTreeStore {
    path: PathBuf,
    alias_root: Option<String>,
}

impl ContentTreeStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            alias_root: None,
        }
    }

    /// 載入時要求此別名根節點存在。 / Requires `alias_root` to resolve on load.
    pub fn with_alias_root(mut self, alias_root: impl Into<String>) -> Self {
        self.alias_root = Some(alias_root.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the tree; `Ok(None)` when no file was written yet.
    /// 讀取內容樹；尚未建立檔案時回傳 `Ok(None)`。
    pub fn load(&self) -> Result<Option<ContentTree>, ContentTreeStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ContentTreeStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let tree: ContentTree =
            serde_json::from_str(&contents).map_err(|err| ContentTreeStoreError::Invalid {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        self.check_alias_layout(&tree)?;
        log::debug!(
            "loaded content tree revision {} ({} nodes) from {}",
            tree.revision(),
            tree.len(),
            self.path.display()
        );
        Ok(Some(tree))
    }

    /// Writes the tree through a temporary file and a rename.
    pub fn save(&self, tree: &ContentTree) -> Result<(), ContentTreeStoreError> {
        let payload =
            serde_json::to_vec_pretty(tree).map_err(|err| ContentTreeStoreError::Invalid {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        write_atomic(&self.path, &payload).map_err(|source| ContentTreeStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!(
            "saved content tree revision {} to {}",
            tree.revision(),
            self.path.display()
        );
        Ok(())
    }

    fn check_alias_layout(&self, tree: &ContentTree) -> Result<(), ContentTreeStoreError> {
        let Some(alias_root) = &self.alias_root else {
            return Ok(());
        };
        if !tree.has_template(ALIAS_TEMPLATE) {
            return Err(ContentTreeStoreError::MissingTemplate {
                path: self.path.clone(),
                template: ALIAS_TEMPLATE.to_string(),
            });
        }
        if tree.node_at(alias_root).is_none() {
            return Err(ContentTreeStoreError::MissingAliasRoot {
                path: self.path.clone(),
                alias_root: alias_root.clone(),
            });
        }
        Ok(())
    }
}

/// 內容樹檔案的讀寫錯誤。 / Failures reading or writing the content tree file.
#[derive(Debug, Error)]
pub enum ContentTreeStoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid content tree in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
    #[error("content tree in {path} has no '{template}' template")]
    MissingTemplate { path: PathBuf, template: String },
    #[error("content tree in {path} has no alias root at {alias_root}")]
    MissingAliasRoot { path: PathBuf, alias_root: String },
}
