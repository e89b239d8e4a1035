use aliasdesk_settings::AliasSettings;
use aliasdesk_store::{NodeId, NodeStore, TreeError};

use crate::entry::{relative_path, AliasEntry};
use crate::error::{AliasError, ControllerError, Outcome};
use crate::link::LinkField;
use crate::path_spec::AliasPath;

/// Resolves or creates alias node chains below the alias root.
/// 在別名根節點下解析或建立別名節點鏈。
///
/// Ascenders behave like `mkdir -p` and are reused when present; the leaf is
/// created exclusively and a clash yields [`AliasError::DuplicateAlias`].
#[derive(Debug, Clone)]
pub struct AliasTree<'a> {
    settings: &'a AliasSettings,
}

impl<'a> AliasTree<'a> {
    pub fn new(settings: &'a AliasSettings) -> Self {
        Self { settings }
    }

    /// Creates the alias `path` under `root`, linking its leaf to `target`.
    /// Ascenders created before a duplicate leaf is detected are kept.
    pub fn create<S: NodeStore + ?Sized>(
        &self,
        store: &mut S,
        path: &AliasPath,
        target: NodeId,
        root: NodeId,
    ) -> Result<Outcome<AliasEntry>, ControllerError> {
        let template = self.settings.alias_template.as_str();
        if !store.has_template(template) {
            return Err(ControllerError::TemplateMissing(template.to_string()));
        }
        let target_path = store
            .path(target)
            .ok_or_else(|| ControllerError::TargetMissing(target.to_string()))?;

        let mut parent = root;
        for segment in path.ascenders() {
            let existing = store.child(parent, segment).map(|node| node.id);
            parent = match existing {
                Some(id) => id,
                None => store.create_child(parent, segment, template)?,
            };
        }

        let name = path.name();
        if store.child(parent, name).is_some() {
            return Ok(Outcome::Rejected(AliasError::DuplicateAlias(path.to_string())));
        }
        let leaf = match store.create_child(parent, name, template) {
            Ok(id) => id,
            Err(TreeError::DuplicateName { .. }) => {
                return Ok(Outcome::Rejected(AliasError::DuplicateAlias(path.to_string())))
            }
            Err(err) => return Err(err.into()),
        };

        let link = LinkField::internal(self.content_path(&target_path), target);
        store.set_field(leaf, &self.settings.link_field, &link.to_xml()?)?;

        let entry = AliasEntry::for_node(leaf, relative_path(store, leaf, root));
        log::info!("created alias '{}' for {}", entry.header, target_path);
        Ok(Outcome::Applied(entry))
    }

    /// Target path as seen from the site: the content root prefix is dropped.
    pub fn content_path(&self, full_path: &str) -> String {
        let content_root = self.settings.content_root.trim_end_matches('/');
        match full_path.strip_prefix(content_root) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => full_path.to_string(),
        }
    }
}
