use aliasdesk_settings::AliasSettings;
use aliasdesk_store::{NodeId, NodeStore, SecurityContext};

use crate::entry::{relative_path, AliasEntry};
use crate::link::LinkField;

/// Reverse lookup from a target node to the aliases linking to it.
/// 由目標節點反查所有連結至它的別名。
#[derive(Debug, Clone)]
pub struct AliasIndex<'a> {
    settings: &'a AliasSettings,
}

impl<'a> AliasIndex<'a> {
    pub fn new(settings: &'a AliasSettings) -> Self {
        Self { settings }
    }

    /// Every alias below `root` whose link references `target`, in
    /// depth-first pre-order. Read checks are suspended for the walk.
    pub fn find_aliases_for<S: NodeStore + ?Sized>(
        &self,
        store: &S,
        security: &SecurityContext,
        target: NodeId,
        root: NodeId,
    ) -> Vec<AliasEntry> {
        let _unchecked = security.disable_checks();
        let entries: Vec<AliasEntry> = store
            .descendants(root, security)
            .into_iter()
            .filter(|id| self.links_to(store, *id, target))
            .map(|id| AliasEntry::for_node(id, relative_path(store, id, root)))
            .collect();
        log::debug!("found {} alias(es) for {target}", entries.len());
        entries
    }

    /// Whether `node` carries a parseable link pointing at `target`.
    pub fn links_to<S: NodeStore + ?Sized>(&self, store: &S, node: NodeId, target: NodeId) -> bool {
        store
            .field(node, &self.settings.link_field)
            .and_then(|raw| LinkField::parse(raw).ok())
            .is_some_and(|link| link.target_id == target)
    }
}
