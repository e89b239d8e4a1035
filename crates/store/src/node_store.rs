use crate::events::DeletionEvents;
use crate::id::NodeId;
use crate::security::SecurityContext;
use crate::tree::{ContentNode, ContentTree, TreeError};

/// Operations the alias core needs from a hierarchical content store.
/// 別名核心所需的階層式內容儲存操作。
pub trait NodeStore {
    fn node(&self, id: NodeId) -> Option<&ContentNode>;

    /// Resolves an absolute path (`/sitecore/system/Aliases`).
    fn node_at(&self, path: &str) -> Option<&ContentNode>;

    fn child(&self, parent: NodeId, name: &str) -> Option<&ContentNode>;

    fn has_template(&self, template: &str) -> bool;

    fn create_child(
        &mut self,
        parent: NodeId,
        name: &str,
        template: &str,
    ) -> Result<NodeId, TreeError>;

    /// Deletes a batch of nodes and announces each one on [`NodeStore::deletion_events`].
    fn delete_nodes(&mut self, ids: &[NodeId]) -> Result<Vec<NodeId>, TreeError>;

    fn descendants(&self, root: NodeId, security: &SecurityContext) -> Vec<NodeId>;

    fn field(&self, id: NodeId, name: &str) -> Option<&str>;

    fn set_field(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), TreeError>;

    fn path(&self, id: NodeId) -> Option<String>;

    fn deletion_events(&self) -> &DeletionEvents;
}

impl NodeStore for ContentTree {
    fn node(&self, id: NodeId) -> Option<&ContentNode> {
        ContentTree::node(self, id)
    }

    fn node_at(&self, path: &str) -> Option<&ContentNode> {
        ContentTree::node_at(self, path)
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<&ContentNode> {
        ContentTree::child(self, parent, name)
    }

    fn has_template(&self, template: &str) -> bool {
        ContentTree::has_template(self, template)
    }

    fn create_child(
        &mut self,
        parent: NodeId,
        name: &str,
        template: &str,
    ) -> Result<NodeId, TreeError> {
        ContentTree::create_child(self, parent, name, template)
    }

    fn delete_nodes(&mut self, ids: &[NodeId]) -> Result<Vec<NodeId>, TreeError> {
        ContentTree::delete_nodes(self, ids)
    }

    fn descendants(&self, root: NodeId, security: &SecurityContext) -> Vec<NodeId> {
        ContentTree::descendants(self, root, security)
    }

    fn field(&self, id: NodeId, name: &str) -> Option<&str> {
        ContentTree::field(self, id, name)
    }

    fn set_field(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        ContentTree::set_field(self, id, name, value)
    }

    fn path(&self, id: NodeId) -> Option<String> {
        ContentTree::path(self, id)
    }

    fn deletion_events(&self) -> &DeletionEvents {
        ContentTree::deletion_events(self)
    }
}
