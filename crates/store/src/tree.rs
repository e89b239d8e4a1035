use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::{DeletionEvents, NodeDeleted};
use crate::id::NodeId;
use crate::security::SecurityContext;

/// Template used for structural folders created by [`ContentTree::ensure_path`].
pub const FOLDER_TEMPLATE: &str = "Common/Folder";
/// Template of alias nodes.
pub const ALIAS_TEMPLATE: &str = "System/Alias";
/// Template of ordinary content items.
pub const ITEM_TEMPLATE: &str = "Sample/Item";

/// A single node stored inside the tree.
/// 內容樹中的單一節點。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentNode {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub protected: bool,
}

impl ContentNode {
    /// Reads a field; names compare case-insensitively.
    /// 讀取欄位值；欄位名稱不區分大小寫。
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Hierarchical content store kept in memory.
/// 常駐記憶體的階層式內容儲存。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TreeSnapshot", into = "TreeSnapshot")]
pub struct ContentTree {
    revision: u64,
    next_id: u64,
    root: NodeId,
    templates: BTreeSet<String>,
    nodes: BTreeMap<NodeId, ContentNode>,
    events: DeletionEvents,
}

impl ContentTree {
    /// Constructs a tree holding only a root folder.
    /// 建立僅含根資料夾的內容樹。
    pub fn empty(root_name: impl Into<String>) -> Self {
        let root = NodeId::from_u64(1);
        let mut nodes = BTreeMap::new();
        nodes.insert(
            root,
            ContentNode {
                id: root,
                parent: None,
                name: root_name.into(),
                template: FOLDER_TEMPLATE.to_string(),
                children: Vec::new(),
                fields: BTreeMap::new(),
                protected: false,
            },
        );
        Self {
            revision: 0,
            next_id: 2,
            root,
            templates: BTreeSet::from([FOLDER_TEMPLATE.to_string()]),
            nodes,
            events: DeletionEvents::new(),
        }
    }

    /// Builds the standard layout: `/sitecore/content` plus a protected
    /// `/sitecore/system/Aliases` folder, with folder, alias and item templates.
    /// 建立標準結構與預設範本。
    pub fn bootstrap() -> Self {
        let mut tree = Self::empty("sitecore");
        tree.register_template(ALIAS_TEMPLATE);
        tree.register_template(ITEM_TEMPLATE);
        let root = tree.root;
        tree.insert_child(root, "content", FOLDER_TEMPLATE);
        let system = tree.insert_child(root, "system", FOLDER_TEMPLATE);
        let aliases = tree.insert_child(system, "Aliases", FOLDER_TEMPLATE);
        if let Some(node) = tree.nodes.get_mut(&aliases) {
            node.protected = true;
        }
        tree
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn register_template(&mut self, template: impl Into<String>) {
        self.templates.insert(template.into());
    }

    pub fn has_template(&self, template: &str) -> bool {
        self.templates.contains(template)
    }

    /// Finds a node by identifier.
    /// 依識別碼尋找節點。
    pub fn node(&self, id: NodeId) -> Option<&ContentNode> {
        self.nodes.get(&id)
    }

    /// Resolves an absolute path such as `/sitecore/system/Aliases`.
    /// 解析絕對路徑。
    pub fn node_at(&self, path: &str) -> Option<&ContentNode> {
        let mut segments = path.trim_matches('/').split('/');
        let root = self.nodes.get(&self.root)?;
        if segments.next()? != root.name {
            return None;
        }
        segments.try_fold(root, |current, segment| self.child(current.id, segment))
    }

    /// Looks up the direct child of `parent` with exactly `name`.
    pub fn child(&self, parent: NodeId, name: &str) -> Option<&ContentNode> {
        self.nodes
            .get(&parent)?
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .find(|node| node.name == name)
    }

    /// Adds a new child node under the specified parent.
    /// 在指定的父節點下方新增子節點。
    pub fn create_child(
        &mut self,
        parent: NodeId,
        name: &str,
        template: &str,
    ) -> Result<NodeId, TreeError> {
        if name.is_empty() || name.contains('/') {
            return Err(TreeError::InvalidName(name.to_string()));
        }
        if !self.templates.contains(template) {
            return Err(TreeError::UnknownTemplate(template.to_string()));
        }
        if !self.nodes.contains_key(&parent) {
            return Err(TreeError::NodeNotFound(parent));
        }
        if self.child(parent, name).is_some() {
            return Err(TreeError::DuplicateName {
                parent,
                name: name.to_string(),
            });
        }

        Ok(self.insert_child(parent, name, template))
    }

    fn insert_child(&mut self, parent: NodeId, name: &str, template: &str) -> NodeId {
        let id = NodeId::from_u64(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            ContentNode {
                id,
                parent: Some(parent),
                name: name.to_string(),
                template: template.to_string(),
                children: Vec::new(),
                fields: BTreeMap::new(),
                protected: false,
            },
        );
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        self.revision = self.revision.wrapping_add(1);
        log::debug!("created node {id} '{name}' ({template}) under {parent}");
        id
    }

    /// Walks an absolute path, creating missing segments with `template`.
    /// 依序走訪絕對路徑，缺少的節點以指定範本建立。
    pub fn ensure_path(&mut self, path: &str, template: &str) -> Result<NodeId, TreeError> {
        let mut segments = path.trim_matches('/').split('/');
        let root_name = self.nodes.get(&self.root).map(|root| root.name.clone());
        if segments.next().map(str::to_string) != root_name {
            return Err(TreeError::InvalidName(path.to_string()));
        }
        let mut current = self.root;
        for segment in segments {
            let existing = self.child(current, segment).map(|node| node.id);
            current = match existing {
                Some(id) => id,
                None => self.create_child(current, segment, template)?,
            };
        }
        Ok(current)
    }

    pub fn set_protected(&mut self, id: NodeId, protected: bool) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))?;
        node.protected = protected;
        Ok(())
    }

    pub fn field(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(&id)?.field(name)
    }

    /// Writes a field, replacing any value stored under a differently-cased name.
    pub fn set_field(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))?;
        node.fields.retain(|key, _| !key.eq_ignore_ascii_case(name));
        node.fields.insert(name.to_string(), value.to_string());
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    /// Full slash-separated path of a node, starting with the root name.
    pub fn path(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes.get(&current)?;
            names.push(node.name.as_str());
            cursor = node.parent;
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }

    /// Depth-first, pre-order descendants of `root` readable under `security`.
    /// Unreadable nodes hide their whole subtree.
    /// 依深度優先前序列出可讀取的子孫節點。
    pub fn descendants(&self, root: NodeId, security: &SecurityContext) -> Vec<NodeId> {
        let mut collected = Vec::new();
        let Some(start) = self.nodes.get(&root) else {
            return collected;
        };
        let mut stack: Vec<NodeId> = start.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !security.can_read(node) {
                continue;
            }
            collected.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        collected
    }

    /// Deletes the given nodes together with their subtrees, then publishes
    /// one [`NodeDeleted`] for every node that left the tree, subtree members
    /// included, in pre-order. Returns the requested ids.
    /// 刪除節點及其子樹，並為每個被移除的節點（含子孫）發布事件。
    pub fn delete_nodes(&mut self, ids: &[NodeId]) -> Result<Vec<NodeId>, TreeError> {
        for id in ids {
            if *id == self.root {
                return Err(TreeError::RootDeletion);
            }
            if !self.nodes.contains_key(id) {
                return Err(TreeError::NodeNotFound(*id));
            }
        }

        // Events are captured up front; paths are gone once a subtree is removed.
        let mut events: Vec<NodeDeleted> = Vec::new();
        let mut requested: Vec<NodeId> = Vec::new();
        for id in ids {
            if requested.contains(id) {
                continue;
            }
            requested.push(*id);
            for removed in self.subtree_preorder(*id) {
                if events.iter().any(|event| event.id == removed) {
                    continue;
                }
                let (Some(node), Some(path)) = (self.nodes.get(&removed), self.path(removed)) else {
                    continue;
                };
                events.push(NodeDeleted {
                    id: removed,
                    parent: node.parent,
                    name: node.name.clone(),
                    path,
                });
            }
        }

        for id in &requested {
            let parent = self.nodes.get(id).and_then(|node| node.parent);
            if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
                parent.children.retain(|child| child != id);
            }
            self.remove_subtree(*id);
        }

        if !events.is_empty() {
            self.revision = self.revision.wrapping_add(1);
        }
        for event in &events {
            log::debug!("deleted node {} at {}", event.id, event.path);
            self.events.publish(event);
        }
        Ok(requested)
    }

    fn subtree_preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut collected = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                collected.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        collected
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                pending.extend(node.children);
            }
        }
    }

    /// Store-wide deletion channel.
    pub fn deletion_events(&self) -> &DeletionEvents {
        &self.events
    }
}

/// Serialized form of [`ContentTree`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeSnapshot {
    revision: u64,
    next_id: u64,
    root: NodeId,
    #[serde(default)]
    templates: BTreeSet<String>,
    nodes: Vec<ContentNode>,
}

impl From<ContentTree> for TreeSnapshot {
    fn from(tree: ContentTree) -> Self {
        Self {
            revision: tree.revision,
            next_id: tree.next_id,
            root: tree.root,
            templates: tree.templates,
            nodes: tree.nodes.into_values().collect(),
        }
    }
}

impl TryFrom<TreeSnapshot> for ContentTree {
    type Error = TreeError;

    fn try_from(snapshot: TreeSnapshot) -> Result<Self, Self::Error> {
        let nodes: BTreeMap<NodeId, ContentNode> = snapshot
            .nodes
            .into_iter()
            .map(|node| (node.id, node))
            .collect();
        if !nodes.contains_key(&snapshot.root) {
            return Err(TreeError::NodeNotFound(snapshot.root));
        }
        for node in nodes.values() {
            if let Some(parent) = node.parent {
                if !nodes.contains_key(&parent) {
                    return Err(TreeError::NodeNotFound(parent));
                }
            }
            if node.id.as_u64() >= snapshot.next_id {
                return Err(TreeError::IdOverflow(node.id));
            }
        }
        Ok(Self {
            revision: snapshot.revision,
            next_id: snapshot.next_id,
            root: snapshot.root,
            templates: snapshot.templates,
            nodes,
            events: DeletionEvents::new(),
        })
    }
}

/// Tree-manipulation errors.
/// 內容樹操作錯誤類型。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("node {parent} already has a child named '{name}'")]
    DuplicateName { parent: NodeId, name: String },
    #[error("template '{0}' is not registered")]
    UnknownTemplate(String),
    #[error("'{0}' is not a valid node name")]
    InvalidName(String),
    #[error("the root node cannot be deleted")]
    RootDeletion,
    #[error("node {0} is not below the id watermark")]
    IdOverflow(NodeId),
}
