use aliasdesk_store::{NodeId, NodeStore, ShortIdError};

/// Prefix that turns a short id into a list item id.
pub const LIST_ID_PREFIX: char = 'I';

/// One row of the editor-visible alias list.
/// 編輯器別名清單中的一列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// `I` followed by the node's short id.
    pub list_id: String,
    /// Alias path relative to the alias root, without a leading `/`.
    pub header: String,
    /// Full node id.
    pub value: String,
}

impl AliasEntry {
    pub fn for_node(id: NodeId, header: impl Into<String>) -> Self {
        Self {
            list_id: list_id(id),
            header: header.into(),
            value: id.to_string(),
        }
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.value.parse().ok()
    }
}

pub fn list_id(id: NodeId) -> String {
    format!("{LIST_ID_PREFIX}{}", id.to_short_id())
}

/// Reverses [`list_id`]. The first character is dropped whatever it is.
pub fn decode_list_id(list_id: &str) -> Result<NodeId, ShortIdError> {
    let mut chars = list_id.chars();
    chars.next();
    NodeId::from_short_id(chars.as_str())
}

/// Path of `node` below `root`, e.g. `news/2024`. Falls back to the node's
/// full path when it does not live under `root`.
pub fn relative_path<S: NodeStore + ?Sized>(store: &S, node: NodeId, root: NodeId) -> String {
    let full = store.path(node).unwrap_or_default();
    let relative = store
        .path(root)
        .and_then(|root_path| {
            full.strip_prefix(root_path.as_str())
                .filter(|rest| rest.starts_with('/'))
                .map(str::to_string)
        })
        .unwrap_or_else(|| full.clone());
    relative.trim_start_matches('/').to_string()
}
