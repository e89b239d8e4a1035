//! Hierarchical content store primitives backing AliasDesk.
//! AliasDesk 所使用的階層式內容儲存核心模組。

mod util;

pub mod events;
pub mod id;
pub mod node_store;
pub mod security;
pub mod tree;
pub mod tree_store;

pub use events::{DeletionEvents, DeletionSubscription, NodeDeleted};
pub use id::{NodeId, ShortIdError};
pub use node_store::NodeStore;
pub use security::{SecurityContext, SecurityDisabler};
pub use tree::{ContentNode, ContentTree, TreeError, ALIAS_TEMPLATE, FOLDER_TEMPLATE, ITEM_TEMPLATE};
pub use tree_store::{ContentTreeStore, ContentTreeStoreError};
