pub mod alias_tree;
pub mod audit;
pub mod controller;
pub mod entry;
pub mod error;
pub mod index;
pub mod link;
pub mod path_spec;
pub mod policy;
pub mod ui;

pub use alias_tree::AliasTree;
pub use audit::{describe_node, AuditSink, LogAuditSink, AUDIT_TARGET};
pub use controller::{AliasListController, PageRequest, PendingDeletions, TargetRef};
pub use entry::{decode_list_id, list_id, relative_path, AliasEntry, LIST_ID_PREFIX};
pub use error::{AliasError, ControllerError, Outcome};
pub use index::AliasIndex;
pub use link::{LinkField, LinkFieldError};
pub use path_spec::{AliasPath, PathSpecError, SEPARATOR};
pub use policy::{NamePolicy, PolicyViolation};
pub use ui::{js_string, CommandQueue, UiCommand, UiDispatcher};
