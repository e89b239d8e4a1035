use aliasdesk_store::{NodeId, NodeStore};

/// Log target used for audit records.
pub const AUDIT_TARGET: &str = "aliasdesk::audit";

/// Destination for audit records of alias removals.
pub trait AuditSink {
    fn log_removal(&mut self, actor: &str, description: &str);
}

/// Writes audit records through the `log` facade under [`AUDIT_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn log_removal(&mut self, actor: &str, description: &str) {
        log::info!(target: AUDIT_TARGET, "AUDIT ({actor}): Remove alias: {description}");
    }
}

impl AuditSink for Vec<String> {
    fn log_removal(&mut self, actor: &str, description: &str) {
        self.push(format!("{actor}: Remove alias: {description}"));
    }
}

impl<T: AuditSink + ?Sized> AuditSink for &mut T {
    fn log_removal(&mut self, actor: &str, description: &str) {
        (**self).log_removal(actor, description);
    }
}

/// `"{path}, id: {id}"`, or just the id once the node is gone.
pub fn describe_node<S: NodeStore + ?Sized>(store: &S, id: NodeId) -> String {
    match store.path(id) {
        Some(path) => format!("{path}, id: {id}"),
        None => format!("id: {id}"),
    }
}
