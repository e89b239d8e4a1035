use std::collections::BTreeSet;
use std::fmt;

use aliasdesk_settings::AliasSettings;
use aliasdesk_store::{DeletionSubscription, NodeDeleted, NodeId, NodeStore, SecurityContext};

use crate::alias_tree::AliasTree;
use crate::audit::{describe_node, AuditSink};
use crate::entry::{decode_list_id, list_id, AliasEntry};
use crate::error::{AliasError, ControllerError, Outcome};
use crate::index::AliasIndex;
use crate::path_spec::AliasPath;
use crate::policy::NamePolicy;
use crate::ui::{UiCommand, UiDispatcher};

/// How the request names the content node whose aliases are edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Id(NodeId),
    Path(String),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Id(id) => write!(f, "{id}"),
            TargetRef::Path(path) => f.write_str(path),
        }
    }
}

/// Context of one page lifecycle turn.
/// 單次頁面生命週期的請求內容。
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub target: TargetRef,
    pub is_postback: bool,
    pub security: SecurityContext,
}

impl PageRequest {
    /// Initial (non-postback) load for `target`.
    pub fn new(target: TargetRef, security: SecurityContext) -> Self {
        Self {
            target,
            is_postback: false,
            security,
        }
    }

    pub fn postback(mut self) -> Self {
        self.is_postback = true;
        self
    }
}

/// 等待刪除通知的清單項目 ID。 / List ids awaiting their deletion notification.
#[derive(Debug, Default, Clone)]
pub struct PendingDeletions {
    ids: BTreeSet<String>,
}

impl PendingDeletions {
    /// 以新的集合取代原有內容。 / Replaces the whole set.
    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.ids = ids.into_iter().collect();
    }

    /// 取出項目；不存在時回傳 `false`。 / Consumes an id, returning false if it was not pending.
    pub fn take(&mut self, list_id: &str) -> bool {
        self.ids.remove(list_id)
    }

    pub fn contains(&self, list_id: &str) -> bool {
        self.ids.contains(list_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Drives the alias dialog for one target during one lifecycle turn.
/// 在單次生命週期內驅動某個目標節點的別名對話框。
///
/// Construction subscribes to the store's deletion channel; the
/// subscription lives until [`AliasListController::finish`] or drop.
pub struct AliasListController<'s, S, U, A>
where
    S: NodeStore + ?Sized,
    U: UiDispatcher,
    A: AuditSink,
{
    store: &'s mut S,
    ui: U,
    audit: A,
    settings: AliasSettings,
    policy: NamePolicy,
    request: PageRequest,
    entries: Vec<AliasEntry>,
    pending: PendingDeletions,
    subscription: DeletionSubscription,
}

impl<'s, S, U, A> AliasListController<'s, S, U, A>
where
    S: NodeStore + ?Sized,
    U: UiDispatcher,
    A: AuditSink,
{
    pub fn new(
        store: &'s mut S,
        ui: U,
        audit: A,
        settings: AliasSettings,
        request: PageRequest,
    ) -> Result<Self, ControllerError> {
        let policy = NamePolicy::from_settings(&settings)?;
        let subscription = store.deletion_events().subscribe();
        Ok(Self {
            store,
            ui,
            audit,
            settings,
            policy,
            request,
            entries: Vec::new(),
            pending: PendingDeletions::default(),
            subscription,
        })
    }

    /// Page load hook: verifies access, then refreshes unless this is a postback.
    /// 頁面載入：檢查權限，非回傳請求時重新整理清單。
    pub fn on_load(&mut self) -> Result<(), ControllerError> {
        let security = &self.request.security;
        if !security.can_run_application(&self.settings.application) {
            return Err(ControllerError::ApplicationDenied {
                actor: security.actor().to_string(),
                application: self.settings.application.clone(),
            });
        }
        if !self.request.is_postback {
            self.refresh()?;
        }
        Ok(())
    }

    /// Rebuilds the list from the store, discarding what the client shows.
    pub fn refresh(&mut self) -> Result<(), ControllerError> {
        let target = self.resolve_target()?;
        let root = self.resolve_root()?;
        let entries = AliasIndex::new(&self.settings).find_aliases_for(
            &*self.store,
            &self.request.security,
            target,
            root,
        );

        self.ui.dispatch(UiCommand::ClearList);
        for entry in &entries {
            self.ui.dispatch(UiCommand::AppendAlias(entry.clone()));
        }
        self.entries = entries;
        Ok(())
    }

    /// Handles the Add button. Input problems become alerts and leave the
    /// store untouched.
    /// 處理新增按鈕；輸入錯誤以提示回報且不修改內容樹。
    pub fn add(&mut self, text: &str) -> Result<Outcome<AliasEntry>, ControllerError> {
        if text.is_empty() {
            return Ok(self.reject(AliasError::EmptyInput));
        }
        let path = match AliasPath::parse(text) {
            Ok(path) => path,
            Err(err) => return Ok(self.reject(err.into())),
        };
        if let Err(violation) = self.policy.check(&path) {
            return Ok(self.reject(violation.into()));
        }

        let target = self.resolve_target()?;
        let root = self.resolve_root()?;
        let outcome = AliasTree::new(&self.settings).create(&mut *self.store, &path, target, root)?;
        match outcome {
            Outcome::Applied(entry) => {
                self.ui.dispatch(UiCommand::AppendAlias(entry.clone()));
                self.ui.dispatch(UiCommand::ClearInput);
                self.ui.dispatch(UiCommand::SetModified(false));
                self.entries.push(entry.clone());
                Ok(Outcome::Applied(entry))
            }
            Outcome::Rejected(err) => Ok(self.reject(err)),
        }
    }

    /// Handles the Remove button. The list itself is updated once the
    /// deletion notifications arrive, see [`Self::on_node_deleted`].
    /// Aliases of the target that sit below a removed node leave the list
    /// with it.
    /// 處理移除按鈕；清單於收到刪除通知後才更新。
    pub fn remove<I>(&mut self, selected: I) -> Result<Outcome<Vec<NodeId>>, ControllerError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let target = self.resolve_target()?;

        let mut ids: Vec<NodeId> = Vec::new();
        for selected in selected {
            let selected = selected.as_ref();
            match decode_list_id(selected) {
                Ok(id) if self.store.node(id).is_some() => {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                Ok(id) => log::warn!("selected alias {id} no longer exists"),
                Err(err) => log::warn!("ignoring selection '{selected}': {err}"),
            }
        }
        if ids.is_empty() {
            return Ok(self.reject(AliasError::NoSelection));
        }

        let descriptions: Vec<String> = ids
            .iter()
            .map(|id| describe_node(&*self.store, *id))
            .collect();
        let swept = self.listed_below(&ids, target);
        self.store.delete_nodes(&ids)?;
        self.pending
            .replace(ids.iter().chain(&swept).copied().map(list_id));

        let actor = self.request.security.actor();
        for description in &descriptions {
            self.audit.log_removal(actor, description);
        }
        self.ui.dispatch(UiCommand::SetModified(false));
        Ok(Outcome::Applied(ids))
    }

    /// Store deletion hook. Emits `RemoveAlias` only for ids a Remove on this
    /// controller is waiting for; returns whether it did.
    /// 刪除事件處理；僅對等待中的項目發出移除指令。
    pub fn on_node_deleted(&mut self, event: &NodeDeleted) -> bool {
        let list_id = list_id(event.id);
        if !self.pending.take(&list_id) {
            return false;
        }
        self.entries.retain(|entry| entry.list_id != list_id);
        self.ui.dispatch(UiCommand::RemoveAlias(list_id));
        true
    }

    /// Feeds queued deletion events to [`Self::on_node_deleted`] and returns
    /// how many list removals were emitted.
    pub fn dispatch_notifications(&mut self) -> usize {
        let events = self.subscription.drain();
        events
            .iter()
            .filter(|event| self.on_node_deleted(event))
            .count()
    }

    /// Entries the client is currently showing, as far as this controller knows.
    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn pending_deletions(&self) -> &PendingDeletions {
        &self.pending
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Ends the turn: delivers outstanding notifications, forgets pending ids
    /// and releases the deletion subscription.
    /// 結束本次生命週期並釋放訂閱。
    pub fn finish(mut self) -> U {
        self.dispatch_notifications();
        self.pending.clear();
        let Self {
            ui, subscription, ..
        } = self;
        drop(subscription);
        ui
    }

    /// Nodes under `removed` that link to `target`, so their list rows go too.
    fn listed_below(&self, removed: &[NodeId], target: NodeId) -> Vec<NodeId> {
        let security = &self.request.security;
        let _unchecked = security.disable_checks();
        let index = AliasIndex::new(&self.settings);
        let mut swept = Vec::new();
        for id in removed {
            for node in self.store.descendants(*id, security) {
                if !removed.contains(&node)
                    && !swept.contains(&node)
                    && index.links_to(&*self.store, node, target)
                {
                    swept.push(node);
                }
            }
        }
        swept
    }

    fn reject<T>(&mut self, error: AliasError) -> Outcome<T> {
        log::debug!("alias request rejected: {error}");
        self.ui.dispatch(UiCommand::Alert(error.user_message().to_string()));
        Outcome::Rejected(error)
    }

    fn resolve_target(&self) -> Result<NodeId, ControllerError> {
        let node = match &self.request.target {
            TargetRef::Id(id) => self.store.node(*id),
            TargetRef::Path(path) => self.store.node_at(path),
        };
        node.map(|node| node.id)
            .ok_or_else(|| ControllerError::TargetMissing(self.request.target.to_string()))
    }

    fn resolve_root(&self) -> Result<NodeId, ControllerError> {
        self.store
            .node_at(&self.settings.alias_root)
            .map(|node| node.id)
            .ok_or_else(|| ControllerError::RootMissing(self.settings.alias_root.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_deletions_are_replaced_and_consumed_once() {
        let mut pending = PendingDeletions::default();
        pending.replace(["Ia".to_string(), "Ib".to_string()]);
        pending.replace(["Ic".to_string()]);
        assert!(!pending.contains("Ia"));
        assert!(pending.take("Ic"));
        assert!(!pending.take("Ic"));
        assert!(pending.is_empty());
    }
}
