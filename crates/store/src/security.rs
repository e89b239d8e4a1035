use std::cell::Cell;
use std::collections::BTreeSet;

use crate::tree::ContentNode;

/// Identity and capabilities of the editor issuing a request.
/// 發出請求之編輯者的身分與權限。
#[derive(Debug, Clone)]
pub struct SecurityContext {
    actor: String,
    administrator: bool,
    applications: BTreeSet<String>,
    overrides: Cell<u32>,
}

impl SecurityContext {
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            administrator: false,
            applications: BTreeSet::new(),
            overrides: Cell::new(0),
        }
    }

    pub fn administrator(actor: impl Into<String>) -> Self {
        let mut context = Self::new(actor);
        context.administrator = true;
        context
    }

    /// Grants the right to run the named application.
    /// 授予執行指定應用程式的權限。
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.applications.insert(application.into());
        self
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn is_administrator(&self) -> bool {
        self.administrator
    }

    pub fn can_run_application(&self, application: &str) -> bool {
        self.administrator || self.applications.contains(application)
    }

    /// Whether access checks are currently suspended by a [`SecurityDisabler`].
    pub fn checks_disabled(&self) -> bool {
        self.overrides.get() > 0
    }

    pub fn can_read(&self, node: &ContentNode) -> bool {
        !node.protected || self.administrator || self.checks_disabled()
    }

    /// Suspends read checks until the returned guard is dropped.
    /// 暫停讀取權限檢查，直到回傳的守衛被釋放。
    ///
    /// Guards nest; checks resume once the outermost guard is gone.
    pub fn disable_checks(&self) -> SecurityDisabler<'_> {
        self.overrides.set(self.overrides.get() + 1);
        SecurityDisabler { context: self }
    }
}

/// Scoped capability override returned by [`SecurityContext::disable_checks`].
#[must_use = "checks are restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SecurityDisabler<'a> {
    context: &'a SecurityContext,
}

impl Drop for SecurityDisabler<'_> {
    fn drop(&mut self) {
        let current = self.context.overrides.get();
        self.context.overrides.set(current.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabler_restores_checks_on_drop() {
        let context = SecurityContext::new("editor");
        assert!(!context.checks_disabled());
        {
            let _outer = context.disable_checks();
            {
                let _inner = context.disable_checks();
                assert!(context.checks_disabled());
            }
            assert!(context.checks_disabled());
        }
        assert!(!context.checks_disabled());
    }

    #[test]
    fn applications_require_grant_unless_administrator() {
        let editor = SecurityContext::new("editor").with_application("Page Urls");
        assert!(editor.can_run_application("Page Urls"));
        assert!(!editor.can_run_application("Publishing"));
        assert!(SecurityContext::administrator("admin").can_run_application("Publishing"));
    }
}
