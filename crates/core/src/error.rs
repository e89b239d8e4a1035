use aliasdesk_store::TreeError;
use thiserror::Error;

use crate::link::LinkFieldError;
use crate::path_spec::PathSpecError;
use crate::policy::PolicyViolation;

pub const MSG_EMPTY_INPUT: &str = "Enter a value in the Add Input field.";
pub const MSG_INVALID_CHARACTERS: &str = "The name contains invalid characters.";
pub const MSG_NAME_TOO_LONG: &str = "The name is too long.";
pub const MSG_DUPLICATE_ALIAS: &str = "An alias with this name already exists.";
pub const MSG_NO_SELECTION: &str = "Select an alias from the list.";

/// Request refused because of what the editor typed or selected.
/// 因編輯者輸入或選取內容而拒絕的請求；以提示訊息回報。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AliasError {
    #[error("alias text is empty")]
    EmptyInput,
    #[error("alias '{0}' contains invalid characters")]
    InvalidCharacters(String),
    #[error("alias segment '{segment}' exceeds {max} characters")]
    NameTooLong { segment: String, max: usize },
    #[error("alias '{0}' already exists")]
    DuplicateAlias(String),
    #[error("no alias selected")]
    NoSelection,
}

impl AliasError {
    /// Alert text shown to the editor.
    pub fn user_message(&self) -> &'static str {
        match self {
            AliasError::EmptyInput => MSG_EMPTY_INPUT,
            AliasError::InvalidCharacters(_) => MSG_INVALID_CHARACTERS,
            AliasError::NameTooLong { .. } => MSG_NAME_TOO_LONG,
            AliasError::DuplicateAlias(_) => MSG_DUPLICATE_ALIAS,
            AliasError::NoSelection => MSG_NO_SELECTION,
        }
    }
}

impl From<PathSpecError> for AliasError {
    fn from(error: PathSpecError) -> Self {
        match error {
            PathSpecError::EmptyInput => AliasError::EmptyInput,
            PathSpecError::EmptySegment(raw) => AliasError::InvalidCharacters(raw),
        }
    }
}

impl From<PolicyViolation> for AliasError {
    fn from(violation: PolicyViolation) -> Self {
        match violation {
            PolicyViolation::InvalidCharacters(segment) => AliasError::InvalidCharacters(segment),
            PolicyViolation::NameTooLong { segment, max } => AliasError::NameTooLong { segment, max },
        }
    }
}

/// Integrity or configuration fault that aborts the whole request.
/// 中止整個請求的完整性或設定錯誤。
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("target node '{0}' does not exist")]
    TargetMissing(String),
    #[error("alias root '{0}' does not exist")]
    RootMissing(String),
    #[error("alias template '{0}' is not registered")]
    TemplateMissing(String),
    #[error("'{actor}' may not run '{application}'")]
    ApplicationDenied { actor: String, application: String },
    #[error("invalid item name pattern: {0}")]
    InvalidNamePattern(#[from] regex::Error),
    #[error(transparent)]
    Store(#[from] TreeError),
    #[error(transparent)]
    Link(#[from] LinkFieldError),
}

/// Result of an operation that the editor's input may legitimately refuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Rejected(AliasError),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&AliasError> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Rejected(error) => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_policy_errors_map_to_alert_text() {
        assert_eq!(
            AliasError::from(PathSpecError::EmptyInput).user_message(),
            MSG_EMPTY_INPUT
        );
        assert_eq!(
            AliasError::from(PathSpecError::EmptySegment("a//b".into())).user_message(),
            MSG_INVALID_CHARACTERS
        );
        let too_long = PolicyViolation::NameTooLong {
            segment: "x".repeat(5),
            max: 4,
        };
        assert_eq!(AliasError::from(too_long).user_message(), MSG_NAME_TOO_LONG);
    }

    #[test]
    fn outcome_accessors() {
        let applied: Outcome<u8> = Outcome::Applied(1);
        assert!(applied.is_applied());
        assert_eq!(applied.applied(), Some(1));
        let rejected: Outcome<u8> = Outcome::Rejected(AliasError::NoSelection);
        assert_eq!(rejected.rejection(), Some(&AliasError::NoSelection));
    }
}
