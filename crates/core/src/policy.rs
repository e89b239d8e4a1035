use aliasdesk_settings::AliasSettings;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::path_spec::AliasPath;

/// Per-segment naming rule for alias nodes.
/// 別名節點的逐段命名規則。
#[derive(Debug, Clone)]
pub struct NamePolicy {
    pattern: Regex,
    max_length: usize,
}

/// Why a segment was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("segment '{0}' contains invalid characters")]
    InvalidCharacters(String),
    #[error("segment '{segment}' is longer than {max} characters")]
    NameTooLong { segment: String, max: usize },
}

impl NamePolicy {
    /// Compiles `pattern` with ASCII-only `\w`, `\d` and `\s`, so names like
    /// `café` are refused. Patterns that only compile in Unicode mode (a bare
    /// `.` or a negated class) keep Unicode classes.
    /// 以 ASCII 字元類別編譯命名規則；僅能於 Unicode 模式編譯者維持 Unicode。
    pub fn new(pattern: &str, max_length: usize) -> Result<Self, regex::Error> {
        let pattern = match RegexBuilder::new(pattern).unicode(false).build() {
            Ok(regex) => regex,
            Err(ascii_err) => {
                let regex = Regex::new(pattern)?;
                log::warn!("name pattern needs Unicode mode ({ascii_err}); using Unicode classes");
                regex
            }
        };
        Ok(Self {
            pattern,
            max_length,
        })
    }

    pub fn from_settings(settings: &AliasSettings) -> Result<Self, regex::Error> {
        Self::new(&settings.item_name_validation, settings.max_item_name_length)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Checks one segment: pattern first, then length.
    pub fn check_segment(&self, segment: &str) -> Result<(), PolicyViolation> {
        if !self.pattern.is_match(segment) {
            return Err(PolicyViolation::InvalidCharacters(segment.to_string()));
        }
        if segment.chars().count() > self.max_length {
            return Err(PolicyViolation::NameTooLong {
                segment: segment.to_string(),
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// Checks every segment in order and stops at the first violation.
    /// 依序檢查每個路徑段，遇到第一個違規即停止。
    pub fn check(&self, path: &AliasPath) -> Result<(), PolicyViolation> {
        path.ascenders_and_name()
            .try_for_each(|segment| self.check_segment(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aliasdesk_settings::DEFAULT_ITEM_NAME_VALIDATION;

    fn policy() -> NamePolicy {
        NamePolicy::new(DEFAULT_ITEM_NAME_VALIDATION, 100).unwrap()
    }

    #[test]
    fn default_pattern_accepts_common_names() {
        let policy = policy();
        for name in ["news", "2024", "launch-day", "Spring Sale", "$promo", "copy(2)"] {
            assert_eq!(policy.check_segment(name), Ok(()), "{name}");
        }
    }

    #[test]
    fn default_pattern_rejects_punctuation() {
        let policy = policy();
        for name in ["-lead", " lead", "a.b", "what?", "q&a"] {
            assert_eq!(
                policy.check_segment(name),
                Err(PolicyViolation::InvalidCharacters(name.to_string())),
                "{name}"
            );
        }
    }

    #[test]
    fn length_counts_characters() {
        let policy = NamePolicy::new(DEFAULT_ITEM_NAME_VALIDATION, 4).unwrap();
        assert_eq!(policy.check_segment("abcd"), Ok(()));
        assert!(matches!(
            policy.check_segment("abcde"),
            Err(PolicyViolation::NameTooLong { max: 4, .. })
        ));

        // Unicode-mode patterns still measure in characters, not bytes.
        let policy = NamePolicy::new(r"^.+$", 4).unwrap();
        assert_eq!(policy.check_segment("ÄÖÜß"), Ok(()));
        assert!(matches!(
            policy.check_segment("ÄÖÜßé"),
            Err(PolicyViolation::NameTooLong { max: 4, .. })
        ));
    }

    #[test]
    fn default_pattern_rejects_non_ascii_letters() {
        let policy = policy();
        for name in ["café", "ÄÖÜß", "新聞", "news\u{00a0}2024", "٢٠٢٤"] {
            assert_eq!(
                policy.check_segment(name),
                Err(PolicyViolation::InvalidCharacters(name.to_string())),
                "{name}"
            );
        }
        assert_eq!(policy.check_segment("cafe"), Ok(()));
    }

    #[test]
    fn check_reports_first_offending_segment() {
        let policy = NamePolicy::new(DEFAULT_ITEM_NAME_VALIDATION, 5).unwrap();
        let path = AliasPath::parse("ok/toolong/bad!").unwrap();
        assert!(matches!(
            policy.check(&path),
            Err(PolicyViolation::NameTooLong { ref segment, .. }) if segment == "toolong"
        ));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(NamePolicy::new("([", 10).is_err());
    }
}
