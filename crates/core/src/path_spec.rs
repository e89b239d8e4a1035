use std::fmt;

use thiserror::Error;

pub const SEPARATOR: char = '/';

/// Parsed alias path such as `news/2024/launch`.
/// 解析後的別名路徑。
///
/// Always holds at least one segment and no empty segments. Name rules
/// (pattern, length) are checked separately by [`crate::NamePolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPath {
    segments: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathSpecError {
    #[error("alias path is empty")]
    EmptyInput,
    #[error("alias path '{0}' contains an empty segment")]
    EmptySegment(String),
}

impl AliasPath {
    /// Strips one leading and one trailing separator, then splits the rest.
    /// 去除前後各一個分隔符號後切割路徑。
    pub fn parse(raw: &str) -> Result<Self, PathSpecError> {
        if raw.trim().is_empty() {
            return Err(PathSpecError::EmptyInput);
        }
        let value = raw.strip_prefix(SEPARATOR).unwrap_or(raw);
        let value = value.strip_suffix(SEPARATOR).unwrap_or(value);
        if value.is_empty() {
            return Err(PathSpecError::EmptyInput);
        }

        let segments: Vec<String> = value.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathSpecError::EmptySegment(raw.to_string()));
        }
        Ok(Self { segments })
    }

    /// The leaf segment.
    pub fn name(&self) -> &str {
        // `parse` guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Every segment before the leaf, in order. Empty for single-segment paths.
    pub fn ascenders(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        let count = self.segments.len().saturating_sub(1);
        self.segments[..count].iter().map(String::as_str)
    }

    pub fn ascenders_and_name(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.segments.iter().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for AliasPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
