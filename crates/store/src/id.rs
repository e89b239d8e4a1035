use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD as SHORT_ID;
use base64::Engine;
use serde::de::{Error as DeError, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Unique identifier assigned to each node in the content tree.
/// 內容樹中每個節點的唯一識別碼。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Encodes the identifier into its compact, HTML-id safe form.
    /// 將識別碼編碼為精簡且可用於 HTML id 的形式。
    pub fn to_short_id(&self) -> String {
        SHORT_ID.encode(self.0.to_be_bytes())
    }

    /// Decodes a value produced by [`NodeId::to_short_id`].
    /// 還原 [`NodeId::to_short_id`] 產生的字串。
    pub fn from_short_id(text: &str) -> Result<Self, ShortIdError> {
        let bytes = SHORT_ID
            .decode(text.as_bytes())
            .map_err(|err| ShortIdError::Malformed(text.to_string(), err.to_string()))?;
        let raw: [u8; 8] = bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| ShortIdError::Length(text.to_string(), bytes.len()))?;
        Ok(Self(u64::from_be_bytes(raw)))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ShortIdError;

    /// Parses the full (hex) form written by `Display`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim().trim_start_matches('{').trim_end_matches('}');
        u64::from_str_radix(trimmed, 16)
            .map(Self)
            .map_err(|err| ShortIdError::Malformed(text.to_string(), err.to_string()))
    }
}

/// Errors produced while decoding node identifiers.
/// 解碼節點識別碼時可能發生的錯誤。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortIdError {
    #[error("malformed node id '{0}': {1}")]
    Malformed(String, String),
    #[error("node id '{0}' decodes to {1} bytes, expected 8")]
    Length(String, usize),
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeIdVisitor;

        impl<'de> Visitor<'de> for NodeIdVisitor {
            type Value = NodeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a hexadecimal node id string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                v.parse()
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &"a hexadecimal node id"))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(NodeId(v))
            }
        }

        deserializer.deserialize_any(NodeIdVisitor)
    }
}
