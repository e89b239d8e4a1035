use aliasdesk_store::NodeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value of the link field written onto leaf alias nodes.
/// 寫入別名葉節點的連結欄位內容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkField {
    pub url: String,
    pub target_id: NodeId,
    pub text: Option<String>,
    pub anchor: Option<String>,
    pub query_string: Option<String>,
    pub target: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Error)]
pub enum LinkFieldError {
    #[error("failed to decode link field: {0}")]
    XmlDecode(#[from] quick_xml::DeError),
    #[error("failed to encode link field: {0}")]
    XmlEncode(String),
    #[error("link field references malformed id '{0}'")]
    InvalidId(String),
}

impl LinkField {
    /// Internal link to `target_id`, reachable at `url`.
    pub fn internal(url: impl Into<String>, target_id: NodeId) -> Self {
        Self {
            url: url.into(),
            target_id,
            text: None,
            anchor: None,
            query_string: None,
            target: None,
            title: None,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, LinkFieldError> {
        let element: LinkElement = quick_xml::de::from_str(raw)?;
        let target_id = element
            .id
            .parse()
            .map_err(|_| LinkFieldError::InvalidId(element.id.clone()))?;
        Ok(Self {
            url: element.url.unwrap_or_default(),
            target_id,
            text: element.text,
            anchor: element.anchor,
            query_string: element.query_string,
            target: element.target,
            title: element.title,
        })
    }

    /// Renders `<link linktype="internal" url=".." id=".."/>`.
    pub fn to_xml(&self) -> Result<String, LinkFieldError> {
        let element = LinkElement {
            link_type: Some("internal".to_string()),
            url: Some(self.url.clone()),
            id: self.target_id.to_string(),
            text: self.text.clone(),
            anchor: self.anchor.clone(),
            query_string: self.query_string.clone(),
            target: self.target.clone(),
            title: self.title.clone(),
        };
        quick_xml::se::to_string(&element).map_err(|err| LinkFieldError::XmlEncode(err.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "link")]
struct LinkElement {
    #[serde(rename = "@linktype", default)]
    link_type: Option<String>,
    #[serde(rename = "@url", default)]
    url: Option<String>,
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@text", default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "@anchor", default, skip_serializing_if = "Option::is_none")]
    anchor: Option<String>,
    #[serde(rename = "@querystring", default, skip_serializing_if = "Option::is_none")]
    query_string: Option<String>,
    #[serde(rename = "@target", default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(rename = "@title", default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_internal_link() {
        let link = LinkField::internal("/Home/News", NodeId::from_u64(0x1f));
        let xml = link.to_xml().unwrap();
        assert!(xml.starts_with("<link"));
        assert!(xml.contains(r#"linktype="internal""#));
        assert!(xml.contains(r#"url="/Home/News""#));
        assert!(xml.contains(r#"id="000000000000001f""#));
        assert_eq!(LinkField::parse(&xml).unwrap(), link);
    }

    #[test]
    fn parses_hand_written_link_with_extras() {
        let raw = r#"<link text="Launch" linktype="internal" anchor="top" url="/Home" id="{000000000000000a}" />"#;
        let link = LinkField::parse(raw).unwrap();
        assert_eq!(link.target_id, NodeId::from_u64(10));
        assert_eq!(link.text.as_deref(), Some("Launch"));
        assert_eq!(link.anchor.as_deref(), Some("top"));
        assert_eq!(link.url, "/Home");
    }

    #[test]
    fn escapes_markup_in_urls() {
        let link = LinkField::internal("/Q&A <draft>", NodeId::from_u64(3));
        let xml = link.to_xml().unwrap();
        assert!(!xml.contains("<draft>"));
        assert_eq!(LinkField::parse(&xml).unwrap().url, "/Q&A <draft>");
    }

    #[test]
    fn rejects_missing_or_bad_id() {
        assert!(LinkField::parse(r#"<link url="/x" />"#).is_err());
        assert!(matches!(
            LinkField::parse(r#"<link url="/x" id="not-hex" />"#),
            Err(LinkFieldError::InvalidId(_))
        ));
    }
}
