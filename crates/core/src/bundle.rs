use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Link relation pointing at the following page of a search result
pub const LINK_NEXT: &str = "next";
/// Link relation pointing at the preceding page of a search result
pub const LINK_PREVIOUS: &str = "previous";
pub const LINK_SELF: &str = "self";

/// FHIR Bundle types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Searchset,
    History,
    Collection,
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
}

/// FHIR Bundle resource (simplified for search responses)
///
/// One page of a search result. `total` is the number of matches across the
/// whole search as declared by the server, not the number of entries on this
/// page; `None` means the server did not report it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

/// Navigation link of a bundle (`self`, `next`, `previous`, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// Entry in a bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub resource: JsonValue,
}

impl BundleEntry {
    pub fn new(full_url: Option<String>, resource: JsonValue) -> Self {
        Self { full_url, resource }
    }

    /// Logical id of the contained resource, if it has one
    pub fn resource_id(&self) -> Option<&str> {
        self.resource.get("id").and_then(|v| v.as_str())
    }
}

impl Bundle {
    /// Create a searchset bundle with the declared total match count
    pub fn searchset(total: u32, entries: Vec<BundleEntry>) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: None,
            bundle_type: BundleType::Searchset,
            total: Some(total),
            link: Vec::new(),
            entry: entries,
        }
    }

    /// Append a navigation link, builder style
    pub fn with_link(mut self, relation: &str, url: impl Into<String>) -> Self {
        self.link.push(BundleLink {
            relation: relation.to_string(),
            url: url.into(),
        });
        self
    }

    /// First link with the given relation
    pub fn link(&self, relation: &str) -> Option<&BundleLink> {
        self.link.iter().find(|l| l.relation == relation)
    }

    pub fn next_link(&self) -> Option<&BundleLink> {
        self.link(LINK_NEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_search_page() {
        let page: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "id": "abc",
            "type": "searchset",
            "total": 12,
            "link": [
                {"relation": "self", "url": "http://example.org/fhir/Patient?family=reynolds"},
                {"relation": "next", "url": "http://example.org/fhir?_getpages=abc&_getpagesoffset=10"}
            ],
            "entry": [
                {"fullUrl": "http://example.org/fhir/Patient/1", "resource": {"resourceType": "Patient", "id": "1"}},
                {"resource": {"resourceType": "Patient", "id": "2"}, "search": {"mode": "match"}}
            ]
        }))
        .unwrap();

        assert_eq!(page.bundle_type, BundleType::Searchset);
        assert_eq!(page.total, Some(12));
        assert_eq!(page.entry.len(), 2);
        assert_eq!(page.entry[0].resource_id(), Some("1"));
        assert_eq!(page.entry[1].full_url, None);
        assert_eq!(
            page.next_link().map(|l| l.url.as_str()),
            Some("http://example.org/fhir?_getpages=abc&_getpagesoffset=10")
        );
    }

    #[test]
    fn test_missing_total_and_links() {
        let page: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "searchset"
        }))
        .unwrap();

        assert_eq!(page.total, None);
        assert!(page.link.is_empty());
        assert!(page.entry.is_empty());
        assert!(page.next_link().is_none());
    }

    #[test]
    fn test_link_lookup_takes_first_match() {
        let page = Bundle::searchset(0, vec![])
            .with_link(LINK_SELF, "http://a/self")
            .with_link(LINK_NEXT, "http://a/2")
            .with_link(LINK_NEXT, "http://a/3");

        assert_eq!(page.link(LINK_SELF).unwrap().url, "http://a/self");
        assert_eq!(page.next_link().unwrap().url, "http://a/2");
        assert!(page.link(LINK_PREVIOUS).is_none());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let mut page = Bundle::searchset(0, vec![]);
        page.total = None;
        let value = serde_json::to_value(page).unwrap();

        assert_eq!(value, json!({"resourceType": "Bundle", "type": "searchset"}));
    }

    #[test]
    fn test_bundle_type_kebab_case() {
        let value = serde_json::to_value(BundleType::TransactionResponse).unwrap();
        assert_eq!(value, json!("transaction-response"));
    }
}
