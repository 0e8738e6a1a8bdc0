use serde::{Deserialize, Serialize};

/// On-disk shape of one crawled page, written once per page in fetch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_link: String,
    pub title: String,
    pub introduction: String,
    pub content: Vec<String>,
    pub links: Vec<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: String,
    pub text: String,
}

/// Document-store shape: raw fields plus their normalized counterparts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub page_link: String,
    pub title: String,
    pub analyzed_title: String,
    pub introduction: String,
    pub analyzed_introduction: String,
    pub content: String,
    pub analyzed_content: String,
    pub links: Vec<PageLink>,
    /// Written back by an external partitioner; absent until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
