use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;

/// Identifier assigned by the CMS. Document databases hand out strings,
/// relational ones hand out integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// A stored document, reduced to the fields used for matching and logging.
#[derive(Debug, Default, Deserialize)]
pub struct Doc {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<DocId>,
    #[serde(default, rename = "_id", deserialize_with = "lenient")]
    pub mongo_id: Option<DocId>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alt: Option<String>,
}

impl Doc {
    pub fn doc_id(&self) -> Option<&DocId> {
        self.id.as_ref().or(self.mongo_id.as_ref())
    }

    /// The most readable name available for log lines.
    pub fn label(&self) -> String {
        self.title
            .as_deref()
            .or(self.slug.as_deref())
            .or(self.filename.as_deref())
            .or(self.alt.as_deref())
            .map(str::to_string)
            .or_else(|| self.doc_id().map(DocId::to_string))
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Paginated listing response (`GET /{collection}`).
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub docs: Vec<Doc>,
}

/// Create/update/upload response. The document may sit at the top level or
/// be wrapped in `doc` or `data`.
#[derive(Debug, Default, Deserialize)]
pub struct WriteResponse {
    #[serde(flatten)]
    pub top: Doc,
    #[serde(default, deserialize_with = "lenient")]
    pub doc: Option<Doc>,
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<Doc>,
}

impl WriteResponse {
    pub fn doc_id(&self) -> Option<&DocId> {
        self.top
            .doc_id()
            .or_else(|| self.data.as_ref().and_then(Doc::doc_id))
            .or_else(|| self.doc.as_ref().and_then(Doc::doc_id))
    }
}
