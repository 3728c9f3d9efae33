//! Document store client with merge-write semantics
//!
//! Writes go through the Firestore REST API as `PATCH` requests carrying an
//! update mask of every leaf field being written, so fields not named in the
//! write (including sibling entries of nested maps) are left untouched.
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use thiserror::Error;
use ureq::Agent;
use url::Url;

use super::google_auth::{AuthError, TokenSource};

const DEFAULT_DATABASE: &str = "(default)";
const UPDATE_MASK_PARAM: &str = "updateMask.fieldPaths";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid document URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("merge request failed: {0}")]
    Request(#[from] ureq::Error),
}

pub type Document = BTreeMap<String, DocValue>;

#[derive(Clone, Debug, PartialEq)]
pub enum DocValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<DocValue>),
    Map(Document),
}

impl From<&Value> for DocValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => DocValue::Null,
            Value::Bool(b) => DocValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DocValue::Integer(i),
                None => DocValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => DocValue::String(s.clone()),
            Value::Array(items) => DocValue::Array(items.iter().map(DocValue::from).collect()),
            Value::Object(fields) => DocValue::Map(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), DocValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl DocValue {
    /// Typed value representation used on the wire
    pub fn to_wire(&self) -> Value {
        match self {
            DocValue::Null => json!({ "nullValue": null }),
            DocValue::Boolean(b) => json!({ "booleanValue": b }),
            DocValue::Integer(i) => json!({ "integerValue": i.to_string() }),
            DocValue::Double(f) => json!({ "doubleValue": f }),
            DocValue::String(s) => json!({ "stringValue": s }),
            DocValue::Timestamp(ts) => {
                json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Millis, true) })
            }
            DocValue::Array(items) => {
                json!({ "arrayValue": { "values": items.iter().map(DocValue::to_wire).collect::<Vec<_>>() } })
            }
            DocValue::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
        }
    }
}

pub fn encode_fields(doc: &Document) -> Map<String, Value> {
    doc.iter().map(|(k, v)| (k.clone(), v.to_wire())).collect()
}

/// Dotted paths to every leaf of `doc`; non-empty maps are descended into
pub fn field_paths(doc: &Document) -> Vec<String> {
    let mut paths = Vec::new();
    collect_field_paths(None, doc, &mut paths);
    paths
}

fn collect_field_paths(prefix: Option<&str>, doc: &Document, paths: &mut Vec<String>) {
    for (name, value) in doc {
        let path = match prefix {
            Some(p) => format!("{p}.{}", quote_field_name(name)),
            None => quote_field_name(name),
        };
        match value {
            DocValue::Map(inner) if !inner.is_empty() => {
                collect_field_paths(Some(path.as_str()), inner, paths)
            }
            _ => paths.push(path),
        }
    }
}

fn quote_field_name(name: &str) -> String {
    let mut chars = name.chars();
    let is_simple = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
    if is_simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Slash-separated location of a document: collection/doc[/collection/doc...]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentPath(Vec<String>);

impl DocumentPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DocumentPath(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

pub trait DocumentStore: Send + Sync {
    /// Merge `fields` into the document at `path`, creating it if needed
    fn merge(&self, path: &DocumentPath, fields: &Document) -> Result<(), StoreError>;
}

pub struct Firestore {
    base_url: String,
    tokens: TokenSource,
    agent: Agent,
}

impl Firestore {
    pub fn new(base_url: &str, tokens: TokenSource, agent: Agent) -> Self {
        Firestore {
            base_url: base_url.to_string(),
            tokens,
            agent,
        }
    }

    fn document_url(&self, path: &DocumentPath, mask: &[String]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.tokens.project_id(),
                "databases",
                DEFAULT_DATABASE,
                "documents",
            ])
            .extend(path.segments());
        {
            let mut query = url.query_pairs_mut();
            for field_path in mask {
                query.append_pair(UPDATE_MASK_PARAM, field_path);
            }
        }
        Ok(url)
    }
}

impl DocumentStore for Firestore {
    fn merge(&self, path: &DocumentPath, fields: &Document) -> Result<(), StoreError> {
        let url = self.document_url(path, &field_paths(fields))?;
        let token = self.tokens.cached()?;
        log::debug!("Merging {} field(s) into {}", fields.len(), path);

        self.agent
            .patch(url.as_str())
            .header("Authorization", &format!("Bearer {token}"))
            .send_json(json!({ "fields": encode_fields(fields) }))?;
        Ok(())
    }
}
