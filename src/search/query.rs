//! Typed Elasticsearch query documents
//!
//! Every value here serializes to the engine's wire JSON. Field names and
//! nesting follow the Elasticsearch query DSL exactly.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

/// A single query clause
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// `{"match_all": {}}`
    MatchAll(MatchAll),

    /// `{"match": {field: value}}`
    Match(BTreeMap<String, String>),

    /// `{"range": {field: {"gte": .., "lte": ..}}}`
    Range(BTreeMap<String, RangeBounds>),

    MultiMatch(MultiMatch),

    FunctionScore(Box<FunctionScore>),

    Bool(BoolQuery),
}

impl Clause {
    pub fn match_all() -> Self {
        Clause::MatchAll(MatchAll {})
    }

    /// Exact-value match on one field
    pub fn field_match(field: impl Into<String>, value: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), value.into());
        Clause::Match(fields)
    }

    pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), bounds);
        Clause::Range(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchAll {}

/// Inclusive range bounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiMatchType {
    CrossFields,
}

/// `minimum_should_match` accepts either a clause count or an expression
/// such as `"100%"`. Negative counts mean "all but n".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MinimumShouldMatch {
    Count(i32),
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiMatch {
    pub query: String,

    /// Field names, optionally boosted with `^n`
    pub fields: Vec<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MultiMatchType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<MinimumShouldMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostMode {
    Multiply,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Script {
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptScore {
    pub script: Script,
}

/// Relevance modifier applied on top of a base query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionScore {
    pub query: Clause,
    pub boost_mode: BoostMode,
    pub script_score: ScriptScore,
}

impl FunctionScore {
    pub fn scripted(query: Clause, boost_mode: BoostMode, source: impl Into<String>) -> Self {
        Self {
            query,
            boost_mode,
            script_score: ScriptScore {
                script: Script {
                    source: source.into(),
                },
            },
        }
    }
}

/// Boolean compound query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Clause>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Box<Clause>>,
}

/// One `{field: {"order": ..}}` sort directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTerm {
    pub field: String,
    pub order: Option<SortOrder>,
}

#[derive(Serialize)]
struct SortDirective {
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<SortOrder>,
}

impl Serialize for SortTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &SortDirective { order: self.order })?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlighterType {
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightField {
    pub fragment_size: u32,
    pub number_of_fragments: u32,
}

/// Highlight configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub pre_tags: Vec<String>,
    pub post_tags: Vec<String>,
    #[serde(rename = "type")]
    pub highlighter: HighlighterType,
    pub fields: BTreeMap<String, HighlightField>,
}

impl Highlight {
    /// Plain highlighter wrapping matches in `<mark>` tags
    pub fn marked<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, HighlightField)>,
        S: Into<String>,
    {
        Self {
            pre_tags: vec!["<mark>".to_string()],
            post_tags: vec!["</mark>".to_string()],
            highlighter: HighlighterType::Plain,
            fields: fields
                .into_iter()
                .map(|(name, field)| (name.into(), field))
                .collect(),
        }
    }
}

/// Body of a `_search` request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBody {
    pub query: Clause,

    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,

    pub size: usize,

    pub from: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortTerm>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub field: String,
    pub size: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub contexts: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggester {
    pub text: String,
    pub completion: Completion,
}

/// Body of a completion-suggester request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestBody {
    pub suggest: BTreeMap<String, Suggester>,
}

impl SuggestBody {
    pub fn single(name: impl Into<String>, suggester: Suggester) -> Self {
        let mut suggest = BTreeMap::new();
        suggest.insert(name.into(), suggester);
        Self { suggest }
    }
}
