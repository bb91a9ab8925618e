//! Query document assembly for each search domain

use crate::search::filter::{normalize_filters, Filter};
use crate::search::query::{
    BoolQuery, BoostMode, Clause, Completion, FunctionScore, Highlight, HighlightField,
    MinimumShouldMatch, MultiMatch, MultiMatchType, SearchBody, SortOrder, SortTerm,
    SuggestBody, Suggester,
};
use std::collections::BTreeMap;

/// Boosted fields matched by data doc keywords
pub const DATADOC_SEARCH_FIELDS: [&str; 3] = ["title^5", "cells", "owner"];

/// Attributes returned for every data doc hit
pub const DATADOC_SOURCE_FIELDS: [&str; 4] = ["id", "title", "owner_uid", "created_at"];

/// Boosted fields matched by table keywords
pub const TABLE_SEARCH_FIELDS: [&str; 3] = ["full_name^20", "columns", "description"];

/// Attributes returned for concise table hits
pub const TABLE_CONCISE_FIELDS: [&str; 3] = ["id", "schema", "name"];

/// Relevance multiplier for tables: importance plus a bonus for golden tables
pub const TABLE_SCORE_SCRIPT: &str =
    "doc['importance_score'].value + (doc['golden'].value ? 2 : 0)";

/// Name of the single suggester in completion requests
pub const SUGGESTER_NAME: &str = "suggest";

pub const TABLE_COMPLETION_FIELD: &str = "completion_name";

pub const USER_COMPLETION_FIELD: &str = "suggest";

/// Characters the table analyzer does not split on
const TABLE_KEYWORD_SEPARATORS: [char; 3] = ['-', '_', '.'];

/// Cross-field match requiring every term. Empty keywords add no constraint.
pub fn datadoc_keyword_clause(keywords: &str) -> Option<Clause> {
    if keywords.is_empty() {
        return None;
    }

    Some(Clause::MultiMatch(MultiMatch {
        query: keywords.to_string(),
        fields: to_strings(&DATADOC_SEARCH_FIELDS),
        match_type: Some(MultiMatchType::CrossFields),
        minimum_should_match: Some(MinimumShouldMatch::Expression("100%".to_string())),
    }))
}

/// Best-effort table match scaled by importance. Empty keywords match everything.
pub fn table_keyword_clause(keywords: &str) -> Clause {
    let base = if keywords.is_empty() {
        Clause::match_all()
    } else {
        Clause::MultiMatch(MultiMatch {
            query: keywords.to_string(),
            fields: to_strings(&TABLE_SEARCH_FIELDS),
            match_type: None,
            minimum_should_match: Some(MinimumShouldMatch::Count(-1)),
        })
    };

    Clause::FunctionScore(Box::new(FunctionScore::scripted(
        base,
        BoostMode::Multiply,
        TABLE_SCORE_SCRIPT,
    )))
}

/// Replace `-`, `_` and `.` with spaces so each part is matched on its own.
pub fn split_table_keywords(keywords: &str) -> String {
    keywords.replace(TABLE_KEYWORD_SEPARATORS, " ")
}

/// Sort directives in caller order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    terms: Vec<SortTerm>,
}

impl SortSpec {
    pub fn single(key: impl Into<String>, order: Option<SortOrder>) -> Self {
        Self {
            terms: vec![SortTerm {
                field: key.into(),
                order,
            }],
        }
    }

    /// Pair keys with orders position by position.
    ///
    /// Extra keys or orders are dropped. Without any orders every key sorts
    /// in the engine's default direction.
    pub fn zipped(keys: Vec<String>, orders: Option<Vec<SortOrder>>) -> Self {
        let terms = match orders {
            Some(orders) => keys
                .into_iter()
                .zip(orders)
                .map(|(field, order)| SortTerm {
                    field,
                    order: Some(order),
                })
                .collect(),
            None => keys
                .into_iter()
                .map(|field| SortTerm { field, order: None })
                .collect(),
        };
        Self { terms }
    }

    pub fn terms(&self) -> &[SortTerm] {
        &self.terms
    }
}

/// Combine keyword, range and match clauses into one bool query.
///
/// `must` holds the keyword clause followed by the range clause; the match
/// clauses go under `filter`.
fn assemble_bool(keyword: Option<Clause>, filters: &[Filter]) -> Clause {
    let normalized = normalize_filters(filters);
    let mut query = BoolQuery::default();

    if let Some(keyword) = keyword {
        query.must.push(keyword);
    }
    if let Some(range) = normalized.range_clause() {
        query.must.push(range);
    }
    if !normalized.terms.is_empty() {
        query.filter = Some(Box::new(Clause::Bool(BoolQuery {
            must: normalized.terms,
            filter: None,
        })));
    }

    Clause::Bool(query)
}

fn datadoc_highlight() -> Highlight {
    Highlight::marked([(
        "cells",
        HighlightField {
            fragment_size: 60,
            number_of_fragments: 3,
        },
    )])
}

fn table_highlight() -> Highlight {
    Highlight::marked([
        (
            "columns",
            HighlightField {
                fragment_size: 20,
                number_of_fragments: 5,
            },
        ),
        (
            "description",
            HighlightField {
                fragment_size: 60,
                number_of_fragments: 3,
            },
        ),
    ])
}

fn to_strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Data doc search request
#[derive(Debug, Clone, PartialEq)]
pub struct DatadocQuery {
    pub keywords: String,
    pub filters: Vec<Filter>,
    pub sort: Option<SortSpec>,
    pub limit: usize,
    pub offset: usize,
}

impl DatadocQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            filters: Vec::new(),
            sort: None,
            limit: 1000,
            offset: 0,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn build(&self) -> SearchBody {
        SearchBody {
            query: assemble_bool(datadoc_keyword_clause(&self.keywords), &self.filters),
            source: Some(to_strings(&DATADOC_SOURCE_FIELDS)),
            size: self.limit,
            from: self.offset,
            sort: self.sort.as_ref().map(|s| s.terms().to_vec()),
            highlight: Some(datadoc_highlight()),
        }
    }
}

/// Table search request
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub keywords: String,
    pub filters: Vec<Filter>,
    pub sort: Option<SortSpec>,
    pub limit: usize,
    pub offset: usize,
    /// Return only id, schema and name
    pub concise: bool,
}

impl TableQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            filters: Vec::new(),
            sort: None,
            limit: 1000,
            offset: 0,
            concise: false,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_concise(mut self, concise: bool) -> Self {
        self.concise = concise;
        self
    }

    /// Keywords are used as given; see [`split_table_keywords`].
    pub fn build(&self) -> SearchBody {
        SearchBody {
            query: assemble_bool(Some(table_keyword_clause(&self.keywords)), &self.filters),
            source: self.concise.then(|| to_strings(&TABLE_CONCISE_FIELDS)),
            size: self.limit,
            from: self.offset,
            sort: self.sort.as_ref().map(|s| s.terms().to_vec()),
            highlight: Some(table_highlight()),
        }
    }
}

/// Prefix completion over table names within one metastore
pub fn table_suggest_body(prefix: &str, metastore_id: i64, limit: usize) -> SuggestBody {
    let mut contexts = BTreeMap::new();
    contexts.insert("metastore_id".to_string(), serde_json::Value::from(metastore_id));

    SuggestBody::single(
        SUGGESTER_NAME,
        Suggester {
            text: prefix.to_string(),
            completion: Completion {
                field: TABLE_COMPLETION_FIELD.to_string(),
                size: limit,
                contexts,
            },
        },
    )
}

/// Prefix completion over user names. The name is lowercased.
pub fn user_suggest_body(name: Option<&str>, limit: usize) -> SuggestBody {
    SuggestBody::single(
        SUGGESTER_NAME,
        Suggester {
            text: name.unwrap_or_default().to_lowercase(),
            completion: Completion {
                field: USER_COMPLETION_FIELD.to_string(),
                size: limit,
                contexts: BTreeMap::new(),
            },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_datadoc_query_full_document() {
        let body = DatadocQuery::new("revenue")
            .with_filter(Filter::new("environment_id", "1"))
            .with_sort(SortSpec::single("created_at", Some(SortOrder::Desc)))
            .with_limit(20)
            .with_offset(40)
            .build();

        assert_eq!(
            to_json(&body),
            json!({
                "query": {
                    "bool": {
                        "must": [{
                            "multi_match": {
                                "query": "revenue",
                                "fields": ["title^5", "cells", "owner"],
                                "type": "cross_fields",
                                "minimum_should_match": "100%"
                            }
                        }],
                        "filter": {"bool": {"must": [{"match": {"environment_id": "1"}}]}}
                    }
                },
                "_source": ["id", "title", "owner_uid", "created_at"],
                "size": 20,
                "from": 40,
                "sort": [{"created_at": {"order": "desc"}}],
                "highlight": {
                    "pre_tags": ["<mark>"],
                    "post_tags": ["</mark>"],
                    "type": "plain",
                    "fields": {"cells": {"fragment_size": 60, "number_of_fragments": 3}}
                }
            })
        );
    }

    #[test]
    fn test_datadoc_empty_keywords_add_no_must() {
        assert!(datadoc_keyword_clause("").is_none());

        let body = DatadocQuery::new("")
            .with_filter(Filter::new("environment_id", "1"))
            .build();
        let query = to_json(&body)["query"]["bool"].clone();
        assert!(query.get("must").is_none());
        assert!(query.get("filter").is_some());
    }

    #[test]
    fn test_range_kept_without_keywords() {
        let body = DatadocQuery::new("")
            .with_filter(Filter::new("startdate", "100"))
            .with_filter(Filter::new("enddate", "200"))
            .build();

        assert_eq!(
            to_json(&body)["query"]["bool"]["must"],
            json!([{"range": {"created_at": {"gte": "100", "lte": "200"}}}])
        );
    }

    #[test]
    fn test_range_follows_keyword_clause() {
        let body = DatadocQuery::new("x")
            .with_filter(Filter::new("enddate", "200"))
            .build();
        let must = to_json(&body)["query"]["bool"]["must"].clone();
        assert_eq!(must.as_array().unwrap().len(), 2);
        assert!(must[0].get("multi_match").is_some());
        assert_eq!(must[1], json!({"range": {"created_at": {"lte": "200"}}}));
    }

    #[test]
    fn test_table_empty_keywords_match_all() {
        let body = TableQuery::new("").build();
        assert_eq!(
            to_json(&body)["query"]["bool"]["must"][0],
            json!({
                "function_score": {
                    "query": {"match_all": {}},
                    "boost_mode": "multiply",
                    "script_score": {"script": {"source": TABLE_SCORE_SCRIPT}}
                }
            })
        );
    }

    #[test]
    fn test_table_keywords_multi_match() {
        let body = TableQuery::new("foo bar").build();
        assert_eq!(
            to_json(&body)["query"]["bool"]["must"][0]["function_score"]["query"],
            json!({
                "multi_match": {
                    "query": "foo bar",
                    "fields": ["full_name^20", "columns", "description"],
                    "minimum_should_match": -1
                }
            })
        );
    }

    #[test]
    fn test_table_concise_projection_and_highlight() {
        let full = to_json(&TableQuery::new("x").build());
        assert!(full.get("_source").is_none());

        let concise = to_json(&TableQuery::new("x").with_concise(true).build());
        assert_eq!(concise["_source"], json!(["id", "schema", "name"]));
        assert_eq!(
            concise["highlight"]["fields"],
            json!({
                "columns": {"fragment_size": 20, "number_of_fragments": 5},
                "description": {"fragment_size": 60, "number_of_fragments": 3}
            })
        );
    }

    #[test]
    fn test_split_table_keywords() {
        assert_eq!(split_table_keywords("foo-bar_baz.qux"), "foo bar baz qux");
        assert_eq!(split_table_keywords("plain"), "plain");
    }

    #[test]
    fn test_zipped_sort_truncates_to_shorter() {
        let spec = SortSpec::zipped(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            Some(vec![SortOrder::Asc, SortOrder::Desc]),
        );
        assert_eq!(
            to_json(&spec.terms()),
            json!([{"a": {"order": "asc"}}, {"b": {"order": "desc"}}])
        );
    }

    #[test]
    fn test_zipped_sort_without_orders() {
        let spec = SortSpec::zipped(vec!["a".to_string()], None);
        assert_eq!(to_json(&spec.terms()), json!([{"a": {}}]));
    }

    #[test]
    fn test_table_suggest_body() {
        assert_eq!(
            to_json(&table_suggest_body("sales_", 3, 10)),
            json!({
                "suggest": {
                    "suggest": {
                        "text": "sales_",
                        "completion": {
                            "field": "completion_name",
                            "size": 10,
                            "contexts": {"metastore_id": 3}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_user_suggest_body_lowercases_name() {
        let body = to_json(&user_suggest_body(Some("JoHn"), 10));
        assert_eq!(body["suggest"]["suggest"]["text"], "john");
        assert_eq!(body["suggest"]["suggest"]["completion"]["field"], "suggest");

        let empty = to_json(&user_suggest_body(None, 10));
        assert_eq!(empty["suggest"]["suggest"]["text"], "");
    }
}
