//! Search and suggest over a hosted Elasticsearch cluster
//!
//! This module turns search parameters into Elasticsearch query documents,
//! sends them to the cluster and flattens the responses:
//!
//! - **Filter normalization**: `(field, value)` pairs become match clauses,
//!   `startdate`/`enddate` become one `created_at` range
//! - **Query assembly**: keyword clauses, filters, pagination, sorting and
//!   highlighting per domain (data docs, tables)
//! - **Completion suggest**: prefix lookups for tables and users
//! - **Dispatch**: backend errors are logged and degraded to empty results
//! - **Result shaping**: hits flattened into records with merged highlights
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │           SearchService                          │
//! ├─────────────────────────────────────────────────┤
//! │  - search_datadocs()   - search_tables()        │
//! │  - suggest_tables()    - suggest_users()        │
//! └─────────────────────────────────────────────────┘
//!          │ builder / filter            ▲ results
//!          ▼                             │
//! ┌─────────────────────────────────────────────────┐
//! │           SearchBackend                          │
//! ├─────────────────────────────────────────────────┤
//! │  ElasticsearchClient: POST /{index}/{type}/_search│
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use datahub_search::search::{DatadocQuery, SearchConfig, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let search = SearchService::from_config(SearchConfig::default())?;
//!
//!     let page = search
//!         .search_datadocs(1, DatadocQuery::new("revenue").with_limit(20))
//!         .await;
//!     println!("Found {} docs", page.count);
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod client;
mod config;
mod error;
mod filter;
mod query;
mod results;
mod service;

pub use builder::{
    datadoc_keyword_clause, split_table_keywords, table_keyword_clause, table_suggest_body,
    user_suggest_body, DatadocQuery, SortSpec, TableQuery,
};
pub use client::{ElasticsearchClient, SearchBackend};
pub use config::{IndexTarget, IndicesConfig, SearchConfig, SearchConfigBuilder, SearchDomain};
pub use error::{SearchError, SearchResult};
pub use filter::{normalize_filters, Filter, NormalizedFilters};
pub use query::{
    BoolQuery, BoostMode, Clause, Completion, FunctionScore, Highlight, HighlightField,
    HighlighterType, MatchAll, MinimumShouldMatch, MultiMatch, MultiMatchType, RangeBounds,
    Script, ScriptScore, SearchBody, SortOrder, SortTerm, SuggestBody, Suggester,
};
pub use results::{
    extract_hits, extract_total, table_suggestions, user_suggestions, SearchRecord,
    UserSuggestion, HIGHLIGHT_KEY,
};
pub use service::{SearchPage, SearchService, ENVIRONMENT_FILTER, METASTORE_FILTER};
