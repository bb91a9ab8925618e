use clap::{Parser, Subcommand};
use reqwest::Client;
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "datahub-search-cli")]
#[command(about = "DataHub search CLI", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search data docs in an environment
    Datadocs {
        #[arg(short = 'E', long)]
        environment_id: i64,

        #[arg(short, long)]
        keywords: Option<String>,

        /// Filter as FIELD=VALUE, repeatable
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        #[arg(long)]
        sort_key: Vec<String>,

        #[arg(long)]
        sort_order: Vec<String>,

        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(short, long)]
        offset: Option<usize>,
    },

    /// Search tables in a metastore
    Tables {
        #[arg(short, long)]
        metastore_id: i64,

        #[arg(short, long)]
        keywords: Option<String>,

        /// Filter as FIELD=VALUE, repeatable
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        #[arg(long)]
        sort_key: Vec<String>,

        #[arg(long)]
        sort_order: Vec<String>,

        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(short, long)]
        offset: Option<usize>,

        /// Only return id, schema and name
        #[arg(short, long)]
        concise: bool,
    },

    /// Complete table names by prefix
    SuggestTables {
        #[arg(short, long)]
        metastore_id: i64,

        #[arg(value_name = "PREFIX")]
        prefix: String,

        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Complete user names by prefix
    Users {
        #[arg(value_name = "NAME")]
        name: Option<String>,

        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Check server health
    Health,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))
}

/// Collect the shared search arguments into a `params` object
fn search_params(
    keywords: Option<String>,
    filters: Vec<(String, String)>,
    sort_key: Vec<String>,
    sort_order: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(keywords) = keywords {
        params.insert("keywords".into(), json!(keywords));
    }
    if !filters.is_empty() {
        params.insert("filters".into(), json!(filters));
    }
    if !sort_key.is_empty() {
        params.insert("sort_key".into(), json!(sort_key));
    }
    if !sort_order.is_empty() {
        params.insert("sort_order".into(), json!(sort_order));
    }
    if let Some(limit) = limit {
        params.insert("limit".into(), json!(limit));
    }
    if let Some(offset) = offset {
        params.insert("offset".into(), json!(offset));
    }
    params
}

async fn get_json(client: &Client, url: String, params: Option<Value>) -> anyhow::Result<Value> {
    let mut request = client.get(url);
    if let Some(params) = params {
        request = request.query(&[("params", params.to_string())]);
    }
    let response = request.send().await?;
    Ok(response.json().await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    let body = match cli.command {
        Commands::Datadocs {
            environment_id,
            keywords,
            filters,
            sort_key,
            sort_order,
            limit,
            offset,
        } => {
            let mut params = search_params(keywords, filters, sort_key, sort_order, limit, offset);
            params.insert("environment_id".into(), json!(environment_id));
            get_json(
                &client,
                format!("{}/search/datadoc/", cli.endpoint),
                Some(Value::Object(params)),
            )
            .await?
        }

        Commands::Tables {
            metastore_id,
            keywords,
            filters,
            sort_key,
            sort_order,
            limit,
            offset,
            concise,
        } => {
            let mut params = search_params(keywords, filters, sort_key, sort_order, limit, offset);
            params.insert("metastore_id".into(), json!(metastore_id));
            params.insert("concise".into(), json!(concise));
            get_json(
                &client,
                format!("{}/search/tables/", cli.endpoint),
                Some(Value::Object(params)),
            )
            .await?
        }

        Commands::SuggestTables {
            metastore_id,
            prefix,
            limit,
        } => {
            get_json(
                &client,
                format!("{}/suggest/{}/tables/", cli.endpoint, metastore_id),
                Some(json!({ "prefix": prefix, "limit": limit })),
            )
            .await?
        }

        Commands::Users { name, limit } => {
            get_json(
                &client,
                format!("{}/search/user/", cli.endpoint),
                Some(json!({ "name": name, "limit": limit })),
            )
            .await?
        }

        Commands::Health => get_json(&client, format!("{}/health", cli.endpoint), None).await?,
    };

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
