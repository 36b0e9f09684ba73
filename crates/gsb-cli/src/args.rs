//! Command-line arguments

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use gsb_core::pagination::PageWindow;
use gsb_models::WorkflowAction;
use gsb_queries::{parse_sort_list, QueryFunction, QueryParams, SingleQuery};
use serde_json::Value;

/// Command-line client for a GSB server
#[derive(Parser, Debug)]
#[command(name = "gsb")]
#[command(about = "Query entities, inspect definitions and run workflows on a GSB server")]
#[command(version)]
pub struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(short, long, env = "GSB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server base URL, overrides the configuration
    #[arg(long)]
    pub base_url: Option<String>,

    /// Tenant code, overrides the configuration and the token
    #[arg(long)]
    pub tenant: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch an access token with the configured credentials
    Token,

    /// Show an entity definition
    EntityDef {
        name: String,
        /// Print the grid columns instead of the definition
        #[arg(long)]
        columns: bool,
    },

    /// Query entities
    Query {
        ent_def_name: String,
        /// Predicate such as `status=open`, `amount>=10` or `name~acme`
        #[arg(short = 'w', long = "where", value_name = "PREDICATE")]
        predicates: Vec<String>,
        /// Comma separated columns to return
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<String>,
        /// Sort list such as `name,-createDate`
        #[arg(long)]
        sort: Option<String>,
        /// Free-text filter
        #[arg(short, long)]
        filter: Option<String>,
        /// 1-indexed page
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page; defaults to the configured page size
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Load one entity
    Get { ent_def_name: String, id: String },

    /// Delete one entity
    Delete { ent_def_name: String, id: String },

    /// Call a workflow endpoint
    Workflow {
        /// run, start, function or iterate
        #[arg(value_parser = parse_action)]
        action: WorkflowAction,
        workflow_code: String,
        /// JSON input
        #[arg(short, long)]
        input: Option<String>,
        /// Instance to advance
        #[arg(long)]
        instance: Option<String>,
        /// Function to call
        #[arg(long)]
        function: Option<String>,
    },

    /// Check whether a new entity definition name is free
    CheckName { name: String },
}

fn parse_action(s: &str) -> Result<WorkflowAction, String> {
    WorkflowAction::from_str(s).ok_or_else(|| format!("unknown workflow action '{}'", s))
}

/// Operators accepted in `--where`, longest first
const OPERATORS: &[(&str, QueryFunction, bool)] = &[
    (">=", QueryFunction::GreaterOrEqual, false),
    ("<=", QueryFunction::LessOrEqual, false),
    ("!=", QueryFunction::Equals, true),
    ("=", QueryFunction::Equals, false),
    (">", QueryFunction::GreaterThan, false),
    ("<", QueryFunction::LessThan, false),
    ("~", QueryFunction::Contains, false),
];

/// Parse a `--where` predicate
pub fn parse_predicate(spec: &str) -> anyhow::Result<SingleQuery> {
    let (pos, op, function, negate) = OPERATORS
        .iter()
        .filter_map(|(op, function, negate)| spec.find(op).map(|pos| (pos, *op, *function, *negate)))
        .min_by_key(|(pos, op, _, _)| (*pos, std::cmp::Reverse(op.len())))
        .ok_or_else(|| anyhow!("predicate '{}' has no operator", spec))?;

    let prop_name = spec[..pos].trim();
    if prop_name.is_empty() {
        bail!("predicate '{}' has no property", spec);
    }

    let raw = spec[pos + op.len()..].trim();
    let mut query = SingleQuery::new(prop_name, parse_value(raw), function);
    query.negate = negate;
    Ok(query)
}

/// JSON when it parses, text otherwise
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Build the query for the `query` command
pub fn build_query(
    ent_def_name: &str,
    predicates: &[String],
    select: &[String],
    sort: Option<&str>,
    filter: Option<&str>,
    window: PageWindow,
) -> anyhow::Result<QueryParams> {
    let mut query = QueryParams::new(ent_def_name);
    for spec in predicates {
        query.where_query(parse_predicate(spec)?);
    }
    query.select(select.iter().map(|s| s.trim()).filter(|s| !s.is_empty()));
    if let Some(sort) = sort {
        for col in parse_sort_list(sort) {
            query.sort_by(col.prop_name, col.direction);
        }
    }
    if let Some(filter) = filter {
        query.filter_text(filter);
    }
    query.page(window).with_total_count(true);
    Ok(query)
}
