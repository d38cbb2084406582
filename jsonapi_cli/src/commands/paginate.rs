use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jsonapi_core::types::PaginatedDocument;
use jsonapi_core::{PaginateOptions, Paginator, QueryParams};
use serde_json::Value;

use crate::output::{print_json, print_links_table, OutputFormat};

#[derive(Args)]
pub struct PaginateArgs {
    /// JSON array to paginate; stdin when omitted
    pub file: Option<PathBuf>,

    /// Query string of the current request (e.g. 'page[number]=2&page[size]=10&sort=-created_at')
    #[arg(long, default_value = "")]
    pub query: String,

    /// Query key that comes from the route and is left out of links (repeatable)
    #[arg(long = "path-param")]
    pub path_params: Vec<String>,

    /// Known total count, overriding the length of the input
    #[arg(long)]
    pub total_count: Option<u64>,
}

pub fn run(args: &PaginateArgs, paginator: &Paginator, format: &OutputFormat) -> Result<()> {
    let input = super::read_input(args.file.as_deref())?;
    let collection: Value =
        serde_json::from_str(&input).context("input is not valid JSON")?;

    let query = QueryParams::parse(&args.query);
    let mut options = PaginateOptions::default();
    if let Some(total_count) = args.total_count {
        options = options.with_total_count(total_count);
    }

    let page = paginator.window_sequence(collection, &query, &options);
    let numbers = *page.numbers();

    if let Some(meta) = numbers.meta() {
        eprintln!(
            "Page {}/{} ({} total items)",
            page.page().number,
            meta.total_page,
            meta.total_count
        );
    }

    let data = match page.into_records() {
        Value::Array(items) => items,
        other => vec![other],
    };
    let document = PaginatedDocument::new(data, &numbers, &query, args.path_params.as_slice());

    match format {
        OutputFormat::Table => print_links_table(&numbers, &document.links),
        OutputFormat::Json => print_json(&document),
    }

    Ok(())
}
