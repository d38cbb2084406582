mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsonapi_core::{PaginationConfig, Paginator};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "jsonapi")]
#[command(about = "Flatten JSON:API documents and paginate collections")]
struct Cli {
    /// Output format: json or table
    #[arg(long, default_value = "json", global = true)]
    output: String,

    /// Page size used when page[size] is missing or invalid
    /// (defaults to $PAGINATION_LIMIT, then 30)
    #[arg(long, global = true)]
    page_size_default: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten a single-resource document into a field map
    Deserialize(commands::deserialize::DeserializeArgs),
    /// Window a JSON array and print it with pagination meta and links
    Paginate(commands::paginate::PaginateArgs),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jsonapi=info".parse().context("invalid log directive")?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "table" => OutputFormat::Table,
        _ => OutputFormat::Json,
    };

    let config = match cli.page_size_default.as_deref() {
        Some(raw) => PaginationConfig::from_raw(raw)?,
        None => PaginationConfig::from_env(),
    };
    let paginator = Paginator::new(config);

    match &cli.command {
        Commands::Deserialize(args) => commands::deserialize::run(args, &format)?,
        Commands::Paginate(args) => commands::paginate::run(args, &paginator, &format)?,
    }

    Ok(())
}
