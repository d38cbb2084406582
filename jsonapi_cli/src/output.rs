use jsonapi_core::pagination::PaginationResult;
use jsonapi_core::types::{LinkName, Links};
use jsonapi_core::FlatMap;
use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct LinkRow {
    #[tabled(rename = "Link")]
    #[serde(rename = "Link")]
    link: String,
    #[tabled(rename = "Page")]
    #[serde(rename = "Page")]
    page: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

// -- Row builders --

fn build_field_rows(flat: &FlatMap) -> Vec<FieldRow> {
    flat.iter()
        .map(|(field, value)| FieldRow {
            field: field.clone(),
            value: format_value(value),
        })
        .collect()
}

fn build_link_rows(numbers: &PaginationResult, links: &Links) -> Vec<LinkRow> {
    let Some(pages) = numbers.page_numbers() else {
        return Vec::new();
    };
    LinkName::ALL
        .iter()
        .filter(|name| links.contains(**name))
        .map(|name| LinkRow {
            link: link_label(*name).to_string(),
            page: pages.page(*name).map(|n| n.to_string()).unwrap_or_default(),
            url: links.get(*name).unwrap_or("-").to_string(),
        })
        .collect()
}

fn link_label(name: LinkName) -> &'static str {
    match name {
        LinkName::Current => "current",
        LinkName::First => "first",
        LinkName::Prev => "prev",
        LinkName::Next => "next",
        LinkName::Last => "last",
    }
}

// -- Table output --

pub fn print_flat_map_table(flat: &FlatMap) {
    let mut table = Table::new(build_field_rows(flat));
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_links_table(numbers: &PaginationResult, links: &Links) {
    let rows = build_link_rows(numbers, links);
    if rows.is_empty() {
        eprintln!("Input is not a collection; no pagination links");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Strings print bare; everything else prints as compact JSON.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
