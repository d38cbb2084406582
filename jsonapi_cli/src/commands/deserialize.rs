use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use jsonapi_core::{deserialize, DeserializeOptions, Document, RawParameters};

use crate::output::{print_flat_map_table, print_json, OutputFormat};

#[derive(Args)]
pub struct DeserializeArgs {
    /// JSON document to read; stdin when omitted
    pub file: Option<PathBuf>,

    /// Treat the input as form-encoded parameters (data[id]=1&data[attributes][name]=x)
    #[arg(long)]
    pub form: bool,

    /// Keep only these attributes and relationships (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Drop these attributes and relationships (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub except: Vec<String>,

    /// To-one relationships that also get a <name>_type field (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub polymorphic: Vec<String>,
}

impl DeserializeArgs {
    fn options(&self) -> DeserializeOptions {
        let mut options = DeserializeOptions::default().with_polymorphic(&self.polymorphic);
        if !self.only.is_empty() {
            options = options.with_only(&self.only);
        }
        if !self.except.is_empty() {
            options = options.with_except(&self.except);
        }
        options
    }
}

pub fn run(args: &DeserializeArgs, format: &OutputFormat) -> Result<()> {
    let input = super::read_input(args.file.as_deref())?;

    let document = if args.form {
        Document::from(RawParameters::parse(input.trim()))
    } else {
        Document::from_json_str(&input)?
    };

    let flat = deserialize(&document, &args.options());
    tracing::debug!("Flattened document into {} fields", flat.len());

    match format {
        OutputFormat::Table => print_flat_map_table(&flat),
        OutputFormat::Json => print_json(&flat),
    }

    Ok(())
}
