//! Soma catalog CLI
//!
//! Query and validate the medical education content index.
//!
//! ## Usage
//!
//! ```bash
//! # Number of indexed records
//! soma-catalog count
//!
//! # Look up one record as JSON
//! soma-catalog --json get condition-gerd-peptic-ulcer
//!
//! # Free-text search
//! soma-catalog search celiac
//! soma-catalog search --all-terms "gluten villi"
//!
//! # Group by subcategory
//! soma-catalog subcategory conditions
//!
//! # Include an authored content directory
//! soma-catalog --content-dir ./content validate --strict
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use soma_content::gastroenterology;
use soma_content::{
    load_configured, Catalog, CatalogConfig, ContentIndex, ContentRecord, ContentValidator, IndexedRecord,
    SearchMode, SpecialtyEntry,
};

#[derive(Parser, Debug)]
#[command(name = "soma-catalog")]
#[command(about = "Query the Soma medical education content index")]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "SOMA_CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of authored JSON content
    #[arg(long, env = "SOMA_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// Skip the built-in collections
    #[arg(long)]
    no_builtin: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Number of indexed records
    Count,
    /// Show one record by id
    Get { id: String },
    /// Free-text search
    Search {
        query: String,
        /// Require every term to match instead of the whole phrase
        #[arg(long)]
        all_terms: bool,
    },
    /// Records in one subcategory
    Subcategory { name: String },
    /// Subcategories with record counts
    Subcategories,
    /// Records a record cross-references
    Related { id: String },
    /// Check records against the content rules
    Validate {
        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },
    /// Query the flat specialty reference cards
    Reference {
        /// Free-text query; lists every card when omitted
        query: Option<String>,
        /// Restrict to one organ subcategory (e.g. hepatic)
        #[arg(long)]
        subcategory: Option<String>,
    },
}

/// One line of plain output.
#[derive(Serialize)]
struct Summary<'a> {
    id: &'a str,
    name: &'a str,
    subcategory: &'a str,
}

impl<'a, R: IndexedRecord> From<&'a R> for Summary<'a> {
    fn from(record: &'a R) -> Self {
        Self {
            id: record.record_id(),
            name: record.display_name(),
            subcategory: record.taxonomy(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("soma_content=info".parse()?)
                .add_directive("soma_catalog=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    match args.command {
        Command::Reference { query, subcategory } => {
            run_reference(&config, query.as_deref(), subcategory.as_deref(), args.json)
        }
        command => run_catalog(&config, command, args.json),
    }
}

fn run_reference(
    config: &CatalogConfig,
    query: Option<&str>,
    subcategory: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let reference = gastroenterology::specialty_reference()?;
    let mut cards: Vec<&SpecialtyEntry> = match query {
        Some(q) => reference.search_with(q, config.search.mode),
        None => reference.iter().collect(),
    };
    if let Some(sub) = subcategory {
        cards.retain(|card| card.subcategory.as_str() == sub);
    }
    print_summaries(&cards, json)
}

fn run_catalog(config: &CatalogConfig, command: Command, json: bool) -> anyhow::Result<()> {
    let catalog: Catalog = ContentIndex::build(load_configured(config)?)?;
    info!(records = catalog.len(), "Catalog ready");

    match command {
        Command::Count => {
            if json {
                print_json(&serde_json::json!({ "count": catalog.len() }))?;
            } else {
                println!("{}", catalog.len());
            }
        }
        Command::Get { id } => {
            let Some(record) = catalog.get(&id) else {
                bail!("no record with id {id}");
            };
            if json {
                print_json(record)?;
            } else {
                print_record(record);
            }
        }
        Command::Search { query, all_terms } => {
            let mode = if all_terms { SearchMode::AllTerms } else { config.search.mode };
            print_summaries(&catalog.search_with(&query, mode), json)?;
        }
        Command::Subcategory { name } => {
            print_summaries(&catalog.by_subcategory(&name), json)?;
        }
        Command::Subcategories => {
            let counts: BTreeMap<&str, usize> = catalog.subcategory_counts();
            if json {
                print_json(&counts)?;
            } else {
                for name in catalog.subcategories() {
                    println!("{name}\t{}", counts.get(name).copied().unwrap_or_default());
                }
            }
        }
        Command::Related { id } => {
            if !catalog.contains(&id) {
                bail!("no record with id {id}");
            }
            let related: Vec<&ContentRecord> = catalog.related(&id).into_iter().map(|(_, r)| r).collect();
            print_summaries(&related, json)?;
        }
        Command::Validate { strict } => {
            let mut validation = config.validation.clone();
            validation.fail_on_warnings |= strict;
            let report = ContentValidator::new(validation)?.validate(catalog.records());

            if json {
                print_json(&report)?;
            } else {
                for issue in &report.issues {
                    println!("{issue}");
                }
                println!(
                    "{} records, {} errors, {} warnings",
                    report.records_checked,
                    report.error_count(),
                    report.warning_count()
                );
            }
            if !report.is_valid() {
                bail!("content validation failed");
            }
        }
        Command::Reference { query, subcategory } => {
            run_reference(config, query.as_deref(), subcategory.as_deref(), json)?;
        }
    }

    Ok(())
}

fn resolve_config(args: &Args) -> anyhow::Result<CatalogConfig> {
    let mut config = match &args.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CatalogConfig::default(),
    };

    // CLI overrides
    if let Some(dir) = &args.content_dir {
        config.content_dir = Some(dir.clone());
    }
    if args.no_builtin {
        config.include_builtin = false;
    }
    Ok(config)
}

fn print_summaries<R: IndexedRecord>(records: &[&R], json: bool) -> anyhow::Result<()> {
    let summaries: Vec<Summary<'_>> = records.iter().map(|r| Summary::from(*r)).collect();
    if json {
        return print_json(&summaries);
    }
    for s in &summaries {
        println!("{}\t{}\t{}", s.id, s.subcategory, s.name);
    }
    Ok(())
}

fn print_record(record: &ContentRecord) {
    println!("{} ({})", record.display_name(), record.id());
    println!("subcategory: {}", record.taxonomy());
    if let Some(content) = record.as_educational() {
        if let Some(name_es) = &content.name_es {
            println!("nameEs: {name_es}");
        }
        for (level, body) in &content.levels {
            println!("[{level} {}] {}", level.label(), body.summary);
        }
    }
    for xref in record.cross_references() {
        println!("-> {} ({:?})", xref.target_id, xref.relationship);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_flags() {
        let args = Args::try_parse_from(["soma-catalog", "--json", "search", "--all-terms", "gluten villi"]).unwrap();
        assert!(args.json);
        match args.command {
            Command::Search { query, all_terms } => {
                assert_eq!(query, "gluten villi");
                assert!(all_terms);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::try_parse_from(["soma-catalog", "--content-dir", "/srv/soma", "--no-builtin", "count"]).unwrap();
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.content_dir, Some(PathBuf::from("/srv/soma")));
        assert!(!config.include_builtin);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["soma-catalog"]).is_err());
    }

    #[test]
    fn test_builtin_collection_validates() {
        let catalog: Catalog = ContentIndex::build(gastroenterology::education_entries().unwrap()).unwrap();
        let report = ContentValidator::new(CatalogConfig::default().validation)
            .unwrap()
            .validate(catalog.records());
        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_reference_subcommand_optional_query() {
        let args = Args::try_parse_from(["soma-catalog", "reference", "--subcategory", "hepatic"]).unwrap();
        match args.command {
            Command::Reference { query, subcategory } => {
                assert!(query.is_none());
                assert_eq!(subcategory.as_deref(), Some("hepatic"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
