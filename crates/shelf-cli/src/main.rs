//! `shelf` — command-line smoke tool for the book catalog.
//!
//! # Usage
//!
//! ```
//! shelf search "pride and prejudice" --max 5
//! shelf show zyTCAlFPjgYC
//! shelf --config ~/.config/shelf/config.toml search rust
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use shelf_catalog::{CatalogClient, CatalogConfig};
use shelf_core::{Book, catalog::CatalogSource};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "shelf", about = "Query the book catalog from the terminal")]
struct Args {
  /// Path to a TOML config file (base_url, api_key).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the catalog API.
  #[arg(long, env = "SHELF_CATALOG_URL")]
  base_url: Option<String>,

  /// API key passed as the `key` query parameter.
  #[arg(long, env = "SHELF_API_KEY")]
  api_key: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Free-text search (title, author, ISBN…).
  Search {
    query: String,
    /// Maximum number of results.
    #[arg(long, default_value_t = 10)]
    max: u32,
  },
  /// Show the full record for one volume id.
  Show { id: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  base_url: String,
  #[serde(default)]
  api_key:  String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let defaults = CatalogConfig::default();
  let config = CatalogConfig {
    base_url: args
      .base_url
      .or_else(|| (!file_cfg.base_url.is_empty()).then(|| file_cfg.base_url.clone()))
      .unwrap_or(defaults.base_url),
    api_key:  args
      .api_key
      .or_else(|| (!file_cfg.api_key.is_empty()).then(|| file_cfg.api_key.clone())),
  };

  let client = CatalogClient::new(config).context("building catalog client")?;

  match args.command {
    Command::Search { query, max } => {
      let books = client
        .search(&query, max)
        .await
        .with_context(|| format!("searching for {query:?}"))?;
      if books.is_empty() {
        println!("no results");
      }
      for book in books {
        print_summary(&book);
      }
    }
    Command::Show { id } => {
      let book = client
        .fetch_by_id(&id.as_str().into())
        .await
        .with_context(|| format!("fetching volume {id}"))?;
      print_detail(&book);
    }
  }

  Ok(())
}

fn print_summary(book: &Book) {
  let authors = if book.authors.is_empty() {
    "unknown".to_owned()
  } else {
    book.authors.join(", ")
  };
  println!("{}  {} — {}", book.id, book.title, authors);
}

fn print_detail(book: &Book) {
  print_summary(book);
  if let Some(publisher) = &book.publisher {
    println!("  publisher: {publisher}");
  }
  if let Some(date) = &book.published_date {
    println!("  published: {date}");
  }
  if let Some(pages) = book.page_count {
    println!("  pages: {pages}");
  }
  if !book.categories.is_empty() {
    println!("  categories: {}", book.categories.join(", "));
  }
  if let (Some(avg), Some(count)) = (book.average_rating, book.ratings_count) {
    println!("  rating: {avg:.1} ({count} ratings)");
  }
  if let Some(description) = &book.description {
    println!("\n{description}");
  }
}
