//! medsearch CLI — medicine search and price comparison from the terminal.
//!
//! Calls `medsearch-core` directly; one network request per `search`
//! invocation, everything else works on local catalog files.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use medsearch_core::catalog::{Catalog, Selector};
use medsearch_core::client::SearchClient;
use medsearch_core::load_medsearch_config;
use medsearch_core::pricing::{best_price, lowest_price};
use medsearch_core::types::SaltSuggestion;

/// Fallback copy shown when a variant has no resolvable price.
const NO_STORES: &str = "No stores selling this product near you";

/// medsearch CLI — find the cheapest pharmacy offer for a medicine.
#[derive(Parser)]
#[command(name = "meds", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search medicines by name and show the lowest price per result
    Search {
        /// Medicine name to search for
        query: String,

        /// Override the search endpoint base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Pick a form instead of the backend's most-common one
        #[arg(long)]
        form: Option<String>,

        /// Pick a strength instead of the most-common one
        #[arg(long)]
        strength: Option<String>,

        /// Pick a packing instead of the most-common one
        #[arg(long)]
        packing: Option<String>,

        /// Also report the cheapest variant across all forms, strengths, and packings
        #[arg(long)]
        best: bool,
    },
    /// Resolve the lowest price for one variant in a catalog file
    Price {
        /// Path to a salt_forms_json catalog file
        file: PathBuf,

        /// Form to resolve (e.g. "Tablet")
        #[arg(long)]
        form: String,

        /// Strength to resolve (e.g. "500mg")
        #[arg(long)]
        strength: String,

        /// Packing to resolve (e.g. "10 strips")
        #[arg(long)]
        packing: String,
    },
    /// List the variants in a catalog file with their lowest prices
    Variants {
        /// Path to a salt_forms_json catalog file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medsearch_core=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { query, base_url, form, strength, packing, best } => {
            let mut config = load_medsearch_config(
                &std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            );
            if let Some(url) = base_url {
                config.base_url = url;
            }

            let client = SearchClient::new(config).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(1);
            });
            let results = client.search(&query).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(1);
            });

            if results.is_empty() {
                eprintln!("No results found");
                std::process::exit(1);
            }

            if cli.json {
                let items: Vec<serde_json::Value> = results
                    .iter()
                    .map(|s| {
                        let selector = pick_selector(s, &form, &strength, &packing);
                        let price = selector.as_ref().and_then(|sel| s.lowest_price_for(sel));
                        let cheapest = if best {
                            s.salt_forms_json.as_ref().and_then(best_price)
                        } else {
                            None
                        };
                        serde_json::json!({
                            "id": s.id.clone(),
                            "salt": s.display_name(),
                            "available_forms": s.available_forms.clone(),
                            "selector": selector,
                            "lowest_price": price,
                            "cheapest": cheapest.map(|(sel, p)| serde_json::json!({
                                "selector": sel,
                                "price": p,
                            })),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items).unwrap());
            } else {
                for s in &results {
                    print_suggestion(s, &form, &strength, &packing, best);
                }
                eprintln!("\n{} results", results.len());
            }
        }
        Commands::Price { file, form, strength, packing } => {
            let catalog = load_catalog(&file);
            let selector = Selector::new(&form, &strength, &packing);
            let price = lowest_price(&catalog, &selector);

            if cli.json {
                let output = serde_json::json!({
                    "selector": selector,
                    "lowest_price": price,
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                match price {
                    Some(p) => println!("{}  {}", selector, format_price(p)),
                    None => {
                        eprintln!("{selector}  {NO_STORES}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Commands::Variants { file } => {
            let catalog = load_catalog(&file);
            let selectors = catalog.selectors();

            if cli.json {
                let items: Vec<serde_json::Value> = selectors
                    .iter()
                    .map(|sel| {
                        serde_json::json!({
                            "selector": sel,
                            "lowest_price": lowest_price(&catalog, sel),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items).unwrap());
            } else {
                if selectors.is_empty() {
                    eprintln!("No variants in catalog");
                    std::process::exit(1);
                }
                for sel in &selectors {
                    let price = lowest_price(&catalog, sel)
                        .map(format_price)
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<50} {:>10}", sel.to_string(), price);
                }
                eprintln!("\n{} variants", selectors.len());
            }
        }
    }
}

/// Selector for a suggestion: explicit flags win over the backend's
/// most-common variant, per component. `None` when neither source covers all
/// three components.
fn pick_selector(
    s: &SaltSuggestion,
    form: &Option<String>,
    strength: &Option<String>,
    packing: &Option<String>,
) -> Option<Selector> {
    let mc = s.most_common_selector();
    let form = form.clone().or_else(|| mc.as_ref().map(|m| m.form.clone()))?;
    let strength = strength.clone().or_else(|| mc.as_ref().map(|m| m.strength.clone()))?;
    let packing = packing.clone().or_else(|| mc.as_ref().map(|m| m.packing.clone()))?;
    Some(Selector { form, strength, packing })
}

fn print_suggestion(
    s: &SaltSuggestion,
    form: &Option<String>,
    strength: &Option<String>,
    packing: &Option<String>,
    best: bool,
) {
    println!("{}", s.display_name());
    if !s.available_forms.is_empty() {
        println!("  Forms:    {}", s.available_forms.join(", "));
    }
    match pick_selector(s, form, strength, packing) {
        Some(selector) => {
            println!("  Variant:  {selector}");
            match s.lowest_price_for(&selector) {
                Some(price) => println!("  Lowest:   {}", format_price(price)),
                None => println!("  Lowest:   {NO_STORES}"),
            }
        }
        None => println!("  Lowest:   {NO_STORES}"),
    }
    if best {
        if let Some((selector, price)) = s.salt_forms_json.as_ref().and_then(best_price) {
            println!("  Cheapest: {selector} at {}", format_price(price));
        }
    }
    println!();
}

/// Whole numbers print without decimals, everything else with two.
fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

fn load_catalog(path: &Path) -> Catalog {
    let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Could not read {}: {e}", path.display());
        std::process::exit(1);
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Invalid catalog in {}: {e}", path.display());
        std::process::exit(1);
    })
}
