use analytics::{AggregationEngine, Dataset, FilterSelection, ViewCatalog};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod display;
mod export;
mod source;

/// The main entry point for the sales dashboard.
fn main() -> Result<()> {
    // A .env file is optional; it only feeds SALESBOARD__* overrides.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let engine = build_engine(&config)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Views => {
            println!("{}", display::catalog_table(engine.list_views()));
        }
        Commands::Universe => {
            let dataset = load_dataset(cli.data.as_deref(), &config)?;
            println!("{}", display::universe_table(&dataset.universe()));
        }
        Commands::Summary(args) => {
            let dataset = load_dataset(cli.data.as_deref(), &config)?;
            handle_summary(&engine, &dataset, &config, args)?;
        }
        Commands::View(args) => {
            let dataset = load_dataset(cli.data.as_deref(), &config)?;
            handle_view(&engine, &dataset, args)?;
        }
        Commands::Export(args) => {
            let dataset = load_dataset(cli.data.as_deref(), &config)?;
            let selection = resolve_selection(&dataset, &args.filter)?;
            let subset = engine.filter(&dataset, &selection);
            let view = engine.evaluate_view(&args.view, &dataset, &subset)?;
            export::export_to_path(&view, &args.out)?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales dashboard: KPI totals and grouped revenue views over a sales export.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// CSV export of the sales query. Overrides `data.path` from the config.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the KPI tiles and every registered view.
    Summary(SummaryArgs),
    /// Show a single view.
    View(ViewArgs),
    /// List the registered views.
    Views,
    /// List the years, channels and regions available for filtering.
    Universe,
    /// Write a view to a CSV file.
    Export(ExportArgs),
}

/// The sidebar filters. Anything omitted falls back to the reset state:
/// earliest year, every channel, every region.
#[derive(Args)]
struct FilterArgs {
    /// Calendar year to show.
    #[arg(long)]
    year: Option<i32>,

    /// Sales channel to include. Repeat for several.
    #[arg(long = "channel")]
    channels: Vec<String>,

    /// Region (country) to include. Repeat for several.
    #[arg(long = "region")]
    regions: Vec<String>,
}

#[derive(Args)]
struct SummaryArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Print the snapshot as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ViewArgs {
    /// Name of the view, as listed by `views`.
    name: String,

    #[command(flatten)]
    filter: FilterArgs,

    /// Print the view as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Destination CSV file.
    #[arg(long)]
    out: PathBuf,

    /// View to export.
    #[arg(long, default_value = "ExportAggregate")]
    view: String,

    #[command(flatten)]
    filter: FilterArgs,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Builds the engine from the standard catalog plus any views declared in the
/// configuration. A bad view definition stops startup.
fn build_engine(config: &Config) -> Result<AggregationEngine> {
    let mut catalog = ViewCatalog::standard();
    for definition in &config.views {
        catalog
            .register_definition(definition)
            .with_context(|| format!("Invalid view definition '{}'", definition.name))?;
    }
    Ok(AggregationEngine::new(catalog))
}

fn load_dataset(cli_path: Option<&Path>, config: &Config) -> Result<Dataset> {
    let path = cli_path
        .or(config.data.path.as_deref())
        .context("No data file given: pass --data or set data.path in the configuration")?;
    source::load_csv(path)
}

fn resolve_selection(dataset: &Dataset, args: &FilterArgs) -> Result<FilterSelection> {
    let universe = dataset.universe();
    let Some(mut selection) = FilterSelection::defaults(&universe) else {
        bail!("The dataset has no rows; there is nothing to select");
    };

    if let Some(year) = args.year {
        if !universe.years.contains(&year) {
            tracing::warn!(year, "Selected year is not present in the dataset.");
        }
        selection = selection.with_year(year);
    }
    if !args.channels.is_empty() {
        selection = selection.with_channels(args.channels.iter().cloned());
    }
    if !args.regions.is_empty() {
        selection = selection.with_regions(args.regions.iter().cloned());
    }
    Ok(selection)
}

fn handle_summary(
    engine: &AggregationEngine,
    dataset: &Dataset,
    config: &Config,
    args: SummaryArgs,
) -> Result<()> {
    let selection = resolve_selection(dataset, &args.filter)?;
    let snapshot = engine.snapshot(dataset, &selection);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "Sales dashboard: {} ({} of {} rows match)",
        selection.year(),
        snapshot.matched_rows,
        dataset.len()
    );
    println!("{}", display::kpi_table(&snapshot.kpis, &config.display.currency_symbol));
    for view in &snapshot.views {
        println!("\n{} [{}]", view.name, view.source);
        println!("{}", display::view_table(view));
    }
    Ok(())
}

fn handle_view(engine: &AggregationEngine, dataset: &Dataset, args: ViewArgs) -> Result<()> {
    let selection = resolve_selection(dataset, &args.filter)?;
    let subset = engine.filter(dataset, &selection);
    let view = engine.evaluate_view(&args.name, dataset, &subset)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", display::view_table(&view));
    }
    Ok(())
}
