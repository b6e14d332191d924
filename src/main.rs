use clap::Parser;
use colored::Colorize;
use depadvisor::cache::FactCache;
use depadvisor::config::Config;
use depadvisor::input::InputLoader;
use depadvisor::report::{ReasonReporter, ReportFormat, Reporter};
use depadvisor::ProjectAnalyzer;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// depadvisor - Dependency declaration advice for JVM and Android modules
#[derive(Parser, Debug)]
#[command(name = "depadvisor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the analysis input directory
    #[arg(default_value = ".")]
    input: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write each variant's dependency graph as Graphviz DOT into this directory
    #[arg(long, value_name = "DIR")]
    graph_dot: Option<PathBuf>,

    /// Only analyze these variants (can be specified multiple times)
    #[arg(long = "variant", value_name = "NAME")]
    variants: Vec<String>,

    /// Explain the classification of one dependency instead of printing advice
    #[arg(long, value_name = "IDENTIFIER")]
    reason: Option<String>,

    /// Advise moving declarations that are only needed at runtime to runtimeOnly
    #[arg(long)]
    strict_runtime_only: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = load_config(&cli)?;
    let format = match cli.format {
        Some(format) => format.into(),
        None => ReportFormat::from_name(&config.report.format).unwrap_or_else(|| {
            warn!("Unknown report format '{}', using terminal", config.report.format);
            ReportFormat::Terminal
        }),
    };

    let start = Instant::now();

    let cache = FactCache::new();
    let input = InputLoader::new(&cli.input, &cache)
        .load()
        .wrap_err_with(|| format!("Failed to load input from {}", cli.input.display()))?;

    if let Some(dir) = &cli.graph_dot {
        write_graphs(dir, &input)?;
    }

    let outcome = ProjectAnalyzer::from_config(&config).analyze(&input)?;

    if let Some(identifier) = &cli.reason {
        return ReasonReporter::new(&input, &outcome).report(identifier);
    }

    let reporter = Reporter::new(format, cli.output.clone());
    reporter.report(&outcome.advice)?;

    if !cli.quiet && matches!(format, ReportFormat::Terminal) {
        println!(
            "{}",
            format!(
                "Analyzed {} variants in {:.2}s",
                outcome.reports.len(),
                start.elapsed().as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.input)?
    };

    // Override with CLI arguments
    if !cli.variants.is_empty() {
        config.variants = cli.variants.clone();
    }
    if cli.strict_runtime_only {
        config.advice.strict_runtime_only = true;
    }

    Ok(config)
}

fn write_graphs(dir: &Path, input: &depadvisor::AnalysisInput) -> Result<()> {
    std::fs::create_dir_all(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

    for variant in &input.variants {
        let path = dir.join(format!("{}.gv", variant.graph.name()));
        std::fs::write(&path, variant.graph.to_dot())
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}
