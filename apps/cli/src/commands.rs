//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use lattes_core::{
    BatchResult, ProgressReporter, TableRow, articles_report, parse_directory,
    researchers_report, write_report,
};
use lattes_extract::Researcher;
use lattes_keywords::{StopwordSet, TextNormalizer};
use lattes_shared::{AppConfig, ReportFormat, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Lattes: extract researchers and keywords from curriculum pages.
#[derive(Parser)]
#[command(
    name = "lattes",
    version,
    about = "Parse Lattes curriculum pages into researchers, ranked keywords, and reports.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Which keyword sequence to rank.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum KeywordSource {
    All,
    Articles,
    Projects,
}

/// Report output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum FormatArg {
    Json,
    Markdown,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Markdown => ReportFormat::Markdown,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Parse one curriculum page and print the researcher as JSON.
    Parse {
        /// Path to the HTML page.
        file: PathBuf,
    },

    /// Print the ranked keywords of one curriculum page.
    Keywords {
        /// Path to the HTML page.
        file: PathBuf,

        /// How many keywords to print (defaults to `keywords.top`).
        #[arg(short, long)]
        top: Option<usize>,

        /// Keywords from articles, projects, or both.
        #[arg(short, long, default_value = "all")]
        source: KeywordSource,
    },

    /// Batch-parse a directory and write a report.
    Report {
        /// Report subcommand.
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by every report.
#[derive(clap::Args)]
pub(crate) struct ReportArgs {
    /// Directory holding the curriculum pages.
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Output file (defaults to `<reports.output_dir>/<report>.<ext>`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output format (defaults to `reports.format`).
    #[arg(short, long)]
    pub format: Option<FormatArg>,

    /// Fail when any document could not be parsed.
    #[arg(long)]
    pub strict: bool,
}

/// Report subcommands.
#[derive(Subcommand)]
pub(crate) enum ReportKind {
    /// One row per article: researcher id and title.
    Articles {
        #[command(flatten)]
        args: ReportArgs,
    },
    /// One row per researcher with contact data and top keywords.
    Researchers {
        #[command(flatten)]
        args: ReportArgs,

        /// Keywords per researcher (defaults to `keywords.top`).
        #[arg(short, long)]
        top: Option<usize>,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "lattes=info",
        1 => "lattes=debug",
        _ => "lattes=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse { file } => cmd_parse(&file).await,
        Command::Keywords { file, top, source } => cmd_keywords(&file, top, source).await,
        Command::Report { kind } => match kind {
            ReportKind::Articles { args } => cmd_report_articles(&args).await,
            ReportKind::Researchers { args, top } => cmd_report_researchers(&args, top).await,
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Build the keyword normalizer from the configured stopword lists.
fn build_normalizer(config: &AppConfig) -> Result<Arc<TextNormalizer>> {
    let stopwords = StopwordSet::from_config(&config.keywords)?;
    info!(stopwords = stopwords.len(), "stopwords loaded");
    Ok(Arc::new(TextNormalizer::new(Arc::new(stopwords))))
}

async fn read_researcher(file: &Path, normalizer: &TextNormalizer) -> Result<Researcher> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .wrap_err_with(|| format!("cannot read {}", file.display()))?;
    let name = file.display().to_string();
    Researcher::from_html(&raw, normalizer)
        .map_err(|e| e.in_document(name))
        .wrap_err("extraction failed")
}

// ---------------------------------------------------------------------------
// Single-document commands
// ---------------------------------------------------------------------------

async fn cmd_parse(file: &Path) -> Result<()> {
    let config = load_config()?;
    let normalizer = build_normalizer(&config)?;
    let researcher = read_researcher(file, &normalizer).await?;

    println!("{}", serde_json::to_string_pretty(&researcher)?);
    Ok(())
}

async fn cmd_keywords(file: &Path, top: Option<usize>, source: KeywordSource) -> Result<()> {
    let config = load_config()?;
    let normalizer = build_normalizer(&config)?;
    let researcher = read_researcher(file, &normalizer).await?;

    let top = Some(top.unwrap_or(config.keywords.top));
    let ranking = match source {
        KeywordSource::All => researcher.top_keywords(top),
        KeywordSource::Articles => researcher.top_article_keywords(top),
        KeywordSource::Projects => researcher.top_project_keywords(top),
    };

    println!("{researcher}");
    for (i, keyword) in ranking.iter().enumerate() {
        println!("{:>4}. {keyword}", i + 1);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

async fn cmd_report_articles(args: &ReportArgs) -> Result<()> {
    let config = load_config()?;
    let batch = run_batch(&config, args).await?;
    let rows = articles_report(&batch.researchers);
    emit_report(&config, args, "articles", &rows, &batch)
}

async fn cmd_report_researchers(args: &ReportArgs, top: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let batch = run_batch(&config, args).await?;
    let rows = researchers_report(&batch.researchers, top.unwrap_or(config.keywords.top));
    emit_report(&config, args, "researchers", &rows, &batch)
}

async fn run_batch(config: &AppConfig, args: &ReportArgs) -> Result<BatchResult> {
    let normalizer = build_normalizer(config)?;
    let reporter = CliProgress::new();

    info!(dir = %args.dir.display(), "parsing directory");
    let batch = parse_directory(&args.dir, &config.batch, normalizer, &reporter).await?;

    for (name, error) in &batch.failures {
        warn!(document = %name, %error, "skipped");
    }
    if args.strict && !batch.is_clean() {
        return Err(eyre!(
            "{} of {} documents failed (first: {})",
            batch.failures.len(),
            batch.total(),
            batch.failures[0].1
        ));
    }
    Ok(batch)
}

fn emit_report<R: TableRow>(
    config: &AppConfig,
    args: &ReportArgs,
    report: &str,
    rows: &[R],
    batch: &BatchResult,
) -> Result<()> {
    let format = args.format.map(ReportFormat::from).unwrap_or(config.reports.format);
    let out = args.out.clone().unwrap_or_else(|| {
        config
            .reports
            .output_dir
            .join(format!("{report}.{}", format.extension()))
    });

    write_report(&out, rows, format)?;

    println!();
    println!("  Report written: {}", out.display());
    println!("  Rows:     {}", rows.len());
    println!("  Parsed:   {}/{}", batch.researchers.len(), batch.total());
    println!("  Failed:   {}", batch.failures.len());
    println!("  Time:     {:.1}s", batch.elapsed.as_secs_f64());
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_parsed(&self, name: &str, current: usize, total: usize, ok: bool) {
        let mark = if ok { "ok" } else { "failed" };
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {name} ({mark})"));
    }

    fn done(&self, _result: &BatchResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_report_flags() {
        let cli = Cli::try_parse_from([
            "lattes", "report", "researchers", "--dir", "cvs", "--format", "markdown", "--top", "5",
            "--strict",
        ])
        .unwrap();

        let Command::Report {
            kind: ReportKind::Researchers { args, top },
        } = cli.command
        else {
            panic!("expected researchers report");
        };
        assert_eq!(args.dir, PathBuf::from("cvs"));
        assert!(matches!(args.format, Some(FormatArg::Markdown)));
        assert_eq!(top, Some(5));
        assert!(args.strict);
    }

    #[test]
    fn keywords_source_defaults_to_all() {
        let cli = Cli::try_parse_from(["lattes", "-v", "keywords", "cv.html"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Command::Keywords {
                source: KeywordSource::All,
                top: None,
                ..
            }
        ));
    }
}
