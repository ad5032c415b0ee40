// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use inbox_triage::utils::logging::{
    format_error, format_info, format_level, format_success, format_warning,
};
use inbox_triage::{
    CancellationToken, ClassificationMode, Config, CredentialStore, DateRange, FilterState, IngestReport,
    IngestionPipeline, JsonExporter, LlmClassifier, Message, OperationTimer, OverflowPolicy,
    RuleEngine, TriageCategory, TriageLevel, TriageSession, TriageSummary, Validator,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "inbox_triage")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Urgency triage for healthcare inbox messages", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest and classify a CSV export of inbox messages
    Ingest {
        file: PathBuf,

        #[arg(long, value_enum)]
        mode: Option<ClassificationMode>,

        /// Offer every N-th row to the external classifier
        #[arg(long, value_name = "N")]
        every: Option<usize>,

        #[arg(long, value_enum)]
        overflow: Option<OverflowPolicy>,

        /// Write messages, summary and manifest JSON to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,

        #[arg(long)]
        no_progress: bool,
    },

    /// List messages matching the given filters (sample data when no file is given)
    List {
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long, value_enum)]
        mode: Option<ClassificationMode>,

        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(short, long)]
        level: Option<TriageLevel>,

        #[arg(short = 'g', long)]
        category: Option<TriageCategory>,

        #[arg(short, long)]
        query: Option<String>,

        #[arg(long, default_value_t = 80)]
        width: usize,
    },

    /// Show counts by level and category
    Stats {
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long, value_enum)]
        mode: Option<ClassificationMode>,
    },

    /// Classify a single message
    Classify {
        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        message: String,

        #[arg(long)]
        rules_only: bool,
    },

    /// Manage the stored external classifier credential
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },
}

#[derive(Subcommand)]
enum CredentialAction {
    Set { key: String },
    Clear,
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    inbox_triage::utils::logging::init_logger(cli.color, cli.verbose);

    let mut config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    resolve_credential(&mut config)?;

    let interrupt = CancellationToken::new();
    let watcher = spawn_interrupt_watcher(interrupt.clone());

    let outcome = run_command(cli.command, &mut config, &interrupt).await;
    watcher.abort();
    outcome
}

async fn run_command(
    command: Commands,
    config: &mut Config,
    interrupt: &CancellationToken,
) -> Result<()> {
    match command {
        Commands::Ingest {
            file,
            mode,
            every,
            overflow,
            output,
            pretty,
            no_progress,
        } => {
            apply_overrides(config, mode, every, overflow)?;
            if no_progress {
                config.ingest.show_progress = false;
            }
            cmd_ingest(config, &file, output, pretty, interrupt).await?;
        }
        Commands::List {
            file,
            mode,
            from,
            to,
            level,
            category,
            query,
            width,
        } => {
            apply_overrides(config, mode, None, None)?;
            let filters = FilterState::new()
                .with_date_range(DateRange::inclusive_days(from, to))
                .with_level(level)
                .with_category(category)
                .with_search(query.unwrap_or_default());
            cmd_list(config, file.as_deref(), filters, width, interrupt).await?;
        }
        Commands::Stats { file, mode } => {
            apply_overrides(config, mode, None, None)?;
            cmd_stats(config, file.as_deref(), interrupt).await?;
        }
        Commands::Classify {
            subject,
            message,
            rules_only,
        } => {
            cmd_classify(config, &subject, &message, rules_only).await?;
        }
        Commands::Credential { action } => {
            cmd_credential(config, action)?;
        }
    }

    Ok(())
}

/// Listens for Ctrl-C for the whole command: the first press cancels `token`, a second
/// one exits immediately.
fn spawn_interrupt_watcher(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, cancelling; press Ctrl-C again to exit immediately");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    })
}

/// Fills the classifier key from the credential store unless the config already has one.
fn resolve_credential(config: &mut Config) -> Result<()> {
    if config.classifier.has_credential() {
        return Ok(());
    }

    let store = CredentialStore::new(&config.storage.credentials_path);
    config.classifier.api_key = store
        .get()
        .with_context(|| format!("Failed to read {}", store.path().display()))?;
    Ok(())
}

fn apply_overrides(
    config: &mut Config,
    mode: Option<ClassificationMode>,
    every: Option<usize>,
    overflow: Option<OverflowPolicy>,
) -> Result<()> {
    if let Some(mode) = mode {
        config.ingest.mode = mode;
    }
    if let Some(every) = every {
        config.ingest.external_every = every;
    }
    if let Some(overflow) = overflow {
        config.ingest.overflow = overflow;
    }
    config.validate().context("Invalid command line options")?;
    Ok(())
}

async fn read_upload(path: &Path) -> Result<String> {
    Validator::validate_csv_file(path)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read the file {}", path.display()))?;
    Validator::validate_content_not_empty(&text)?;
    Ok(text)
}

/// Runs one upload through the session so Ctrl-C cancels it cleanly.
async fn ingest_into(
    session: &mut TriageSession,
    config: &Config,
    path: &Path,
    interrupt: &CancellationToken,
) -> Result<IngestReport> {
    let text = read_upload(path).await?;
    let pipeline = IngestionPipeline::from_config(config);

    if pipeline.effective_mode() == ClassificationMode::ExternalFirst {
        println!(
            "{}",
            format_info("Using AI classification via the configured endpoint")
        );
    } else if config.ingest.mode == ClassificationMode::ExternalFirst {
        println!(
            "{}",
            format_warning(
                "Using rule-based classification; set an API key to enable AI classification"
            )
        );
    }

    let token = session.begin_upload_with(interrupt.clone());

    let report = match pipeline.run(&text, &token).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", format_error(&format!("Error parsing CSV: {}", e)));
            return Err(e).context("Ingestion failed");
        }
    };

    if !session.complete_upload(&token, report.clone()) {
        if interrupt.is_cancelled() {
            anyhow::bail!("Interrupted before the upload was installed");
        }
        anyhow::bail!("Upload was superseded before it completed");
    }

    Ok(report)
}

async fn load_session(
    config: &Config,
    file: Option<&Path>,
    interrupt: &CancellationToken,
) -> Result<TriageSession> {
    match file {
        Some(path) => {
            let mut session = TriageSession::new();
            ingest_into(&mut session, config, path, interrupt).await?;
            Ok(session)
        }
        None => Ok(TriageSession::with_mock_data()),
    }
}

async fn cmd_ingest(
    config: &Config,
    file: &Path,
    output: Option<PathBuf>,
    pretty: bool,
    interrupt: &CancellationToken,
) -> Result<()> {
    let timer = OperationTimer::new("ingest");
    let mut session = TriageSession::new();
    let report = ingest_into(&mut session, config, file, interrupt).await?;

    println!(
        "{}",
        format_success(&format!(
            "Loaded {} messages ({} rows skipped)",
            report.messages.len(),
            report.skipped
        ))
    );
    println!(
        "  external: {} | rules: {} | fallback: {} | mode: {:?}",
        report.stats.external_classified,
        report.stats.rule_classified,
        report.stats.fallback_classified,
        report.effective_mode
    );
    println!(
        "  {:.1}% of rows accepted, {:.1} rows/sec",
        report.stats.success_rate(),
        report.stats.rows_per_second()
    );

    if report.effective_mode == ClassificationMode::ExternalFirst
        && report.stats.external_classified == 0
    {
        println!(
            "{}",
            format_warning("Failed to use the external service for classification, see the log")
        );
    }

    let summary = session.summary();
    print_summary(&summary);

    if let Some(dir) = output {
        if interrupt.is_cancelled() {
            anyhow::bail!("Interrupted before export");
        }
        let export_timer = OperationTimer::new("export");
        let exporter = JsonExporter::new(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let manifest = exporter.export_batch(session.messages(), &summary, pretty)?;
        info!(
            "Exported {} messages to {}",
            manifest.total_messages,
            dir.display()
        );
        export_timer.finish();
    }

    timer.warn_if_slow(Duration::from_secs(120));
    timer.finish_with_count(report.stats.rows_processed, "rows");
    Ok(())
}

async fn cmd_list(
    config: &Config,
    file: Option<&Path>,
    filters: FilterState,
    width: usize,
    interrupt: &CancellationToken,
) -> Result<()> {
    let mut session = load_session(config, file, interrupt).await?;
    session.set_filters(filters);

    let visible = session.visible_messages();
    if session.filters().is_unfiltered() {
        println!("\nMessages ({})\n", visible.len());
    } else {
        println!(
            "\nMessages ({} of {})\n",
            visible.len(),
            session.messages().len()
        );
    }

    if visible.is_empty() {
        println!("No messages match the current filters.");
        return Ok(());
    }

    for message in visible {
        print_message(message, width);
    }

    Ok(())
}

async fn cmd_stats(
    config: &Config,
    file: Option<&Path>,
    interrupt: &CancellationToken,
) -> Result<()> {
    let session = load_session(config, file, interrupt).await?;
    print_summary(&session.summary());
    Ok(())
}

async fn cmd_classify(config: &Config, subject: &str, message: &str, rules_only: bool) -> Result<()> {
    let rules = RuleEngine::new();

    let result = if rules_only || !config.classifier.has_credential() {
        rules.classify(subject, message)
    } else {
        let classifier = LlmClassifier::new(config.classifier.clone());
        info!("Classifying with model {}", classifier.model());
        match classifier.classify_message(subject, message).await {
            Ok(result) => result,
            Err(e) => {
                warn!("LLM classification failed, falling back to rules: {}", e);
                rules.classify(subject, message)
            }
        }
    };

    println!(
        "{} {} (confidence {:.2}, via {:?})",
        format_level(result.level),
        result.category,
        result.confidence,
        result.source
    );
    Ok(())
}

fn cmd_credential(config: &Config, action: CredentialAction) -> Result<()> {
    let store = CredentialStore::new(&config.storage.credentials_path);

    match action {
        CredentialAction::Set { key } => {
            Validator::validate_api_key(&key)?;
            store.save(&key)?;
            println!("{}", format_success("API key saved"));
        }
        CredentialAction::Clear => {
            store.clear()?;
            println!("{}", format_success("API key cleared"));
        }
        CredentialAction::Status => {
            if store.has()? {
                println!("{}", format_info("An API key is stored"));
            } else {
                println!("{}", format_warning("No API key stored"));
            }
        }
    }

    Ok(())
}

fn print_message(message: &Message, width: usize) {
    println!(
        "{} {:<15} {:<16} #{} {}",
        format_level(message.triage_level),
        message.triage_category.as_str(),
        message.datetime.format("%Y-%m-%d %H:%M"),
        message.id,
        message.subject
    );
    println!("       {}", Validator::truncate_text(&message.content, width));
}

fn print_summary(summary: &TriageSummary) {
    println!("\nTotal messages: {}\n", summary.total);

    println!("By level:");
    for (level, count) in &summary.by_level {
        println!(
            "  {} {:>4} ({:.0}%)",
            format_level(*level),
            count,
            summary.share_of_level(*level)
        );
    }

    println!("\nBy category:");
    for (category, count) in &summary.by_category {
        println!("  {:<15} {:>4}", category.as_str(), count);
    }
    println!();
}
