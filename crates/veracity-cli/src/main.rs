use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use veracity_core::providers::cohere::CohereProvider;
use veracity_core::{Analyzer, NewRecord, RecordStore, config_file};
use veracity_extract::{Document, DocumentExtractor};

mod output;

use output::ColorMode;

/// Originality Analyzer - assess documents for quoted, paraphrased, and
/// poorly referenced content
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a text, PDF, DOCX, or image file
    Analyze {
        /// Path to the document to analyze
        file_path: PathBuf,

        /// Cohere API key
        #[arg(long)]
        api_key: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output log file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a full report (.txt, .md, or .json by extension)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Minimum quote candidate length in characters
        #[arg(long)]
        min_quote_len: Option<usize>,

        /// Paraphrase window size in characters
        #[arg(long)]
        window_size: Option<usize>,

        /// Persist the analysis to the record store
        #[arg(long)]
        save: bool,

        /// Path to the record store file
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            file_path,
            api_key,
            no_color,
            output,
            report,
            min_quote_len,
            window_size,
            save,
            store,
        } => {
            analyze(
                file_path,
                api_key,
                no_color,
                output,
                report,
                min_quote_len,
                window_size,
                save,
                store,
            )
            .await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn analyze(
    file_path: PathBuf,
    api_key: Option<String>,
    no_color: bool,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
    min_quote_len: Option<usize>,
    window_size: Option<usize>,
    save: bool,
    store: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let config = config_file::load_config();

    let api_key = api_key
        .or_else(|| std::env::var("COHERE_API_KEY").ok())
        .or_else(|| {
            config
                .api_keys
                .as_ref()
                .and_then(|keys| keys.cohere_key.clone())
        });
    let Some(api_key) = api_key else {
        anyhow::bail!(
            "No Cohere API key. Pass --api-key, set COHERE_API_KEY, or add it to the config file."
        );
    };

    let mut analysis_config = config.analysis_config();
    if let Some(len) = min_quote_len {
        analysis_config.min_quote_len = len;
    }
    if let Some(size) = window_size {
        analysis_config.window_size = size;
    }

    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    let document = Document::from_path(&file_path)?;
    let text = DocumentExtractor::new().extract(&document)?;

    let provider = Arc::new(CohereProvider::new(api_key));
    let analyzer = Analyzer::new(provider.clone(), provider, analysis_config);

    // Determine color mode and output writer
    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);

    let spinner = if use_color {
        let s = indicatif::ProgressBar::new_spinner();
        s.set_message("Analyzing content...");
        s.enable_steady_tick(Duration::from_millis(120));
        Some(s)
    } else {
        None
    };

    let result = analyzer.analyze(&text).await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    output::print_analysis(&mut writer, &file_name, &result, color)?;

    if let Some(report_path) = report {
        veracity_reporting::write_report(&report_path, &file_name, &text, &result)
            .map_err(|e| anyhow::anyhow!(e))?;
        writeln!(writer, "\nReport written to {}", report_path.display())?;
    }

    if save {
        let store_path = store
            .or_else(|| {
                config
                    .store
                    .as_ref()
                    .and_then(|s| s.path.clone())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from("records.json"));
        let store = RecordStore::open(store_path)?;
        let record = NewRecord::from_analysis(&text, &result, analyzer.provider_name(), None);
        let id = store.create(record)?;
        writeln!(writer, "\nSaved analysis record {id}")?;
    }

    Ok(())
}
