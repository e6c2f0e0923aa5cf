//! CLI binary for travel-itinerary.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PlannerConfig`, prints the itinerary cards and optionally exports them.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use travel_itinerary::{
    export_to_file, parse_days, plan, split_cards, DispatchError, ExportMode,
    ExportProgressCallback, HttpDispatcher, ItinerarySection, PageFormat, PlanOutput,
    PlannerConfig, ProgressCallback, Session, SubmitOutcome,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress for one export: spinner while capturing, then a bar
/// over the pages of the document.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Stays hidden until an export actually starts.
    fn new() -> Arc<Self> {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        bar.set_prefix("Exporting");
        Arc::new(Self { bar })
    }
}

impl ExportProgressCallback for CliProgressCallback {
    fn on_export_start(&self, card_count: usize) {
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        self.bar.reset();
        self.bar.set_style(spinner_style);
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.set_message(format!("Capturing {card_count} cards…"));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_capture_complete(&self, width: u32, height: u32) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);
        self.bar.set_style(style);
        self.bar.println(format!(
            "  {} captured {}",
            green("✓"),
            dim(&format!("{width}x{height} px"))
        ));
    }

    fn on_page_written(&self, page_num: usize, total_pages: usize) {
        if self.bar.length() != Some(total_pages as u64) {
            self.bar.set_length(total_pages as u64);
        }
        self.bar.set_position(page_num as u64);
    }

    fn on_export_complete(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Ask and print the itinerary cards
  itinerary "Plan a 5-day trip to Mumbai with budget"

  # Ask, then export itinerary.pdf into ./out
  itinerary "3 days in Goa" --pdf --output-dir out

  # Only the structured day list, as JSON
  itinerary "Weekend in Jaipur" --days --json

  # Export an answer saved earlier, no network
  itinerary --answer-file answer.md --pdf

  # Interactive session (:clear, :new, :days, :pdf, :quit)
  itinerary --interactive

ENVIRONMENT VARIABLES:
  ITINERARY_ENDPOINT      Answering service URL (default http://localhost:8000/query)
  ITINERARY_FONT          TrueType font for the PDF text (Unicode coverage)
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory) used for export
  RUST_LOG                Overrides the log filter
"#;

/// Ask a travel-planning service for an itinerary and export it as PDF.
#[derive(Parser, Debug)]
#[command(
    name = "itinerary",
    version,
    about = "Ask a travel-planning service for an itinerary and export it as PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Free-text travel request.
    question: Option<String>,

    /// Answering service URL.
    #[arg(long, env = "ITINERARY_ENDPOINT", default_value = travel_itinerary::config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds (default: none).
    #[arg(long, env = "ITINERARY_TIMEOUT")]
    timeout: Option<u64>,

    /// Read the answer from this file instead of asking the service.
    #[arg(long, env = "ITINERARY_ANSWER_FILE", conflicts_with = "question")]
    answer_file: Option<PathBuf>,

    /// Export the itinerary as a paginated PDF.
    #[arg(long, env = "ITINERARY_PDF")]
    pdf: bool,

    /// Directory the PDF is written to.
    #[arg(long, env = "ITINERARY_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// File name of the PDF.
    #[arg(long, env = "ITINERARY_FILE_NAME", default_value = travel_itinerary::config::DEFAULT_FILE_NAME)]
    file_name: String,

    /// Capture oversampling factor (0.5–4).
    #[arg(long, env = "ITINERARY_SCALE", default_value_t = 2.0)]
    scale: f32,

    /// Page size of the PDF.
    #[arg(long, env = "ITINERARY_PAGE_FORMAT", value_enum, default_value = "a4")]
    page_format: PageFormatArg,

    /// Embed per-page slices (crop) or the full capture on every page.
    #[arg(long, env = "ITINERARY_EXPORT_MODE", value_enum, default_value = "crop")]
    export_mode: ExportModeArg,

    /// TrueType font for all text (needed for ₹, emoji, non-Latin scripts).
    #[arg(long, env = "ITINERARY_FONT")]
    font: Option<PathBuf>,

    /// TrueType font for headings (default: --font).
    #[arg(long, env = "ITINERARY_BOLD_FONT", requires = "font")]
    bold_font: Option<PathBuf>,

    /// Explicit pdfium library (file or directory).
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the structured day list instead of the cards.
    #[arg(long)]
    days: bool,

    /// Output structured JSON (PlanOutput) instead of text.
    #[arg(long, env = "ITINERARY_JSON")]
    json: bool,

    /// Read questions and commands from stdin.
    #[arg(short, long, conflicts_with_all = ["question", "answer_file"])]
    interactive: bool,

    /// Disable progress bars and spinners.
    #[arg(long, env = "ITINERARY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ITINERARY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the itinerary and errors.
    #[arg(short, long, env = "ITINERARY_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PageFormatArg {
    A4,
    Letter,
}

impl From<PageFormatArg> for PageFormat {
    fn from(v: PageFormatArg) -> Self {
        match v {
            PageFormatArg::A4 => PageFormat::A4,
            PageFormatArg::Letter => PageFormat::Letter,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ExportModeArg {
    Crop,
    RepeatFull,
}

impl From<ExportModeArg> for ExportMode {
    fn from(v: ExportModeArg) -> Self {
        match v {
            ExportModeArg::Crop => ExportMode::Crop,
            ExportModeArg::RepeatFull => ExportMode::RepeatFull,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Spinners and bars give the feedback that matters; library INFO logs
    // would only interleave with them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli, show_progress)?;

    if cli.interactive {
        return run_interactive(&cli, &config, show_progress).await;
    }

    // ── Obtain the answer ────────────────────────────────────────────────
    let output = if let Some(ref path) = cli.answer_file {
        let answer = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read answer from {:?}", path))?;
        PlanOutput {
            question: String::new(),
            days: parse_days(&answer),
            cards: split_cards(&answer),
            answer,
            error: None,
            duration_ms: 0,
        }
    } else {
        let question = cli.question.clone().unwrap_or_default();
        let spinner = show_progress.then(|| spinner("Generating…"));
        let result = plan(&question, &config).await;
        if let Some(s) = spinner {
            s.finish_and_clear();
        }
        match result {
            Ok(output) => output,
            Err(DispatchError::EmptyQuery) => {
                if !cli.quiet {
                    eprintln!("{}", dim("Nothing to ask: the question is empty."));
                }
                return Ok(());
            }
            Err(e) => return Err(e).context("Dispatch failed"),
        }
    };

    // ── Print ────────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.days {
        print_sections(&output.days).context("Failed to write to stdout")?;
    } else {
        print_sections(&output.cards).context("Failed to write to stdout")?;
    }

    // ── Export ───────────────────────────────────────────────────────────
    if cli.pdf {
        if output.is_ok() {
            export(&output.answer, &config, cli.quiet).await?;
        } else if !cli.quiet {
            eprintln!("{} No itinerary to export.", cyan("⚠"));
        }
    }

    Ok(())
}

/// Map CLI args to `PlannerConfig`.
fn build_config(cli: &Cli, show_progress: bool) -> Result<PlannerConfig> {
    let mut builder = PlannerConfig::builder()
        .endpoint(cli.endpoint.clone())
        .capture_scale(cli.scale)
        .page_format(cli.page_format.clone().into())
        .export_mode(cli.export_mode.clone().into())
        .output_dir(cli.output_dir.clone())
        .file_name(cli.file_name.clone());

    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(ref font) = cli.font {
        builder = builder.font_path(font.clone());
    }
    if let Some(ref font) = cli.bold_font {
        builder = builder.bold_font_path(font.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib.clone());
    }
    if show_progress && (cli.pdf || cli.interactive) {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

async fn export(answer: &str, config: &PlannerConfig, quiet: bool) -> Result<()> {
    let stats = export_to_file(answer, config)
        .await
        .context("Export failed")?;
    if !quiet {
        let path = stats
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        eprintln!(
            "{}  {} pages  {}ms  →  {}",
            green("✔"),
            stats.pages,
            stats.total_duration_ms,
            bold(&path),
        );
    }
    if !stats.dropped_chars.is_empty() {
        let list: String = stats.dropped_chars.iter().collect();
        eprintln!(
            "{} Left out characters the built-in font cannot draw: {}  {}",
            cyan("⚠"),
            list,
            dim("(use --font to keep them)")
        );
    }
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_sections(sections: &[ItinerarySection]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            writeln!(handle)?;
        }
        writeln!(handle, "{}", bold(section.heading.trim_end()))?;
        let body = section.body.trim_matches('\n');
        if !body.is_empty() {
            writeln!(handle, "{body}")?;
        }
    }
    handle.flush()
}

// ── Interactive mode ─────────────────────────────────────────────────────────

const INTERACTIVE_HELP: &str = "Type a travel request, or one of:
  :days   show the structured day list
  :pdf    export the current itinerary
  :clear  clear the answer, keep the request
  :new    start a new plan
  :quit   leave";

async fn run_interactive(cli: &Cli, config: &PlannerConfig, show_progress: bool) -> Result<()> {
    let dispatcher = HttpDispatcher::new(config).context("Failed to create HTTP client")?;
    let mut session = Session::new(dispatcher);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !cli.quiet {
        eprintln!("{}", dim(INTERACTIVE_HELP));
    }

    loop {
        if !cli.quiet {
            eprint!("{} ", cyan("›"));
        }
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":clear" => session.clear(),
            ":new" => session.reset(),
            ":days" => print_sections(&session.state().days)?,
            ":pdf" => {
                if session.has_answer() {
                    if let Err(e) = export(&session.state().answer, config, cli.quiet).await {
                        eprintln!("{} {:#}", red("✗"), e);
                    }
                } else {
                    eprintln!("{}", dim("Nothing to export yet."));
                }
            }
            ":help" | ":h" => eprintln!("{}", dim(INTERACTIVE_HELP)),
            _ => {
                session.set_query(line);
                let spinner = show_progress.then(|| spinner("Generating…"));
                let outcome = session.submit().await;
                if let Some(s) = spinner {
                    s.finish_and_clear();
                }
                match outcome {
                    SubmitOutcome::Skipped | SubmitOutcome::Busy => continue,
                    SubmitOutcome::Answered | SubmitOutcome::Failed(_) => {
                        print_sections(&session.cards())?;
                    }
                }
            }
        }
    }

    Ok(())
}
