//! addpage CLI
//!
//! Opens or creates a .docx document, appends a page break and saves it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use addpage::automation::scripted::ScriptedLauncher;
use addpage::{create_new_page, BreakKind, Config, DocxLauncher, WordApplication};

/// Append a page break to the end of a Word document
#[derive(Parser)]
#[command(name = "addpage")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Create NewDocument.docx with one blank trailing page
    addpage

    # Append a page to an existing document in place
    addpage report.docx

    # Append a page and save under a new name
    addpage report.docx --save-as report-extended.docx")]
struct Cli {
    /// Document to open; a new document is created if it does not exist
    source: Option<PathBuf>,

    /// Save the result here instead of over the source
    #[arg(short = 'o', long)]
    save_as: Option<PathBuf>,

    /// Show the application window (overrides `visible = false` in the config)
    #[arg(long, conflicts_with = "hidden")]
    visible: bool,

    /// Keep the application window hidden
    #[arg(long)]
    hidden: bool,

    /// Kind of break to insert
    #[arg(long = "break", value_enum)]
    break_kind: Option<BreakKind>,

    /// Record the automation calls without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Read configuration from this file instead of the platform config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "addpage=warn",
        1 => "addpage=info",
        2 => "addpage=debug",
        _ => "addpage=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.init_config {
        match Config::init_default()? {
            Some(path) => println!("Default configuration written to {}", path.display()),
            None => println!("No configuration directory available on this system"),
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut request = config.request();
    request.source = cli.source;
    request.save_as = cli.save_as;
    if cli.visible {
        request.visible = true;
    }
    if cli.hidden {
        request.visible = false;
    }
    if let Some(kind) = cli.break_kind {
        request.break_kind = kind;
    }

    if cli.dry_run {
        let launcher = ScriptedLauncher::new();
        create_new_page(&launcher, &request);
        for call in launcher.journal().calls() {
            info!(step = %call.step(), ?call, "dry run");
        }
        return Ok(());
    }

    // The application and document stay open after this call
    if let Some(session) = create_new_page(&DocxLauncher, &request) {
        info!(
            documents = session.application.document_count(),
            existing = session.opened_existing,
            "finished"
        );
    }

    Ok(())
}
