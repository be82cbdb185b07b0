//! hpcreport CLI - UA HPC resources report tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use hpcreport::capture::DEFAULT_CAPTURE_TIMEOUT;
use hpcreport::content::DISPLAY_ORDER;
use hpcreport::markdown::{display_title, section_heading, to_html, to_plain_text};
use hpcreport::render::{render_documentation, render_page, to_json};
use hpcreport::{
    ChartCapture, ContentSource, DirectoryCapture, DirectoryContent, EmbeddedContent, Fallback,
    JsonFormat, NoCapture, PdfBackend, ReportBuilder, ReportOptions, ReportStatus, TimedCapture,
    REPORT_FILENAME,
};

#[derive(Parser)]
#[command(name = "hpcreport")]
#[command(version)]
#[command(about = "Convert HPC resource documentation and build the timeline report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert documentation to HTML
    Html {
        /// Document name (all documents if not specified)
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Wrap the output in a standalone HTML page
        #[arg(long)]
        page: bool,

        /// Read documents from this directory before the built-in copies
        #[arg(long, value_name = "DIR")]
        content_dir: Option<PathBuf>,
    },

    /// Convert a document to plain text
    Text {
        /// Document name
        #[arg(value_name = "NAME")]
        name: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Read documents from this directory before the built-in copies
        #[arg(long, value_name = "DIR")]
        content_dir: Option<PathBuf>,
    },

    /// Generate the PDF report
    Pdf {
        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = REPORT_FILENAME)]
        output: PathBuf,

        /// Directory of captured charts (<id>.jpg)
        #[arg(long, value_name = "DIR")]
        charts: Option<PathBuf>,

        /// Read documents from this directory before the built-in copies
        #[arg(long, value_name = "DIR")]
        content_dir: Option<PathBuf>,

        /// Seconds to wait for each chart capture
        #[arg(long, value_name = "SECS", default_value_t = DEFAULT_CAPTURE_TIMEOUT.as_secs())]
        timeout: u64,

        /// Convert documents on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Print the paginated layout as JSON
    Layout {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Directory of captured charts (<id>.jpg)
        #[arg(long, value_name = "DIR")]
        charts: Option<PathBuf>,

        /// Read documents from this directory before the built-in copies
        #[arg(long, value_name = "DIR")]
        content_dir: Option<PathBuf>,
    },

    /// List the built-in documents
    List,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Html {
            name,
            output,
            page,
            content_dir,
        }) => cmd_html(
            name.as_deref(),
            output.as_deref(),
            page,
            content_dir.as_deref(),
        ),
        Some(Commands::Text {
            name,
            output,
            content_dir,
        }) => cmd_text(&name, output.as_deref(), content_dir.as_deref()),
        Some(Commands::Pdf {
            output,
            charts,
            content_dir,
            timeout,
            sequential,
        }) => cmd_pdf(
            &output,
            charts.as_deref(),
            content_dir.as_deref(),
            Duration::from_secs(timeout),
            sequential,
        ),
        Some(Commands::Layout {
            output,
            compact,
            charts,
            content_dir,
        }) => cmd_layout(
            output.as_deref(),
            compact,
            charts.as_deref(),
            content_dir.as_deref(),
        ),
        Some(Commands::List) => {
            cmd_list();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: hpcreport <COMMAND>".yellow());
            println!("       hpcreport --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn content_source(dir: Option<&Path>) -> Box<dyn ContentSource + Sync> {
    match dir {
        Some(dir) => {
            log::debug!("Reading documents from {}", dir.display());
            Box::new(Fallback::new(DirectoryContent::new(dir), EmbeddedContent))
        }
        None => Box::new(EmbeddedContent),
    }
}

fn chart_capture(dir: Option<&Path>, timeout: Duration) -> Box<dyn ChartCapture> {
    match dir {
        Some(dir) => Box::new(TimedCapture::new(DirectoryCapture::new(dir), timeout)),
        None => Box::new(NoCapture),
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn cmd_html(
    name: Option<&str>,
    output: Option<&Path>,
    page: bool,
    content_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = content_source(content_dir);
    log::debug!("Converting {} to HTML", name.unwrap_or("all documents"));

    let (title, html) = match name {
        Some(name) => (display_title(name), to_html(&source.fetch(name)?)),
        None => (
            "Supplementary Documentation".to_string(),
            render_documentation(&*source, DISPLAY_ORDER),
        ),
    };

    let html = if page { render_page(&title, &html) } else { html };
    write_output(output, &html)
}

fn cmd_text(
    name: &str,
    output: Option<&Path>,
    content_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = content_source(content_dir);
    log::debug!("Converting {} to plain text", name);
    let text = to_plain_text(&source.fetch(name)?);
    write_output(output, &text)
}

fn cmd_pdf(
    output: &Path,
    charts: Option<&Path>,
    content_dir: Option<&Path>,
    timeout: Duration,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = content_source(content_dir);
    let capture = chart_capture(charts, timeout);
    let options = ReportOptions::new().with_parallel(!sequential);
    log::debug!(
        "Generating {} (charts: {:?}, timeout: {:?}, parallel: {})",
        output.display(),
        charts,
        timeout,
        options.parallel
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let sink = |status: &ReportStatus| pb.set_message(status.to_string());
    let backend = PdfBackend::new().with_title(options.title.as_str());
    let result = ReportBuilder::new(&options, &*source, &*capture)
        .with_status(&sink)
        .write_to(&backend, output);

    match result {
        Ok(()) => {
            pb.finish_with_message(format!("{}", "PDF generated successfully".green()));
            println!("{} {}", "Saved to".green(), output.display());
            Ok(())
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}

fn cmd_layout(
    output: Option<&Path>,
    compact: bool,
    charts: Option<&Path>,
    content_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = content_source(content_dir);
    let capture = chart_capture(charts, DEFAULT_CAPTURE_TIMEOUT);
    let options = ReportOptions::default();

    let doc = ReportBuilder::new(&options, &*source, &*capture).layout()?;
    log::debug!(
        "Layout has {} pages and {} commands",
        doc.page_count(),
        doc.command_count()
    );

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_list() {
    println!("{}", "Documents".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for name in DISPLAY_ORDER {
        println!("{}: {}", name.bold(), display_title(name));
        println!("  {} {}", "└─".dimmed(), section_heading(name).dimmed());
    }
}

fn cmd_version() {
    println!("{} {}", "hpcreport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("UA HPC resources report tool");
    println!();
    println!("License: MIT");
}
