//! pdfmark CLI - convert a directory of PDFs into Markdown

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfmark::{ConvertEvent, CorpusConverter, LopdfSource, Pdfmark, PdfSource};

#[derive(Parser)]
#[command(name = "pdfmark")]
#[command(version)]
#[command(about = "Convert a directory of PDFs into page-annotated Markdown", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    convert: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Directory to scan for PDF files
    #[arg(value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Output directory (default: <DIR>/markdown_output)
    #[arg(short, long, value_name = "DIR", env = "PDFMARK_OUTPUT")]
    output: Option<PathBuf>,

    /// File name of the combined Markdown file
    #[arg(
        long,
        value_name = "NAME",
        env = "PDFMARK_COMBINED",
        default_value = pdfmark::DEFAULT_COMBINED_FILE
    )]
    combined_name: String,

    /// Also write a JSON file per document
    #[arg(long)]
    json: bool,

    /// Skip table detection
    #[arg(long)]
    no_tables: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every PDF in a directory (default command)
    Convert(ConvertArgs),

    /// Convert a single PDF to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip table detection
        #[arg(long)]
        no_tables: bool,
    },

    /// Show page count and outline of a PDF
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert(args)) => cmd_convert(&args),
        Some(Commands::Markdown {
            input,
            output,
            no_tables,
        }) => cmd_markdown(&input, output.as_deref(), no_tables),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_convert(&cli.convert),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn builder(args: &ConvertArgs) -> Pdfmark {
    let mut builder = Pdfmark::new().with_combined_name(args.combined_name.clone());
    if let Some(ref output) = args.output {
        builder = builder.with_output_dir(output.clone());
    }
    if args.json {
        builder = builder.with_json();
    }
    if args.no_tables {
        builder = builder.text_only();
    }
    builder
}

fn cmd_convert(args: &ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = builder(args).options_for(&args.dir);
    let converter = CorpusConverter::new(options);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let result = converter.convert_with(|event| match event {
        ConvertEvent::Scanned { count } => pb.set_length(count as u64),
        ConvertEvent::Processing { name, .. } => {
            pb.println(format!("Processing: {}", name));
            pb.set_message(name.to_string());
        }
        ConvertEvent::Converted { .. } => pb.inc(1),
        ConvertEvent::Failed { name, error } => {
            pb.println(format!(
                "{} {}: {}",
                "Error processing".red(),
                name,
                error
            ));
            pb.inc(1);
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(pdfmark::Error::NoInput(dir)) => {
            pb.finish_and_clear();
            println!("{} {}", "No PDF files found in".yellow(), dir.display());
            return Ok(());
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} converted, {} failed",
        "Documents:".green().bold(),
        summary.converted_count(),
        summary.failed_count()
    );
    println!("Markdown files saved in {}", summary.output_dir.display());
    println!("Combined file: {}", summary.combined_file.display());

    Ok(())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    no_tables: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Pdfmark::new();
    if no_tables {
        builder = builder.text_only();
    }
    let doc = builder.convert_file(input)?;
    let markdown = pdfmark::render::to_markdown(&doc.meta.title, &doc.blocks);

    if let Some(path) = output {
        fs::write(path, &markdown)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", markdown);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = LopdfSource::open(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), source.page_count()?);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if source.is_encrypted() { "Yes" } else { "No" }
    );

    let toc = source.toc()?;
    println!();
    println!("{} ({})", "Outline".cyan().bold(), toc.len());
    println!("{}", "─".repeat(40).dimmed());
    for entry in &toc {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        println!("{}{} {}", indent, entry.title, format!("p.{}", entry.page).dimmed());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfmark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to Markdown corpus converter");
    println!();
    println!("License: MIT");
}
