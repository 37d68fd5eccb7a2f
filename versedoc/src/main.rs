//! versedoc - Bible verse and notes export tool
//!
//! A CLI tool that turns a selection of verses, optionally annotated with
//! markdown notes, into a Word document.

#![deny(unsafe_code)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use versedoc::catalog::TranslationCatalog;
use versedoc::layout::reference_heading;
use versedoc::{block_by_chapter, block_by_contiguity, docx_rs_exporter, ExportInput};

/// Main entry point for the versedoc CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            verbose,
        } => {
            handle_export_command(input, output, verbose)?;
        }

        Commands::Blocks { input, by_chapter } => {
            init_logging(false);
            handle_blocks_command(&input, by_chapter)?;
        }
    }

    Ok(())
}

/// Initialize logging: Info level when verbose, otherwise from RUST_LOG
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Handle the export command
fn handle_export_command(input: PathBuf, mut output: PathBuf, verbose: bool) -> Result<()> {
    init_logging(verbose);

    if output.extension().is_none() {
        output.set_extension("docx");
    }

    println!("Exporting verses...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    // Stage 1: Load configuration, verses and notes
    println!("\n[Stage 1/3] Loading export input...");
    let export_input = ExportInput::load(&input)
        .with_context(|| format!("Failed to load export from {}", input.display()))?;
    println!(
        "✓ Loaded {} verses and {} notes",
        export_input.verses.len(),
        export_input.notes.len()
    );

    // Stage 2: Lay out the document
    println!("\n[Stage 2/3] Laying out document...");
    let catalog = export_input.config.catalog();
    let request = versedoc::ExportRequest::from_input(&export_input);
    let document = versedoc::build_document(&request, &catalog)
        .with_context(|| "Failed to lay out export document")?;
    println!(
        "✓ Laid out {} nodes ({} tables)",
        document.body.len(),
        document.table_count()
    );

    // Stage 3: Write the .docx
    println!("\n[Stage 3/3] Writing DOCX...");
    docx_rs_exporter::to_docx(&document, &output)
        .with_context(|| format!("Failed to export DOCX to {}", output.display()))?;
    println!("✓ Successfully wrote: {}", output.display());

    Ok(())
}

/// Handle the blocks command
fn handle_blocks_command(input: &Path, by_chapter: bool) -> Result<()> {
    let export_input = ExportInput::load(input)
        .with_context(|| format!("Failed to load export from {}", input.display()))?;
    let config = &export_input.config;
    let catalog = config.catalog();
    let separator = catalog
        .reference_separator(&config.translation)
        .with_context(|| format!("Unknown translation '{}'", config.translation))?;

    if by_chapter {
        for block in block_by_chapter(&export_input.verses) {
            print_block(&block, "", &separator);
        }
        return Ok(());
    }

    // Without configured books, group every book that occurs in the verse list
    let book_ids: Vec<String> = if config.is_tag_export() {
        config.books.iter().map(|b| b.short_title.clone()).collect()
    } else {
        export_input
            .verses
            .iter()
            .map(|v| v.book_short_title.clone())
            .unique()
            .collect()
    };

    for book_id in &book_ids {
        let title = config
            .books
            .iter()
            .find(|b| &b.short_title == book_id)
            .map(|b| catalog.book_title(&b.long_title))
            .transpose()?
            .unwrap_or_else(|| book_id.clone());

        for block in block_by_contiguity(&export_input.verses, book_id) {
            print_block(&block, &title, &separator);
        }
    }

    Ok(())
}

/// Print one block as "<reference> (<n> verses)"
fn print_block(block: &versedoc::VerseBlock<'_>, title: &str, separator: &str) {
    if let Some(reference) = reference_heading(block, title, separator) {
        println!("{} ({} verses)", reference.trim(), block.len());
    }
}
