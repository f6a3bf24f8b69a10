//! Runs a parsed command line: resolves configuration once, then drives the
//! pipeline and writes reports or listings.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli::{self, Commands, OutputArgs, ReportFormat};
use crate::directory::CharacterDirectory;
use crate::extract::listing;
use crate::logging;
use crate::pipeline::{self, CatalogSource, Report};

/// Public entry for running the CLI.
pub fn run_cli_app() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::run();
    logging::init_logging(args.debug);

    let characters = cli::characters_path(args.characters.clone());

    match args.command {
        Commands::Analyze { catalog, listing, filters, output } => {
            let source = make_source(catalog, listing, args.key, args.iv)?;
            let directory = CharacterDirectory::load_or_empty(&characters);
            let report = pipeline::single_report(&source, &directory, &filters.to_filters())?;
            write_report(&report, &output)?;
        }
        Commands::Compare { new, old, listing, filters, output } => {
            let (new, old) = if listing {
                (CatalogSource::Listing { path: new }, CatalogSource::Listing { path: old })
            } else {
                let key = cli::key_material(args.key, args.iv)?;
                (
                    CatalogSource::Catalog { path: new, key: key.clone() },
                    CatalogSource::Catalog { path: old, key },
                )
            };
            let directory = CharacterDirectory::load_or_empty(&characters);
            let filters = filters.to_filters();
            let report = pipeline::comparison_report(&new, &old, &directory, &filters)?;
            write_report(&report, &output)?;
        }
        Commands::Extract { catalogs, output_dir } => {
            let key = cli::key_material(args.key, args.iv)?;
            extract_all(&catalogs, &key, output_dir.as_deref())?;
        }
        Commands::Roster { squads } => {
            let directory = CharacterDirectory::load(&characters)?;
            print_roster(&directory, &squads)?;
        }
    }

    Ok(())
}

fn make_source(
    path: PathBuf,
    listing: bool,
    key: Option<String>,
    iv: Option<String>,
) -> Result<CatalogSource, Box<dyn std::error::Error>> {
    if listing {
        Ok(CatalogSource::Listing { path })
    } else {
        Ok(CatalogSource::Catalog { path, key: cli::key_material(key, iv)? })
    }
}

fn write_report(report: &Report, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut text = match output.format {
        ReportFormat::Text => report.to_text(),
        ReportFormat::Json => serde_json::to_string_pretty(&report.to_json())?,
    };
    text.push('\n');

    match &output.output {
        Some(path) => {
            fs::write(path, text)?;
            tracing::info!("report written to '{}'", path.display());
        }
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}

/// Decodes each catalog in turn. A failure is logged with the file name and the
/// batch moves on; the command fails at the end if any catalog failed.
///
/// Listings are named after the catalog's file stem. Two catalogs sharing a
/// stem would write the same listing, so the later one counts as failed.
fn extract_all(
    catalogs: &[PathBuf],
    key: &crate::crypto::KeyMaterial,
    output_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let mut written = HashSet::new();
    let mut failed = 0usize;
    for path in catalogs {
        let source = CatalogSource::Catalog { path: path.clone(), key: key.clone() };
        let extraction = match pipeline::load_paths(&source) {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::error!("[decode failed] {}", e);
                failed += 1;
                continue;
            }
        };

        let text = listing::write_listing(&extraction.paths);
        let Some(dir) = output_dir else {
            io::stdout().lock().write_all(text.as_bytes())?;
            continue;
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.label());
        let out = dir.join(format!("{}.txt", stem));
        if !written.insert(out.clone()) {
            tracing::error!(
                "[write failed] '{}' would overwrite the listing of an earlier catalog",
                path.display()
            );
            failed += 1;
            continue;
        }
        if let Err(e) = fs::write(&out, text) {
            tracing::error!("[write failed] '{}': {}", out.display(), e);
            failed += 1;
            continue;
        }
        tracing::info!("wrote {} paths to '{}'", extraction.paths.len(), out.display());
    }

    if failed > 0 {
        return Err(format!("{} of {} catalogs failed", failed, catalogs.len()).into());
    }
    Ok(())
}

fn print_roster(directory: &CharacterDirectory, squads: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for squad in directory.squads() {
        if !squads.is_empty() && !squads.iter().any(|s| s == squad) {
            continue;
        }
        writeln!(out, "{}", squad)?;
        for name in directory.characters_in(Some(&[squad.to_string()][..])) {
            writeln!(out, "  - {}", name)?;
        }
    }
    Ok(())
}
