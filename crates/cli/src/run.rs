//! `sgrid run` and `sgrid locator`, plus the load/scrub/export steps the
//! edit loop shares.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use scrubgrid_engine::config::OutputFormat;
use scrubgrid_engine::pipeline::ScrubReport;
use scrubgrid_engine::{
    scrub, BlacklistIndex, Dataset, EditSession, RowId, ScrubConfig, ScrubError, ScrubOutcome,
    Table,
};
use scrubgrid_io::{resolve_locator, BlacklistSource};

use crate::CliError;

pub struct RunArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub blocked_output: Option<PathBuf>,
    pub delete: Vec<usize>,
    pub purge: bool,
    pub json: bool,
    pub quiet: bool,
}

/// Everything a session needs after the single synchronous pass.
pub struct Prepared {
    pub outcome: ScrubOutcome,
    pub index: BlacklistIndex,
    pub source: String,
}

// ============================================================================
// Shared steps
// ============================================================================

pub fn prepare(input: &Path, cfg: &ScrubConfig) -> Result<Prepared, CliError> {
    let table = scrubgrid_io::load_table(input)?;
    let dataset = Dataset::bind(table, &cfg.input.columns())?;

    let source = BlacklistSource::parse(&cfg.blacklist.source)?;
    log::info!("blacklist: {}", source.describe());
    let blacklist = source.load()?;
    let index = BlacklistIndex::build(
        &blacklist,
        Some(&cfg.blacklist.company_column),
        Some(&cfg.blacklist.email_column),
    )?;
    if index.company_column().is_none() || index.email_column().is_none() {
        log::warn!(
            "blacklist {} has only one of the configured columns; the other side matches nothing",
            source.describe()
        );
    }

    let outcome = scrub(&dataset, &index);
    Ok(Prepared { outcome, index, source: source.describe() })
}

/// Format from the extension when it names one, otherwise `fallback`.
pub fn infer_format(path: &Path, fallback: OutputFormat) -> OutputFormat {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "csv" => OutputFormat::Csv,
        Some(ext) if ext == "xlsx" => OutputFormat::Xlsx,
        _ => fallback,
    }
}

/// Pick the output path and format from flags and config. An explicit
/// `--format` without `-o` swaps the configured file's extension.
pub fn output_target(
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    cfg: &ScrubConfig,
) -> (PathBuf, OutputFormat) {
    match (output, format) {
        (Some(path), Some(format)) => (path, format),
        (Some(path), None) => {
            let format = infer_format(&path, cfg.output.format);
            (path, format)
        }
        (None, Some(format)) => {
            let path = PathBuf::from(&cfg.output.file);
            if infer_format(&path, format) == format {
                (path, format)
            } else {
                (path.with_extension(format.to_string()), format)
            }
        }
        (None, None) => {
            let path = PathBuf::from(&cfg.output.file);
            let format = infer_format(&path, cfg.output.format);
            (path, format)
        }
    }
}

pub fn encode_table(table: &Table, format: OutputFormat) -> Result<Vec<u8>, CliError> {
    let bytes = match format {
        OutputFormat::Xlsx => scrubgrid_io::xlsx::export(table)?,
        OutputFormat::Csv => scrubgrid_io::csv::export(table)?,
    };
    Ok(bytes)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write every file or none. Each is staged beside its target and renamed
/// into place only after all staging writes succeeded.
pub fn write_files(files: &[(&Path, Vec<u8>)]) -> Result<(), CliError> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        let tmp = staging_path(path);
        if let Err(e) = std::fs::write(&tmp, bytes) {
            for t in &staged {
                let _ = std::fs::remove_file(t);
            }
            return Err(ScrubError::export(format!("cannot write {}: {e}", path.display())).into());
        }
        staged.push(tmp);
    }
    for (tmp, (path, _)) in staged.iter().zip(files) {
        std::fs::rename(tmp, path)
            .map_err(|e| ScrubError::export(format!("cannot write {}: {e}", path.display())))?;
    }
    Ok(())
}

/// Serialize `table` and write it. A failed write leaves nothing in memory
/// changed.
pub fn write_table(table: &Table, path: &Path, format: OutputFormat) -> Result<(), CliError> {
    write_files(&[(path, encode_table(table, format)?)])?;
    log::info!("wrote {} row(s) to {} ({format})", table.len(), path.display());
    Ok(())
}

// ============================================================================
// run
// ============================================================================

#[derive(Serialize)]
struct RunReport {
    #[serde(flatten)]
    report: ScrubReport,
    blacklist: String,
    output: String,
    format: String,
    mime: &'static str,
    deleted: Vec<RowId>,
    purged: Vec<RowId>,
    exported_rows: usize,
}

pub fn cmd_run(cfg: &ScrubConfig, args: RunArgs) -> Result<(), CliError> {
    let prepared = prepare(&args.input, cfg)?;
    let outcome = &prepared.outcome;

    let mut session: EditSession = outcome.session();
    if !args.delete.is_empty() {
        let ids: Vec<RowId> = args.delete.iter().copied().map(RowId).collect();
        let requested = ids.iter().collect::<HashSet<_>>().len();
        let removed = session.delete_many(&ids);
        if removed < requested {
            log::warn!(
                "{} of {} --delete id(s) not in the clean set; ignored",
                requested - removed,
                requested
            );
        }
    }
    let purged = if args.purge {
        session.purge_blacklisted(&prepared.index)
    } else {
        Vec::new()
    };

    let (out_path, format) = output_target(args.output, args.format, cfg);
    let exported = session.to_table();
    let mut files = vec![(out_path.as_path(), encode_table(&exported, format)?)];
    if let Some(path) = &args.blocked_output {
        let blocked_format = infer_format(path, format);
        files.push((path.as_path(), encode_table(&outcome.blocked_table(), blocked_format)?));
    }
    write_files(&files)?;
    log::info!("wrote {} row(s) to {} ({format})", exported.len(), out_path.display());

    if args.json {
        let report = RunReport {
            report: outcome.report(),
            blacklist: prepared.source.clone(),
            output: out_path.display().to_string(),
            format: format.to_string(),
            mime: scrubgrid_io::mime_type(format),
            deleted: session.deleted_ids().into_iter().filter(|id| !purged.contains(id)).collect(),
            purged,
            exported_rows: exported.len(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::other(format!("cannot serialize report: {e}")))?;
        println!("{json}");
    } else if !args.quiet {
        let s = &outcome.summary;
        eprintln!("Scrubbed {} ({} rows)", args.input.display(), s.total_rows);
        eprintln!(
            "  blacklist   {} companies, {} emails",
            s.blacklist_companies, s.blacklist_emails
        );
        eprintln!(
            "  blocked     {} (company {}, email {}, both {})",
            s.blocked, s.blocked_by_company, s.blocked_by_email, s.blocked_by_both
        );
        eprintln!("  duplicates  {}", s.duplicates_removed);
        eprintln!("  clean       {}", s.clean);
        if exported.len() != s.clean {
            eprintln!("  removed     {}", s.clean - exported.len());
        }
        eprintln!("Wrote {} row(s) to {}", exported.len(), out_path.display());
    }

    Ok(())
}

// ============================================================================
// locator
// ============================================================================

pub fn cmd_locator(locator: &str) -> Result<(), CliError> {
    let source = BlacklistSource::parse(locator)?;
    match source {
        BlacklistSource::Remote(url) => println!("{url}"),
        BlacklistSource::Local(path) => {
            if !path.exists() {
                log::warn!("{} does not exist", path.display());
            }
            println!("{}", path.display());
        }
    }
    log::debug!("raw rewrite: {}", resolve_locator(locator.trim()));
    Ok(())
}
