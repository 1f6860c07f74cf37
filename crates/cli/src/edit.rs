//! `sgrid edit`: a line-oriented edit session over the clean set.
//!
//! Every command is applied in full before the next line is read. Export
//! failures are reported and leave the working copy as it was.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use scrubgrid_engine::config::OutputFormat;
use scrubgrid_engine::{BlacklistIndex, Cell, EditSession, Record, RowId, ScrubConfig, ScrubOutcome};

use crate::run::{infer_format, output_target, prepare, write_table};
use crate::util::render_records;
use crate::CliError;

const HELP: &str = "\
commands:
  list               show the working set
  blocked            show rows removed by the blacklist
  delete <id>...     remove rows from the working set
  reset              restore every deleted row
  purge              re-apply the blacklist to the working set
  status             session state and counts
  export [path]      write the working set (default: configured output)
  help               this text
  quit               leave the session";

#[derive(Debug, PartialEq, Eq)]
enum Action {
    List,
    Blocked,
    Delete(Vec<RowId>),
    Reset,
    Purge,
    Status,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<Action>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let action = match head.to_ascii_lowercase().as_str() {
        "list" | "ls" => Action::List,
        "blocked" => Action::Blocked,
        "delete" | "del" | "rm" => {
            if rest.is_empty() {
                return Err("delete needs at least one row id".to_string());
            }
            let ids = rest
                .iter()
                .map(|w| w.parse::<usize>().map(RowId).map_err(|_| format!("invalid row id '{w}'")))
                .collect::<Result<Vec<_>, _>>()?;
            Action::Delete(ids)
        }
        "reset" => Action::Reset,
        "purge" => Action::Purge,
        "status" => Action::Status,
        "export" => Action::Export(rest.first().map(PathBuf::from)),
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(action))
}

struct Editor<'a> {
    session: EditSession,
    outcome: &'a ScrubOutcome,
    index: &'a BlacklistIndex,
    default_out: PathBuf,
    default_format: OutputFormat,
}

impl Editor<'_> {
    fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, prompt: bool) -> io::Result<()> {
        if prompt {
            eprint!("> ");
        }
        for line in input.lines() {
            let line = line?;
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(Action::Quit)) => break,
                Ok(Some(action)) => self.apply(action, out)?,
                Err(msg) => writeln!(out, "error: {msg}")?,
            }
            out.flush()?;
            if prompt {
                eprint!("> ");
            }
        }
        Ok(())
    }

    fn apply<W: Write>(&mut self, action: Action, out: &mut W) -> io::Result<()> {
        match action {
            Action::List => {
                write!(out, "{}", render_records(self.session.columns(), self.session.working()))?;
            }
            Action::Blocked => {
                let mut columns = self.outcome.columns.clone();
                columns.push("Reason".to_string());
                let rows: Vec<Record> = self
                    .outcome
                    .blocked
                    .iter()
                    .map(|b| {
                        let mut cells = b.record.cells.clone();
                        cells.push(Cell::text(b.reason.to_string()));
                        Record::new(b.record.id, cells)
                    })
                    .collect();
                write!(out, "{}", render_records(&columns, &rows))?;
            }
            Action::Delete(ids) => {
                for id in ids {
                    if self.session.delete(id) {
                        writeln!(out, "deleted {id}")?;
                    } else {
                        writeln!(out, "row {id} is not in the working set (no change)")?;
                    }
                }
            }
            Action::Reset => {
                self.session.reset();
                writeln!(out, "reset: {} row(s)", self.session.len())?;
            }
            Action::Purge => {
                let removed = self.session.purge_blacklisted(self.index);
                if removed.is_empty() {
                    writeln!(out, "purge: nothing blacklisted")?;
                } else {
                    let ids: Vec<String> = removed.iter().map(|id| id.to_string()).collect();
                    writeln!(out, "purged {} row(s): {}", removed.len(), ids.join(" "))?;
                }
            }
            Action::Status => {
                let deleted = self.session.deleted_ids();
                writeln!(out, "state:    {}", self.session.state())?;
                writeln!(out, "rows:     {} of {}", self.session.len(), self.session.baseline().len())?;
                writeln!(out, "blocked:  {}", self.outcome.blocked.len())?;
                if !deleted.is_empty() {
                    let ids: Vec<String> = deleted.iter().map(|id| id.to_string()).collect();
                    writeln!(out, "deleted:  {}", ids.join(" "))?;
                }
            }
            Action::Export(path) => {
                let (path, format) = match path {
                    Some(p) => {
                        let format = infer_format(&p, self.default_format);
                        (p, format)
                    }
                    None => (self.default_out.clone(), self.default_format),
                };
                match write_table(&self.session.to_table(), &path, format) {
                    Ok(()) => {
                        writeln!(out, "exported {} row(s) to {}", self.session.len(), path.display())?
                    }
                    Err(CliError { message, .. }) => writeln!(out, "error: {message}")?,
                }
            }
            Action::Help => writeln!(out, "{HELP}")?,
            Action::Quit => {}
        }
        Ok(())
    }
}

pub fn cmd_edit(cfg: &ScrubConfig, input: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let prepared = prepare(&input, cfg)?;
    let (default_out, default_format) = output_target(output, None, cfg);

    let s = &prepared.outcome.summary;
    eprintln!(
        "{}: {} rows, {} blocked, {} duplicates removed, {} in working set",
        input.display(),
        s.total_rows,
        s.blocked,
        s.duplicates_removed,
        s.clean
    );
    eprintln!("type 'help' for commands");

    let mut editor = Editor {
        session: prepared.outcome.session(),
        outcome: &prepared.outcome,
        index: &prepared.index,
        default_out,
        default_format,
    };

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    editor
        .run(stdin.lock(), &mut out, prompt)
        .map_err(|e| CliError::other(format!("edit session: {e}")))
}
