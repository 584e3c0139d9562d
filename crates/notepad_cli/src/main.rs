//! Command-line front end for the notes store.
//!
//! # Responsibility
//! - Map subcommands onto `NoteService` / `NoteStore` calls.
//! - Keep stdout to note content; diagnostics go to stderr and the log file.

use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use notepad_core::{
    core_version, default_log_level, init_logging, Note, NoteOrder, NoteService, NoteStore,
    StoreConfig,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "notepad", version, about = "Keep short text notes in a local database")]
struct Cli {
    /// Database file, created on first use.
    #[arg(long, global = true, env = "NOTEPAD_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Absolute directory for rotated log files. Logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

const DEFAULT_DB_FILE: &str = "notepad.db";

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SortKey {
    /// Most recently modified first.
    #[default]
    Modified,
    /// Alphabetical by title.
    Title,
}

impl From<SortKey> for NoteOrder {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Modified => NoteOrder::Modified,
            SortKey::Title => NoteOrder::Title,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a note; the title is taken from the first words.
    Add { text: String },
    /// List notes.
    List {
        #[arg(long, value_enum, default_value_t = SortKey::Modified)]
        sort: SortKey,
    },
    /// Print one note.
    Show { id: i64 },
    /// Find notes whose title or body contains the query.
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = SortKey::Modified)]
        sort: SortKey,
    },
    /// Replace a note's text.
    Edit {
        id: i64,
        text: String,
        /// Also set the title.
        #[arg(long)]
        title: Option<String>,
    },
    /// Set a background color by palette name or #RRGGBB.
    Color { id: i64, color: String },
    /// Delete a note.
    Rm { id: i64 },
    /// Stream a note as plain text.
    Type { id: i64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, dir) {
            eprintln!("notepad: logging disabled: {err}");
        }
    }

    match run(cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("notepad: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(NoteStore::open(StoreConfig::with_database(cli.db))?);
    let service = NoteService::new(Arc::clone(&store));

    match cli.command {
        Command::Add { text } => {
            let note = service.create_note(text)?;
            writeln!(out, "{}", note.id)?;
        }
        Command::List { sort } => {
            for note in service.list_notes(sort.into())? {
                print_summary(out, &note)?;
            }
        }
        Command::Show { id } => match service.get_note(id)? {
            Some(note) => print_detail(out, &note)?,
            None => return Err(format!("note {id} not found").into()),
        },
        Command::Search { query, sort } => {
            for note in service.search_notes(&query, sort.into())? {
                print_summary(out, &note)?;
            }
        }
        Command::Edit { id, text, title } => {
            service.update_note_text(id, text)?;
            if let Some(title) = title {
                service.rename_note(id, title)?;
            }
        }
        Command::Color { id, color } => {
            let note = service.set_background_color(id, &color)?;
            writeln!(out, "{}", note.background_color)?;
        }
        Command::Rm { id } => {
            if !service.delete_note(id)? {
                return Err(format!("note {id} not found").into());
            }
        }
        Command::Type { id } => {
            let uri = store.router().note_uri(id).to_string();
            let mut stream = store.open_typed_stream(&uri, "text/plain")?;
            io::copy(&mut stream, out)?;
            stream.join_writer()?;
        }
    }

    out.flush()?;
    log::debug!("event=cli_command module=cli status=ok version={}", core_version());
    Ok(())
}

fn print_summary(out: &mut impl Write, note: &Note) -> io::Result<()> {
    writeln!(out, "{:>5}  {}  {}", note.id, note.background_color, note.title)
}

fn print_detail(out: &mut impl Write, note: &Note) -> io::Result<()> {
    writeln!(out, "id:       {}", note.id)?;
    writeln!(out, "title:    {}", note.title)?;
    writeln!(out, "color:    {}", note.background_color)?;
    writeln!(out, "created:  {}", note.created)?;
    writeln!(out, "modified: {}", note.modified)?;
    writeln!(out)?;
    writeln!(out, "{}", note.body)
}
