use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sidenote::{Session, Span};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "sidenote",
    about = "Attach side annotations to spans of a text document",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a span of the document
    Add {
        /// Document file path
        file: PathBuf,

        /// Span start, a 0-based byte offset
        start: usize,

        /// Span length in bytes
        length: usize,
    },

    /// Remove the annotation covering a position
    Remove {
        /// Document file path
        file: PathBuf,

        /// Position inside the annotation, 0-based
        position: usize,
    },

    /// List annotations with their current spans and content
    List {
        /// Document file path
        file: PathBuf,
    },

    /// Toggle annotation highlighting for the session
    Show {
        /// Document file path
        file: PathBuf,
    },

    /// Set the keep-mode recorded in the sidecar
    Keep {
        /// Document file path
        file: PathBuf,

        /// "in" leaves annotated text inline on save, "out" extracts it
        mode: String,
    },

    /// Print the sidecar state for a document
    Status {
        /// Document file path
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sidenote=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            file,
            start,
            length,
        } => {
            let end = start
                .checked_add(length)
                .with_context(|| format!("span {start}+{length} does not fit in a byte offset"))?;
            let mut session = open_session(&file)?;
            let id = session.create_annotation(Span::new(start, end))?;
            debug!(%id, "created");
            save_session(session, &file)?;
            println!("Annotated {start}..{end}");
        }

        Commands::Remove { file, position } => {
            let mut session = open_session(&file)?;
            session.remove_annotation_at(position)?;
            save_session(session, &file)?;
            println!("Annotation at {position} removed");
        }

        Commands::List { file } => {
            let session = open_session(&file)?;
            let annotations = session.annotations();
            if annotations.is_empty() {
                println!("No annotations");
            }
            for (id, span) in annotations {
                let content = &session.buffer().text()[span.start..span.end];
                println!("{id}  {span}  {content:?}");
            }
        }

        Commands::Show { file } => {
            let mut session = open_session(&file)?;
            let status = session.toggle_show();
            save_session(session, &file)?;
            println!("{status}");
        }

        Commands::Keep { file, mode } => {
            let keep = match mode.as_str() {
                "in" => true,
                "out" => false,
                other => bail!("invalid keep-mode '{other}' (expected 'in' or 'out')"),
            };
            let mut session = open_session(&file)?;
            session.set_keep(keep);
            let status = session.status_line();
            save_session(session, &file)?;
            println!("{status}");
        }

        Commands::Status { file } => {
            let session = open_session(&file)?;
            println!("{}", session.status_line());
            println!("{} annotation(s)", session.store().len());
        }
    }

    Ok(())
}

/// Read the document and replay its sidecar, if any.
fn open_session(path: &Path) -> Result<Session> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut session = Session::open(name, text);
    session
        .load(path)
        .with_context(|| format!("failed to load sidecar for {}", path.display()))?;
    Ok(session)
}

/// Drain the session into the sidecar and write the canonical text back.
fn save_session(mut session: Session, path: &Path) -> Result<()> {
    session
        .save(path)
        .with_context(|| format!("failed to write sidecar for {}", path.display()))?;
    fs::write(path, session.buffer().text())
        .with_context(|| format!("failed to write document {}", path.display()))?;
    Ok(())
}
