//! Command-line front end for a Flakardia flashcard library.
//!
//! # Responsibility
//! - Select the active library and persist the choice per user.
//! - Browse, inspect and extend card sets from a terminal.
//! - Print the application module descriptor and its revision history.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use flakardia_core::{
    flakardia_descriptor, init_logging, parse_descriptor_revision, resolve_application_module,
    CardManager, ConfigStore, DebugMode, DescriptorDiff, DescriptorRevision, FlashcardSetListEntry,
    FlashcardStorage, FsFlashcardStorage, Library, RelativePath, StatsFileRecovery,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flakardia", about = "Flashcard library tool", version)]
struct Cli {
    /// Use the debug settings and verbose logging
    #[arg(long, global = true, value_enum, default_value = "no-debug")]
    debug_mode: DebugModeArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DebugModeArg {
    NoDebug,
    Debug,
    Verbose,
}

impl From<DebugModeArg> for DebugMode {
    fn from(value: DebugModeArg) -> Self {
        match value {
            DebugModeArg::NoDebug => DebugMode::NoDebug,
            DebugModeArg::Debug => DebugMode::Debug,
            DebugModeArg::Verbose => DebugMode::Verbose,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the module declaration of a descriptor revision
    Descriptor {
        /// Revision name (r1, r2, r3); defaults to the latest
        #[arg(long, value_parser = parse_descriptor_revision)]
        revision: Option<DescriptorRevision>,
    },

    /// Show requirements added and removed between two revisions
    Diff {
        #[arg(value_parser = parse_descriptor_revision)]
        from: DescriptorRevision,
        #[arg(value_parser = parse_descriptor_revision)]
        to: DescriptorRevision,
    },

    /// Select or show the active library
    #[command(subcommand)]
    Library(LibraryCommand),

    /// List a directory of the active library
    Ls {
        /// Directory relative to the library root
        dir: Option<String>,
    },

    /// Show the cards of a file or a whole directory
    Show {
        /// File or directory relative to the library root
        path: String,
    },

    /// Create a directory
    Mkdir {
        name: String,
        /// Parent directory relative to the library root
        #[arg(long)]
        dir: Option<String>,
    },

    /// Create an empty card-set file
    Touch {
        name: String,
        /// Parent directory relative to the library root
        #[arg(long)]
        dir: Option<String>,
    },

    /// Print the learning statistics of the active library
    Stats,
}

#[derive(Subcommand)]
enum LibraryCommand {
    /// Make a directory the active library
    Set { path: PathBuf },
    /// Print the active library
    Show,
}

/// Asks on the terminal whether a renamed stats file should be restored.
struct StdinRecovery;

impl StatsFileRecovery for StdinRecovery {
    fn request_recovery(&self, message: &str) -> bool {
        eprintln!("{message}");
        eprint!("Recover? [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }

    fn notify_recovery_impossible(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}

type CliLibrary = Library<FsFlashcardStorage<StdinRecovery>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mode = DebugMode::from(cli.debug_mode);
    let config = ConfigStore::for_user(mode)?;
    start_logging(&config, mode);

    resolve_application_module().context("application module does not resolve")?;

    match cli.command {
        Command::Descriptor { revision } => {
            let revision = revision.unwrap_or_else(DescriptorRevision::latest);
            print!("{}", flakardia_descriptor(revision).to_declaration());
        }
        Command::Diff { from, to } => print_diff(from, to),
        Command::Library(LibraryCommand::Set { path }) => {
            let root = std::fs::canonicalize(&path)
                .with_context(|| format!("cannot open library {}", path.display()))?;
            if !root.is_dir() {
                bail!("{} is not a directory", root.display());
            }
            config.set_library_path(&root)?;
            info!("event=library_set module=cli status=ok");
            println!("{}", root.display());
        }
        Command::Library(LibraryCommand::Show) => match config.library_path()? {
            Some(path) => println!("{}", path.display()),
            None => println!("No library selected"),
        },
        Command::Ls { dir } => {
            let manager = enter(&config, dir.as_deref())?;
            if let Some(path) = manager.path() {
                println!("{path}:");
            }
            for entry in manager.entries() {
                match entry {
                    FlashcardSetListEntry::File(_) => println!("{}", entry.name()),
                    FlashcardSetListEntry::Dir(_) | FlashcardSetListEntry::Up(_) => {
                        println!("{}/", entry.name())
                    }
                }
            }
        }
        Command::Show { path } => {
            let library = open_library(&config)?;
            let relative = RelativePath::parse(&path);
            let entry = if library.storage().root().join(&path).is_dir() {
                FlashcardSetListEntry::Dir(relative)
            } else {
                FlashcardSetListEntry::File(relative)
            };
            let view = library.card_set_view(&entry)?;
            for line in &view.warnings {
                eprintln!("{line}");
            }
            for card in &view.flashcards {
                let mistakes = view
                    .stats
                    .get(&card.flashcard.answer)
                    .map(|stats| stats.mistakes.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}\t{}\t{}",
                    card.flashcard.question, card.flashcard.answer, mistakes
                );
            }
        }
        Command::Mkdir { name, dir } => {
            let mut manager = enter(&config, dir.as_deref())?;
            manager.create_dir(&name)?;
        }
        Command::Touch { name, dir } => {
            let mut manager = enter(&config, dir.as_deref())?;
            manager.create_file(&name)?;
        }
        Command::Stats => {
            let library = open_library(&config)?;
            let stats = library.storage().read_library_stats()?;
            for (word, stats) in &stats.word_stats {
                println!(
                    "{}\t{}\t{:.2}\t{}",
                    word,
                    stats.last_learned.to_rfc3339(),
                    stats.interval_before_last_learned.as_secs_f64() / 86_400.0,
                    stats.mistakes
                );
            }
        }
    }

    Ok(())
}

fn start_logging(config: &ConfigStore, mode: DebugMode) {
    let level = match config.load() {
        Ok(settings) => settings.effective_log_level(mode),
        Err(err) => {
            eprintln!("warning: {err}");
            mode.default_log_level()
        }
    };
    let Some(log_dir) = dirs::data_local_dir().map(|dir| dir.join("flakardia").join("logs"))
    else {
        return;
    };
    if let Err(err) = init_logging(level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn print_diff(from: DescriptorRevision, to: DescriptorRevision) {
    let diff = DescriptorDiff::between(&flakardia_descriptor(from), &flakardia_descriptor(to));
    if diff.is_empty() {
        println!("{from} -> {to}: no changes");
        return;
    }
    for module in &diff.added {
        println!("+ {module}");
    }
    for module in &diff.removed {
        println!("- {module}");
    }
}

fn open_library(config: &ConfigStore) -> anyhow::Result<CliLibrary> {
    let Some(root) = config.library_path()? else {
        bail!("No library selected; run `flakardia library set <path>` first");
    };
    if !root.is_dir() {
        warn!("event=library_open module=cli status=error reason=missing_root");
        bail!("library {} does not exist", root.display());
    }
    Ok(Library::new(FsFlashcardStorage::new(root, StdinRecovery)))
}

fn enter(
    config: &ConfigStore,
    dir: Option<&str>,
) -> anyhow::Result<CardManager<FsFlashcardStorage<StdinRecovery>>> {
    let mut manager = CardManager::new();
    manager.enter_library(open_library(config)?)?;
    if let Some(dir) = dir.filter(|dir| !is_root(Path::new(dir))) {
        manager.enter(&RelativePath::parse(dir))?;
    }
    Ok(manager)
}

fn is_root(dir: &Path) -> bool {
    dir.as_os_str().is_empty() || dir == Path::new(".") || dir == Path::new("/")
}
