use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use open_file::app::services::diff::{self, DiffStatus};
use open_file::app::services::text_ops::numbered_lines;
use open_file::app::{
    FileStore, FsReader, NoticeLevel, RawInput, RenderOutput, RenderRegistry, SearchOptions,
    SessionController, SessionEvent, ViewerSettings, system_prefers_dark,
};

#[derive(Debug, Parser)]
#[command(name = "openfile", version, about = "View, search and compare local files")]
struct Cli {
    /// Preferences file (defaults to the user config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open files and render the last one
    View {
        files: Vec<PathBuf>,
        /// Print without colours
        #[arg(long)]
        plain: bool,
    },
    /// Search a file for a query
    Search {
        file: PathBuf,
        query: String,
        #[arg(long)]
        case_sensitive: bool,
        #[arg(long)]
        regex: bool,
        #[arg(long)]
        whole_word: bool,
    },
    /// Compare two text files line by line
    Diff { left: PathBuf, right: PathBuf },
    /// Show or change stored preferences
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    Show,
    Reset,
    /// Set one key of the settings record, e.g. `set fontSizePt 16`
    Set { key: String, value: String },
    /// Switch between dark and light
    ToggleTheme,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_session(store: Option<PathBuf>) -> SessionController {
    let store = match store {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default(),
    };
    SessionController::with_system_theme(Box::new(store), system_prefers_dark())
}

fn open_path(session: &mut SessionController, path: &Path) -> Result<open_file::app::DocumentId> {
    let input =
        RawInput::from_path(path).with_context(|| format!("cannot open {}", path.display()))?;
    session
        .open_document(input, &FsReader)
        .with_context(|| format!("cannot read {}", path.display()))
}

fn print_notices(events: &std::sync::mpsc::Receiver<SessionEvent>) {
    for event in events.try_iter() {
        if let SessionEvent::Notice(notice) = event
            && matches!(notice.level, NoticeLevel::Warning | NoticeLevel::Error)
        {
            eprintln!("{}", notice.message);
        }
    }
}

fn run_view(session: &mut SessionController, files: &[PathBuf], plain: bool) -> Result<()> {
    if files.is_empty() {
        bail!("no files given");
    }
    let events = session.subscribe();
    for path in files {
        if let Err(e) = open_path(session, path) {
            eprintln!("{e:#}");
        }
    }
    print_notices(&events);

    for tab in session.tabs() {
        let marker = if tab.active { '*' } else { ' ' };
        println!("{marker} {} [{}]", tab.name, tab.kind.as_str());
    }
    let status = session.status();
    println!(
        "{} | {} | {} | {}%",
        status.file_type,
        status.size,
        status.lines_label(),
        session.view().zoom().percent()
    );
    println!();

    let registry = RenderRegistry::new();
    let Some(result) = session.render_active(&registry, system_prefers_dark()) else {
        return Ok(());
    };
    print_notices(&events);
    match result {
        Ok(RenderOutput::Highlighted { lines, .. }) => {
            for line in lines {
                if let Some(n) = line.number {
                    print!("{n:>5}  ");
                }
                if plain {
                    println!("{}", line.plain());
                } else {
                    for span in &line.spans {
                        let c = span.color;
                        print!("\x1b[38;2;{};{};{}m{}", c.0, c.1, c.2, span.text);
                    }
                    println!("\x1b[0m");
                }
            }
        }
        Ok(RenderOutput::Image { data_url, scale_percent }) => {
            println!("image at {scale_percent}%: {} bytes of data reference", data_url.len());
        }
        Ok(RenderOutput::Markup(markup)) => println!("{markup}"),
        Err(e) => eprintln!("{e}"),
    }
    Ok(())
}

fn run_search(
    session: &mut SessionController,
    file: &Path,
    query: &str,
    options: SearchOptions,
) -> Result<()> {
    let id = open_path(session, file)?;
    let count = session.search(query, options)?;
    println!("{count} results");

    let text = session
        .documents()
        .get(id)
        .and_then(|d| d.plain_text())
        .ok_or_else(|| anyhow!("{} has no searchable text", file.display()))?;
    for m in session.search_state().matches() {
        let line_start = text[..m.start].rfind('\n').map_or(0, |i| i + 1);
        let line_no = text[..m.start].matches('\n').count() + 1;
        let line_end = text[m.start..].find('\n').map_or(text.len(), |i| m.start + i);
        let col = text[line_start..m.start].chars().count() + 1;
        println!("{}", numbered_lines(&format!("{col}: {}", &text[line_start..line_end]), line_no));
    }
    Ok(())
}

fn run_diff(session: &mut SessionController, left: &Path, right: &Path) -> Result<()> {
    let a = open_path(session, left)?;
    let b = open_path(session, right)?;
    let rows = session.compare_documents(a, b)?;
    if diff::stats(&rows).is_identical() {
        println!("Files are identical");
        return Ok(());
    }
    for row in &rows {
        let sign = match row.status {
            DiffStatus::Equal => ' ',
            DiffStatus::Removed => '-',
            DiffStatus::Added => '+',
        };
        println!("{sign}{:>5}  {}", row.line_number, row.text());
    }
    Ok(())
}

fn set_setting(current: &ViewerSettings, key: &str, value: &str) -> Result<ViewerSettings> {
    let mut record = serde_json::to_value(current)?;
    let fields = record
        .as_object_mut()
        .ok_or_else(|| anyhow!("settings record is not an object"))?;
    if !fields.contains_key(key) {
        let known: Vec<&str> = fields.keys().map(String::as_str).collect();
        bail!("unknown setting {key}; expected one of {}", known.join(", "));
    }
    let parsed = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    fields.insert(key.to_string(), parsed);
    serde_json::from_value(record).with_context(|| format!("invalid value for {key}: {value}"))
}

fn run_settings(session: &mut SessionController, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {}
        SettingsAction::Reset => session.reset_settings()?,
        SettingsAction::Set { key, value } => {
            let updated = set_setting(session.settings(), &key, &value)?;
            session.update_settings(updated);
            session.save_settings()?;
        }
        SettingsAction::ToggleTheme => {
            let theme = session.toggle_theme(system_prefers_dark())?;
            println!("theme: {}", theme.as_str());
            return Ok(());
        }
    }
    println!("{}", serde_json::to_string_pretty(session.settings())?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut session = open_session(cli.store);
    match cli.command {
        Command::View { files, plain } => run_view(&mut session, &files, plain),
        Command::Search { file, query, case_sensitive, regex, whole_word } => {
            let options = SearchOptions { case_sensitive, use_regex: regex, whole_word };
            run_search(&mut session, &file, &query, options)
        }
        Command::Diff { left, right } => run_diff(&mut session, &left, &right),
        Command::Settings { action } => run_settings(&mut session, action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_setting_parses_typed_values() {
        let settings = ViewerSettings::default();
        let updated = set_setting(&settings, "fontSizePt", "18").unwrap();
        assert_eq!(updated.font_size_pt, 18);

        let updated = set_setting(&settings, "theme", "light").unwrap();
        assert_eq!(updated.theme, open_file::app::ThemeMode::Light);

        let updated = set_setting(&settings, "fontFamily", "monospace").unwrap();
        assert_eq!(updated.font_family, "monospace");
    }

    #[test]
    fn test_set_setting_rejects_bad_input() {
        let settings = ViewerSettings::default();
        assert!(set_setting(&settings, "colour", "red").is_err());
        assert!(set_setting(&settings, "wordWrap", "sometimes").is_err());
    }

    #[test]
    fn test_cli_parses_search_flags() {
        let args = ["openfile", "search", "a.txt", "foo", "--regex", "--whole-word"];
        let cli = Cli::parse_from(args);
        match cli.command {
            Command::Search { regex, whole_word, case_sensitive, .. } => {
                assert!(regex && whole_word && !case_sensitive);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
