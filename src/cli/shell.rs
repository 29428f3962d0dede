//! Interactive shell mode
//!
//! A REPL over the same controller the desktop window uses, with command
//! history and tab completion.

use std::time::{Duration, Instant};

use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};

use crate::api::CatalogClient;
use crate::config::Config;
use crate::controller::{Controller, ControllerOptions, Key, UiEvent};
use crate::modal::ModalId;
use crate::state::{SearchMode, StateEvent};
use crate::view::{ListView, ResultsView, VersionsBody};

use super::client;

/// How often the shell polls while a request is in flight
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Command completer for the shell
struct ShellCompleter {
    commands: Vec<(&'static str, Vec<String>)>,
}

impl ShellCompleter {
    fn new(consoles: &[String]) -> Self {
        let mut console_args = vec!["all".to_string()];
        console_args.extend(consoles.iter().cloned());
        Self {
            commands: vec![
                ("show", vec![]),
                ("filter", vec![]),
                ("console", console_args),
                ("page", vec![]),
                ("size", vec!["10".into(), "25".into(), "50".into(), "100".into()]),
                ("open", vec![]),
                ("vpage", vec![]),
                ("pick", vec![]),
                ("close", ModalId::ALL.iter().map(|id| id.dom_id().to_string()).collect()),
                ("mode", vec!["name".into(), "hash".into()]),
                ("find", vec![]),
                ("select", vec![]),
                ("hash", vec![]),
                ("help", vec![]),
                ("exit", vec![]),
                ("quit", vec![]),
            ],
        }
    }

    fn pairs<'a>(words: impl Iterator<Item = &'a str>) -> Vec<Pair> {
        words
            .map(|w| Pair {
                display: w.to_string(),
                replacement: w.to_string(),
            })
            .collect()
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let words: Vec<&str> = line.split_whitespace().collect();
        let start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);

        match (words.as_slice(), line.ends_with(' ')) {
            ([], _) => Ok((0, Self::pairs(self.commands.iter().map(|(c, _)| *c)))),
            ([prefix], false) => Ok((
                start,
                Self::pairs(self.commands.iter().map(|(c, _)| *c).filter(|c| c.starts_with(prefix))),
            )),
            ([cmd], true) | ([cmd, _], false) => {
                let typed = if line.ends_with(' ') { "" } else { words[1] };
                let args = self
                    .commands
                    .iter()
                    .find(|(c, _)| c == cmd)
                    .map(|(_, args)| args.as_slice())
                    .unwrap_or_default();
                Ok((
                    start,
                    Self::pairs(args.iter().map(String::as_str).filter(|a| a.starts_with(typed))),
                ))
            }
            _ => Ok((pos, vec![])),
        }
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}
impl Helper for ShellCompleter {}

/// What to print once a command has settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Catalog,
    Versions,
    Results,
    Status,
    Nothing,
}

/// Translate one shell line into a controller event.
/// `Ok(None)` is a built-in that needs no event.
fn parse_command(line: &str) -> Result<Option<(UiEvent, Region)>, String> {
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };
    let number = |what: &str| -> Result<usize, String> {
        rest.parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| format!("{} expects a number starting at 1", what))
    };
    let page = |what: &str| -> Result<u32, String> {
        rest.parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| format!("{} expects a page number from 1 to {}", what, u32::MAX))
    };

    let parsed = match cmd {
        "show" => return Ok(None),
        "filter" => (UiEvent::FilterInput(rest.to_string()), Region::Catalog),
        "console" => {
            let console = if rest.eq_ignore_ascii_case("all") { "" } else { rest };
            (UiEvent::ConsoleSelected(console.to_string()), Region::Catalog)
        }
        "page" => (UiEvent::PageClicked(page("page")?), Region::Catalog),
        "size" => (UiEvent::PageSizeSelected(page("size")?), Region::Catalog),
        "open" => (UiEvent::RowActivated(number("open")? - 1), Region::Versions),
        "vpage" => (UiEvent::VersionsPageClicked(page("vpage")?), Region::Versions),
        "pick" => (UiEvent::VersionPicked(number("pick")? - 1), Region::Status),
        "close" if rest.is_empty() => (UiEvent::KeyPressed(Key::Escape), Region::Nothing),
        "close" => match ModalId::from_dom_id(rest) {
            Some(id) => (UiEvent::CloseModal(id), Region::Nothing),
            None => return Err(format!("Unknown modal: {}", rest)),
        },
        "mode" => match rest {
            "name" => (UiEvent::SearchModeSelected(SearchMode::Name), Region::Nothing),
            "hash" => (UiEvent::SearchModeSelected(SearchMode::Hash), Region::Nothing),
            _ => return Err("mode expects 'name' or 'hash'".to_string()),
        },
        "find" => (UiEvent::NameInput(rest.to_string()), Region::Results),
        "select" => (UiEvent::ResultPicked(number("select")? - 1), Region::Status),
        "hash" => (UiEvent::HashSubmitted(rest.to_string()), Region::Status),
        _ => return Err(format!("Unknown command: {} (type 'help')", cmd)),
    };
    Ok(Some(parsed))
}

/// Poll until no request or debounce is outstanding, performing side effects
async fn settle(ctl: &mut Controller<CatalogClient>) {
    loop {
        ctl.poll(Instant::now());
        for event in ctl.take_events() {
            perform(event);
        }
        if !ctl.is_busy() && ctl.next_wakeup().is_none() {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn perform(event: StateEvent) {
    match event {
        StateEvent::Navigate(url) | StateEvent::OpenUrl(url) => {
            println!("Opening {}", url);
            if let Err(e) = open::that(&url) {
                tracing::error!("Failed to open {}: {}", url, e);
            }
        }
        StateEvent::ScrollToTop => {}
    }
}

fn print_region(ctl: &Controller<CatalogClient>, region: Region) {
    let msgs = ctl.messages();
    match region {
        Region::Catalog => match &ctl.catalog.view {
            ListView::Rows { summary, rows, pagination } => {
                println!("{}\n", summary);
                for (i, row) in rows.iter().enumerate() {
                    println!("{:>3}. {} ({}) - {} {}", i + 1, row.name, row.consoles, row.versions, msgs.versions);
                }
                println!("\n{}", pagination.label(msgs));
            }
            ListView::Empty { summary } => println!("{}\n{}", summary, msgs.no_results),
            ListView::Failed { message } => println!("{}", message),
            ListView::Idle | ListView::Loading => {}
        },
        Region::Versions => {
            if !ctl.modals.is_open(ModalId::Versions) {
                print_region(ctl, Region::Status);
                return;
            }
            let Some(view) = ctl.versions.view() else {
                return;
            };
            println!("{}", view.heading(msgs));
            match &view.body {
                VersionsBody::Loading => println!("{}", msgs.loading_versions),
                VersionsBody::Error(message) => println!("{}", message),
                VersionsBody::Cards { cards, pagination } => {
                    for card in cards {
                        let marker = if card.recommended { "*" } else { " " };
                        println!("{} {:>3}. {}", marker, card.index + 1, card.title);
                    }
                    println!("\n{}", pagination.label(msgs));
                }
            }
        }
        Region::Results => match &ctl.search.results {
            ResultsView::Cards(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    println!("{:>3}. {} [{}]", i + 1, card.name, msgs.versions_badge(card.total_versions));
                }
            }
            ResultsView::NoResults => println!("{}", msgs.no_results),
            ResultsView::Error => println!("{}", msgs.search_error),
            ResultsView::Hidden => {}
        },
        Region::Status => {
            if ctl.download.status.is_visible() {
                println!("{}", ctl.download.status.message);
            }
        }
        Region::Nothing => {}
    }
}

fn print_help() {
    println!(
        r#"Retro Downloader Interactive Shell

Catalog:
  show                     Show the current catalog page
  filter <text>            Filter games by name
  console <name|all>       Restrict to one console
  page <n>                 Go to a catalog page
  size <n>                 Rows per page
  open <n>                 Show the versions of row n

Versions:
  vpage <n>                Go to a page of the version list
  pick <n>                 Download version n
  close [modal]            Close every modal, or only the named one

Search:
  mode <name|hash>         Switch search mode
  find <name>              Search games by name
  select <n>               Take search result n
  hash <hash>              Download by content hash

  help                     Show this help
  exit, quit               Exit the shell
"#
    );
}

/// Get the history file path
fn history_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "retro-downloader", "RetroDownloader")
        .map(|dirs| dirs.data_dir().join("shell_history"))
}

/// Run the interactive shell
pub async fn run(config: &Config) -> Result<()> {
    println!("Retro Downloader Interactive Shell v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let mut ctl = Controller::new(client(config)?, ControllerOptions::from_config(config));
    ctl.start();
    settle(&mut ctl).await;
    print_region(&ctl, Region::Catalog);

    let rl_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(ShellCompleter::new(&config.catalog.consoles)));

    if let Some(path) = history_path() {
        let _ = rl.load_history(&path);
    }

    loop {
        match rl.readline("retro> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match line {
                    "help" => {
                        print_help();
                        continue;
                    }
                    "exit" | "quit" => break,
                    _ => {}
                }

                match parse_command(line) {
                    Ok(Some((event, region))) => {
                        ctl.handle(event, Instant::now());
                        settle(&mut ctl).await;
                        print_region(&ctl, region);
                    }
                    Ok(None) => print_region(&ctl, Region::Catalog),
                    Err(message) => eprintln!("{}", message),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(path) = history_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&path);
    }

    Ok(())
}
