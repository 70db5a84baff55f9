use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mabiao_engine::{MemoryTable, TableQuery, WordQueryOptions};
use mabiao_im::{
    EngineAction, KeyEvent, Keysym, Settings, TableEngine,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// mabiao table input method — interactive shell and table tools.
#[derive(Parser, Debug)]
#[command(name = "mabiao")]
#[command(about = "mabiao table input method — interactive shell and table tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the engine interactively against a table file.
    ///
    /// Typed characters are fed to the engine one key at a time; committed
    /// text accumulates at the top of the display. Line commands:
    /// `:enter`, `:esc`, `:bs`, `:code <char>`, `:reset`, `:q`.
    Run {
        /// Table file to load
        table: PathBuf,

        /// Configuration file (defaults to the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Look up a key sequence in a table and print the candidates.
    Lookup {
        /// Table file to load
        table: PathBuf,

        /// Key sequence to look up
        query: String,

        /// Restrict matches to single-character phrases
        #[arg(long)]
        onechar: bool,

        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a table's metadata.
    Meta {
        /// Table file to load
        table: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mabiao=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { table, config } => run(&table, config.as_deref()),
        Commands::Lookup {
            table,
            query,
            onechar,
            json,
        } => lookup(&table, &query, onechar, json),
        Commands::Meta { table } => meta(&table),
    }
}

fn load_table(path: &std::path::Path) -> Result<MemoryTable> {
    MemoryTable::load(path).with_context(|| format!("failed to load table {}", path.display()))
}

fn lookup(table: &std::path::Path, query: &str, onechar: bool, json: bool) -> Result<()> {
    let table = load_table(table)?;
    let meta = table.metadata();
    let options = WordQueryOptions {
        onechar,
        single_wildcard: meta.single_wildcard_char,
        multi_wildcard: meta.multi_wildcard_char,
        auto_wildcard: meta.auto_wildcard,
        ..WordQueryOptions::default()
    };
    let candidates = table.select_words(query, &options);
    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else {
        for candidate in candidates {
            println!(
                "{}\t{}\t{}\t{}",
                candidate.tabkeys, candidate.phrase, candidate.freq, candidate.user_freq
            );
        }
    }
    Ok(())
}

fn meta(table: &std::path::Path) -> Result<()> {
    let table = load_table(table)?;
    let meta = table.metadata();
    println!("name:             {}", meta.name);
    println!("input chars:      {}", meta.valid_input_chars);
    println!("max key length:   {}", meta.max_key_length);
    println!(
        "wildcards:        single={:?} multi={:?}",
        meta.single_wildcard_char, meta.multi_wildcard_char
    );
    println!("pinyin:           {}", meta.supports_pinyin);
    println!(
        "policies:         auto_select={} auto_commit={} auto_wildcard={}",
        meta.auto_select, meta.auto_commit, meta.auto_wildcard
    );
    println!(
        "select keys:      {}",
        meta.select_keys.iter().collect::<String>()
    );
    Ok(())
}

/// The interactive host loop: feeds keys, applies engine actions, and runs
/// the periodic usage-sync tick.
fn run(table: &std::path::Path, config: Option<&std::path::Path>) -> Result<()> {
    let table = load_table(table)?;
    let settings = match config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let mut engine = TableEngine::new(Box::new(table), settings);
    for (key, value) in engine.take_pending_config_writes() {
        tracing::info!(key = key.as_str(), ?value, "corrected configuration value");
    }

    let mut committed = String::new();
    let mut host = HostState::default();
    let stdin = std::io::stdin();
    let mut last_tick = Instant::now();

    println!("mabiao interactive shell — :q quits, :enter/:esc/:bs send keys");
    print_state(&committed, &host);

    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            ":q" | ":quit" => break,
            ":reset" => {
                host.apply(engine.reset(), &mut committed);
            }
            ":enter" => host.apply(engine.process_key(&KeyEvent::press(Keysym::RETURN)), &mut committed),
            ":esc" => host.apply(engine.process_key(&KeyEvent::press(Keysym::ESCAPE)), &mut committed),
            ":bs" => host.apply(engine.process_key(&KeyEvent::press(Keysym::BACKSPACE)), &mut committed),
            command if command.starts_with(":code ") => {
                for ch in command.trim_start_matches(":code ").chars() {
                    let codes = engine.editor().database().find_zi_code(ch);
                    if codes.is_empty() {
                        println!("{}: no code in this table", ch);
                    } else {
                        println!("{}: {}", ch, codes.join(", "));
                    }
                }
                continue;
            }
            text => {
                for ch in text.chars() {
                    let result = engine.process_key(&KeyEvent::press(Keysym(ch as u32)));
                    if !result.consumed {
                        // Passed through untouched: the "application"
                        // receives the raw character.
                        committed.push(ch);
                    }
                    host.apply(result, &mut committed);
                }
            }
        }

        // The 1 s flush timer of a real host, driven from the loop here.
        if last_tick.elapsed() >= Duration::from_secs(1) {
            engine.tick();
            last_tick = Instant::now();
        }
        print_state(&committed, &host);
    }

    host.apply(engine.reset(), &mut committed);
    println!("committed: {}", committed);
    Ok(())
}

/// Display state mirrored from engine actions.
#[derive(Default)]
struct HostState {
    preedit: String,
    caret: usize,
    aux: Option<String>,
    lookup: Option<String>,
}

impl HostState {
    fn apply(&mut self, result: mabiao_im::EngineResult, committed: &mut String) {
        for action in result.actions {
            match action {
                EngineAction::Commit(text) => committed.push_str(&text),
                EngineAction::UpdatePreedit(preedit) => {
                    self.preedit = preedit.text().to_string();
                    self.caret = preedit.caret();
                }
                EngineAction::UpdateAuxText(text) => self.aux = Some(text),
                EngineAction::HideAuxText => self.aux = None,
                EngineAction::ShowLookupTable(view) => {
                    let separator = match view.orientation {
                        mabiao_engine::Orientation::Horizontal => "  ",
                        mabiao_engine::Orientation::Vertical => "\n  ",
                    };
                    let rows: Vec<String> = view
                        .entries
                        .iter()
                        .enumerate()
                        .map(|(i, (label, candidate))| {
                            let marker = if i == view.cursor { ">" } else { " " };
                            format!("{}{}. {}", marker, label, candidate.phrase)
                        })
                        .collect();
                    self.lookup = Some(format!("page {}:{}{}",
                        view.page + 1,
                        separator,
                        rows.join(separator)
                    ));
                }
                EngineAction::HideLookupTable => self.lookup = None,
                EngineAction::WriteConfig(key, value) => {
                    tracing::info!(key = key.as_str(), ?value, "configuration updated");
                }
            }
        }
    }
}

fn print_state(committed: &str, host: &HostState) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "text:    {}", committed);
    let _ = writeln!(out, "preedit: {} (caret {})", host.preedit, host.caret);
    if let Some(aux) = &host.aux {
        let _ = writeln!(out, "aux:     {}", aux);
    }
    if let Some(lookup) = &host.lookup {
        let _ = writeln!(out, "lookup:  {}", lookup);
    }
    let _ = out.flush();
}
