use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use analyzer_core::{update, AppState, Effect, Msg};
use analyzer_logging::{analyzer_debug, analyzer_info};
use anyhow::Context;

use super::cli::Cli;
use super::effects::EffectRunner;
use super::ui::input::{Command, ConsoleParser, HELP};
use super::{logging, settings, ui};

/// Everything the UI loop reacts to, from the console thread or the engine pump.
#[derive(Debug)]
pub enum Inbox {
    Msg(Msg),
    Show,
    Help,
    Notice(String),
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(
        cli.log_destination,
        analyzer_logging::parse_level(&cli.log_level),
    );

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let app_settings = settings::load_settings(&cli.settings);
    let config = settings::engine_config(&cli, &app_settings, &cwd);

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(config, inbox_tx.clone()).context("starting engine")?;
    spawn_console_reader(inbox_tx);

    let mut page = Page::new(move |effects| runner.enqueue(effects), io::stdout());
    page.print(&[HELP.to_string(), String::new()])?;
    page.render()?;

    while let Ok(item) = inbox_rx.recv() {
        match item {
            Inbox::Msg(msg) => page.dispatch(msg)?,
            Inbox::Show => page.render()?,
            Inbox::Help => page.print(&[HELP.to_string()])?,
            Inbox::Notice(text) => page.print(&[text])?,
            Inbox::Quit => break,
        }
    }

    analyzer_info!("Analyzer closed");
    Ok(())
}

/// Owns the page state; applies messages, forwards effects, redraws when dirty.
struct Page<E, W> {
    state: AppState,
    run_effects: E,
    out: W,
}

impl<E, W> Page<E, W>
where
    E: FnMut(Vec<Effect>),
    W: Write,
{
    fn new(run_effects: E, out: W) -> Self {
        Self {
            state: AppState::new(),
            run_effects,
            out,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        analyzer_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if !effects.is_empty() {
            (self.run_effects)(effects);
        }
        if was_dirty {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let lines = ui::render::render(&self.state.view());
        self.print(&lines)
    }

    fn print(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

fn spawn_console_reader(inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        let mut parser = ConsoleParser::new();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let was_pasting = parser.in_paste_mode();
            let item = match parser.feed(&line) {
                Some(Command::Msg(msg)) => Inbox::Msg(msg),
                Some(Command::Show) => Inbox::Show,
                Some(Command::Help) => Inbox::Help,
                Some(Command::Quit) => Inbox::Quit,
                Some(Command::Invalid(message)) => Inbox::Notice(format!("! {message}")),
                None if !was_pasting && parser.in_paste_mode() => Inbox::Notice(
                    "Paste the description; finish with a line containing only '.'".into(),
                ),
                None => continue,
            };
            if inbox.send(item).is_err() {
                return;
            }
        }
        // End of input behaves like `quit`.
        let _ = inbox.send(Inbox::Quit);
    });
}
