use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use extractor_core::{update, AppState, AppViewModel, Effect, Msg, RunConfiguration, RunState};
use extractor_logging::{extractor_debug, extractor_info};

use crate::commands::{apply_setting, parse_command, Command, HELP};
use crate::effects::EffectRunner;
use crate::render;

const TICK_INTERVAL: Duration = Duration::from_millis(75);

enum Input {
    Line(String),
    Tick,
    Closed,
}

pub fn run_app(config: RunConfiguration, runner: EffectRunner) -> anyhow::Result<()> {
    let (input_tx, input_rx) = mpsc::channel::<Input>();

    let stdin_tx = input_tx.clone();
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if stdin_tx.send(Input::Line(line)).is_err() {
                    return;
                }
            }
            let _ = stdin_tx.send(Input::Closed);
        })
        .context("spawning stdin reader")?;

    // Background tick to poll engine events and coalesce rendering.
    thread::Builder::new()
        .name("ticker".to_string())
        .spawn(move || {
            while input_tx.send(Input::Tick).is_ok() {
                thread::sleep(TICK_INTERVAL);
            }
        })
        .context("spawning ticker")?;

    let mut app = App::new(config, runner);
    println!("{HELP}");

    while let Ok(input) = input_rx.recv() {
        match input {
            Input::Line(line) => {
                if !app.handle_line(&line) {
                    break;
                }
            }
            Input::Tick => {
                let events = app.runner.drain_events();
                app.dispatch_all(events);
            }
            Input::Closed => break,
        }
    }

    app.shutdown();
    Ok(())
}

struct App {
    state: AppState,
    shown: AppViewModel,
    runner: EffectRunner,
}

impl App {
    fn new(config: RunConfiguration, runner: EffectRunner) -> Self {
        let mut state = AppState::with_config(config);
        state.consume_dirty();
        let shown = state.view();
        Self {
            state,
            shown,
            runner,
        }
    }

    /// Returns false once the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                println!("error: {err}");
                return true;
            }
        };
        extractor_debug!("command {:?}", command);

        match command {
            Command::Send(msg) => self.dispatch_all(vec![msg]),
            Command::Set { key, value } => match apply_setting(self.state.config(), &key, &value) {
                Ok(config) => self.dispatch_all(vec![Msg::ConfigChanged(config)]),
                Err(err) => println!("error: {err}"),
            },
            Command::List => {
                if self.state.items().next().is_none() {
                    println!("Queue is empty");
                }
                for item in self.state.items() {
                    for line in render::format_item(item) {
                        println!("{line}");
                    }
                }
            }
            Command::Stats => println!("{}", render::format_stats(&self.state.stats())),
            Command::ShowConfig => {
                for line in render::format_config(self.state.config()) {
                    println!("{line}");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
            Command::Empty => {}
        }
        true
    }

    fn dispatch_all(&mut self, msgs: Vec<Msg>) {
        let mut inbox: VecDeque<Msg> = msgs.into();
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            inbox.extend(self.runner.run(effects));
        }

        if self.state.consume_dirty() {
            let view = self.state.view();
            for line in render::render_changes(&self.shown, &view) {
                println!("{line}");
            }
            self.shown = view;
        }
    }

    fn shutdown(&mut self) {
        if let RunState::Running { run_id, .. } = self.state.run_state() {
            extractor_info!("stopping run {} on exit", run_id);
            self.runner.run(vec![Effect::StopRun { run_id }]);
        }
        extractor_info!("{}", render::format_stats(&self.state.stats()));
    }
}
