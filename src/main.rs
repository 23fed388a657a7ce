mod ui;

use benkyo::{
    error::Error,
    history::{CsvHistoryStore, HistoryStore},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{Durations, Session},
    timer::{RemainingTime, Tick, Timer},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 1000;

/// focused study timer tui with a task checklist and session history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A study-focused countdown timer with a per-session task checklist. Completed focus intervals are logged to a CSV history that is shown on the next launch."
)]
pub struct Cli {
    /// focus interval length in minutes
    #[clap(short = 'f', long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=120))]
    focus_minutes: u32,

    /// break interval length in minutes
    #[clap(short = 'b', long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=30))]
    break_minutes: u32,

    /// override the session history file location
    #[clap(long)]
    history_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    EnteringTask,
}

/// Transient message shown until the next start/reset.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    BreakTime,
    Saved,
    SaveFailed(String),
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub timer: Timer,
    pub store: CsvHistoryStore,
    pub mode: Mode,
    pub task_input: String,
    pub selected: usize,
    pub remaining: Option<RemainingTime>,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self, Error> {
        let store = cli
            .history_file
            .as_ref()
            .map(CsvHistoryStore::with_path)
            .unwrap_or_default();
        let log = store.load()?;
        let durations = Durations::new(cli.focus_minutes, cli.break_minutes);

        Ok(Self {
            session: Session::new(durations, log),
            timer: Timer::new(),
            store,
            mode: Mode::Normal,
            task_input: String::new(),
            selected: 0,
            remaining: None,
            notice: None,
        })
    }

    /// One countdown re-evaluation, driven by the runner's tick cadence.
    pub fn on_tick(&mut self) {
        match self.timer.tick(self.session.durations.focus_secs()) {
            Tick::Remaining(remaining) => self.remaining = Some(remaining),
            Tick::Expired => {
                self.remaining = None;
                self.notice = Some(Notice::BreakTime);
            }
            Tick::Idle => {}
        }
    }

    fn start_timer(&mut self) {
        self.timer.start();
        self.notice = None;
        self.remaining = Some(RemainingTime::from_secs(self.session.durations.focus_secs()));
    }

    fn reset_timer(&mut self) {
        self.timer.reset();
        self.remaining = None;
        self.notice = None;
    }

    fn save_session(&mut self) {
        let records = self.session.record_session();
        self.notice = match self.store.save(records) {
            Ok(()) => Some(Notice::Saved),
            Err(e) => Some(Notice::SaveFailed(e.to_string())),
        };
    }

    fn complete_selected(&mut self) {
        // The checklist only shows existing tasks, so a valid selection is
        // guaranteed whenever the list is non-empty.
        if !self.session.tasks.is_empty() {
            let _ = self.session.complete_task(self.selected);
        }
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.session.tasks.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.mode {
            Mode::EnteringTask => self.on_task_entry_key(key),
            Mode::Normal => self.on_normal_key(key),
        }
    }

    fn on_task_entry_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Enter => {
                // Empty input is rejected silently by the session store.
                self.session.add_task(&self.task_input.clone());
                self.task_input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.task_input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.task_input.pop();
            }
            KeyCode::Char(c) => {
                self.task_input.push(c);
            }
            _ => {}
        }
        Flow::Continue
    }

    fn on_normal_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('s') => self.start_timer(),
            KeyCode::Char('r') => self.reset_timer(),
            KeyCode::Char('w') => self.save_session(),
            KeyCode::Char('a') => {
                self.task_input.clear();
                self.mode = Mode::EnteringTask;
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.complete_selected(),
            // Duration changes only apply between countdowns.
            KeyCode::Char('+') | KeyCode::Char('=') if !self.timer.is_running() => {
                self.session.durations.adjust_focus(5)
            }
            KeyCode::Char('-') if !self.timer.is_running() => {
                self.session.durations.adjust_focus(-5)
            }
            KeyCode::Char(']') if !self.timer.is_running() => {
                self.session.durations.adjust_break(1)
            }
            KeyCode::Char('[') if !self.timer.is_running() => {
                self.session.durations.adjust_break(-1)
            }
            _ => {}
        }
        Flow::Continue
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // Load history before touching the terminal so errors print normally.
    let mut app = App::new(&cli)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
