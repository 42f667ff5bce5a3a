mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    time::Duration,
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    execute, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::game::{
    AdversaryScheduler, Difficulty, Direction, EngineExit, GameEngine, GameEvent, GameSettings,
    Snapshot,
};

pub struct App {
    /// Timeout for polling input events in the input thread, a.k.a.
    /// how often to check the stop flag
    user_input_event_poll_timeout: Duration,
    /// Time between two adversary steps
    tick_period: Duration,
    /// Seed applied to every session started from the menu
    seed: Option<u64>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            user_input_event_poll_timeout: Duration::from_millis(100),
            tick_period: AdversaryScheduler::DEFAULT_PERIOD,
            seed: None,
        }
    }
}

impl App {
    pub fn new(tick_period: Duration, seed: Option<u64>) -> Self {
        Self {
            tick_period,
            seed,
            ..Self::default()
        }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop. Starts straight into a game when `initial` is given,
    /// otherwise asks for settings first. Returns when the user quits.
    pub fn run(&self, stdout: &mut Stdout, initial: Option<GameSettings>) -> std::io::Result<()> {
        let mut next_settings = initial;
        loop {
            let settings = match next_settings.take() {
                Some(settings) => settings,
                None => match self.ask_settings(stdout)? {
                    Some(settings) => settings,
                    None => return Ok(()),
                },
            };

            tracing::info!("[app] Starting game with {:?}", settings);
            match self.start_game(stdout, settings)? {
                EngineExit::Menu => {
                    tracing::info!("[app] Back to menu");
                }
                EngineExit::Quit => {
                    tracing::info!("[app] Game was canceled by user, exiting...");
                    return Ok(());
                }
            }
        }
    }

    /// Ask for difficulty, traps and adversaries.
    /// Returns None if user cancels any of the menus with Esc
    fn ask_settings(&self, stdout: &mut Stdout) -> std::io::Result<Option<GameSettings>> {
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            style::SetAttribute(Attribute::Reverse),
            style::PrintStyledContent("Maze Run\r\n".with(Color::Yellow)),
            style::SetAttribute(Attribute::NoReverse),
        )?;

        let Some(difficulty) = App::select_from_menu(
            stdout,
            "Select difficulty (use arrow keys and Enter, or Esc to exit):",
            &Difficulty::ALL,
        )?
        else {
            return Ok(None);
        };
        stdout.execute(style::PrintStyledContent(
            format!("Selected difficulty: {}\r\n", difficulty)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        let Some(traps) = App::select_from_menu(stdout, "Arm traps?", &["No", "Yes"])? else {
            return Ok(None);
        };
        let Some(adversaries) =
            App::select_from_menu(stdout, "Let ghosts roam the maze?", &["Yes", "No"])?
        else {
            return Ok(None);
        };

        Ok(Some(GameSettings {
            difficulty,
            traps_enabled: traps == "Yes",
            adversaries_enabled: adversaries == "Yes",
            seed: self.seed,
        }))
    }

    /// Present a menu of options to the user and let them select one using arrow keys
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user selects an option and presses Enter, where T is the option type
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }

        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;

        let selected_option = loop {
            // Re-render prompt line
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;

            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()?
                && kind == event::KeyEventKind::Press
            {
                match code {
                    KeyCode::Up => {
                        selected = match selected {
                            0 => options.len() - 1,
                            _ => selected - 1,
                        };
                    }
                    KeyCode::Down => {
                        selected = (selected + 1) % options.len();
                    }
                    KeyCode::Enter => break Some(options[selected]),
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };

        execute!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
        )?;

        Ok(selected_option)
    }

    /// Play one session: spawn render and input threads, then run the engine
    /// in this thread until the user quits or asks for the menu.
    fn start_game(
        &self,
        stdout: &mut Stdout,
        settings: GameSettings,
    ) -> std::io::Result<EngineExit> {
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )?;

        let engine = GameEngine::new(settings, self.tick_period);

        // Spawn render thread to draw every snapshot published by the engine
        let (ui_tx, ui_rx) = std::sync::mpsc::channel::<Snapshot>();
        let render_thread_handle =
            std::thread::spawn(move || -> std::io::Result<()> { renderer::render_snapshots(ui_rx) });

        // Flag to let the input thread stop. Enabled by the main thread only.
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_for_input = should_stop.clone();
        let event_tx = engine.sender();
        let poll_timeout = self.user_input_event_poll_timeout;
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            let result = listen_to_user_input(
                &event_tx,
                poll_timeout,
                &should_stop_for_input,
                settings,
            );
            if result.is_err() {
                // Don't leave the engine waiting for input that will never come
                event_tx.send(GameEvent::Quit).ok();
            }
            result
        });

        // Engine owns the session until the user leaves; dropping it closes the UI channel
        let exit = engine.run(ui_tx);
        should_stop.store(true, Ordering::Release);

        tracing::debug!("[app] Waiting for input and render threads to finish...");
        match input_thread_handle.join() {
            Ok(result) => result?,
            Err(_) => tracing::error!("[app] Input thread panicked"),
        }
        match render_thread_handle.join() {
            Ok(result) => result?,
            Err(_) => tracing::error!("[app] Render thread panicked"),
        }

        Ok(exit)
    }
}

/// Map a key press to an engine event. Anything unmapped is ignored.
fn key_to_event(code: KeyCode, settings: GameSettings) -> Option<GameEvent> {
    let event = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => GameEvent::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => {
            GameEvent::Move(Direction::Down)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => {
            GameEvent::Move(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => {
            GameEvent::Move(Direction::Right)
        }
        KeyCode::Char('r') => GameEvent::Regenerate(settings),
        KeyCode::Char('m') => GameEvent::Menu,
        KeyCode::Esc | KeyCode::Char('q') => GameEvent::Quit,
        _ => return None,
    };
    Some(event)
}

/// Listen for key presses and forward them to the engine queue.
/// This function runs in a separate thread, and is the only place where user input is read
fn listen_to_user_input(
    event_tx: &Sender<GameEvent>,
    event_poll_timeout: Duration,
    should_stop: &AtomicBool,
    settings: GameSettings,
) -> std::io::Result<()> {
    loop {
        if should_stop.load(Ordering::Acquire) {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(event_poll_timeout)? {
            continue;
        }

        let game_event = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                match key_to_event(key_event.code, settings) {
                    Some(game_event) => game_event,
                    None => continue,
                }
            }
            _ => continue,
        };

        let should_exit = matches!(game_event, GameEvent::Quit | GameEvent::Menu);

        if event_tx.send(game_event).is_err() {
            // Engine has been dropped, exit the thread
            return Ok(());
        }

        if should_exit {
            tracing::debug!("[input loop] Leaving the game, exiting");
            return Ok(());
        }
    }
}
