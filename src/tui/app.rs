use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::{
    future::{BoxFuture, FutureExt},
    stream::{FuturesUnordered, StreamExt},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, sync::Arc};
use tracing::{debug, info};

use crate::{
    app::ChatState,
    llm::AnswerProvider,
    transcript::PendingReply,
    tui::ui::render_ui,
};

/// Input mode for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Everything a key press can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Backspace,
    Submit,
    Clear,
    ToggleTheme,
    ToggleLeftPanel,
    ToggleRightPanel,
    EnterEditing,
    EnterNormal,
    Quit,
}

/// What the event loop should do after an action
pub enum Flow {
    Continue,
    Ask(PendingReply),
    Quit,
}

/// Map a key press to an action for the given mode
pub fn action_for(mode: InputMode, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('l') => Some(Action::Clear),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('s') => Some(Action::Submit),
            _ => None,
        };
    }

    match mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('e') | KeyCode::Char('i') => Some(Action::EnterEditing),
            KeyCode::Char('s') | KeyCode::Enter => Some(Action::Submit),
            KeyCode::Char('c') => Some(Action::Clear),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('[') => Some(Action::ToggleLeftPanel),
            KeyCode::Char(']') => Some(Action::ToggleRightPanel),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Esc => Some(Action::EnterNormal),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Insert(c)),
            _ => None,
        },
    }
}

/// TUI application state
pub struct ChatApp {
    state: ChatState,
    mode: InputMode,
    provider_name: String,
    model_name: String,
}

impl ChatApp {
    pub fn new(state: ChatState, provider: &dyn AnswerProvider) -> Self {
        Self {
            state,
            mode: InputMode::Editing,
            provider_name: provider.name().to_string(),
            model_name: provider.model().to_string(),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        match action {
            Action::Insert(c) => self.state.transcript_mut().push_char(c),
            Action::Backspace => self.state.transcript_mut().backspace(),
            Action::Submit => {
                if let Some(pending) = self.state.send() {
                    return Flow::Ask(pending);
                }
            }
            Action::Clear => self.state.clear_chat(),
            Action::ToggleTheme => self.state.toggle_theme(),
            Action::ToggleLeftPanel => self.state.toggle_left_panel(),
            Action::ToggleRightPanel => self.state.toggle_right_panel(),
            Action::EnterEditing => self.mode = InputMode::Editing,
            Action::EnterNormal => self.mode = InputMode::Normal,
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Record a finished provider call
    pub fn settle(&mut self, pending: PendingReply, outcome: Result<String>) {
        let id = self.state.transcript_mut().settle(pending, outcome);
        debug!(message = id.get(), "reply recorded");
    }
}

type ReplyFuture = BoxFuture<'static, (PendingReply, Result<String>)>;

/// The provider call for one submission, polled by the event loop
fn ask_later(provider: Arc<dyn AnswerProvider>, pending: PendingReply) -> ReplyFuture {
    async move {
        let outcome = provider.ask(pending.prompt()).await;
        (pending, outcome)
    }
    .boxed()
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// Leaves raw mode and the alternate screen when dropped
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Restore the terminal before the panic message is printed
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Run the TUI application
pub async fn run(state: ChatState, provider: Arc<dyn AnswerProvider>) -> Result<()> {
    install_panic_hook();

    enable_raw_mode().context("Failed to enable raw mode")?;
    let guard = TerminalGuard;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = ChatApp::new(state, provider.as_ref());
    info!("chat screen opened");

    let result = run_app(&mut terminal, &mut app, provider).await;
    drop(guard);

    info!(
        messages = app.state().transcript().messages().len(),
        "chat screen closed"
    );
    result
}

/// Main application loop.
///
/// Key presses and provider replies are both awaited here, on the same
/// task, so the screen keeps responding while a reply is outstanding.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut ChatApp,
    provider: Arc<dyn AnswerProvider>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut in_flight: FuturesUnordered<ReplyFuture> = FuturesUnordered::new();

    loop {
        terminal.draw(|f| render_ui(f, &*app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = action_for(app.mode(), key) {
                        match app.apply(action) {
                            Flow::Continue => {}
                            Flow::Ask(pending) => {
                                info!(message = pending.request_for().get(), "asking reply service");
                                in_flight.push(ask_later(Arc::clone(&provider), pending));
                            }
                            Flow::Quit => return Ok(()),
                        }
                    }
                }
                // Resize and other events only need a redraw
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                None => return Ok(()),
            },
            Some((pending, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                app.settle(pending, outcome);
            }
        }
    }
}
