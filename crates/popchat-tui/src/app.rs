//! Main TUI application state and input handling.
//!
//! [`TuiApp`] owns the [`ChatController`], the popup geometry and the three
//! text fields.  Backend calls run on spawned tasks that send an
//! [`AppEvent`] back over a [`tokio::sync::mpsc`] channel; the UI loop
//! drains the channel between frames.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use popchat_client::{
    Bounds, ChatBackend, ChatController, ChatReply, ClientError, Credentials, EnterAction, FocusTarget,
    GeometryController, Hit, LoginOutcome, LoginReply, Point, Popup, SendStart, Size,
};

use crate::TuiConfig;
use crate::error::{Result, TuiError};

/// Label of the launcher shown while the popup is closed.
pub const LAUNCHER_LABEL: &str = " 💬 Chat ";
const LAUNCHER_WIDTH: i32 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Events sent from background request tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A login request completed.
    LoginFinished(std::result::Result<LoginReply, ClientError>),
    /// The post-login delay elapsed.
    WelcomeDue,
    /// A chat request completed.
    ChatFinished(std::result::Result<ChatReply, ClientError>),
}

/// Actions the UI loop should take after processing an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Continue the main loop.
    Continue,
    /// Exit the application.
    Quit,
}

/// A single-line text field with a cursor counted in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    text: String,
    cursor: usize,
}

impl InputField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    fn home(&mut self) {
        self.cursor = 0;
    }

    fn end(&mut self) {
        self.cursor = self.char_count();
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

// ---------------------------------------------------------------------------
// TuiApp
// ---------------------------------------------------------------------------

/// The main TUI application state.
pub struct TuiApp {
    controller: ChatController,
    geometry: GeometryController,
    username: InputField,
    password: InputField,
    message: InputField,
    /// Lines scrolled up from the bottom of the transcript.
    scroll_offset: u16,
    /// Terminal size as last reported by the UI loop.
    viewport: Size,
    margin: i32,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl TuiApp {
    pub fn new(controller: ChatController, config: &TuiConfig) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let margin = i32::from(config.margin);
        let popup = Popup::anchored(config.popup_size(), margin);
        Self {
            controller,
            geometry: GeometryController::new(popup, config.min_size()),
            username: InputField::default(),
            password: InputField::default(),
            message: InputField::default(),
            scroll_offset: 0,
            viewport: Size::new(80, 24),
            margin,
            event_rx,
            event_tx,
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    pub fn username(&self) -> &InputField {
        &self.username
    }

    pub fn password(&self) -> &InputField {
        &self.password
    }

    pub fn message(&self) -> &InputField {
        &self.message
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn is_open(&self) -> bool {
        self.controller.view().popup_open
    }

    /// Record the terminal size.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Size::new(i32::from(width), i32::from(height));
    }

    /// Where the popup is drawn.
    pub fn popup_bounds(&self) -> Bounds {
        self.geometry.bounds(self.viewport)
    }

    /// Where the launcher is drawn while the popup is closed.
    pub fn launcher_bounds(&self) -> Bounds {
        Bounds {
            left: self.viewport.width - self.margin - LAUNCHER_WIDTH,
            top: self.viewport.height - self.margin - 1,
            width: LAUNCHER_WIDTH,
            height: 1,
        }
    }

    fn focused_field(&mut self) -> &mut InputField {
        match self.controller.view().focus {
            FocusTarget::Username => &mut self.username,
            FocusTarget::Password => &mut self.password,
            FocusTarget::Message => &mut self.message,
        }
    }

    // -- Key handling -------------------------------------------------------

    /// Handle a key event and return the action the UI should take.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Ctrl+C or Escape always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }
        if key.code == KeyCode::Esc {
            return AppAction::Quit;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('o') {
            self.controller.toggle_popup();
            return AppAction::Continue;
        }
        if !self.is_open() {
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Enter => self.enter(),
            KeyCode::Tab | KeyCode::BackTab if self.controller.view().login_visible => {
                let next = match self.controller.view().focus {
                    FocusTarget::Username => FocusTarget::Password,
                    _ => FocusTarget::Username,
                };
                self.controller.focus(next);
            }
            // Unbound Ctrl chords are not text.
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => self.focused_field().insert(c),
            KeyCode::Backspace => self.focused_field().backspace(),
            KeyCode::Delete => self.focused_field().delete(),
            KeyCode::Left => self.focused_field().left(),
            KeyCode::Right => self.focused_field().right(),
            KeyCode::Home => self.focused_field().home(),
            KeyCode::End => self.focused_field().end(),
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            _ => {}
        }

        AppAction::Continue
    }

    fn enter(&mut self) {
        match self.controller.enter_pressed() {
            EnterAction::FocusMoved => {}
            EnterAction::SubmitLogin => self.spawn_login(),
            EnterAction::Send => self.submit_message(),
        }
    }

    // -- Mouse handling -----------------------------------------------------

    /// Handle a mouse event: launcher clicks, drag, resize and wheel scroll.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> AppAction {
        let p = Point::new(i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.is_open() {
                    let hit = self.geometry.pointer_down(p, self.viewport);
                    tracing::trace!(?hit, x = p.x, y = p.y, "pointer down");
                } else if self.launcher_bounds().contains(p) {
                    self.controller.toggle_popup();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.geometry.pointer_move(p);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.geometry.pointer_up();
            }
            MouseEventKind::ScrollUp if self.is_over_popup(p) => self.scroll_up(3),
            MouseEventKind::ScrollDown if self.is_over_popup(p) => self.scroll_down(3),
            _ => {}
        }
        AppAction::Continue
    }

    fn is_over_popup(&self, p: Point) -> bool {
        self.is_open() && self.geometry.hit_test(p, self.viewport) != Hit::Outside
    }

    /// Whether a drag or resize is in progress.
    pub fn is_pointer_captured(&self) -> bool {
        self.geometry.is_captured()
    }

    // -- Scrolling ----------------------------------------------------------

    fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    // -- Requests -----------------------------------------------------------

    fn spawn_login(&self) {
        let credentials = Credentials::new(self.username.text(), self.password.text());
        let backend = self.controller.backend();
        let tx = self.event_tx.clone();
        tracing::debug!(username = %credentials.username, "login submitted");
        tokio::spawn(async move {
            let result = backend.login(&credentials).await;
            let _ = tx.send(AppEvent::LoginFinished(result));
        });
    }

    fn submit_message(&mut self) {
        match self.controller.begin_send(self.message.text()) {
            SendStart::Ignored => return,
            SendStart::NeedsLogin => {}
            SendStart::Pending(pending) => {
                let backend = self.controller.backend();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = backend.chat(&pending.token, &pending.message).await;
                    let _ = tx.send(AppEvent::ChatFinished(result));
                });
            }
        }
        self.message.clear();
        self.scroll_offset = 0;
    }

    // -- Event polling ------------------------------------------------------

    /// Apply every event that has already arrived.
    ///
    /// Should be called on every iteration of the main UI loop.
    pub fn check_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply_event(event);
        }
    }

    /// Wait for the next event and apply it.
    pub async fn next_event(&mut self) -> Result<()> {
        let event = self.event_rx.recv().await.ok_or(TuiError::ChannelClosed)?;
        self.apply_event(event);
        Ok(())
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoginFinished(result) => {
                if self.controller.finish_login(result) == LoginOutcome::Succeeded {
                    let delay = self.controller.config().welcome_delay();
                    let tx = self.event_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(AppEvent::WelcomeDue);
                    });
                }
            }
            AppEvent::WelcomeDue => self.controller.deliver_welcome(),
            AppEvent::ChatFinished(result) => {
                self.controller.finish_send(result);
            }
        }
        self.scroll_offset = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
