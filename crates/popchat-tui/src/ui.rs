//! Rendering functions for the popup.
//!
//! When open, the popup is a bordered box at the geometry controller's
//! bounds:
//!
//! 1. **Header** (1 line) -- title and hints; drag it to move the popup.
//! 2. **Messages** (fills remaining space) -- scrollable transcript.
//! 3. **Form** (2 lines) -- username and password while logging in,
//!    otherwise the message input.
//!
//! The border doubles as the resize area.  When closed, only the launcher
//! is drawn.

use popchat_client::{Bounds, FocusTarget, Sender};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{InputField, LAUNCHER_LABEL, TuiApp};
use crate::plain::message_text;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame, app: &TuiApp) {
    if !app.is_open() {
        draw_launcher(frame, app);
        return;
    }

    let Some(area) = clip(app.popup_bounds(), frame.area()) else {
        return;
    };

    let captured = app.is_pointer_captured();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if captured {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Cyan)
        });
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(1),    // messages
            Constraint::Length(2), // form
        ])
        .split(inner);

    draw_header(frame, app, chunks[0]);
    draw_messages(frame, app, chunks[1]);
    if app.controller().view().login_visible {
        draw_login(frame, app, chunks[2]);
    } else {
        draw_input(frame, app, chunks[2]);
    }
}

/// Convert popup bounds to a terminal rect clipped to `screen`.
pub fn clip(bounds: Bounds, screen: Rect) -> Option<Rect> {
    let left = bounds.left.max(i32::from(screen.x));
    let top = bounds.top.max(i32::from(screen.y));
    let right = (bounds.left + bounds.width).min(i32::from(screen.x) + i32::from(screen.width));
    let bottom = (bounds.top + bounds.height).min(i32::from(screen.y) + i32::from(screen.height));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        u16::try_from(left).ok()?,
        u16::try_from(top).ok()?,
        u16::try_from(right - left).ok()?,
        u16::try_from(bottom - top).ok()?,
    ))
}

// ---------------------------------------------------------------------------
// Launcher
// ---------------------------------------------------------------------------

fn draw_launcher(frame: &mut Frame, app: &TuiApp) {
    let Some(area) = clip(app.launcher_bounds(), frame.area()) else {
        return;
    };
    let launcher = Paragraph::new(LAUNCHER_LABEL).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(launcher, area);
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

fn draw_header(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let status = if app.controller().transcript().is_typing() {
        Span::styled(" typing... ", Style::default().fg(Color::Yellow))
    } else if app.controller().session().is_logged_in() {
        Span::styled(" online ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" signed out ", Style::default().fg(Color::DarkGray))
    };

    let header = Line::from(vec![
        Span::styled(
            " Banking Assistant ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("|"),
        status,
        Span::raw("| Ctrl+O hide, Esc quit "),
    ]);

    let header_widget = Paragraph::new(header).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header_widget, area);
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

fn sender_style(sender: Sender) -> (&'static str, Style) {
    match sender {
        Sender::User => ("[You] ", Style::default().fg(Color::Cyan)),
        Sender::Bot => ("[Bot] ", Style::default().fg(Color::Green)),
        Sender::System => (
            "[System] ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::DIM),
        ),
    }
}

fn draw_messages(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let mut lines: Vec<Line<'_>> = Vec::new();
    let transcript = app.controller().transcript();

    for message in transcript.messages() {
        let (prefix, style) = sender_style(message.sender);
        let width = usize::from(area.width).saturating_sub(prefix.len());
        let text = message_text(message, width);

        for (i, content_line) in text.split('\n').enumerate() {
            let lead = if i == 0 {
                Span::styled(prefix, style.add_modifier(Modifier::BOLD))
            } else {
                // Continuation lines get indentation matching the prefix width.
                Span::raw(" ".repeat(prefix.len()))
            };
            lines.push(Line::from(vec![
                lead,
                Span::styled(content_line.to_owned(), style),
            ]));
        }

        lines.push(Line::from(""));
    }

    if transcript.is_typing() {
        lines.push(Line::from(vec![Span::styled(
            "  ...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]));
    }

    // Show the bottom of the conversation by default, with the ability to
    // scroll up.  Scroll is counted in rows after wrapping.
    let messages_widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total_rows = u16::try_from(messages_widget.line_count(area.width)).unwrap_or(u16::MAX);
    let max_scroll = total_rows.saturating_sub(area.height);
    let effective_scroll = max_scroll.saturating_sub(app.scroll_offset());

    frame.render_widget(messages_widget.scroll((effective_scroll, 0)), area);
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(label, label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn draw_login(frame: &mut Frame, app: &TuiApp, area: Rect) {
    const USER: &str = "Username: ";
    const PASS: &str = "Password: ";

    let focus = app.controller().view().focus;
    let masked = "*".repeat(app.password().char_count());
    let form = Paragraph::new(vec![
        field_line(
            USER,
            app.username().text().to_owned(),
            focus == FocusTarget::Username,
        ),
        field_line(PASS, masked, focus == FocusTarget::Password),
    ]);
    frame.render_widget(form, area);

    let (field, row, label) = match focus {
        FocusTarget::Password => (app.password(), 1, PASS),
        _ => (app.username(), 0, USER),
    };
    set_cursor(frame, area, row, label.len(), field);
}

fn draw_input(frame: &mut Frame, app: &TuiApp, area: Rect) {
    const PROMPT: &str = "> ";

    let input = Paragraph::new(vec![
        Line::from(Span::styled(
            "─".repeat(usize::from(area.width)),
            Style::default().fg(Color::DarkGray),
        )),
        field_line(PROMPT, app.message().text().to_owned(), true),
    ]);
    frame.render_widget(input, area);
    set_cursor(frame, area, 1, PROMPT.len(), app.message());
}

fn set_cursor(frame: &mut Frame, area: Rect, row: u16, indent: usize, field: &InputField) {
    let offset = u16::try_from(indent + field.cursor()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(offset)
        .min(area.right().saturating_sub(1));
    frame.set_cursor_position(Position::new(x, area.y + row));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
