use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{ChatState, Theme};
use crate::transcript::{Message, Role};
use crate::tui::{
    app::{ChatApp, InputMode},
    markdown::render_markdown,
    theme::Palette,
    wrap::{wrap_line, wrap_lines},
};

const LEFT_PANEL_WIDTH: u16 = 26;
const RIGHT_PANEL_WIDTH: u16 = 28;
const TYPING_TEXT: &str = "Bot is typing...";
const PLACEHOLDER: &str = "Type your message...";
const NAV_ITEMS: [&str; 3] = ["Dashboard", "Chats", "Settings"];
const ACTIVITY: [&str; 3] = ["Updated settings", "Chat with users", "Cleared logs"];

/// Render the whole chat screen
pub fn render_ui(f: &mut Frame, app: &ChatApp) {
    let state = app.state();
    let palette = Palette::for_theme(state.theme());
    let area = f.size();

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let mut constraints = Vec::with_capacity(3);
    if state.left_panel_visible() {
        constraints.push(Constraint::Length(LEFT_PANEL_WIDTH));
    }
    constraints.push(Constraint::Min(30));
    if state.right_panel_visible() {
        constraints.push(Constraint::Length(RIGHT_PANEL_WIDTH));
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let mut column = 0;
    if state.left_panel_visible() {
        render_navigation(f, state, &palette, columns[column]);
        column += 1;
    }
    render_chat(f, app, &palette, columns[column]);
    column += 1;
    if state.right_panel_visible() {
        render_profile(f, &palette, columns[column]);
    }
}

fn panel_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(palette.surface).fg(palette.text))
}

fn key_hint(key: &str, label: String, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {} ", key),
            Style::default().bg(palette.accent).fg(palette.surface),
        ),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(palette.muted)),
    ])
}

fn render_navigation(f: &mut Frame, state: &ChatState, palette: &Palette, area: Rect) {
    let block = panel_block("Navigation", palette);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);

    let mut items = vec![Line::from("")];
    for label in NAV_ITEMS {
        items.push(Line::from(vec![
            Span::styled("  ◆ ", Style::default().fg(palette.accent)),
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        ]));
        items.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(items), rows[0]);

    let theme_label = match state.theme() {
        Theme::Light => "Toggle Dark Mode",
        Theme::Dark => "Toggle Light Mode",
    };
    let footer = vec![
        key_hint("t", theme_label.to_string(), palette),
        key_hint("[", "Hide Panel".to_string(), palette),
    ];
    f.render_widget(Paragraph::new(footer), rows[1]);
}

fn render_profile(f: &mut Frame, palette: &Palette, area: Rect) {
    let block = panel_block("Profile", palette);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(" Name: ", label), Span::raw("Admin")]),
        Line::from(vec![
            Span::styled(" Status: ", label),
            Span::styled("Online ●", Style::default().fg(palette.online)),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Activity:", label)),
    ];
    for activity in ACTIVITY {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(palette.accent)),
            Span::styled(activity, Style::default().fg(palette.muted)),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[0]);

    f.render_widget(
        Paragraph::new(key_hint("]", "Hide Panel".to_string(), palette)),
        rows[1],
    );
}

fn render_chat(f: &mut Frame, app: &ChatApp, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(3),    // Conversation
            Constraint::Length(3), // Input box
        ])
        .split(area);

    render_status_bar(f, app, palette, chunks[0]);
    render_conversation(f, app.state(), palette, chunks[1]);
    render_input_box(f, app, palette, chunks[2]);
}

fn render_status_bar(f: &mut Frame, app: &ChatApp, palette: &Palette, area: Rect) {
    let state = app.state();
    let mode = match app.mode() {
        InputMode::Editing => "EDITING",
        InputMode::Normal => "NORMAL",
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default()
                .bg(palette.accent)
                .fg(palette.surface)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Model: ", Style::default().fg(palette.muted)),
        Span::styled(
            format!("{} / {}", app.provider_name(), app.model_name()),
            Style::default().fg(palette.text),
        ),
    ];

    let hints = match app.mode() {
        InputMode::Editing => "  Enter send · Ctrl+L clear · Ctrl+T theme · Esc more",
        InputMode::Normal => "  s send · c clear · t theme · [ ] panels · e edit · q quit",
    };
    spans.push(Span::styled(hints, Style::default().fg(palette.muted)));

    if !state.left_panel_visible() || !state.right_panel_visible() {
        spans.push(Span::styled(
            "  (hidden panels: [ or ])",
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).block(panel_block("chatpane", palette));
    f.render_widget(status, area);
}

fn render_conversation(f: &mut Frame, state: &ChatState, palette: &Palette, area: Rect) {
    let block = panel_block("Conversation", palette);
    let inner = block.inner(area);

    let lines = conversation_lines(state, palette, inner.width);
    let offset = scroll_offset(lines.len(), inner.height);

    // Rows are already wrapped to the pane, so the count above is exact
    let conversation = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((offset, 0));
    f.render_widget(conversation, area);
}

/// Rows for every message bubble plus the typing indicator, wrapped to `width`
pub(crate) fn conversation_lines(
    state: &ChatState,
    palette: &Palette,
    width: u16,
) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let transcript = state.transcript();
    let mut lines = Vec::new();

    if transcript.messages().is_empty() && !transcript.is_pending() {
        lines.push(
            Line::from(Span::styled(
                "Say hello to start the conversation.",
                Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center),
        );
        return wrap_lines(lines, width);
    }

    for message in transcript.messages() {
        match message.role() {
            Role::User => push_user_bubble(&mut lines, message, palette),
            Role::Bot => push_bot_bubble(&mut lines, message, palette, width),
        }
        lines.push(Line::default());
    }

    if transcript.is_pending() {
        lines.push(Line::from(Span::styled(
            TYPING_TEXT,
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        )));
    }

    wrap_lines(lines, width)
}

fn timestamp(message: &Message) -> String {
    message.created_at().format("%H:%M").to_string()
}

// User text is shown literally, never as markdown
fn push_user_bubble(lines: &mut Vec<Line<'static>>, message: &Message, palette: &Palette) {
    lines.push(
        Line::from(vec![
            Span::styled(timestamp(message), Style::default().fg(palette.muted)),
            Span::raw(" "),
            Span::styled(
                "You",
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
        ])
        .alignment(Alignment::Right),
    );

    for text in message.text().split('\n') {
        lines.push(
            Line::from(Span::styled(format!(" {} ", text), palette.user_bubble))
                .alignment(Alignment::Right),
        );
    }
}

fn push_bot_bubble(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    palette: &Palette,
    width: usize,
) {
    lines.push(Line::from(vec![
        Span::styled("Bot", palette.bot_label),
        Span::raw(" "),
        Span::styled(timestamp(message), Style::default().fg(palette.muted)),
    ]));

    // Wrap inside the gutter so continuation rows keep it
    let gutter = Style::default().fg(palette.accent);
    let body_width = width.saturating_sub(2);
    for line in render_markdown(message.text(), palette) {
        for row in wrap_line(line, body_width) {
            let mut spans = vec![Span::styled("│ ", gutter)];
            spans.extend(row.spans);
            lines.push(Line::from(spans));
        }
    }
}

/// Rows to skip so the newest content stays visible
pub(crate) fn scroll_offset(rows: usize, height: u16) -> u16 {
    let overflow = rows.saturating_sub(usize::from(height));
    u16::try_from(overflow).unwrap_or(u16::MAX)
}

fn render_input_box(f: &mut Frame, app: &ChatApp, palette: &Palette, area: Rect) {
    let input = app.state().transcript().input();
    let editing = app.mode() == InputMode::Editing;

    let border = if editing { palette.accent } else { palette.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(" Message ")
        .style(Style::default().bg(palette.surface).fg(palette.text));
    let inner = block.inner(area);

    let input_width = Line::from(input).width();
    // Keep the end of long input in view
    let visible = usize::from(inner.width.saturating_sub(1));
    let horizontal = u16::try_from(input_width.saturating_sub(visible)).unwrap_or(u16::MAX);

    let paragraph = if input.is_empty() {
        Paragraph::new(Span::styled(
            PLACEHOLDER,
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Paragraph::new(input).scroll((0, horizontal))
    };
    f.render_widget(paragraph.block(block), area);

    if editing {
        let column = u16::try_from(input_width.min(visible)).unwrap_or(0);
        f.set_cursor(inner.x + column, inner.y);
    }
}
