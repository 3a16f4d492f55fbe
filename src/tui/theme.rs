use ratatui::style::{Color, Modifier, Style};

use crate::app::Theme;

const INDIGO: Color = Color::Rgb(79, 70, 229);
const INDIGO_LIGHT: Color = Color::Rgb(129, 140, 248);

/// Colours for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub user_bubble: Style,
    pub bot_label: Style,
    pub heading: Style,
    pub quote: Style,
    pub link: Style,
    pub code_block: Style,
    pub inline_code: Style,
    pub online: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::Rgb(249, 250, 251),
                surface: Color::White,
                text: Color::Rgb(17, 24, 39),
                muted: Color::Rgb(107, 114, 128),
                border: Color::Rgb(229, 231, 235),
                accent: INDIGO,
                user_bubble: Style::default().bg(INDIGO).fg(Color::White),
                bot_label: Style::default()
                    .fg(Color::Rgb(55, 65, 81))
                    .add_modifier(Modifier::BOLD),
                heading: Style::default().fg(INDIGO).add_modifier(Modifier::BOLD),
                quote: Style::default()
                    .fg(Color::Rgb(75, 85, 99))
                    .add_modifier(Modifier::ITALIC),
                link: Style::default().fg(INDIGO).add_modifier(Modifier::UNDERLINED),
                code_block: Style::default()
                    .bg(Color::Rgb(243, 244, 246))
                    .fg(Color::Rgb(31, 41, 55)),
                inline_code: Style::default()
                    .bg(Color::Rgb(229, 231, 235))
                    .fg(Color::Rgb(190, 24, 93)),
                online: Color::Rgb(34, 197, 94),
            },
            Theme::Dark => Self {
                background: Color::Rgb(17, 24, 39),
                surface: Color::Rgb(31, 41, 55),
                text: Color::Rgb(243, 244, 246),
                muted: Color::Rgb(156, 163, 175),
                border: Color::Rgb(55, 65, 81),
                accent: INDIGO_LIGHT,
                user_bubble: Style::default().bg(INDIGO).fg(Color::White),
                bot_label: Style::default()
                    .fg(Color::Rgb(209, 213, 219))
                    .add_modifier(Modifier::BOLD),
                heading: Style::default().fg(INDIGO_LIGHT).add_modifier(Modifier::BOLD),
                quote: Style::default()
                    .fg(Color::Rgb(156, 163, 175))
                    .add_modifier(Modifier::ITALIC),
                link: Style::default()
                    .fg(INDIGO_LIGHT)
                    .add_modifier(Modifier::UNDERLINED),
                code_block: Style::default()
                    .bg(Color::Rgb(17, 24, 39))
                    .fg(Color::Rgb(229, 231, 235)),
                inline_code: Style::default()
                    .bg(Color::Rgb(55, 65, 81))
                    .fg(Color::Rgb(249, 168, 212)),
                online: Color::Rgb(34, 197, 94),
            },
        }
    }

    /// Base style for bot prose
    pub fn body(&self) -> Style {
        Style::default().fg(self.text)
    }
}
