use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::tui::theme::Palette;

const RULE_WIDTH: usize = 32;

/// Convert markdown into styled lines for the conversation pane.
pub fn render_markdown(text: &str, palette: &Palette) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut writer = MarkdownWriter::new(palette);
    for event in Parser::new_ext(text, options) {
        writer.handle(event);
    }
    writer.finish()
}

struct MarkdownWriter<'p> {
    palette: &'p Palette,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    // Next number for ordered lists, None for bullets
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
}

impl<'p> MarkdownWriter<'p> {
    fn new(palette: &'p Palette) -> Self {
        Self {
            palette,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![palette.body()],
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| self.palette.body())
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn flush_line(&mut self) {
        if self.spans.is_empty() {
            return;
        }

        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled("│ ".repeat(self.quote_depth), self.palette.quote));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// Separate blocks with one empty line, never more
    fn blank_line(&mut self) {
        if self.lines.last().map_or(false, |line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.spans
                    .push(Span::styled(code.to_string(), self.palette.inline_code));
            }
            // Raw HTML is shown as written
            Event::Html(html) => self.text(&html),
            Event::SoftBreak => self.spans.push(Span::styled(" ", self.style())),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    Style::default().fg(self.palette.muted),
                )));
                self.blank_line();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.spans
                    .push(Span::styled(marker, Style::default().fg(self.palette.accent)));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(level, ..) => {
                self.flush_line();
                let mut style = self.palette.heading;
                if level == HeadingLevel::H1 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                self.push_style(style);
            }
            Tag::BlockQuote => {
                self.flush_line();
                self.quote_depth += 1;
                self.push_style(self.palette.quote);
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{}. ", number);
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                if !indent.is_empty() {
                    self.spans.push(Span::raw(indent));
                }
                self.spans
                    .push(Span::styled(marker, Style::default().fg(self.palette.accent)));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link(..) => self.push_style(self.palette.link),
            Tag::Image(..) => {
                self.spans.push(Span::styled(
                    "[image] ",
                    Style::default().fg(self.palette.muted),
                ));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Tag::Heading(..) => {
                self.pop_style();
                self.flush_line();
                self.blank_line();
            }
            Tag::BlockQuote => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pop_style();
                if self.quote_depth == 0 {
                    self.blank_line();
                }
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = false;
                self.blank_line();
            }
            Tag::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Tag::Item => self.flush_line(),
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link(..) => self.pop_style(),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            let style = self.palette.code_block;
            for line in text.lines() {
                self.spans.push(Span::styled(format!(" {} ", line), style));
                self.flush_line();
            }
            return;
        }

        let style = self.style();
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.flush_line();
            }
            if !part.is_empty() {
                self.spans.push(Span::styled(part.to_string(), style));
            }
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        while self.lines.last().map_or(false, |line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Theme;

    fn palette() -> Palette {
        Palette::for_theme(Theme::Light)
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    fn span<'a>(lines: &'a [Line<'static>], text: &str) -> Option<&'a Span<'static>> {
        lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .find(|span| span.content == text)
    }

    #[test]
    fn test_plain_paragraph() {
        let lines = render_markdown("Just some text", &palette());
        assert_eq!(plain(&lines), vec!["Just some text"]);
    }

    #[test]
    fn test_soft_breaks_join_lines() {
        let lines = render_markdown("line one\nline two", &palette());
        assert_eq!(plain(&lines), vec!["line one line two"]);
    }

    #[test]
    fn test_emphasis_and_strong() {
        let lines = render_markdown("Hello **world** and *you*", &palette());
        assert_eq!(plain(&lines), vec!["Hello world and you"]);

        let bold = span(&lines, "world").expect("bold span");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));

        let italic = span(&lines, "you").expect("italic span");
        assert!(italic.style.add_modifier.contains(Modifier::ITALIC));
        assert!(!italic.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_heading_then_paragraph() {
        let lines = render_markdown("# Title\n\nBody", &palette());
        assert_eq!(plain(&lines), vec!["Title", "", "Body"]);

        let title = span(&lines, "Title").expect("heading span");
        assert!(title.style.add_modifier.contains(Modifier::BOLD));
        assert!(title.style.add_modifier.contains(Modifier::UNDERLINED));

        let body = span(&lines, "Body").expect("body span");
        assert!(!body.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_bullet_and_nested_lists() {
        let lines = render_markdown("- one\n- two\n  - deeper", &palette());
        assert_eq!(plain(&lines), vec!["• one", "• two", "  • deeper"]);
    }

    #[test]
    fn test_ordered_list_keeps_start_number() {
        let lines = render_markdown("3. three\n4. four\n5. five", &palette());
        assert_eq!(plain(&lines), vec!["3. three", "4. four", "5. five"]);
    }

    #[test]
    fn test_code_block_lines_are_preserved() {
        let p = palette();
        let lines = render_markdown("```rust\nfn main() {\n    run();\n}\n```", &p);
        assert_eq!(
            plain(&lines),
            vec![" fn main() { ", "     run(); ", " } "]
        );
        assert!(lines
            .iter()
            .all(|line| line.spans.iter().all(|span| span.style == p.code_block)));
    }

    #[test]
    fn test_inline_code() {
        let p = palette();
        let lines = render_markdown("run `cargo fmt` first", &p);
        assert_eq!(plain(&lines), vec!["run cargo fmt first"]);
        assert_eq!(span(&lines, "cargo fmt").map(|s| s.style), Some(p.inline_code));
    }

    #[test]
    fn test_block_quote_is_prefixed() {
        let lines = render_markdown("> wise words", &palette());
        assert_eq!(plain(&lines), vec!["│ wise words"]);
    }

    #[test]
    fn test_rule_and_link() {
        let p = palette();
        let lines = render_markdown("see [docs](https://docs.rs)\n\n---\n\nend", &p);
        let text = plain(&lines);
        assert_eq!(text.first().map(String::as_str), Some("see docs"));
        assert!(text.iter().any(|line| line == &"─".repeat(RULE_WIDTH)));
        assert_eq!(text.last().map(String::as_str), Some("end"));

        let link = span(&lines, "docs").expect("link span");
        assert!(link.style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_no_trailing_blank_lines() {
        let lines = render_markdown("para one\n\npara two\n\n", &palette());
        assert_eq!(plain(&lines), vec!["para one", "", "para two"]);
    }
}
