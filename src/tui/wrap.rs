use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Word-wrap a styled line into rows at most `width` columns wide.
///
/// A word that does not fit the rest of a row starts the next one; words
/// wider than a whole row are split between characters. Whitespace
/// that falls on a row break is dropped. Each row keeps the line's alignment.
pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line];
    }

    let alignment = line.alignment;
    let mut rows = Rows::new(width);
    let mut word: Vec<(char, Style)> = Vec::new();

    for span in &line.spans {
        for c in span.content.chars() {
            if c.is_whitespace() {
                rows.push_word(&mut word);
                rows.push_space(c, span.style);
            } else {
                word.push((c, span.style));
            }
        }
    }
    rows.push_word(&mut word);

    rows.finish()
        .into_iter()
        .map(|spans| {
            let mut row = Line::from(spans);
            row.alignment = alignment;
            row
        })
        .collect()
}

/// Wrap every line, see [`wrap_line`]
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

struct Rows {
    width: usize,
    done: Vec<Vec<Span<'static>>>,
    current: Vec<Span<'static>>,
    used: usize,
    // Set when whitespace overflowed; the break happens at the next word
    broken_at_space: bool,
}

impl Rows {
    fn new(width: usize) -> Self {
        Self {
            width,
            done: Vec::new(),
            current: Vec::new(),
            used: 0,
            broken_at_space: false,
        }
    }

    fn break_row(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
        self.used = 0;
        self.broken_at_space = false;
    }

    fn push_char(&mut self, c: char, style: Style) {
        match self.current.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(c),
            _ => self.current.push(Span::styled(c.to_string(), style)),
        }
        self.used += char_width(c);
    }

    fn push_space(&mut self, c: char, style: Style) {
        if self.broken_at_space {
            return;
        }
        if self.used + char_width(c) > self.width {
            self.broken_at_space = true;
            return;
        }
        self.push_char(c, style);
    }

    fn push_word(&mut self, word: &mut Vec<(char, Style)>) {
        if word.is_empty() {
            return;
        }

        let total: usize = word.iter().map(|(c, _)| char_width(*c)).sum();
        if self.broken_at_space || (self.used > 0 && self.used + total > self.width) {
            self.break_row();
        }

        for (c, style) in word.drain(..) {
            if self.used > 0 && self.used + char_width(c) > self.width {
                self.break_row();
            }
            self.push_char(c, style);
        }
    }

    fn finish(mut self) -> Vec<Vec<Span<'static>>> {
        self.done.push(self.current);
        self.done
    }
}
