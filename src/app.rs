use clap::ValueEnum;

use crate::transcript::{PendingReply, TranscriptController};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Everything the chat screen shows, owned in one place.
///
/// The renderer only reads through the accessors; changes go through the
/// named operations below.
#[derive(Debug)]
pub struct ChatState {
    transcript: TranscriptController,
    theme: Theme,
    left_panel_open: bool,
    right_panel_open: bool,
}

impl ChatState {
    pub fn new(theme: Theme) -> Self {
        Self {
            transcript: TranscriptController::new(),
            theme,
            left_panel_open: true,
            right_panel_open: true,
        }
    }

    pub fn transcript(&self) -> &TranscriptController {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut TranscriptController {
        &mut self.transcript
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn left_panel_visible(&self) -> bool {
        self.left_panel_open
    }

    pub fn right_panel_visible(&self) -> bool {
        self.right_panel_open
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn show_left_panel(&mut self) {
        self.left_panel_open = true;
    }

    pub fn hide_left_panel(&mut self) {
        self.left_panel_open = false;
    }

    pub fn toggle_left_panel(&mut self) {
        if self.left_panel_open {
            self.hide_left_panel();
        } else {
            self.show_left_panel();
        }
    }

    pub fn show_right_panel(&mut self) {
        self.right_panel_open = true;
    }

    pub fn hide_right_panel(&mut self) {
        self.right_panel_open = false;
    }

    pub fn toggle_right_panel(&mut self) {
        if self.right_panel_open {
            self.hide_right_panel();
        } else {
            self.show_right_panel();
        }
    }

    /// Submit the input buffer, see [`TranscriptController::submit`]
    pub fn send(&mut self) -> Option<PendingReply> {
        self.transcript.submit_input()
    }

    pub fn clear_chat(&mut self) {
        self.transcript.clear();
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
