//! Color theme and styling for the Money Mayhem TUI

use ratatui::style::{Color, Modifier, Style};

use crate::feedback::Tone;

/// Game UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Money colors
    pub money_positive: Color,
    pub money_negative: Color,
    pub debt: Color,

    // Power-up colors
    pub boost: Color,
    pub skip: Color,
    pub shield: Color,
    pub curse: Color,

    // Text colors
    pub question_text: Color,
    pub selected_option: Color,
    pub system_text: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            money_positive: Color::Green,
            money_negative: Color::Red,
            debt: Color::LightRed,

            boost: Color::Yellow,
            skip: Color::LightBlue,
            shield: Color::Cyan,
            curse: Color::Magenta,

            question_text: Color::White,
            selected_option: Color::Yellow,
            system_text: Color::DarkGray,
        }
    }
}

impl GameTheme {
    /// Get style for the question prompt
    pub fn question_style(&self) -> Style {
        Style::default()
            .fg(self.question_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for an answer option
    pub fn option_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.selected_option)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.foreground)
        }
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Green for gains, red for losses
    pub fn money_style(&self, amount: i64) -> Style {
        let color = if amount < 0 {
            self.money_negative
        } else {
            self.money_positive
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn debt_style(&self) -> Style {
        Style::default().fg(self.debt)
    }

    /// Highlight a power-up the player holds, dim one they don't
    pub fn power_up_style(&self, color: Color, held: bool) -> Style {
        if held {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            self.system_style()
        }
    }

    /// Get style for a feedback line
    pub fn tone_style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Good => Style::default().fg(self.money_positive),
            Tone::Bad => Style::default()
                .fg(self.money_negative)
                .add_modifier(Modifier::BOLD),
            Tone::Warning => Style::default().fg(self.boost),
            Tone::Info => Style::default().fg(self.shield),
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.boost)
            .add_modifier(Modifier::BOLD)
    }
}
