//! Question display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use mayhem_core::Question;

use crate::ui::theme::GameTheme;

/// The current question and its four options
pub struct QuestionWidget<'a> {
    question: &'a Question,
    number: usize,
    selected: usize,
    boosted: bool,
    theme: &'a GameTheme,
}

impl<'a> QuestionWidget<'a> {
    pub fn new(question: &'a Question, theme: &'a GameTheme) -> Self {
        Self {
            question,
            number: 1,
            selected: 0,
            boosted: false,
            theme,
        }
    }

    /// 1-based question number for the title
    pub fn number(mut self, number: usize) -> Self {
        self.number = number;
        self
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    /// Show the money boost banner
    pub fn boosted(mut self, boosted: bool) -> Self {
        self.boosted = boosted;
        self
    }
}

impl Widget for QuestionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Question {} ", self.number))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let mut lines = Vec::new();

        if self.boosted {
            lines.push(Line::from(Span::styled(
                "MONEY BOOST ACTIVE: this question gets 2x money!",
                self.theme.power_up_style(self.theme.boost, true),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            self.question.text.as_str(),
            self.theme.question_style(),
        )));
        lines.push(Line::from(""));

        for (i, option) in self.question.options.iter().enumerate() {
            let is_selected = i == self.selected;
            let marker = if is_selected { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, self.theme.option_style(is_selected)),
                Span::styled(
                    format!("[{}] ", i + 1),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::styled(option.text.as_str(), self.theme.option_style(is_selected)),
            ]));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
