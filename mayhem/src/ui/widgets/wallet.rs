//! Wallet panel widget for the sidebar: money, loan, power-ups, progress

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use mayhem_core::Game;

use crate::feedback::{dollars, loan_offer_text};
use crate::ui::theme::GameTheme;

/// Sidebar summary of the player's finances
pub struct WalletPanelWidget<'a> {
    game: &'a Game,
    theme: &'a GameTheme,
}

impl<'a> WalletPanelWidget<'a> {
    pub fn new(game: &'a Game, theme: &'a GameTheme) -> Self {
        Self { game, theme }
    }
}

impl Widget for WalletPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Your Status ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Progress
                Constraint::Length(4), // Money / loan / net
                Constraint::Length(5), // Power-ups
                Constraint::Min(0),    // Loan offer
            ])
            .split(inner);

        // Progress
        let (done, total) = self.game.progress();
        let ratio = if total > 0 {
            done as f64 / total as f64
        } else {
            1.0
        };
        Gauge::default()
            .block(Block::default())
            .gauge_style(Style::default().fg(self.theme.border_focused))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("Question {}/{}", (done + 1).min(total), total))
            .render(chunks[0], buf);

        // Money
        let money = self.game.money();
        let net = self.game.net_worth();
        let mut money_lines = vec![Line::from(vec![
            Span::raw("Money: "),
            Span::styled(dollars(money), self.theme.money_style(money)),
        ])];
        if self.game.loan_taken() {
            money_lines.push(Line::from(vec![
                Span::raw("Loan:  "),
                Span::styled(
                    format!("-${}", self.game.loan_amount()),
                    self.theme.debt_style(),
                ),
            ]));
        }
        money_lines.push(Line::from(vec![
            Span::raw("Net:   "),
            Span::styled(dollars(net), self.theme.money_style(net)),
        ]));
        Paragraph::new(money_lines).render(chunks[1], buf);

        // Power-ups
        let power_ups = self.game.power_ups();
        let header = Line::from(Span::styled(
            "Power-Ups",
            Style::default().add_modifier(Modifier::UNDERLINED),
        ));
        let boost = if power_ups.money_multiplier_active {
            "Money Boost: Active".to_string()
        } else {
            "Money Boost: 0".to_string()
        };
        let power_lines = vec![
            header,
            Line::from(Span::styled(
                boost,
                self.theme
                    .power_up_style(self.theme.boost, power_ups.money_multiplier_active),
            )),
            Line::from(Span::styled(
                format!("Skip: {}", power_ups.skip_tokens),
                self.theme
                    .power_up_style(self.theme.skip, power_ups.skip_tokens > 0),
            )),
            Line::from(Span::styled(
                format!("Shield: {}", power_ups.shield_charges),
                self.theme
                    .power_up_style(self.theme.shield, power_ups.shield_charges > 0),
            )),
            Line::from(Span::styled(
                format!("Curse: {}", power_ups.curse_count),
                self.theme
                    .power_up_style(self.theme.curse, power_ups.curse_count > 0),
            )),
        ];
        Paragraph::new(power_lines).render(chunks[2], buf);

        if chunks[3].height > 0 {
            let offer = Line::from(Span::styled(
                loan_offer_text(self.game.loan_offer()),
                self.theme.system_style(),
            ));
            Paragraph::new(offer)
                .wrap(Wrap { trim: true })
                .render(chunks[3], buf);
        }
    }
}
