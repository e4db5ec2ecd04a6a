//! Render orchestration for the Money Mayhem TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use mayhem_core::Phase;

use crate::app::{App, Overlay, MENU_ITEMS};
use crate::feedback::{describe_summary, dollars, FeedbackLine};
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{InputWidget, QuestionWidget, WalletPanelWidget};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    match app.phase() {
        Phase::NotStarted => render_landing(frame, app, area),
        Phase::AwaitingAnswer => render_playing(frame, app, area),
        Phase::GameOver => render_game_over(frame, app, area),
    }

    if let Some(prompt) = app.prompt() {
        let popup = centered_rect_fixed(50, 3, area);
        frame.render_widget(Clear, popup);
        let input = InputWidget::new(app.input_buffer(), &app.theme)
            .cursor_position(app.cursor_position())
            .title(prompt.title())
            .placeholder(prompt.placeholder());
        frame.render_widget(input, popup);
    }

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the landing menu
fn render_landing(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(3)])
        .split(area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("MONEY MAYHEM", app.theme.title_style())),
        Line::from(Span::styled(
            "The AI quiz where every answer costs or earns money",
            app.theme.system_style(),
        )),
        Line::from(""),
        Line::from(format!(
            "Total bankruptcies: {}",
            app.session.total_bankruptcies()
        )),
        Line::from(""),
    ];

    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let selected = i == app.menu_selection;
        let marker = if selected { "> " } else { "  " };
        lines.push(Line::from(Span::styled(
            format!("{marker}{item}"),
            app.theme.option_style(selected),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Start with $100 - answer 10 questions - end with positive net worth to win",
        app.theme.system_style(),
    )));
    lines.push(Line::from(Span::styled(
        "Power-ups: Boost, Skip, Shield. Beware of curses. Loans charge 10% per question.",
        app.theme.system_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    render_status_bar(
        frame,
        app,
        chunks[1],
        "j/k: move  Enter: choose  w: Would You Rather  c: custom topic  q: quit",
    );
}

/// Render a game in progress
fn render_playing(frame: &mut Frame, app: &App, area: Rect) {
    let layout = AppLayout::calculate(area);
    let Some(game) = app.session.game() else {
        return;
    };

    let title = format!(" Money Mayhem | {} | {} ", game.mode().label(), game.category());
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(title, app.theme.title_style()))),
        layout.title_area,
    );

    if let Some(question) = game.current_question() {
        let widget = QuestionWidget::new(question, &app.theme)
            .number(game.current_question_index() + 1)
            .selected(app.selected_option)
            .boosted(game.power_ups().money_multiplier_active);
        frame.render_widget(widget, layout.question_area);
    }

    frame.render_widget(WalletPanelWidget::new(game, &app.theme), layout.sidebar_area);

    render_status_bar(frame, app, layout.status_bar, "");

    let hotkeys = Line::from(Span::styled(
        " 1-4/Enter: answer  j/k: move  s: skip  l: loan  r: repay  m: menu  ?: help  q: quit",
        app.theme.system_style(),
    ));
    frame.render_widget(Paragraph::new(hotkeys), layout.hotkey_bar);
}

/// Render the final results
fn render_game_over(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(area);

    let mut lines = vec![Line::from("")];
    if let Some(summary) = app.session.summary() {
        lines.extend(feedback_lines(app, &describe_summary(&summary)));
    }

    let block = Block::default()
        .title(" Game Over ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        chunks[0],
    );

    render_status_bar(frame, app, chunks[1], "Enter: new game  q: quit");
}

/// Status message, or `fallback` when there is none
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, fallback: &str) {
    let line = if app.loading {
        Line::from(Span::styled(
            "Generating questions...",
            app.theme.power_up_style(app.theme.boost, true),
        ))
    } else if let Some(message) = app.status_message() {
        Line::from(message.to_string())
    } else if let Some(game) = app.session.game().filter(|_| fallback.is_empty()) {
        Line::from(vec![
            Span::raw("Net worth: "),
            Span::styled(dollars(game.net_worth()), app.theme.money_style(game.net_worth())),
            Span::raw(format!("  |  {} questions left", game.questions_left())),
        ])
    } else {
        Line::from(Span::styled(fallback.to_string(), app.theme.system_style()))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn feedback_lines(app: &App, lines: &[FeedbackLine]) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|l| Line::from(Span::styled(l.text.clone(), app.theme.tone_style(l.tone))))
        .collect()
}

/// Render overlay
fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
        Overlay::Feedback { option_text, lines } => {
            render_feedback_overlay(frame, app, option_text, lines, area)
        }
    }
}

/// Render the answer result popup
fn render_feedback_overlay(
    frame: &mut Frame,
    app: &App,
    option_text: &str,
    lines: &[FeedbackLine],
    area: Rect,
) {
    let height = (lines.len() as u16).saturating_add(6);
    let popup_area = centered_rect_fixed(60, height, area);
    frame.render_widget(Clear, popup_area);

    let mut text = vec![
        Line::from(Span::styled(
            format!("You chose: {option_text}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];
    text.extend(feedback_lines(app, lines));
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press Enter to continue",
        app.theme.system_style(),
    )));

    let block = Block::default()
        .title(" Result ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(60, 22, area);
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Money Mayhem - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Goal:", heading)),
        Line::from("  Start with $100 and finish with a positive net worth."),
        Line::from("  Net worth is your money minus any loan."),
        Line::from(""),
        Line::from(Span::styled("Playing:", heading)),
        Line::from("  1-4 or Enter   Answer"),
        Line::from("  j/k or arrows  Move selection"),
        Line::from("  s              Spend a skip token"),
        Line::from("  l / r          Take / repay a loan"),
        Line::from("  m              Back to menu"),
        Line::from(""),
        Line::from(Span::styled("Power-ups:", heading)),
        Line::from("  Boost   next answer pays (or costs) double"),
        Line::from("  Skip    move past a question for free"),
        Line::from("  Shield  resets a negative net worth to $0 once"),
        Line::from("  Curse   adds 2-3 extra questions"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}
