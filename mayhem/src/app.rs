//! Main application state and logic

use mayhem_core::{GameSession, LoanOffer, Phase, QuestionMode};
use tracing::debug;

use crate::feedback::{describe_answer, describe_error, loan_offer_text, FeedbackLine};
use crate::ui::theme::GameTheme;

/// Entries on the landing menu
pub const MENU_ITEMS: [&str; 2] = ["Would You Rather", "Custom Topic"];

/// What the input box is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Topic,
    Loan,
    Repay,
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::Topic => "Enter a topic",
            Prompt::Loan => "Loan amount ($10-$500)",
            Prompt::Repay => "Repay amount",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Prompt::Topic => "e.g. Harry Potter, Space, Cooking...",
            Prompt::Loan => "100",
            Prompt::Repay => "how much to pay back",
        }
    }
}

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
    /// Result of the last answer, shown until dismissed
    Feedback {
        option_text: String,
        lines: Vec<FeedbackLine>,
    },
}

/// Work that needs the async runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Start { topic: String, mode: QuestionMode },
    Answer(usize),
}

/// Main application state
pub struct App {
    pub session: GameSession,
    pub theme: GameTheme,

    // Landing menu and option cursor
    pub menu_selection: usize,
    pub selected_option: usize,

    // Input state
    prompt: Option<Prompt>,
    input_buffer: String,
    cursor_position: usize,

    overlay: Option<Overlay>,
    status_message: Option<String>,

    pub pending: Option<PendingAction>,
    pub loading: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            theme: GameTheme::default(),
            menu_selection: 0,
            selected_option: 0,
            prompt: None,
            input_buffer: String::new(),
            cursor_position: 0,
            overlay: None,
            status_message: None,
            pending: None,
            loading: false,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    // =========================================================================
    // Landing menu
    // =========================================================================

    pub fn menu_up(&mut self) {
        self.menu_selection = self.menu_selection.saturating_sub(1);
    }

    pub fn menu_down(&mut self) {
        self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1);
    }

    /// Activate the highlighted menu entry
    pub fn choose_menu(&mut self) {
        if self.menu_selection == 0 {
            self.start_would_you_rather();
        } else {
            self.open_prompt(Prompt::Topic);
        }
    }

    pub fn start_would_you_rather(&mut self) {
        self.pending = Some(PendingAction::Start {
            topic: String::new(),
            mode: QuestionMode::WouldYouRather,
        });
    }

    // =========================================================================
    // Playing
    // =========================================================================

    fn option_count(&self) -> usize {
        self.session.current_question().map_or(0, |q| q.options.len())
    }

    pub fn select_next(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Queue an answer for the option at `index`
    pub fn answer(&mut self, index: usize) {
        if self.phase() != Phase::AwaitingAnswer {
            return;
        }
        if index >= self.option_count() {
            self.set_status(format!("Option {} does not exist", index + 1));
            return;
        }
        self.selected_option = index;
        self.pending = Some(PendingAction::Answer(index));
    }

    pub fn answer_selected(&mut self) {
        self.answer(self.selected_option);
    }

    pub fn skip(&mut self) {
        match self.session.skip() {
            Ok(()) => {
                self.selected_option = 0;
                self.set_status("Question skipped!");
                self.finish_if_over();
            }
            Err(e) => self.set_status(describe_error(&e)),
        }
    }

    pub fn open_loan_prompt(&mut self) {
        let Some(game) = self.session.game() else {
            return;
        };
        match game.loan_offer() {
            LoanOffer::Available => self.open_prompt(Prompt::Loan),
            offer => self.set_status(loan_offer_text(offer)),
        }
    }

    pub fn open_repay_prompt(&mut self) {
        match self.session.game() {
            Some(game) if game.loan_taken() => {
                let max = game.max_repayment();
                self.open_prompt(Prompt::Repay);
                self.set_status(format!("You can repay up to ${max}"));
            }
            Some(_) => self.set_status("There is no loan to repay"),
            None => {}
        }
    }

    pub fn return_to_menu(&mut self) {
        self.session.return_to_menu();
        self.selected_option = 0;
        self.overlay = None;
        self.set_status(format!(
            "Total bankruptcies: {}",
            self.session.total_bankruptcies()
        ));
    }

    fn finish_if_over(&mut self) {
        if self.phase() == Phase::GameOver {
            self.session.finish();
        }
    }

    /// Run a queued action against the session
    pub async fn perform(&mut self, action: PendingAction) {
        debug!(?action, "performing action");
        match action {
            PendingAction::Start { topic, mode } => {
                self.loading = true;
                let result = self.session.start(&topic, mode).await.map(|_| ());
                self.loading = false;
                match result {
                    Ok(()) => {
                        self.selected_option = 0;
                        self.set_status(format!("Game started: {}", mode.label()));
                    }
                    Err(e) => self.set_status(describe_error(&e)),
                }
            }
            PendingAction::Answer(index) => match self.session.answer(index).await {
                Ok(outcome) => {
                    self.selected_option = 0;
                    self.overlay = Some(Overlay::Feedback {
                        option_text: outcome.option_text.clone(),
                        lines: describe_answer(&outcome),
                    });
                    self.clear_status();
                    self.finish_if_over();
                }
                Err(e) => self.set_status(describe_error(&e)),
            },
        }
    }

    // =========================================================================
    // Prompt input
    // =========================================================================

    pub fn open_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
        self.clear_input();
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.clear_input();
    }

    /// Submit the prompt's input
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt else {
            return;
        };
        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        match prompt {
            Prompt::Topic => {
                let topic = input.trim();
                if topic.is_empty() {
                    self.set_status("Please enter a topic");
                    return;
                }
                self.pending = Some(PendingAction::Start {
                    topic: topic.to_string(),
                    mode: QuestionMode::Custom,
                });
            }
            Prompt::Loan => {
                let Some(amount) = parse_amount(&input) else {
                    self.set_status("Enter a whole dollar amount");
                    return;
                };
                match self.session.take_loan(amount) {
                    Ok(()) => self.set_status(format!("Loan approved: ${amount}")),
                    Err(e) => self.set_status(describe_error(&e)),
                }
            }
            Prompt::Repay => {
                let Some(amount) = parse_amount(&input) else {
                    self.set_status("Enter a whole dollar amount");
                    return;
                };
                match self.session.repay_loan(amount) {
                    Ok(()) => {
                        let repaid = self.session.game().is_some_and(|g| !g.loan_taken());
                        if repaid {
                            self.set_status("Loan fully repaid!");
                        } else {
                            self.set_status(format!("Repaid ${amount}"));
                        }
                    }
                    Err(e) => self.set_status(describe_error(&e)),
                }
            }
        }
        self.prompt = None;
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Overlays and status
    // =========================================================================

    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}

/// Parse a dollar amount typed by the player: `100`, `$100`.
pub fn parse_amount(input: &str) -> Option<i64> {
    input.trim().trim_start_matches('$').trim().parse().ok()
}
