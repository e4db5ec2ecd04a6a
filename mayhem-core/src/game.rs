//! Game state and the rules that move it.
//!
//! A [`Game`] is one play-through: money, loan, power-ups, progress and the
//! buffered questions. Every player action is a method that checks its
//! preconditions, mutates the game in place, and reports what happened.
//! Randomness is injected through [`Luck`], so a transition is a function of
//! (state, action, draws).

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::luck::Luck;
use crate::question::{Question, QuestionMode};

/// Cash at the start of every game.
pub const STARTING_MONEY: i64 = 100;
/// Questions in a game before any curse.
pub const BASE_QUESTION_COUNT: usize = 10;

/// Interest added to an active loan after each answered question.
pub const LOAN_INTEREST_PERCENT: i64 = 10;
pub const MIN_LOAN: i64 = 10;
pub const MAX_LOAN: i64 = 500;
/// Loans need at least this many questions left to pay back.
pub const MIN_QUESTIONS_FOR_LOAN: usize = 2;

/// Multiplier applied to the next answer by a money boost.
pub const BOOST_MULTIPLIER: f64 = 2.0;

/// Per-answer drop chances.
pub const BOOST_CHANCE: f64 = 0.09;
pub const SKIP_CHANCE: f64 = 0.08;
pub const SHIELD_CHANCE: f64 = 0.05;
pub const CURSE_CHANCE: f64 = 0.02;

/// Errors from game transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no game in progress")]
    NotStarted,

    #[error("the game is over")]
    GameOver,

    #[error("option {index} does not exist (question has {available} options)")]
    InvalidOption { index: usize, available: usize },

    #[error("no skip tokens left")]
    NoSkipTokens,

    #[error("a loan is already active")]
    LoanAlreadyTaken,

    #[error("net worth is not negative, no loan needed")]
    LoanNotNeeded,

    #[error("need at least 2 questions remaining to take a loan")]
    TooFewQuestionsForLoan,

    #[error("loan amount must be between $10 and $500, got ${0}")]
    LoanAmountOutOfRange(i64),

    #[error("there is no loan to repay")]
    NoLoan,

    #[error("repayment must be between $1 and ${max}, got ${requested}")]
    InvalidRepayment { requested: i64, max: i64 },

    #[error("no more questions available")]
    OutOfQuestions,
}

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    NotStarted,
    AwaitingAnswer,
    GameOver,
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOutcome {
    Win,
    Loss,
}

/// Collected power-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PowerUps {
    /// A 2x boost is waiting for the next answer.
    pub money_multiplier_active: bool,
    pub skip_tokens: u32,
    /// Never more than one.
    pub shield_charges: u32,
    pub curse_count: u32,
}

/// A random drop granted after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpEvent {
    MoneyBoost,
    SkipToken,
    Shield,
    Curse { extra_questions: usize },
}

/// Whether the loan button should be offered right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoanOffer {
    /// A loan is already running.
    Active,
    /// Net worth is not negative.
    NotNeeded,
    /// In the red, but fewer than [`MIN_QUESTIONS_FOR_LOAN`] questions remain.
    TooLate,
    Available,
}

/// What a single answer did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub option_text: String,
    /// The option's own money change before multipliers.
    pub base_change: i64,
    /// Option multiplier times the active boost.
    pub multiplier: f64,
    /// Money actually added (negative for losses).
    pub amount: i64,
    /// Interest added to the loan, when one is active.
    pub interest: Option<i64>,
    pub power_ups: Vec<PowerUpEvent>,
    /// Money restored by a shield.
    pub shield_used: Option<i64>,
    /// Terminal bankruptcy on the last question.
    pub bankrupt: bool,
}

/// Tunable starting values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub starting_money: i64,
    pub question_count: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_money: STARTING_MONEY,
            question_count: BASE_QUESTION_COUNT,
        }
    }
}

/// One play-through.
#[derive(Debug, Clone)]
pub struct Game {
    category: String,
    mode: QuestionMode,
    money: i64,
    loan_taken: bool,
    loan_amount: i64,
    current_question_index: usize,
    total_questions: usize,
    questions_answered: u32,
    power_ups: PowerUps,
    next_question_multiplier: f64,
    questions: Vec<Question>,
    game_over: bool,
    bankruptcy_counted: bool,
}

impl Game {
    /// Start a game with the default rules.
    pub fn new(category: impl Into<String>, mode: QuestionMode, questions: Vec<Question>) -> Self {
        Self::with_rules(category, mode, questions, GameRules::default())
    }

    pub fn with_rules(
        category: impl Into<String>,
        mode: QuestionMode,
        questions: Vec<Question>,
        rules: GameRules,
    ) -> Self {
        Self {
            category: category.into(),
            mode,
            money: rules.starting_money,
            loan_taken: false,
            loan_amount: 0,
            current_question_index: 0,
            total_questions: rules.question_count,
            questions_answered: 0,
            power_ups: PowerUps::default(),
            next_question_multiplier: 1.0,
            questions,
            game_over: false,
            bankruptcy_counted: false,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn mode(&self) -> QuestionMode {
        self.mode
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    pub fn loan_taken(&self) -> bool {
        self.loan_taken
    }

    pub fn loan_amount(&self) -> i64 {
        self.loan_amount
    }

    /// Money minus outstanding loan.
    pub fn net_worth(&self) -> i64 {
        self.money.saturating_sub(self.loan_amount)
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    pub fn power_ups(&self) -> &PowerUps {
        &self.power_ups
    }

    pub fn next_question_multiplier(&self) -> f64 {
        self.next_question_multiplier
    }

    /// Questions held in the buffer, played or not.
    pub fn buffered(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Set only by terminal bankruptcy.
    pub fn is_bankrupt(&self) -> bool {
        self.game_over
    }

    pub fn is_over(&self) -> bool {
        self.game_over || self.current_question_index >= self.total_questions
    }

    pub fn phase(&self) -> Phase {
        if self.is_over() {
            Phase::GameOver
        } else {
            Phase::AwaitingAnswer
        }
    }

    /// Questions not yet answered or skipped.
    pub fn questions_left(&self) -> usize {
        self.total_questions.saturating_sub(self.current_question_index)
    }

    /// (completed, total) for a progress bar.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.current_question_index.min(self.total_questions),
            self.total_questions,
        )
    }

    /// The question waiting for an answer.
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_over() {
            return None;
        }
        self.questions.get(self.current_question_index)
    }

    pub fn loan_offer(&self) -> LoanOffer {
        if self.loan_taken {
            LoanOffer::Active
        } else if self.net_worth() >= 0 {
            LoanOffer::NotNeeded
        } else if self.questions_left() < MIN_QUESTIONS_FOR_LOAN {
            LoanOffer::TooLate
        } else {
            LoanOffer::Available
        }
    }

    /// Largest amount `repay_loan` accepts.
    pub fn max_repayment(&self) -> i64 {
        self.money.min(self.loan_amount).max(0)
    }

    /// `Some` once the game has ended.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.is_over() {
            return None;
        }
        if self.game_over || self.net_worth() < 0 {
            Some(GameOutcome::Loss)
        } else {
            Some(GameOutcome::Win)
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Answer the current question with the option at `option_index`.
    pub fn answer(
        &mut self,
        option_index: usize,
        luck: &mut dyn Luck,
    ) -> Result<AnswerOutcome, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let question = self
            .questions
            .get(self.current_question_index)
            .ok_or(GameError::OutOfQuestions)?;
        let option = question
            .options
            .get(option_index)
            .ok_or(GameError::InvalidOption {
                index: option_index,
                available: question.options.len(),
            })?;

        let option_text = option.text.clone();
        let base_change = option.money_change;
        let multiplier = option.multiplier * self.next_question_multiplier;
        let amount = (base_change as f64 * multiplier).floor() as i64;

        self.money = self.money.saturating_add(amount);
        self.questions_answered += 1;

        self.next_question_multiplier = 1.0;
        self.power_ups.money_multiplier_active = false;

        let interest = self.loan_taken.then(|| {
            let interest = self.loan_amount * LOAN_INTEREST_PERCENT / 100;
            self.loan_amount = self.loan_amount.saturating_add(interest);
            interest
        });

        let power_ups = self.roll_power_ups(luck);

        let mut net = self.net_worth();
        let remaining = self
            .total_questions
            .saturating_sub(self.current_question_index + 1);

        let mut shield_used = None;
        if net < 0 && self.power_ups.shield_charges > 0 {
            self.power_ups.shield_charges -= 1;
            let restored = net.saturating_neg();
            self.money = self.money.saturating_add(restored);
            shield_used = Some(restored);
            net = self.net_worth();
        }

        let bankrupt = net < 0 && remaining == 0;
        if bankrupt {
            self.game_over = true;
        }

        self.current_question_index += 1;

        debug!(
            index = self.current_question_index,
            amount,
            money = self.money,
            loan = self.loan_amount,
            bankrupt,
            "answered question"
        );

        Ok(AnswerOutcome {
            option_text,
            base_change,
            multiplier,
            amount,
            interest,
            power_ups,
            shield_used,
            bankrupt,
        })
    }

    /// Four independent draws, always in the same order.
    fn roll_power_ups(&mut self, luck: &mut dyn Luck) -> Vec<PowerUpEvent> {
        let mut events = Vec::new();

        if luck.chance(BOOST_CHANCE) && self.next_question_multiplier == 1.0 {
            self.next_question_multiplier = BOOST_MULTIPLIER;
            self.power_ups.money_multiplier_active = true;
            events.push(PowerUpEvent::MoneyBoost);
        }

        if luck.chance(SKIP_CHANCE) {
            self.power_ups.skip_tokens += 1;
            events.push(PowerUpEvent::SkipToken);
        }

        if luck.chance(SHIELD_CHANCE) && self.power_ups.shield_charges == 0 {
            self.power_ups.shield_charges = 1;
            events.push(PowerUpEvent::Shield);
        }

        if luck.chance(CURSE_CHANCE) {
            let extra_questions = luck.curse_extra();
            self.power_ups.curse_count += 1;
            self.total_questions += extra_questions;
            events.push(PowerUpEvent::Curse { extra_questions });
        }

        events
    }

    /// Spend a skip token to move past the current question.
    pub fn skip(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.power_ups.skip_tokens == 0 {
            return Err(GameError::NoSkipTokens);
        }
        if self.questions.get(self.current_question_index).is_none() {
            return Err(GameError::OutOfQuestions);
        }

        self.power_ups.skip_tokens -= 1;
        self.current_question_index += 1;
        Ok(())
    }

    /// Borrow `amount` while in the red.
    pub fn take_loan(&mut self, amount: i64) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        match self.loan_offer() {
            LoanOffer::Active => return Err(GameError::LoanAlreadyTaken),
            LoanOffer::NotNeeded => return Err(GameError::LoanNotNeeded),
            LoanOffer::TooLate => return Err(GameError::TooFewQuestionsForLoan),
            LoanOffer::Available => {}
        }
        if !(MIN_LOAN..=MAX_LOAN).contains(&amount) {
            return Err(GameError::LoanAmountOutOfRange(amount));
        }

        self.money = self.money.saturating_add(amount);
        self.loan_amount = amount;
        self.loan_taken = true;
        Ok(())
    }

    /// Pay back part or all of the loan.
    pub fn repay_loan(&mut self, amount: i64) -> Result<(), GameError> {
        if !self.loan_taken {
            return Err(GameError::NoLoan);
        }
        let max = self.max_repayment();
        if amount <= 0 || amount > max {
            return Err(GameError::InvalidRepayment {
                requested: amount,
                max,
            });
        }

        self.money = self.money.saturating_sub(amount);
        self.loan_amount -= amount;
        if self.loan_amount <= 0 {
            self.loan_amount = 0;
            self.loan_taken = false;
        }
        Ok(())
    }

    // =========================================================================
    // Buffer management (driven by the session)
    // =========================================================================

    pub(crate) fn extend_questions(&mut self, questions: Vec<Question>) {
        self.questions.extend(questions);
    }

    /// Shrink the game to the questions actually buffered.
    pub(crate) fn cap_to_buffer(&mut self) {
        let cap = self.questions.len().max(self.current_question_index);
        if self.total_questions > cap {
            self.total_questions = cap;
        }
    }

    /// Returns true the first time it is called on a finished game.
    pub(crate) fn mark_counted(&mut self) -> bool {
        if !self.is_over() || self.bankruptcy_counted {
            return false;
        }
        self.bankruptcy_counted = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionOption;
    use crate::testing::{sample_questions, ScriptedLuck};

    fn question(changes: [i64; 4]) -> Question {
        Question::new(
            "Pick one",
            changes
                .iter()
                .enumerate()
                .map(|(i, c)| QuestionOption::new(format!("option {i}"), *c))
                .collect(),
        )
    }

    fn game_with(questions: Vec<Question>) -> Game {
        Game::new("testing", QuestionMode::Custom, questions)
    }

    #[test]
    fn test_new_game_defaults() {
        let game = game_with(sample_questions(20));
        assert_eq!(game.money(), 100);
        assert_eq!(game.current_question_index(), 0);
        assert_eq!(game.total_questions(), 10);
        assert_eq!(game.power_ups(), &PowerUps::default());
        assert_eq!(game.next_question_multiplier(), 1.0);
        assert_eq!(game.phase(), Phase::AwaitingAnswer);
        assert!(!game.loan_taken());
        assert_eq!(game.loan_amount(), 0);
    }

    #[test]
    fn test_answer_loses_seventy() {
        let mut game = game_with(vec![question([-70, 20, -15, -40]); 10]);
        let mut luck = ScriptedLuck::quiet();

        let outcome = game.answer(0, &mut luck).unwrap();

        assert_eq!(outcome.amount, -70);
        assert_eq!(game.money(), 30);
        assert_eq!(game.current_question_index(), 1);
        assert_eq!(game.questions_answered(), 1);
        assert!(outcome.power_ups.is_empty());
    }

    #[test]
    fn test_amount_floors_combined_multiplier() {
        let q = Question::new(
            "Pick one",
            vec![
                QuestionOption::new("a", 25).with_multiplier(1.5),
                QuestionOption::new("b", -25).with_multiplier(1.5),
                QuestionOption::new("c", -15).with_multiplier(2.5),
                QuestionOption::new("d", -60),
            ],
        );
        let mut game = game_with(vec![q; 10]);
        let mut luck = ScriptedLuck::quiet();

        assert_eq!(game.answer(0, &mut luck).unwrap().amount, 37);
        assert_eq!(game.answer(1, &mut luck).unwrap().amount, -38);

        game.next_question_multiplier = BOOST_MULTIPLIER;
        let outcome = game.answer(2, &mut luck).unwrap();
        assert_eq!(outcome.multiplier, 5.0);
        assert_eq!(outcome.amount, -75);
        assert_eq!(game.next_question_multiplier(), 1.0);
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let q = Question::new(
            "Pick one",
            vec![
                QuestionOption::new("a", i64::MAX).with_multiplier(1e30),
                QuestionOption::new("b", i64::MIN),
                QuestionOption::new("c", 0),
                QuestionOption::new("d", 0),
            ],
        );
        let mut game = game_with(vec![q; 10]);
        let mut luck = ScriptedLuck::quiet();

        game.answer(0, &mut luck).unwrap();
        assert_eq!(game.money(), i64::MAX);

        game.answer(1, &mut luck).unwrap();
        game.answer(1, &mut luck).unwrap();
        assert_eq!(game.money(), i64::MIN);
        assert_eq!(game.net_worth(), i64::MIN);
    }

    #[test]
    fn test_boost_applies_once_then_resets() {
        let mut game = game_with(vec![question([20, -15, -40, -75]); 10]);
        let mut luck = ScriptedLuck::quiet();
        luck.push_rolls(true, false, false, false);

        let first = game.answer(0, &mut luck).unwrap();
        assert_eq!(first.amount, 20);
        assert_eq!(first.power_ups, vec![PowerUpEvent::MoneyBoost]);
        assert_eq!(game.next_question_multiplier(), 2.0);
        assert!(game.power_ups().money_multiplier_active);

        let second = game.answer(0, &mut luck).unwrap();
        assert_eq!(second.amount, 40);
        assert_eq!(game.next_question_multiplier(), 1.0);
        assert!(!game.power_ups().money_multiplier_active);
        assert_eq!(game.money(), 160);
    }

    #[test]
    fn test_draw_order_and_probabilities() {
        let mut game = game_with(sample_questions(10));
        let mut luck = ScriptedLuck::quiet();
        game.answer(0, &mut luck).unwrap();
        assert_eq!(
            luck.asked(),
            vec![BOOST_CHANCE, SKIP_CHANCE, SHIELD_CHANCE, CURSE_CHANCE]
        );
    }

    #[test]
    fn test_shield_never_exceeds_one() {
        let mut game = game_with(vec![question([20, -15, -40, -75]); 10]);
        let mut luck = ScriptedLuck::quiet();
        for _ in 0..5 {
            luck.push_rolls(false, false, true, false);
        }

        let first = game.answer(0, &mut luck).unwrap();
        assert_eq!(first.power_ups, vec![PowerUpEvent::Shield]);
        for _ in 0..4 {
            let outcome = game.answer(0, &mut luck).unwrap();
            assert!(outcome.power_ups.is_empty());
            assert_eq!(game.power_ups().shield_charges, 1);
        }
    }

    #[test]
    fn test_shield_clamps_net_to_zero() {
        let mut game = game_with(vec![question([20, -15, -40, -140]); 10]);
        game.power_ups.shield_charges = 1;
        let mut luck = ScriptedLuck::quiet();

        // 100 - 140 = -40
        let outcome = game.answer(3, &mut luck).unwrap();

        assert_eq!(outcome.shield_used, Some(40));
        assert_eq!(game.money(), 0);
        assert_eq!(game.net_worth(), 0);
        assert_eq!(game.power_ups().shield_charges, 0);
        assert!(!outcome.bankrupt);
    }

    #[test]
    fn test_shield_covers_loan_debt() {
        let mut game = game_with(vec![question([20, -15, -40, -90]); 10]);
        game.money = -20;
        game.take_loan(100).unwrap();
        game.power_ups.shield_charges = 1;
        let mut luck = ScriptedLuck::quiet();

        // money 80 - 90 = -10, loan 100 + 10 = 110, net -120
        let outcome = game.answer(3, &mut luck).unwrap();
        assert_eq!(outcome.interest, Some(10));
        assert_eq!(outcome.shield_used, Some(120));
        assert_eq!(game.money(), 110);
        assert_eq!(game.net_worth(), 0);
    }

    #[test]
    fn test_curse_extends_game() {
        let mut game = game_with(sample_questions(20));
        let mut luck = ScriptedLuck::quiet();
        luck.push_rolls(false, false, false, true);
        luck.push_curse_extra(3);

        let outcome = game.answer(0, &mut luck).unwrap();

        assert_eq!(outcome.power_ups, vec![PowerUpEvent::Curse { extra_questions: 3 }]);
        assert_eq!(game.total_questions(), 13);
        assert_eq!(game.power_ups().curse_count, 1);
    }

    #[test]
    fn test_skip_token_awarded_and_spent() {
        let mut game = game_with(sample_questions(10));
        let mut luck = ScriptedLuck::quiet();
        assert_eq!(game.skip(), Err(GameError::NoSkipTokens));

        luck.push_rolls(false, true, false, false);
        game.answer(0, &mut luck).unwrap();
        assert_eq!(game.power_ups().skip_tokens, 1);

        let money = game.money();
        game.skip().unwrap();
        assert_eq!(game.current_question_index(), 2);
        assert_eq!(game.power_ups().skip_tokens, 0);
        assert_eq!(game.money(), money);
        assert_eq!(game.questions_answered(), 1);
    }

    #[test]
    fn test_skip_leaves_loan_untouched() {
        let mut game = game_with(sample_questions(10));
        game.money = -50;
        game.take_loan(100).unwrap();
        game.power_ups.skip_tokens = 1;
        game.skip().unwrap();
        assert_eq!(game.loan_amount(), 100);
        assert_eq!(game.money(), 50);
    }

    #[test]
    fn test_index_increases_by_one_per_action() {
        let mut game = game_with(sample_questions(10));
        let mut luck = ScriptedLuck::quiet();
        game.power_ups.skip_tokens = 4;
        let mut last = game.current_question_index();
        for step in 0..10 {
            if step % 3 == 0 {
                game.skip().unwrap();
            } else {
                game.answer(step % 4, &mut luck).unwrap();
            }
            assert_eq!(game.current_question_index(), last + 1);
            last = game.current_question_index();
        }
        assert!(game.is_over());
    }

    #[test]
    fn test_interest_accrues_per_answer() {
        let mut game = game_with(vec![question([0, 0, 0, 0]); 10]);
        game.money = -10;
        game.take_loan(105).unwrap();
        let mut luck = ScriptedLuck::quiet();

        let outcome = game.answer(0, &mut luck).unwrap();
        assert_eq!(outcome.interest, Some(10));
        assert_eq!(game.loan_amount(), 115);

        game.answer(0, &mut luck).unwrap();
        assert_eq!(game.loan_amount(), 126);
    }

    #[test]
    fn test_loan_preconditions() {
        let mut game = game_with(sample_questions(10));
        assert_eq!(game.loan_offer(), LoanOffer::NotNeeded);
        assert_eq!(game.take_loan(100), Err(GameError::LoanNotNeeded));

        game.money = -40;
        assert_eq!(game.loan_offer(), LoanOffer::Available);
        assert_eq!(game.take_loan(5), Err(GameError::LoanAmountOutOfRange(5)));
        assert_eq!(game.take_loan(501), Err(GameError::LoanAmountOutOfRange(501)));

        game.take_loan(100).unwrap();
        assert_eq!(game.money(), 60);
        assert_eq!(game.loan_amount(), 100);
        assert!(game.loan_taken());
        assert_eq!(game.loan_offer(), LoanOffer::Active);
        assert_eq!(game.take_loan(100), Err(GameError::LoanAlreadyTaken));
    }

    #[test]
    fn test_no_loan_with_one_question_left() {
        let mut game = game_with(sample_questions(10));
        game.current_question_index = 9;
        game.money = 5;
        assert_eq!(game.loan_offer(), LoanOffer::NotNeeded);

        game.money = -5;
        assert_eq!(game.loan_offer(), LoanOffer::TooLate);
        assert_eq!(game.take_loan(100), Err(GameError::TooFewQuestionsForLoan));

        game.current_question_index = 8;
        assert_eq!(game.loan_offer(), LoanOffer::Available);
    }

    #[test]
    fn test_repay_loan() {
        let mut game = game_with(sample_questions(10));
        assert_eq!(game.repay_loan(10), Err(GameError::NoLoan));

        game.money = -20;
        game.take_loan(200).unwrap();
        assert_eq!(game.max_repayment(), 180);
        assert_eq!(
            game.repay_loan(0),
            Err(GameError::InvalidRepayment { requested: 0, max: 180 })
        );
        assert_eq!(
            game.repay_loan(181),
            Err(GameError::InvalidRepayment { requested: 181, max: 180 })
        );

        game.repay_loan(80).unwrap();
        assert_eq!(game.money(), 100);
        assert_eq!(game.loan_amount(), 120);
        assert!(game.loan_taken());

        game.money = 500;
        game.repay_loan(120).unwrap();
        assert_eq!(game.money(), 380);
        assert_eq!(game.loan_amount(), 0);
        assert!(!game.loan_taken());
    }

    #[test]
    fn test_bankruptcy_on_last_question() {
        let mut game = game_with(vec![question([20, -15, -40, -90]); 10]);
        game.current_question_index = 9;
        game.money = 50;
        let mut luck = ScriptedLuck::quiet();

        let outcome = game.answer(3, &mut luck).unwrap();

        assert!(outcome.bankrupt);
        assert!(game.is_bankrupt());
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.outcome(), Some(GameOutcome::Loss));
        assert_eq!(game.answer(0, &mut luck), Err(GameError::GameOver));
        assert_eq!(game.take_loan(100), Err(GameError::GameOver));
    }

    #[test]
    fn test_negative_with_questions_left_is_not_bankrupt() {
        let mut game = game_with(vec![question([20, -15, -40, -190]); 10]);
        let mut luck = ScriptedLuck::quiet();
        let outcome = game.answer(3, &mut luck).unwrap();
        assert!(!outcome.bankrupt);
        assert_eq!(game.net_worth(), -90);
        assert_eq!(game.phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn test_outcome_win_and_debt_loss() {
        let mut game = game_with(sample_questions(10));
        game.current_question_index = 10;
        assert_eq!(game.outcome(), Some(GameOutcome::Win));

        game.loan_taken = true;
        game.loan_amount = game.money + 1;
        assert_eq!(game.outcome(), Some(GameOutcome::Loss));
        assert!(!game.is_bankrupt());
    }

    #[test]
    fn test_mark_counted_once() {
        let mut game = game_with(sample_questions(10));
        assert!(!game.mark_counted());
        game.current_question_index = 10;
        assert!(game.mark_counted());
        assert!(!game.mark_counted());
    }

    #[test]
    fn test_invalid_option_and_out_of_questions() {
        let mut game = game_with(sample_questions(1));
        let mut luck = ScriptedLuck::quiet();
        assert_eq!(
            game.answer(4, &mut luck),
            Err(GameError::InvalidOption { index: 4, available: 4 })
        );
        game.answer(0, &mut luck).unwrap();
        assert_eq!(game.answer(0, &mut luck), Err(GameError::OutOfQuestions));

        game.cap_to_buffer();
        assert_eq!(game.total_questions(), 1);
        assert!(game.is_over());
    }
}
