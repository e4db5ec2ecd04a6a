//! GameSession - the primary public API for playing Money Mayhem.
//!
//! A session lives for the whole process. It owns the question source, the
//! random source, the current [`Game`] (if any) and the bankruptcy counter
//! that survives from one game to the next. Front ends drive it with
//! `start`, `answer`, `skip`, `take_loan`, `repay_loan` and `return_to_menu`.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::game::{AnswerOutcome, Game, GameError, GameOutcome, GameRules, Phase};
use crate::generator::{GenerationError, QuestionGenerator, QuestionSource};
use crate::luck::{Luck, RngLuck};
use crate::question::{Question, QuestionMode, WOULD_YOU_RATHER_CATEGORY};

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("question generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Game(#[from] GameError),
}

impl SessionError {
    /// True when the player should be pointed at their API key.
    pub fn is_credential_error(&self) -> bool {
        match self {
            SessionError::Generation(e) => e.is_credential_error(),
            SessionError::Game(_) => false,
        }
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Starting money and question count for each game.
    pub rules: GameRules,

    /// Questions requested when a game starts.
    pub buffer_size: usize,

    /// Extra questions requested on top of a shortfall after a curse.
    pub refill_slack: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rules: GameRules::default(),
            buffer_size: 20,
            refill_slack: 5,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.rules.starting_money = money;
        self
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.rules.question_count = count;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn with_refill_slack(mut self, slack: usize) -> Self {
        self.refill_slack = slack;
        self
    }
}

/// Results shown on the game over screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub outcome: GameOutcome,
    pub money: i64,
    pub loan_amount: i64,
    pub final_net: i64,
    pub questions_answered: u32,
    /// Terminal bankruptcy on the last question, as opposed to ending in debt.
    pub bankrupt: bool,
    pub total_bankruptcies: u32,
}

/// A Money Mayhem session.
pub struct GameSession {
    source: Box<dyn QuestionSource>,
    luck: Box<dyn Luck + Send>,
    config: SessionConfig,
    game: Option<Game>,
    total_bankruptcies: u32,
}

impl GameSession {
    /// Create a session with an entropy-seeded random source.
    pub fn new(source: impl QuestionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            luck: Box::new(RngLuck::from_entropy()),
            config: SessionConfig::default(),
            game: None,
            total_bankruptcies: 0,
        }
    }

    /// Create a session backed by the Groq API.
    ///
    /// A missing `GROQ_API_KEY` is not fatal here: the session is built over
    /// an unconfigured generator and every `start` fails with a credential
    /// error, leaving the session not started.
    pub fn from_env() -> Result<Self, SessionError> {
        let generator = match QuestionGenerator::from_env() {
            Ok(generator) => generator,
            Err(e) if e.is_credential_error() => {
                warn!(error = %e, "no API key configured, games cannot start");
                QuestionGenerator::unconfigured()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self::new(generator))
    }

    pub fn with_luck(mut self, luck: impl Luck + Send + 'static) -> Self {
        self.luck = Box::new(luck);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.game.as_ref().map_or(Phase::NotStarted, Game::phase)
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.game.as_ref().and_then(Game::current_question)
    }

    /// Games lost across this session.
    pub fn total_bankruptcies(&self) -> u32 {
        self.total_bankruptcies
    }

    /// The summary of a finished game, `None` while one is still running.
    pub fn summary(&self) -> Option<GameSummary> {
        let game = self.game.as_ref()?;
        let outcome = game.outcome()?;
        Some(GameSummary {
            outcome,
            money: game.money(),
            loan_amount: game.loan_amount(),
            final_net: game.net_worth(),
            questions_answered: game.questions_answered(),
            bankrupt: game.is_bankrupt(),
            total_bankruptcies: self.total_bankruptcies,
        })
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Start a new game, discarding any game in progress.
    ///
    /// `topic` is ignored for "Would You Rather" games. On failure the
    /// session is left with no game.
    pub async fn start(&mut self, topic: &str, mode: QuestionMode) -> Result<&Game, SessionError> {
        self.game = None;

        let category = match mode {
            QuestionMode::WouldYouRather => WOULD_YOU_RATHER_CATEGORY.to_string(),
            QuestionMode::Custom | QuestionMode::Financial => topic.trim().to_string(),
        };

        let mut questions = self
            .source
            .generate(&category, self.config.buffer_size, mode)
            .await?;
        for question in &mut questions {
            self.luck.shuffle_options(&mut question.options);
        }

        info!(%category, %mode, buffered = questions.len(), "game started");
        self.game = Some(Game::with_rules(category, mode, questions, self.config.rules));
        self.ensure_buffer().await;

        self.game
            .as_ref()
            .ok_or(SessionError::Game(GameError::NotStarted))
    }

    /// Answer the current question.
    pub async fn answer(&mut self, option_index: usize) -> Result<AnswerOutcome, SessionError> {
        let game = self.game.as_mut().ok_or(GameError::NotStarted)?;
        let outcome = game.answer(option_index, self.luck.as_mut())?;

        self.ensure_buffer().await;
        self.settle();
        Ok(outcome)
    }

    /// Spend a skip token.
    pub fn skip(&mut self) -> Result<(), SessionError> {
        let game = self.game.as_mut().ok_or(GameError::NotStarted)?;
        game.skip()?;
        self.settle();
        Ok(())
    }

    pub fn take_loan(&mut self, amount: i64) -> Result<(), SessionError> {
        let game = self.game.as_mut().ok_or(GameError::NotStarted)?;
        game.take_loan(amount)?;
        info!(amount, "loan taken");
        Ok(())
    }

    pub fn repay_loan(&mut self, amount: i64) -> Result<(), SessionError> {
        let game = self.game.as_mut().ok_or(GameError::NotStarted)?;
        game.repay_loan(amount)?;
        info!(amount, remaining = game.loan_amount(), "loan repaid");
        Ok(())
    }

    /// Settle a finished game and return its summary.
    pub fn finish(&mut self) -> Option<GameSummary> {
        self.settle();
        self.summary()
    }

    /// Drop the current game. The bankruptcy counter is kept.
    pub fn return_to_menu(&mut self) {
        self.settle();
        self.game = None;
    }

    /// Count a lost game exactly once.
    fn settle(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if !game.mark_counted() {
            return;
        }
        let outcome = game.outcome();
        if outcome == Some(GameOutcome::Loss) {
            self.total_bankruptcies += 1;
        }
        info!(
            ?outcome,
            final_net = game.net_worth(),
            total_bankruptcies = self.total_bankruptcies,
            "game finished"
        );
    }

    /// Request more questions when curses pushed the total past the buffer.
    async fn ensure_buffer(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let shortfall = game.total_questions().saturating_sub(game.buffered());
        if shortfall == 0 || game.is_over() {
            return;
        }
        let category = game.category().to_string();
        let mode = game.mode();
        let count = shortfall + self.config.refill_slack;

        match self.source.generate(&category, count, mode).await {
            Ok(mut more) => {
                for question in &mut more {
                    self.luck.shuffle_options(&mut question.options);
                }
                info!(requested = count, received = more.len(), "question buffer topped up");
                if let Some(game) = self.game.as_mut() {
                    game.extend_questions(more);
                }
            }
            Err(e) => warn!(error = %e, "could not top up question buffer"),
        }

        if let Some(game) = self.game.as_mut() {
            if game.total_questions() > game.buffered() {
                warn!(
                    total = game.total_questions(),
                    buffered = game.buffered(),
                    "capping game at buffered questions"
                );
                game.cap_to_buffer();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PowerUpEvent;
    use crate::question::QuestionOption;
    use crate::testing::{sample_questions, MockSource, ScriptedLuck};

    fn session(source: MockSource, luck: ScriptedLuck) -> GameSession {
        GameSession::new(source).with_luck(luck)
    }

    #[tokio::test]
    async fn test_start_requests_buffer() {
        let source = MockSource::new();
        let mut session = session(source.clone(), ScriptedLuck::quiet());
        assert_eq!(session.phase(), Phase::NotStarted);

        let game = session.start("pirates", QuestionMode::Custom).await.unwrap();
        assert_eq!(game.buffered(), 20);
        assert_eq!(game.money(), 100);
        assert_eq!(session.phase(), Phase::AwaitingAnswer);

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].category, "pirates");
        assert_eq!(calls[0].count, 20);
        assert_eq!(calls[0].mode, QuestionMode::Custom);
    }

    #[tokio::test]
    async fn test_would_you_rather_uses_fixed_category() {
        let source = MockSource::new();
        let mut session = session(source.clone(), ScriptedLuck::quiet());
        session.start("", QuestionMode::WouldYouRather).await.unwrap();
        assert_eq!(source.calls()[0].category, WOULD_YOU_RATHER_CATEGORY);
    }

    #[tokio::test]
    async fn test_failed_start_stays_not_started() {
        let source = MockSource::new();
        source.push_failure(GenerationError::EmptyCompletion);
        let mut session = session(source, ScriptedLuck::quiet());

        let err = session.start("pirates", QuestionMode::Custom).await.unwrap_err();
        assert!(matches!(err, SessionError::Generation(GenerationError::EmptyCompletion)));
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(matches!(
            session.answer(0).await,
            Err(SessionError::Game(GameError::NotStarted))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_leaves_session_not_started() {
        let mut session = GameSession::new(QuestionGenerator::unconfigured())
            .with_luck(ScriptedLuck::quiet());

        for _ in 0..2 {
            let err = session.start("pirates", QuestionMode::Custom).await.unwrap_err();
            assert!(err.is_credential_error());
            assert!(matches!(
                err,
                SessionError::Generation(GenerationError::Api(groq::Error::NoApiKey))
            ));
            assert_eq!(session.phase(), Phase::NotStarted);
            assert!(session.game().is_none());
        }
    }

    #[tokio::test]
    async fn test_curse_tops_up_buffer() {
        let source = MockSource::new();
        source.push_batch(sample_questions(10));
        let luck = ScriptedLuck::quiet();
        luck.push_rolls(false, false, false, true);
        luck.push_curse_extra(3);
        let mut session = session(source.clone(), luck);

        session.start("chess", QuestionMode::Custom).await.unwrap();
        let outcome = session.answer(0).await.unwrap();

        assert_eq!(outcome.power_ups, vec![PowerUpEvent::Curse { extra_questions: 3 }]);
        let game = session.game().unwrap();
        assert_eq!(game.total_questions(), 13);
        assert!(game.buffered() >= 13);
        assert_eq!(source.calls()[1].count, 3 + 5);
    }

    #[tokio::test]
    async fn test_failed_top_up_caps_total() {
        let source = MockSource::new();
        source.push_batch(sample_questions(10));
        source.push_failure(GenerationError::EmptyCompletion);
        let luck = ScriptedLuck::quiet();
        luck.push_rolls(false, false, false, true);
        luck.push_curse_extra(2);
        let mut session = session(source, luck);

        session.start("chess", QuestionMode::Custom).await.unwrap();
        session.answer(0).await.unwrap();

        let game = session.game().unwrap();
        assert_eq!(game.total_questions(), 10);
        assert_eq!(game.power_ups().curse_count, 1);
    }

    #[tokio::test]
    async fn test_short_start_batch_is_capped() {
        let source = MockSource::new();
        source.push_batch(sample_questions(6));
        source.push_failure(GenerationError::EmptyCompletion);
        let mut session = session(source, ScriptedLuck::quiet());

        let game = session.start("chess", QuestionMode::Custom).await.unwrap();
        assert_eq!(game.total_questions(), 6);
    }

    #[tokio::test]
    async fn test_bankruptcy_counted_once_and_survives_menu() {
        let mut session = session(MockSource::new(), ScriptedLuck::quiet())
            .with_config(SessionConfig::new().with_question_count(2));

        session.start("chess", QuestionMode::Custom).await.unwrap();
        // sample questions: +20, -15, -40, -75
        session.answer(3).await.unwrap();
        let outcome = session.answer(3).await.unwrap();
        assert!(outcome.bankrupt);
        assert_eq!(session.total_bankruptcies(), 1);

        let summary = session.finish().unwrap();
        assert_eq!(summary.outcome, GameOutcome::Loss);
        assert_eq!(summary.final_net, -50);
        assert_eq!(summary.total_bankruptcies, 1);
        assert_eq!(session.finish().unwrap().total_bankruptcies, 1);

        session.return_to_menu();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.total_bankruptcies(), 1);

        session.start("chess", QuestionMode::Custom).await.unwrap();
        session.answer(0).await.unwrap();
        session.answer(0).await.unwrap();
        let summary = session.finish().unwrap();
        assert_eq!(summary.outcome, GameOutcome::Win);
        assert_eq!(summary.final_net, 140);
        assert_eq!(session.total_bankruptcies(), 1);
    }

    #[tokio::test]
    async fn test_unfinished_game_is_not_counted() {
        let mut session = session(MockSource::new(), ScriptedLuck::quiet());
        session.start("chess", QuestionMode::Custom).await.unwrap();
        session.answer(3).await.unwrap();
        session.answer(3).await.unwrap();
        assert!(session.summary().is_none());
        session.return_to_menu();
        assert_eq!(session.total_bankruptcies(), 0);
    }

    #[tokio::test]
    async fn test_start_shuffles_options() {
        let batch: Vec<Question> = (1..=20)
            .map(|n| {
                Question::new(
                    format!("Weighted question {n}?"),
                    vec![
                        QuestionOption::new("Best", 20).with_multiplier(2.5),
                        QuestionOption::new("Close", -15),
                        QuestionOption::new("Poor", -40).with_multiplier(0.5),
                        QuestionOption::new("Worst", -75).with_multiplier(1.5),
                    ],
                )
            })
            .collect();
        let source = MockSource::new();
        source.push_batch(batch.clone());
        let mut session = GameSession::new(source).with_luck(RngLuck::seeded(3));
        session.start("chess", QuestionMode::Custom).await.unwrap();

        fn sorted(question: &Question) -> Vec<(String, i64, f64)> {
            let mut options: Vec<_> = question
                .options
                .iter()
                .map(|o| (o.text.clone(), o.money_change, o.multiplier))
                .collect();
            options.sort_by(|a, b| a.0.cmp(&b.0));
            options
        }

        let shuffled = session.game().unwrap().questions();
        assert_eq!(shuffled.len(), batch.len());
        let mut moved = false;
        for (original, question) in batch.iter().zip(shuffled) {
            assert_eq!(question.text, original.text);
            assert_eq!(sorted(question), sorted(original));
            moved |= question.options != original.options;
        }
        assert!(moved);
    }
}
