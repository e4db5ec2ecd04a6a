//! Testing utilities for Money Mayhem.
//!
//! This module provides tools for deterministic tests:
//! - `MockSource` hands out scripted question batches without API calls
//! - `ScriptedLuck` decides every power-up roll in advance
//! - `TestHarness` wires both into a `GameSession`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::game::{AnswerOutcome, Game};
use crate::generator::{GenerationError, QuestionSource};
use crate::luck::{Luck, CURSE_EXTRA_CHOICES};
use crate::question::{Question, QuestionMode, QuestionOption};
use crate::session::{GameSession, SessionConfig, SessionError};

/// `count` identical-shape questions with options worth +20, -15, -40, -75.
pub fn sample_questions(count: usize) -> Vec<Question> {
    (1..=count)
        .map(|n| {
            Question::new(
                format!("Sample question {n}?"),
                vec![
                    QuestionOption::new("Best", 20),
                    QuestionOption::new("Close", -15),
                    QuestionOption::new("Poor", -40),
                    QuestionOption::new("Worst", -75),
                ],
            )
        })
        .collect()
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A recorded `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCall {
    pub category: String,
    pub count: usize,
    pub mode: QuestionMode,
}

enum Scripted {
    Batch(Vec<Question>),
    Failure(GenerationError),
}

#[derive(Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    calls: Vec<GenerateCall>,
}

/// A question source that returns scripted batches.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// session. With nothing queued it returns `count` sample questions.
#[derive(Clone, Default)]
pub struct MockSource {
    state: Arc<Mutex<MockState>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch for the next call.
    pub fn push_batch(&self, questions: Vec<Question>) -> &Self {
        lock(&self.state).queue.push_back(Scripted::Batch(questions));
        self
    }

    /// Make the next call fail.
    pub fn push_failure(&self, error: GenerationError) -> &Self {
        lock(&self.state).queue.push_back(Scripted::Failure(error));
        self
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        lock(&self.state).calls.clone()
    }
}

#[async_trait]
impl QuestionSource for MockSource {
    async fn generate(
        &self,
        category: &str,
        count: usize,
        mode: QuestionMode,
    ) -> Result<Vec<Question>, GenerationError> {
        let mut state = lock(&self.state);
        state.calls.push(GenerateCall {
            category: category.to_string(),
            count,
            mode,
        });
        match state.queue.pop_front() {
            Some(Scripted::Batch(questions)) => Ok(questions),
            Some(Scripted::Failure(error)) => Err(error),
            None => Ok(sample_questions(count)),
        }
    }
}

#[derive(Default)]
struct LuckState {
    rolls: VecDeque<bool>,
    curse_extras: VecDeque<usize>,
    asked: Vec<f64>,
}

/// [`Luck`] with every outcome decided up front.
///
/// Unscripted rolls fail, unscripted curses add the smallest amount, and
/// options are never shuffled.
#[derive(Clone, Default)]
pub struct ScriptedLuck {
    state: Arc<Mutex<LuckState>>,
}

impl ScriptedLuck {
    /// No power-ups unless scripted.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Script the four rolls of one answer, in draw order.
    pub fn push_rolls(&self, boost: bool, skip: bool, shield: bool, curse: bool) -> &Self {
        lock(&self.state)
            .rolls
            .extend([boost, skip, shield, curse]);
        self
    }

    pub fn push_curse_extra(&self, extra: usize) -> &Self {
        lock(&self.state).curse_extras.push_back(extra);
        self
    }

    /// Probabilities passed to `chance`, in order.
    pub fn asked(&self) -> Vec<f64> {
        lock(&self.state).asked.clone()
    }
}

impl Luck for ScriptedLuck {
    fn chance(&mut self, p: f64) -> bool {
        let mut state = lock(&self.state);
        state.asked.push(p);
        state.rolls.pop_front().unwrap_or(false)
    }

    fn curse_extra(&mut self) -> usize {
        lock(&self.state)
            .curse_extras
            .pop_front()
            .unwrap_or(CURSE_EXTRA_CHOICES[0])
    }

    fn shuffle_options(&mut self, _options: &mut [QuestionOption]) {}
}

/// A session over `MockSource` and `ScriptedLuck`.
pub struct TestHarness {
    pub session: GameSession,
    pub source: MockSource,
    pub luck: ScriptedLuck,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let source = MockSource::new();
        let luck = ScriptedLuck::quiet();
        let session = GameSession::new(source.clone())
            .with_luck(luck.clone())
            .with_config(config);
        Self {
            session,
            source,
            luck,
        }
    }

    /// Start a custom-topic game.
    pub async fn start(&mut self, topic: &str) -> Result<&Game, SessionError> {
        self.session.start(topic, QuestionMode::Custom).await
    }

    pub async fn answer(&mut self, option_index: usize) -> Result<AnswerOutcome, SessionError> {
        self.session.answer(option_index).await
    }

    pub fn game(&self) -> Option<&Game> {
        self.session.game()
    }

    /// Money in the live game, zero when none is running.
    pub fn money(&self) -> i64 {
        self.game().map_or(0, Game::money)
    }

    pub fn net_worth(&self) -> i64 {
        self.game().map_or(0, Game::net_worth)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
