//! Money Mayhem game engine with AI-generated questions.
//!
//! This crate provides:
//! - The game state machine: money, loans, power-ups and curses
//! - Question generation through the Groq completion API
//! - A validation boundary that turns model output into questions
//! - Deterministic test doubles for the generator and the dice
//!
//! # Quick Start
//!
//! ```ignore
//! use mayhem_core::{GameSession, QuestionMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::from_env()?;
//!     session.start("deep sea exploration", QuestionMode::Custom).await?;
//!
//!     let outcome = session.answer(0).await?;
//!     println!("{:+}", outcome.amount);
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod generator;
pub mod luck;
pub mod prompts;
pub mod question;
pub mod session;
pub mod testing;

// Primary public API
pub use game::{
    AnswerOutcome, Game, GameError, GameOutcome, GameRules, LoanOffer, Phase, PowerUpEvent,
    PowerUps,
};
pub use generator::{GenerationError, GeneratorConfig, QuestionGenerator, QuestionSource};
pub use luck::{Luck, RngLuck};
pub use question::{ParseError, Question, QuestionError, QuestionMode, QuestionOption};
pub use session::{GameSession, GameSummary, SessionConfig, SessionError};
pub use testing::{MockSource, ScriptedLuck, TestHarness};
