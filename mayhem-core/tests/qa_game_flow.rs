//! QA tests for whole games played against a scripted question source.
//!
//! These tests cover the flows a player actually goes through:
//! - Winning and losing a full game
//! - Borrowing, paying interest and repaying
//! - Skips, shields and curses across several questions
//! - Starting over from the menu
//!
//! Run with: `cargo test -p mayhem-core --test qa_game_flow`

use mayhem_core::game::{LoanOffer, PowerUpEvent};
use mayhem_core::testing::sample_questions;
use mayhem_core::{
    GameError, GameOutcome, Phase, QuestionMode, SessionConfig, SessionError, TestHarness,
};

// =============================================================================
// FULL GAMES
// =============================================================================

#[tokio::test]
async fn test_perfect_game_wins() {
    let mut harness = TestHarness::new();
    harness.start("volcanoes").await.unwrap();

    for _ in 0..10 {
        harness.answer(0).await.unwrap();
    }

    assert_eq!(harness.session.phase(), Phase::GameOver);
    let summary = harness.session.finish().unwrap();
    assert_eq!(summary.outcome, GameOutcome::Win);
    assert_eq!(summary.money, 300);
    assert_eq!(summary.final_net, 300);
    assert_eq!(summary.questions_answered, 10);
    assert_eq!(summary.total_bankruptcies, 0);
}

#[tokio::test]
async fn test_answering_after_game_over_is_rejected() {
    let mut harness = TestHarness::with_config(SessionConfig::new().with_question_count(1));
    harness.start("volcanoes").await.unwrap();
    harness.answer(0).await.unwrap();

    let err = harness.answer(0).await.unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::GameOver)));
}

#[tokio::test]
async fn test_losing_streak_ends_in_bankruptcy() {
    let mut harness = TestHarness::new();
    harness.start("volcanoes").await.unwrap();

    for _ in 0..9 {
        let outcome = harness.answer(3).await.unwrap();
        assert!(!outcome.bankrupt);
    }
    let last = harness.answer(3).await.unwrap();

    assert!(last.bankrupt);
    assert_eq!(harness.net_worth(), 100 - 75 * 10);
    let summary = harness.session.finish().unwrap();
    assert_eq!(summary.outcome, GameOutcome::Loss);
    assert!(summary.bankrupt);
    assert_eq!(harness.session.total_bankruptcies(), 1);
}

// =============================================================================
// LOANS
// =============================================================================

#[tokio::test]
async fn test_loan_rescues_a_bad_start() {
    let mut harness = TestHarness::new();
    harness.start("volcanoes").await.unwrap();

    harness.answer(3).await.unwrap();
    harness.answer(3).await.unwrap();
    assert_eq!(harness.money(), -50);
    assert_eq!(harness.game().unwrap().loan_offer(), LoanOffer::Available);

    harness.session.take_loan(100).unwrap();
    assert_eq!(harness.money(), 50);
    assert_eq!(harness.net_worth(), -50);

    let outcome = harness.answer(0).await.unwrap();
    assert_eq!(outcome.interest, Some(10));
    assert_eq!(harness.game().unwrap().loan_amount(), 110);

    harness.session.repay_loan(70).unwrap();
    let game = harness.game().unwrap();
    assert_eq!(game.money(), 0);
    assert_eq!(game.loan_amount(), 40);
    assert!(game.loan_taken());
}

#[tokio::test]
async fn test_loan_refused_when_solvent() {
    let mut harness = TestHarness::new();
    harness.start("volcanoes").await.unwrap();

    let err = harness.session.take_loan(100).unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::LoanNotNeeded)));
    assert!(matches!(
        harness.session.repay_loan(10),
        Err(SessionError::Game(GameError::NoLoan))
    ));
}

// =============================================================================
// POWER-UPS
// =============================================================================

#[tokio::test]
async fn test_skip_then_shield_then_curse() {
    let mut harness = TestHarness::new();
    harness.start("volcanoes").await.unwrap();

    harness.luck.push_rolls(false, true, true, false);
    let outcome = harness.answer(0).await.unwrap();
    assert_eq!(outcome.power_ups, vec![PowerUpEvent::SkipToken, PowerUpEvent::Shield]);

    harness.session.skip().unwrap();
    assert_eq!(harness.game().unwrap().current_question_index(), 2);

    // 120 - 75 - 75 = -30, absorbed by the shield
    harness.answer(3).await.unwrap();
    let outcome = harness.answer(3).await.unwrap();
    assert_eq!(outcome.shield_used, Some(30));
    assert_eq!(harness.money(), 0);

    harness.luck.push_rolls(false, false, false, true);
    harness.luck.push_curse_extra(2);
    harness.answer(0).await.unwrap();
    let game = harness.game().unwrap();
    assert_eq!(game.total_questions(), 12);
    assert_eq!(game.questions_left(), 7);
}

#[tokio::test]
async fn test_boost_doubles_next_loss_too() {
    let mut harness = TestHarness::new();
    harness.start("volcanoes").await.unwrap();

    harness.luck.push_rolls(true, false, false, false);
    harness.answer(0).await.unwrap();
    let outcome = harness.answer(2).await.unwrap();

    assert_eq!(outcome.multiplier, 2.0);
    assert_eq!(outcome.amount, -80);
    assert_eq!(harness.money(), 40);
}

// =============================================================================
// MENU
// =============================================================================

#[tokio::test]
async fn test_new_game_resets_state() {
    let mut harness = TestHarness::new();
    harness.start("volcanoes").await.unwrap();
    harness.answer(3).await.unwrap();

    harness.session.return_to_menu();
    assert_eq!(harness.session.phase(), Phase::NotStarted);

    harness.source.push_batch(sample_questions(20));
    let game = harness
        .session
        .start("", QuestionMode::WouldYouRather)
        .await
        .unwrap();
    assert_eq!(game.money(), 100);
    assert_eq!(game.current_question_index(), 0);
    assert_eq!(game.mode(), QuestionMode::WouldYouRather);
}
