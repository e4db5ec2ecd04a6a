//! Headless mode for Money Mayhem.
//!
//! A line-oriented text interface for running the game without a TUI,
//! suitable for scripts and automated testing.

use std::io::{self, BufRead, Write};

use mayhem_core::{Game, GameSession, Phase, QuestionMode};

use crate::feedback::{describe_answer, describe_error, describe_summary, dollars, loan_offer_text};

/// One line of player input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Zero-based option index
    Answer(usize),
    Skip,
    Loan(i64),
    Repay(i64),
    Status,
    Menu,
    Start(String),
    WouldYouRather,
    Help,
    Quit,
}

/// Parse a line of input into a command.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "1" | "2" | "3" | "4" if rest.is_empty() => {
            let n: usize = word.parse().map_err(|_| format!("bad option: {word}"))?;
            Ok(Command::Answer(n - 1))
        }
        "skip" => Ok(Command::Skip),
        "loan" => parse_dollars(rest).map(Command::Loan),
        "repay" => parse_dollars(rest).map(Command::Repay),
        "status" => Ok(Command::Status),
        "menu" => Ok(Command::Menu),
        "start" if !rest.is_empty() => Ok(Command::Start(rest.to_string())),
        "start" => Err("Usage: start <topic>".to_string()),
        "wyr" => Ok(Command::WouldYouRather),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(format!("Unknown command: {line}. Type help for help.")),
    }
}

fn parse_dollars(s: &str) -> Result<i64, String> {
    s.trim_start_matches('$')
        .parse()
        .map_err(|_| format!("expected a dollar amount, got '{s}'"))
}

fn print_help() {
    println!("[HELP]");
    println!("  wyr            - Start a Would You Rather game");
    println!("  start <topic>  - Start a game about any topic");
    println!("  1-4            - Answer the current question");
    println!("  skip           - Spend a skip token");
    println!("  loan <amount>  - Borrow $10-$500 while in the red");
    println!("  repay <amount> - Pay back part of your loan");
    println!("  status         - Show money, loan and power-ups");
    println!("  menu           - Abandon the game and return to the menu");
    println!("  quit           - Exit");
}

fn print_status(game: &Game) {
    let (done, total) = game.progress();
    let power_ups = game.power_ups();
    println!("[STATUS]");
    println!("  Question: {}/{}", (done + 1).min(total), total);
    println!("  Money: {}", dollars(game.money()));
    if game.loan_taken() {
        println!("  Loan: {}", dollars(game.loan_amount()));
    }
    println!("  Net worth: {}", dollars(game.net_worth()));
    println!(
        "  Boost: {}  Skip: {}  Shield: {}  Curse: {}",
        if power_ups.money_multiplier_active { "active" } else { "0" },
        power_ups.skip_tokens,
        power_ups.shield_charges,
        power_ups.curse_count
    );
    println!("  {}", loan_offer_text(game.loan_offer()));
}

fn print_question(session: &GameSession) {
    let Some(game) = session.game() else {
        return;
    };
    let Some(question) = game.current_question() else {
        return;
    };
    println!();
    println!(
        "[QUESTION {}/{}] {}",
        game.current_question_index() + 1,
        game.total_questions(),
        question.text
    );
    if game.power_ups().money_multiplier_active {
        println!("  (MONEY BOOST ACTIVE: this question gets 2x money!)");
    }
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option.text);
    }
}

fn print_game_over(session: &mut GameSession) {
    if let Some(summary) = session.finish() {
        println!();
        println!("[GAME OVER]");
        for line in describe_summary(&summary) {
            println!("  {}", line.text);
        }
        println!("Type 'wyr' or 'start <topic>' to play again, or 'quit'.");
    }
}

async fn start(session: &mut GameSession, topic: &str, mode: QuestionMode) {
    println!("[LOADING] Generating questions...");
    match session.start(topic, mode).await {
        Ok(game) => {
            println!("[STARTED] {} - {}", game.mode().label(), game.category());
            print_question(session);
        }
        Err(e) => println!("[ERROR] {}", describe_error(&e)),
    }
}

/// Run the game in headless mode.
///
/// `initial` starts a game right away instead of waiting for a command.
pub async fn run_headless(
    mut session: GameSession,
    initial: Option<(String, QuestionMode)>,
) -> anyhow::Result<()> {
    println!("=== Money Mayhem Headless Mode ===");
    println!("Total bankruptcies: {}", session.total_bankruptcies());
    print_help();
    println!();

    if let Some((topic, mode)) = initial {
        start(&mut session, &topic, mode).await;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("[ERROR] {message}");
                continue;
            }
        };

        match command {
            Command::Quit => {
                println!("Goodbye!");
                break;
            }
            Command::Help => print_help(),
            Command::WouldYouRather => {
                start(&mut session, "", QuestionMode::WouldYouRather).await
            }
            Command::Start(topic) => start(&mut session, &topic, QuestionMode::Custom).await,
            Command::Menu => {
                session.return_to_menu();
                println!("[MENU] Total bankruptcies: {}", session.total_bankruptcies());
            }
            Command::Status => match session.game() {
                Some(game) => print_status(game),
                None => println!("[STATUS] No game in progress"),
            },
            Command::Answer(index) => match session.answer(index).await {
                Ok(outcome) => {
                    println!("[RESULT] You chose: {}", outcome.option_text);
                    for line in describe_answer(&outcome) {
                        println!("  {}", line.text);
                    }
                    if session.phase() == Phase::GameOver {
                        print_game_over(&mut session);
                    } else {
                        print_question(&session);
                    }
                }
                Err(e) => println!("[ERROR] {}", describe_error(&e)),
            },
            Command::Skip => match session.skip() {
                Ok(()) => {
                    println!("[SKIPPED] Question skipped!");
                    if session.phase() == Phase::GameOver {
                        print_game_over(&mut session);
                    } else {
                        print_question(&session);
                    }
                }
                Err(e) => println!("[ERROR] {}", describe_error(&e)),
            },
            Command::Loan(amount) => match session.take_loan(amount) {
                Ok(()) => println!("[LOAN] Loan approved: ${amount}"),
                Err(e) => println!("[ERROR] {}", describe_error(&e)),
            },
            Command::Repay(amount) => match session.repay_loan(amount) {
                Ok(()) => {
                    let remaining = session.game().map_or(0, Game::loan_amount);
                    if remaining == 0 {
                        println!("[LOAN] Loan fully repaid!");
                    } else {
                        println!("[LOAN] Repaid ${amount}, {} left", dollars(remaining));
                    }
                }
                Err(e) => println!("[ERROR] {}", describe_error(&e)),
            },
        }
        stdout.flush()?;
    }

    Ok(())
}
