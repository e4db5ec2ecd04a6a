//! Player-facing messages shared by the TUI and headless mode.

use mayhem_core::{
    AnswerOutcome, GameOutcome, GameSummary, LoanOffer, PowerUpEvent, SessionError,
};

/// How a message should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackLine {
    pub text: String,
    pub tone: Tone,
}

impl FeedbackLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Format a signed dollar amount: `+$20`, `-$75`.
pub fn signed_dollars(amount: i64) -> String {
    if amount < 0 {
        format!("-${}", amount.unsigned_abs())
    } else {
        format!("+${amount}")
    }
}

/// Format a balance: `$20`, `-$75`.
pub fn dollars(amount: i64) -> String {
    if amount < 0 {
        format!("-${}", amount.unsigned_abs())
    } else {
        format!("${amount}")
    }
}

/// Everything that happened on one answer, in the order it happened.
pub fn describe_answer(outcome: &AnswerOutcome) -> Vec<FeedbackLine> {
    let mut lines = Vec::new();

    let scaled = outcome.multiplier != 1.0;
    let money = if outcome.amount >= 0 {
        let text = if scaled {
            format!(
                "Congrats! {}x multiplier on this question! {}",
                outcome.multiplier,
                signed_dollars(outcome.amount)
            )
        } else {
            signed_dollars(outcome.amount)
        };
        FeedbackLine::new(text, Tone::Good)
    } else {
        let text = if scaled {
            format!(
                "{}x multiplier applied! {}",
                outcome.multiplier,
                signed_dollars(outcome.amount)
            )
        } else {
            signed_dollars(outcome.amount)
        };
        FeedbackLine::new(text, Tone::Bad)
    };
    lines.push(money);

    if let Some(interest) = outcome.interest {
        lines.push(FeedbackLine::new(
            format!("Loan interest: +${interest}"),
            Tone::Warning,
        ));
    }

    for event in &outcome.power_ups {
        lines.push(match event {
            PowerUpEvent::MoneyBoost => FeedbackLine::new(
                "POWER-UP: Money Boost! Next question gets 2x money!",
                Tone::Good,
            ),
            PowerUpEvent::SkipToken => FeedbackLine::new("POWER-UP: Got a Skip token!", Tone::Good),
            PowerUpEvent::Shield => FeedbackLine::new(
                "RARE POWER-UP: Bankruptcy Shield! It will save you once.",
                Tone::Good,
            ),
            PowerUpEvent::Curse { extra_questions } => FeedbackLine::new(
                format!("CURSE: +{extra_questions} extra questions added!"),
                Tone::Bad,
            ),
        });
    }

    if outcome.shield_used.is_some() {
        lines.push(FeedbackLine::new(
            "SHIELD USED! Protected from negative money. Net worth set to $0",
            Tone::Info,
        ));
    }

    if outcome.bankrupt {
        lines.push(FeedbackLine::new("BANKRUPTCY!", Tone::Bad));
    }

    lines
}

/// Why the loan button is or isn't there.
pub fn loan_offer_text(offer: LoanOffer) -> &'static str {
    match offer {
        LoanOffer::Available => "Need money? Press l to take a loan ($10-$500)",
        LoanOffer::NotNeeded => "No loan needed while your net worth is positive",
        LoanOffer::TooLate => "Cannot take a loan with fewer than 2 questions left",
        LoanOffer::Active => "Loan active: 10% interest per question",
    }
}

/// Lines for the game over screen.
pub fn describe_summary(summary: &GameSummary) -> Vec<FeedbackLine> {
    let mut lines = Vec::new();
    match summary.outcome {
        GameOutcome::Win => lines.push(FeedbackLine::new("Congratulations - You Win!", Tone::Good)),
        GameOutcome::Loss => lines.push(FeedbackLine::new("Game Over - You Lost!", Tone::Bad)),
    }
    lines.push(FeedbackLine::new(
        format!("Final money: {}", dollars(summary.money)),
        Tone::Info,
    ));
    if summary.loan_amount > 0 {
        lines.push(FeedbackLine::new(
            format!("Unpaid loan: {}", dollars(summary.loan_amount)),
            Tone::Warning,
        ));
    }
    lines.push(FeedbackLine::new(
        format!("Net worth: {}", dollars(summary.final_net)),
        if summary.final_net >= 0 { Tone::Good } else { Tone::Bad },
    ));
    lines.push(FeedbackLine::new(
        format!("Questions answered: {}", summary.questions_answered),
        Tone::Info,
    ));
    lines.push(FeedbackLine::new(
        format!("Total bankruptcies: {}", summary.total_bankruptcies),
        Tone::Info,
    ));
    lines
}

/// Error text, with a hint when the API key is the problem.
pub fn describe_error(error: &SessionError) -> String {
    if error.is_credential_error() {
        format!("Error: {error}. Check your GROQ_API_KEY in .env file")
    } else {
        format!("Error: {error}")
    }
}
