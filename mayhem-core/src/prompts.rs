//! Prompts for the question generator

use crate::question::QuestionMode;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a quiz generator. Return ONLY valid JSON with no \
explanations, and never repeat a question within the session.";

/// Range the session nonce is drawn from.
pub const NONCE_RANGE: std::ops::RangeInclusive<u32> = 100_000..=9_999_999;

/// Build the user prompt asking for `count` questions.
///
/// `nonce` only nudges the model away from repeating earlier output.
pub fn build_question_prompt(
    category: &str,
    count: usize,
    mode: QuestionMode,
    nonce: u32,
) -> String {
    let instructions = match mode {
        QuestionMode::WouldYouRather => would_you_rather_instructions(),
        QuestionMode::Custom | QuestionMode::Financial => scenario_instructions(category),
    };

    format!(
        r#"[Session ID: {nonce}]

Generate exactly {count} quiz questions that are COMPLETELY NEW and that you have not produced before.

## Freshness
- Every question must be brand new
- Do not reuse patterns from earlier generations
- Explore a different theme in each question
- Be creative and original

{instructions}

## Options and Money
Every question has exactly 4 options.
- Exactly ONE option has a POSITIVE money_change between +10 and +30 (the best answer)
- The other 3 options have NEGATIVE money_change:
  * close to correct: -10 to -20
  * somewhat wrong: -30 to -50
  * very wrong: -60 to -90
- Give roughly 20% of options a "multiplier" of 1.5, 2.0, 2.5 or 3.0
- Options without a multiplier may omit the field

## Output
Return ONLY a JSON array in this shape:
[
  {{
    "question": "Question text?",
    "options": [
      {{"text": "Best option", "money_change": 20, "multiplier": 2.0}},
      {{"text": "Close option", "money_change": -15}},
      {{"text": "Poor option", "money_change": -40}},
      {{"text": "Worst option", "money_change": -75}}
    ]
  }}
]

Write clear, well-spaced sentences with proper punctuation. Never run words together."#
    )
}

fn would_you_rather_instructions() -> String {
    r#"## Question Style: Would You Rather
- Thought-provoking dilemmas written for ADULTS, never childish
- Moral trade-offs, superpowers with a catch, career and lifestyle gambles
- Time travel, bending reality, awkward social situations played for humor
- No two questions may share a theme

Examples:
- "Would you rather know the date of your death or the cause of it?"
- "Would you rather read minds without an off switch, or teleport but always arrive naked?"
- "Would you rather everyone hear your thoughts, or hear everyone else's?""#
        .to_string()
}

fn scenario_instructions(category: &str) -> String {
    format!(
        r#"## Question Style: Immersive Scenarios about {category}
- Questions live INSIDE the world of {category}; they are NOT about money or finance
- Put the player in the scene: "If YOU were here, what would you do?"
- Build on the choices, dilemmas and situations of {category}
- Do not ask the player to explain "why"
- Each question must be unique

Examples (if the topic were Harry Potter):
- "You catch a classmate cheating with magic during an exam. What do you do?"
- "A Dementor glides toward you. Which memory powers your Patronus?"
- "You find a dangerous creature in the Forbidden Forest. What is your approach?"

NO FINANCIAL QUESTIONS: the money lives in the options, never in the premise."#
    )
}
