//! Question records and the validation boundary for model output.
//!
//! The completion API returns loosely structured text. [`parse_questions`]
//! is the only way that text becomes [`Question`] values: it strips an
//! optional Markdown fence, parses JSON, and validates each entry on its own
//! so one malformed question does not sink the batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Every question carries exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Largest money change, either sign, a single option may carry.
pub const MAX_MONEY_CHANGE: i64 = 10_000;

/// Ceiling for an option's multiplier.
pub const MAX_MULTIPLIER: f64 = 10.0;

/// Category sent to the generator for "Would You Rather" games.
pub const WOULD_YOU_RATHER_CATEGORY: &str =
    "fun hypothetical scenarios and would you rather questions";

/// How questions are framed in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionMode {
    WouldYouRather,
    Custom,
    #[default]
    Financial,
}

impl QuestionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionMode::WouldYouRather => "would_you_rather",
            QuestionMode::Custom => "custom",
            QuestionMode::Financial => "financial",
        }
    }

    /// Human-readable name for menus and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionMode::WouldYouRather => "Would You Rather",
            QuestionMode::Custom => "Custom Topic",
            QuestionMode::Financial => "Financial",
        }
    }
}

impl fmt::Display for QuestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "would_you_rather" | "wyr" => Ok(QuestionMode::WouldYouRather),
            "custom" => Ok(QuestionMode::Custom),
            "financial" => Ok(QuestionMode::Financial),
            other => Err(format!("unknown question mode: {other}")),
        }
    }
}

/// One answer choice and its monetary consequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    pub money_change: i64,
    pub multiplier: f64,
}

impl QuestionOption {
    pub fn new(text: impl Into<String>, money_change: i64) -> Self {
        Self {
            text: text.into(),
            money_change,
            multiplier: 1.0,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn new(text: impl Into<String>, options: Vec<QuestionOption>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

/// Why a single entry of the model's array was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("question text is missing or empty")]
    MissingText,

    #[error("expected 4 options, found {0}")]
    WrongOptionCount(usize),

    #[error("option {0} has no text")]
    MissingOptionText(usize),

    #[error("option {option} has a non-finite {field}")]
    NonFiniteNumber { option: usize, field: &'static str },
}

/// Why a whole completion could not be turned into questions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid questions format: expected a JSON array")]
    NotAList,

    #[error("Invalid questions format: the array is empty")]
    EmptyList,

    #[error("none of the {rejected} returned questions passed validation")]
    NoValidQuestions { rejected: usize },
}

/// Remove a surrounding Markdown code fence (with optional `json` tag).
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the opening fence line, which may carry a language tag.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches("json"),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse and validate a completion into at most `count` questions.
pub fn parse_questions(content: &str, count: usize) -> Result<Vec<Question>, ParseError> {
    let json = strip_code_fence(content);
    let value: Value =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let Value::Array(entries) = value else {
        return Err(ParseError::NotAList);
    };
    if entries.is_empty() {
        return Err(ParseError::EmptyList);
    }

    let total = entries.len();
    let mut questions = Vec::with_capacity(total.min(count));
    for (index, entry) in entries.iter().enumerate() {
        match validate_question(entry) {
            Ok(question) => questions.push(question),
            Err(e) => warn!(index, error = %e, "dropping malformed question"),
        }
    }

    if questions.is_empty() {
        return Err(ParseError::NoValidQuestions { rejected: total });
    }

    questions.truncate(count);
    Ok(questions)
}

/// Validate one raw entry of the model's array.
///
/// Text fields are required. `money_change` defaults to 0 and is clamped to
/// ±[`MAX_MONEY_CHANGE`]. `multiplier` defaults to 1.0, a non-positive one
/// falls back to 1.0 and anything above [`MAX_MULTIPLIER`] is clamped.
/// Numeric strings are accepted; non-finite numbers reject the entry.
pub fn validate_question(entry: &Value) -> Result<Question, QuestionError> {
    let object = entry.as_object().ok_or(QuestionError::NotAnObject)?;

    let text = object
        .get("question")
        .or_else(|| object.get("text"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(QuestionError::MissingText)?;

    let raw_options = object
        .get("options")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if raw_options.len() != OPTIONS_PER_QUESTION {
        return Err(QuestionError::WrongOptionCount(raw_options.len()));
    }

    let options = raw_options
        .iter()
        .enumerate()
        .map(|(i, raw)| validate_option(i, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Question::new(text, options))
}

fn validate_option(index: usize, raw: &Value) -> Result<QuestionOption, QuestionError> {
    let text = raw
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(QuestionError::MissingOptionText(index))?;

    let money_change = match finite_field(raw, "money_change", index)? {
        Some(n) => {
            let limit = MAX_MONEY_CHANGE as f64;
            n.trunc().clamp(-limit, limit) as i64
        }
        None => 0,
    };

    let multiplier = finite_field(raw, "multiplier", index)?
        .filter(|m| *m > 0.0)
        .map_or(1.0, |m| m.min(MAX_MULTIPLIER));

    Ok(QuestionOption {
        text: text.to_string(),
        money_change,
        multiplier,
    })
}

fn finite_field(
    raw: &Value,
    field: &'static str,
    option: usize,
) -> Result<Option<f64>, QuestionError> {
    match raw.get(field).and_then(number_field) {
        Some(n) if !n.is_finite() => Err(QuestionError::NonFiniteNumber { option, field }),
        other => Ok(other),
    }
}

fn number_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('+').parse().ok(),
        _ => None,
    }
}
