pub mod chronology;
pub mod error;
pub mod events;
pub mod generator;
pub mod scoring;
pub mod session;
pub mod utils;
pub mod view;

use std::fmt;

pub use error::QuizError;
pub use events::Event;
pub use generator::{build_questions, QuestionGenerator};
pub use scoring::{score, Report, ResultRecord, Status};
pub use session::{AnswerSheet, Phase, Session};

pub const MIN_COUNT: usize = 5;
pub const MAX_COUNT: usize = 50;
pub const DEFAULT_COUNT: usize = 12;

/// Anything a quiz can be generated from. The `kind` tag drives scope filtering.
pub trait DatasetItem {
    fn kind(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Multiple,
    Text,
}

impl Mode {
    /// Reads the mode input. Anything but "text" is multiple choice.
    pub fn from_input(raw: &str) -> Self {
        match raw.trim() {
            "text" => Mode::Text,
            _ => Mode::Multiple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Multiple => "multiple",
            Mode::Text => "text",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-selected dataset filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Periods,
    Starts,
    Ends,
    Bounds,
    #[default]
    Mixed,
}

impl Scope {
    pub fn from_input(raw: &str) -> Self {
        match raw.trim() {
            "periods" => Scope::Periods,
            "starts" => Scope::Starts,
            "ends" => Scope::Ends,
            "bounds" => Scope::Bounds,
            _ => Scope::Mixed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Periods => "periods",
            Scope::Starts => "starts",
            Scope::Ends => "ends",
            Scope::Bounds => "bounds",
            Scope::Mixed => "mixed",
        }
    }

    pub fn focus(&self) -> Focus {
        match self {
            Scope::Periods => Focus::Dur,
            Scope::Starts => Focus::Start,
            Scope::Ends => Focus::End,
            Scope::Bounds => Focus::Boundary,
            Scope::Mixed => Focus::Mixed,
        }
    }

    /// Whether an item of the given kind is eligible under this scope.
    pub fn admits(&self, kind: &str) -> bool {
        match self {
            Scope::Bounds => kind == "boundary",
            Scope::Periods | Scope::Starts | Scope::Ends => kind == "period",
            Scope::Mixed => true,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which aspect of an item a question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Dur,
    Start,
    End,
    Boundary,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Dur,
    Start,
    End,
    Boundary,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Dur => "dur",
            QuestionKind::Start => "start",
            QuestionKind::End => "end",
            QuestionKind::Boundary => "boundary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Dur => "Duration",
            QuestionKind::Start => "Start",
            QuestionKind::End => "End",
            QuestionKind::Boundary => "Boundary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizConfig {
    pub mode: Mode,
    pub count: usize,
    pub scope: Scope,
}

impl QuizConfig {
    pub fn new(mode: Mode, count: usize, scope: Scope) -> Self {
        Self {
            mode,
            count: count.clamp(MIN_COUNT, MAX_COUNT),
            scope,
        }
    }

    /// Builds a configuration from raw form inputs, recovering from bad values.
    pub fn from_inputs(mode: &str, count: &str, scope: &str) -> Self {
        Self {
            mode: Mode::from_input(mode),
            count: parse_count(count),
            scope: Scope::from_input(scope),
        }
    }

    pub fn focus(&self) -> Focus {
        self.scope.focus()
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::new(Mode::default(), DEFAULT_COUNT, Scope::default())
    }
}

/// Reads the leading integer of a count input the way a form field would.
/// Missing digits fall back to the default; the result is always in range.
pub fn parse_count(raw: &str) -> usize {
    let raw = raw.trim();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return DEFAULT_COUNT;
    }
    if negative {
        return MIN_COUNT;
    }
    digits
        .parse::<usize>()
        .unwrap_or(MAX_COUNT)
        .clamp(MIN_COUNT, MAX_COUNT)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct QuestionId(pub usize);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// What a generator produces for one item. The engine turns it into a [`Question`].
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub kind: QuestionKind,
    pub prompt: String,
    pub correct: String,
    pub choices: Vec<String>,
    pub placeholder: Option<String>,
    pub hint: Option<String>,
    pub badges: Vec<String>,
}

impl Draft {
    pub fn new(kind: QuestionKind, prompt: String, correct: String) -> Self {
        Self {
            kind,
            prompt,
            correct,
            choices: Vec::new(),
            placeholder: None,
            hint: None,
            badges: Vec::new(),
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_badges(mut self, badges: Vec<String>) -> Self {
        self.badges = badges;
        self
    }
}

/// One question of a run. Immutable once built.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    mode: Mode,
    prompt: String,
    correct: String,
    choices: Vec<String>,
    placeholder: Option<String>,
    hint: Option<String>,
    badges: Vec<String>,
    // Index of the originating dataset item
    item: usize,
}

impl Question {
    pub fn new(id: QuestionId, item: usize, mode: Mode, draft: Draft) -> Self {
        let choices = match mode {
            Mode::Multiple => draft.choices,
            Mode::Text => Vec::new(),
        };
        Self {
            id,
            kind: draft.kind,
            mode,
            prompt: draft.prompt,
            correct: draft.correct,
            choices,
            placeholder: draft.placeholder,
            hint: draft.hint,
            badges: draft.badges,
            item,
        }
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
    pub fn correct(&self) -> &str {
        &self.correct
    }
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
    pub fn badges(&self) -> &[String] {
        &self.badges
    }
    pub fn item(&self) -> usize {
        self.item
    }
}
