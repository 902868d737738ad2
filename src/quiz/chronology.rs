use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::quiz::utils::{extract_number, format_number, normalize, shuffle};
use crate::quiz::{DatasetItem, Draft, Focus, Mode, QuestionGenerator, QuestionKind, QuizError};

const BUILTIN_DATASET: &str = include_str!("../../data/chronology.json");

/// Number of wrong options shown next to the right one.
const DISTRACTORS: usize = 3;

/// An entry of the geologic time scale. Ages are in millions of years ago (Ma).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Era {
    Period { name: String, start: f64, end: f64 },
    Boundary { name: String, age: f64 },
}

impl Era {
    pub fn name(&self) -> &str {
        match self {
            Era::Period { name, .. } | Era::Boundary { name, .. } => name,
        }
    }
}

impl DatasetItem for Era {
    fn kind(&self) -> &str {
        match self {
            Era::Period { .. } => "period",
            Era::Boundary { .. } => "boundary",
        }
    }
}

pub fn load(reader: impl Read) -> Result<Vec<Era>, QuizError> {
    let eras: Vec<Era> = serde_json::from_reader(reader)?;
    if eras.is_empty() {
        return Err(QuizError::EmptyDataset);
    }
    Ok(eras)
}

pub fn load_file(path: &Path) -> Result<Vec<Era>, QuizError> {
    let file = File::open(path)?;
    load(BufReader::new(file))
}

/// The time scale shipped with the crate.
pub fn builtin() -> Result<Vec<Era>, QuizError> {
    load(BUILTIN_DATASET.as_bytes())
}

/// Asks for durations, start and end ages of periods, and ages of boundaries.
///
/// Typed answers are judged numerically: any number within `tolerance` Ma of
/// the expected value counts.
pub struct ChronologyQuiz {
    tolerance: f64,
    ages: Vec<f64>,
    durations: Vec<f64>,
}

impl ChronologyQuiz {
    pub fn new(dataset: &[Era], tolerance: f64) -> Self {
        let mut ages = Vec::new();
        let mut durations = Vec::new();
        for era in dataset {
            match era {
                Era::Period { start, end, .. } => {
                    ages.push(*start);
                    ages.push(*end);
                    durations.push(start - end);
                }
                Era::Boundary { age, .. } => ages.push(*age),
            }
        }
        Self {
            tolerance: tolerance.abs(),
            ages,
            durations,
        }
    }

    fn choices(
        &self,
        kind: QuestionKind,
        value: f64,
        correct: &str,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        let pool = match kind {
            QuestionKind::Dur => &self.durations,
            _ => &self.ages,
        };

        // A wrong option must never pass as the right answer
        let mut wrong: Vec<String> = Vec::new();
        let mut offer = |text: String| {
            if wrong.len() < DISTRACTORS
                && !self.compare_answer(&text, correct)
                && !wrong.contains(&text)
            {
                wrong.push(text);
            }
        };
        for candidate in shuffle(pool, &mut *rng) {
            offer(answer_text(kind, candidate));
        }
        // Small datasets: pad with values spaced well beyond the tolerance
        let step = (value.abs() * 0.25).max(self.tolerance * 2.0 + 1.0);
        for k in 1..=DISTRACTORS {
            offer(answer_text(kind, value + step * k as f64));
        }

        let mut choices = wrong;
        choices.push(correct.to_string());
        choices.shuffle(rng);
        choices
    }
}

fn answer_text(kind: QuestionKind, value: f64) -> String {
    match kind {
        QuestionKind::Dur => format!("{} Myr", format_number(value)),
        _ => format!("{} Ma", format_number(value)),
    }
}

impl QuestionGenerator<Era> for ChronologyQuiz {
    fn make_question(&self, item: &Era, mode: Mode, focus: Focus, rng: &mut dyn RngCore) -> Draft {
        let (kind, value, prompt) = match item {
            Era::Boundary { name, age } => (
                QuestionKind::Boundary,
                *age,
                format!("How many million years ago is the {name} boundary?"),
            ),
            Era::Period { name, start, end } => {
                let kind = match focus {
                    Focus::Dur => QuestionKind::Dur,
                    Focus::Start => QuestionKind::Start,
                    Focus::End => QuestionKind::End,
                    Focus::Boundary | Focus::Mixed => {
                        *[QuestionKind::Dur, QuestionKind::Start, QuestionKind::End]
                            .choose(&mut *rng)
                            .unwrap_or(&QuestionKind::Dur)
                    }
                };
                match kind {
                    QuestionKind::Dur => (
                        kind,
                        start - end,
                        format!("How many million years did the {name} last?"),
                    ),
                    QuestionKind::End => (
                        kind,
                        *end,
                        format!("When did the {name} end (Ma)?"),
                    ),
                    _ => (
                        kind,
                        *start,
                        format!("When did the {name} begin (Ma)?"),
                    ),
                }
            }
        };

        let correct = answer_text(kind, value);
        let draft = Draft::new(kind, prompt, correct.clone())
            .with_badges(vec![kind.label().to_string(), item.name().to_string()]);
        match mode {
            Mode::Multiple => {
                let choices = self.choices(kind, value, &correct, rng);
                draft.with_choices(choices)
            }
            Mode::Text => draft
                .with_placeholder("e.g. 66")
                .with_hint(format!(
                    "Answers within {} million years are accepted",
                    format_number(self.tolerance)
                )),
        }
    }

    fn compare_answer(&self, user_answer: &str, correct_answer: &str) -> bool {
        if normalize(user_answer) == normalize(correct_answer) {
            return true;
        }
        match (extract_number(user_answer), extract_number(correct_answer)) {
            (Some(given), Some(expected)) => (given - expected).abs() <= self.tolerance + 1e-9,
            _ => false,
        }
    }
}
