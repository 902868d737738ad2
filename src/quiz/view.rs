//! Pure projection of a session into what a screen should show.
//!
//! Nothing here touches a terminal or any other surface; renderers take a
//! [`View`] and draw it.

use rand::RngCore;

use crate::quiz::scoring::ResultRecord;
use crate::quiz::session::{Phase, Session};
use crate::quiz::{DatasetItem, Mode, QuizConfig};

pub const NEXT_LABEL: &str = "Next";
pub const FINISH_LABEL: &str = "Show results";
pub const EXIT_MESSAGE: &str =
    "Finish now and see your results? Unanswered questions will be counted as incorrect.";
pub const DEFAULT_PLACEHOLDER: &str = "Type your answer";

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Configuring(QuizConfig),
    Question(QuestionView),
    Results(ResultsView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceView {
    /// Quick-select key, 1-based
    pub key: usize,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    /// 1-based position
    pub position: usize,
    pub total: usize,
    /// Fraction of the run reached, 0.0 to 1.0
    pub progress: f64,
    pub kind_label: &'static str,
    pub prompt: String,
    pub badges: Vec<String>,
    pub hint: Option<String>,
    pub mode: Mode,
    pub choices: Vec<ChoiceView>,
    /// Text previously typed for a text question
    pub text: String,
    pub placeholder: String,
    pub next_label: &'static str,
    /// Present while an exit waits for confirmation
    pub confirm_exit: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub score_line: String,
    pub percent: u32,
    /// Empty means the wrong section is hidden
    pub wrong: Vec<ResultRecord>,
    pub review_wrong_enabled: bool,
    /// Present once the user asked to see every answer
    pub all: Option<Vec<ResultRecord>>,
}

pub fn project<T: DatasetItem, R: RngCore>(session: &Session<T, R>) -> View {
    match session.phase() {
        Phase::Configuring => View::Configuring(session.config().clone()),
        Phase::InProgress | Phase::ConfirmingExit => match session.current_question() {
            Some(_) => View::Question(question_view(session)),
            None => View::Configuring(session.config().clone()),
        },
        Phase::Reviewing { show_all } => {
            let report = session.report();
            let wrong: Vec<ResultRecord> = report.wrong().cloned().collect();
            View::Results(ResultsView {
                score_line: report.score_line(),
                percent: report.percent,
                review_wrong_enabled: !wrong.is_empty(),
                wrong,
                all: show_all.then(|| report.records.clone()),
            })
        }
    }
}

fn question_view<T: DatasetItem, R: RngCore>(session: &Session<T, R>) -> QuestionView {
    let total = session.questions().len();
    let index = session.current_index();
    let q = &session.questions()[index];
    let answer = session.answers().get(q.id());

    let choices = q
        .choices()
        .iter()
        .enumerate()
        .map(|(i, c)| ChoiceView {
            key: i + 1,
            text: c.clone(),
            selected: answer == Some(c.as_str()),
        })
        .collect();

    QuestionView {
        position: index + 1,
        total,
        progress: (index + 1) as f64 / total as f64,
        kind_label: q.kind().label(),
        prompt: q.prompt().to_string(),
        badges: q.badges().to_vec(),
        hint: q.hint().map(str::to_string),
        mode: q.mode(),
        choices,
        text: match q.mode() {
            Mode::Text => answer.unwrap_or_default().to_string(),
            Mode::Multiple => String::new(),
        },
        placeholder: q.placeholder().unwrap_or(DEFAULT_PLACEHOLDER).to_string(),
        next_label: if session.is_last_question() {
            FINISH_LABEL
        } else {
            NEXT_LABEL
        },
        confirm_exit: (session.phase() == Phase::ConfirmingExit).then_some(EXIT_MESSAGE),
    }
}
