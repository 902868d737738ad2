use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use rand::RngCore;

use crate::quiz::generator::{build_questions, rebuild_questions, QuestionGenerator};
use crate::quiz::scoring::{score, Report};
use crate::quiz::{DatasetItem, Mode, Question, QuestionId, QuizConfig, QuizError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Configuring,
    InProgress,
    /// Exit was requested and waits for the user to confirm or cancel.
    ConfirmingExit,
    Reviewing {
        show_all: bool,
    },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Configuring => "configuring",
            Phase::InProgress => "in progress",
            Phase::ConfirmingExit => "confirming exit",
            Phase::Reviewing { .. } => "reviewing",
        })
    }
}

/// Submitted answers by question id. A missing entry means unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: HashMap<QuestionId, String>,
}

impl AnswerSheet {
    pub fn record(&mut self, id: QuestionId, answer: impl Into<String>) {
        self.answers.insert(id, answer.into());
    }

    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.answers.get(&id).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// One quiz widget's state: the current run, the position in it and the answers given.
///
/// All transitions are synchronous. An event that the current phase does not
/// accept returns [`QuizError::InvalidTransition`] and leaves the state untouched.
pub struct Session<T, R> {
    dataset: Vec<T>,
    generator: Option<Box<dyn QuestionGenerator<T>>>,
    rng: R,
    config: QuizConfig,
    questions: Vec<Question>,
    index: usize,
    answers: AnswerSheet,
    phase: Phase,
}

impl<T: DatasetItem, R: RngCore> Session<T, R> {
    pub fn new(dataset: Vec<T>, rng: R) -> Self {
        Self {
            dataset,
            generator: None,
            rng,
            config: QuizConfig::default(),
            questions: Vec::new(),
            index: 0,
            answers: AnswerSheet::default(),
            phase: Phase::Configuring,
        }
    }

    pub fn with_generator(mut self, generator: impl QuestionGenerator<T> + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn dataset(&self) -> &[T] {
        &self.dataset
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    /// Starts a fresh run. Allowed from any phase; position and answers are reset.
    pub fn start(&mut self, config: QuizConfig) -> Result<(), QuizError> {
        let questions = build_questions(
            &self.dataset,
            &config,
            self.generator.as_deref(),
            &mut self.rng,
        )?;
        info!(
            "Starting quiz: {} questions, mode {}, scope {}",
            questions.len(),
            config.mode,
            config.scope
        );
        self.config = config;
        self.begin_run(questions);
        Ok(())
    }

    /// Starts again with the last configuration.
    pub fn restart(&mut self) -> Result<(), QuizError> {
        self.start(self.config.clone())
    }

    pub fn advance(&mut self) -> Result<(), QuizError> {
        self.require(self.phase == Phase::InProgress, "next")?;
        if self.index + 1 < self.questions.len() {
            self.index += 1;
            debug!("Moved to question {}", self.index + 1);
        } else {
            self.finish();
        }
        Ok(())
    }

    pub fn previous(&mut self) -> Result<(), QuizError> {
        self.require(self.phase == Phase::InProgress, "previous")?;
        self.index = self.index.saturating_sub(1);
        debug!("Moved to question {}", self.index + 1);
        Ok(())
    }

    /// Jumps to a question, clamped to the run.
    pub fn go_to(&mut self, index: usize) -> Result<(), QuizError> {
        self.require(self.phase == Phase::InProgress, "go to")?;
        self.index = index.min(self.questions.len().saturating_sub(1));
        debug!("Moved to question {}", self.index + 1);
        Ok(())
    }

    pub fn request_exit(&mut self) -> Result<(), QuizError> {
        self.require(self.phase == Phase::InProgress, "exit")?;
        self.phase = Phase::ConfirmingExit;
        Ok(())
    }

    /// Leaves the run early. Unanswered questions are scored as wrong.
    pub fn confirm_exit(&mut self) -> Result<(), QuizError> {
        self.require(self.phase == Phase::ConfirmingExit, "confirm exit")?;
        self.finish();
        Ok(())
    }

    pub fn cancel_exit(&mut self) -> Result<(), QuizError> {
        self.require(self.phase == Phase::ConfirmingExit, "cancel exit")?;
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Records (or overwrites) the answer to the current question. Does not move on.
    pub fn submit_answer(&mut self, answer: impl Into<String>) -> Result<(), QuizError> {
        self.require(self.phase == Phase::InProgress, "answer")?;
        let id = match self.current_question() {
            Some(q) => q.id(),
            None => return Err(self.rejected("answer")),
        };
        let answer = answer.into();
        debug!("Answer for {}: {:?}", id, answer);
        self.answers.record(id, answer);
        Ok(())
    }

    /// Picks one of the displayed choices by value. Returns whether it was recorded.
    pub fn select_choice(&mut self, value: &str) -> Result<bool, QuizError> {
        self.require(self.phase == Phase::InProgress, "select")?;
        let known = self
            .current_question()
            .map(|q| q.mode() == Mode::Multiple && q.choices().iter().any(|c| c == value))
            .unwrap_or(false);
        if known {
            self.submit_answer(value)?;
        }
        Ok(known)
    }

    /// Picks the n-th displayed choice (1-based, keys 1 to 4). Ignored for text questions.
    pub fn quick_select(&mut self, n: usize) -> Result<bool, QuizError> {
        self.require(self.phase == Phase::InProgress, "quick select")?;
        let choice = self
            .current_question()
            .filter(|q| q.mode() == Mode::Multiple && (1..=4).contains(&n))
            .and_then(|q| q.choices().get(n - 1))
            .cloned();
        match choice {
            Some(choice) => {
                self.submit_answer(choice)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Records typed text for a text question. Surrounding whitespace is dropped.
    pub fn text_input(&mut self, text: &str) -> Result<bool, QuizError> {
        self.require(self.phase == Phase::InProgress, "text input")?;
        let is_text = self
            .current_question()
            .map(|q| q.mode() == Mode::Text)
            .unwrap_or(false);
        if is_text {
            self.submit_answer(text.trim())?;
        }
        Ok(is_text)
    }

    /// Scores the current run against the latest answers.
    pub fn report(&self) -> Report {
        match self.generator.as_deref() {
            Some(generator) => score(&self.questions, &self.answers, |user, correct| {
                generator.compare_answer(user, correct)
            }),
            None => score(&self.questions, &self.answers, |user, correct| user == correct),
        }
    }

    /// Replays only the items answered wrong or left unanswered.
    ///
    /// Returns `Ok(false)` and stays on the results when nothing was wrong.
    pub fn review_wrong(&mut self) -> Result<bool, QuizError> {
        self.require(matches!(self.phase, Phase::Reviewing { .. }), "review wrong")?;
        let items = self.report().wrong_items();
        if items.is_empty() {
            return Ok(false);
        }
        let questions = rebuild_questions(
            &self.dataset,
            &items,
            self.config.mode,
            self.config.focus(),
            self.generator.as_deref(),
            &mut self.rng,
        )?;
        info!("Reviewing {} wrong answers", questions.len());
        self.begin_run(questions);
        Ok(true)
    }

    pub fn review_all(&mut self) -> Result<(), QuizError> {
        self.require(matches!(self.phase, Phase::Reviewing { .. }), "review all")?;
        self.phase = Phase::Reviewing { show_all: true };
        Ok(())
    }

    /// Back to configuration. The run is discarded; the last configuration is kept.
    pub fn new_quiz(&mut self) -> Result<(), QuizError> {
        self.require(matches!(self.phase, Phase::Reviewing { .. }), "new quiz")?;
        self.questions.clear();
        self.answers.clear();
        self.index = 0;
        self.phase = Phase::Configuring;
        Ok(())
    }

    fn begin_run(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.index = 0;
        self.answers.clear();
        self.phase = Phase::InProgress;
    }

    fn finish(&mut self) {
        self.phase = Phase::Reviewing { show_all: false };
        let report = self.report();
        info!(
            "Quiz finished: {} ({}%)",
            report.score_line(),
            report.percent
        );
    }

    fn require(&self, allowed: bool, event: &'static str) -> Result<(), QuizError> {
        if allowed {
            Ok(())
        } else {
            Err(self.rejected(event))
        }
    }

    fn rejected(&self, event: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            event,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::generator::tests::{items, EchoGenerator, Item};
    use crate::quiz::{Scope, Status};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(dataset: Vec<Item>) -> Session<Item, StdRng> {
        Session::new(dataset, StdRng::seed_from_u64(17)).with_generator(EchoGenerator)
    }

    fn answer_correctly(s: &mut Session<Item, StdRng>) {
        let correct = s.current_question().unwrap().correct().to_string();
        s.submit_answer(correct).unwrap();
    }

    #[test]
    fn start_resets_position_and_answers() {
        let mut s = session(items("period", 8));
        s.start(QuizConfig::new(Mode::Text, 6, Scope::Periods)).unwrap();
        answer_correctly(&mut s);
        s.advance().unwrap();
        s.advance().unwrap();
        assert_eq!(s.current_index(), 2);

        s.start(QuizConfig::new(Mode::Text, 6, Scope::Periods)).unwrap();
        assert_eq!(s.current_index(), 0);
        assert!(s.answers().is_empty());
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn advancing_past_the_last_question_shows_results() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Multiple, 5, Scope::Mixed)).unwrap();
        for _ in 0..4 {
            s.advance().unwrap();
        }
        assert!(s.is_last_question());
        assert_eq!(s.phase(), Phase::InProgress);
        s.advance().unwrap();
        assert_eq!(s.phase(), Phase::Reviewing { show_all: false });
        assert!(s.advance().is_err());
    }

    #[test]
    fn cancelled_exit_leaves_state_alone() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::default()).unwrap();
        s.advance().unwrap();
        answer_correctly(&mut s);
        s.request_exit().unwrap();
        assert!(s.submit_answer("x").is_err());
        assert!(s.advance().is_err());
        s.cancel_exit().unwrap();
        assert_eq!(s.phase(), Phase::InProgress);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn confirmed_exit_counts_unanswered_as_wrong() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Text, 5, Scope::Mixed)).unwrap();
        answer_correctly(&mut s);
        s.request_exit().unwrap();
        s.confirm_exit().unwrap();
        let report = s.report();
        assert_eq!(report.score_line(), "1 / 5");
        assert_eq!(report.wrong_count(), 4);
        assert!(report.wrong().all(|r| r.status == Status::Unanswered));
    }

    #[test]
    fn navigation_keeps_answers() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Multiple, 5, Scope::Mixed)).unwrap();
        assert!(s.quick_select(3).unwrap());
        let chosen = s.answers().get(s.current_question().unwrap().id()).map(str::to_string);
        s.advance().unwrap();
        s.advance().unwrap();
        s.go_to(0).unwrap();
        let restored = s.answers().get(s.current_question().unwrap().id()).map(str::to_string);
        assert_eq!(chosen, restored);
        assert_eq!(restored.as_deref(), Some("wrong-b"));
    }

    #[test]
    fn quick_select_ignores_text_questions_and_missing_choices() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Text, 5, Scope::Mixed)).unwrap();
        assert!(!s.quick_select(1).unwrap());
        assert!(s.answers().is_empty());

        s.start(QuizConfig::new(Mode::Multiple, 5, Scope::Mixed)).unwrap();
        assert!(!s.quick_select(5).unwrap());
        assert!(!s.quick_select(0).unwrap());
        assert!(s.answers().is_empty());
    }

    #[test]
    fn select_choice_requires_a_displayed_value() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Multiple, 5, Scope::Mixed)).unwrap();
        assert!(!s.select_choice("not offered").unwrap());
        assert!(s.select_choice("wrong-a").unwrap());
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn text_input_is_trimmed() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Text, 5, Scope::Mixed)).unwrap();
        assert!(s.text_input("  period-1 ").unwrap());
        let id = s.current_question().unwrap().id();
        assert_eq!(s.answers().get(id), Some("period-1"));
    }

    #[test]
    fn review_wrong_replays_exactly_the_wrong_items() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Text, 5, Scope::Mixed)).unwrap();
        answer_correctly(&mut s);
        s.advance().unwrap();
        s.submit_answer("nonsense").unwrap();
        s.advance().unwrap();
        answer_correctly(&mut s);
        s.request_exit().unwrap();
        s.confirm_exit().unwrap();

        let wrong = s.report().wrong_items();
        assert_eq!(wrong.len(), 3);
        assert!(s.review_wrong().unwrap());
        assert_eq!(s.phase(), Phase::InProgress);
        assert!(s.answers().is_empty());
        let replayed: Vec<usize> = s.questions().iter().map(|q| q.item()).collect();
        assert_eq!(replayed, wrong);
        assert_eq!(s.config().mode, Mode::Text);
    }

    #[test]
    fn review_wrong_with_nothing_wrong_is_a_no_op() {
        let mut s = session(items("boundary", 5));
        s.start(QuizConfig::new(Mode::Multiple, 5, Scope::Bounds)).unwrap();
        for _ in 0..5 {
            answer_correctly(&mut s);
            s.advance().unwrap();
        }
        let before = s.questions().to_vec();
        assert!(!s.review_wrong().unwrap());
        assert_eq!(s.phase(), Phase::Reviewing { show_all: false });
        assert_eq!(s.questions(), before.as_slice());
    }

    #[test]
    fn report_tracks_answers_given_after_results() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::new(Mode::Text, 5, Scope::Mixed)).unwrap();
        assert_eq!(s.report().correct, 0);
        answer_correctly(&mut s);
        assert_eq!(s.report().correct, 1);
    }

    #[test]
    fn new_quiz_discards_the_run_but_keeps_config() {
        let mut s = session(items("period", 5));
        let config = QuizConfig::new(Mode::Text, 7, Scope::Ends);
        s.start(config.clone()).unwrap();
        assert!(s.new_quiz().is_err());
        s.request_exit().unwrap();
        s.confirm_exit().unwrap();
        s.review_all().unwrap();
        assert_eq!(s.phase(), Phase::Reviewing { show_all: true });
        s.new_quiz().unwrap();
        assert_eq!(s.phase(), Phase::Configuring);
        assert!(s.questions().is_empty());
        assert_eq!(s.config(), &config);
    }

    #[test]
    fn start_clamps_an_out_of_range_count() {
        let mut s = session(items("period", 5));
        let mut config = QuizConfig::default();
        config.count = 0;
        s.start(config).unwrap();
        assert_eq!(s.questions().len(), crate::quiz::MIN_COUNT);
        assert_eq!(s.report().score_line(), "0 / 5");
    }

    #[test]
    fn failed_start_keeps_previous_state() {
        let mut s = session(items("period", 5));
        s.start(QuizConfig::default()).unwrap();
        answer_correctly(&mut s);
        let err = s.start(QuizConfig::new(Mode::Text, 5, Scope::Bounds)).unwrap_err();
        assert!(matches!(err, QuizError::EmptyPool { .. }));
        assert_eq!(s.answers().len(), 1);
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn session_without_generator_cannot_start() {
        let mut s: Session<Item, StdRng> =
            Session::new(items("period", 5), StdRng::seed_from_u64(1));
        assert!(matches!(s.start(QuizConfig::default()), Err(QuizError::GeneratorMissing)));
        assert_eq!(s.phase(), Phase::Configuring);
    }
}
