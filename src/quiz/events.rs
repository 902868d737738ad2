use rand::RngCore;

use crate::quiz::session::Session;
use crate::quiz::{DatasetItem, QuizConfig, QuizError};

/// User interactions the presentation layer reports back into a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start(QuizConfig),
    Next,
    Previous,
    GoTo(usize),
    ExitRequest,
    ExitConfirm,
    ExitCancel,
    Select(String),
    TextInput(String),
    /// Number key 1 to 4
    QuickSelect(usize),
    Restart,
    NewQuiz,
    ReviewWrong,
    ReviewAll,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start(_) => "start",
            Event::Next => "next",
            Event::Previous => "previous",
            Event::GoTo(_) => "go to",
            Event::ExitRequest => "exit",
            Event::ExitConfirm => "confirm exit",
            Event::ExitCancel => "cancel exit",
            Event::Select(_) => "select",
            Event::TextInput(_) => "text input",
            Event::QuickSelect(_) => "quick select",
            Event::Restart => "restart",
            Event::NewQuiz => "new quiz",
            Event::ReviewWrong => "review wrong",
            Event::ReviewAll => "review all",
        }
    }
}

impl<T: DatasetItem, R: RngCore> Session<T, R> {
    /// Applies one event. Events are handled strictly one at a time.
    pub fn dispatch(&mut self, event: Event) -> Result<(), QuizError> {
        match event {
            Event::Start(config) => self.start(config),
            Event::Next => self.advance(),
            Event::Previous => self.previous(),
            Event::GoTo(index) => self.go_to(index),
            Event::ExitRequest => self.request_exit(),
            Event::ExitConfirm => self.confirm_exit(),
            Event::ExitCancel => self.cancel_exit(),
            Event::Select(value) => self.select_choice(&value).map(|_| ()),
            Event::TextInput(text) => self.text_input(&text).map(|_| ()),
            Event::QuickSelect(n) => self.quick_select(n).map(|_| ()),
            Event::Restart => self.restart(),
            Event::NewQuiz => self.new_quiz(),
            Event::ReviewWrong => self.review_wrong().map(|_| ()),
            Event::ReviewAll => self.review_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::generator::tests::{items, EchoGenerator};
    use crate::quiz::{Mode, Phase, Scope};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn full_round_through_events() {
        let mut s = Session::new(items("boundary", 5), StdRng::seed_from_u64(4))
            .with_generator(EchoGenerator);
        s.dispatch(Event::Start(QuizConfig::new(Mode::Multiple, 5, Scope::Bounds)))
            .unwrap();
        for _ in 0..5 {
            s.dispatch(Event::QuickSelect(2)).unwrap();
            s.dispatch(Event::Next).unwrap();
        }
        assert_eq!(s.phase(), Phase::Reviewing { show_all: false });
        assert_eq!(s.report().correct, 0);

        s.dispatch(Event::ReviewWrong).unwrap();
        assert_eq!(s.questions().len(), 5);
        s.dispatch(Event::ExitRequest).unwrap();
        s.dispatch(Event::ExitConfirm).unwrap();
        s.dispatch(Event::Restart).unwrap();
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn rejected_event_names_itself() {
        let mut s = Session::new(items("period", 5), StdRng::seed_from_u64(4))
            .with_generator(EchoGenerator);
        let err = s.dispatch(Event::ReviewAll).unwrap_err();
        assert_eq!(err.to_string(), "'review all' is not allowed while configuring");
    }
}
