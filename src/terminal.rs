//! Line-based terminal front end: draws a [`View`] and turns typed lines into events.

use std::fmt;

use crate::quiz::scoring::ResultRecord;
use crate::quiz::view::{QuestionView, ResultsView, View};
use crate::quiz::{Event, Mode, QuizConfig};

const BAR_WIDTH: usize = 20;

/// Raw configuration inputs, kept as typed so bad values are recovered only at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigForm {
    pub mode: String,
    pub count: String,
    pub scope: String,
}

impl ConfigForm {
    pub fn new(
        mode: impl Into<String>,
        count: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            count: count.into(),
            scope: scope.into(),
        }
    }

    pub fn config(&self) -> QuizConfig {
        QuizConfig::from_inputs(&self.mode, &self.count, &self.scope)
    }

    /// Sets one field by name. Returns false for an unknown field.
    pub fn set(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            "mode" => &mut self.mode,
            "count" => &mut self.count,
            "scope" => &mut self.scope,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Events(Vec<Event>),
    EditForm { field: String, value: String },
    Quit,
    Unknown(String),
}

/// Maps one typed line to what it means on the current screen.
///
/// An empty line is the Enter key.
pub fn interpret(line: &str, view: &View, form: &ConfigForm) -> Input {
    let line = line.trim();
    match view {
        View::Configuring(_) => match line {
            "" | "s" | "start" => Input::Events(vec![Event::Start(form.config())]),
            "q" | "quit" => Input::Quit,
            _ => match line.split_once(' ') {
                Some((field @ ("mode" | "count" | "scope"), value)) => Input::EditForm {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                },
                _ => Input::Unknown(line.to_string()),
            },
        },
        View::Question(q) if q.confirm_exit.is_some() => match line {
            "y" | "yes" => Input::Events(vec![Event::ExitConfirm]),
            "" | "n" | "no" => Input::Events(vec![Event::ExitCancel]),
            _ => Input::Unknown(line.to_string()),
        },
        View::Question(q) => interpret_answer(line, q),
        View::Results(_) => match line {
            "r" | "restart" => Input::Events(vec![Event::Restart]),
            "n" | "new" => Input::Events(vec![Event::NewQuiz]),
            "w" | "wrong" => Input::Events(vec![Event::ReviewWrong]),
            "a" | "all" => Input::Events(vec![Event::ReviewAll]),
            "q" | "quit" => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        },
    }
}

fn interpret_answer(line: &str, q: &QuestionView) -> Input {
    match line {
        "" | ":next" | ">" => return Input::Events(vec![Event::Next]),
        ":prev" | "<" => return Input::Events(vec![Event::Previous]),
        ":exit" | ":q" => return Input::Events(vec![Event::ExitRequest]),
        _ => {}
    }
    if let Some(n) = line.strip_prefix(":go ") {
        return match n.trim().parse::<usize>() {
            Ok(n) if n > 0 => Input::Events(vec![Event::GoTo(n - 1)]),
            _ => Input::Unknown(line.to_string()),
        };
    }
    match q.mode {
        Mode::Multiple => {
            if let Ok(key @ 1..=4) = line.parse::<usize>() {
                return Input::Events(vec![Event::QuickSelect(key)]);
            }
            match q.choices.iter().find(|c| c.text == line) {
                Some(choice) => Input::Events(vec![Event::Select(choice.text.clone())]),
                None => Input::Unknown(line.to_string()),
            }
        }
        // Typing an answer and pressing Enter
        Mode::Text => Input::Events(vec![Event::TextInput(line.to_string()), Event::Next]),
    }
}

/// A full screen for one view.
pub struct Screen<'a> {
    pub view: &'a View,
    pub form: &'a ConfigForm,
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.view {
            View::Configuring(_) => render_config(f, self.form),
            View::Question(q) => render_question(f, q),
            View::Results(r) => render_results(f, r),
        }
    }
}

fn render_config(f: &mut fmt::Formatter<'_>, form: &ConfigForm) -> fmt::Result {
    writeln!(f, "=== Geologic time quiz ===")?;
    writeln!(f, "  mode  : {}  (multiple | text)", form.mode)?;
    writeln!(f, "  count : {}  (5 to 50)", form.count)?;
    writeln!(f, "  scope : {}  (periods | starts | ends | bounds | mixed)", form.scope)?;
    writeln!(f)?;
    write!(f, "Enter to start, '<field> <value>' to change, 'q' to quit: ")
}

fn render_question(f: &mut fmt::Formatter<'_>, q: &QuestionView) -> fmt::Result {
    let filled = ((q.progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    writeln!(
        f,
        "[{}{}] {} / {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        q.position,
        q.total
    )?;
    write!(f, "({})", q.kind_label)?;
    for badge in &q.badges {
        write!(f, " [{badge}]")?;
    }
    writeln!(f)?;
    writeln!(f, "{}", q.prompt)?;

    match q.mode {
        Mode::Multiple => {
            for choice in &q.choices {
                let mark = if choice.selected { '*' } else { ' ' };
                writeln!(f, " {mark} {}. {}", choice.key, choice.text)?;
            }
        }
        Mode::Text => {
            if q.text.is_empty() {
                writeln!(f, "  answer: <{}>", q.placeholder)?;
            } else {
                writeln!(f, "  answer: {}", q.text)?;
            }
        }
    }
    if let Some(hint) = &q.hint {
        writeln!(f, "  hint: {hint}")?;
    }

    if let Some(message) = q.confirm_exit {
        writeln!(f)?;
        return write!(f, "{message} [y/N]: ");
    }
    writeln!(f)?;
    write!(f, "Enter: {} | '<' back | ':exit' finish early > ", q.next_label)
}

fn render_results(f: &mut fmt::Formatter<'_>, r: &ResultsView) -> fmt::Result {
    writeln!(f, "=== Results ===")?;
    writeln!(f, "Score: {}", r.score_line)?;
    writeln!(f, "Correct: {}%", r.percent)?;

    if !r.wrong.is_empty() {
        writeln!(f)?;
        writeln!(f, "-- Wrong answers --")?;
        for record in &r.wrong {
            render_record(f, record)?;
        }
    }
    if let Some(all) = &r.all {
        writeln!(f)?;
        writeln!(f, "-- All answers --")?;
        for record in all {
            render_record(f, record)?;
        }
    }

    writeln!(f)?;
    if r.review_wrong_enabled {
        write!(f, "'w' review wrong | ")?;
    }
    write!(f, "'a' all answers | 'r' restart | 'n' new quiz | 'q' quit > ")
}

fn render_record(f: &mut fmt::Formatter<'_>, record: &ResultRecord) -> fmt::Result {
    writeln!(f, "Q{} [{}] {}", record.number, record.status, record.prompt)?;
    writeln!(f, "    your answer: {}", record.user_answer)?;
    writeln!(f, "    correct:     {}", record.correct_answer)
}
