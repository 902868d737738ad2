use std::fmt;

use crate::quiz::session::AnswerSheet;
use crate::quiz::{Question, QuestionId};

/// Shown in place of the user's answer when a question was skipped.
pub const UNANSWERED: &str = "(unanswered)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Correct,
    Incorrect,
    Unanswered,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Correct => "correct",
            Status::Incorrect => "incorrect",
            Status::Unanswered => "unanswered",
        })
    }
}

/// Outcome of a single question. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResultRecord {
    /// 1-based position in the run
    pub number: usize,
    pub question_id: QuestionId,
    pub item: usize,
    pub prompt: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Report {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
    pub records: Vec<ResultRecord>,
}

impl Report {
    /// Every record that is not correct, unanswered ones included, in run order.
    pub fn wrong(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(|r| r.status != Status::Correct)
    }

    pub fn wrong_count(&self) -> usize {
        self.wrong().count()
    }

    pub fn all(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Dataset items behind the wrong answers, for a replay run.
    pub fn wrong_items(&self) -> Vec<usize> {
        self.wrong().map(|r| r.item).collect()
    }

    pub fn score_line(&self) -> String {
        format!("{} / {}", self.correct, self.total)
    }
}

/// Rounds `correct / total` to a whole percentage, halves rounding up.
pub fn percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Scores `questions` against the current answers.
///
/// A question counts as answered only if its answer is non-empty after trimming.
pub fn score<F>(questions: &[Question], answers: &AnswerSheet, compare: F) -> Report
where
    F: Fn(&str, &str) -> bool,
{
    let records: Vec<ResultRecord> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let given = answers.get(q.id()).filter(|a| !a.trim().is_empty());
            let (user_answer, is_correct, status) = match given {
                Some(answer) => {
                    let is_correct = compare(answer, q.correct());
                    let status = if is_correct {
                        Status::Correct
                    } else {
                        Status::Incorrect
                    };
                    (answer.to_string(), is_correct, status)
                }
                None => (UNANSWERED.to_string(), false, Status::Unanswered),
            };
            ResultRecord {
                number: i + 1,
                question_id: q.id(),
                item: q.item(),
                prompt: q.prompt().to_string(),
                user_answer,
                correct_answer: q.correct().to_string(),
                is_correct,
                status,
            }
        })
        .collect();

    let correct = records.iter().filter(|r| r.is_correct).count();
    let total = questions.len();
    Report {
        correct,
        total,
        percent: percent(correct, total),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Draft, Mode, QuestionKind};

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                let draft = Draft::new(QuestionKind::Start, format!("Q{i}"), format!("A{i}"));
                Question::new(QuestionId(i), i, Mode::Text, draft)
            })
            .collect()
    }

    fn exact(a: &str, b: &str) -> bool {
        a == b
    }

    #[test]
    fn seven_of_twelve_is_58_percent() {
        let qs = questions(12);
        let mut answers = AnswerSheet::default();
        for q in qs.iter().take(7) {
            answers.record(q.id(), q.correct());
        }
        let report = score(&qs, &answers, exact);
        assert_eq!(report.correct, 7);
        assert_eq!(report.percent, 58);
        assert_eq!(report.score_line(), "7 / 12");
    }

    #[test]
    fn percent_bounds() {
        assert_eq!(percent(0, 5), 0);
        assert_eq!(percent(5, 5), 100);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn blank_answers_are_unanswered() {
        let qs = questions(3);
        let mut answers = AnswerSheet::default();
        answers.record(qs[0].id(), "   ");
        answers.record(qs[1].id(), "nope");
        let report = score(&qs, &answers, exact);

        let statuses: Vec<Status> = report.all().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![Status::Unanswered, Status::Incorrect, Status::Unanswered]
        );
        assert_eq!(report.all()[0].user_answer, UNANSWERED);
        assert_eq!(report.wrong_count(), 3);
    }

    #[test]
    fn last_write_wins() {
        let qs = questions(2);
        let mut answers = AnswerSheet::default();
        answers.record(qs[0].id(), "A0");
        answers.record(qs[0].id(), "changed");
        answers.record(qs[1].id(), "wrong");
        answers.record(qs[1].id(), "A1");
        let report = score(&qs, &answers, exact);
        assert_eq!(report.records[0].status, Status::Incorrect);
        assert_eq!(report.records[0].user_answer, "changed");
        assert_eq!(report.records[1].status, Status::Correct);
    }

    #[test]
    fn custom_comparison_is_used() {
        let qs = questions(1);
        let mut answers = AnswerSheet::default();
        answers.record(qs[0].id(), "  a0 ");
        let report = score(&qs, &answers, |a, b| a.trim().eq_ignore_ascii_case(b));
        assert_eq!(report.correct, 1);
        assert!(report.wrong_items().is_empty());
    }
}
