use rand::RngCore;

use crate::quiz::utils::shuffle;
use crate::quiz::{
    DatasetItem, Draft, Focus, Mode, Question, QuestionId, QuizConfig, QuizError, MAX_COUNT,
    MIN_COUNT,
};

/// Domain hooks of a quiz: how a question is made from an item, and how answers are judged.
pub trait QuestionGenerator<T> {
    fn make_question(&self, item: &T, mode: Mode, focus: Focus, rng: &mut dyn RngCore) -> Draft;

    fn compare_answer(&self, user_answer: &str, correct_answer: &str) -> bool {
        user_answer == correct_answer
    }
}

/// Builds a run of `config.count` questions, clamped to the allowed range.
///
/// Items are filtered by scope, shuffled, and drawn with wraparound, so a pool
/// smaller than the count repeats items instead of failing.
///
/// The filtered pool must not be empty; that case is reported as
/// [`QuizError::EmptyPool`].
pub fn build_questions<T: DatasetItem>(
    dataset: &[T],
    config: &QuizConfig,
    generator: Option<&dyn QuestionGenerator<T>>,
    rng: &mut dyn RngCore,
) -> Result<Vec<Question>, QuizError> {
    let generator = generator.ok_or(QuizError::GeneratorMissing)?;

    let pool: Vec<usize> = dataset
        .iter()
        .enumerate()
        .filter(|(_, item)| config.scope.admits(item.kind()))
        .map(|(i, _)| i)
        .collect();
    if pool.is_empty() {
        return Err(QuizError::EmptyPool {
            scope: config.scope,
        });
    }

    let pool = shuffle(&pool, &mut *rng);
    let focus = config.focus();
    let count = config.count.clamp(MIN_COUNT, MAX_COUNT);
    let questions = (0..count)
        .map(|i| {
            let source = pool[i % pool.len()];
            let draft = generator.make_question(&dataset[source], config.mode, focus, rng);
            Question::new(QuestionId(i), source, config.mode, draft)
        })
        .collect();
    Ok(questions)
}

/// Builds one question per listed item, in order. Used to replay wrong answers.
pub fn rebuild_questions<T>(
    dataset: &[T],
    sources: &[usize],
    mode: Mode,
    focus: Focus,
    generator: Option<&dyn QuestionGenerator<T>>,
    rng: &mut dyn RngCore,
) -> Result<Vec<Question>, QuizError> {
    let generator = generator.ok_or(QuizError::GeneratorMissing)?;
    let questions = sources
        .iter()
        .enumerate()
        .map(|(i, &source)| {
            let draft = generator.make_question(&dataset[source], mode, focus, rng);
            Question::new(QuestionId(i), source, mode, draft)
        })
        .collect();
    Ok(questions)
}
