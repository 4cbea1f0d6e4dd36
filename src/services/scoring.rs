use crate::models::domain::Question;

/// Score a submitted answer sheet against the quiz's answer key.
///
/// Position `i` is correct when the submitted array has an entry at `i`
/// equal to question `i`'s correct index. Slots past the end of the
/// submitted array count as unanswered; trailing extra entries are
/// ignored. The result is a percentage in [0, 100].
pub fn score_answers(questions: &[Question], answers: &[i32]) -> f64 {
    if questions.is_empty() {
        // Guarded even though the quiz invariant forbids empty quizzes
        return 0.0;
    }

    let correct_count = questions
        .iter()
        .enumerate()
        .filter(|(i, question)| answers.get(*i) == Some(&question.correct_answer))
        .count();

    (correct_count as f64 / questions.len() as f64) * 100.0
}
