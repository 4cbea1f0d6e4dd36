use serde::Serialize;

use crate::models::domain::{Difficulty, Question, Quiz, QuizResult};

/// A question as shown to a student taking a quiz: the correct-answer
/// index never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub title: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub subject: String,
    pub difficulty: Difficulty,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            title: question.title.clone(),
            question_text: question.question_text.clone(),
            options: question.options.clone(),
            subject: question.subject.clone(),
            difficulty: question.difficulty,
        }
    }
}

/// The quiz definition handed to a student at start time, in the order
/// answers will be scored.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub time_limit_minutes: i32,
    pub questions: Vec<QuestionView>,
}

impl QuizView {
    pub fn new(quiz: &Quiz, questions: &[Question]) -> Self {
        QuizView {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            subject: quiz.subject.clone(),
            time_limit_minutes: quiz.time_limit_minutes,
            questions: questions.iter().map(QuestionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartQuizResponse {
    pub quiz_result: QuizResult,
    pub quiz: QuizView,
    pub can_continue: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}
