pub mod assignment_repository;
pub mod question_repository;
pub mod quiz_repository;
pub mod quiz_result_repository;

pub use assignment_repository::{
    AssignmentFilter, AssignmentRepository, MongoAssignmentRepository,
};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use quiz_result_repository::{MongoQuizResultRepository, QuizResultRepository};
