pub mod assignment;
pub mod question;
pub mod quiz;
pub mod quiz_result;

pub use assignment::{Assignment, AssignmentStatus};
pub use question::{Difficulty, Question};
pub use quiz::Quiz;
pub use quiz_result::{QuizResult, UNANSWERED};
