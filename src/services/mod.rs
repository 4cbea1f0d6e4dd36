pub mod assignment_service;
pub mod attempt_service;
pub mod notification;
pub mod scoring;

pub use assignment_service::AssignmentService;
pub use attempt_service::AttemptService;
pub use notification::{LogNotifier, Notifier};
