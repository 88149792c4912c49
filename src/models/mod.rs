pub mod course;
pub mod lesson;
pub mod progress;
pub mod quiz;
pub mod quiz_result;
pub mod user;
