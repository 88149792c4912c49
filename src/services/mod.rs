pub mod course_service;
pub mod dashboard_service;
pub mod lesson_service;
pub mod progress_service;
pub mod quiz_service;
pub mod result_service;
pub mod scoring_service;
pub mod user_service;
