pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    course_service::CourseService, dashboard_service::DashboardService,
    lesson_service::LessonService, progress_service::ProgressService, quiz_service::QuizService,
    result_service::ResultService, user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub course_service: CourseService,
    pub lesson_service: LessonService,
    pub quiz_service: QuizService,
    pub progress_service: ProgressService,
    pub result_service: ResultService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let user_service = UserService::new(pool.clone());
        let course_service = CourseService::new(pool.clone());
        let lesson_service = LessonService::new(pool.clone());
        let quiz_service = QuizService::new(pool.clone());
        let progress_service = ProgressService::new(pool.clone());
        let result_service = ResultService::new(pool.clone());
        let dashboard_service = DashboardService::new(pool.clone());

        Self {
            pool,
            user_service,
            course_service,
            lesson_service,
            quiz_service,
            progress_service,
            result_service,
            dashboard_service,
        }
    }
}
