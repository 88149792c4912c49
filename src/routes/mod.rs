use crate::{
    config::get_config,
    middleware::{
        auth::{require_admin, require_auth},
        rate_limit::{new_rps_state, rps_middleware},
    },
    AppState,
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod admin;
pub mod auth;
pub mod courses;
pub mod health;
pub mod lessons;
pub mod quizzes;
pub mod results;

pub fn create_router(state: AppState) -> Router {
    let limiter = new_rps_state(get_config().api_rps);

    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let authenticated = Router::new()
        .route("/api/me", get(auth::me).patch(auth::update_profile))
        .route("/api/me/password", post(auth::change_password))
        .route("/api/courses", get(courses::list_courses))
        .route("/api/courses/:id", get(courses::get_course))
        .route("/api/lessons/:id", get(lessons::get_lesson))
        .route("/api/lessons/:id/complete", post(lessons::complete_lesson))
        .route("/api/lessons/:id/quiz", get(quizzes::get_lesson_quiz))
        .route("/api/quizzes/:id/submit", post(quizzes::submit_quiz))
        .route("/api/quizzes/:id/latest-result", get(quizzes::latest_result))
        .route("/api/results", get(results::my_results))
        .route("/api/results/:id", get(results::get_result))
        .route("/api/dashboard", get(results::dashboard))
        .layer(from_fn(require_auth));

    let admin = Router::new()
        .route(
            "/courses",
            get(admin::list_courses).post(admin::create_course),
        )
        .route(
            "/courses/:id",
            get(admin::get_course)
                .patch(admin::update_course)
                .delete(admin::delete_course),
        )
        .route("/courses/:id/lessons", post(admin::create_lesson))
        .route("/courses/:id/lessons/reorder", post(admin::reorder_lessons))
        .route("/courses/:id/analytics", get(admin::course_analytics))
        .route(
            "/lessons/:id",
            patch(admin::update_lesson).delete(admin::delete_lesson),
        )
        .route("/lessons/:id/quiz", put(admin::save_quiz))
        .route("/quizzes/:id", delete(admin::delete_quiz))
        .route("/quizzes/:id/questions", post(admin::create_question))
        .route("/quizzes/:id/results", get(admin::quiz_results))
        .route(
            "/questions/:id",
            patch(admin::update_question).delete(admin::delete_question),
        )
        .route("/questions/:id/options", post(admin::create_option))
        .route(
            "/questions/:id/correct-options",
            put(admin::set_correct_options),
        )
        .route(
            "/options/:id",
            patch(admin::update_option).delete(admin::delete_option),
        )
        .route("/results/:id", delete(admin::delete_result))
        .route("/users", get(admin::list_users))
        .route(
            "/users/:id",
            get(admin::get_user).delete(admin::delete_user),
        )
        .route("/users/:id/role", patch(admin::update_user_role))
        .route(
            "/users/:id/courses/:course_id/reset",
            post(admin::reset_user_course),
        )
        .route("/metrics", get(admin::metrics))
        .layer(from_fn(require_admin));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .nest("/api/admin", admin)
        .layer(from_fn_with_state(limiter, rps_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
