// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, classes, profile, tasks},
    state::AppState,
    utils::jwt::{auth_middleware, student_middleware, teacher_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, student, teacher).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/student/register", post(auth::register_student))
        .route("/student/login", post(auth::login_student))
        .route("/teacher/register", post(auth::register_teacher))
        .route("/teacher/login", post(auth::login_teacher));

    // Double middleware protection: Auth first, then role check
    let student_routes = Router::new()
        .route("/profile", get(profile::get_me))
        .route("/tasks/assigned", get(profile::list_assigned_tasks))
        .route("/tasks/completed", get(profile::list_completed_tasks))
        .route("/deliveries", post(profile::deliver_task))
        .layer(middleware::from_fn(student_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let teacher_routes = Router::new()
        .route("/classes", get(classes::list_my_classes))
        .route("/classes/{code}/tasks", get(classes::list_class_tasks))
        .route(
            "/classes/{code}/completions",
            get(classes::list_class_completions),
        )
        .route("/tasks", post(tasks::create_task))
        .layer(middleware::from_fn(teacher_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/student", student_routes)
        .nest("/api/teacher", teacher_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
