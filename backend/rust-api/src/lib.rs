#![allow(dead_code)]

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;

pub use config::Config;
pub use services::AppState;

/// CSP middleware adds Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data: https:; \
             connect-src 'self'",
        ),
    );
    response
}

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    // CORS configuration for the browser frontend
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to specific origins in production

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1/courses", courses_routes())
        .nest("/api/v1/profiles", profiles_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(csp_middleware)) // Apply CSP to all responses
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn courses_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/", get(handlers::courses::list_courses))
        .route("/trending", get(handlers::courses::trending_courses))
        .route("/{id}", get(handlers::courses::get_course))
        .route("/{id}/similar", get(handlers::courses::similar_courses))
}

fn profiles_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/", post(handlers::profiles::create_profile))
        .route(
            "/{id}",
            get(handlers::profiles::get_profile).delete(handlers::profiles::delete_profile),
        )
        .route(
            "/{id}/skill-level",
            put(handlers::profiles::update_skill_level),
        )
        .route(
            "/{id}/enrollments/{course_id}",
            post(handlers::profiles::enroll).delete(handlers::profiles::unenroll),
        )
        .route(
            "/{id}/courses/{course_id}/progress",
            get(handlers::profiles::get_course_progress),
        )
        .route(
            "/{id}/courses/{course_id}/modules/{module_id}/lessons/{lesson_id}/complete",
            post(handlers::profiles::complete_lesson),
        )
        .route(
            "/{id}/courses/{course_id}/modules/{module_id}/lessons/{lesson_id}/quiz",
            post(handlers::profiles::submit_quiz),
        )
        .route(
            "/{id}/courses/{course_id}/prerequisites",
            get(handlers::profiles::check_prerequisites),
        )
        .route("/{id}/streak", post(handlers::profiles::update_streak))
        .route("/{id}/stats", get(handlers::profiles::get_stats))
        .route(
            "/{id}/recommendations",
            get(handlers::profiles::get_recommendations),
        )
        .route(
            "/{id}/recommendations/next-steps",
            get(handlers::profiles::next_steps),
        )
        .route(
            "/{id}/continue-learning",
            get(handlers::profiles::continue_learning),
        )
        .route(
            "/{id}/skill-suggestion",
            get(handlers::profiles::skill_suggestion),
        )
}
