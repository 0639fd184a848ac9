use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use validator::Validate;

use crate::error::AppError;
use crate::extractors::AppJson;
use crate::metrics;
use crate::models::course::{Course, CourseSummary};
use crate::models::profile::{
    CompleteLessonRequest, CourseProgress, LearningStats, OnboardProfileRequest,
    QuizSubmissionResponse, SkillSuggestionResponse, StreakResponse, SubmitQuizRequest,
    UpdateSkillLevelRequest, UserProfile,
};
use crate::models::recommendation::{
    PrerequisiteCheck, Recommendation, RecommendationQuery, RecommendationType,
};
use crate::services::{progress_service, recommendation_service, AppState};

const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<OnboardProfileRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    payload.validate()?;

    let profile = UserProfile::new(
        payload.name,
        payload.skill_level,
        payload.interests,
        Utc::now(),
    );
    state.profiles.insert(profile.clone()).await?;

    metrics::PROFILES_ACTIVE.set(state.profiles.count().await as i64);
    tracing::info!(profile_id = %profile.id, "profile created");

    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.profiles.get(&user_id).await?))
}

pub async fn update_skill_level(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    AppJson(payload): AppJson<UpdateSkillLevelRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let updated = state
        .profiles
        .update(&user_id, |profile| {
            let mut next = profile.clone();
            next.skill_level = payload.skill_level;
            Ok(next)
        })
        .await?;
    Ok(Json(updated))
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.profiles.remove(&user_id).await?;
    metrics::PROFILES_ACTIVE.set(state.profiles.count().await as i64);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> Result<Json<UserProfile>, AppError> {
    let course = resolve_course(&state, &course_id)?;

    let updated = state
        .profiles
        .update(&user_id, |profile| {
            Ok(progress_service::enroll(profile, course, Utc::now()))
        })
        .await?;

    metrics::ENROLLMENTS_TOTAL
        .with_label_values(&[&course_id])
        .inc();

    Ok(Json(updated))
}

// Unenrollment works off the profile alone so stale enrollments can be
// cleared even if the course has left the catalog.
pub async fn unenroll(
    State(state): State<Arc<AppState>>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> Result<Json<UserProfile>, AppError> {
    let updated = state
        .profiles
        .update(&user_id, |profile| {
            progress_service::unenroll(profile, &course_id)
        })
        .await?;
    Ok(Json(updated))
}

pub async fn get_course_progress(
    State(state): State<Arc<AppState>>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> Result<Json<CourseProgress>, AppError> {
    let profile = state.profiles.get(&user_id).await?;
    let progress = profile
        .progress_for(&course_id)
        .ok_or_else(|| AppError::not_enrolled(&user_id, &course_id))?;
    Ok(Json(progress.clone()))
}

pub async fn complete_lesson(
    State(state): State<Arc<AppState>>,
    Path((user_id, course_id, module_id, lesson_id)): Path<(String, String, String, String)>,
    AppJson(payload): AppJson<CompleteLessonRequest>,
) -> Result<Json<CourseProgress>, AppError> {
    let course = resolve_course(&state, &course_id)?;

    let mut newly_certified = false;
    let updated = state
        .profiles
        .update(&user_id, |profile| {
            let before = profile
                .progress_for(&course_id)
                .map_or(false, |p| p.certificate_earned);
            let next = progress_service::complete_lesson(
                profile,
                course,
                &module_id,
                &lesson_id,
                payload.time_spent_minutes,
                Utc::now(),
            )?;
            let after = next
                .progress_for(&course_id)
                .map_or(false, |p| p.certificate_earned);
            newly_certified = after && !before;
            Ok(next)
        })
        .await?;

    metrics::LESSONS_COMPLETED_TOTAL
        .with_label_values(&[&course_id])
        .inc();
    if newly_certified {
        metrics::CERTIFICATES_ISSUED_TOTAL
            .with_label_values(&[&course_id])
            .inc();
        tracing::info!(profile_id = %user_id, course_id = %course_id, "certificate issued");
    }

    let progress = updated
        .progress_for(&course_id)
        .cloned()
        .ok_or_else(|| AppError::not_enrolled(&user_id, &course_id))?;
    Ok(Json(progress))
}

pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Path((user_id, course_id, module_id, lesson_id)): Path<(String, String, String, String)>,
    AppJson(payload): AppJson<SubmitQuizRequest>,
) -> Result<Json<QuizSubmissionResponse>, AppError> {
    let course = resolve_course(&state, &course_id)?;

    let updated = state
        .profiles
        .update(&user_id, |profile| {
            progress_service::submit_quiz(
                profile,
                course,
                &module_id,
                &lesson_id,
                payload.score,
                Utc::now(),
            )
        })
        .await?;

    // The update succeeding means the lesson carries quiz content.
    let quiz = course
        .find_lesson(&module_id, &lesson_id)
        .and_then(|lesson| lesson.quiz.as_ref())
        .ok_or_else(|| AppError::not_found("Quiz", &lesson_id))?;

    let attempts = updated
        .progress_for(&course_id)
        .and_then(|p| p.module(&module_id))
        .and_then(|m| m.lesson(&lesson_id))
        .map_or(0, |l| l.attempts);

    let passed = payload.score >= quiz.passing_score;
    metrics::QUIZZES_SUBMITTED_TOTAL
        .with_label_values(&[if passed { "true" } else { "false" }])
        .inc();

    Ok(Json(QuizSubmissionResponse {
        score: payload.score,
        passed,
        passing_score: quiz.passing_score,
        attempts,
    }))
}

pub async fn check_prerequisites(
    State(state): State<Arc<AppState>>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> Result<Json<PrerequisiteCheck>, AppError> {
    let profile = state.profiles.get(&user_id).await?;
    let course = resolve_course(&state, &course_id)?;
    Ok(Json(recommendation_service::meets_prerequisites(
        course,
        state.catalog.courses(),
        &profile,
    )))
}

pub async fn update_streak(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<StreakResponse>, AppError> {
    let updated = state
        .profiles
        .update(&user_id, |profile| {
            Ok(progress_service::update_streak(profile, Utc::now()))
        })
        .await?;

    Ok(Json(StreakResponse {
        current_streak: updated.current_streak,
        longest_streak: updated.longest_streak,
    }))
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<LearningStats>, AppError> {
    let profile = state.profiles.get(&user_id).await?;
    Ok(Json(progress_service::learning_stats(&profile)))
}

pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let profile = state.profiles.get(&user_id).await?;
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);

    let recommendations = recommendation_service::personalized_recommendations(
        &profile,
        state.catalog.courses(),
        limit,
    );

    metrics::RECOMMENDATIONS_SERVED_TOTAL
        .with_label_values(&[RecommendationType::Personalized.as_str()])
        .inc();

    Ok(Json(recommendations))
}

pub async fn next_steps(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let profile = state.profiles.get(&user_id).await?;
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);

    let recommendations =
        recommendation_service::next_step_recommendations(&profile, state.catalog.courses(), limit);

    metrics::RECOMMENDATIONS_SERVED_TOTAL
        .with_label_values(&[RecommendationType::NextStep.as_str()])
        .inc();

    Ok(Json(recommendations))
}

pub async fn continue_learning(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let profile = state.profiles.get(&user_id).await?;
    Ok(Json(recommendation_service::continue_learning(
        &profile,
        state.catalog.courses(),
    )))
}

pub async fn skill_suggestion(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SkillSuggestionResponse>, AppError> {
    let profile = state.profiles.get(&user_id).await?;
    let suggested_level =
        recommendation_service::suggest_skill_level(&profile, state.catalog.courses());
    Ok(Json(SkillSuggestionResponse { suggested_level }))
}

fn resolve_course<'a>(state: &'a AppState, course_id: &str) -> Result<&'a Course, AppError> {
    state
        .catalog
        .get(course_id)
        .ok_or_else(|| AppError::not_found("Course", course_id))
}
