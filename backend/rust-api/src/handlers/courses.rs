use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use crate::error::AppError;
use crate::metrics;
use crate::models::course::{Course, CourseListQuery, CourseSort, CourseSummary};
use crate::models::recommendation::{RecommendationQuery, RecommendationType};
use crate::services::{recommendation_service, AppState};

const DEFAULT_SIMILAR_LIMIT: usize = 4;
const DEFAULT_TRENDING_LIMIT: usize = 6;

pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseListQuery>,
) -> Json<Vec<CourseSummary>> {
    let needle = query.q.as_deref().map(str::to_lowercase);

    let mut matches: Vec<&Course> = state
        .catalog
        .courses()
        .iter()
        .filter(|course| query.category.map_or(true, |c| course.category == c))
        .filter(|course| {
            query
                .skill_level
                .map_or(true, |level| course.skill_level == level)
        })
        .filter(|course| {
            query
                .certificate_offered
                .map_or(true, |wanted| course.certificate_offered == wanted)
        })
        .filter(|course| match &needle {
            Some(needle) => {
                course.title.to_lowercase().contains(needle)
                    || course.description.to_lowercase().contains(needle)
                    || course
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(needle))
            }
            None => true,
        })
        .collect();

    // Catalog order is the default; sorts are stable so equal keys keep it.
    match query.sort {
        Some(CourseSort::Popular) => {
            matches.sort_by(|a, b| b.enrollment_count.cmp(&a.enrollment_count))
        }
        Some(CourseSort::Rating) => matches.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        Some(CourseSort::Recent) => matches.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        Some(CourseSort::Duration) => {
            matches.sort_by(|a, b| a.duration_hours.cmp(&b.duration_hours))
        }
        None => {}
    }

    if let Some(limit) = query.limit {
        matches.truncate(limit);
    }

    Json(matches.into_iter().map(CourseSummary::from).collect())
}

pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state
        .catalog
        .get(&course_id)
        .ok_or_else(|| AppError::not_found("Course", &course_id))?;
    Ok(Json(course.clone()))
}

pub async fn similar_courses(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let course = state
        .catalog
        .get(&course_id)
        .ok_or_else(|| AppError::not_found("Course", &course_id))?;
    let limit = query.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT);

    let similar = recommendation_service::similar_courses(course, state.catalog.courses(), limit);

    metrics::RECOMMENDATIONS_SERVED_TOTAL
        .with_label_values(&[RecommendationType::Similar.as_str()])
        .inc();

    Ok(Json(similar))
}

pub async fn trending_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecommendationQuery>,
) -> Json<Vec<CourseSummary>> {
    let limit = query.limit.unwrap_or(DEFAULT_TRENDING_LIMIT);

    let trending =
        recommendation_service::trending_courses(state.catalog.courses(), Utc::now(), limit);

    metrics::RECOMMENDATIONS_SERVED_TOTAL
        .with_label_values(&[RecommendationType::Trending.as_str()])
        .inc();

    Json(trending)
}
