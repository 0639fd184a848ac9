//! Recommendation scoring over `(profile, catalog)`. One rubric drives
//! every personalized score; the point values and thresholds below are
//! the whole tuning surface.

use chrono::{DateTime, Duration, Utc};

use crate::models::course::{Course, CourseSummary, SkillLevel};
use crate::models::profile::UserProfile;
use crate::models::recommendation::{PrerequisiteCheck, Recommendation, RecommendationType};

const SKILL_MATCH_POINTS: u32 = 40;
const SKILL_NEXT_STEP_POINTS: u32 = 20;
const INTEREST_MATCH_POINTS: u32 = 30;
const PREREQS_SATISFIED_POINTS: u32 = 20;
const PREREQS_PARTIAL_POINTS: u32 = 10;
const POPULAR_POINTS: u32 = 15;
const HIGH_RATING_POINTS: u32 = 10;
const SCORE_CAP: u32 = 100;

/// Strictly-greater-than floors.
const POPULAR_ENROLLMENT_FLOOR: u32 = 1_000;
const TRENDING_ENROLLMENT_FLOOR: u32 = 2_000;

const HIGH_RATING_FLOOR: f32 = 4.5;
const TRENDING_WINDOW_DAYS: i64 = 90;

const SIMILAR_CATEGORY_POINTS: u32 = 40;
const SIMILAR_SKILL_POINTS: u32 = 30;
const SIMILAR_TAG_POINTS: u32 = 5;

const NEXT_STEP_BASE_SCORE: f32 = 90.0;
const NEXT_STEP_RATING_WEIGHT: f32 = 2.0;

/// Scores one course for one profile. Every contributing signal appends
/// its reason phrase; the sum is capped at 100.
pub fn score_course(course: &Course, profile: &UserProfile) -> (u8, String) {
    let mut score = 0u32;
    let mut reasons: Vec<&str> = Vec::new();

    if course.skill_level == profile.skill_level {
        score += SKILL_MATCH_POINTS;
        reasons.push("Consolidate your current level.");
    } else if course.skill_level.is_one_above(profile.skill_level) {
        score += SKILL_NEXT_STEP_POINTS;
        reasons.push("Next step in your learning path.");
    }

    if profile.interests.contains(&course.category) {
        score += INTEREST_MATCH_POINTS;
        reasons.push("Matches your interests.");
    }

    if course.prerequisites.is_empty() {
        score += PREREQS_SATISFIED_POINTS;
        reasons.push("No prerequisites required.");
    } else {
        let met = course
            .prerequisites
            .iter()
            .filter(|id| profile.has_completed(id))
            .count();
        if met == course.prerequisites.len() {
            score += PREREQS_SATISFIED_POINTS;
            reasons.push("Prerequisites met.");
        } else if met > 0 {
            score += PREREQS_PARTIAL_POINTS;
            reasons.push("Some prerequisites completed.");
        }
    }

    if course.enrollment_count > POPULAR_ENROLLMENT_FLOOR {
        score += POPULAR_POINTS;
        reasons.push("Popular course.");
    }

    if course.rating >= HIGH_RATING_FLOOR {
        score += HIGH_RATING_POINTS;
        reasons.push("Highly rated.");
    }

    (score.min(SCORE_CAP) as u8, reasons.join(" "))
}

/// First match wins: next-step, similar, trending, personalized.
pub fn classify_recommendation_type(course: &Course, profile: &UserProfile) -> RecommendationType {
    if course.skill_level.is_one_above(profile.skill_level) {
        RecommendationType::NextStep
    } else if course.skill_level == profile.skill_level {
        RecommendationType::Similar
    } else if course.enrollment_count > TRENDING_ENROLLMENT_FLOOR {
        RecommendationType::Trending
    } else {
        RecommendationType::Personalized
    }
}

pub fn personalized_recommendations(
    profile: &UserProfile,
    catalog: &[Course],
    limit: usize,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = catalog
        .iter()
        .filter(|course| !profile.is_enrolled(&course.id) && !profile.has_completed(&course.id))
        .map(|course| {
            let (relevance_score, reason) = score_course(course, profile);
            Recommendation {
                course: CourseSummary::from(course),
                relevance_score,
                reason,
                recommendation_type: classify_recommendation_type(course, profile),
            }
        })
        .collect();

    // Stable sort keeps catalog order between equal scores.
    recommendations.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    recommendations.truncate(limit);
    recommendations
}

/// Courses whose prerequisite list is non-empty and fully completed by
/// the learner.
pub fn next_step_recommendations(
    profile: &UserProfile,
    catalog: &[Course],
    limit: usize,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = catalog
        .iter()
        .filter(|course| !profile.is_enrolled(&course.id) && !profile.has_completed(&course.id))
        .filter(|course| {
            !course.prerequisites.is_empty()
                && course.prerequisites.iter().all(|id| profile.has_completed(id))
        })
        .map(|course| {
            let raw = NEXT_STEP_BASE_SCORE + course.rating * NEXT_STEP_RATING_WEIGHT;
            let relevance_score = (raw.round() as u32).min(SCORE_CAP) as u8;
            Recommendation {
                course: CourseSummary::from(course),
                relevance_score,
                reason: "You've completed all prerequisites".to_owned(),
                recommendation_type: RecommendationType::NextStep,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    recommendations.truncate(limit);
    recommendations
}

pub fn similar_courses(target: &Course, catalog: &[Course], limit: usize) -> Vec<CourseSummary> {
    let mut scored: Vec<(u32, &Course)> = catalog
        .iter()
        .filter(|course| course.id != target.id)
        .map(|course| {
            let mut similarity = 0u32;
            if course.category == target.category {
                similarity += SIMILAR_CATEGORY_POINTS;
            }
            if course.skill_level == target.skill_level {
                similarity += SIMILAR_SKILL_POINTS;
            }
            let shared_tags = course
                .tags
                .iter()
                .filter(|tag| target.tags.contains(tag))
                .count() as u32;
            similarity += SIMILAR_TAG_POINTS * shared_tags;
            (similarity, course)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, course)| CourseSummary::from(course))
        .collect()
}

/// `missing` lists the catalog-resolved prerequisites the learner has
/// not completed; `meets` is its emptiness. A prerequisite id the
/// catalog cannot resolve never blocks (the loader warns about those).
pub fn meets_prerequisites(
    course: &Course,
    catalog: &[Course],
    profile: &UserProfile,
) -> PrerequisiteCheck {
    let missing: Vec<CourseSummary> = course
        .prerequisites
        .iter()
        .filter_map(|id| find(catalog, id))
        .filter(|prereq| !profile.has_completed(&prereq.id))
        .map(CourseSummary::from)
        .collect();

    PrerequisiteCheck {
        meets: missing.is_empty(),
        missing,
    }
}

/// Recently refreshed catalog entries, most enrolled first.
pub fn trending_courses(catalog: &[Course], now: DateTime<Utc>, limit: usize) -> Vec<CourseSummary> {
    let cutoff = now - Duration::days(TRENDING_WINDOW_DAYS);
    let mut recent: Vec<&Course> = catalog
        .iter()
        .filter(|course| course.updated_at >= cutoff)
        .collect();

    recent.sort_by(|a, b| b.enrollment_count.cmp(&a.enrollment_count));
    recent
        .into_iter()
        .take(limit)
        .map(CourseSummary::from)
        .collect()
}

/// Enrolled-but-unfinished courses, most recently touched first.
pub fn continue_learning(profile: &UserProfile, catalog: &[Course]) -> Vec<CourseSummary> {
    let mut in_progress: Vec<_> = profile
        .course_progress
        .iter()
        .filter(|progress| !profile.has_completed(&progress.course_id))
        .collect();

    in_progress.sort_by(|a, b| b.last_accessed_at.cmp(&a.last_accessed_at));
    in_progress
        .into_iter()
        .filter_map(|progress| find(catalog, &progress.course_id))
        .map(CourseSummary::from)
        .collect()
}

/// Declared-level suggestion from completion history.
pub fn suggest_skill_level(profile: &UserProfile, catalog: &[Course]) -> SkillLevel {
    let completed: Vec<&Course> = profile
        .completed_courses
        .iter()
        .filter_map(|id| find(catalog, id))
        .collect();

    let has_advanced = completed.iter().any(|c| c.skill_level == SkillLevel::Advanced);
    let has_intermediate = completed
        .iter()
        .any(|c| c.skill_level == SkillLevel::Intermediate);

    if has_advanced && completed.len() >= 3 {
        SkillLevel::Advanced
    } else if has_intermediate && completed.len() >= 2 {
        SkillLevel::Intermediate
    } else if !completed.is_empty() {
        SkillLevel::Intermediate
    } else {
        SkillLevel::Beginner
    }
}

fn find<'a>(catalog: &'a [Course], id: &str) -> Option<&'a Course> {
    catalog.iter().find(|course| course.id == id)
}
