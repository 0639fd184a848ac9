//! Progress operations are value-to-value: they take the current profile
//! plus the course definition and the clock instant, and return the next
//! profile. Persistence and locking belong to the caller.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::course::Course;
use crate::models::profile::{
    Achievement, AchievementType, CourseProgress, LearningStats, UserProfile,
};

pub fn enroll(profile: &UserProfile, course: &Course, now: DateTime<Utc>) -> UserProfile {
    let mut updated = profile.clone();
    if !updated.is_enrolled(&course.id) {
        updated.enrolled_courses.push(course.id.clone());
    }
    if updated.progress_for(&course.id).is_none() {
        updated
            .course_progress
            .push(CourseProgress::new(course.id.clone(), now));
    }
    updated
}

pub fn unenroll(profile: &UserProfile, course_id: &str) -> Result<UserProfile, AppError> {
    if !profile.is_enrolled(course_id) && profile.progress_for(course_id).is_none() {
        return Err(AppError::not_enrolled(&profile.id, course_id));
    }
    let mut updated = profile.clone();
    updated.enrolled_courses.retain(|id| id != course_id);
    updated.course_progress.retain(|p| p.course_id != course_id);
    Ok(updated)
}

pub fn complete_lesson(
    profile: &UserProfile,
    course: &Course,
    module_id: &str,
    lesson_id: &str,
    time_spent_minutes: u32,
    now: DateTime<Utc>,
) -> Result<UserProfile, AppError> {
    let mut updated = profile.clone();
    let Some(progress) = updated.progress_for_mut(&course.id) else {
        return Err(AppError::not_enrolled(&profile.id, &course.id));
    };
    if course.find_module(module_id).is_none() {
        return Err(AppError::not_found("Module", module_id));
    }
    if course.find_lesson(module_id, lesson_id).is_none() {
        return Err(AppError::not_found("Lesson", lesson_id));
    }

    // Idempotent in the completed flag; time keeps accumulating on
    // repeat visits.
    let lesson_progress = progress.module_entry(module_id).lesson_entry(lesson_id);
    lesson_progress.completed = true;
    lesson_progress.completed_at = Some(now);
    lesson_progress.time_spent += time_spent_minutes;

    recompute_course_progress(progress, course, now);
    progress.last_accessed_at = now;

    let reached_full = progress.overall_progress == 100;
    let newly_certified =
        reached_full && course.certificate_offered && !progress.certificate_earned;
    if newly_certified {
        progress.certificate_earned = true;
        progress.certificate_earned_at = Some(now);
    }

    if reached_full && !updated.has_completed(&course.id) {
        updated.completed_courses.push(course.id.clone());
    }
    if newly_certified && !updated.has_certificate_for(&course.id) {
        updated.achievements.push(certificate_achievement(course, now));
    }

    updated.total_learning_time += time_spent_minutes;
    updated.last_active_date = now;

    Ok(updated)
}

pub fn submit_quiz(
    profile: &UserProfile,
    course: &Course,
    module_id: &str,
    lesson_id: &str,
    score: u8,
    now: DateTime<Utc>,
) -> Result<UserProfile, AppError> {
    if score > 100 {
        return Err(AppError::InvalidScore(score));
    }

    let mut updated = profile.clone();
    let Some(progress) = updated.progress_for_mut(&course.id) else {
        return Err(AppError::not_enrolled(&profile.id, &course.id));
    };
    if course.find_module(module_id).is_none() {
        return Err(AppError::not_found("Module", module_id));
    }
    let Some(lesson) = course.find_lesson(module_id, lesson_id) else {
        return Err(AppError::not_found("Lesson", lesson_id));
    };
    let Some(quiz) = lesson.quiz.as_ref() else {
        return Err(AppError::not_found("Quiz", lesson_id));
    };

    // Quiz submissions only ever land on modules the learner has already
    // opened through the lesson flow.
    let Some(module_progress) = progress.module_mut(module_id) else {
        return Err(AppError::not_found("Module progress", module_id));
    };

    let lesson_progress = module_progress.lesson_entry(lesson_id);
    lesson_progress.quiz_score = Some(score);
    lesson_progress.attempts += 1;
    // Pass threshold comes from the quiz content. A failed retake never
    // takes a completed lesson back.
    if score >= quiz.passing_score && !lesson_progress.completed {
        lesson_progress.completed = true;
        lesson_progress.completed_at = Some(now);
    }

    Ok(updated)
}

pub fn update_streak(profile: &UserProfile, now: DateTime<Utc>) -> UserProfile {
    let mut updated = profile.clone();
    let today = now.date_naive();
    let last_active = profile.last_active_date.date_naive();

    if today == last_active {
        return updated;
    }

    if last_active.succ_opt() == Some(today) {
        updated.current_streak += 1;
    } else {
        updated.current_streak = 1;
    }
    updated.longest_streak = updated.longest_streak.max(updated.current_streak);
    updated.last_active_date = now;
    updated
}

pub fn learning_stats(profile: &UserProfile) -> LearningStats {
    let total_courses = profile.enrolled_courses.len() as u32;
    let completed_courses = profile.completed_courses.len() as u32;

    let mut total_lessons = 0u32;
    let mut completed_lessons = 0u32;
    let mut quiz_score_sum = 0u32;
    let mut quiz_count = 0u32;
    for progress in &profile.course_progress {
        for module in &progress.module_progress {
            for lesson in &module.lesson_progress {
                total_lessons += 1;
                if lesson.completed {
                    completed_lessons += 1;
                }
                if let Some(score) = lesson.quiz_score {
                    quiz_score_sum += u32::from(score);
                    quiz_count += 1;
                }
            }
        }
    }

    let average_quiz_score = if quiz_count == 0 {
        0
    } else {
        (f64::from(quiz_score_sum) / f64::from(quiz_count)).round() as u8
    };

    let certificates_earned = profile
        .achievements
        .iter()
        .filter(|a| a.achievement_type == AchievementType::Certificate)
        .count() as u32;

    LearningStats {
        total_courses,
        completed_courses,
        in_progress_courses: total_courses.saturating_sub(completed_courses),
        total_lessons,
        completed_lessons,
        total_learning_time: profile.total_learning_time,
        current_streak: profile.current_streak,
        longest_streak: profile.longest_streak,
        certificates_earned,
        average_quiz_score,
    }
}

/// The single recompute routine for derived fields: module completion is
/// the conjunction of the lesson records the module holds, overall
/// progress counts completed lessons against the definition total.
fn recompute_course_progress(progress: &mut CourseProgress, course: &Course, now: DateTime<Utc>) {
    for module_progress in &mut progress.module_progress {
        let completed = !module_progress.lesson_progress.is_empty()
            && module_progress.lesson_progress.iter().all(|l| l.completed);
        if completed {
            if module_progress.completed_at.is_none() {
                module_progress.completed_at = Some(now);
            }
        } else {
            module_progress.completed_at = None;
        }
        module_progress.completed = completed;
    }

    let total = course.total_lessons();
    let completed = progress
        .module_progress
        .iter()
        .flat_map(|m| &m.lesson_progress)
        .filter(|l| l.completed)
        .count();

    progress.overall_progress = if total == 0 {
        0
    } else {
        (100.0 * completed as f64 / total as f64).round() as u8
    };
}

fn certificate_achievement(course: &Course, now: DateTime<Utc>) -> Achievement {
    Achievement {
        id: Uuid::new_v4().to_string(),
        achievement_type: AchievementType::Certificate,
        title: format!("Certificate: {}", course.title),
        description: format!("Completed all lessons in {}", course.title),
        course_id: Some(course.id.clone()),
        earned_at: now,
    }
}
