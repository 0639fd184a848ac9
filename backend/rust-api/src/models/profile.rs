use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::course::{CourseCategory, SkillLevel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub skill_level: SkillLevel,
    pub interests: Vec<CourseCategory>,
    pub enrolled_courses: Vec<String>,
    pub completed_courses: Vec<String>,
    pub course_progress: Vec<CourseProgress>,
    pub achievements: Vec<Achievement>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: DateTime<Utc>,
    /// Accumulated learning time in minutes.
    pub total_learning_time: u32,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(
        name: String,
        skill_level: SkillLevel,
        interests: Vec<CourseCategory>,
        now: DateTime<Utc>,
    ) -> Self {
        UserProfile {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            skill_level,
            interests,
            enrolled_courses: Vec::new(),
            completed_courses: Vec::new(),
            course_progress: Vec::new(),
            achievements: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            last_active_date: now,
            total_learning_time: 0,
            created_at: now,
        }
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|id| id == course_id)
    }

    pub fn has_completed(&self, course_id: &str) -> bool {
        self.completed_courses.iter().any(|id| id == course_id)
    }

    pub fn progress_for(&self, course_id: &str) -> Option<&CourseProgress> {
        self.course_progress.iter().find(|p| p.course_id == course_id)
    }

    pub fn progress_for_mut(&mut self, course_id: &str) -> Option<&mut CourseProgress> {
        self.course_progress
            .iter_mut()
            .find(|p| p.course_id == course_id)
    }

    pub fn has_certificate_for(&self, course_id: &str) -> bool {
        self.achievements.iter().any(|a| {
            a.achievement_type == AchievementType::Certificate
                && a.course_id.as_deref() == Some(course_id)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProgress {
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub module_progress: Vec<ModuleProgress>,
    /// 0-100, always `round(100 * completed / definition total)`.
    pub overall_progress: u8,
    pub certificate_earned: bool,
    pub certificate_earned_at: Option<DateTime<Utc>>,
}

impl CourseProgress {
    pub fn new(course_id: String, now: DateTime<Utc>) -> Self {
        CourseProgress {
            course_id,
            enrolled_at: now,
            last_accessed_at: now,
            module_progress: Vec::new(),
            overall_progress: 0,
            certificate_earned: false,
            certificate_earned_at: None,
        }
    }

    pub fn module(&self, module_id: &str) -> Option<&ModuleProgress> {
        self.module_progress.iter().find(|m| m.module_id == module_id)
    }

    pub fn module_mut(&mut self, module_id: &str) -> Option<&mut ModuleProgress> {
        self.module_progress
            .iter_mut()
            .find(|m| m.module_id == module_id)
    }

    /// Existing record for the module, created lazily on first touch.
    pub fn module_entry(&mut self, module_id: &str) -> &mut ModuleProgress {
        let pos = match self
            .module_progress
            .iter()
            .position(|m| m.module_id == module_id)
        {
            Some(pos) => pos,
            None => {
                self.module_progress
                    .push(ModuleProgress::new(module_id.to_owned()));
                self.module_progress.len() - 1
            }
        };
        &mut self.module_progress[pos]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub module_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub lesson_progress: Vec<LessonProgress>,
}

impl ModuleProgress {
    pub fn new(module_id: String) -> Self {
        ModuleProgress {
            module_id,
            completed: false,
            completed_at: None,
            lesson_progress: Vec::new(),
        }
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&LessonProgress> {
        self.lesson_progress.iter().find(|l| l.lesson_id == lesson_id)
    }

    pub fn lesson_mut(&mut self, lesson_id: &str) -> Option<&mut LessonProgress> {
        self.lesson_progress
            .iter_mut()
            .find(|l| l.lesson_id == lesson_id)
    }

    /// Existing record for the lesson, created lazily on first touch.
    pub fn lesson_entry(&mut self, lesson_id: &str) -> &mut LessonProgress {
        let pos = match self
            .lesson_progress
            .iter()
            .position(|l| l.lesson_id == lesson_id)
        {
            Some(pos) => pos,
            None => {
                self.lesson_progress
                    .push(LessonProgress::new(lesson_id.to_owned()));
                self.lesson_progress.len() - 1
            }
        };
        &mut self.lesson_progress[pos]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: String,
    /// Never reset once true, including after a failed quiz retake.
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes, accumulated across repeat visits.
    pub time_spent: u32,
    pub quiz_score: Option<u8>,
    pub attempts: u32,
}

impl LessonProgress {
    pub fn new(lesson_id: String) -> Self {
        LessonProgress {
            lesson_id,
            completed: false,
            completed_at: None,
            time_spent: 0,
            quiz_score: None,
            attempts: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementType {
    Certificate,
    Badge,
    Milestone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    #[serde(rename = "type")]
    pub achievement_type: AchievementType,
    pub title: String,
    pub description: String,
    pub course_id: Option<String>,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStats {
    pub total_courses: u32,
    pub completed_courses: u32,
    pub in_progress_courses: u32,
    pub total_lessons: u32,
    pub completed_lessons: u32,
    pub total_learning_time: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub certificates_earned: u32,
    /// Mean of recorded quiz scores rounded to the nearest integer, 0
    /// when no quiz has been taken.
    pub average_quiz_score: u8,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OnboardProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    pub skill_level: SkillLevel,
    #[serde(default)]
    pub interests: Vec<CourseCategory>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillLevelRequest {
    pub skill_level: SkillLevel,
}

#[derive(Debug, Deserialize)]
pub struct CompleteLessonRequest {
    pub time_spent_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct QuizSubmissionResponse {
    pub score: u8,
    pub passed: bool,
    pub passing_score: u8,
    pub attempts: u32,
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Serialize)]
pub struct SkillSuggestionResponse {
    pub suggested_level: SkillLevel,
}
