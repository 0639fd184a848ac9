use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn rank(&self) -> u8 {
        match self {
            SkillLevel::Beginner => 0,
            SkillLevel::Intermediate => 1,
            SkillLevel::Advanced => 2,
        }
    }

    /// True when `self` is exactly one level above `other` (beginner ->
    /// intermediate -> advanced, no wrap).
    pub fn is_one_above(&self, other: SkillLevel) -> bool {
        self.rank() == other.rank() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseCategory {
    WebDevelopment,
    MobileDevelopment,
    DataScience,
    AiMl,
    Devops,
    Design,
    Cybersecurity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Theory,
    Interactive,
    Challenge,
    Project,
    Quiz,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: u32,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizContent {
    /// Minimum score required to pass, on the 0-100 scale.
    #[serde(default = "default_passing_score")]
    pub passing_score: u8,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    pub questions: Vec<QuizQuestion>,
}

fn default_passing_score() -> u8 {
    70
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub duration_minutes: u32,
    pub order: u32,
    #[serde(default)]
    pub quiz: Option<QuizContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub order: u32,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skill_level: SkillLevel,
    pub category: CourseCategory,
    pub instructor: Instructor,
    pub modules: Vec<Module>,
    /// Course ids that should be completed first.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub duration_hours: u32,
    pub rating: f32,
    pub enrollment_count: u32,
    pub certificate_offered: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Lesson count across every module of the definition, not just the
    /// ones a learner has visited.
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn find_module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    pub fn find_lesson(&self, module_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.find_module(module_id)
            .and_then(|m| m.lessons.iter().find(|l| l.id == lesson_id))
    }
}

/// Compact course view for listings and recommendation payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skill_level: SkillLevel,
    pub category: CourseCategory,
    pub duration_hours: u32,
    pub rating: f32,
    pub enrollment_count: u32,
    pub certificate_offered: bool,
    pub tags: Vec<String>,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        CourseSummary {
            id: course.id.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            skill_level: course.skill_level,
            category: course.category,
            duration_hours: course.duration_hours,
            rating: course.rating,
            enrollment_count: course.enrollment_count,
            certificate_offered: course.certificate_offered,
            tags: course.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseSort {
    Popular,
    Rating,
    Recent,
    Duration,
}

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub category: Option<CourseCategory>,
    pub skill_level: Option<SkillLevel>,
    /// Free-text match over title, description and tags.
    pub q: Option<String>,
    pub certificate_offered: Option<bool>,
    pub sort: Option<CourseSort>,
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_level_progression_is_single_step() {
        assert!(SkillLevel::Intermediate.is_one_above(SkillLevel::Beginner));
        assert!(SkillLevel::Advanced.is_one_above(SkillLevel::Intermediate));
        assert!(!SkillLevel::Advanced.is_one_above(SkillLevel::Beginner));
        assert!(!SkillLevel::Beginner.is_one_above(SkillLevel::Advanced));
        assert!(!SkillLevel::Beginner.is_one_above(SkillLevel::Beginner));
    }

    #[test]
    fn category_uses_kebab_case_wire_format() {
        let json = serde_json::to_string(&CourseCategory::AiMl).unwrap();
        assert_eq!(json, "\"ai-ml\"");
        let parsed: CourseCategory = serde_json::from_str("\"web-development\"").unwrap();
        assert_eq!(parsed, CourseCategory::WebDevelopment);
    }

    #[test]
    fn quiz_passing_score_defaults_when_omitted() {
        let quiz: QuizContent = serde_json::from_str(r#"{"questions": []}"#).unwrap();
        assert_eq!(quiz.passing_score, 70);
    }
}
