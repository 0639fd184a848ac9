use std::fs;

use anyhow::Context;

use crate::models::course::Course;

/// Read-only course catalog, loaded once at startup and shared through
/// `AppState`. Enrollment counts and ratings are catalog data; nothing
/// here mutates at runtime.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read course catalog at {path}"))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let courses: Vec<Course> =
            serde_json::from_str(raw).context("failed to parse course catalog")?;

        for (i, course) in courses.iter().enumerate() {
            if courses[..i].iter().any(|c| c.id == course.id) {
                anyhow::bail!("duplicate course id in catalog: {}", course.id);
            }
        }

        for course in &courses {
            for prereq in &course.prerequisites {
                if !courses.iter().any(|c| &c.id == prereq) {
                    tracing::warn!(
                        course_id = %course.id,
                        prerequisite = %prereq,
                        "course lists a prerequisite missing from the catalog"
                    );
                }
            }
        }

        Ok(CourseCatalog { courses })
    }

    pub fn get(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
