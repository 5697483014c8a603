use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validator::Validator;

/// Upper bound, in bytes, for every text field on a course.
pub const MAX_FIELD_BYTES: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub credit: String,
    pub created_at: DateTime<Utc>,
    pub version: i64,
}

impl Course {
    pub fn apply(&mut self, req: UpdateCourseRequest) {
        if let Some(code) = req.code {
            self.code = code;
        }
        if let Some(title) = req.title {
            self.title = title;
        }
        if let Some(credit) = req.credit {
            self.credit = credit;
        }
    }

    pub fn validate(&self, v: &mut Validator) {
        validate_course(v, &self.code, &self.title, &self.credit);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCourseRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub credit: String,
}

impl NewCourseRequest {
    pub fn validate(&self, v: &mut Validator) {
        validate_course(v, &self.code, &self.title, &self.credit);
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub credit: Option<String>,
}

/// Runs every field check without stopping at the first failure.
pub fn validate_course(v: &mut Validator, code: &str, title: &str, credit: &str) {
    check_text(v, "code", code);
    check_text(v, "title", title);
    check_text(v, "credit", credit);
}

fn check_text(v: &mut Validator, field: &str, value: &str) {
    v.check(!value.is_empty(), field, "must be provided");
    v.check(
        value.len() <= MAX_FIELD_BYTES,
        field,
        &format!("must not be more than {} bytes long", MAX_FIELD_BYTES),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Course {
        Course {
            id: 1,
            code: "CS101".to_string(),
            title: "Intro".to_string(),
            credit: "3".to_string(),
            created_at: Utc::now(),
            version: 1,
        }
    }

    #[test]
    fn compliant_course_has_no_errors() {
        let mut v = Validator::new();
        sample().validate(&mut v);
        assert!(v.is_valid());
    }

    #[test]
    fn boundary_length_is_accepted() {
        let mut course = sample();
        course.title = "t".repeat(MAX_FIELD_BYTES);
        let mut v = Validator::new();
        course.validate(&mut v);
        assert!(v.is_valid());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let req = NewCourseRequest {
            code: String::new(),
            title: "x".repeat(MAX_FIELD_BYTES + 1),
            credit: "3".to_string(),
        };
        let mut v = Validator::new();
        req.validate(&mut v);

        let errors = v.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["code"], "must be provided");
        assert_eq!(errors["title"], "must not be more than 200 bytes long");
        assert!(!errors.contains_key("credit"));
    }

    #[test]
    fn length_is_measured_in_bytes() {
        // 101 two-byte characters exceed the limit despite being 101 chars.
        let mut course = sample();
        course.credit = "é".repeat(101);
        let mut v = Validator::new();
        course.validate(&mut v);
        assert_eq!(
            v.errors().get("credit").map(String::as_str),
            Some("must not be more than 200 bytes long")
        );
    }

    #[test]
    fn apply_patches_only_supplied_fields() {
        let mut course = sample();
        course.apply(UpdateCourseRequest {
            title: Some("Intro to CS".to_string()),
            credit: Some("4".to_string()),
            ..Default::default()
        });
        assert_eq!(course.code, "CS101");
        assert_eq!(course.title, "Intro to CS");
        assert_eq!(course.credit, "4");
        assert_eq!(course.version, 1);
    }
}
