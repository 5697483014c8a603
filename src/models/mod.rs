pub mod course;

pub use course::{Course, NewCourseRequest, UpdateCourseRequest, validate_course};
