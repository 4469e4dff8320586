use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Date format used by the creation forms and the store (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Represents a course the student is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// The unique identifier for the course, generated at creation.
    pub id: String,
    /// The display name of the course.
    pub name: String,
}

/// Workflow state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssignmentStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl AssignmentStatus {
    /// Returns the label shown in the status dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            AssignmentStatus::ToDo => "To Do",
            AssignmentStatus::InProgress => "In Progress",
            AssignmentStatus::Completed => "Completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AssignmentStatus::Completed)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Represents a single assignment belonging to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// The unique identifier for the assignment.
    pub id: String,
    /// The ID of the course this assignment belongs to.
    pub course_id: String,
    pub title: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: AssignmentStatus,
    /// Grade between 0 and 100. Independent of `status`.
    #[serde(default)]
    pub grade: Option<f64>,
}

/// Represents an exam belonging to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    /// The unique identifier for the exam.
    pub id: String,
    /// The ID of the course this exam belongs to.
    pub course_id: String,
    pub title: String,
    pub exam_date: NaiveDate,
    /// Grade between 0 and 100, `None` until entered.
    #[serde(default)]
    pub grade: Option<f64>,
}

/// Kind of a dated, gradable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Assignment,
    Exam,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Assignment => "Assignment",
            ItemKind::Exam => "Exam",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The logged-in user. Trust-on-input: nothing is verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub email: String,
    pub name: String,
}

/// Represents a single message in the assistant conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Sequence number within the conversation.
    pub id: u64,
    pub text: String,
    /// `true` when the message was produced by the assistant.
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of the three record collections, handed to the analytics functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records {
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
    pub exams: Vec<Exam>,
}

impl Records {
    pub fn new(courses: Vec<Course>, assignments: Vec<Assignment>, exams: Vec<Exam>) -> Self {
        Self {
            courses,
            assignments,
            exams,
        }
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }
}

// --- Creation drafts ---

/// Parses a form date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    Ok(NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)?)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Input of the "Add Course" form.
#[derive(Debug, Clone, Validate)]
pub struct NewCourse {
    #[validate(length(min = 1))]
    pub name: String,
}

impl NewCourse {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }

    pub(crate) fn into_course(self) -> Course {
        Course {
            id: new_id(),
            name: self.name,
        }
    }
}

/// Input of the "Add Assignment" form.
#[derive(Debug, Clone, Validate)]
pub struct NewAssignment {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub course_id: String,
    pub due_date: NaiveDate,
}

impl NewAssignment {
    pub fn new(title: &str, course_id: &str, due_date: NaiveDate) -> Self {
        Self {
            title: title.trim().to_string(),
            course_id: course_id.to_string(),
            due_date,
        }
    }

    /// Builds a draft from raw form fields, parsing the date.
    pub fn from_form(title: &str, course_id: &str, due_date: &str) -> Result<Self, AppError> {
        Ok(Self::new(title, course_id, parse_date(due_date)?))
    }

    /// New assignments start as `To Do` with no grade.
    pub(crate) fn into_assignment(self) -> Assignment {
        Assignment {
            id: new_id(),
            course_id: self.course_id,
            title: self.title,
            due_date: self.due_date,
            status: AssignmentStatus::ToDo,
            grade: None,
        }
    }
}

/// Input of the "Add Exam" form.
#[derive(Debug, Clone, Validate)]
pub struct NewExam {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub course_id: String,
    pub exam_date: NaiveDate,
}

impl NewExam {
    pub fn new(title: &str, course_id: &str, exam_date: NaiveDate) -> Self {
        Self {
            title: title.trim().to_string(),
            course_id: course_id.to_string(),
            exam_date,
        }
    }

    pub fn from_form(title: &str, course_id: &str, exam_date: &str) -> Result<Self, AppError> {
        Ok(Self::new(title, course_id, parse_date(exam_date)?))
    }

    pub(crate) fn into_exam(self) -> Exam {
        Exam {
            id: new_id(),
            course_id: self.course_id,
            title: self.title,
            exam_date: self.exam_date,
            grade: None,
        }
    }
}

/// A grade entered for an assignment or exam.
#[derive(Debug, Clone, Copy, Validate)]
#[validate(schema(function = "validate_finite_grade"))]
pub struct GradeInput {
    #[validate(range(min = 0.0, max = 100.0))]
    pub value: Option<f64>,
}

impl GradeInput {
    pub fn new(value: Option<f64>) -> Self {
        Self { value }
    }
}

// NaN passes every range comparison, so it needs its own check.
fn validate_finite_grade(input: &GradeInput) -> Result<(), ValidationError> {
    match input.value {
        Some(value) if !value.is_finite() => Err(ValidationError::new("grade_not_finite")),
        _ => Ok(()),
    }
}

/// Input of the login form.
#[derive(Debug, Clone, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
}

impl LoginRequest {
    /// Sign-in: the display name is the local part of the email, or the
    /// whole email when the local part is empty (`"@host"`).
    pub fn sign_in(email: &str) -> Self {
        let email = email.trim();
        let name = match email.split('@').next() {
            Some(local) if !local.is_empty() => local,
            _ => email,
        };
        Self {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    /// Sign-up: the display name is entered explicitly.
    pub fn sign_up(email: &str, name: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            name: name.trim().to_string(),
        }
    }

    pub(crate) fn into_session(self) -> UserSession {
        UserSession {
            email: self.email,
            name: self.name,
        }
    }
}
