//! Portal state: the user session and the three record collections.
//!
//! Every mutation replaces the in-memory state first and then writes the
//! affected slots through to the [`RecordStore`]. Store failures are logged
//! and never undo the in-memory change. Invalid input is a silent no-op.

use crate::analytics::{self, CalendarEvent, Dashboard};
use crate::models::{
    Assignment, AssignmentStatus, Course, Exam, GradeInput, LoginRequest, NewAssignment,
    NewCourse, NewExam, Records, UserSession,
};
use crate::store::{RecordStore, Slot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

pub struct Portal<S: RecordStore> {
    store: Arc<S>,
    user: Option<UserSession>,
    records: Records,
}

impl<S: RecordStore> Portal<S> {
    /// Restores the session and collections from the store.
    ///
    /// Unreadable or unparseable slots are discarded and start empty.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<S>) -> Self {
        let user = read_slot::<UserSession, _>(store.as_ref(), Slot::User).await;
        let courses = read_slot::<Vec<Course>, _>(store.as_ref(), Slot::Courses).await;
        let assignments = read_slot::<Vec<Assignment>, _>(store.as_ref(), Slot::Assignments).await;
        let exams = read_slot::<Vec<Exam>, _>(store.as_ref(), Slot::Exams).await;

        let records = Records::new(
            courses.unwrap_or_default(),
            assignments.unwrap_or_default(),
            exams.unwrap_or_default(),
        );
        info!(
            courses = records.courses.len(),
            assignments = records.assignments.len(),
            exams = records.exams.len(),
            authenticated = user.is_some(),
            "Portal state loaded"
        );

        Self {
            store,
            user,
            records,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn user(&self) -> Option<&UserSession> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    // --- Session ---

    /// Starts a session. Blank email or name is ignored.
    pub async fn login(&mut self, request: LoginRequest) -> Option<&UserSession> {
        if let Err(e) = request.validate() {
            debug!("Rejected login: {}", e);
            return None;
        }

        let session = request.into_session();
        self.persist(Slot::User, &session).await;
        info!(email = %session.email, "User logged in");
        self.user = Some(session);
        self.user.as_ref()
    }

    /// Clears the session. Collections are kept.
    pub async fn logout(&mut self) {
        self.user = None;
        if let Err(e) = self.store.remove(Slot::User).await {
            error!("Failed to remove {} from the store: {}", Slot::User, e);
        }
        info!("User logged out");
    }

    // --- Courses ---

    pub async fn add_course(&mut self, draft: NewCourse) -> Option<Course> {
        if let Err(e) = draft.validate() {
            debug!("Rejected course: {}", e);
            return None;
        }

        let course = draft.into_course();
        self.records.courses.push(course.clone());
        self.persist_courses().await;
        Some(course)
    }

    /// Deletes a course and every assignment and exam referencing it.
    #[instrument(skip(self))]
    pub async fn delete_course(&mut self, course_id: &str) -> bool {
        if self.records.course(course_id).is_none() {
            debug!("Unknown course");
            return false;
        }

        self.records.courses.retain(|c| c.id != course_id);
        let assignments_before = self.records.assignments.len();
        let exams_before = self.records.exams.len();
        self.records.assignments.retain(|a| a.course_id != course_id);
        self.records.exams.retain(|e| e.course_id != course_id);

        info!(
            assignments = assignments_before - self.records.assignments.len(),
            exams = exams_before - self.records.exams.len(),
            "Course deleted with its records"
        );

        self.persist_courses().await;
        self.persist_assignments().await;
        self.persist_exams().await;
        true
    }

    // --- Assignments ---

    /// Adds an assignment to an existing course, starting as `To Do` and ungraded.
    pub async fn add_assignment(&mut self, draft: NewAssignment) -> Option<Assignment> {
        if let Err(e) = draft.validate() {
            debug!("Rejected assignment: {}", e);
            return None;
        }
        if self.records.course(&draft.course_id).is_none() {
            debug!(course_id = %draft.course_id, "Rejected assignment for unknown course");
            return None;
        }

        let assignment = draft.into_assignment();
        self.records.assignments.push(assignment.clone());
        self.persist_assignments().await;
        Some(assignment)
    }

    pub async fn set_assignment_status(&mut self, id: &str, status: AssignmentStatus) -> bool {
        let Some(assignment) = self.records.assignments.iter_mut().find(|a| a.id == id) else {
            debug!(id, "Unknown assignment");
            return false;
        };
        assignment.status = status;
        self.persist_assignments().await;
        true
    }

    /// Sets or clears a grade. Grades outside 0-100 are ignored.
    pub async fn set_assignment_grade(&mut self, id: &str, grade: Option<f64>) -> bool {
        if let Err(e) = GradeInput::new(grade).validate() {
            debug!("Rejected grade: {}", e);
            return false;
        }
        let Some(assignment) = self.records.assignments.iter_mut().find(|a| a.id == id) else {
            debug!(id, "Unknown assignment");
            return false;
        };
        assignment.grade = grade;
        self.persist_assignments().await;
        true
    }

    pub async fn delete_assignment(&mut self, id: &str) -> bool {
        let before = self.records.assignments.len();
        self.records.assignments.retain(|a| a.id != id);
        if self.records.assignments.len() == before {
            return false;
        }
        self.persist_assignments().await;
        true
    }

    // --- Exams ---

    pub async fn add_exam(&mut self, draft: NewExam) -> Option<Exam> {
        if let Err(e) = draft.validate() {
            debug!("Rejected exam: {}", e);
            return None;
        }
        if self.records.course(&draft.course_id).is_none() {
            debug!(course_id = %draft.course_id, "Rejected exam for unknown course");
            return None;
        }

        let exam = draft.into_exam();
        self.records.exams.push(exam.clone());
        self.persist_exams().await;
        Some(exam)
    }

    pub async fn set_exam_grade(&mut self, id: &str, grade: Option<f64>) -> bool {
        if let Err(e) = GradeInput::new(grade).validate() {
            debug!("Rejected grade: {}", e);
            return false;
        }
        let Some(exam) = self.records.exams.iter_mut().find(|e| e.id == id) else {
            debug!(id, "Unknown exam");
            return false;
        };
        exam.grade = grade;
        self.persist_exams().await;
        true
    }

    pub async fn delete_exam(&mut self, id: &str) -> bool {
        let before = self.records.exams.len();
        self.records.exams.retain(|e| e.id != id);
        if self.records.exams.len() == before {
            return false;
        }
        self.persist_exams().await;
        true
    }

    // --- Views ---

    pub fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        analytics::dashboard(&self.records, now)
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        analytics::events_on(&self.records, date)
    }

    // --- Persistence ---

    async fn persist_courses(&self) {
        self.persist(Slot::Courses, &self.records.courses).await;
    }

    async fn persist_assignments(&self) {
        self.persist(Slot::Assignments, &self.records.assignments)
            .await;
    }

    async fn persist_exams(&self) {
        self.persist(Slot::Exams, &self.records.exams).await;
    }

    /// Best-effort write. Empty collections are written too, so deleting the
    /// last record clears the slot instead of resurrecting old data.
    async fn persist<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {}: {}", slot, e);
                return;
            }
        };
        if let Err(e) = self.store.save(slot, &json).await {
            error!("Failed to save {} to the store: {}", slot, e);
        }
    }
}

/// Reads and parses a slot. Corrupt values are removed from the store.
async fn read_slot<T, S>(store: &S, slot: Slot) -> Option<T>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let raw = match store.load(slot).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            error!("Failed to read {} from the store: {}", slot, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Invalid {} data in the store, clearing: {}", slot, e);
            if let Err(e) = store.remove(slot).await {
                error!("Failed to clear {}: {}", slot, e);
            }
            None
        }
    }
}
