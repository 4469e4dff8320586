//! Portal Tests
//!
//! Record CRUD, cascade delete, write-through persistence, and recovery from
//! corrupt or failing stores.

use crate::analytics::{grade_distribution, overall_average};
use crate::error::AppError;
use crate::models::{
    AssignmentStatus, Course, LoginRequest, NewAssignment, NewCourse, NewExam,
};
use crate::portal::Portal;
use crate::store::{MemoryStore, RecordStore, Slot};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

async fn empty_portal() -> Portal<MemoryStore> {
    Portal::load(Arc::new(MemoryStore::new())).await
}

/// Store whose writes always fail, counting attempts.
#[derive(Default)]
struct BrokenStore {
    writes: AtomicUsize,
}

#[async_trait]
impl RecordStore for BrokenStore {
    async fn load(&self, _slot: Slot) -> Result<Option<String>, AppError> {
        Err(AppError::Io(std::io::Error::other("store unavailable")))
    }

    async fn save(&self, _slot: Slot, _value: &str) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Io(std::io::Error::other("quota exceeded")))
    }

    async fn remove(&self, _slot: Slot) -> Result<(), AppError> {
        Err(AppError::Io(std::io::Error::other("store unavailable")))
    }
}

#[cfg(test)]
mod course_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_course_trims_and_persists() {
        let mut portal = empty_portal().await;

        let course = portal
            .add_course(NewCourse::new("  Linear Algebra "))
            .await
            .expect("course created");
        assert_eq!(course.name, "Linear Algebra");
        assert!(!course.id.is_empty());

        let stored = portal.store().load(Slot::Courses).await.unwrap().unwrap();
        let courses: Vec<Course> = serde_json::from_str(&stored).unwrap();
        assert_eq!(courses, vec![course]);
    }

    #[tokio::test]
    async fn test_blank_course_is_a_no_op() {
        let mut portal = empty_portal().await;

        assert!(portal.add_course(NewCourse::new("   ")).await.is_none());
        assert!(portal.records().courses.is_empty());
        assert_eq!(portal.store().load(Slot::Courses).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_course_ids_are_unique() {
        let mut portal = empty_portal().await;
        let a = portal.add_course(NewCourse::new("Math")).await.unwrap();
        let b = portal.add_course(NewCourse::new("Math")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_delete_course_cascades() {
        let mut portal = empty_portal().await;
        let math = portal.add_course(NewCourse::new("Math")).await.unwrap();
        let art = portal.add_course(NewCourse::new("Art")).await.unwrap();

        for (course, title) in [(&math, "Homework 1"), (&math, "Homework 2"), (&art, "Sketch")] {
            portal
                .add_assignment(NewAssignment::new(title, &course.id, date(2024, 5, 1)))
                .await
                .expect("assignment created");
        }
        portal
            .add_exam(NewExam::new("Final", &math.id, date(2024, 6, 1)))
            .await
            .expect("exam created");

        assert!(portal.delete_course(&math.id).await);

        let records = portal.records();
        assert_eq!(records.courses.len(), 1);
        assert!(records.assignments.iter().all(|a| a.course_id == art.id));
        assert_eq!(records.assignments.len(), 1);
        assert!(records.exams.is_empty());

        // Nothing orphaned survives a reload either.
        let reloaded = Portal::load(Arc::new(MemoryStore::with_values(
            dump(portal.store()).await,
        )))
        .await;
        assert_eq!(reloaded.records(), portal.records());
    }

    #[tokio::test]
    async fn test_delete_unknown_course() {
        let mut portal = empty_portal().await;
        assert!(!portal.delete_course("missing").await);
    }

    #[tokio::test]
    async fn test_deleting_last_course_clears_the_slot() {
        let mut portal = empty_portal().await;
        let course = portal.add_course(NewCourse::new("Math")).await.unwrap();
        portal.delete_course(&course.id).await;

        let stored = portal.store().load(Slot::Courses).await.unwrap();
        assert_eq!(stored.as_deref(), Some("[]"));
    }

    /// Copies every slot out of a store.
    async fn dump(store: &MemoryStore) -> Vec<(Slot, String)> {
        let mut values = Vec::new();
        for slot in Slot::ALL {
            if let Some(value) = store.load(slot).await.unwrap() {
                values.push((slot, value));
            }
        }
        values
    }
}

#[cfg(test)]
mod assignment_and_exam_tests {
    use super::*;

    #[tokio::test]
    async fn test_assignment_requires_existing_course() {
        let mut portal = empty_portal().await;
        let draft = NewAssignment::new("Essay", "no-such-course", date(2024, 5, 1));
        assert!(portal.add_assignment(draft).await.is_none());

        let exam = NewExam::new("Quiz", "no-such-course", date(2024, 5, 1));
        assert!(portal.add_exam(exam).await.is_none());
    }

    #[tokio::test]
    async fn test_new_assignment_defaults() {
        let mut portal = empty_portal().await;
        let course = portal.add_course(NewCourse::new("Math")).await.unwrap();

        let assignment = portal
            .add_assignment(NewAssignment::from_form(" Essay ", &course.id, "2024-05-01").unwrap())
            .await
            .unwrap();
        assert_eq!(assignment.title, "Essay");
        assert_eq!(assignment.status, AssignmentStatus::ToDo);
        assert_eq!(assignment.grade, None);
    }

    #[tokio::test]
    async fn test_status_and_grade_are_independent() {
        let mut portal = empty_portal().await;
        let course = portal.add_course(NewCourse::new("Math")).await.unwrap();
        let assignment = portal
            .add_assignment(NewAssignment::new("Essay", &course.id, date(2024, 5, 1)))
            .await
            .unwrap();

        assert!(portal.set_assignment_grade(&assignment.id, Some(88.0)).await);
        assert!(portal.set_assignment_status(&assignment.id, AssignmentStatus::InProgress).await);

        let stored = &portal.records().assignments[0];
        assert_eq!(stored.grade, Some(88.0));
        assert_eq!(stored.status, AssignmentStatus::InProgress);

        assert!(!portal.set_assignment_grade(&assignment.id, Some(120.0)).await);
        assert_eq!(portal.records().assignments[0].grade, Some(88.0));

        assert!(portal.set_assignment_grade(&assignment.id, None).await);
        assert_eq!(portal.records().assignments[0].grade, None);

        assert!(!portal.set_assignment_status("missing", AssignmentStatus::Completed).await);
    }

    #[tokio::test]
    async fn test_exam_grade_and_delete() {
        let mut portal = empty_portal().await;
        let course = portal.add_course(NewCourse::new("Math")).await.unwrap();
        let exam = portal
            .add_exam(NewExam::new("Midterm", &course.id, date(2024, 5, 1)))
            .await
            .unwrap();

        assert!(portal.set_exam_grade(&exam.id, Some(75.5)).await);
        assert_eq!(portal.records().exams[0].grade, Some(75.5));
        assert!(!portal.set_exam_grade(&exam.id, Some(-3.0)).await);

        assert!(portal.delete_exam(&exam.id).await);
        assert!(!portal.delete_exam(&exam.id).await);
        assert_eq!(
            portal.store().load(Slot::Exams).await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_non_finite_grades_are_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut portal = Portal::load(Arc::clone(&store)).await;
        let course = portal.add_course(NewCourse::new("Math")).await.unwrap();
        let graded = portal
            .add_exam(NewExam::new("Midterm", &course.id, date(2024, 5, 1)))
            .await
            .unwrap();
        let other = portal
            .add_exam(NewExam::new("Final", &course.id, date(2024, 6, 1)))
            .await
            .unwrap();
        let assignment = portal
            .add_assignment(NewAssignment::new("Essay", &course.id, date(2024, 5, 1)))
            .await
            .unwrap();

        assert!(portal.set_exam_grade(&graded.id, Some(80.0)).await);
        assert!(!portal.set_exam_grade(&other.id, Some(f64::NAN)).await);
        assert!(!portal.set_exam_grade(&other.id, Some(f64::INFINITY)).await);
        assert!(!portal.set_assignment_grade(&assignment.id, Some(f64::NAN)).await);

        assert_eq!(portal.records().exams[1].grade, None);
        assert_eq!(portal.records().assignments[0].grade, None);
        assert_eq!(overall_average(portal.records()), 80);
        assert_eq!(grade_distribution(portal.records()).total(), 1);

        // Memory and store still agree after a reload.
        let reloaded = Portal::load(store).await;
        assert_eq!(reloaded.records(), portal.records());
    }

    #[tokio::test]
    async fn test_delete_assignment() {
        let mut portal = empty_portal().await;
        let course = portal.add_course(NewCourse::new("Math")).await.unwrap();
        let assignment = portal
            .add_assignment(NewAssignment::new("Essay", &course.id, date(2024, 5, 1)))
            .await
            .unwrap();

        assert!(portal.delete_assignment(&assignment.id).await);
        assert!(portal.records().assignments.is_empty());
        assert!(!portal.delete_assignment(&assignment.id).await);
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_logout_roundtrip() {
        let store = Arc::new(MemoryStore::new());
        let mut portal = Portal::load(Arc::clone(&store)).await;
        assert!(!portal.is_authenticated());

        let user = portal
            .login(LoginRequest::sign_in("ada@example.com"))
            .await
            .cloned()
            .expect("logged in");
        assert_eq!(user.name, "ada");

        let restored = Portal::load(Arc::clone(&store)).await;
        assert_eq!(restored.user(), Some(&user));

        portal.logout().await;
        assert!(!portal.is_authenticated());
        assert_eq!(store.load(Slot::User).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_login_is_ignored() {
        let mut portal = empty_portal().await;
        assert!(portal.login(LoginRequest::sign_up("ada@example.com", "  ")).await.is_none());
        assert!(portal.login(LoginRequest::sign_in("   ")).await.is_none());
        assert!(!portal.is_authenticated());
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[tokio::test]
    async fn test_reload_restores_collections() {
        let store = Arc::new(MemoryStore::new());
        let mut portal = Portal::load(Arc::clone(&store)).await;

        let course = portal.add_course(NewCourse::new("Math")).await.unwrap();
        let assignment = portal
            .add_assignment(NewAssignment::new("Essay", &course.id, date(2024, 5, 1)))
            .await
            .unwrap();
        portal.set_assignment_status(&assignment.id, AssignmentStatus::Completed).await;
        portal.set_assignment_grade(&assignment.id, Some(93.0)).await;

        let reloaded = Portal::load(store).await;
        assert_eq!(reloaded.records(), portal.records());
        assert_eq!(reloaded.records().assignments[0].status, AssignmentStatus::Completed);
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_discarded() {
        let valid = r#"[{"id":"c1","name":"Math"}]"#.to_string();
        let store = Arc::new(MemoryStore::with_values([
            (Slot::User, "{not json".to_string()),
            (Slot::Courses, valid),
            (Slot::Assignments, "42".to_string()),
        ]));

        let portal = Portal::load(Arc::clone(&store)).await;

        assert!(!portal.is_authenticated());
        assert_eq!(portal.records().courses.len(), 1);
        assert!(portal.records().assignments.is_empty());
        assert_eq!(store.load(Slot::User).await.unwrap(), None);
        assert_eq!(store.load(Slot::Assignments).await.unwrap(), None);
        assert!(store.load(Slot::Courses).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_timestamp_ids_and_integer_grades_load() {
        let assignments = r#"[{"id":"1700000000000","courseId":"c1","title":"Lab","dueDate":"2024-05-01","status":"In Progress","grade":null}]"#;
        let exams = r#"[{"id":"1700000000001","courseId":"c1","title":"Quiz","examDate":"2024-05-02","grade":64}]"#;
        let store = Arc::new(MemoryStore::with_values([
            (Slot::Courses, r#"[{"id":"c1","name":"Math"}]"#.to_string()),
            (Slot::Assignments, assignments.to_string()),
            (Slot::Exams, exams.to_string()),
        ]));

        let portal = Portal::load(store).await;
        assert_eq!(portal.records().assignments[0].status, AssignmentStatus::InProgress);
        assert_eq!(portal.records().exams[0].grade, Some(64.0));
    }

    #[tokio::test]
    async fn test_failed_writes_do_not_block_changes() {
        let store = Arc::new(BrokenStore::default());
        let mut portal = Portal::load(Arc::clone(&store)).await;

        let course = portal.add_course(NewCourse::new("Math")).await.expect("created in memory");
        portal
            .add_assignment(NewAssignment::new("Essay", &course.id, date(2024, 5, 1)))
            .await
            .expect("created in memory");
        assert!(portal.login(LoginRequest::sign_up("ada@example.com", "Ada")).await.is_some());
        portal.logout().await;

        assert_eq!(portal.records().courses.len(), 1);
        assert_eq!(portal.records().assignments.len(), 1);
        assert!(!portal.is_authenticated());
        assert_eq!(store.writes.load(Ordering::SeqCst), 3);
    }
}
