//! Date-driven views: progress ratios, upcoming deadlines, calendar lookups.

use crate::analytics::round_grade;
use crate::models::{AssignmentStatus, ItemKind, Records};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries in the upcoming deadlines list.
pub const UPCOMING_LIMIT: usize = 5;

const UNKNOWN_COURSE: &str = "Unknown Course";

/// Completion and grading ratios, as integer percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed_assignments: usize,
    pub total_assignments: usize,
    pub graded_exams: usize,
    pub total_exams: usize,
    /// `completed / max(total, 1)` as a percentage.
    pub assignment_completion: u32,
    /// `graded / max(total, 1)` as a percentage.
    pub exam_grading: u32,
}

pub fn progress(records: &Records) -> Progress {
    let completed_assignments = records
        .assignments
        .iter()
        .filter(|a| a.status.is_completed())
        .count();
    let graded_exams = records.exams.iter().filter(|e| e.grade.is_some()).count();
    let total_assignments = records.assignments.len();
    let total_exams = records.exams.len();

    Progress {
        completed_assignments,
        total_assignments,
        graded_exams,
        total_exams,
        assignment_completion: percentage(completed_assignments, total_assignments),
        exam_grading: percentage(graded_exams, total_exams),
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    round_grade(part as f64 / total.max(1) as f64 * 100.0)
}

/// An assignment or exam on the upcoming list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub kind: ItemKind,
    pub date: NaiveDate,
    /// The date (at 00:00 UTC) is strictly before `now`.
    pub overdue: bool,
}

/// `true` if `date` at midnight UTC lies strictly before `now`.
pub fn is_overdue(date: NaiveDate, now: DateTime<Utc>) -> bool {
    date.and_time(NaiveTime::MIN).and_utc() < now
}

/// Incomplete assignments and all exams, earliest first, at most [`UPCOMING_LIMIT`].
pub fn upcoming_deadlines(records: &Records, now: DateTime<Utc>) -> Vec<Deadline> {
    let assignments = records
        .assignments
        .iter()
        .filter(|a| !a.status.is_completed())
        .map(|a| (ItemKind::Assignment, &a.id, &a.course_id, &a.title, a.due_date));
    let exams = records
        .exams
        .iter()
        .map(|e| (ItemKind::Exam, &e.id, &e.course_id, &e.title, e.exam_date));

    let mut items: Vec<_> = assignments.chain(exams).collect();
    items.sort_by_key(|item| item.4);

    items
        .into_iter()
        .take(UPCOMING_LIMIT)
        .map(|(kind, id, course_id, title, date)| Deadline {
            id: id.clone(),
            course_id: course_id.clone(),
            title: title.clone(),
            kind,
            date,
            overdue: is_overdue(date, now),
        })
        .collect()
}

/// Incomplete assignments due on `today`.
pub fn due_on(records: &Records, today: NaiveDate) -> usize {
    records
        .assignments
        .iter()
        .filter(|a| a.due_date == today && !a.status.is_completed())
        .count()
}

/// An item shown on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub course_name: String,
    /// Set for assignments.
    pub status: Option<AssignmentStatus>,
    /// Set for graded exams.
    pub grade: Option<f64>,
}

/// Assignments due and exams held on `date`; assignments first.
pub fn events_on(records: &Records, date: NaiveDate) -> Vec<CalendarEvent> {
    let course_name = |course_id: &str| {
        records
            .course(course_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_COURSE.to_string())
    };

    let assignments = records
        .assignments
        .iter()
        .filter(|a| a.due_date == date)
        .map(|a| CalendarEvent {
            id: a.id.clone(),
            kind: ItemKind::Assignment,
            title: a.title.clone(),
            course_name: course_name(&a.course_id),
            status: Some(a.status),
            grade: None,
        });
    let exams = records
        .exams
        .iter()
        .filter(|e| e.exam_date == date)
        .map(|e| CalendarEvent {
            id: e.id.clone(),
            kind: ItemKind::Exam,
            title: e.title.clone(),
            course_name: course_name(&e.course_id),
            status: None,
            grade: e.grade,
        });

    assignments.chain(exams).collect()
}
