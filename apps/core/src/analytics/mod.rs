//! # Analytics Module
//!
//! Pure aggregations over a [`Records`] snapshot. Nothing is cached: every call
//! recomputes from the input, and empty input yields zero-valued results.
//!
//! ## Components
//! - `grades`: overall average, letter distribution, chronological trend
//! - `courses`: per-course assignment/exam/combined scores
//! - `schedule`: progress ratios, upcoming deadlines, calendar lookups

pub mod courses;
pub mod grades;
pub mod schedule;

pub use courses::{course_performance, CoursePerformance};
pub use grades::{
    grade_distribution, overall_average, performance_trend, GradeBand, GradeDistribution,
    TrendPoint,
};
pub use schedule::{
    due_on, events_on, is_overdue, progress, upcoming_deadlines, CalendarEvent, Deadline,
    Progress, UPCOMING_LIMIT,
};

use crate::models::{AssignmentStatus, Records};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arithmetic mean, `None` for an empty input.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Rounds half up to a non-negative integer.
pub(crate) fn round_grade(value: f64) -> u32 {
    (value + 0.5).floor().max(0.0) as u32
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_courses: usize,
    /// Assignments whose status is not `Completed`.
    pub pending_assignments: usize,
    /// Incomplete assignments due today (UTC).
    pub due_today: usize,
    pub overall_average: u32,
    pub progress: Progress,
    pub courses: Vec<CoursePerformance>,
    pub distribution: GradeDistribution,
    pub trend: Vec<TrendPoint>,
    pub upcoming: Vec<Deadline>,
}

/// Builds the full dashboard view at `now`.
pub fn dashboard(records: &Records, now: DateTime<Utc>) -> Dashboard {
    Dashboard {
        total_courses: records.courses.len(),
        pending_assignments: records
            .assignments
            .iter()
            .filter(|a| a.status != AssignmentStatus::Completed)
            .count(),
        due_today: due_on(records, now.date_naive()),
        overall_average: overall_average(records),
        progress: progress(records),
        courses: course_performance(records),
        distribution: grade_distribution(records),
        trend: performance_trend(records),
        upcoming: upcoming_deadlines(records, now),
    }
}
