//! Per-course performance.

use crate::analytics::{mean, round_grade};
use crate::models::Records;
use serde::{Deserialize, Serialize};

/// Performance figures of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePerformance {
    pub course_id: String,
    pub name: String,
    /// Mean of completed, graded assignments; 0 when there are none.
    pub assignment_average: u32,
    /// Mean of graded exams; 0 when there are none.
    pub exam_average: u32,
    /// `(assignment mean + exam mean) / 2` on the unrounded means.
    ///
    /// An empty category counts as 0, so a course with only assignments graded
    /// 80 scores 40 here.
    pub combined: u32,
    /// Mean over all counted grades of the course pooled together.
    pub average: u32,
    pub assignment_count: usize,
    pub exam_count: usize,
}

/// Computes [`CoursePerformance`] for every course, in course order.
pub fn course_performance(records: &Records) -> Vec<CoursePerformance> {
    records
        .courses
        .iter()
        .map(|course| {
            let assignment_grades: Vec<f64> = records
                .assignments
                .iter()
                .filter(|a| a.course_id == course.id && a.status.is_completed())
                .filter_map(|a| a.grade)
                .collect();
            let exam_grades: Vec<f64> = records
                .exams
                .iter()
                .filter(|e| e.course_id == course.id)
                .filter_map(|e| e.grade)
                .collect();

            let assignment_mean = mean(assignment_grades.iter().copied()).unwrap_or(0.0);
            let exam_mean = mean(exam_grades.iter().copied()).unwrap_or(0.0);
            let pooled = mean(assignment_grades.iter().chain(exam_grades.iter()).copied());

            CoursePerformance {
                course_id: course.id.clone(),
                name: course.name.clone(),
                assignment_average: round_grade(assignment_mean),
                exam_average: round_grade(exam_mean),
                combined: round_grade((assignment_mean + exam_mean) / 2.0),
                average: pooled.map(round_grade).unwrap_or(0),
                assignment_count: assignment_grades.len(),
                exam_count: exam_grades.len(),
            }
        })
        .collect()
}
