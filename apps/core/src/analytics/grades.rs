//! Grade-level aggregates: overall average, letter distribution, trend line.

use crate::analytics::{mean, round_grade};
use crate::models::{ItemKind, Records};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mean of completed+graded assignments and graded exams, rounded. Empty -> 0.
pub fn overall_average(records: &Records) -> u32 {
    let assignments = records
        .assignments
        .iter()
        .filter(|a| a.status.is_completed())
        .filter_map(|a| a.grade);
    let exams = records.exams.iter().filter_map(|e| e.grade);

    mean(assignments.chain(exams)).map(round_grade).unwrap_or(0)
}

/// Letter band of a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeBand {
    A,
    B,
    C,
    D,
    F,
}

impl GradeBand {
    pub const ALL: [GradeBand; 5] = [
        GradeBand::A,
        GradeBand::B,
        GradeBand::C,
        GradeBand::D,
        GradeBand::F,
    ];

    /// [90,100] A, [80,90) B, [70,80) C, [60,70) D, below 60 F.
    pub fn for_grade(grade: f64) -> Self {
        if grade >= 90.0 {
            GradeBand::A
        } else if grade >= 80.0 {
            GradeBand::B
        } else if grade >= 70.0 {
            GradeBand::C
        } else if grade >= 60.0 {
            GradeBand::D
        } else {
            GradeBand::F
        }
    }

    /// Range label as shown on the chart axis.
    pub fn range(&self) -> &'static str {
        match self {
            GradeBand::A => "90-100",
            GradeBand::B => "80-89",
            GradeBand::C => "70-79",
            GradeBand::D => "60-69",
            GradeBand::F => "0-59",
        }
    }

    fn slot(&self) -> usize {
        match self {
            GradeBand::A => 0,
            GradeBand::B => 1,
            GradeBand::C => 2,
            GradeBand::D => 3,
            GradeBand::F => 4,
        }
    }
}

/// Count of graded items per letter band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution {
    counts: [usize; 5],
}

impl GradeDistribution {
    pub fn from_grades(grades: impl IntoIterator<Item = f64>) -> Self {
        let mut distribution = Self::default();
        for grade in grades {
            distribution.counts[GradeBand::for_grade(grade).slot()] += 1;
        }
        distribution
    }

    pub fn count(&self, band: GradeBand) -> usize {
        self.counts[band.slot()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(band, count)` pairs from A to F.
    pub fn bands(&self) -> impl Iterator<Item = (GradeBand, usize)> + '_ {
        GradeBand::ALL.into_iter().map(|band| (band, self.count(band)))
    }
}

/// Buckets every graded assignment (any status) and graded exam.
pub fn grade_distribution(records: &Records) -> GradeDistribution {
    let assignments = records.assignments.iter().filter_map(|a| a.grade);
    let exams = records.exams.iter().filter_map(|e| e.grade);
    GradeDistribution::from_grades(assignments.chain(exams))
}

/// One point of the chronological grade line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 1-based position in the series.
    pub index: usize,
    /// `"{kind} {index}"`, e.g. `"Exam 3"`.
    pub label: String,
    pub kind: ItemKind,
    pub date: NaiveDate,
    pub grade: f64,
}

/// Graded assignments (by due date) and graded exams (by exam date), oldest first.
///
/// The sort is stable: items sharing a date keep their input order, assignments
/// before exams.
pub fn performance_trend(records: &Records) -> Vec<TrendPoint> {
    let assignments = records
        .assignments
        .iter()
        .filter_map(|a| a.grade.map(|grade| (ItemKind::Assignment, a.due_date, grade)));
    let exams = records
        .exams
        .iter()
        .filter_map(|e| e.grade.map(|grade| (ItemKind::Exam, e.exam_date, grade)));

    let mut items: Vec<_> = assignments.chain(exams).collect();
    items.sort_by_key(|(_, date, _)| *date);

    items
        .into_iter()
        .enumerate()
        .map(|(i, (kind, date, grade))| TrendPoint {
            index: i + 1,
            label: format!("{} {}", kind, i + 1),
            kind,
            date,
            grade,
        })
        .collect()
}
