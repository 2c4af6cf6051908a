// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Score to letter-grade derivation.
//!
//! A grade table is an ordered list of inclusive score intervals. The table
//! is validated once on construction so that every lookup afterwards can
//! rely on each score matching at most one interval.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// One interval of a grade table. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRange {
    pub grade: String,
    pub min_range: f64,
    pub max_range: f64,
}

impl GradeRange {
    #[must_use]
    pub fn new(grade: &str, min_range: f64, max_range: f64) -> Self {
        Self {
            grade: grade.to_string(),
            min_range,
            max_range,
        }
    }

    /// Returns true if `score` lies within `[min_range, max_range]`.
    #[must_use]
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min_range && score <= self.max_range
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.min_range <= other.max_range && other.min_range <= self.max_range
    }
}

/// A validated, non-overlapping set of grade ranges.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradeRange>", into = "Vec<GradeRange>")]
pub struct GradeTable {
    ranges: Vec<GradeRange>,
}

impl GradeTable {
    /// Builds a grade table, keeping the configured order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A grade label is empty
    /// - A bound is not finite or `min_range > max_range`
    /// - Two ranges share any score, including a shared boundary
    pub fn new(ranges: Vec<GradeRange>) -> Result<Self, DomainError> {
        for range in &ranges {
            if range.grade.trim().is_empty() {
                return Err(DomainError::InvalidGradeRange {
                    grade: range.grade.clone(),
                    reason: String::from("grade label must not be empty"),
                });
            }
            if !range.min_range.is_finite() || !range.max_range.is_finite() {
                return Err(DomainError::InvalidGradeRange {
                    grade: range.grade.clone(),
                    reason: String::from("bounds must be finite numbers"),
                });
            }
            if range.min_range > range.max_range {
                return Err(DomainError::InvalidGradeRange {
                    grade: range.grade.clone(),
                    reason: format!(
                        "minimum {} is greater than maximum {}",
                        range.min_range, range.max_range
                    ),
                });
            }
        }

        for (i, first) in ranges.iter().enumerate() {
            if let Some(second) = ranges[i + 1..].iter().find(|other| first.overlaps(other)) {
                return Err(DomainError::OverlappingGradeRanges {
                    first: first.grade.clone(),
                    second: second.grade.clone(),
                });
            }
        }

        Ok(Self { ranges })
    }

    /// Returns the grade whose range contains `score`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoMatchingGrade` if no range contains the score,
    /// which is always the case for an empty table.
    pub fn grade_of(&self, score: f64) -> Result<&str, DomainError> {
        self.ranges
            .iter()
            .find(|range| range.contains(score))
            .map(|range| range.grade.as_str())
            .ok_or(DomainError::NoMatchingGrade { score })
    }

    #[must_use]
    pub fn ranges(&self) -> &[GradeRange] {
        &self.ranges
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl TryFrom<Vec<GradeRange>> for GradeTable {
    type Error = DomainError;

    fn try_from(ranges: Vec<GradeRange>) -> Result<Self, Self::Error> {
        Self::new(ranges)
    }
}

impl From<GradeTable> for Vec<GradeRange> {
    fn from(table: GradeTable) -> Self {
        table.ranges
    }
}

/// Computes the weight-normalised score of `(weight, score)` pairs.
///
/// Entries with a non-positive weight are ignored. Returns `None` when no
/// weight remains.
#[must_use]
pub fn weighted_score(entries: &[(f64, f64)]) -> Option<f64> {
    let (weighted_sum, total_weight) = entries
        .iter()
        .filter(|(weight, _)| *weight > 0.0)
        .fold((0.0, 0.0), |(sum, total), (weight, score)| {
            (sum + weight * score, total + weight)
        });

    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}
