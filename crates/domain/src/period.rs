// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Externally supplied evaluation period configuration.

use crate::error::DomainError;
use crate::grade::GradeTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const fn default_max_self_evaluation_rate() -> f64 {
    120.0
}

/// Phase boundaries and scoring rules for one evaluation period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodConfig {
    pub period_id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub self_evaluation_deadline: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub downward_evaluation_deadline: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub peer_evaluation_deadline: Option<OffsetDateTime>,
    /// Upper bound for self and downward evaluation scores.
    #[serde(default = "default_max_self_evaluation_rate")]
    pub max_self_evaluation_rate: f64,
    #[serde(default)]
    pub grade_ranges: GradeTable,
}

impl PeriodConfig {
    /// Checks that the phase boundaries are consistent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPeriodConfig` if the period ends before it
    /// starts, a deadline falls outside the period, or the maximum score is
    /// not positive.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.end_date < self.start_date {
            return Err(self.invalid("end date precedes start date"));
        }
        if !(self.max_self_evaluation_rate.is_finite() && self.max_self_evaluation_rate > 0.0) {
            return Err(self.invalid("maximum self evaluation rate must be positive"));
        }
        let deadlines = [
            ("self evaluation", self.self_evaluation_deadline),
            ("downward evaluation", self.downward_evaluation_deadline),
            ("peer evaluation", self.peer_evaluation_deadline),
        ];
        for (label, deadline) in deadlines {
            let outside = deadline.is_some_and(|d| d < self.start_date || d > self.end_date);
            if outside {
                return Err(self.invalid(&format!("{label} deadline is outside the period")));
            }
        }
        Ok(())
    }

    /// The last moment a downward evaluation may be changed.
    #[must_use]
    pub fn downward_deadline(&self) -> OffsetDateTime {
        self.downward_evaluation_deadline.unwrap_or(self.end_date)
    }

    /// Rejects downward evaluation changes after the deadline.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PeriodExpired` when `now` is past the deadline.
    pub fn ensure_downward_open(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        self.ensure_before(self.downward_deadline(), now)
    }

    /// Rejects employee edits and submissions of self evaluations after the
    /// self-evaluation deadline. Without one the phase stays open.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PeriodExpired` when `now` is past the deadline.
    pub fn ensure_self_evaluation_open(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        self.self_evaluation_deadline
            .map_or(Ok(()), |deadline| self.ensure_before(deadline, now))
    }

    /// Rejects peer answers and submissions after the peer-evaluation
    /// deadline. Without one the phase stays open.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PeriodExpired` when `now` is past the deadline.
    pub fn ensure_peer_evaluation_open(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        self.peer_evaluation_deadline
            .map_or(Ok(()), |deadline| self.ensure_before(deadline, now))
    }

    fn ensure_before(
        &self,
        deadline: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if now > deadline {
            return Err(DomainError::PeriodExpired {
                period_id: self.period_id,
                deadline: deadline
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| deadline.to_string()),
            });
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> DomainError {
        DomainError::InvalidPeriodConfig {
            period_id: self.period_id,
            reason: reason.to_string(),
        }
    }
}

/// All configured periods, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodCatalog {
    periods: BTreeMap<i64, PeriodConfig>,
}

impl PeriodCatalog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            periods: BTreeMap::new(),
        }
    }

    /// Builds a catalog, validating every period.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, or `InvalidPeriodConfig` when
    /// the same id appears twice.
    pub fn from_periods(periods: Vec<PeriodConfig>) -> Result<Self, DomainError> {
        let mut catalog = Self::new();
        for period in periods {
            catalog.insert(period)?;
        }
        Ok(catalog)
    }

    /// Adds a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is invalid or already present.
    pub fn insert(&mut self, period: PeriodConfig) -> Result<(), DomainError> {
        period.validate()?;
        if self.periods.contains_key(&period.period_id) {
            return Err(DomainError::InvalidPeriodConfig {
                period_id: period.period_id,
                reason: String::from("period id is configured more than once"),
            });
        }
        self.periods.insert(period.period_id, period);
        Ok(())
    }

    /// Looks up a period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PeriodNotFound` for unknown ids.
    pub fn get(&self, period_id: i64) -> Result<&PeriodConfig, DomainError> {
        self.periods
            .get(&period_id)
            .ok_or(DomainError::PeriodNotFound(period_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodConfig> {
        self.periods.values()
    }
}
