// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Generates the string conversions shared by every persisted enum.
///
/// The string form is what gets stored in the database and returned to
/// callers, so it must stay stable.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "&'static str", try_from = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant
            ),+
        }

        impl $name {
            /// Returns the persisted string representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(DomainError::InvalidValue {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// The evaluator slot an evaluation line represents.
    pub enum EvaluatorType: "evaluator type" {
        /// First-line evaluator.
        Primary => "primary",
        /// Second-line evaluator.
        Secondary => "secondary",
        /// Optional extra evaluator.
        Additional => "additional",
    }
}

string_enum! {
    /// Which evaluator slot produced a downward evaluation.
    pub enum DownwardEvaluationType: "downward evaluation type" {
        /// Written by the primary evaluator.
        Primary => "primary",
        /// Written by the secondary evaluator.
        Secondary => "secondary",
    }
}

impl DownwardEvaluationType {
    /// The evaluation line slot whose evaluators write this type.
    #[must_use]
    pub const fn evaluator_type(&self) -> EvaluatorType {
        match self {
            Self::Primary => EvaluatorType::Primary,
            Self::Secondary => EvaluatorType::Secondary,
        }
    }
}

string_enum! {
    /// Job grade band recorded on a final evaluation.
    pub enum JobGrade: "job grade" {
        /// Band T1.
        T1 => "T1",
        /// Band T2.
        T2 => "T2",
        /// Band T3.
        T3 => "T3",
    }
}

string_enum! {
    /// Position within the job grade band.
    pub enum JobDetailedGrade: "job detailed grade" {
        /// Upper.
        Upper => "u",
        /// Normal.
        Normal => "n",
        /// Lower.
        Lower => "a",
    }
}

/// Audit columns carried by every persisted record.
///
/// `version` is the optimistic concurrency counter. The persistence layer
/// increments it on every successful save; callers never bump it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
    pub is_deleted: bool,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl RecordMeta {
    /// Creates metadata for a record that has not been saved yet.
    #[must_use]
    pub fn new(actor_id: &str, now: OffsetDateTime) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
            is_deleted: false,
            created_by: actor_id.to_string(),
            updated_by: actor_id.to_string(),
            version: 1,
        }
    }

    /// Stamps the record as modified by `actor_id`.
    pub fn touch(&mut self, actor_id: &str, now: OffsetDateTime) {
        self.updated_at = now;
        self.updated_by = actor_id.to_string();
    }

    /// Marks the record as a tombstone.
    pub fn mark_deleted(&mut self, actor_id: &str, now: OffsetDateTime) {
        self.touch(actor_id, now);
        self.is_deleted = true;
        self.deleted_at = Some(now);
    }
}

/// Validates that `score` lies in the inclusive range `[min, max]`.
///
/// # Errors
///
/// Returns `DomainError::ScoreOutOfRange` when it does not, including for
/// non-finite values.
pub fn validate_score(score: f64, min: f64, max: f64) -> Result<(), DomainError> {
    if score.is_finite() && score >= min && score <= max {
        Ok(())
    } else {
        Err(DomainError::ScoreOutOfRange { score, min, max })
    }
}
