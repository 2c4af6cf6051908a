// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes read back from the evaluation tables and their conversion
//! into domain records.
//!
//! Timestamps are stored as RFC 3339 text and booleans as `0`/`1`
//! integers. Enum columns hold the domain `as_str()` form.

use diesel::prelude::*;
use evalcycle_audit::{ActivityAction, ActivityType, EvaluationActivity};
use evalcycle_domain::{
    ApprovalStep, DownwardEvaluation, DownwardEvaluationType, EvaluationLine,
    EvaluationLineMapping, EvaluationQuestion, EvaluatorType, FinalEvaluation, JobDetailedGrade,
    JobGrade, PeerEvaluation, PeerEvaluationQuestionMapping, PeerEvaluationStatus,
    QuestionGroup, QuestionGroupMember, RecipientType, RecordMeta, RevisionRequest,
    RevisionRequestRecipient, SelfEvaluation, StepApproval, StepStatus,
};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{
    downward_evaluations, evaluation_activity_logs, evaluation_line_mappings, evaluation_lines,
    evaluation_questions, final_evaluations, peer_evaluation_question_mappings, peer_evaluations,
    question_group_members, question_groups, revision_request_recipients, revision_requests,
    self_evaluations, step_approvals,
};
use crate::error::PersistenceError;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.format(&Rfc3339)?)
}

/// Formats an optional timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

/// Stores a boolean as the `0`/`1` integer the schema expects.
#[must_use]
pub const fn flag(value: bool) -> i32 {
    if value { 1 } else { 0 }
}

/// The audit columns of a record, formatted for writing.
#[derive(Debug)]
pub struct StoredMeta<'a> {
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: &'a str,
    pub updated_by: &'a str,
    pub version: i64,
}

impl<'a> StoredMeta<'a> {
    /// Formats `meta` for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be represented in RFC 3339.
    pub fn new(meta: &'a RecordMeta) -> Result<Self, PersistenceError> {
        Ok(Self {
            created_at: format_timestamp(meta.created_at)?,
            updated_at: format_timestamp(meta.updated_at)?,
            deleted_at: format_optional_timestamp(meta.deleted_at)?,
            is_deleted: flag(meta.is_deleted),
            created_by: &meta.created_by,
            updated_by: &meta.updated_by,
            version: meta.version,
        })
    }
}

fn parse_timestamp(
    entity: &'static str,
    id: i64,
    value: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| PersistenceError::CorruptRecord {
        entity,
        id,
        reason: format!("invalid timestamp '{value}': {e}"),
    })
}

fn parse_optional_timestamp(
    entity: &'static str,
    id: i64,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(|v| parse_timestamp(entity, id, v)).transpose()
}

fn parse_enum<T>(entity: &'static str, id: i64, value: &str) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PersistenceError::CorruptRecord {
            entity,
            id,
            reason: e.to_string(),
        })
}

/// Builds `RecordMeta` from the audit columns every entity row carries.
macro_rules! record_meta {
    ($entity:expr, $row:ident) => {
        RecordMeta {
            created_at: parse_timestamp($entity, $row.id, &$row.created_at)?,
            updated_at: parse_timestamp($entity, $row.id, &$row.updated_at)?,
            deleted_at: parse_optional_timestamp($entity, $row.id, $row.deleted_at.as_deref())?,
            is_deleted: $row.is_deleted != 0,
            created_by: $row.created_by,
            updated_by: $row.updated_by,
            version: $row.version,
        }
    };
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = evaluation_lines)]
pub struct EvaluationLineRow {
    pub id: i64,
    pub evaluator_type: String,
    pub display_order: i32,
    pub is_required: i32,
    pub is_auto_assigned: i32,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl EvaluationLineRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<EvaluationLine, PersistenceError> {
        const ENTITY: &str = "evaluation line";
        Ok(EvaluationLine {
            id: self.id,
            evaluator_type: parse_enum::<EvaluatorType>(ENTITY, self.id, &self.evaluator_type)?,
            display_order: self.display_order,
            is_required: self.is_required != 0,
            is_auto_assigned: self.is_auto_assigned != 0,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = evaluation_line_mappings)]
pub struct EvaluationLineMappingRow {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub evaluator_id: String,
    pub work_item_id: Option<i64>,
    pub evaluation_line_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl EvaluationLineMappingRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<EvaluationLineMapping, PersistenceError> {
        const ENTITY: &str = "evaluation line mapping";
        Ok(EvaluationLineMapping {
            id: self.id,
            period_id: self.period_id,
            employee_id: self.employee_id,
            evaluator_id: self.evaluator_id,
            work_item_id: self.work_item_id,
            evaluation_line_id: self.evaluation_line_id,
            meta: record_meta!(ENTITY, self),
        })
    }
}

/// Converts a mapping row joined with its line's evaluator type.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` for unparseable columns.
pub fn typed_mapping(
    (row, evaluator_type): (EvaluationLineMappingRow, String),
) -> Result<(EvaluationLineMapping, EvaluatorType), PersistenceError> {
    let id = row.id;
    let evaluator_type = parse_enum::<EvaluatorType>("evaluation line", id, &evaluator_type)?;
    Ok((row.into_domain()?, evaluator_type))
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = self_evaluations)]
pub struct SelfEvaluationRow {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub work_item_id: i64,
    pub project_id: i64,
    pub content: Option<String>,
    pub score: Option<f64>,
    pub submitted_to_evaluator: i32,
    pub submitted_to_evaluator_at: Option<String>,
    pub submitted_to_manager: i32,
    pub submitted_to_manager_at: Option<String>,
    pub is_completed: i32,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl SelfEvaluationRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<SelfEvaluation, PersistenceError> {
        const ENTITY: &str = "self evaluation";
        Ok(SelfEvaluation {
            id: self.id,
            period_id: self.period_id,
            employee_id: self.employee_id,
            work_item_id: self.work_item_id,
            project_id: self.project_id,
            content: self.content,
            score: self.score,
            submitted_to_evaluator: self.submitted_to_evaluator != 0,
            submitted_to_evaluator_at: parse_optional_timestamp(
                ENTITY,
                self.id,
                self.submitted_to_evaluator_at.as_deref(),
            )?,
            submitted_to_manager: self.submitted_to_manager != 0,
            submitted_to_manager_at: parse_optional_timestamp(
                ENTITY,
                self.id,
                self.submitted_to_manager_at.as_deref(),
            )?,
            is_completed: self.is_completed != 0,
            completed_at: parse_optional_timestamp(ENTITY, self.id, self.completed_at.as_deref())?,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = downward_evaluations)]
pub struct DownwardEvaluationRow {
    pub id: i64,
    pub period_id: i64,
    pub evaluator_id: String,
    pub employee_id: String,
    pub evaluation_type: String,
    pub work_item_id: Option<i64>,
    pub self_evaluation_id: Option<i64>,
    pub content: Option<String>,
    pub score: Option<f64>,
    pub is_completed: i32,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl DownwardEvaluationRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<DownwardEvaluation, PersistenceError> {
        const ENTITY: &str = "downward evaluation";
        Ok(DownwardEvaluation {
            id: self.id,
            period_id: self.period_id,
            evaluator_id: self.evaluator_id,
            employee_id: self.employee_id,
            evaluation_type: parse_enum::<DownwardEvaluationType>(
                ENTITY,
                self.id,
                &self.evaluation_type,
            )?,
            work_item_id: self.work_item_id,
            self_evaluation_id: self.self_evaluation_id,
            content: self.content,
            score: self.score,
            is_completed: self.is_completed != 0,
            completed_at: parse_optional_timestamp(ENTITY, self.id, self.completed_at.as_deref())?,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = evaluation_questions)]
pub struct EvaluationQuestionRow {
    pub id: i64,
    pub question_text: String,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl EvaluationQuestionRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<EvaluationQuestion, PersistenceError> {
        Ok(EvaluationQuestion {
            id: self.id,
            text: self.question_text,
            min_score: self.min_score,
            max_score: self.max_score,
            meta: record_meta!("evaluation question", self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = question_groups)]
pub struct QuestionGroupRow {
    pub id: i64,
    pub name: String,
    pub is_default: i32,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl QuestionGroupRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<QuestionGroup, PersistenceError> {
        Ok(QuestionGroup {
            id: self.id,
            name: self.name,
            is_default: self.is_default != 0,
            meta: record_meta!("question group", self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = question_group_members)]
pub struct QuestionGroupMemberRow {
    pub question_group_id: i64,
    pub question_id: i64,
    pub display_order: i32,
}

impl From<QuestionGroupMemberRow> for QuestionGroupMember {
    fn from(row: QuestionGroupMemberRow) -> Self {
        Self {
            question_group_id: row.question_group_id,
            question_id: row.question_id,
            display_order: row.display_order,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = peer_evaluations)]
pub struct PeerEvaluationRow {
    pub id: i64,
    pub period_id: i64,
    pub evaluator_id: String,
    pub evaluatee_id: String,
    pub status: String,
    pub requested_by: String,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl PeerEvaluationRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<PeerEvaluation, PersistenceError> {
        const ENTITY: &str = "peer evaluation";
        Ok(PeerEvaluation {
            id: self.id,
            period_id: self.period_id,
            evaluator_id: self.evaluator_id,
            evaluatee_id: self.evaluatee_id,
            status: parse_enum::<PeerEvaluationStatus>(ENTITY, self.id, &self.status)?,
            requested_by: self.requested_by,
            completed_at: parse_optional_timestamp(ENTITY, self.id, self.completed_at.as_deref())?,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = peer_evaluation_question_mappings)]
pub struct PeerQuestionMappingRow {
    pub id: i64,
    pub peer_evaluation_id: i64,
    pub question_id: i64,
    pub question_group_id: Option<i64>,
    pub display_order: i32,
    pub answer: Option<String>,
    pub score: Option<f64>,
    pub answered_at: Option<String>,
    pub answered_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl PeerQuestionMappingRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<PeerEvaluationQuestionMapping, PersistenceError> {
        const ENTITY: &str = "peer evaluation question mapping";
        Ok(PeerEvaluationQuestionMapping {
            id: self.id,
            peer_evaluation_id: self.peer_evaluation_id,
            question_id: self.question_id,
            question_group_id: self.question_group_id,
            display_order: self.display_order,
            answer: self.answer,
            score: self.score,
            answered_at: parse_optional_timestamp(ENTITY, self.id, self.answered_at.as_deref())?,
            answered_by: self.answered_by,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = step_approvals)]
pub struct StepApprovalRow {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub step: String,
    pub status: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl StepApprovalRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<StepApproval, PersistenceError> {
        const ENTITY: &str = "step approval";
        Ok(StepApproval {
            id: self.id,
            period_id: self.period_id,
            employee_id: self.employee_id,
            step: parse_enum::<ApprovalStep>(ENTITY, self.id, &self.step)?,
            status: parse_enum::<StepStatus>(ENTITY, self.id, &self.status)?,
            approved_by: self.approved_by,
            approved_at: parse_optional_timestamp(ENTITY, self.id, self.approved_at.as_deref())?,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = revision_requests)]
pub struct RevisionRequestRow {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub step: String,
    pub comment: String,
    pub requested_by: String,
    pub requested_at: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl RevisionRequestRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<RevisionRequest, PersistenceError> {
        const ENTITY: &str = "revision request";
        Ok(RevisionRequest {
            id: self.id,
            period_id: self.period_id,
            employee_id: self.employee_id,
            step: parse_enum::<ApprovalStep>(ENTITY, self.id, &self.step)?,
            comment: self.comment,
            requested_by: self.requested_by,
            requested_at: parse_timestamp(ENTITY, self.id, &self.requested_at)?,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = revision_request_recipients)]
pub struct RevisionRecipientRow {
    pub id: i64,
    pub revision_request_id: i64,
    pub recipient_id: String,
    pub recipient_type: String,
    pub is_read: i32,
    pub read_at: Option<String>,
    pub is_completed: i32,
    pub completed_at: Option<String>,
    pub response_comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl RevisionRecipientRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<RevisionRequestRecipient, PersistenceError> {
        const ENTITY: &str = "revision request recipient";
        Ok(RevisionRequestRecipient {
            id: self.id,
            revision_request_id: self.revision_request_id,
            recipient_id: self.recipient_id,
            recipient_type: parse_enum::<RecipientType>(ENTITY, self.id, &self.recipient_type)?,
            is_read: self.is_read != 0,
            read_at: parse_optional_timestamp(ENTITY, self.id, self.read_at.as_deref())?,
            is_completed: self.is_completed != 0,
            completed_at: parse_optional_timestamp(ENTITY, self.id, self.completed_at.as_deref())?,
            response_comment: self.response_comment,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = final_evaluations)]
pub struct FinalEvaluationRow {
    pub id: i64,
    pub employee_id: String,
    pub period_id: i64,
    pub evaluation_grade: String,
    pub job_grade: String,
    pub job_detailed_grade: String,
    pub final_comments: Option<String>,
    pub is_confirmed: i32,
    pub confirmed_at: Option<String>,
    pub confirmed_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub is_deleted: i32,
    pub created_by: String,
    pub updated_by: String,
    pub version: i64,
}

impl FinalEvaluationRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<FinalEvaluation, PersistenceError> {
        const ENTITY: &str = "final evaluation";
        Ok(FinalEvaluation {
            id: self.id,
            employee_id: self.employee_id,
            period_id: self.period_id,
            evaluation_grade: self.evaluation_grade,
            job_grade: parse_enum::<JobGrade>(ENTITY, self.id, &self.job_grade)?,
            job_detailed_grade: parse_enum::<JobDetailedGrade>(
                ENTITY,
                self.id,
                &self.job_detailed_grade,
            )?,
            final_comments: self.final_comments,
            is_confirmed: self.is_confirmed != 0,
            confirmed_at: parse_optional_timestamp(ENTITY, self.id, self.confirmed_at.as_deref())?,
            confirmed_by: self.confirmed_by,
            meta: record_meta!(ENTITY, self),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = evaluation_activity_logs)]
pub struct ActivityLogRow {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub activity_type: String,
    pub activity_action: String,
    pub title: String,
    pub description: Option<String>,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<i64>,
    pub performed_by: String,
    pub performed_at: String,
}

impl ActivityLogRow {
    /// Converts the row into an activity entry.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for unparseable columns.
    pub fn into_domain(self) -> Result<EvaluationActivity, PersistenceError> {
        const ENTITY: &str = "activity log";
        Ok(EvaluationActivity {
            period_id: self.period_id,
            employee_id: self.employee_id,
            activity_type: parse_enum::<ActivityType>(ENTITY, self.id, &self.activity_type)?,
            activity_action: parse_enum::<ActivityAction>(
                ENTITY,
                self.id,
                &self.activity_action,
            )?,
            title: self.title,
            description: self.description,
            related_entity_type: self.related_entity_type,
            related_entity_id: self.related_entity_id,
            performed_by: self.performed_by,
            performed_at: parse_timestamp(ENTITY, self.id, &self.performed_at)?,
        })
    }
}
