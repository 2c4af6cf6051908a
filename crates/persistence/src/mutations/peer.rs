// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Question catalog, peer evaluation, and question mapping writes.

use diesel::prelude::*;
use evalcycle_domain::{
    EvaluationQuestion, PeerEvaluation, PeerEvaluationQuestionMapping, QuestionGroup,
    QuestionGroupMember,
};
use time::OffsetDateTime;
use tracing::{debug, info};

use super::stale_write_or_missing;
use crate::backend::PersistenceBackend;
use crate::data_models::{StoredMeta, flag, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::{
    evaluation_questions, peer_evaluation_question_mappings, peer_evaluations,
    question_group_members, question_groups,
};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a question and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_question(
    conn: &mut _,
    question: &EvaluationQuestion,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&question.meta)?;

    diesel::insert_into(evaluation_questions::table)
        .values((
            evaluation_questions::question_text.eq(&question.text),
            evaluation_questions::min_score.eq(question.min_score),
            evaluation_questions::max_score.eq(question.max_score),
            evaluation_questions::created_at.eq(&meta.created_at),
            evaluation_questions::updated_at.eq(&meta.updated_at),
            evaluation_questions::deleted_at.eq(&meta.deleted_at),
            evaluation_questions::is_deleted.eq(meta.is_deleted),
            evaluation_questions::created_by.eq(meta.created_by),
            evaluation_questions::updated_by.eq(meta.updated_by),
            evaluation_questions::version.eq(meta.version),
        ))
        .execute(conn)?;

    let question_id: i64 = conn.get_last_insert_rowid()?;
    debug!(question_id, "Created evaluation question");
    Ok(question_id)
}
}

backend_fn! {
/// Inserts a question group and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_question_group(
    conn: &mut _,
    group: &QuestionGroup,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&group.meta)?;

    diesel::insert_into(question_groups::table)
        .values((
            question_groups::name.eq(&group.name),
            question_groups::is_default.eq(flag(group.is_default)),
            question_groups::created_at.eq(&meta.created_at),
            question_groups::updated_at.eq(&meta.updated_at),
            question_groups::deleted_at.eq(&meta.deleted_at),
            question_groups::is_deleted.eq(meta.is_deleted),
            question_groups::created_by.eq(meta.created_by),
            question_groups::updated_by.eq(meta.updated_by),
            question_groups::version.eq(meta.version),
        ))
        .execute(conn)?;

    let question_group_id: i64 = conn.get_last_insert_rowid()?;
    debug!(question_group_id, name = %group.name, "Created question group");
    Ok(question_group_id)
}
}

backend_fn! {
/// Adds a question to a group.
///
/// # Errors
///
/// Returns an error if the insert fails or the pair already exists.
pub fn insert_group_member(
    conn: &mut _,
    member: &QuestionGroupMember,
    created_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(question_group_members::table)
        .values((
            question_group_members::question_group_id.eq(member.question_group_id),
            question_group_members::question_id.eq(member.question_id),
            question_group_members::display_order.eq(member.display_order),
            question_group_members::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}
}

backend_fn! {
/// Inserts a peer evaluation and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_peer_evaluation(
    conn: &mut _,
    record: &PeerEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;

    diesel::insert_into(peer_evaluations::table)
        .values((
            peer_evaluations::period_id.eq(record.period_id),
            peer_evaluations::evaluator_id.eq(&record.evaluator_id),
            peer_evaluations::evaluatee_id.eq(&record.evaluatee_id),
            peer_evaluations::status.eq(record.status.as_str()),
            peer_evaluations::requested_by.eq(&record.requested_by),
            peer_evaluations::completed_at.eq(format_optional_timestamp(record.completed_at)?),
            peer_evaluations::created_at.eq(&meta.created_at),
            peer_evaluations::updated_at.eq(&meta.updated_at),
            peer_evaluations::deleted_at.eq(&meta.deleted_at),
            peer_evaluations::is_deleted.eq(meta.is_deleted),
            peer_evaluations::created_by.eq(meta.created_by),
            peer_evaluations::updated_by.eq(meta.updated_by),
            peer_evaluations::version.eq(meta.version),
        ))
        .execute(conn)?;

    let peer_evaluation_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        peer_evaluation_id,
        evaluator_id = %record.evaluator_id,
        evaluatee_id = %record.evaluatee_id,
        "Created peer evaluation"
    );
    Ok(peer_evaluation_id)
}
}

backend_fn! {
/// Saves a peer evaluation read at `record.meta.version` and returns the
/// new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_peer_evaluation(
    conn: &mut _,
    record: &PeerEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;

    let updated: usize = diesel::update(peer_evaluations::table)
        .filter(peer_evaluations::id.eq(record.id))
        .filter(peer_evaluations::version.eq(meta.version))
        .set((
            peer_evaluations::status.eq(record.status.as_str()),
            peer_evaluations::completed_at.eq(format_optional_timestamp(record.completed_at)?),
            peer_evaluations::updated_at.eq(&meta.updated_at),
            peer_evaluations::deleted_at.eq(&meta.deleted_at),
            peer_evaluations::is_deleted.eq(meta.is_deleted),
            peer_evaluations::updated_by.eq(meta.updated_by),
            peer_evaluations::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = peer_evaluations::table
            .filter(peer_evaluations::id.eq(record.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "peer evaluation",
            record.id,
            meta.version,
            existing > 0,
        ));
    }
    Ok(meta.version + 1)
}
}

backend_fn! {
/// Inserts a question mapping and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_question_mapping(
    conn: &mut _,
    mapping: &PeerEvaluationQuestionMapping,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&mapping.meta)?;

    diesel::insert_into(peer_evaluation_question_mappings::table)
        .values((
            peer_evaluation_question_mappings::peer_evaluation_id.eq(mapping.peer_evaluation_id),
            peer_evaluation_question_mappings::question_id.eq(mapping.question_id),
            peer_evaluation_question_mappings::question_group_id.eq(mapping.question_group_id),
            peer_evaluation_question_mappings::display_order.eq(mapping.display_order),
            peer_evaluation_question_mappings::answer.eq(&mapping.answer),
            peer_evaluation_question_mappings::score.eq(mapping.score),
            peer_evaluation_question_mappings::answered_at
                .eq(format_optional_timestamp(mapping.answered_at)?),
            peer_evaluation_question_mappings::answered_by.eq(&mapping.answered_by),
            peer_evaluation_question_mappings::created_at.eq(&meta.created_at),
            peer_evaluation_question_mappings::updated_at.eq(&meta.updated_at),
            peer_evaluation_question_mappings::deleted_at.eq(&meta.deleted_at),
            peer_evaluation_question_mappings::is_deleted.eq(meta.is_deleted),
            peer_evaluation_question_mappings::created_by.eq(meta.created_by),
            peer_evaluation_question_mappings::updated_by.eq(meta.updated_by),
            peer_evaluation_question_mappings::version.eq(meta.version),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}
}

backend_fn! {
/// Saves a question mapping read at `mapping.meta.version` and returns
/// the new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_question_mapping(
    conn: &mut _,
    mapping: &PeerEvaluationQuestionMapping,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&mapping.meta)?;

    let updated: usize = diesel::update(peer_evaluation_question_mappings::table)
        .filter(peer_evaluation_question_mappings::id.eq(mapping.id))
        .filter(peer_evaluation_question_mappings::version.eq(meta.version))
        .set((
            peer_evaluation_question_mappings::display_order.eq(mapping.display_order),
            peer_evaluation_question_mappings::answer.eq(&mapping.answer),
            peer_evaluation_question_mappings::score.eq(mapping.score),
            peer_evaluation_question_mappings::answered_at
                .eq(format_optional_timestamp(mapping.answered_at)?),
            peer_evaluation_question_mappings::answered_by.eq(&mapping.answered_by),
            peer_evaluation_question_mappings::updated_at.eq(&meta.updated_at),
            peer_evaluation_question_mappings::deleted_at.eq(&meta.deleted_at),
            peer_evaluation_question_mappings::is_deleted.eq(meta.is_deleted),
            peer_evaluation_question_mappings::updated_by.eq(meta.updated_by),
            peer_evaluation_question_mappings::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = peer_evaluation_question_mappings::table
            .filter(peer_evaluation_question_mappings::id.eq(mapping.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "peer question mapping",
            mapping.id,
            meta.version,
            existing > 0,
        ));
    }
    Ok(meta.version + 1)
}
}
