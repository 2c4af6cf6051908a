// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Question catalog and peer evaluation queries.

use diesel::prelude::*;
use evalcycle_domain::{
    EvaluationQuestion, PeerEvaluation, PeerEvaluationQuestionMapping, QuestionGroup,
    QuestionGroupMember,
};

use crate::data_models::{
    EvaluationQuestionRow, PeerEvaluationRow, PeerQuestionMappingRow, QuestionGroupMemberRow,
    QuestionGroupRow,
};
use crate::diesel_schema::{
    evaluation_questions, peer_evaluation_question_mappings, peer_evaluations,
    question_group_members, question_groups,
};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an active question by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_question(
    conn: &mut _,
    question_id: i64,
) -> Result<Option<EvaluationQuestion>, PersistenceError> {
    let result: Result<EvaluationQuestionRow, diesel::result::Error> =
        evaluation_questions::table
            .filter(evaluation_questions::id.eq(question_id))
            .filter(evaluation_questions::is_deleted.eq(0))
            .select(EvaluationQuestionRow::as_select())
            .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves an active question group by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_question_group(
    conn: &mut _,
    question_group_id: i64,
) -> Result<Option<QuestionGroup>, PersistenceError> {
    let result: Result<QuestionGroupRow, diesel::result::Error> = question_groups::table
        .filter(question_groups::id.eq(question_group_id))
        .filter(question_groups::is_deleted.eq(0))
        .select(QuestionGroupRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Finds the active default question group, if one is flagged.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_default_question_group(
    conn: &mut _,
) -> Result<Option<QuestionGroup>, PersistenceError> {
    let result: Result<QuestionGroupRow, diesel::result::Error> = question_groups::table
        .filter(question_groups::is_default.eq(1))
        .filter(question_groups::is_deleted.eq(0))
        .order(question_groups::id.asc())
        .select(QuestionGroupRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists the questions of a group in display order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_group_members(
    conn: &mut _,
    question_group_id: i64,
) -> Result<Vec<QuestionGroupMember>, PersistenceError> {
    let rows: Vec<QuestionGroupMemberRow> = question_group_members::table
        .filter(question_group_members::question_group_id.eq(question_group_id))
        .order((
            question_group_members::display_order.asc(),
            question_group_members::id.asc(),
        ))
        .select(QuestionGroupMemberRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(QuestionGroupMember::from).collect())
}
}

backend_fn! {
/// Retrieves an active peer evaluation by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_peer_evaluation(
    conn: &mut _,
    peer_evaluation_id: i64,
) -> Result<Option<PeerEvaluation>, PersistenceError> {
    let result: Result<PeerEvaluationRow, diesel::result::Error> = peer_evaluations::table
        .filter(peer_evaluations::id.eq(peer_evaluation_id))
        .filter(peer_evaluations::is_deleted.eq(0))
        .select(PeerEvaluationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Finds the active peer evaluation for an evaluator/evaluatee pair.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_peer_evaluation(
    conn: &mut _,
    period_id: i64,
    evaluator_id: &str,
    evaluatee_id: &str,
) -> Result<Option<PeerEvaluation>, PersistenceError> {
    let result: Result<PeerEvaluationRow, diesel::result::Error> = peer_evaluations::table
        .filter(peer_evaluations::period_id.eq(period_id))
        .filter(peer_evaluations::evaluator_id.eq(evaluator_id))
        .filter(peer_evaluations::evaluatee_id.eq(evaluatee_id))
        .filter(peer_evaluations::is_deleted.eq(0))
        .select(PeerEvaluationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists the active peer evaluations written about an employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_peer_evaluations_for_evaluatee(
    conn: &mut _,
    period_id: i64,
    evaluatee_id: &str,
) -> Result<Vec<PeerEvaluation>, PersistenceError> {
    let rows: Vec<PeerEvaluationRow> = peer_evaluations::table
        .filter(peer_evaluations::period_id.eq(period_id))
        .filter(peer_evaluations::evaluatee_id.eq(evaluatee_id))
        .filter(peer_evaluations::is_deleted.eq(0))
        .order(peer_evaluations::id.asc())
        .select(PeerEvaluationRow::as_select())
        .load(conn)?;

    rows.into_iter().map(PeerEvaluationRow::into_domain).collect()
}
}

backend_fn! {
/// Lists the active peer evaluations an employee has been asked to write.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_peer_evaluations_for_evaluator(
    conn: &mut _,
    period_id: i64,
    evaluator_id: &str,
) -> Result<Vec<PeerEvaluation>, PersistenceError> {
    let rows: Vec<PeerEvaluationRow> = peer_evaluations::table
        .filter(peer_evaluations::period_id.eq(period_id))
        .filter(peer_evaluations::evaluator_id.eq(evaluator_id))
        .filter(peer_evaluations::is_deleted.eq(0))
        .order(peer_evaluations::id.asc())
        .select(PeerEvaluationRow::as_select())
        .load(conn)?;

    rows.into_iter().map(PeerEvaluationRow::into_domain).collect()
}
}

backend_fn! {
/// Retrieves an active question mapping by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_question_mapping(
    conn: &mut _,
    mapping_id: i64,
) -> Result<Option<PeerEvaluationQuestionMapping>, PersistenceError> {
    let result: Result<PeerQuestionMappingRow, diesel::result::Error> =
        peer_evaluation_question_mappings::table
            .filter(peer_evaluation_question_mappings::id.eq(mapping_id))
            .filter(peer_evaluation_question_mappings::is_deleted.eq(0))
            .select(PeerQuestionMappingRow::as_select())
            .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists the active question mappings of a peer evaluation in display order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_question_mappings(
    conn: &mut _,
    peer_evaluation_id: i64,
) -> Result<Vec<PeerEvaluationQuestionMapping>, PersistenceError> {
    let rows: Vec<PeerQuestionMappingRow> = peer_evaluation_question_mappings::table
        .filter(peer_evaluation_question_mappings::peer_evaluation_id.eq(peer_evaluation_id))
        .filter(peer_evaluation_question_mappings::is_deleted.eq(0))
        .order((
            peer_evaluation_question_mappings::display_order.asc(),
            peer_evaluation_question_mappings::id.asc(),
        ))
        .select(PeerQuestionMappingRow::as_select())
        .load(conn)?;

    rows.into_iter().map(PeerQuestionMappingRow::into_domain).collect()
}
}

backend_fn! {
/// Counts question mapping rows of a peer evaluation, soft-deleted included.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_question_mapping_rows(
    conn: &mut _,
    peer_evaluation_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(peer_evaluation_question_mappings::table
        .filter(peer_evaluation_question_mappings::peer_evaluation_id.eq(peer_evaluation_id))
        .count()
        .get_result(conn)?)
}
}
