// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk evaluator assignment from CSV.
//!
//! Parsing never touches storage. Rows that parse are handed to
//! [`EvaluationService::assign_evaluators_batch`]; rows that do not are
//! reported with every problem found on them.

use std::collections::HashMap;

use csv::StringRecord;
use evalcycle_domain::{EvaluatorAssignment, EvaluatorType};

use crate::EvaluationService;
use crate::auth::{AuthenticatedActor, require_admin};
use crate::error::ApiError;
use crate::request_response::BatchItemResult;

const REQUIRED_HEADERS: &[&str] = &["period_id", "employee_id", "evaluator_id", "evaluator_type"];

/// One data row of an assignment CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentCsvRow {
    /// 1-based, excluding the header.
    pub row_number: usize,
    /// The parsed assignment, or every error found on the row.
    pub assignment: Result<EvaluatorAssignment, Vec<String>>,
}

/// Case-insensitive, whitespace-tolerant header matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn csv_error(message: String) -> ApiError {
    ApiError::InvalidInput {
        field: String::from("csv"),
        message,
    }
}

fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (normalize_header(header), idx))
        .collect();

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_map.contains_key(*required))
        .collect();
    if !missing.is_empty() {
        return Err(csv_error(format!(
            "Missing required headers: {}",
            missing.join(", ")
        )));
    }

    Ok(header_map)
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<EvaluatorAssignment, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();
    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let mut required = |name: &str| -> String {
        get_field(name).unwrap_or_else(|| {
            errors.push(format!("{name}: required field is missing or empty"));
            String::new()
        })
    };

    let period_raw = required("period_id");
    let employee_id = required("employee_id");
    let evaluator_id = required("evaluator_id");
    let evaluator_type_raw = required("evaluator_type");

    let period_id = if period_raw.is_empty() {
        None
    } else if let Ok(id) = period_raw.parse::<i64>() {
        Some(id)
    } else {
        errors.push(format!("period_id: invalid number '{period_raw}'"));
        None
    };

    let evaluator_type = if evaluator_type_raw.is_empty() {
        None
    } else {
        match evaluator_type_raw.to_lowercase().parse::<EvaluatorType>() {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(format!("evaluator_type: {e}"));
                None
            }
        }
    };

    let work_item_id = get_field("work_item_id").and_then(|val| {
        val.parse::<i64>().map_or_else(
            |_| {
                errors.push(format!("work_item_id: invalid number '{val}'"));
                None
            },
            Some,
        )
    });

    match (period_id, evaluator_type) {
        (Some(period_id), Some(evaluator_type)) if errors.is_empty() => Ok(EvaluatorAssignment {
            period_id,
            employee_id,
            evaluator_id,
            evaluator_type,
            work_item_id,
        }),
        _ => Err(errors),
    }
}

/// Parses assignment rows from CSV text.
///
/// Required columns are `period_id`, `employee_id`, `evaluator_id` and
/// `evaluator_type`; `work_item_id` is optional. Header names are matched
/// case-insensitively with spaces treated as underscores.
///
/// # Errors
///
/// Returns `InvalidInput` if the header row cannot be read or a required
/// column is missing. Problems in individual rows are reported per row.
pub fn parse_assignment_csv(csv_content: &str) -> Result<Vec<AssignmentCsvRow>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| csv_error(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = validate_headers(&headers)?;

    Ok(reader
        .records()
        .enumerate()
        .map(|(idx, result)| AssignmentCsvRow {
            row_number: idx + 1,
            assignment: match result {
                Ok(record) => parse_row(&record, &header_map),
                Err(e) => Err(vec![format!("CSV parse error: {e}")]),
            },
        })
        .collect())
}

impl EvaluationService {
    /// Imports evaluator assignments from CSV.
    ///
    /// Every data row yields one result whose `index` is the row's
    /// zero-based position. Unparseable rows fail with `InvalidInput`
    /// without affecting the others.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin or the CSV header is
    /// invalid.
    pub fn import_assignments_csv(
        &mut self,
        actor: &AuthenticatedActor,
        csv_content: &str,
    ) -> Result<Vec<BatchItemResult>, ApiError> {
        require_admin(actor, "import_assignments_csv")?;
        let rows = parse_assignment_csv(csv_content)?;

        let mut positions: Vec<usize> = Vec::new();
        let mut assignments: Vec<EvaluatorAssignment> = Vec::new();
        let mut results: Vec<BatchItemResult> = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match row.assignment {
                Ok(assignment) => {
                    positions.push(index);
                    assignments.push(assignment);
                }
                Err(errors) => results.push(BatchItemResult {
                    index,
                    outcome: Err(ApiError::InvalidInput {
                        field: format!("row {}", row.row_number),
                        message: errors.join("; "),
                    }),
                }),
            }
        }

        if !assignments.is_empty() {
            let batch = self.assign_evaluators_batch(actor, &assignments)?;
            results.extend(batch.into_iter().map(|item| BatchItemResult {
                index: positions.get(item.index).copied().unwrap_or(item.index),
                outcome: item.outcome,
            }));
        }
        results.sort_by_key(|item| item.index);

        tracing::info!(
            actor_id = %actor.id,
            rows = results.len(),
            imported = results.iter().filter(|r| r.is_success()).count(),
            "Imported evaluator assignments from CSV"
        );
        Ok(results)
    }
}
