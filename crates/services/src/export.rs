//! Study plan export: CSV table and JSON document.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use study_core::model::{StudyPlan, StudySession, ViewMode};

use crate::error::ExportError;

const CSV_HEADER: [&str; 6] = [
    "date",
    "session_no",
    "title",
    "objective",
    "tasks",
    "estimated_minutes",
];
const TASK_SEPARATOR: &str = " | ";

/// File name for a plan exported at `at`, e.g. `study_plan_20250101_0930.csv`.
#[must_use]
pub fn default_csv_name(at: DateTime<Utc>) -> String {
    format!("study_plan_{}.csv", at.format("%Y%m%d_%H%M"))
}

/// Write `plan` as a CSV table, one row per session.
///
/// Sessions without a date get an empty date cell.
///
/// # Errors
///
/// Returns `ExportError::Io` if writing fails.
pub fn write_plan_csv(plan: &StudyPlan, mut writer: impl Write) -> Result<(), ExportError> {
    write_row(&mut writer, CSV_HEADER)?;
    for session in plan.sessions() {
        let date = session
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        write_row(
            &mut writer,
            [
                date.as_str(),
                session.session_no().to_string().as_str(),
                session.title(),
                session.objective(),
                session.tasks().join(TASK_SEPARATOR).as_str(),
                session.estimated_minutes().to_string().as_str(),
            ],
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV table as a string.
///
/// # Errors
///
/// Returns `ExportError::Io` if writing to the buffer fails.
pub fn plan_csv(plan: &StudyPlan) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_plan_csv(plan, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_row<'a>(
    writer: &mut impl Write,
    cells: impl IntoIterator<Item = &'a str>,
) -> std::io::Result<()> {
    let line = cells.into_iter().map(quote).collect::<Vec<_>>().join(",");
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\r\n")
}

/// Quote a cell when it holds a comma, quote or line break.
fn quote(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[derive(Debug, Serialize)]
struct PlanDocument<'a> {
    meta: PlanMeta<'a>,
    notes: Option<&'a str>,
    schedule: &'a [StudySession],
}

#[derive(Debug, Serialize)]
struct PlanMeta<'a> {
    source_filename: &'a str,
    generated_at: DateTime<Utc>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    plan_view: ViewMode,
    minutes_per_session: u32,
    total_minutes: u32,
}

/// Pretty-printed `{meta, notes, schedule}` JSON document for `plan`.
///
/// # Errors
///
/// Returns `ExportError::Json` if serialization fails.
pub fn plan_to_json(plan: &StudyPlan, source_name: &str) -> Result<String, ExportError> {
    let request = plan.request();
    let document = PlanDocument {
        meta: PlanMeta {
            source_filename: source_name,
            generated_at: plan.generated_at(),
            start_date: request.start(),
            end_date: request.end(),
            plan_view: request.view(),
            minutes_per_session: request.minutes_per_session(),
            total_minutes: plan.total_minutes(),
        },
        notes: plan.notes(),
        schedule: plan.sessions(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
