use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::recovery::{
    ParseOutcome, Record, RecoveryError, Schema, ValidationNotice, extract_object, integer,
    parse_lenient, scalar_text, text_field, validate_batch,
};
use crate::schedule::{assign_dates, session_dates};

/// Upper bound on tasks kept per session.
pub const MAX_TASKS_PER_SESSION: usize = 5;

/// Bounds on the study time of one session, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 5;
pub const MAX_SESSION_MINUTES: u32 = 24 * 60;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("sessions per week must be between 1 and 7, got {0}")]
    InvalidSessionsPerWeek(u8),

    #[error("minutes per session must be between 5 and 1440, got {0}")]
    InvalidMinutesPerSession(u32),

    #[error("session number must be >= 1")]
    InvalidSessionNo,

    #[error("a session may list at most 5 tasks, got {0}")]
    TooManyTasks(usize),

    #[error("estimated minutes must be > 0")]
    InvalidEstimatedMinutes,
}

//
// ─── REQUEST ───────────────────────────────────────────────────────────────────
//

/// Scheduling granularity of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ViewMode {
    Daily,
    Weekly { sessions_per_week: u8 },
}

/// How much detail generated explanations should carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    Brief,
    #[default]
    Standard,
    Detailed,
}

impl Depth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Brief => "brief",
            Depth::Standard => "standard",
            Depth::Detailed => "detailed",
        }
    }
}

/// Parameters of a study-plan generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRequest {
    start: NaiveDate,
    end: NaiveDate,
    view: ViewMode,
    minutes_per_session: u32,
    depth: Depth,
}

impl PlanRequest {
    /// Validate and build a plan request.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` if the range is inverted, the weekly frequency is
    /// outside `1..=7`, or the session length is out of bounds.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        view: ViewMode,
        minutes_per_session: u32,
    ) -> Result<Self, PlanError> {
        if start > end {
            return Err(PlanError::InvertedRange { start, end });
        }
        if let ViewMode::Weekly { sessions_per_week } = view {
            if !(1..=7).contains(&sessions_per_week) {
                return Err(PlanError::InvalidSessionsPerWeek(sessions_per_week));
            }
        }
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&minutes_per_session) {
            return Err(PlanError::InvalidMinutesPerSession(minutes_per_session));
        }
        Ok(Self {
            start,
            end,
            view,
            minutes_per_session,
            depth: Depth::default(),
        })
    }

    #[must_use]
    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    #[must_use]
    pub fn minutes_per_session(&self) -> u32 {
        self.minutes_per_session
    }

    #[must_use]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Calendar dates sessions will be mapped onto.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        session_dates(self.start, self.end, self.view)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One scheduled unit of study work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudySession {
    session_no: u32,
    title: String,
    objective: String,
    tasks: Vec<String>,
    estimated_minutes: u32,
    date: Option<NaiveDate>,
}

impl StudySession {
    /// Build an undated session.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` for a zero session number, more than
    /// `MAX_TASKS_PER_SESSION` tasks, or a zero duration.
    pub fn new(
        session_no: u32,
        title: impl Into<String>,
        objective: impl Into<String>,
        tasks: Vec<String>,
        estimated_minutes: u32,
    ) -> Result<Self, PlanError> {
        if session_no == 0 {
            return Err(PlanError::InvalidSessionNo);
        }
        if tasks.len() > MAX_TASKS_PER_SESSION {
            return Err(PlanError::TooManyTasks(tasks.len()));
        }
        if estimated_minutes == 0 {
            return Err(PlanError::InvalidEstimatedMinutes);
        }
        Ok(Self {
            session_no,
            title: title.into(),
            objective: objective.into(),
            tasks,
            estimated_minutes,
            date: None,
        })
    }

    #[must_use]
    pub fn session_no(&self) -> u32 {
        self.session_no
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn objective(&self) -> &str {
        &self.objective
    }

    #[must_use]
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub(crate) fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    /// Coerce one model-produced record, filling gaps from `default_minutes`.
    fn from_record(
        index: usize,
        record: &Record,
        default_minutes: u32,
    ) -> Result<Self, RecoveryError> {
        let position = u32::try_from(index + 1).unwrap_or(u32::MAX);
        let session_no = record
            .get("session_no")
            .and_then(integer)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(position);
        let title = text_field(index, record, "title")?
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("Session {position}"));
        let objective = text_field(index, record, "objective")?.unwrap_or_default();
        let mut tasks = match record.get("tasks") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(scalar_text)
                .filter(|t| !t.is_empty())
                .collect(),
            Some(Value::String(text)) => text
                .lines()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect(),
            Some(_) => return Err(RecoveryError::InvalidField { index, key: "tasks" }),
        };
        tasks.truncate(MAX_TASKS_PER_SESSION);
        let estimated_minutes = record
            .get("estimated_minutes")
            .and_then(integer)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(default_minutes);

        Ok(Self {
            session_no,
            title,
            objective,
            tasks,
            estimated_minutes,
            date: None,
        })
    }
}

//
// ─── PLAN ──────────────────────────────────────────────────────────────────────
//

/// A generated plan with sessions mapped onto dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyPlan {
    request: PlanRequest,
    sessions: Vec<StudySession>,
    notes: Option<String>,
    generated_at: DateTime<Utc>,
}

impl StudyPlan {
    #[must_use]
    pub fn new(
        request: PlanRequest,
        sessions: Vec<StudySession>,
        notes: Option<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request,
            sessions,
            notes,
            generated_at,
        }
    }

    #[must_use]
    pub fn request(&self) -> &PlanRequest {
        &self.request
    }

    #[must_use]
    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.sessions
            .iter()
            .map(StudySession::estimated_minutes)
            .fold(0, u32::saturating_add)
    }
}

/// Sessions recovered from a planner completion, already dated.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredSessions {
    pub sessions: Vec<StudySession>,
    pub notes: Option<String>,
    pub notices: Vec<ValidationNotice>,
}

/// Recover dated sessions from a planner completion.
///
/// The completion is expected to hold `{"sessions": [...], "notes": "..."}`;
/// a bare list of sessions is accepted too. One session per date in `dates`
/// is requested. Excess sessions are kept without a date.
pub fn recover_sessions(
    completion: &str,
    request: &PlanRequest,
    dates: &[NaiveDate],
) -> ParseOutcome<RecoveredSessions> {
    const REQUIRED: &[&str] = &[];
    let schema = Schema::new(REQUIRED).keep_excess();
    let default_minutes = request.minutes_per_session();

    extract_object(completion)
        .and_then(|candidate| parse_lenient(&candidate))
        .and_then(|value| {
            let (list, notes) = split_envelope(value);
            validate_batch(list, dates.len(), &schema, |index, record| {
                StudySession::from_record(index, record, default_minutes)
            })
            .map(|validated| (validated, notes))
        })
        .map(|(validated, notes)| {
            let mut sessions = validated.items;
            renumber_if_unordered(&mut sessions);
            assign_dates(&mut sessions, dates);
            RecoveredSessions {
                sessions,
                notes,
                notices: validated.notices,
            }
        })
        .with_raw(completion)
}

fn split_envelope(value: Value) -> (Value, Option<String>) {
    match value {
        Value::Object(mut envelope) => {
            let notes = envelope
                .get("notes")
                .and_then(scalar_text)
                .filter(|n| !n.is_empty());
            match envelope.remove("sessions") {
                Some(list) => (list, notes),
                None => (Value::Object(envelope), None),
            }
        }
        other => (other, None),
    }
}

fn renumber_if_unordered(sessions: &mut [StudySession]) {
    let ordered = sessions
        .windows(2)
        .all(|pair| pair[0].session_no < pair[1].session_no);
    if ordered {
        return;
    }
    tracing::debug!("session numbers out of order, renumbering by position");
    for (index, session) in sessions.iter_mut().enumerate() {
        session.session_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_request() -> PlanRequest {
        PlanRequest::new(day(2025, 1, 1), day(2025, 1, 3), ViewMode::Daily, 45).unwrap()
    }

    #[test]
    fn request_rejects_inverted_range() {
        let err = PlanRequest::new(day(2025, 2, 1), day(2025, 1, 1), ViewMode::Daily, 30)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvertedRange { .. }));
    }

    #[test]
    fn request_rejects_weekly_frequency_out_of_range() {
        for n in [0, 8] {
            let err = PlanRequest::new(
                day(2025, 1, 1),
                day(2025, 1, 31),
                ViewMode::Weekly {
                    sessions_per_week: n,
                },
                30,
            )
            .unwrap_err();
            assert_eq!(err, PlanError::InvalidSessionsPerWeek(n));
        }
    }

    #[test]
    fn request_rejects_session_length_out_of_bounds() {
        let err = PlanRequest::new(day(2025, 1, 1), day(2025, 1, 2), ViewMode::Daily, 2)
            .unwrap_err();
        assert_eq!(err, PlanError::InvalidMinutesPerSession(2));
    }

    #[test]
    fn session_rejects_too_many_tasks() {
        let tasks = (0..6).map(|i| format!("t{i}")).collect();
        let err = StudySession::new(1, "t", "o", tasks, 30).unwrap_err();
        assert_eq!(err, PlanError::TooManyTasks(6));
    }

    #[test]
    fn recovers_envelope_and_maps_dates() {
        let completion = r#"Here is the plan:
{"sessions": [
  {"session_no": 1, "title": "Basics", "objective": "Read ch. 1", "tasks": ["read", "summarize"], "estimated_minutes": 40},
  {"session_no": 2, "title": "Practice", "objective": "Exercises", "tasks": "do 1-5\n\ncheck answers", "estimated_minutes": "50"},
  {"title": "", "objective": "Review"}
], "notes": "Take breaks."}"#;
        let request = daily_request();
        let recovered = recover_sessions(completion, &request, &request.dates())
            .into_result()
            .unwrap();

        assert_eq!(recovered.notes.as_deref(), Some("Take breaks."));
        assert!(recovered.notices.is_empty());
        let sessions = &recovered.sessions;
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[1].tasks(), ["do 1-5", "check answers"]);
        assert_eq!(sessions[1].estimated_minutes(), 50);
        assert_eq!(sessions[2].session_no(), 3);
        assert_eq!(sessions[2].title(), "Session 3");
        assert_eq!(sessions[2].estimated_minutes(), 45);
        assert_eq!(sessions[2].date(), Some(day(2025, 1, 3)));
    }

    #[test]
    fn excess_sessions_are_kept_undated() {
        let completion = r#"[{"title": "a"}, {"title": "b"}, {"title": "c"}, {"title": "d"}]"#;
        let request = daily_request();
        let recovered = recover_sessions(completion, &request, &request.dates())
            .into_result()
            .unwrap();
        assert_eq!(recovered.sessions.len(), 4);
        assert_eq!(recovered.sessions[3].date(), None);
        assert_eq!(
            recovered.notices,
            vec![ValidationNotice::TooMany {
                produced: 4,
                requested: 3
            }]
        );
    }

    #[test]
    fn bare_list_inside_prose_is_recovered() {
        let completion = "Sure, here you go:\n[{\"title\": \"a\"}, {\"title\": \"b\"}]\nHave fun!";
        let request = daily_request();
        let recovered = recover_sessions(completion, &request, &request.dates())
            .into_result()
            .unwrap();
        assert_eq!(recovered.sessions.len(), 2);
        assert_eq!(recovered.sessions[1].title(), "b");
        assert_eq!(recovered.sessions[0].date(), Some(request.start()));
        assert!(recovered.notes.is_none());
    }

    #[test]
    fn tasks_are_capped() {
        let completion = r#"{"sessions": [{"tasks": ["1", "2", "3", "4", "5", "6", "7"]}]}"#;
        let request = daily_request();
        let recovered = recover_sessions(completion, &request, &request.dates())
            .into_result()
            .unwrap();
        assert_eq!(recovered.sessions[0].tasks().len(), MAX_TASKS_PER_SESSION);
    }

    #[test]
    fn duplicate_numbers_are_renumbered() {
        let completion = r#"{"sessions": [{"session_no": 1}, {"session_no": 1}, {"session_no": 2}]}"#;
        let request = daily_request();
        let recovered = recover_sessions(completion, &request, &request.dates())
            .into_result()
            .unwrap();
        let numbers: Vec<u32> = recovered.sessions.iter().map(StudySession::session_no).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn envelope_without_sessions_is_invalid_shape() {
        let completion = r#"{"plan": "none"}"#;
        let request = daily_request();
        let failure = recover_sessions(completion, &request, &request.dates())
            .into_result()
            .unwrap_err();
        assert_eq!(failure.reason, RecoveryError::InvalidShape { index: None });
        assert_eq!(failure.raw, completion);
    }

    #[test]
    fn plan_totals_minutes() {
        let sessions = vec![
            StudySession::new(1, "a", "", Vec::new(), 30).unwrap(),
            StudySession::new(2, "b", "", Vec::new(), 45).unwrap(),
        ];
        let plan = StudyPlan::new(daily_request(), sessions, None, crate::time::fixed_now());
        assert_eq!(plan.total_minutes(), 75);
    }
}
