mod common;

use chrono::NaiveDate;
use common::ScriptedLlm;
use services::{GenerationError, LlmError, StudyPlanService, plan_csv};
use study_core::model::{PlanRequest, ViewMode};
use study_core::recovery::ValidationNotice;
use study_core::time::{fixed_clock, fixed_now};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekly_request() -> PlanRequest {
    PlanRequest::new(
        date(2025, 1, 1),
        date(2025, 1, 14),
        ViewMode::Weekly {
            sessions_per_week: 2,
        },
        45,
    )
    .unwrap()
}

const FOUR_SESSIONS: &str = r#"Here is your plan:
{"sessions": [
  {"session_no": 1, "title": "Overview", "objective": "Skim", "tasks": ["read intro"], "estimated_minutes": 45},
  {"session_no": 2, "title": "Core ideas", "objective": "Understand", "tasks": ["notes", "examples"]},
  {"session_no": 3, "title": "Practice", "objective": "Apply", "tasks": "exercise 1\nexercise 2", "estimated_minutes": 50},
  {"session_no": 4, "title": "Review", "objective": "Consolidate", "tasks": [], "estimated_minutes": 30}
], "notes": "Rest on weekends."}"#;

#[tokio::test]
async fn weekly_plan_maps_sessions_onto_earliest_days() {
    let llm = ScriptedLlm::new().reply(FOUR_SESSIONS);
    let plans = StudyPlanService::new(fixed_clock(), llm.shared());

    let generated = plans
        .generate(weekly_request(), "Chapter 1. Chapter 2.")
        .await
        .unwrap();
    let plan = generated.plan;

    let dates: Vec<_> = plan.sessions().iter().map(|s| s.date()).collect();
    assert_eq!(
        dates,
        [
            Some(date(2025, 1, 1)),
            Some(date(2025, 1, 2)),
            Some(date(2025, 1, 8)),
            Some(date(2025, 1, 9)),
        ]
    );
    assert_eq!(plan.sessions()[1].estimated_minutes(), 45);
    assert_eq!(plan.sessions()[2].tasks(), ["exercise 1", "exercise 2"]);
    assert_eq!(plan.notes(), Some("Rest on weekends."));
    assert_eq!(plan.generated_at(), fixed_now());
    assert!(generated.notices.is_empty());

    let prompt = &llm.requests()[0].prompt;
    assert!(prompt.contains("exactly 4 sessions"));
    assert!(prompt.contains("about 45 minutes"));

    let csv = plan_csv(&plan).unwrap();
    assert!(csv.contains("2025-01-08,3,Practice,Apply,exercise 1 | exercise 2,50"));
}

#[tokio::test]
async fn short_answer_leaves_later_dates_unused() {
    let llm = ScriptedLlm::new().reply(
        r#"{"sessions": [{"session_no": 1, "title": "Only one", "tasks": ["read"]}]}"#,
    );
    let plans = StudyPlanService::new(fixed_clock(), llm.shared());

    let generated = plans.generate(weekly_request(), "text").await.unwrap();

    assert_eq!(generated.plan.sessions().len(), 1);
    assert_eq!(generated.plan.sessions()[0].date(), Some(date(2025, 1, 1)));
    assert_eq!(
        generated.notices,
        [ValidationNotice::TooFew {
            produced: 1,
            requested: 4
        }]
    );
}

#[tokio::test]
async fn long_material_is_condensed_before_planning() {
    let long = "x".repeat(12_001);
    let llm = ScriptedLlm::new()
        .reply("- Part one\n- Part two")
        .reply(FOUR_SESSIONS);
    let plans = StudyPlanService::new(fixed_clock(), llm.shared());

    plans.generate(weekly_request(), &long).await.unwrap();

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].prompt.contains(&long));
    assert!(requests[1].prompt.ends_with("- Part one\n- Part two"));
}

#[tokio::test]
async fn condensing_failure_falls_back_to_truncated_material() {
    let long = format!("{}ZZZ_CUT_OFF", "y".repeat(12_000));
    let llm = ScriptedLlm::new()
        .fail(LlmError::Timeout)
        .reply(FOUR_SESSIONS);
    let plans = StudyPlanService::new(fixed_clock(), llm.shared());

    plans.generate(weekly_request(), &long).await.unwrap();

    let prompt = &llm.requests()[1].prompt;
    assert!(prompt.ends_with(&"y".repeat(12_000)));
    assert!(!prompt.contains("ZZZ_CUT_OFF"));
}

#[tokio::test]
async fn unreadable_answer_is_a_recovery_failure() {
    let llm = ScriptedLlm::new().reply("I could not build a plan, sorry.");
    let plans = StudyPlanService::new(fixed_clock(), llm.shared());

    let err = plans.generate(weekly_request(), "text").await.unwrap_err();

    assert!(matches!(err, GenerationError::Recovery(_)));
    assert_eq!(err.raw_output(), Some("I could not build a plan, sorry."));
}

#[tokio::test]
async fn blank_material_is_rejected_before_any_call() {
    let llm = ScriptedLlm::new();
    let plans = StudyPlanService::new(fixed_clock(), llm.shared());

    let err = plans.generate(weekly_request(), " \n ").await.unwrap_err();

    assert!(matches!(err, GenerationError::EmptyInput));
    assert!(llm.requests().is_empty());
}
