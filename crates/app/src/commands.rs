use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use services::{
    ExplainOptions, GenerationError, StudyServices, default_csv_name, plan_to_json,
    write_plan_csv,
};
use storage::SessionRepository;
use study_core::Clock;
use study_core::model::{
    ConversationMode, ConversationState, LearnerSession, PlanRequest, QuizAttempt, Role,
    SessionId, SourceDocument, StudyPlan, ViewMode, choice_label,
};
use study_core::recovery::ValidationNotice;
use study_core::transcript::split_into_sentences;

use crate::cli::{
    ChatArgs, Command, ExplainArgs, ModeArg, PlanArgs, QuizArgs, SummarizeArgs, ViewArg,
};

pub async fn dispatch(command: Command, services: &StudyServices) -> anyhow::Result<()> {
    let session_id = SessionId::random();
    tracing::debug!(%session_id, "starting learner session");
    match command {
        Command::Quiz(args) => quiz(args, services, session_id).await,
        Command::Plan(args) => plan(args, services, session_id).await,
        Command::Summarize(args) => summarize(args, services, session_id).await,
        Command::Explain(args) => explain(args, services).await,
        Command::Chat(args) => chat(args, services, session_id).await,
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

async fn quiz(
    args: QuizArgs,
    services: &StudyServices,
    session_id: SessionId,
) -> anyhow::Result<()> {
    let document = read_document(&args.file)?;
    let generated = services
        .quiz()
        .generate(&document.full_text(), args.count, args.difficulty.into())
        .await
        .map_err(show_raw_output)?;
    report_notices(&generated.notices);

    let mut session = load_session(services, session_id).await?;
    session.attach_document(document.name());
    let attempt = session.replace_quiz(generated.items);

    if args.interactive {
        take_quiz(attempt)?;
    } else {
        print_answer_key(attempt);
    }
    save_session(services, &session).await
}

fn take_quiz(attempt: &mut QuizAttempt) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let total = attempt.items().len();

    for question in 0..total {
        let item = &attempt.items()[question];
        print_question(question, item.question(), item.choices());
        let last = choice_label(item.choices().len() - 1);
        loop {
            print!("Answer (A-{last}): ");
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                bail!("input ended before the quiz was finished");
            };
            match parse_choice(&line).map(|choice| attempt.select(question, choice)) {
                Some(Ok(())) => break,
                Some(Err(err)) => println!("{err}"),
                None => println!("Enter one of the letters shown."),
            }
        }
    }

    let score = attempt.score();
    println!("\nScore: {}/{}", score.correct, score.total);
    for (question, (item, result)) in attempt.items().iter().zip(&score.results).enumerate() {
        let mark = if result.is_correct { "correct" } else { "wrong" };
        println!(
            "{}. {mark}, answer {}: {}",
            question + 1,
            choice_label(result.correct),
            item.answer()
        );
        if !item.explanation().is_empty() {
            println!("   {}", item.explanation());
        }
    }
    Ok(())
}

fn print_answer_key(attempt: &QuizAttempt) {
    for (question, item) in attempt.items().iter().enumerate() {
        print_question(question, item.question(), item.choices());
        println!(
            "   Answer: {} ({})",
            choice_label(item.answer_index()),
            item.answer()
        );
        if !item.explanation().is_empty() {
            println!("   {}", item.explanation());
        }
        println!();
    }
}

fn print_question(index: usize, question: &str, choices: &[String]) {
    println!("{}. {question}", index + 1);
    for (choice, text) in choices.iter().enumerate() {
        println!("   {}) {text}", choice_label(choice));
    }
}

fn parse_choice(input: &str) -> Option<usize> {
    let mut chars = input.trim().chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    Some(usize::from(letter as u8 - b'A'))
}

//
// ─── PLAN ──────────────────────────────────────────────────────────────────────
//

async fn plan(
    args: PlanArgs,
    services: &StudyServices,
    session_id: SessionId,
) -> anyhow::Result<()> {
    let document = read_document(&args.file)?;
    let view = match args.view {
        ViewArg::Daily => ViewMode::Daily,
        ViewArg::Weekly => ViewMode::Weekly {
            sessions_per_week: args.per_week,
        },
    };
    let request =
        PlanRequest::new(args.start, args.end, view, args.minutes)?.with_depth(args.depth.into());

    let generated = services
        .plans()
        .generate(request, &document.full_text())
        .await
        .map_err(show_raw_output)?;
    report_notices(&generated.notices);
    let plan = generated.plan;
    print_plan(&plan);

    let csv_path = args
        .csv
        .unwrap_or_else(|| default_csv_name(Clock::default_clock().now()).into());
    let file = File::create(&csv_path)
        .with_context(|| format!("cannot create {}", csv_path.display()))?;
    write_plan_csv(&plan, BufWriter::new(file))?;
    println!("\nSaved {}", csv_path.display());

    if let Some(json_path) = args.json {
        let json = plan_to_json(&plan, document.name())?;
        fs::write(&json_path, json)
            .with_context(|| format!("cannot write {}", json_path.display()))?;
        println!("Saved {}", json_path.display());
    }

    let mut session = load_session(services, session_id).await?;
    session.attach_document(document.name());
    session.set_plan(plan);
    save_session(services, &session).await
}

fn print_plan(plan: &StudyPlan) {
    for session in plan.sessions() {
        let date = session
            .date()
            .map_or_else(|| "unscheduled".to_string(), |d| d.to_string());
        println!(
            "{date}  #{} {} ({} min)",
            session.session_no(),
            session.title(),
            session.estimated_minutes()
        );
        if !session.objective().is_empty() {
            println!("    Goal: {}", session.objective());
        }
        for task in session.tasks() {
            println!("    - {task}");
        }
    }
    println!("\nTotal: {} min", plan.total_minutes());
    if let Some(notes) = plan.notes() {
        println!("Notes: {notes}");
    }
}

//
// ─── SUMMARY & EXPLANATION ─────────────────────────────────────────────────────
//

async fn summarize(
    args: SummarizeArgs,
    services: &StudyServices,
    session_id: SessionId,
) -> anyhow::Result<()> {
    let document = read_document(&args.file)?;
    let text = document.full_text();
    if args.show_text {
        for sentence in split_into_sentences(&text) {
            println!("{sentence}");
        }
        println!();
    }

    let summary = services.summaries().summarize(&text, args.sentences).await?;
    println!("{summary}");

    let mut session = load_session(services, session_id).await?;
    session.attach_document(document.name());
    session.set_summary(summary);
    save_session(services, &session).await
}

async fn explain(args: ExplainArgs, services: &StudyServices) -> anyhow::Result<()> {
    let options = ExplainOptions {
        depth: args.depth.into(),
        outline: !args.no_outline,
        examples: !args.no_examples,
        references: args.references,
        next_steps: !args.no_next_steps,
    };
    let summaries = services.summaries();
    let explanation = summaries.explain(&args.topic, options).await?;
    println!("{explanation}");

    if args.quick_summary {
        let summary = summaries.quick_summary(&explanation).await?;
        println!("\nIn short: {summary}");
    }
    if args.checklist {
        println!("\nChecklist:");
        for (step, text) in summaries.checklist(&explanation).await?.iter().enumerate() {
            println!("  [ ] {}. {text}", step + 1);
        }
    }
    Ok(())
}

//
// ─── CHAT ──────────────────────────────────────────────────────────────────────
//

const CHAT_HELP: &str = "Commands: /reset, /mode research|debate|off|<instruction>, \
/note YYYY-MM-DD <text>, /notes, /quit";

async fn chat(
    args: ChatArgs,
    services: &StudyServices,
    session_id: SessionId,
) -> anyhow::Result<()> {
    let chat = services.chat();
    let notes = services.notes();
    let mut state = load_session(services, session_id)
        .await?
        .conversation()
        .clone();
    if let Some(mode) = args.mode {
        state.set_mode(match mode {
            ModeArg::Research => ConversationMode::Research,
            ModeArg::Debate => ConversationMode::Debate,
        });
    }

    println!("{CHAT_HELP}");
    print_transcript(&state);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/reset", _) => {
                state.reset();
                print_transcript(&state);
            }
            ("/mode", rest) => match rest.trim() {
                "" | "off" => state.clear_mode(),
                "research" => state.set_mode(ConversationMode::Research),
                "debate" => state.set_mode(ConversationMode::Debate),
                custom => state.set_mode(ConversationMode::Custom(custom.to_string())),
            },
            ("/note", rest) => {
                let Some((date, text)) = rest.trim().split_once(' ') else {
                    println!("Usage: /note YYYY-MM-DD <text>");
                    continue;
                };
                let Ok(date) = date.parse::<NaiveDate>() else {
                    println!("Dates look like 2025-01-31.");
                    continue;
                };
                match notes.add(session_id, date, text).await {
                    Ok(all) => println!("{} note(s) saved.", all.len()),
                    Err(err) => println!("{err}"),
                }
            }
            ("/notes", _) => {
                for note in notes.list(session_id).await? {
                    println!("{}  [{}] {}", note.date(), note.id(), note.text());
                }
            }
            _ if line.starts_with('/') => println!("{CHAT_HELP}"),
            _ => match chat.send(&mut state, line).await {
                Ok(reply) => println!("{reply}"),
                Err(err) => {
                    tracing::warn!(error = %err, "no reply");
                    println!("No reply ({err}). Your message was not recorded; try again.");
                }
            },
        }
        save_conversation(services, session_id, &state).await?;
    }
    Ok(())
}

fn print_transcript(state: &ConversationState) {
    for turn in state.history() {
        let who = match turn.role {
            Role::User => "you",
            Role::Assistant => "mate",
        };
        println!("{who}: {}", turn.text);
    }
}

//
// ─── HELPERS ───────────────────────────────────────────────────────────────────
//

fn read_document(path: &Path) -> anyhow::Result<SourceDocument> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let document = SourceDocument::from_text(name, &text);
    if document.is_empty() {
        bail!("{} has no text", path.display());
    }
    tracing::info!(name = document.name(), pages = document.page_count(), "loaded document");
    Ok(document)
}

fn report_notices(notices: &[ValidationNotice]) {
    for notice in notices {
        tracing::warn!(%notice, "generation count mismatch");
    }
}

fn show_raw_output(err: GenerationError) -> anyhow::Error {
    if let Some(raw) = err.raw_output() {
        eprintln!("--- model output ---\n{raw}\n--------------------");
    }
    err.into()
}

async fn load_session(
    services: &StudyServices,
    session_id: SessionId,
) -> anyhow::Result<LearnerSession> {
    Ok(services.storage().sessions.get_or_create(session_id).await?)
}

async fn save_session(services: &StudyServices, session: &LearnerSession) -> anyhow::Result<()> {
    services.storage().sessions.upsert_session(session).await?;
    Ok(())
}

async fn save_conversation(
    services: &StudyServices,
    session_id: SessionId,
    state: &ConversationState,
) -> anyhow::Result<()> {
    let mut session = load_session(services, session_id).await?;
    *session.conversation_mut() = state.clone();
    save_session(services, &session).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_accept_either_case() {
        assert_eq!(parse_choice("b"), Some(1));
        assert_eq!(parse_choice(" D "), Some(3));
    }

    #[test]
    fn non_letters_are_not_choices() {
        assert_eq!(parse_choice(""), None);
        assert_eq!(parse_choice("2"), None);
        assert_eq!(parse_choice("AB"), None);
    }
}
