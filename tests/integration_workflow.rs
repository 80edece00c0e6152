//! Workflow integration tests
//!
//! Drives the real agents through the public API with scripted mock clients.

use std::sync::Arc;

use quillr::agents::{BriefGenerator, CvGenerator, ImageIllustrator, LlmRefiner, LlmReviewer};
use quillr::domain::{Acceptance, Stage, TaskKind};
use quillr::image::MockImageClient;
use quillr::llm::{LlmClient, MockLlmClient};
use quillr::search::{MockSearchClient, SearchClient};
use quillr::workflow::{Dispatcher, ITERATION_CAP, PAPER_PLACEHOLDER, Workflow};
use quillr::WorkflowError;

fn workflow(llm: Arc<MockLlmClient>) -> Workflow {
    let llm: Arc<dyn LlmClient> = llm;
    let search: Arc<dyn SearchClient> = Arc::new(MockSearchClient::new());

    Workflow::new(
        Dispatcher::new(
            Arc::new(BriefGenerator::new(llm.clone(), search.clone())),
            Arc::new(CvGenerator::new(llm.clone(), search)),
        ),
        Arc::new(LlmReviewer::new(llm.clone())),
        Arc::new(LlmRefiner::new(llm)),
        Arc::new(ImageIllustrator::new(Arc::new(MockImageClient::new()))),
    )
}

#[tokio::test]
async fn test_brief_accepted_on_first_review() {
    let llm = Arc::new(MockLlmClient::scripted(["## Brief\n- agent frameworks", "PASS"]));
    let report = workflow(llm.clone()).run("brief", "agents").await.unwrap();

    assert_eq!(report.task_kind, TaskKind::Brief);
    assert_eq!(report.content, "## Brief\n- agent frameworks");
    assert_eq!(report.iteration_count, 0);
    assert_eq!(report.acceptance, Acceptance::Passed);
    assert_eq!(report.image_ref, MockImageClient::PLACEHOLDER_URL);
    assert_eq!(llm.call_count(), 2);
    assert_eq!(report.trace.len(), 4);
}

#[tokio::test]
async fn test_cv_never_passing_is_force_accepted() {
    let llm = Arc::new(MockLlmClient::scripted([
        "cv draft",
        "1. Name the model version",
        "cv draft v2",
        "1. Cite a benchmark",
        "cv draft v3",
        "1. Cite a benchmark\n2. Shorten the intro",
    ]));
    let report = workflow(llm.clone()).run("cv", "YOLOv8").await.unwrap();

    assert_eq!(report.content, "cv draft v3");
    assert_eq!(report.iteration_count, ITERATION_CAP);
    assert_eq!(
        report.acceptance,
        Acceptance::Forced {
            outstanding: vec!["Cite a benchmark".to_string(), "Shorten the intro".to_string()],
        }
    );
    assert_eq!(llm.call_count(), 6);
    assert_eq!(
        report.trace.stages(),
        vec![
            Stage::Route,
            Stage::Generate,
            Stage::Review,
            Stage::Refine,
            Stage::Review,
            Stage::Refine,
            Stage::Review,
            Stage::Illustrate,
        ]
    );

    // The refiner sees the critique it is asked to address
    let refine_prompt = llm.requests()[2].user_text().unwrap_or_default().to_string();
    assert!(refine_prompt.contains("Name the model version"));
    assert!(refine_prompt.contains("cv draft"));
}

#[tokio::test]
async fn test_unknown_kind_makes_no_calls() {
    let llm = Arc::new(MockLlmClient::scripted(Vec::<String>::new()));
    let err = workflow(llm.clone()).run("podcast", "anything").await.unwrap_err();

    assert!(matches!(err.error, WorkflowError::InvalidTask(_)));
    assert_eq!(err.trace.stages(), vec![Stage::Route]);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_paper_skips_generation() {
    let llm = Arc::new(MockLlmClient::scripted(["PASS"]));
    let report = workflow(llm.clone()).run("paper", "2301.12345").await.unwrap();

    assert_eq!(report.content, PAPER_PLACEHOLDER);
    // Only the reviewer talked to the LLM
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_cv_without_input_fails_in_generate() {
    let llm = Arc::new(MockLlmClient::scripted(["unused"]));
    let err = workflow(llm.clone()).run("cv", "   ").await.unwrap_err();

    assert_eq!(err.error.stage(), Stage::Generate);
    assert_eq!(err.trace.stages(), vec![Stage::Route]);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_reviewer_failure_keeps_trace() {
    // The second call (review) finds the script exhausted
    let llm = Arc::new(MockLlmClient::scripted(["brief draft"]));
    let err = workflow(llm).run("brief", "agents").await.unwrap_err();

    assert!(matches!(
        err.error,
        WorkflowError::Collaborator {
            stage: Stage::Review,
            ..
        }
    ));
    assert_eq!(err.trace.stages(), vec![Stage::Route, Stage::Generate]);
}

#[tokio::test]
async fn test_report_serializes_acceptance() {
    let llm = Arc::new(MockLlmClient::scripted(["draft", "Fix the title", "draft v2", "pass"]));
    let report = workflow(llm).run("brief", "").await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["task_kind"], "brief");
    assert_eq!(json["iteration_count"], 1);
    assert_eq!(json["acceptance"]["kind"], "passed");
    assert_eq!(json["trace"][0]["stage"], "route");
}
