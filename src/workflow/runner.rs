//! Workflow runner - drives one task through the review/refine loop.
//!
//! ROUTE -> GENERATE -> REVIEW -> {REFINE -> REVIEW}* -> ILLUSTRATE -> DONE
//!
//! Every stage reads the current [`TaskState`] and returns a [`StatePatch`];
//! the runner folds each patch in with [`merge`] before choosing the next
//! stage. Collaborator calls are awaited one at a time, so a run never has two
//! stages in flight.

use std::sync::Arc;

use log::{debug, info, warn};

use super::dispatch::Dispatcher;
use super::policy::{self, Continuation, ITERATION_CAP};
use crate::agents::{CollaboratorError, Illustrator, Refiner, Reviewer};
use crate::domain::{Acceptance, Critique, RunReport, Stage, StatePatch, TaskKind, TaskState, Trace, TraceEntry, merge};
use crate::error::{Result, RunError, WorkflowError};

/// Patch produced by one stage plus the stage to run next.
#[derive(Debug)]
struct Step {
    patch: StatePatch,
    next: Stage,
}

impl Step {
    fn new(stage: Stage, message: impl Into<String>, next: Stage) -> Self {
        Self {
            patch: StatePatch::new().with_trace(TraceEntry::new(stage, message)),
            next,
        }
    }

    fn with(mut self, f: impl FnOnce(StatePatch) -> StatePatch) -> Self {
        self.patch = f(self.patch);
        self
    }
}

/// Validate a task kind name against the supported set.
pub fn route(task_kind: &str) -> Result<TaskKind> {
    task_kind
        .parse::<TaskKind>()
        .map_err(|e| WorkflowError::InvalidTask(e.to_string()))
}

/// The control loop and the collaborators it drives.
pub struct Workflow {
    dispatcher: Dispatcher,
    reviewer: Arc<dyn Reviewer>,
    refiner: Arc<dyn Refiner>,
    illustrator: Arc<dyn Illustrator>,
}

impl Workflow {
    pub fn new(
        dispatcher: Dispatcher,
        reviewer: Arc<dyn Reviewer>,
        refiner: Arc<dyn Refiner>,
        illustrator: Arc<dyn Illustrator>,
    ) -> Self {
        Self {
            dispatcher,
            reviewer,
            refiner,
            illustrator,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run a task given its kind by name.
    ///
    /// An unknown kind fails before any collaborator is called; the returned
    /// trace holds the single routing entry.
    pub async fn run(&self, task_kind: &str, input_query: &str) -> std::result::Result<RunReport, RunError> {
        match route(task_kind) {
            Ok(kind) => self.run_kind(kind, input_query).await,
            Err(error) => {
                warn!("Rejected task kind '{}'", task_kind.trim());
                let trace = Trace::from(TraceEntry::new(
                    Stage::Route,
                    format!("rejected task kind '{}'", task_kind.trim()),
                ));
                Err(RunError::new(error, trace))
            }
        }
    }

    /// Run a task whose kind is already known.
    pub async fn run_kind(&self, task_kind: TaskKind, input_query: &str) -> std::result::Result<RunReport, RunError> {
        info!("Starting {} run", task_kind);
        let mut state = TaskState::new(task_kind, input_query);
        let mut stage = Stage::Route;

        while !stage.is_terminal() {
            debug!("Entering {} (iteration {})", stage, state.iteration_count);
            match self.step(stage, &state).await {
                Ok(step) => {
                    state = merge(state, step.patch);
                    stage = step.next;
                }
                Err(error) => {
                    warn!("{} run failed: {}", task_kind, error);
                    return Err(RunError::new(error, state.trace));
                }
            }
        }

        self.finish(state).map_err(|(error, trace)| RunError::new(error, trace))
    }

    async fn step(&self, stage: Stage, state: &TaskState) -> Result<Step> {
        if stage.requires_content() && !state.has_content() {
            return Err(WorkflowError::precondition(stage, "content is empty"));
        }

        match stage {
            Stage::Route => Ok(Step::new(
                Stage::Route,
                format!("task kind: {}", state.task_kind),
                Stage::Generate,
            )),
            Stage::Generate => self.generate(state).await,
            Stage::Review => self.review(state).await,
            Stage::Refine => self.refine(state).await,
            Stage::Illustrate => self.illustrate(state).await,
            Stage::Done => Err(WorkflowError::precondition(Stage::Done, "run already finished")),
        }
    }

    async fn generate(&self, state: &TaskState) -> Result<Step> {
        let generated = self
            .dispatcher
            .slot(state.task_kind)
            .generate(state.task_kind, &state.input_query)
            .await
            .map_err(|e| WorkflowError::collaborator(Stage::Generate, e))?;

        info!("Generated {} chars of {} content", generated.content.len(), state.task_kind);
        Ok(Step::new(Stage::Generate, generated.note, Stage::Review).with(|p| p.with_content(generated.content)))
    }

    async fn review(&self, state: &TaskState) -> Result<Step> {
        let raw = self
            .reviewer
            .review(state.task_kind, &state.content)
            .await
            .map_err(|e| WorkflowError::collaborator(Stage::Review, e))?;

        let critique = Critique::parse(&raw).ok_or_else(|| {
            WorkflowError::collaborator(
                Stage::Review,
                CollaboratorError::EmptyResponse("reviewer returned no critique".to_string()),
            )
        })?;

        let round = state.iteration_count + 1;
        let continuation = policy::decide(&critique, state.iteration_count);
        let message = match continuation {
            Continuation::Accept => format!("round {}: pass", round),
            Continuation::Refine => format!("round {}: {} change request(s)", round, critique.change_count()),
            Continuation::ForceAccept => format!(
                "round {}: {} change request(s), iteration cap of {} reached, accepting as-is",
                round,
                critique.change_count(),
                ITERATION_CAP
            ),
        };

        match continuation {
            Continuation::Accept => info!("Review passed after {} refinement(s)", state.iteration_count),
            Continuation::Refine => info!("Review requested {} change(s)", critique.change_count()),
            Continuation::ForceAccept => warn!(
                "Iteration cap of {} reached with {} open change request(s); accepting content as-is",
                ITERATION_CAP,
                critique.change_count()
            ),
        }

        Ok(Step::new(Stage::Review, message, continuation.next_stage()).with(|p| p.with_critique(critique)))
    }

    async fn refine(&self, state: &TaskState) -> Result<Step> {
        let critique = match &state.critique {
            Some(critique @ Critique::Changes { .. }) => critique,
            Some(Critique::Pass) => {
                return Err(WorkflowError::precondition(Stage::Refine, "critique already passed"));
            }
            None => return Err(WorkflowError::precondition(Stage::Refine, "no critique recorded")),
        };

        if state.iteration_count >= ITERATION_CAP {
            return Err(WorkflowError::precondition(
                Stage::Refine,
                format!("iteration cap of {} already reached", ITERATION_CAP),
            ));
        }

        let revised = self
            .refiner
            .refine(state.task_kind, &state.content, critique.text())
            .await
            .map_err(|e| WorkflowError::collaborator(Stage::Refine, e))?;

        let iteration = state.iteration_count + 1;
        info!("Refinement {} of {} complete", iteration, ITERATION_CAP);
        Ok(Step::new(
            Stage::Refine,
            format!(
                "iteration {}: addressed {} change request(s)",
                iteration,
                critique.change_count()
            ),
            Stage::Review,
        )
        .with(|p| p.with_content(revised).with_iteration_delta(1)))
    }

    async fn illustrate(&self, state: &TaskState) -> Result<Step> {
        if state.image_ref.is_some() {
            return Err(WorkflowError::precondition(Stage::Illustrate, "image already attached"));
        }

        let image_ref = self
            .illustrator
            .illustrate(state.task_kind, &state.content)
            .await
            .map_err(|e| WorkflowError::collaborator(Stage::Illustrate, e))?;

        info!("Illustration ready: {}", image_ref);
        Ok(Step::new(Stage::Illustrate, format!("image: {}", image_ref), Stage::Done)
            .with(|p| p.with_image_ref(image_ref)))
    }

    fn finish(&self, state: TaskState) -> std::result::Result<RunReport, (WorkflowError, Trace)> {
        let acceptance = match &state.critique {
            Some(Critique::Pass) => Acceptance::Passed,
            Some(Critique::Changes { items, .. }) => Acceptance::Forced {
                outstanding: items.clone(),
            },
            None => {
                return Err((
                    WorkflowError::precondition(Stage::Done, "no critique recorded"),
                    state.trace,
                ));
            }
        };

        let trace = state.trace.clone();
        let report = RunReport::from_state(state, acceptance)
            .ok_or_else(|| (WorkflowError::precondition(Stage::Done, "no image attached"), trace))?;

        info!(
            "Finished {} run after {} refinement(s){}",
            report.task_kind,
            report.iteration_count,
            if report.is_forced() { " (forced)" } else { "" }
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Generator;
    use crate::llm::LlmError;
    use crate::workflow::dispatch::PAPER_PLACEHOLDER;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGenerator {
        content: &'static str,
        calls: AtomicUsize,
    }

    impl FixedGenerator {
        fn new(content: &'static str) -> Arc<Self> {
            Arc::new(Self {
                content,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Generator for FixedGenerator {
        async fn generate(&self, _task_kind: TaskKind, _input_query: &str) -> std::result::Result<String, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.content.to_string())
        }
    }

    /// Replies with the scripted verdicts in order, repeating the last one.
    struct ScriptedReviewer {
        verdicts: Vec<&'static str>,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedReviewer {
        fn new(verdicts: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                verdicts,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Reviewer for ScriptedReviewer {
        async fn review(&self, _task_kind: TaskKind, content: &str) -> std::result::Result<String, CollaboratorError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(content.to_string());
            let idx = n.min(self.verdicts.len() - 1);
            Ok(self.verdicts[idx].to_string())
        }
    }

    struct CountingRefiner {
        calls: AtomicUsize,
        critiques: Mutex<Vec<String>>,
    }

    impl CountingRefiner {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                critiques: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Refiner for CountingRefiner {
        async fn refine(
            &self,
            _task_kind: TaskKind,
            content: &str,
            critique: &str,
        ) -> std::result::Result<String, CollaboratorError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.critiques.lock().unwrap().push(critique.to_string());
            Ok(format!("{} [rev {}]", content, n))
        }
    }

    struct CountingIllustrator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingIllustrator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl Illustrator for CountingIllustrator {
        async fn illustrate(&self, _task_kind: TaskKind, _content: &str) -> std::result::Result<String, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CollaboratorError::Llm(LlmError::ApiError {
                    status: 503,
                    message: "image service unavailable".to_string(),
                }))
            } else {
                Ok("https://img.test/1.png".to_string())
            }
        }
    }

    struct Fixture {
        brief: Arc<FixedGenerator>,
        cv: Arc<FixedGenerator>,
        reviewer: Arc<ScriptedReviewer>,
        refiner: Arc<CountingRefiner>,
        illustrator: Arc<CountingIllustrator>,
    }

    impl Fixture {
        fn new(verdicts: Vec<&'static str>) -> Self {
            Self {
                brief: FixedGenerator::new("Agents weekly brief"),
                cv: FixedGenerator::new("YOLO analysis"),
                reviewer: ScriptedReviewer::new(verdicts),
                refiner: CountingRefiner::new(),
                illustrator: CountingIllustrator::new(),
            }
        }

        fn workflow(&self) -> Workflow {
            Workflow::new(
                Dispatcher::new(self.brief.clone(), self.cv.clone()),
                self.reviewer.clone(),
                self.refiner.clone(),
                self.illustrator.clone(),
            )
        }

        fn collaborator_calls(&self) -> usize {
            self.brief.calls.load(Ordering::SeqCst)
                + self.cv.calls.load(Ordering::SeqCst)
                + self.reviewer.calls.load(Ordering::SeqCst)
                + self.refiner.calls.load(Ordering::SeqCst)
                + self.illustrator.calls.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_route() {
        assert_eq!(route("brief").unwrap(), TaskKind::Brief);
        assert_eq!(route(" CV ").unwrap(), TaskKind::Cv);
        assert!(matches!(route("video"), Err(WorkflowError::InvalidTask(_))));
    }

    #[tokio::test]
    async fn test_brief_passes_first_review() {
        let fx = Fixture::new(vec!["PASS"]);
        let report = fx.workflow().run("brief", "AI agents").await.unwrap();

        assert_eq!(report.task_kind, TaskKind::Brief);
        assert_eq!(report.content, "Agents weekly brief");
        assert_eq!(report.image_ref, "https://img.test/1.png");
        assert_eq!(report.iteration_count, 0);
        assert_eq!(report.acceptance, Acceptance::Passed);
        assert_eq!(
            report.trace.stages(),
            vec![Stage::Route, Stage::Generate, Stage::Review, Stage::Illustrate]
        );
        assert_eq!(fx.refiner.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.illustrator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pass_is_case_insensitive_and_trimmed() {
        let fx = Fixture::new(vec!["  pass \n"]);
        let report = fx.workflow().run("brief", "AI agents").await.unwrap();
        assert_eq!(report.acceptance, Acceptance::Passed);
        assert_eq!(fx.reviewer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pass_inside_sentence_is_not_a_pass() {
        let fx = Fixture::new(vec!["PASS with minor edits", "PASS"]);
        let report = fx.workflow().run("brief", "AI agents").await.unwrap();
        assert_eq!(report.iteration_count, 1);
        assert_eq!(fx.refiner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cv_passes_after_one_refine() {
        let fx = Fixture::new(vec!["1. Cite the paper", "PASS"]);
        let report = fx.workflow().run("cv", "YOLO").await.unwrap();

        assert_eq!(report.content, "YOLO analysis [rev 1]");
        assert_eq!(report.iteration_count, 1);
        assert_eq!(report.acceptance, Acceptance::Passed);
        assert_eq!(
            report.trace.stages(),
            vec![
                Stage::Route,
                Stage::Generate,
                Stage::Review,
                Stage::Refine,
                Stage::Review,
                Stage::Illustrate
            ]
        );
        assert_eq!(*fx.refiner.critiques.lock().unwrap(), vec!["1. Cite the paper".to_string()]);
        assert_eq!(
            *fx.reviewer.seen.lock().unwrap(),
            vec!["YOLO analysis".to_string(), "YOLO analysis [rev 1]".to_string()]
        );
    }

    #[tokio::test]
    async fn test_never_passing_reviewer_hits_cap() {
        let fx = Fixture::new(vec!["1. Too vague\n2. Missing numbers"]);
        let report = fx.workflow().run("cv", "YOLO").await.unwrap();

        assert_eq!(report.iteration_count, ITERATION_CAP);
        assert_eq!(fx.reviewer.calls.load(Ordering::SeqCst), 3);
        assert_eq!(fx.refiner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(fx.illustrator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.content, "YOLO analysis [rev 1] [rev 2]");
        assert_eq!(
            report.acceptance,
            Acceptance::Forced {
                outstanding: vec!["Too vague".to_string(), "Missing numbers".to_string()],
            }
        );
        assert!(report.is_forced());
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
                Stage::Illustrate
            ]
        );

        let last_review = report
            .trace
            .iter()
            .filter(|e| e.stage == Stage::Review)
            .last()
            .unwrap();
        assert!(last_review.message.contains("accepting as-is"));
    }

    #[tokio::test]
    async fn test_unknown_kind_fails_without_collaborator_calls() {
        let fx = Fixture::new(vec!["PASS"]);
        let err = fx.workflow().run("video", "anything").await.unwrap_err();

        assert!(matches!(err.error, WorkflowError::InvalidTask(_)));
        assert_eq!(err.trace.stages(), vec![Stage::Route]);
        assert_eq!(fx.collaborator_calls(), 0);
    }

    #[tokio::test]
    async fn test_paper_uses_placeholder() {
        let fx = Fixture::new(vec!["PASS"]);
        let report = fx.workflow().run("paper", "2301.12345").await.unwrap();

        assert_eq!(report.content, PAPER_PLACEHOLDER);
        assert_eq!(fx.brief.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.cv.calls.load(Ordering::SeqCst), 0);
        assert!(report.trace.entries()[1].message.contains("quarantined"));
    }

    #[tokio::test]
    async fn test_illustrator_failure_keeps_trace() {
        let mut fx = Fixture::new(vec!["PASS"]);
        fx.illustrator = CountingIllustrator::failing();
        let err = fx.workflow().run("brief", "AI agents").await.unwrap_err();

        assert_eq!(err.error.stage(), Stage::Illustrate);
        assert!(matches!(
            err.error,
            WorkflowError::Collaborator {
                stage: Stage::Illustrate,
                ..
            }
        ));
        assert_eq!(err.trace.stages(), vec![Stage::Route, Stage::Generate, Stage::Review]);
    }

    #[tokio::test]
    async fn test_empty_generation_is_precondition_failure() {
        let mut fx = Fixture::new(vec!["PASS"]);
        fx.brief = FixedGenerator::new("   ");
        let err = fx.workflow().run("brief", "AI agents").await.unwrap_err();

        assert!(matches!(
            err.error,
            WorkflowError::Precondition {
                stage: Stage::Review,
                ..
            }
        ));
        assert_eq!(fx.reviewer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(err.trace.stages(), vec![Stage::Route, Stage::Generate]);
    }

    #[tokio::test]
    async fn test_blank_review_is_collaborator_failure() {
        let fx = Fixture::new(vec!["  "]);
        let err = fx.workflow().run("brief", "AI agents").await.unwrap_err();

        assert!(matches!(
            err.error,
            WorkflowError::Collaborator {
                stage: Stage::Review,
                source: CollaboratorError::EmptyResponse(_),
            }
        ));
        assert_eq!(fx.refiner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refine_without_changes_is_precondition_failure() {
        let fx = Fixture::new(vec!["PASS"]);
        let wf = fx.workflow();
        let mut state = TaskState::new(TaskKind::Brief, "q");
        state.content = "draft".to_string();
        state.critique = Some(Critique::Pass);

        let err = wf.step(Stage::Refine, &state).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { stage: Stage::Refine, .. }));
        assert_eq!(fx.refiner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refine_past_cap_is_rejected() {
        let fx = Fixture::new(vec!["PASS"]);
        let wf = fx.workflow();
        let mut state = TaskState::new(TaskKind::Cv, "q");
        state.content = "draft".to_string();
        state.critique = Critique::parse("1. fix it");
        state.iteration_count = ITERATION_CAP;

        let err = wf.step(Stage::Refine, &state).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { stage: Stage::Refine, .. }));
    }

    #[tokio::test]
    async fn test_done_stage_is_not_steppable() {
        let fx = Fixture::new(vec!["PASS"]);
        let state = TaskState::new(TaskKind::Brief, "q");
        let err = fx.workflow().step(Stage::Done, &state).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Done);
    }
}
