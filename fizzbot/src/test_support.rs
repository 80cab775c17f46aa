//! Test-only helpers: scripted API, question fixtures, scratch workspaces and
//! a loopback axum stub server.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result, bail};
use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use tokio::runtime::Runtime;

use crate::core::types::{AnswerResult, Outcome, Question, Rule};
use crate::error::FizzbotError;
use crate::io::api::FizzbotApi;
use crate::io::config::{Config, write_config};
use crate::session::SessionConfig;

/// API double that replays queued questions and results in order.
///
/// Running out of questions yields `NotFound`; running out of results yields
/// a `Decode` error.
pub struct ScriptedApi {
    questions: RefCell<VecDeque<Question>>,
    results: RefCell<VecDeque<AnswerResult>>,
    fetched: RefCell<Vec<String>>,
    submissions: RefCell<Vec<(String, String)>>,
}

impl ScriptedApi {
    pub fn new(questions: Vec<Question>, results: Vec<AnswerResult>) -> Self {
        Self {
            questions: RefCell::new(questions.into()),
            results: RefCell::new(results.into()),
            fetched: RefCell::new(Vec::new()),
            submissions: RefCell::new(Vec::new()),
        }
    }

    /// Stage ids passed to `get_question`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    /// `(stage_id, answer)` pairs passed to `submit_answer`, in call order.
    pub fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.borrow().clone()
    }
}

impl FizzbotApi for ScriptedApi {
    fn get_question(&self, stage_id: &str) -> Result<Question, FizzbotError> {
        self.fetched.borrow_mut().push(stage_id.to_string());
        self.questions
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| FizzbotError::NotFound {
                stage_id: stage_id.to_string(),
            })
    }

    fn submit_answer(&self, stage_id: &str, answer: &str) -> Result<AnswerResult, FizzbotError> {
        self.submissions
            .borrow_mut()
            .push((stage_id.to_string(), answer.to_string()));
        self.results
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| FizzbotError::decode("scripted result", "no result queued"))
    }
}

/// The rule-less opening question.
pub fn starter_question() -> Question {
    Question {
        message: "Hello, welcome to fizzbot.".to_string(),
        rules: Vec::new(),
        numbers: Vec::new(),
        example_answer: "COBOL".to_string(),
    }
}

/// A classic Fizz/Buzz question over `numbers`.
pub fn fizzbuzz_question(numbers: Vec<i64>) -> Question {
    Question {
        message: "Solve this one.".to_string(),
        rules: vec![Rule::new(3, "Fizz"), Rule::new(5, "Buzz")],
        numbers,
        example_answer: "1 2 Fizz 4 Buzz".to_string(),
    }
}

/// An answer result with the given outcome and optional next reference.
pub fn answer_result(outcome: Outcome, next_question_ref: Option<&str>) -> AnswerResult {
    AnswerResult {
        next_question_ref: next_question_ref.map(str::to_string),
        message: format!("{} answer", outcome.as_str()),
        outcome,
        grade: None,
        elapsed_seconds: None,
    }
}

/// An interview-complete result.
pub fn complete_result(grade: &str, elapsed_seconds: u64) -> AnswerResult {
    AnswerResult {
        grade: Some(grade.to_string()),
        elapsed_seconds: Some(elapsed_seconds),
        ..answer_result(Outcome::InterviewComplete, None)
    }
}

/// Scratch directory with a `fizzbot.toml` pointing all state inside it.
pub struct TestWorkspace {
    temp: tempfile::TempDir,
    pub config: Config,
}

impl TestWorkspace {
    pub fn new(base_url: &str) -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let config = Config {
            base_url: base_url.to_string(),
            checkpoint_path: temp.path().join("save").join("checkpoint.json"),
            stages_dir: temp.path().join("stages"),
            request_timeout_secs: 5,
            ..Config::default()
        };
        write_config(&temp.path().join("fizzbot.toml"), &config)?;
        Ok(Self { temp, config })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp.path().join("fizzbot.toml")
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::from_config(&self.config)
    }
}

/// A canned HTTP response served by [`StubServer`].
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// A request captured by [`StubServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRequest {
    pub method: String,
    /// Path as sent on the wire (still percent-encoded), without the query.
    pub path: String,
    pub body: String,
}

#[derive(Clone)]
struct StubState {
    responses: Arc<Mutex<VecDeque<StubResponse>>>,
    requests: Arc<Mutex<Vec<StubRequest>>>,
}

/// Loopback axum server that replays queued responses in order, whatever
/// the route, and records every request it receives.
pub struct StubServer {
    base_url: String,
    state: StubState,
    runtime: Runtime,
}

impl StubServer {
    pub fn start(responses: Vec<StubResponse>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("build stub server runtime")?;
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .context("bind stub server")?;
        let addr = listener.local_addr().context("stub server address")?;
        let state = StubState {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        };
        let app = Router::new().fallback(replay).with_state(state.clone());
        runtime.spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::warn!(error = %err, "stub server stopped");
            }
        });
        Ok(Self {
            base_url: format!("http://{addr}"),
            state,
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop the server and return the recorded requests.
    ///
    /// Fails if any queued response was never served.
    pub fn finish(self) -> Result<Vec<StubRequest>> {
        let StubServer { state, runtime, .. } = self;
        runtime.shutdown_background();
        let unserved = lock(&state.responses).len();
        if unserved > 0 {
            bail!("stub server still holds {unserved} unserved response(s)");
        }
        let requests = std::mem::take(&mut *lock(&state.requests));
        Ok(requests)
    }
}

async fn replay(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: String,
) -> impl IntoResponse {
    lock(&state.requests).push(StubRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        body,
    });
    let next = lock(&state.responses).pop_front();
    match next {
        Some(response) => (
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, "application/json")],
            response.body,
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"error":"no response queued"}"#.to_string(),
        ),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
