//! Remote challenge API.
//!
//! The [`FizzbotApi`] trait decouples the session loop from the HTTP backend.
//! Tests use scripted implementations that return predetermined payloads
//! without touching the network.

use std::fmt::Display;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::core::types::{AnswerResult, Outcome, Question, Rule};
use crate::error::FizzbotError;

/// Abstraction over the question/answer endpoints.
pub trait FizzbotApi {
    /// Fetch the question for `stage_id`.
    fn get_question(&self, stage_id: &str) -> Result<Question, FizzbotError>;

    /// Submit `answer` for `stage_id`.
    fn submit_answer(&self, stage_id: &str, answer: &str) -> Result<AnswerResult, FizzbotError>;
}

/// Blocking HTTP client for `{base_url}/fizzbot/questions/{id}`.
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// `base_url` should be like `https://api.noopschallenge.com`. A trailing
    /// slash is ignored and any path prefix is kept.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FizzbotError> {
        let parsed = Url::parse(base_url)
            .map_err(|err| FizzbotError::decode(format!("base url {base_url:?}"), err))?;
        if parsed.cannot_be_a_base() {
            return Err(FizzbotError::decode(
                format!("base url {base_url:?}"),
                "not a hierarchical http(s) url",
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FizzbotError::Transport {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `{base_url}/fizzbot/questions/{stage_id}` with `stage_id` escaped as a
    /// single path segment.
    fn question_url(&self, stage_id: &str) -> Result<Url, FizzbotError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                FizzbotError::decode(format!("base url {}", self.base_url), "cannot be a base")
            })?
            .pop_if_empty()
            .extend(["fizzbot", "questions", stage_id]);
        Ok(url)
    }
}

impl FizzbotApi for HttpApi {
    #[instrument(skip(self))]
    fn get_question(&self, stage_id: &str) -> Result<Question, FizzbotError> {
        let url = self.question_url(stage_id)?;
        info!(url = %url, "fetching question");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| FizzbotError::Transport {
                url: url.to_string(),
                source,
            })?;
        let body = read_body(stage_id, url.as_str(), resp)?;
        let payload: QuestionPayload = serde_json::from_str(&body)
            .map_err(|err| FizzbotError::decode(format!("question {stage_id}"), err))?;
        let question = Question::from(payload);
        debug!(
            rules = question.rules.len(),
            numbers = question.numbers.len(),
            "question decoded"
        );
        Ok(question)
    }

    #[instrument(skip(self))]
    fn submit_answer(&self, stage_id: &str, answer: &str) -> Result<AnswerResult, FizzbotError> {
        let url = self.question_url(stage_id)?;
        info!(url = %url, "submitting answer");
        let resp = self
            .client
            .post(url.clone())
            .json(&AnswerPayload { answer })
            .send()
            .map_err(|source| FizzbotError::Transport {
                url: url.to_string(),
                source,
            })?;
        let body = read_body(stage_id, url.as_str(), resp)?;
        let payload: AnswerResultPayload = serde_json::from_str(&body)
            .map_err(|err| FizzbotError::decode(format!("answer result {stage_id}"), err))?;
        let result = AnswerResult::from(payload);
        debug!(outcome = result.outcome.as_str(), "answer result decoded");
        Ok(result)
    }
}

/// Map 404 to `NotFound` and other non-success statuses to `Server`.
fn read_body(stage_id: &str, url: &str, resp: Response) -> Result<String, FizzbotError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        warn!(stage_id, "stage not found");
        return Err(FizzbotError::NotFound {
            stage_id: stage_id.to_string(),
        });
    }
    // A wrong answer comes back as 400 with a regular result body.
    if !status.is_success() && status != StatusCode::BAD_REQUEST {
        let body = describe_body(resp.text());
        warn!(status = status.as_u16(), "server error");
        return Err(FizzbotError::Server {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    resp.text().map_err(|source| FizzbotError::Transport {
        url: url.to_string(),
        source,
    })
}

/// Body text for a `Server` error, keeping the read failure if there was one.
fn describe_body<E: Display>(read: Result<String, E>) -> String {
    match read {
        Ok(body) => body,
        Err(err) => format!("<unreadable body: {err}>"),
    }
}

#[derive(Serialize)]
struct AnswerPayload<'a> {
    answer: &'a str,
}

#[derive(Deserialize)]
struct RulePayload {
    number: i64,
    response: String,
}

#[derive(Deserialize, Default)]
struct ExampleResponsePayload {
    #[serde(default)]
    answer: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    #[serde(default)]
    message: String,
    #[serde(default)]
    rules: Vec<RulePayload>,
    #[serde(default)]
    numbers: Vec<i64>,
    #[serde(default)]
    example_response: ExampleResponsePayload,
}

impl From<QuestionPayload> for Question {
    fn from(payload: QuestionPayload) -> Self {
        Question {
            message: payload.message,
            rules: payload
                .rules
                .into_iter()
                .map(|rule| Rule::new(rule.number, rule.response))
                .collect(),
            numbers: payload.numbers,
            example_answer: payload.example_response.answer,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerResultPayload {
    #[serde(default)]
    next_question: Option<String>,
    #[serde(default)]
    message: String,
    result: String,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    elapsed_seconds: Option<u64>,
}

impl From<AnswerResultPayload> for AnswerResult {
    fn from(payload: AnswerResultPayload) -> Self {
        AnswerResult {
            next_question_ref: payload.next_question.filter(|next| !next.is_empty()),
            message: payload.message,
            outcome: Outcome::from_wire(&payload.result),
            grade: payload.grade.filter(|grade| !grade.is_empty()),
            elapsed_seconds: payload.elapsed_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_payload_maps_wire_names() {
        let json = r#"{
            "message": "Thank you for your answer.",
            "rules": [ { "number": 3, "response": "Fizz" }, { "number": 5, "response": "Buzz" } ],
            "numbers": [1, 2, 3, 4, 5],
            "exampleResponse": { "answer": "1 2 Fizz 4 Buzz..." }
        }"#;
        let payload: QuestionPayload = serde_json::from_str(json).expect("parse");
        let question = Question::from(payload);
        assert_eq!(
            question.rules,
            vec![Rule::new(3, "Fizz"), Rule::new(5, "Buzz")]
        );
        assert_eq!(question.numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(question.example_answer, "1 2 Fizz 4 Buzz...");
    }

    #[test]
    fn starter_question_has_no_rules_or_numbers() {
        let json = r#"{
            "message": "Hello, welcome to fizzbot.",
            "exampleResponse": { "answer": "COBOL" }
        }"#;
        let payload: QuestionPayload = serde_json::from_str(json).expect("parse");
        let question = Question::from(payload);
        assert!(question.rules.is_empty());
        assert!(question.numbers.is_empty());
        assert_eq!(question.example_answer, "COBOL");
    }

    #[test]
    fn answer_result_maps_outcomes() {
        let json = r#"{
            "result": "correct",
            "message": "Correct! Now try this one.",
            "nextQuestion": "/fizzbot/questions/abc"
        }"#;
        let payload: AnswerResultPayload = serde_json::from_str(json).expect("parse");
        let result = AnswerResult::from(payload);
        assert_eq!(result.outcome, Outcome::Correct);
        assert_eq!(
            result.next_question_ref.as_deref(),
            Some("/fizzbot/questions/abc")
        );
        assert!(result.grade.is_none());
    }

    #[test]
    fn interview_complete_carries_grade() {
        let json = r#"{
            "result": "interview complete",
            "message": "Well done.",
            "grade": "A+",
            "elapsedSeconds": 123
        }"#;
        let payload: AnswerResultPayload = serde_json::from_str(json).expect("parse");
        let result = AnswerResult::from(payload);
        assert_eq!(result.outcome, Outcome::InterviewComplete);
        assert_eq!(result.grade.as_deref(), Some("A+"));
        assert_eq!(result.elapsed_seconds, Some(123));
    }

    #[test]
    fn unrecognized_result_is_unknown() {
        let json = r#"{ "result": "pending", "message": "" }"#;
        let payload: AnswerResultPayload = serde_json::from_str(json).expect("parse");
        let result = AnswerResult::from(payload);
        assert_eq!(result.outcome, Outcome::Unknown("pending".to_string()));
    }

    #[test]
    fn missing_result_fails_to_decode() {
        let json = r#"{ "message": "no verdict" }"#;
        assert!(serde_json::from_str::<AnswerResultPayload>(json).is_err());
    }

    #[test]
    fn http_api_trims_trailing_slash() {
        let api = HttpApi::new("http://localhost:4000/", Duration::from_secs(1)).expect("client");
        assert_eq!(api.base_url(), "http://localhost:4000");
        assert_eq!(
            api.question_url("abc").expect("url").as_str(),
            "http://localhost:4000/fizzbot/questions/abc"
        );
    }

    #[test]
    fn question_url_keeps_base_path_prefix() {
        let api =
            HttpApi::new("http://localhost:4000/proxy/", Duration::from_secs(1)).expect("client");
        assert_eq!(
            api.question_url("abc").expect("url").as_str(),
            "http://localhost:4000/proxy/fizzbot/questions/abc"
        );
    }

    #[test]
    fn question_url_escapes_stage_id() {
        let api = HttpApi::new("http://localhost:4000", Duration::from_secs(1)).expect("client");
        let url = api.question_url("a?b#c d/e").expect("url");
        assert_eq!(url.path(), "/fizzbot/questions/a%3Fb%23c%20d%2Fe");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn unparseable_base_url_is_decode_error() {
        let err = HttpApi::new("not a url", Duration::from_secs(1)).err().expect("error");
        assert!(matches!(err, FizzbotError::Decode { .. }));
    }

    #[test]
    fn unreadable_server_body_is_reported() {
        let read: Result<String, std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "connection reset"));
        assert_eq!(describe_body(read), "<unreadable body: connection reset>");
        assert_eq!(describe_body(Ok::<_, std::io::Error>("oops".to_string())), "oops");
    }
}
