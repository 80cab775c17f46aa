//! Plain-text rendering of questions, results and session progress for stdout.

use std::fmt::Write;

use crate::core::types::{AnswerResult, Question};
use crate::session::{SessionOutcome, SessionStop, StepReport};

/// Render a question the way `fizzbot get` prints it.
pub fn render_question(question: &Question) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Message:\n{}", question.message);
    let _ = writeln!(out, "Rules:");
    if question.rules.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for rule in &question.rules {
        let _ = writeln!(out, "  Number: {}\tResponse: {}", rule.divisor, rule.text);
    }
    let numbers: Vec<String> = question.numbers.iter().map(i64::to_string).collect();
    let _ = writeln!(out, "Numbers: [{}]", numbers.join(" "));
    let _ = writeln!(out, "ExampleResponse: {}", question.example_answer);
    out
}

/// Render an answer result the way `fizzbot answer` prints it.
pub fn render_result(result: &AnswerResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Result: {}", result.outcome.as_str());
    let _ = writeln!(out, "Message:\n{}", result.message);
    if let Some(next) = &result.next_question_ref {
        let _ = writeln!(out, "NextQuestion: {next}");
    }
    if let Some(grade) = &result.grade {
        let _ = writeln!(out, "Grade: {grade}");
    }
    if let Some(elapsed) = result.elapsed_seconds {
        let _ = writeln!(out, "ElapsedSeconds: {elapsed}");
    }
    out
}

/// One progress line per checkpointed step.
pub fn render_step(step: &StepReport) -> String {
    let next = if step.next_stage_id.is_empty() {
        "(complete)"
    } else {
        step.next_stage_id.as_str()
    };
    format!(
        "stage={} answer={:?} next={}",
        step.stage_id, step.answer, next
    )
}

/// Final summary line for `fizzbot run`.
pub fn render_outcome(outcome: &SessionOutcome) -> String {
    match &outcome.stop {
        SessionStop::Complete {
            grade,
            elapsed_seconds,
        } => format!(
            "interview complete: steps={} grade={} elapsed_seconds={}",
            outcome.steps_executed,
            grade.as_deref().unwrap_or("-"),
            elapsed_seconds.map_or_else(|| "-".to_string(), |secs| secs.to_string())
        ),
        SessionStop::AlreadyComplete => {
            "interview already complete (checkpoint is empty)".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Outcome;
    use crate::test_support::{answer_result, complete_result, fizzbuzz_question, starter_question};

    #[test]
    fn question_lists_rules_and_numbers() {
        let out = render_question(&fizzbuzz_question(vec![1, 2, 3]));
        assert!(out.contains("  Number: 3\tResponse: Fizz\n"));
        assert!(out.contains("  Number: 5\tResponse: Buzz\n"));
        assert!(out.contains("Numbers: [1 2 3]\n"));
    }

    #[test]
    fn starter_question_shows_no_rules() {
        let out = render_question(&starter_question());
        assert!(out.contains("Rules:\n  (none)\n"));
        assert!(out.contains("ExampleResponse: COBOL"));
    }

    #[test]
    fn result_includes_next_reference() {
        let out = render_result(&answer_result(
            Outcome::Correct,
            Some("/fizzbot/questions/abc"),
        ));
        assert!(out.starts_with("Result: correct\n"));
        assert!(out.contains("NextQuestion: /fizzbot/questions/abc"));
        assert!(!out.contains("Grade"));
    }

    #[test]
    fn complete_result_shows_grade() {
        let out = render_result(&complete_result("A+", 9));
        assert!(out.contains("Grade: A+"));
        assert!(out.contains("ElapsedSeconds: 9"));
    }

    #[test]
    fn final_step_marks_completion() {
        let line = render_step(&StepReport {
            stage_id: "q2".to_string(),
            answer: "1 2".to_string(),
            message: "done".to_string(),
            next_stage_id: String::new(),
        });
        assert_eq!(line, "stage=q2 answer=\"1 2\" next=(complete)");
    }

    #[test]
    fn outcome_summary() {
        let outcome = SessionOutcome {
            steps_executed: 3,
            stop: SessionStop::Complete {
                grade: Some("A".to_string()),
                elapsed_seconds: None,
            },
        };
        assert_eq!(
            render_outcome(&outcome),
            "interview complete: steps=3 grade=A elapsed_seconds=-"
        );
    }
}
