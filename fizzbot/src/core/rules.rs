//! FizzBuzz rule evaluation.

use crate::core::types::Rule;

/// Answer submitted for the rule-less starter question.
pub const STARTER_ANSWER: &str = "go";

/// Render `number` through `rules`.
///
/// Every rule whose divisor evenly divides `number` contributes its text, in
/// list order. Rules with a divisor `<= 0` never match. With no match the
/// result is the decimal numeral.
pub fn evaluate(number: i64, rules: &[Rule]) -> String {
    let token: String = rules
        .iter()
        .filter(|rule| rule.divisor > 0 && number % rule.divisor == 0)
        .map(|rule| rule.text.as_str())
        .collect();
    if token.is_empty() {
        return number.to_string();
    }
    token
}

/// Evaluate each number and join the tokens with a single space.
///
/// An empty `numbers` list is the starter question and yields [`STARTER_ANSWER`].
pub fn solve(numbers: &[i64], rules: &[Rule]) -> String {
    if numbers.is_empty() {
        return STARTER_ANSWER.to_string();
    }
    numbers
        .iter()
        .map(|&number| evaluate(number, rules))
        .collect::<Vec<_>>()
        .join(" ")
}
