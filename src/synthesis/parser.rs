//! Structured-text response parsing
//!
//! Reads `DECISION:` / `JUSTIFICATION:` markers out of a free-form
//! completion. Always yields a `Recommendation`.

use crate::models::{Decision, Recommendation};
use tracing::{debug, warn};

pub const DECISION_MARKER: &str = "DECISION:";
pub const JUSTIFICATION_MARKER: &str = "JUSTIFICATION:";

/// Chars of the raw response quoted back on a parse failure.
const FAILURE_EXCERPT_CHARS: usize = 200;

/// Where the decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisionSource {
    Marker,
    SoleMention,
    Default,
}

pub fn parse_recommendation(response: &str) -> Recommendation {
    if response.trim().is_empty() {
        return parse_failure(response);
    }

    let (decision, source) = match marker_remainder(response, DECISION_MARKER) {
        Some((token, _)) if token.is_empty() => return parse_failure(response),
        Some((token, _)) => (resolve_token(token), DecisionSource::Marker),
        None => match sole_mention(response) {
            Some(decision) => (decision, DecisionSource::SoleMention),
            None => (Decision::Monitor, DecisionSource::Default),
        },
    };

    let justification = match marker_remainder(response, JUSTIFICATION_MARKER) {
        Some((rest, _)) if !rest.is_empty() => rest.to_string(),
        Some((_, line_idx)) => following_paragraph(response, line_idx),
        None => trailing_sentences(response),
    };

    debug!(?source, decision = %decision, "Parsed synthesis response");

    Recommendation {
        decision,
        justification,
    }
}

/// Text after the first marker on the first line containing it, trimmed,
/// together with that line's index.
fn marker_remainder<'a>(response: &'a str, marker: &str) -> Option<(&'a str, usize)> {
    response.lines().enumerate().find_map(|(idx, line)| {
        line.find(marker)
            .map(|pos| (line[pos + marker.len()..].trim(), idx))
    })
}

/// The one decision word the text mentions (case-sensitive), if exactly one.
fn sole_mention(response: &str) -> Option<Decision> {
    let mentioned: Vec<Decision> = Decision::ALL
        .into_iter()
        .filter(|d| response.contains(d.as_str()))
        .collect();

    match mentioned.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Non-empty lines after `line_idx` up to the next blank line, joined by spaces.
fn following_paragraph(response: &str, line_idx: usize) -> String {
    response
        .lines()
        .skip(line_idx + 1)
        .map(str::trim)
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Last three `.`-separated pieces rejoined.
fn trailing_sentences(response: &str) -> String {
    let pieces: Vec<&str> = response.split('.').collect();
    let tail = &pieces[pieces.len().saturating_sub(3)..];
    tail.join(". ").trim().to_string()
}

/// Resolve a permissive decision token.
///
/// Quotes, brackets and emphasis are stripped and the first word is
/// matched case-insensitively. Anything else becomes `Monitor`.
pub fn resolve_token(token: &str) -> Decision {
    let word = token
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|w| !w.is_empty())
        .unwrap_or("");

    match Decision::from_word(word) {
        Some(decision) => decision,
        None => {
            warn!(token = %token, "Unrecognized decision token, defaulting to Monitor");
            Decision::Monitor
        }
    }
}

fn parse_failure(response: &str) -> Recommendation {
    warn!("Synthesis response could not be parsed");

    let excerpt: String = response.chars().take(FAILURE_EXCERPT_CHARS).collect();
    Recommendation {
        decision: Decision::Monitor,
        justification: format!(
            "Analysis completed but response parsing failed: {}...",
            excerpt
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_lines() {
        let rec = parse_recommendation(
            "Here is my view.\n\nDECISION: Invest\n\nJUSTIFICATION: Strong team. Good growth.\n",
        );
        assert_eq!(rec.decision, Decision::Invest);
        assert_eq!(rec.justification, "Strong team. Good growth.");
    }

    #[test]
    fn test_decision_marker_wins_over_mentions() {
        let rec = parse_recommendation(
            "We considered Pass and Monitor.\nDECISION: Invest\nJUSTIFICATION: ok",
        );
        assert_eq!(rec.decision, Decision::Invest);
    }

    #[test]
    fn test_decorated_tokens_resolve() {
        assert_eq!(resolve_token("**Invest**"), Decision::Invest);
        assert_eq!(resolve_token("[Pass]"), Decision::Pass);
        assert_eq!(resolve_token("\"monitor\"."), Decision::Monitor);
        assert_eq!(resolve_token("invest - strong conviction"), Decision::Invest);
    }

    #[test]
    fn test_unknown_token_is_monitor() {
        assert_eq!(resolve_token("Buy"), Decision::Monitor);
        let rec = parse_recommendation("DECISION: Hold\nJUSTIFICATION: unsure");
        assert_eq!(rec.decision, Decision::Monitor);
        assert_eq!(rec.justification, "unsure");
    }

    #[test]
    fn test_sole_mention_without_marker() {
        let rec = parse_recommendation("We would Pass on this one. Revenue is weak. Team is new.");
        assert_eq!(rec.decision, Decision::Pass);
    }

    #[test]
    fn test_multiple_or_no_mentions_default_to_monitor() {
        let both = parse_recommendation("Either Invest or Pass.");
        assert_eq!(both.decision, Decision::Monitor);

        let none = parse_recommendation("Interesting company. Hard to say. More data needed.");
        assert_eq!(none.decision, Decision::Monitor);
    }

    #[test]
    fn test_mentions_are_case_sensitive() {
        let rec = parse_recommendation("we might invest later.");
        assert_eq!(rec.decision, Decision::Monitor);
    }

    #[test]
    fn test_justification_from_trailing_sentences() {
        let rec = parse_recommendation("One. Two. Three. Four");
        assert_eq!(rec.justification, "Two.  Three.  Four");
    }

    #[test]
    fn test_empty_justification_takes_next_paragraph() {
        let rec = parse_recommendation(
            "DECISION: Monitor\nJUSTIFICATION:\n\nRevenue is early.\nTeam is strong.\n\nFooter",
        );
        assert_eq!(rec.decision, Decision::Monitor);
        assert_eq!(rec.justification, "Revenue is early. Team is strong.");
    }

    #[test]
    fn test_blank_response_is_parse_failure() {
        let rec = parse_recommendation("   \n ");
        assert_eq!(rec.decision, Decision::Monitor);
        assert!(rec
            .justification
            .starts_with("Analysis completed but response parsing failed:"));
    }

    #[test]
    fn test_empty_decision_token_is_parse_failure() {
        let long = format!("DECISION:\n{}", "x".repeat(500));
        let rec = parse_recommendation(&long);
        assert_eq!(rec.decision, Decision::Monitor);
        assert!(rec.justification.ends_with("..."));
        // prefix + 200 excerpt chars + ellipsis
        let prefix = "Analysis completed but response parsing failed: ";
        assert_eq!(rec.justification.chars().count(), prefix.len() + 200 + 3);
    }
}
