//! Translation of user search syntax into PostgreSQL `tsquery` text.
//!
//! Supported input syntax:
//!
//! | Input | Output |
//! |-------|--------|
//! | `a AND b` | `a&b` |
//! | `a OR b` | `a\|b` |
//! | `a NOT b` | `a!b` |
//! | `"a b c"` | `a<->b<->c` |
//! | `lamb*` | `lamb:*` |
//! | `a b` | `a&b` |
//!
//! Keywords are case-insensitive and only match whole words. The output is
//! not validated; a malformed result is rejected by Postgres at query time.

use once_cell::sync::Lazy;
use regex::Regex;

static PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));
static AND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bAND\b").expect("valid regex"));
static OR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bOR\b").expect("valid regex"));
static NOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNOT\b").expect("valid regex"));
static WILDCARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\*").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(&|\||!|<->)\s*").expect("valid regex"));

/// Translate a search query into `tsquery` syntax.
///
/// Total over all inputs. Non-blank input always yields non-empty output.
pub fn translate(query: &str) -> String {
    // Phrases: "aws lambda" -> aws <-> lambda
    let q = PHRASE.replace_all(query, |caps: &regex::Captures| {
        caps[1]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" <-> ")
    });

    let q = AND.replace_all(&q, " & ");
    let q = OR.replace_all(&q, " | ");
    let q = NOT.replace_all(&q, " !");
    let q = WILDCARD.replace_all(&q, "$1:*");

    let q = WHITESPACE.replace_all(&q, " ");
    let q = OPERATOR.replace_all(&q, "$1");
    let q = q.trim();

    if has_boolean_operator(q) {
        return q.to_string();
    }

    // No explicit operator: every remaining term is required.
    q.split_whitespace().collect::<Vec<_>>().join("&")
}

fn has_boolean_operator(q: &str) -> bool {
    q.contains('&') || q.contains('|') || q.contains('!')
}
