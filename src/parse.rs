//! Parsers for the free-text layouts the text API is asked to produce.
//!
//! Expected grammars:
//!
//! * Question lists: one question per line, each optionally prefixed with a
//!   `N. ` numeral; blank lines carry no meaning.
//! * Answer feedback: an assessment paragraph, then labeled sections in this
//!   order - `Strengths:`, `Areas for Improvement:`, optionally
//!   `Model Answer:`, and a `Score: <n>` line. Each section runs until the
//!   next known label. Section bodies are bulleted with `•`, `-`, `*` or
//!   `N.` markers and may carry `**` emphasis markup.
//!
//! Deviations degrade, they never throw: missing sections come back as empty
//! lists, a missing or malformed score comes back as 0, and a response with
//! no labels at all is treated as one big assessment paragraph.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s*").unwrap());
static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]+\s*").unwrap());
static SCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)score:[^0-9]*(\d+)").unwrap());

static STRENGTHS_LABEL: Lazy<Regex> = Lazy::new(|| label_regex("strength"));
static IMPROVEMENTS_LABEL: Lazy<Regex> = Lazy::new(|| label_regex("areas for improvement"));
static MODEL_ANSWER_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:model|suggested) answer:").unwrap());
static SCORE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)score:").unwrap());

fn label_regex(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){label}s?:")).unwrap()
}

/// Feedback fields extracted from one evaluation response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeedback {
    pub assessment: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub model_answer: Option<String>,
    /// 1-10 when a score line was found, 0 otherwise.
    pub score: u8,
}

/// Splits a numbered-list response into question texts. Count equals the
/// number of non-blank input lines; each line is trimmed and loses its
/// numeral prefix.
pub fn parse_question_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| NUMERAL_PREFIX.replace(line, "").trim().to_string())
        .collect()
}

/// Splits a section body into cleaned bullet items. Splitting happens on line
/// breaks and inline `•` markers; leading bullet or numeral markers and `**`
/// emphasis are stripped. Re-parsing already-cleaned text is a no-op.
pub fn parse_bullets(section: &str) -> Vec<String> {
    section
        .split(['\n', '•'])
        .map(|fragment| {
            let fragment = fragment.trim();
            let fragment = BULLET_PREFIX.replace(fragment, "");
            let fragment = NUMERAL_PREFIX.replace(&fragment, "");
            fragment.replace("**", "").trim().to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Extracts the score as the first integer following a `Score:` label,
/// clamped to [1,10]. Absent or malformed scores yield 0.
pub fn parse_score(text: &str) -> u8 {
    SCORE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(|score| score.clamp(1, 10) as u8)
        .unwrap_or(0)
}

/// Parses one evaluation response by ordered delimiter matching: each
/// section's content is everything up to the next known label.
pub fn parse_feedback(text: &str) -> ParsedFeedback {
    #[derive(Clone, Copy, PartialEq)]
    enum Label {
        Strengths,
        Improvements,
        ModelAnswer,
        Score,
    }

    let mut labels: Vec<(Label, usize, usize)> = [
        (Label::Strengths, &*STRENGTHS_LABEL),
        (Label::Improvements, &*IMPROVEMENTS_LABEL),
        (Label::ModelAnswer, &*MODEL_ANSWER_LABEL),
        (Label::Score, &*SCORE_LABEL),
    ]
    .iter()
    .filter_map(|(kind, re)| re.find(text).map(|m| (*kind, m.start(), m.end())))
    .collect();
    labels.sort_by_key(|(_, start, _)| *start);

    let assessment_end = labels.first().map(|(_, start, _)| *start).unwrap_or(text.len());
    let mut parsed = ParsedFeedback {
        assessment: text[..assessment_end].trim().to_string(),
        score: parse_score(text),
        ..Default::default()
    };

    for (index, (kind, _, body_start)) in labels.iter().enumerate() {
        let body_end = labels
            .get(index + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(text.len());
        let body = &text[*body_start..body_end];
        match kind {
            Label::Strengths => parsed.strengths = parse_bullets(body),
            Label::Improvements => parsed.improvements = parse_bullets(body),
            Label::ModelAnswer => {
                let answer = body.trim();
                if !answer.is_empty() {
                    parsed.model_answer = Some(answer.to_string());
                }
            }
            Label::Score => {}
        }
    }

    parsed
}
