//! The three prompt shapes sent to the text API. Blank form fields degrade to
//! generic wording rather than failing; the response formats these prompts
//! ask for are what `crate::parse` expects back.

use crate::models::FeedbackItem;

/// How many questions one generation call asks for.
pub const QUESTIONS_PER_BATCH: usize = 10;

/// Numbered-list question generation for one job profile.
pub fn question_list(
    job_title: &str,
    experience_level: &str,
    interview_type: &str,
    industry: &str,
    job_description: Option<&str>,
) -> String {
    let level = if experience_level.is_empty() {
        "any"
    } else {
        experience_level
    };
    let industry = if industry.is_empty() {
        "general"
    } else {
        industry
    };

    let mut prompt = format!(
        "Generate {QUESTIONS_PER_BATCH} interview questions based on the {interview_type} \
         for a {job_title} at {level} level in the {industry} industry."
    );
    if let Some(description) = job_description.filter(|d| !d.trim().is_empty()) {
        prompt.push_str(&format!(" Job description: {description}."));
    }
    prompt.push_str(&format!(
        " Only output the {QUESTIONS_PER_BATCH} questions as a numbered list without any \
         additional text."
    ));
    prompt
}

/// Per-answer evaluation. The labeled sections requested here are the grammar
/// `crate::parse::parse_feedback` consumes.
pub fn answer_feedback(question: &str, transcript: &str, job_title: &str) -> String {
    format!(
        "Please evaluate this answer for a {job_title} interview:\n\n\
         Question: {question}\n\n\
         Answer: {transcript}\n\n\
         Provide detailed feedback on the response including:\n\
         1. Overall assessment\n\
         2. 2-3 specific strengths, as a bulleted list under the heading \"Strengths:\"\n\
         3. 2-3 areas for improvement with actionable suggestions, as a bulleted list \
         under the heading \"Areas for Improvement:\"\n\
         4. Optionally a concise model answer under the heading \"Model Answer:\"\n\
         5. A final line \"Score: <number>\" with a score from 1-10"
    )
}

/// Holistic whole-interview assessment over every answered question.
pub fn overall_feedback(items: &[FeedbackItem], job_title: &str) -> String {
    let questions_and_answers: String = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "Question {}: {}\nAnswer: {}\n",
                index + 1,
                item.question,
                item.transcript
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Please provide overall feedback for a mock interview for a {job_title} position.\n\
         Here are all the questions and answers:\n\n\
         {questions_and_answers}\n\
         Give comprehensive feedback on the entire interview performance, highlighting \
         patterns, overall strengths and weaknesses, and concrete suggestions for \
         improvement. Respond with one short paragraph."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_degrade_to_generic_wording() {
        let prompt = question_list("Backend Engineer", "", "technical", "", None);
        assert!(prompt.contains("at any level"));
        assert!(prompt.contains("general industry"));
        assert!(prompt.contains("Backend Engineer"));
        assert!(!prompt.contains("Job description"));
    }

    #[test]
    fn description_is_embedded_when_present() {
        let prompt = question_list(
            "Backend Engineer",
            "senior",
            "technical",
            "fintech",
            Some("Owns the payments ledger"),
        );
        assert!(prompt.contains("Owns the payments ledger"));
        assert!(prompt.contains("senior level"));
    }

    #[test]
    fn overall_prompt_numbers_every_answer() {
        let items: Vec<FeedbackItem> = (0..2)
            .map(|i| FeedbackItem {
                question_id: format!("s-{i}"),
                question: format!("Q{i}"),
                transcript: format!("A{i}"),
                feedback: String::new(),
                strengths: vec![],
                improvements: vec![],
                score: 0,
                model_answer: None,
            })
            .collect();
        let prompt = overall_feedback(&items, "Backend Engineer");
        assert!(prompt.contains("Question 1: Q0"));
        assert!(prompt.contains("Question 2: Q1"));
        assert!(prompt.contains("Answer: A1"));
    }
}
