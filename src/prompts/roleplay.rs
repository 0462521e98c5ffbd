//! Prompt builder for historical roleplay generation.
//!
//! The model is asked to stage a conversation set in a given year between a
//! curious thinker (the `user` turn) pitching an idea and a critical analyst
//! (the `assistant` turn) who critiques it with period knowledge only.

use crate::dataset::ScenarioRequest;

/// System and user prompts for one roleplay request.
#[derive(Debug, Clone)]
pub struct RoleplayPrompt {
    /// System prompt establishing the scenario and critique structure.
    pub system: String,
    /// User prompt with the concrete request and JSON shape.
    pub user: String,
}

/// Suffix appended to the system prompt in JSON mode.
pub const JSON_MODE_INSTRUCTION: &str =
    "\nYou must respond with a valid JSON object matching the format specified.";

/// Builds the prompt pair for `scenario`.
///
/// # Examples
///
/// ```
/// use hindsight_forge::dataset::{OutcomePolarity, ScenarioRequest};
/// use hindsight_forge::prompts::build_roleplay_prompt;
///
/// let scenario = ScenarioRequest::new("energy", 1880, OutcomePolarity::Positive);
/// let prompt = build_roleplay_prompt(&scenario);
/// assert!(prompt.system.contains("1880"));
/// assert!(prompt.user.contains("ultimately proved valid"));
/// ```
pub fn build_roleplay_prompt(scenario: &ScenarioRequest) -> RoleplayPrompt {
    let topic = &scenario.topic;
    let year = scenario.year;
    let (verdict, idea_fate) = if scenario.polarity.is_positive() {
        ("succeeded", "ultimately proved valid")
    } else {
        ("failed", "was later disproven")
    };

    let system = format!(
        r#"Create a direct conversation between a curious thinker (user) and a critical analyst (assistant) in {year} discussing {topic}.

Structure the response as a JSON object with:
- "user": The initial idea/question presented in period-appropriate language
- "assistant": The critical analysis responding directly to the user's points

The analysis should:
1. Address technical feasibility using {year} knowledge
2. Discuss practical implementation challenges
3. Compare with existing alternatives
4. Explain why the idea {verdict} historically

Use natural conversation style without titles or section headers.
Only reference knowledge available in {year}."#
    );

    let user = format!(
        r#"Create a conversation about {topic} in {year} where:
- User presents an idea that {idea_fate}
- Assistant provides a detailed critique using contemporary knowledge

Respond in this JSON format:
{{
    "user": "[idea presentation]",
    "assistant": "[critical analysis]"
}}"#
    );

    RoleplayPrompt { system, user }
}
