//! Structured-output instruction and strict response parsing

use serde_json::{Value, json};
use tracing::debug;

use super::AnalysisError;
use crate::domain::{AnalysisResult, Priority};

/// Fixed instruction sent with every image
pub const ANALYSIS_PROMPT: &str = "You are a professional home organizer looking at a photo of a messy room. \
Identify the clutter and turn it into a short, prioritized clean-up plan. \
For each task name the item, where it currently is, what the problem is, and one concrete suggestion. \
Rate each task High, Medium or Low priority. \
Where a simple product (a bin, hooks, a drawer divider) would help, add a brief shopping recommendation; otherwise leave it out. \
Also give a one-paragraph summary of the room, a short upbeat vibe check headline, and an estimated total time.";

/// JSON schema for the analysis result
pub fn response_schema() -> Value {
    let priorities = Priority::ALL.map(|p| p.as_str());
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "vibeCheck": { "type": "string" },
            "estimatedTime": { "type": "string" },
            "tasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "item": { "type": "string" },
                        "location": { "type": "string" },
                        "problem": { "type": "string" },
                        "suggestion": { "type": "string" },
                        "priority": { "type": "string", "enum": priorities },
                        "shoppingRecommendation": { "type": "string" }
                    },
                    "required": ["item", "location", "problem", "suggestion", "priority"]
                }
            }
        },
        "required": ["summary", "vibeCheck", "estimatedTime", "tasks"]
    })
}

/// Output-format instruction sent next to the image
///
/// [`ANALYSIS_PROMPT`] travels separately as the system prompt.
pub fn instruction_with_schema() -> String {
    format!(
        "Respond with a single JSON object and nothing else. It must match this JSON schema:\n{}",
        response_schema()
    )
}

/// Validate raw model output into an [`AnalysisResult`]
///
/// All or nothing: any missing field, wrong type, blank task text or
/// unknown priority is a `MalformedResponse`.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    debug!(text_len = text.len(), "parse_analysis: called");
    let body = strip_code_fence(text);

    if body.is_empty() {
        return Err(AnalysisError::malformed("empty response"));
    }

    let result: AnalysisResult = serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "parse_analysis: schema mismatch");
        AnalysisError::malformed(e.to_string())
    })?;

    for (idx, task) in result.tasks.iter().enumerate() {
        if let Some(field) = task.blank_field() {
            debug!(idx, field, "parse_analysis: blank task field");
            return Err(AnalysisError::malformed(format!("tasks[{}].{} is empty", idx, field)));
        }
    }

    debug!(task_count = result.tasks.len(), "parse_analysis: ok");
    Ok(result)
}

/// Unwrap a ```json ... ``` fence if the model added one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    const VALID: &str = r#"{
        "summary": "A cozy bedroom with a few hotspots.",
        "vibeCheck": "Lived-in, not lost",
        "estimatedTime": "45 minutes",
        "tasks": [
            {"item": "Clothes", "location": "chair", "problem": "pile of worn clothes", "suggestion": "hang or hamper", "priority": "High", "shoppingRecommendation": "over-door hooks"},
            {"item": "Books", "location": "floor", "problem": "stacked by the bed", "suggestion": "return to the shelf", "priority": "Low"}
        ]
    }"#;

    #[test]
    fn test_parse_copies_verbatim() {
        let result = parse_analysis(VALID).unwrap();

        assert_eq!(result.summary, "A cozy bedroom with a few hotspots.");
        assert_eq!(result.vibe_check, "Lived-in, not lost");
        assert_eq!(result.estimated_time, "45 minutes");
        assert_eq!(result.tasks.len(), 2);
        assert_eq!(result.tasks[0].item, "Clothes");
        assert_eq!(result.tasks[0].problem, "pile of worn clothes");
        assert_eq!(result.tasks[0].priority, Priority::High);
        assert_eq!(result.tasks[0].shopping_recommendation.as_deref(), Some("over-door hooks"));
        assert_eq!(result.tasks[1].priority, Priority::Low);
        assert_eq!(result.tasks[1].shopping_recommendation, None);
    }

    #[test]
    fn test_parse_empty_task_list() {
        let result = parse_analysis(r#"{"summary":"Spotless","vibeCheck":"Zen","estimatedTime":"0 minutes","tasks":[]}"#)
            .unwrap();
        assert!(result.tasks.is_empty());
    }

    #[test]
    fn test_missing_priority_is_malformed() {
        let text = r#"{"summary":"s","vibeCheck":"v","estimatedTime":"t","tasks":[
            {"item":"Cups","location":"desk","problem":"dirty","suggestion":"wash"}]}"#;
        let err = parse_analysis(text).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(ref msg) if msg.contains("priority")));
    }

    #[test]
    fn test_unknown_priority_is_malformed() {
        for priority in ["Critical", "high", "URGENT", ""] {
            let text = format!(
                r#"{{"summary":"s","vibeCheck":"v","estimatedTime":"t","tasks":[
                {{"item":"Cups","location":"desk","problem":"dirty","suggestion":"wash","priority":"{}"}}]}}"#,
                priority
            );
            let err = parse_analysis(&text).unwrap_err();
            assert!(matches!(err, AnalysisError::MalformedResponse(_)), "priority {:?}", priority);
        }
    }

    #[test]
    fn test_missing_top_level_field_is_malformed() {
        let err = parse_analysis(r#"{"summary":"s","estimatedTime":"t","tasks":[]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(ref msg) if msg.contains("vibeCheck")));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err = parse_analysis(r#"{"summary":"s","vibeCheck":"v","estimatedTime":45,"tasks":[]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));

        let err = parse_analysis(r#"{"summary":"s","vibeCheck":"v","estimatedTime":"t","tasks":{}}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_blank_task_text_is_malformed() {
        let text = r#"{"summary":"s","vibeCheck":"v","estimatedTime":"t","tasks":[
            {"item":"Cups","location":"  ","problem":"dirty","suggestion":"wash","priority":"Medium"}]}"#;
        let err = parse_analysis(text).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(ref msg) if msg == "tasks[0].location is empty"));
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            parse_analysis("I'm sorry, I can't see an image."),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(matches!(parse_analysis("   "), Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn test_null_shopping_recommendation_and_extra_keys() {
        let text = r#"{"summary":"s","vibeCheck":"v","estimatedTime":"t","mood":"calm","tasks":[
            {"item":"Cups","location":"desk","problem":"dirty","suggestion":"wash","priority":"Medium","shoppingRecommendation":null,"confidence":0.9}]}"#;
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.tasks[0].shopping_recommendation, None);
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(parse_analysis(&fenced).unwrap(), parse_analysis(VALID).unwrap());

        let bare_fence = format!("```\n{}\n```\n", VALID);
        assert_eq!(parse_analysis(&bare_fence).unwrap().tasks.len(), 2);
    }

    #[test]
    fn test_schema_lists_priorities() {
        let schema = response_schema();
        let priorities = &schema["properties"]["tasks"]["items"]["properties"]["priority"]["enum"];
        assert_eq!(priorities, &json!(["High", "Medium", "Low"]));
        assert!(instruction_with_schema().contains("vibeCheck"));
    }

    #[test]
    fn test_instruction_does_not_repeat_prompt() {
        let instruction = instruction_with_schema();
        assert!(!instruction.contains(ANALYSIS_PROMPT));
        assert!(instruction.starts_with("Respond with a single JSON object"));
    }
}
