//! Clutter tasks and the analysis result that carries them

use serde::{Deserialize, Serialize};

use super::Priority;

/// One actionable item identified in the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClutterTask {
    /// Short name of the object or pile
    pub item: String,

    /// Where it currently sits
    pub location: String,

    /// The observed issue
    pub problem: String,

    /// Recommended action
    pub suggestion: String,

    pub priority: Priority,

    /// Optional short product suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopping_recommendation: Option<String>,
}

impl ClutterTask {
    /// Check the text fields that must not be blank
    ///
    /// Returns the name of the first offending field (wire spelling).
    pub fn blank_field(&self) -> Option<&'static str> {
        [
            ("item", &self.item),
            ("location", &self.location),
            ("problem", &self.problem),
            ("suggestion", &self.suggestion),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// The complete structured output for one analyzed image
///
/// Built in one step by the response parser and never mutated afterwards.
/// `tasks` order is the presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Free-text overview of the room
    pub summary: String,

    /// Short headline / tone label
    pub vibe_check: String,

    /// Free-text duration estimate
    pub estimated_time: String,

    pub tasks: Vec<ClutterTask>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> ClutterTask {
        ClutterTask {
            item: "Cables".to_string(),
            location: "under desk".to_string(),
            problem: "tangled mess".to_string(),
            suggestion: "use a cable box".to_string(),
            priority: Priority::High,
            shopping_recommendation: Some("cable organizer".to_string()),
        }
    }

    #[test]
    fn test_blank_field_none_for_complete_task() {
        assert_eq!(task().blank_field(), None);
    }

    #[test]
    fn test_blank_field_reports_first_blank() {
        let mut t = task();
        t.problem = "   ".to_string();
        t.suggestion = String::new();
        assert_eq!(t.blank_field(), Some("problem"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(task()).unwrap();
        assert_eq!(json["shoppingRecommendation"], "cable organizer");
        assert_eq!(json["priority"], "High");

        let mut t = task();
        t.shopping_recommendation = None;
        let json = serde_json::to_value(t).unwrap();
        assert!(json.get("shoppingRecommendation").is_none());
    }

    #[test]
    fn test_missing_shopping_recommendation_is_none() {
        let json = r#"{"item":"Shoes","location":"hallway","problem":"pile","suggestion":"rack","priority":"Low"}"#;
        let t: ClutterTask = serde_json::from_str(json).unwrap();
        assert_eq!(t.shopping_recommendation, None);
    }
}
