//! Result presentation
//!
//! Pure mapping from an [`AnalysisResult`] to what the views draw. Shared by
//! the TUI and the headless `scan` output so both show the same cards.

mod tips;

pub use tips::{MAINTENANCE_TIPS, Tip};

use crate::domain::{AnalysisResult, Priority};

/// Color family for a priority badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Rose,
    Amber,
    Emerald,
}

/// Visual priority indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityBadge {
    pub priority: Priority,
    pub tone: BadgeTone,
}

impl PriorityBadge {
    pub fn new(priority: Priority) -> Self {
        let tone = match priority {
            Priority::High => BadgeTone::Rose,
            Priority::Medium => BadgeTone::Amber,
            Priority::Low => BadgeTone::Emerald,
        };
        Self { priority, tone }
    }

    /// e.g. "High Priority"
    pub fn label(&self) -> String {
        format!("{} Priority", self.priority)
    }
}

/// One rendered clutter task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    /// 1-based position in the result
    pub index: usize,
    pub badge: PriorityBadge,
    pub item: String,
    pub location: String,
    pub problem: String,
    pub suggestion: String,
    /// Present only for a non-blank shopping recommendation
    pub shopping_tip: Option<String>,
}

impl TaskCard {
    /// e.g. "#1"
    pub fn number(&self) -> String {
        format!("#{}", self.index)
    }
}

/// Header block of the Result view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultHeadline {
    pub vibe_check: String,
    pub summary: String,
    pub estimated_time: String,
    pub task_count: usize,
}

/// Map every task to a card, preserving order
pub fn present(result: &AnalysisResult) -> Vec<TaskCard> {
    result
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| TaskCard {
            index: idx + 1,
            badge: PriorityBadge::new(task.priority),
            item: task.item.clone(),
            location: task.location.clone(),
            problem: task.problem.clone(),
            suggestion: task.suggestion.clone(),
            shopping_tip: task
                .shopping_recommendation
                .as_deref()
                .map(str::trim)
                .filter(|tip| !tip.is_empty())
                .map(str::to_string),
        })
        .collect()
}

pub fn headline(result: &AnalysisResult) -> ResultHeadline {
    ResultHeadline {
        vibe_check: result.vibe_check.clone(),
        summary: result.summary.clone(),
        estimated_time: result.estimated_time.clone(),
        task_count: result.tasks.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClutterTask;

    fn task(item: &str, priority: Priority, tip: Option<&str>) -> ClutterTask {
        ClutterTask {
            item: item.to_string(),
            location: "floor".to_string(),
            problem: "in the way".to_string(),
            suggestion: "put it away".to_string(),
            priority,
            shopping_recommendation: tip.map(str::to_string),
        }
    }

    fn result(tasks: Vec<ClutterTask>) -> AnalysisResult {
        AnalysisResult {
            summary: "Summary".to_string(),
            vibe_check: "Vibe".to_string(),
            estimated_time: "30 minutes".to_string(),
            tasks,
        }
    }

    #[test]
    fn test_order_preserved() {
        let cards = present(&result(vec![
            task("Shoes", Priority::Low, None),
            task("Laundry", Priority::High, None),
        ]));

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].index, 1);
        assert_eq!(cards[0].badge.priority, Priority::Low);
        assert_eq!(cards[0].item, "Shoes");
        assert_eq!(cards[1].index, 2);
        assert_eq!(cards[1].badge.priority, Priority::High);
        assert_eq!(cards[1].number(), "#2");
    }

    #[test]
    fn test_badges() {
        assert_eq!(PriorityBadge::new(Priority::High).tone, BadgeTone::Rose);
        assert_eq!(PriorityBadge::new(Priority::Medium).tone, BadgeTone::Amber);
        assert_eq!(PriorityBadge::new(Priority::Low).tone, BadgeTone::Emerald);
        assert_eq!(PriorityBadge::new(Priority::Medium).label(), "Medium Priority");
    }

    #[test]
    fn test_shopping_tip_only_when_non_blank() {
        let cards = present(&result(vec![
            task("Cables", Priority::High, Some("cable box")),
            task("Mail", Priority::Medium, Some("   ")),
            task("Books", Priority::Low, Some("")),
            task("Cups", Priority::Low, None),
        ]));

        assert_eq!(cards[0].shopping_tip.as_deref(), Some("cable box"));
        assert_eq!(cards[1].shopping_tip, None);
        assert_eq!(cards[2].shopping_tip, None);
        assert_eq!(cards[3].shopping_tip, None);
    }

    #[test]
    fn test_empty_result() {
        let r = result(vec![]);
        assert!(present(&r).is_empty());
        assert_eq!(headline(&r).task_count, 0);
    }

    #[test]
    fn test_headline() {
        let h = headline(&result(vec![task("Shoes", Priority::Low, None)]));
        assert_eq!(h.vibe_check, "Vibe");
        assert_eq!(h.estimated_time, "30 minutes");
        assert_eq!(h.task_count, 1);
    }
}
