//! Entity kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a registrable definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A unit of work
    Task,
    /// A composition of tasks, sub-workflows and launch plans
    Workflow,
    /// A scheduled invocation of a workflow
    LaunchPlan,
}

impl EntityKind {
    /// All kinds, in registration-friendly order
    pub const ALL: [EntityKind; 3] = [EntityKind::Task, EntityKind::Workflow, EntityKind::LaunchPlan];

    /// Short machine-friendly name, also used as the registry resource type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::Workflow => "workflow",
            EntityKind::LaunchPlan => "launch_plan",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Task => write!(f, "task"),
            EntityKind::Workflow => write!(f, "workflow"),
            EntityKind::LaunchPlan => write!(f, "launch plan"),
        }
    }
}

/// Error returned when a string names no entity kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity kind: '{0}' (expected task, workflow or launch_plan)")]
pub struct ParseKindError(pub String);

impl FromStr for EntityKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" | "tasks" => Ok(EntityKind::Task),
            "workflow" | "workflows" => Ok(EntityKind::Workflow),
            "launch_plan" | "launch-plan" | "launchplan" | "launch_plans" => {
                Ok(EntityKind::LaunchPlan)
            }
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!("task".parse::<EntityKind>().unwrap(), EntityKind::Task);
        assert_eq!("Workflow".parse::<EntityKind>().unwrap(), EntityKind::Workflow);
        assert_eq!(
            "launch-plan".parse::<EntityKind>().unwrap(),
            EntityKind::LaunchPlan
        );
        assert_eq!(
            "LAUNCHPLAN".parse::<EntityKind>().unwrap(),
            EntityKind::LaunchPlan
        );
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "schedule".parse::<EntityKind>().unwrap_err();
        assert_eq!(err, ParseKindError("schedule".into()));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(EntityKind::LaunchPlan.to_string(), "launch plan");
        assert_eq!(EntityKind::LaunchPlan.as_str(), "launch_plan");
        let json = serde_json::to_string(&EntityKind::LaunchPlan).unwrap();
        assert_eq!(json, "\"launch_plan\"");
        let back: EntityKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EntityKind::LaunchPlan);
    }
}
