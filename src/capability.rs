//! Capability keys.
//!
//! A capability names one action on one resource type. Keys are flat:
//! holding `edit_goal` says nothing about `create_goal`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PlanPulseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreateGoal,
    EditGoal,
    DeleteGoal,
    CreateInitiative,
    EditInitiative,
    DeleteInitiative,
    CreateFeature,
    EditFeature,
    DeleteFeature,
    CreateRelease,
    EditRelease,
    DeleteRelease,
    CreateEpic,
    EditEpic,
    DeleteEpic,
    CreateTask,
    EditTask,
    DeleteTask,
    CreateFeedback,
    EditFeedback,
    DeleteFeedback,
    ViewRoadmap,
    ViewAnalytics,
    ViewFeedback,
    ManageUsers,
    AdminAccess,
}

impl Capability {
    pub const ALL: [Capability; 26] = [
        Capability::CreateGoal,
        Capability::EditGoal,
        Capability::DeleteGoal,
        Capability::CreateInitiative,
        Capability::EditInitiative,
        Capability::DeleteInitiative,
        Capability::CreateFeature,
        Capability::EditFeature,
        Capability::DeleteFeature,
        Capability::CreateRelease,
        Capability::EditRelease,
        Capability::DeleteRelease,
        Capability::CreateEpic,
        Capability::EditEpic,
        Capability::DeleteEpic,
        Capability::CreateTask,
        Capability::EditTask,
        Capability::DeleteTask,
        Capability::CreateFeedback,
        Capability::EditFeedback,
        Capability::DeleteFeedback,
        Capability::ViewRoadmap,
        Capability::ViewAnalytics,
        Capability::ViewFeedback,
        Capability::ManageUsers,
        Capability::AdminAccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CreateGoal => "create_goal",
            Capability::EditGoal => "edit_goal",
            Capability::DeleteGoal => "delete_goal",
            Capability::CreateInitiative => "create_initiative",
            Capability::EditInitiative => "edit_initiative",
            Capability::DeleteInitiative => "delete_initiative",
            Capability::CreateFeature => "create_feature",
            Capability::EditFeature => "edit_feature",
            Capability::DeleteFeature => "delete_feature",
            Capability::CreateRelease => "create_release",
            Capability::EditRelease => "edit_release",
            Capability::DeleteRelease => "delete_release",
            Capability::CreateEpic => "create_epic",
            Capability::EditEpic => "edit_epic",
            Capability::DeleteEpic => "delete_epic",
            Capability::CreateTask => "create_task",
            Capability::EditTask => "edit_task",
            Capability::DeleteTask => "delete_task",
            Capability::CreateFeedback => "create_feedback",
            Capability::EditFeedback => "edit_feedback",
            Capability::DeleteFeedback => "delete_feedback",
            Capability::ViewRoadmap => "view_roadmap",
            Capability::ViewAnalytics => "view_analytics",
            Capability::ViewFeedback => "view_feedback",
            Capability::ManageUsers => "manage_users",
            Capability::AdminAccess => "admin_access",
        }
    }
}

impl FromStr for Capability {
    type Err = PlanPulseError;

    /// Exact match on the key. No trimming or case folding.
    fn from_str(input: &str) -> Result<Capability, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == input)
            .ok_or_else(|| PlanPulseError::unknown_capability(input))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
