//! Savings goals track money put aside for something specific.

mod core;
mod handlers;

pub use core::{
    Goal, GoalForm, GoalId, GoalProgress, NewGoal, contribute_to_goal, count_active_goals,
    create_goal, delete_goal, get_goal, get_goals, update_goal,
};
pub use handlers::{
    contribute_to_goal_endpoint, create_goal_endpoint, delete_goal_endpoint, get_goal_endpoint,
    list_goals_endpoint, update_goal_endpoint,
};
