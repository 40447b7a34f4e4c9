/// Derived counters and completion rates
///
/// None of these values are persisted; they are computed from store counts on
/// demand.

use serde::{Deserialize, Serialize};

/// Computes `completed / total * 100`, or `0.0` when there is nothing to complete
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (completed as f64 / total as f64) * 100.0
}

/// Task totals for a project or a set of projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    /// All tasks
    pub total: i64,

    /// Tasks with status DONE
    pub completed: i64,
}

impl TaskCounts {
    /// Percentage of completed tasks
    pub fn completion_rate(&self) -> f64 {
        completion_rate(self.completed, self.total)
    }
}

/// Project totals by status for a set of projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCounts {
    /// All projects
    pub total: i64,

    /// Projects with status ACTIVE
    pub active: i64,

    /// Projects with status COMPLETED
    pub completed: i64,
}

/// Aggregate statistics over a scoped set of projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub overall_completion_rate: f64,
}

impl ProjectStats {
    /// Combines project and task counts for the same scope
    pub fn from_counts(projects: ProjectCounts, tasks: TaskCounts) -> Self {
        Self {
            total_projects: projects.total,
            active_projects: projects.active,
            completed_projects: projects.completed,
            total_tasks: tasks.total,
            completed_tasks: tasks.completed,
            overall_completion_rate: tasks.completion_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_rate_zero_tasks() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(TaskCounts::default().completion_rate(), 0.0);
    }

    #[test]
    fn test_completion_rate_half() {
        let counts = TaskCounts { total: 4, completed: 2 };
        assert_eq!(counts.completion_rate(), 50.0);
    }

    #[test]
    fn test_completion_rate_all_done() {
        assert_eq!(completion_rate(3, 3), 100.0);
    }

    #[test]
    fn test_project_stats_from_counts() {
        let stats = ProjectStats::from_counts(
            ProjectCounts { total: 3, active: 2, completed: 1 },
            TaskCounts { total: 0, completed: 0 },
        );
        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.active_projects, 2);
        assert_eq!(stats.completed_projects, 1);
        assert_eq!(stats.overall_completion_rate, 0.0);
    }
}
