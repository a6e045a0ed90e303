use crate::model::task::Task;

/// Sentinel filter value that disables category filtering.
pub const ALL_FILTER: &str = "All";

/// Filter chips shown above the task list.
pub const DEFAULT_FILTER_CHIPS: &[&str] = &[ALL_FILTER, "Shopping", "Chores", "Reminders"];

/// Category filter selected on the task list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Matches a task category case-insensitively.
    Category(String),
}

impl CategoryFilter {
    /// Parses the UI filter string. Only the exact `"All"` is the sentinel.
    pub fn parse(value: &str) -> Self {
        if value == ALL_FILTER {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    /// Returns whether `task` passes this filter.
    ///
    /// A task without a category never matches a concrete filter.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Category(wanted) => {
                !task.category.is_empty() && task.category.to_lowercase() == wanted.to_lowercase()
            }
        }
    }
}

/// Returns the tasks that pass `filter`, preserving order.
pub fn filter_tasks(tasks: &[Task], filter: &CategoryFilter) -> Vec<Task> {
    match filter {
        CategoryFilter::All => tasks.to_vec(),
        concrete => tasks
            .iter()
            .filter(|task| concrete.matches(task))
            .cloned()
            .collect(),
    }
}
