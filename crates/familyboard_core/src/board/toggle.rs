use crate::model::task::{Task, TaskId};

/// Returns `tasks` with `completed` inverted on the task whose id is `id`.
///
/// An unknown id leaves the collection unchanged.
pub fn toggle_completed(mut tasks: Vec<Task>, id: TaskId) -> Vec<Task> {
    if let Some(task) = tasks.iter_mut().find(|task| task.id == id) {
        task.completed = !task.completed;
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::toggle_completed;
    use crate::model::task::Task;

    fn tasks() -> Vec<Task> {
        (1..=3)
            .map(|id| Task {
                id,
                title: format!("task {id}"),
                notes: String::new(),
                category: "chores".to_string(),
                assignee: None,
                due_date: 0,
                completed: id == 2,
            })
            .collect()
    }

    #[test]
    fn flips_only_the_target() {
        let toggled = toggle_completed(tasks(), 1);
        let flags = toggled.iter().map(|task| task.completed).collect::<Vec<_>>();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        assert_eq!(toggle_completed(tasks(), 99), tasks());
    }

    #[test]
    fn double_toggle_is_identity() {
        for id in [1, 2, 3, 42] {
            assert_eq!(toggle_completed(toggle_completed(tasks(), id), id), tasks());
        }
    }
}
