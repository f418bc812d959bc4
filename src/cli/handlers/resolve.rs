use crate::model::task::{Collection, Task, TaskId};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no {collection} task matches '{reference}'")]
    NotFound {
        reference: String,
        collection: Collection,
    },
    #[error("'{reference}' matches {count} {collection} tasks; use more of the id")]
    Ambiguous {
        reference: String,
        collection: Collection,
        count: usize,
    },
}

/// Turn a command-line task reference into an id from `tasks`.
///
/// Tried in order: exact id, 1-based position (numbers up to the list
/// length), unique id prefix.
pub fn resolve_task(
    tasks: &[Task],
    reference: &str,
    collection: Collection,
) -> Result<TaskId, ResolveError> {
    let reference = reference.trim();

    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == reference) {
        return Ok(task.id.clone());
    }

    if let Ok(position) = reference.parse::<usize>()
        && (1..=tasks.len()).contains(&position)
    {
        return Ok(tasks[position - 1].id.clone());
    }

    let matches: Vec<&Task> = if reference.is_empty() {
        Vec::new()
    } else {
        tasks
            .iter()
            .filter(|t| t.id.as_str().starts_with(reference))
            .collect()
    };
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => Err(ResolveError::NotFound {
            reference: reference.to_string(),
            collection,
        }),
        many => Err(ResolveError::Ambiguous {
            reference: reference.to_string(),
            collection,
            count: many.len(),
        }),
    }
}
