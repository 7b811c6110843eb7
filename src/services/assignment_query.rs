use std::cmp::Ordering;

use serde::Deserialize;

use crate::models::{Assignment, AssignmentStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Deadline,
    Priority,
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filter, search and sort options for assignment listings.
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub status: Option<AssignmentStatus>,
    pub course_id: Option<String>,
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub order: SortOrder,
}

impl AssignmentQuery {
    pub fn apply(&self, assignments: Vec<Assignment>) -> Vec<Assignment> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut filtered: Vec<Assignment> = assignments
            .into_iter()
            .filter(|a| self.status.is_none_or(|s| a.status == s))
            .filter(|a| {
                self.course_id
                    .as_deref()
                    .is_none_or(|id| a.course_id.as_deref() == Some(id))
            })
            .filter(|a| needle.as_deref().is_none_or(|q| matches_search(a, q)))
            .collect();

        filtered.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        filtered
    }

    fn compare(&self, a: &Assignment, b: &Assignment) -> Ordering {
        match self.sort_by {
            SortBy::Deadline => a.deadline.cmp(&b.deadline),
            SortBy::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            SortBy::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

fn matches_search(assignment: &Assignment, needle: &str) -> bool {
    assignment.title.to_lowercase().contains(needle)
        || assignment
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}
