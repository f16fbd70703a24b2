use std::cmp::Ordering;

use serde::Deserialize;

use crate::domain::Donor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorColumn {
    #[default]
    Name,
    Email,
    Type,
    Status,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Column sort of the donor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct SortState {
    pub column: DonorColumn,
    pub direction: SortDirection,
}

impl SortState {
    /// Selecting the sorted column again flips direction; another column starts ascending
    pub fn toggle(self, column: DonorColumn) -> Self {
        if self.column == column {
            Self {
                column,
                direction: self.direction.flip(),
            }
        } else {
            Self {
                column,
                direction: SortDirection::Asc,
            }
        }
    }

    fn compare(&self, a: &Donor, b: &Donor) -> Ordering {
        let ordering = match self.column {
            DonorColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            DonorColumn::Email => lowercase(&a.email).cmp(&lowercase(&b.email)),
            DonorColumn::Type => a.donor_type.as_str().cmp(b.donor_type.as_str()),
            DonorColumn::Status => a.status.as_str().cmp(b.status.as_str()),
            DonorColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

fn lowercase(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::to_lowercase)
}

/// Search and sort applied to the donor list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorQuery {
    pub search: String,
    pub sort: SortState,
}

impl DonorQuery {
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    pub fn with_sort(self, sort: SortState) -> Self {
        Self { sort, ..self }
    }

    /// Sort by `column` as if its header were clicked
    pub fn sorted_by(self, column: DonorColumn) -> Self {
        Self {
            sort: self.sort.toggle(column),
            ..self
        }
    }

    /// Donors matching the search, in sort order
    pub fn apply(&self, donors: Vec<Donor>) -> Vec<Donor> {
        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<Donor> = donors
            .into_iter()
            .filter(|d| needle.is_empty() || d.matches(&needle))
            .collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}
