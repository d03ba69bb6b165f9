//! Query engine: derived, read-only views over the record list.
//!
//! A query runs in a fixed order: status filter, then text search, then a
//! stable sort. Nothing here mutates the records it is given.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::{Error, Result};
use crate::models::{ApplicationRecord, Status};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(&self, status: &Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// All -> Applied -> Interviewing -> Accepted -> Rejected -> All
    pub fn next(&self) -> Self {
        let position = match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Status::KNOWN.iter().position(|s| s == status),
        };
        let next = match position {
            None => 0,
            Some(i) => i + 1,
        };
        match Status::KNOWN.get(next) {
            Some(status) => StatusFilter::Only(status.clone()),
            None => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    DateApplied,
    CompanyName,
    Status,
    Priority,
}

impl SortField {
    pub fn next(self) -> Self {
        match self {
            SortField::DateApplied => SortField::CompanyName,
            SortField::CompanyName => SortField::Status,
            SortField::Status => SortField::Priority,
            SortField::Priority => SortField::DateApplied,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::DateApplied => "Date",
            SortField::CompanyName => "Company",
            SortField::Status => "Status",
            SortField::Priority => "Priority",
        }
    }

    fn key(self, record: &ApplicationRecord) -> &str {
        let details = &record.details;
        match self {
            SortField::DateApplied => &details.date_applied,
            SortField::CompanyName => &details.company_name,
            SortField::Status => details.status.as_str(),
            SortField::Priority => details.priority.as_str(),
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "dateapplied" | "date-applied" => Ok(SortField::DateApplied),
            "company" | "companyname" | "company-name" => Ok(SortField::CompanyName),
            "status" => Ok(SortField::Status),
            "priority" => Ok(SortField::Priority),
            _ => Err(Error::invalid("sort field", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// What to show and in which order. Defaults to every status, newest
/// application first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub status_filter: StatusFilter,
    pub search_text: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Query {
    pub fn run<'a>(&self, records: &'a [ApplicationRecord]) -> Vec<&'a ApplicationRecord> {
        run(records, self)
    }
}

pub fn run<'a>(records: &'a [ApplicationRecord], query: &Query) -> Vec<&'a ApplicationRecord> {
    let needle = query.search_text.to_lowercase();

    let mut results: Vec<&ApplicationRecord> = records
        .iter()
        .filter(|r| query.status_filter.matches(&r.details.status))
        .filter(|r| {
            needle.is_empty()
                || r.details.company_name.to_lowercase().contains(&needle)
                || r.details.role.to_lowercase().contains(&needle)
        })
        .collect();

    // `sort_by` is stable; reversing the comparator (not the output) keeps
    // ties in insertion order for both directions.
    results.sort_by(|a, b| {
        let ord = locale_cmp(query.sort_field.key(a), query.sort_field.key(b));
        match query.sort_direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    results
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub status: Status,
    pub records: Vec<&'a ApplicationRecord>,
}

/// Kanban grouping of a query result: one column per known status. Records
/// with an unrecognized status only show up in the table view.
pub fn board<'a>(records: &'a [ApplicationRecord], query: &Query) -> Vec<BoardColumn<'a>> {
    let visible = run(records, query);
    Status::KNOWN
        .into_iter()
        .map(|status| BoardColumn {
            records: visible
                .iter()
                .copied()
                .filter(|r| r.details.status == status)
                .collect(),
            status,
        })
        .collect()
}

/// Collation-style ordering: base letters first (accents and case
/// ignored, punctuation before digits before letters), then accents, then
/// case with lowercase first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| accent_key(a).cmp(accent_key(b)))
        .then_with(|| case_cmp(a, b))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| {
            let class = if c.is_alphabetic() {
                2
            } else if c.is_numeric() {
                1
            } else {
                0
            };
            (class, c)
        })
}

fn accent_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_cmp(a: &str, b: &str) -> Ordering {
    for (x, y) in a.nfd().zip(b.nfd()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            };
        }
    }
    Ordering::Equal
}
