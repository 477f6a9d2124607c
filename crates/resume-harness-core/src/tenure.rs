//! Tenure calculation from free-text duration strings.
//!
//! Durations are expected as `"MM/YYYY - MM/YYYY"` or `"MM/YYYY - present"`
//! (a bare `YYYY` is accepted on either side, as are en and em dashes).
//! Anything else is a [`TenureError::ParseFailure`] for the whole request.

use std::str::FromStr;

use serde::Serialize;

use crate::error::TenureError;
use crate::models::ResumeDocument;

/// Company names that are placeholders rather than employers.
pub const DEFAULT_PLACEHOLDER_COMPANIES: &[&str] = &["Beander"];

/// End of a duration range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Present,
    Year(i32),
}

/// A parsed `start - end` duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    pub start_year: i32,
    pub end: RangeEnd,
}

impl FromStr for DurationRange {
    type Err = TenureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| TenureError::ParseFailure {
            duration: s.to_string(),
            reason,
        };

        let (start, end) = s
            .split_once(['-', '–', '—'])
            .ok_or_else(|| fail("expected a `start - end` range"))?;

        let start_year = parse_year(start.trim()).ok_or_else(|| fail("start is not MM/YYYY"))?;

        let end = end.trim();
        let end = if end.to_lowercase().contains("present") {
            RangeEnd::Present
        } else {
            RangeEnd::Year(parse_year(end).ok_or_else(|| fail("end is neither MM/YYYY nor present"))?)
        };

        Ok(Self { start_year, end })
    }
}

/// Trailing four-digit year of `MM/YYYY` or `YYYY`.
fn parse_year(part: &str) -> Option<i32> {
    let year = part.rsplit('/').next()?.trim();
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CareerStep {
    pub title: String,
    pub company: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TenureSummary {
    pub total_years: i32,
    pub companies_worked: usize,
    pub roles_held: usize,
    pub current_role: String,
    pub current_company: String,
    pub career_progression: Vec<CareerStep>,
}

/// Total years from the earliest role's start to the most recent role's end
/// (or `current_year` when that role is ongoing).
pub fn calculate_total_experience(
    doc: &ResumeDocument,
    current_year: i32,
    placeholder_companies: &[String],
) -> Result<TenureSummary, TenureError> {
    let (Some(latest), Some(earliest)) = (doc.current_role(), doc.earliest_role()) else {
        return Err(TenureError::NoExperience);
    };

    let earliest_year = earliest.duration.parse::<DurationRange>()?.start_year;

    let total_years = if latest.duration.to_lowercase().contains("present") {
        current_year - earliest_year
    } else {
        match latest.duration.parse::<DurationRange>()?.end {
            RangeEnd::Year(y) => y - earliest_year,
            RangeEnd::Present => current_year - earliest_year,
        }
    };

    let companies_worked = doc
        .experience
        .iter()
        .filter(|e| !placeholder_companies.iter().any(|p| *p == e.company))
        .count();

    Ok(TenureSummary {
        total_years,
        companies_worked,
        roles_held: doc.experience.len(),
        current_role: latest.title.clone(),
        current_company: latest.company.clone(),
        career_progression: doc
            .experience
            .iter()
            .map(|e| CareerStep {
                title: e.title.clone(),
                company: e.company.clone(),
            })
            .collect(),
    })
}

pub fn default_placeholders() -> Vec<String> {
    DEFAULT_PLACEHOLDER_COMPANIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
