//! Trip request: the form fields a plan is generated from

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Shortest trip the planner accepts, in days
pub const MIN_DURATION_DAYS: u32 = 1;

/// Longest trip the planner accepts, in days
pub const MAX_DURATION_DAYS: u32 = 10;

/// Duration used when the user does not pick one
pub const DEFAULT_DURATION_DAYS: u32 = 5;

/// Budget tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetLevel {
    #[default]
    Budget,
    MidRange,
    Luxury,
}

impl BudgetLevel {
    pub const ALL: [BudgetLevel; 3] = [BudgetLevel::Budget, BudgetLevel::MidRange, BudgetLevel::Luxury];

    /// Label shown to users and embedded in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Budget => "Student/Budget",
            Self::MidRange => "Mid-Range",
            Self::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BudgetLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "budget" | "student" | "studentbudget" => Ok(Self::Budget),
            "midrange" | "mid" => Ok(Self::MidRange),
            "luxury" => Ok(Self::Luxury),
            _ => Err(format!("Unknown budget level: {}. Use: budget, mid-range, or luxury", s)),
        }
    }
}

/// Who is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelGroup {
    #[default]
    Solo,
    Couple,
    Family,
    Friends,
}

impl TravelGroup {
    pub const ALL: [TravelGroup; 4] = [
        TravelGroup::Solo,
        TravelGroup::Couple,
        TravelGroup::Family,
        TravelGroup::Friends,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Solo => "Solo",
            Self::Couple => "Couple",
            Self::Family => "Family",
            Self::Friends => "Friends",
        }
    }
}

impl fmt::Display for TravelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TravelGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "solo" => Ok(Self::Solo),
            "couple" => Ok(Self::Couple),
            "family" => Ok(Self::Family),
            "friends" => Ok(Self::Friends),
            _ => Err(format!(
                "Unknown travel group: {}. Use: solo, couple, family, or friends",
                s
            )),
        }
    }
}

/// Lowercase and drop separators so "Mid-Range", "mid_range" and "midrange" match
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Reasons a request is refused before the pipeline starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a destination")]
    EmptyDestination,

    #[error("No API key: provide one explicitly or set {0}")]
    MissingCredential(String),

    #[error("Duration must be between 1 and 10 days (got {0})")]
    DurationOutOfRange(u32),

    #[error("Travel date {date} is before today ({today})")]
    DateInPast { date: NaiveDate, today: NaiveDate },
}

/// One submitted trip request
///
/// Built fresh for every submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub travel_date: NaiveDate,
    pub duration_days: u32,
    pub budget: BudgetLevel,
    pub group: TravelGroup,
}

impl TripRequest {
    pub fn new(
        destination: impl Into<String>,
        travel_date: NaiveDate,
        duration_days: u32,
        budget: BudgetLevel,
        group: TravelGroup,
    ) -> Self {
        Self {
            destination: destination.into(),
            travel_date,
            duration_days,
            budget,
            group,
        }
    }

    /// Check the request's own fields against the submission day
    ///
    /// The destination check comes first so an empty form reports the most
    /// obvious problem.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        debug!(destination = %self.destination, %today, "TripRequest::validate: called");
        if self.destination.trim().is_empty() {
            return Err(ValidationError::EmptyDestination);
        }
        if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&self.duration_days) {
            return Err(ValidationError::DurationOutOfRange(self.duration_days));
        }
        if self.travel_date < today {
            return Err(ValidationError::DateInPast {
                date: self.travel_date,
                today,
            });
        }
        Ok(())
    }

    /// Travel date as "March 2026"
    pub fn month_year(&self) -> String {
        self.travel_date.format("%B %Y").to_string()
    }

    /// Travel date as "March 01, 2026"
    pub fn full_date(&self) -> String {
        self.travel_date.format("%B %d, %Y").to_string()
    }
}
