use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Naive timestamp layouts accepted for `incident_date`, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Race/ethnicity categories recognised by the race breakdown.
///
/// Declaration order is the fixed display order, so the derived `Ord`
/// sorts White < Black < Hispanic/Latino < Asian < Unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RaceEthnicity {
    White,
    Black,
    #[serde(rename = "Hispanic/Latino")]
    HispanicLatino,
    Asian,
    Unknown,
}

impl RaceEthnicity {
    /// All recognised categories in display order.
    pub const ALL: [RaceEthnicity; 5] = [
        RaceEthnicity::White,
        RaceEthnicity::Black,
        RaceEthnicity::HispanicLatino,
        RaceEthnicity::Asian,
        RaceEthnicity::Unknown,
    ];

    /// Maps the dataset's `race_ethn` value to a category.
    ///
    /// Returns `None` for any value outside the five recognised labels.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "White" => Some(RaceEthnicity::White),
            "Black" => Some(RaceEthnicity::Black),
            "Hispanic/Latino" => Some(RaceEthnicity::HispanicLatino),
            "Asian" => Some(RaceEthnicity::Asian),
            "Unknown" => Some(RaceEthnicity::Unknown),
            _ => None,
        }
    }

    /// Label as it appears in the dataset and on the chart axis.
    pub fn label(&self) -> &'static str {
        match self {
            RaceEthnicity::White => "White",
            RaceEthnicity::Black => "Black",
            RaceEthnicity::HispanicLatino => "Hispanic/Latino",
            RaceEthnicity::Asian => "Asian",
            RaceEthnicity::Unknown => "Unknown",
        }
    }

    /// Fixed display rank, 1 through 5.
    pub fn rank(&self) -> u8 {
        match self {
            RaceEthnicity::White => 1,
            RaceEthnicity::Black => 2,
            RaceEthnicity::HispanicLatino => 3,
            RaceEthnicity::Asian => 4,
            RaceEthnicity::Unknown => 5,
        }
    }
}

impl fmt::Display for RaceEthnicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar month bucket.
///
/// Field order makes the derived ordering chronological, so 2019-12 sorts
/// before 2020-01 regardless of how the key is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Creates a bucket, returning `None` for a month outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(YearMonth { year, month })
        } else {
            None
        }
    }

    pub fn of(timestamp: &NaiveDateTime) -> Self {
        YearMonth {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single stop-and-frisk incident.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub neighborhood: String,
    /// `None` when the dataset value is not one of the recognised categories.
    pub race: Option<RaceEthnicity>,
    /// Local wall-clock time of the stop as recorded in the dataset.
    pub occurred_at: NaiveDateTime,
}

impl Incident {
    pub fn new(
        neighborhood: impl Into<String>,
        race: Option<RaceEthnicity>,
        occurred_at: NaiveDateTime,
    ) -> Self {
        Incident {
            neighborhood: neighborhood.into(),
            race,
            occurred_at,
        }
    }

    /// Builds an incident from the raw CSV fields.
    ///
    /// # Errors
    /// Returns `RecordError::EmptyNeighborhood` for a blank neighborhood and
    /// `RecordError::InvalidTimestamp` when `incident_date` matches none of
    /// the accepted layouts.
    pub fn from_raw(
        neighborhood: &str,
        race_ethn: &str,
        incident_date: &str,
    ) -> Result<Self, RecordError> {
        let neighborhood = neighborhood.trim();
        if neighborhood.is_empty() {
            return Err(RecordError::EmptyNeighborhood);
        }
        let occurred_at = parse_timestamp(incident_date)?;
        Ok(Incident::new(
            neighborhood,
            RaceEthnicity::parse(race_ethn),
            occurred_at,
        ))
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(&self.occurred_at)
    }

    /// Hour of day, 0 through 23.
    pub fn hour(&self) -> u32 {
        self.occurred_at.hour()
    }
}

/// Parses an `incident_date` value.
///
/// Offsets in RFC 3339 input are dropped in favour of the recorded local
/// time, so the hour of day matches the wall clock at the stop. A bare date
/// is taken as midnight.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, RecordError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RecordError::InvalidTimestamp(String::new()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_local());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| RecordError::InvalidTimestamp(value.to_string()))
}

/// Reasons a single dataset row is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Row could not be decoded by the CSV reader
    Csv(String),
    /// Neighborhood column is blank
    EmptyNeighborhood,
    /// `incident_date` is not a recognised date-time
    InvalidTimestamp(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Csv(msg) => write!(f, "Malformed row: {}", msg),
            RecordError::EmptyNeighborhood => write!(f, "Empty neighborhood"),
            RecordError::InvalidTimestamp(value) => {
                write!(f, "Invalid incident timestamp: '{}'", value)
            }
        }
    }
}

impl std::error::Error for RecordError {}
