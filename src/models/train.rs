use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Top-level disposition of a train. Values outside the three known ones are
/// kept verbatim in `Other` so they can be reported instead of dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrainStatus {
    Ready,
    Standby,
    Maintenance,
    Other(String),
}

impl TrainStatus {
    pub const KNOWN: [TrainStatus; 3] = [TrainStatus::Ready, TrainStatus::Standby, TrainStatus::Maintenance];

    pub fn as_str(&self) -> &str {
        match self {
            TrainStatus::Ready => "Ready",
            TrainStatus::Standby => "Standby",
            TrainStatus::Maintenance => "Maintenance",
            TrainStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TrainStatus::Other(_))
    }
}

impl From<String> for TrainStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Ready" => TrainStatus::Ready,
            "Standby" => TrainStatus::Standby,
            "Maintenance" => TrainStatus::Maintenance,
            _ => TrainStatus::Other(raw),
        }
    }
}

impl From<&str> for TrainStatus {
    fn from(raw: &str) -> Self {
        TrainStatus::from(raw.to_string())
    }
}

impl From<TrainStatus> for String {
    fn from(status: TrainStatus) -> Self {
        match status {
            TrainStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningStats {
    #[serde(default, alias = "lastCleanEnd", alias = "lastCleanEndTimestamp", with = "lenient_timestamp")]
    pub last_clean_end: Option<DateTime<Utc>>,
    #[serde(default, alias = "cleanAgeHours", deserialize_with = "number_or_zero")]
    pub clean_age_hours: f64,
    #[serde(default, alias = "todayCleanLoad", deserialize_with = "number_or_zero")]
    pub today_clean_load: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStats {
    #[serde(default, alias = "openWorkOrders", deserialize_with = "count_or_zero")]
    pub open_work_orders: u32,
    #[serde(default, alias = "openWorkOrderHours", deserialize_with = "number_or_zero")]
    pub open_work_order_hours: f64,
}

/// One row of fleet state as produced by the ranking pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainRecord {
    #[serde(alias = "trainId")]
    pub train_id: String,
    pub status: TrainStatus,
    #[serde(default, alias = "eligibleForService")]
    pub eligible: bool,
    #[serde(default, alias = "priorityScore", deserialize_with = "number_or_zero")]
    pub priority_score: f64,
    /// Negative values mean the certificate is already overdue.
    #[serde(default, alias = "fitnessDaysLeft", deserialize_with = "days_or_zero")]
    pub fitness_days_left: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasons: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cleaning: CleaningStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub maintenance: MaintenanceStats,
}

impl TrainRecord {
    pub fn new(train_id: &str, status: impl Into<TrainStatus>) -> Self {
        Self {
            train_id: train_id.to_string(),
            status: status.into(),
            eligible: false,
            priority_score: 0.0,
            fitness_days_left: 0,
            reasons: Vec::new(),
            recommendations: Vec::new(),
            cleaning: CleaningStats::default(),
            maintenance: MaintenanceStats::default(),
        }
    }

    pub fn with_fitness_days(mut self, days: i64) -> Self {
        self.fitness_days_left = days;
        self
    }

    pub fn with_cleaning(mut self, cleaning: CleaningStats) -> Self {
        self.cleaning = cleaning;
        self
    }

    pub fn with_maintenance(mut self, open_work_orders: u32, open_work_order_hours: f64) -> Self {
        self.maintenance = MaintenanceStats {
            open_work_orders,
            open_work_order_hours,
        };
        self
    }

    pub fn with_ranking(mut self, eligible: bool, priority_score: f64) -> Self {
        self.eligible = eligible;
        self.priority_score = priority_score;
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .filter(|value| value.is_finite())
        .unwrap_or(0.0))
}

fn days_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    number_or_zero(deserializer).map(|value| value.floor() as i64)
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    number_or_zero(deserializer).map(|value| value.max(0.0).floor() as u32)
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses the timestamp shapes the upstream exports emit. Blank and
/// pandas-style missing markers read as absent.
pub fn parse_timestamp(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
    let text = raw.trim();
    if text.is_empty() || ["nan", "nat", "null", "none"].iter().any(|m| text.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(Utc.from_utc_datetime(&midnight)));
    }
    Err(format!("unrecognised timestamp {text:?}"))
}

mod lenient_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_timestamp(&raw).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
