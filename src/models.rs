use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// The two conversation handlers this tool tracks. The rest of the pipeline
/// receives them as an injected pair so the names live in exactly one place.
pub const TRACKED_FIRST: &str = "Naura";
pub const TRACKED_SECOND: &str = "Diessy";

#[derive(Debug, Clone)]
pub struct AgentPair {
    pub first: String,
    pub second: String,
}

impl AgentPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn tracked() -> Self {
        Self::new(TRACKED_FIRST, TRACKED_SECOND)
    }

    /// Case-insensitive substring match on the conversation-owner field.
    /// The first identity is checked first and wins ambiguous matches.
    pub fn match_owner(&self, owner: &str) -> Option<AgentId> {
        let owner = owner.to_lowercase();
        if owner.contains(&self.first.to_lowercase()) {
            Some(AgentId::First)
        } else if owner.contains(&self.second.to_lowercase()) {
            Some(AgentId::Second)
        } else {
            None
        }
    }

    pub fn label(&self, agent: AgentId) -> &str {
        match agent {
            AgentId::First => &self.first,
            AgentId::Second => &self.second,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    First,
    Second,
}

/// Response-wait band. Upper bounds are inclusive; reporting thresholds
/// downstream depend on the exact cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WaitBucket {
    #[serde(rename = "up to 1 min")]
    UpTo1Min,
    #[serde(rename = "1-5 min")]
    OneToFive,
    #[serde(rename = "6-10 min")]
    SixToTen,
    #[serde(rename = "11-30 min")]
    ElevenToThirty,
    #[serde(rename = "30 min-2h")]
    HalfHourToTwoHours,
    #[serde(rename = "more than 2h")]
    OverTwoHours,
    #[serde(rename = "no data")]
    NoData,
}

impl WaitBucket {
    pub fn label(self) -> &'static str {
        match self {
            WaitBucket::UpTo1Min => "up to 1 min",
            WaitBucket::OneToFive => "1-5 min",
            WaitBucket::SixToTen => "6-10 min",
            WaitBucket::ElevenToThirty => "11-30 min",
            WaitBucket::HalfHourToTwoHours => "30 min-2h",
            WaitBucket::OverTwoHours => "more than 2h",
            WaitBucket::NoData => "no data",
        }
    }
}

impl fmt::Display for WaitBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A conversation row after filtering and field parsing. Records with an
/// unparsable timestamp keep `entry_date: None`; they still count toward
/// totals but stay out of any date-grouped aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub agent: AgentId,
    pub entry_date: Option<NaiveDate>,
    pub entry_hour: Option<u32>,
    pub wait_minutes: Option<f64>,
    pub wait_bucket: WaitBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Full,
    Day(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentAggregate {
    pub label: String,
    pub total: usize,
    pub active_days: usize,
    pub daily_average: f64,
    /// None when the agent has no measured waits in scope. Comparison logic
    /// works over this optionality; 0.0 is a real value, not a sentinel.
    pub mean_wait_minutes: Option<f64>,
    pub wait_distribution: BTreeMap<WaitBucket, usize>,
    /// Hour-of-day counts, only populated in day scope. Hours without
    /// conversations are omitted; the renderer zero-fills 0-23 if it charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_volume: Option<BTreeMap<u32, usize>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayVolume {
    pub first: usize,
    pub second: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub scope: Scope,
    pub total_conversations: usize,
    pub period_days: usize,
    pub daily_average: f64,
    pub first: AgentAggregate,
    pub second: AgentAggregate,
    pub daily_volume: BTreeMap<NaiveDate, DayVolume>,
}

impl MetricsReport {
    pub fn agent(&self, id: AgentId) -> &AgentAggregate {
        match id {
            AgentId::First => &self.first,
            AgentId::Second => &self.second,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedVerdict {
    /// Neither agent has a measured wait in scope.
    NoData,
    /// Only this agent has measured waits; it wins by default of measurement.
    ByDefault(AgentId),
    /// Both agents have measured waits; this one has the smaller mean.
    Measured(AgentId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuoInsights {
    /// None when both totals are equal.
    pub volume_leader: Option<AgentId>,
    pub volume_gap: usize,
    pub volume_gap_percent: f64,
    pub volume_balanced: bool,
    pub speed: SpeedVerdict,
    /// Only present when both agents have measured waits.
    pub wait_gap_minutes: Option<f64>,
    pub speed_divergent: bool,
    pub recommendations: Vec<String>,
}
