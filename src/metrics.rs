use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    AgentAggregate, AgentId, AgentPair, DayVolume, MetricsReport, NormalizedRecord, Scope,
};

/// Computes the full metrics structure for the given scope. Returns None when
/// the scoped selection is empty, so callers can render a dedicated no-data
/// state instead of zero-valued charts.
pub fn compute_metrics(
    records: &[NormalizedRecord],
    scope: Scope,
    pair: &AgentPair,
) -> Option<MetricsReport> {
    let scoped: Vec<&NormalizedRecord> = match scope {
        Scope::Full => records.iter().collect(),
        Scope::Day(day) => records
            .iter()
            .filter(|record| record.entry_date == Some(day))
            .collect(),
    };

    if scoped.is_empty() {
        return None;
    }

    // Records without a parsed date count toward totals but not toward the
    // day cardinality, so a file of unparsable timestamps still reports.
    let period_days = match scope {
        Scope::Day(_) => 1,
        Scope::Full => scoped
            .iter()
            .filter_map(|record| record.entry_date)
            .collect::<BTreeSet<_>>()
            .len(),
    };

    let total_conversations = scoped.len();
    let daily_average = if period_days == 0 {
        0.0
    } else {
        total_conversations as f64 / period_days as f64
    };

    let with_hours = matches!(scope, Scope::Day(_));
    let first = aggregate_agent(&scoped, AgentId::First, pair.label(AgentId::First), with_hours);
    let second = aggregate_agent(
        &scoped,
        AgentId::Second,
        pair.label(AgentId::Second),
        with_hours,
    );

    let mut daily_volume: BTreeMap<_, DayVolume> = BTreeMap::new();
    for record in &scoped {
        let Some(date) = record.entry_date else {
            continue;
        };
        let entry = daily_volume.entry(date).or_default();
        match record.agent {
            AgentId::First => entry.first += 1,
            AgentId::Second => entry.second += 1,
        }
    }

    Some(MetricsReport {
        scope,
        total_conversations,
        period_days,
        daily_average,
        first,
        second,
        daily_volume,
    })
}

fn aggregate_agent(
    scoped: &[&NormalizedRecord],
    agent: AgentId,
    label: &str,
    with_hours: bool,
) -> AgentAggregate {
    let records: Vec<&NormalizedRecord> = scoped
        .iter()
        .copied()
        .filter(|record| record.agent == agent)
        .collect();

    let total = records.len();
    let active_days = records
        .iter()
        .filter_map(|record| record.entry_date)
        .collect::<BTreeSet<_>>()
        .len();
    let daily_average = if active_days == 0 {
        0.0
    } else {
        total as f64 / active_days as f64
    };

    let waits: Vec<f64> = records.iter().filter_map(|record| record.wait_minutes).collect();
    let mean_wait_minutes = if waits.is_empty() {
        None
    } else {
        Some(waits.iter().sum::<f64>() / waits.len() as f64)
    };

    // Every record lands in exactly one bucket (NoData included), so the
    // distribution always sums back to the total.
    let mut wait_distribution = BTreeMap::new();
    for record in &records {
        *wait_distribution.entry(record.wait_bucket).or_insert(0) += 1;
    }

    let hourly_volume = with_hours.then(|| {
        let mut hours = BTreeMap::new();
        for record in &records {
            if let Some(hour) = record.entry_hour {
                *hours.entry(hour).or_insert(0) += 1;
            }
        }
        hours
    });

    AgentAggregate {
        label: label.to_string(),
        total,
        active_days,
        daily_average,
        mean_wait_minutes,
        wait_distribution,
        hourly_volume,
    }
}
