use std::cmp::Ordering;

use crate::models::{AgentAggregate, AgentId, DuoInsights, SpeedVerdict};

/// Volume gap above this percentage flags a workload imbalance.
pub const VOLUME_IMBALANCE_PERCENT: f64 = 20.0;
/// Mean-wait gap above this many minutes flags a process review.
pub const WAIT_GAP_MINUTES: f64 = 30.0;

/// Volume gap as a percentage of the busier agent's total. Symmetric in its
/// arguments and 0 when both totals are 0.
pub fn volume_gap_percent(a: usize, b: usize) -> f64 {
    let larger = a.max(b);
    if larger == 0 {
        return 0.0;
    }
    a.abs_diff(b) as f64 / larger as f64 * 100.0
}

pub fn compare_agents(first: &AgentAggregate, second: &AgentAggregate) -> DuoInsights {
    let volume_gap = first.total.abs_diff(second.total);
    let volume_gap_percent = volume_gap_percent(first.total, second.total);
    let volume_leader = match first.total.cmp(&second.total) {
        Ordering::Greater => Some(AgentId::First),
        Ordering::Less => Some(AgentId::Second),
        Ordering::Equal => None,
    };
    let volume_balanced = volume_gap_percent <= VOLUME_IMBALANCE_PERCENT;

    let speed = match (first.mean_wait_minutes, second.mean_wait_minutes) {
        (None, None) => SpeedVerdict::NoData,
        (Some(_), None) => SpeedVerdict::ByDefault(AgentId::First),
        (None, Some(_)) => SpeedVerdict::ByDefault(AgentId::Second),
        (Some(a), Some(b)) => SpeedVerdict::Measured(if a < b {
            AgentId::First
        } else {
            AgentId::Second
        }),
    };
    let wait_gap_minutes = match (first.mean_wait_minutes, second.mean_wait_minutes) {
        (Some(a), Some(b)) => Some((a - b).abs()),
        _ => None,
    };
    let speed_divergent = wait_gap_minutes.is_some_and(|gap| gap > WAIT_GAP_MINUTES);

    let mut recommendations = Vec::new();
    if !volume_balanced {
        if let Some(leader) = volume_leader {
            let (busier, lighter) = labels(first, second, leader);
            recommendations.push(format!(
                "Redistribute leads: {busier} handled {volume_gap_percent:.1}% more conversations than {lighter}."
            ));
        }
    }
    if speed_divergent {
        if let SpeedVerdict::Measured(faster) = speed {
            let (faster, slower) = labels(first, second, faster);
            recommendations.push(format!(
                "Coaching: {slower} can close the response-time gap by shadowing {faster}."
            ));
        }
    }
    recommendations
        .push("Monitoring: track these metrics daily to catch shifts in trend early.".to_string());
    recommendations.push(
        "Target: keep volume balanced and mean response time under 30 minutes.".to_string(),
    );

    DuoInsights {
        volume_leader,
        volume_gap,
        volume_gap_percent,
        volume_balanced,
        speed,
        wait_gap_minutes,
        speed_divergent,
        recommendations,
    }
}

fn labels<'a>(
    first: &'a AgentAggregate,
    second: &'a AgentAggregate,
    winner: AgentId,
) -> (&'a str, &'a str) {
    match winner {
        AgentId::First => (&first.label, &second.label),
        AgentId::Second => (&second.label, &first.label),
    }
}
