use std::fmt::Write;

use crate::models::{AgentAggregate, DuoInsights, MetricsReport, Scope, SpeedVerdict};

/// Renders the computed metrics and insights as markdown. Pure function of
/// its inputs; the empty-state message for a no-data scope is the caller's
/// responsibility.
pub fn build_report(metrics: &MetricsReport, insights: &DuoInsights) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Support Performance Report");
    match metrics.scope {
        Scope::Full => {
            let _ = writeln!(
                output,
                "Comparing {} and {} across {} day(s) of conversations.",
                metrics.first.label, metrics.second.label, metrics.period_days
            );
        }
        Scope::Day(day) => {
            let _ = writeln!(
                output,
                "Comparing {} and {} on {}.",
                metrics.first.label,
                metrics.second.label,
                day.format("%d/%m/%Y")
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Metrics");
    let _ = writeln!(
        output,
        "- Total conversations: {} ({:.1}/day over {} day(s))",
        metrics.total_conversations, metrics.daily_average, metrics.period_days
    );
    for aggregate in [&metrics.first, &metrics.second] {
        let _ = writeln!(output, "- {}", agent_line(aggregate));
    }

    if !metrics.daily_volume.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Volume by Day");
        let _ = writeln!(
            output,
            "| Date | {} | {} |",
            metrics.first.label, metrics.second.label
        );
        let _ = writeln!(output, "| --- | --- | --- |");
        for (date, volume) in &metrics.daily_volume {
            let _ = writeln!(
                output,
                "| {} | {} | {} |",
                date.format("%d/%m/%Y"),
                volume.first,
                volume.second
            );
        }
    }

    if let (Some(first_hours), Some(second_hours)) = (
        metrics.first.hourly_volume.as_ref(),
        metrics.second.hourly_volume.as_ref(),
    ) {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Volume by Hour");
        let _ = writeln!(
            output,
            "| Hour | {} | {} |",
            metrics.first.label, metrics.second.label
        );
        let _ = writeln!(output, "| --- | --- | --- |");
        for hour in 0..24u32 {
            let first = first_hours.get(&hour).copied().unwrap_or(0);
            let second = second_hours.get(&hour).copied().unwrap_or(0);
            if first == 0 && second == 0 {
                continue;
            }
            let _ = writeln!(output, "| {hour:02}:00 | {first} | {second} |");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Wait Time Distribution");
    for aggregate in [&metrics.first, &metrics.second] {
        let _ = writeln!(output);
        let _ = writeln!(output, "### {}", aggregate.label);
        if aggregate.wait_distribution.is_empty() {
            let _ = writeln!(output, "No conversations in scope.");
        } else {
            for (bucket, count) in &aggregate.wait_distribution {
                let _ = writeln!(output, "- {bucket}: {count}");
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Comparison");
    match insights.volume_leader {
        Some(leader) => {
            let winner = metrics.agent(leader);
            let _ = writeln!(
                output,
                "- Highest volume: {} with {} conversations ({:.1}% gap).",
                winner.label, winner.total, insights.volume_gap_percent
            );
        }
        None => {
            let _ = writeln!(
                output,
                "- Volume: tied at {} conversations each.",
                metrics.first.total
            );
        }
    }
    match insights.speed {
        SpeedVerdict::NoData => {
            let _ = writeln!(output, "- Response time: no measured waits for either agent.");
        }
        SpeedVerdict::ByDefault(winner) => {
            let winner = metrics.agent(winner);
            let _ = writeln!(
                output,
                "- Fastest response: {} (only agent with measured waits, mean {:.1} min).",
                winner.label,
                winner.mean_wait_minutes.unwrap_or_default()
            );
        }
        SpeedVerdict::Measured(winner) => {
            let winner = metrics.agent(winner);
            let _ = writeln!(
                output,
                "- Fastest response: {} with a mean wait of {:.1} min ({:.1} min gap).",
                winner.label,
                winner.mean_wait_minutes.unwrap_or_default(),
                insights.wait_gap_minutes.unwrap_or_default()
            );
        }
    }
    if insights.volume_balanced {
        let _ = writeln!(
            output,
            "- Workload is balanced (volume gap {:.1}%).",
            insights.volume_gap_percent
        );
    } else {
        let _ = writeln!(
            output,
            "- Workload is imbalanced (volume gap {:.1}%, above the {:.0}% threshold).",
            insights.volume_gap_percent,
            crate::insights::VOLUME_IMBALANCE_PERCENT
        );
    }
    if let Some(gap) = insights.wait_gap_minutes {
        if insights.speed_divergent {
            let _ = writeln!(
                output,
                "- Response times diverge by {:.1} min, above the {:.0} min threshold.",
                gap,
                crate::insights::WAIT_GAP_MINUTES
            );
        } else {
            let _ = writeln!(output, "- Response times are similar ({gap:.1} min apart).");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    for recommendation in &insights.recommendations {
        let _ = writeln!(output, "- {recommendation}");
    }

    output
}

fn agent_line(aggregate: &AgentAggregate) -> String {
    match aggregate.mean_wait_minutes {
        Some(mean) => format!(
            "{}: {} conversations, {:.1}/day, mean wait {:.1} min",
            aggregate.label, aggregate.total, aggregate.daily_average, mean
        ),
        None => format!(
            "{}: {} conversations, {:.1}/day, no measured waits",
            aggregate.label, aggregate.total, aggregate.daily_average
        ),
    }
}
