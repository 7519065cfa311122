use std::collections::HashMap;
use std::fs;
use std::path::Path;

use cardguess_bot::StrategyKind;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::tournament::{DecisionSummary, MatchResult, SeatResult, Standing};

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in tournament results")]
    MissingBaseline(String),
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("statistics error: {0}")]
    Statistics(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Per-match score: a win counts 1, a tie one half.
fn score(standing: Standing) -> f64 {
    match standing {
        Standing::Win => 1.0,
        Standing::Tie => 0.5,
        Standing::Loss => 0.0,
    }
}

pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, Vec<f64>>,
    agent_order: Vec<String>,
    normal: Normal,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline = config
            .metrics
            .baseline
            .clone()
            .ok_or_else(|| AnalyticsError::MissingBaseline("<unset>".into()))?;

        if !config.agents.iter().any(|agent| agent.name == baseline) {
            return Err(AnalyticsError::MissingBaseline(baseline));
        }

        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(agent.name.clone(), agent.kind),
            );
            order.push(agent.name.clone());
        }

        let normal =
            Normal::new(0.0, 1.0).map_err(|err| AnalyticsError::Statistics(err.to_string()))?;

        Ok(Self {
            baseline,
            agents,
            comparisons: HashMap::new(),
            agent_order: order,
            normal,
        })
    }

    pub fn record_match(&mut self, result: &MatchResult) -> Result<(), AnalyticsError> {
        for seat in &result.seats {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_match(seat, result.outcome.rounds_played);

            if seat.opponent_name == self.baseline {
                self.comparisons
                    .entry(seat.agent_name.clone())
                    .or_default()
                    .push(score(seat.standing));
            }
        }
        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let z = self.normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);

        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report(z));
            }
        }

        let mut comparisons = Vec::new();
        for report in &reports {
            if report.name == self.baseline {
                continue;
            }
            let scores = self.comparisons.remove(&report.name).unwrap_or_default();
            let (score_rate, p_value) = head_to_head(&self.normal, &scores);
            comparisons.push(ComparisonReport {
                agent: report.name.clone(),
                sample_size: scores.len(),
                score_rate,
                p_value,
            });
        }

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            agents: reports,
            comparisons,
        }
        .enrich())
    }
}

struct AgentAccumulator {
    name: String,
    kind: StrategyKind,
    wins: u32,
    losses: u32,
    ties: u32,
    scores: Vec<f64>,
    total_net: i64,
    total_rounds: u64,
    total_revisions: u64,
    total_latency_ms: f64,
    total_decisions: u64,
}

impl AgentAccumulator {
    fn new(name: String, kind: StrategyKind) -> Self {
        Self {
            name,
            kind,
            wins: 0,
            losses: 0,
            ties: 0,
            scores: Vec::new(),
            total_net: 0,
            total_rounds: 0,
            total_revisions: 0,
            total_latency_ms: 0.0,
            total_decisions: 0,
        }
    }

    fn record_match(&mut self, seat: &SeatResult, rounds_played: u32) {
        match seat.standing {
            Standing::Win => self.wins += 1,
            Standing::Loss => self.losses += 1,
            Standing::Tie => self.ties += 1,
        }
        self.scores.push(score(seat.standing));
        self.total_net += seat.net;
        self.total_rounds += u64::from(rounds_played);
        self.total_revisions += u64::from(seat.revisions);
        self.record_latency(&seat.metrics);
    }

    fn record_latency(&mut self, metrics: &DecisionSummary) {
        self.total_latency_ms += metrics.total_ms;
        self.total_decisions += u64::from(metrics.decisions);
    }

    fn into_report(self, z: f64) -> AgentReport {
        let matches = self.scores.len();
        let (score_rate, ci95) = confidence_interval(&self.scores, z);
        let per_match = |total: f64| {
            if matches == 0 {
                0.0
            } else {
                total / matches as f64
            }
        };
        let avg_latency = if self.total_decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.total_decisions as f64
        };

        AgentReport {
            name: self.name,
            kind: self.kind,
            matches,
            wins: self.wins as usize,
            losses: self.losses as usize,
            ties: self.ties as usize,
            score_rate,
            ci95,
            avg_net: per_match(self.total_net as f64),
            avg_rounds: per_match(self.total_rounds as f64),
            revisions_per_match: per_match(self.total_revisions as f64),
            average_ms_per_decision: avg_latency,
            delta_vs_baseline: 0.0,
        }
    }
}

/// Mean score against the baseline and the two-sided p-value of it differing
/// from an even split, by normal approximation.
fn head_to_head(normal: &Normal, scores: &[f64]) -> (f64, f64) {
    if scores.is_empty() {
        return (0.5, 1.0);
    }
    let n = scores.len() as f64;
    let rate = scores.iter().sum::<f64>() / n;
    let std_error = (0.25 / n).sqrt();
    let z = (rate - 0.5).abs() / std_error;
    let p = 2.0 * (1.0 - normal.cdf(z));
    (rate, p.clamp(0.0, 1.0))
}

/// Sample mean with a normal-approximation interval of half-width
/// `z * standard error`.
fn confidence_interval(samples: &[f64], z: f64) -> (f64, (f64, f64)) {
    if samples.is_empty() {
        return (0.0, (0.0, 0.0));
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    if samples.len() == 1 {
        return (mean, (mean, mean));
    }
    let variance = samples
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (samples.len() as f64 - 1.0);
    let margin = z * (variance / samples.len() as f64).sqrt();
    (mean, (mean - margin, mean + margin))
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
}

impl AnalyticsSummary {
    pub fn enrich(mut self) -> Self {
        let baseline_rate = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.score_rate)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.score_rate - baseline_rate;
        }

        self
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        rows.push_str(&format!("Baseline: `{}`\n\n", self.baseline));
        rows.push_str("| Agent | Kind | Matches | W/L/T | Score % | Δ vs baseline | 95% CI | Avg net | Avg rounds | Revisions/match | Avg ms/decision |\n");
        rows.push_str("|-------|------|---------|-------|---------|---------------|--------|---------|------------|-----------------|-----------------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {kind} | {matches} | {wins}/{losses}/{ties} | {score:.1}% | {delta:+.3} | [{ci_low:.3}, {ci_high:.3}] | {net:+.2} | {rounds:.1} | {revisions:.2} | {latency:.4} |\n",
                name = agent.name,
                kind = agent.kind,
                matches = agent.matches,
                wins = agent.wins,
                losses = agent.losses,
                ties = agent.ties,
                score = agent.score_rate * 100.0,
                delta = agent.delta_vs_baseline,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                net = agent.avg_net,
                rounds = agent.avg_rounds,
                revisions = agent.revisions_per_match,
                latency = agent.average_ms_per_decision,
            ));
        }

        if !self.comparisons.is_empty() {
            rows.push_str(&format!("\n## Head to head vs `{}`\n\n", self.baseline));
            rows.push_str("| Agent | Matches | Score % | p-value |\n");
            rows.push_str("|-------|---------|---------|---------|\n");
            for comparison in &self.comparisons {
                rows.push_str(&format!(
                    "| {agent} | {n} | {rate:.1}% | {p:.3} |\n",
                    agent = comparison.agent,
                    n = comparison.sample_size,
                    rate = comparison.score_rate * 100.0,
                    p = comparison.p_value,
                ));
            }
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: StrategyKind,
    pub matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub score_rate: f64,
    pub ci95: (f64, f64),
    pub avg_net: f64,
    pub avg_rounds: f64,
    pub revisions_per_match: f64,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
}

fn serialize_kind<S>(kind: &StrategyKind, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(kind.as_str())
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub sample_size: usize,
    pub score_rate: f64,
    pub p_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal() -> Normal {
        Normal::new(0.0, 1.0).unwrap()
    }

    #[test]
    fn ninety_five_percent_z_is_standard() {
        let z = normal().inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);
        assert!((z - 1.96).abs() < 1e-2);
    }

    #[test]
    fn interval_brackets_the_mean() {
        let (mean, (low, high)) = confidence_interval(&[1.0, 0.0, 1.0, 0.5], 1.96);
        assert!((mean - 0.625).abs() < 1e-12);
        assert!(low < mean && mean < high);
        assert_eq!(confidence_interval(&[], 1.96), (0.0, (0.0, 0.0)));
        assert_eq!(confidence_interval(&[1.0], 1.96), (1.0, (1.0, 1.0)));
    }

    #[test]
    fn even_head_to_head_is_not_significant() {
        let (rate, p) = head_to_head(&normal(), &[1.0, 0.0, 1.0, 0.0]);
        assert!((rate - 0.5).abs() < 1e-12);
        assert!((p - 1.0).abs() < 1e-9);

        let (rate, p) = head_to_head(&normal(), &[1.0; 40]);
        assert_eq!(rate, 1.0);
        assert!(p < 0.001);
    }
}
