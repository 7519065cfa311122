mod pairings;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cardguess_bot::{SpawnError, StrategyKind, StrategyParams};
use cardguess_core::game::match_state::{
    ConfigError as MatchConfigError, MatchController, MatchError, MatchOutcome, Termination,
};
use cardguess_core::game::strategy::{Observation, RoundReveal, Strategy};
use cardguess_core::model::card::Card;
use cardguess_core::model::player::PlayerPosition;
use cardguess_core::model::round::Move;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_path;

use pairings::{Pairings, seat_slots};

/// Primary entry point for orchestrating tournaments.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    pairings: Pairings,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub matches_played: usize,
    pub pairings: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;

        if agents.len() < 2 {
            return Err(RunnerError::AgentCount {
                found: agents.len(),
            });
        }

        let pairings = Pairings::round_robin(agents.len());

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
            pairings,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    ///
    /// Both agents of a pairing keep their state across that pairing's games.
    /// Every seed is drawn from one RNG seeded by `matches.seed`, so a run is
    /// fully reproducible.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut matches_played = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config)?;

        for (pairing_index, pair) in self.pairings.as_slice().iter().copied().enumerate() {
            let mut contestants = [
                Contestant::spawn(&self.agents[pair[0]], rng.next_u64())?,
                Contestant::spawn(&self.agents[pair[1]], rng.next_u64())?,
            ];

            for game_index in 0..self.config.matches.games {
                let match_seed = rng.next_u64();
                let result =
                    self.play_match(pairing_index, game_index, match_seed, &mut contestants)?;
                analytics.record_match(&result)?;
                rows_written += write_match_rows(&mut writer, &self.config, &result)?;
                matches_played += 1;
            }
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            matches_played,
            pairings: self.pairings.as_slice().len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path: self
                .logging_enabled
                .then(|| telemetry_path(&self.outputs)),
        })
    }

    fn play_match(
        &self,
        pairing_index: usize,
        game_index: usize,
        match_seed: u64,
        contestants: &mut [Contestant; 2],
    ) -> Result<MatchResult, RunnerError> {
        let match_config = self.config.matches.match_config(match_seed);
        let starting_bankrolls = match_config.starting_bankrolls;
        let mut controller = MatchController::new(match_config)?;

        let slots = seat_slots(game_index);
        let [first, second] = contestants;
        let (player_one, player_two) = if slots[0] == 0 {
            (first, second)
        } else {
            (second, first)
        };

        let mut revisions = [0u32; 2];
        let outcome = controller.run(&mut [&mut *player_one, &mut *player_two], |report| {
            for turn in &report.turns {
                if matches!(turn.turn, Move::Revise(_)) {
                    revisions[turn.seat.index()] += 1;
                }
            }
        })?;

        let names = [player_one.name.clone(), player_two.name.clone()];
        let kinds = [player_one.kind, player_two.kind];
        let summaries = [
            player_one.metrics.take_summary(),
            player_two.metrics.take_summary(),
        ];
        let [one, two] = PlayerPosition::LOOP.map(|seat| {
            let index = seat.index();
            SeatResult {
                agent_name: names[index].clone(),
                opponent_name: names[seat.opponent().index()].clone(),
                kind: kinds[index],
                seat,
                final_bankroll: outcome.bankrolls[index],
                net: outcome.bankrolls[index] - starting_bankrolls[index],
                standing: Standing::for_seat(&outcome, seat),
                revisions: revisions[index],
                metrics: summaries[index].clone(),
            }
        });

        let match_id = format!("P{pairing_index:03}_G{game_index:04}");
        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "cardguess_bench::match",
                Level::INFO,
                run_id = %self.config.run_id,
                match_id = %match_id,
                match_seed,
                player_one = %one.agent_name,
                player_two = %two.agent_name,
                rounds = outcome.rounds_played,
                termination = ?outcome.termination,
                bankroll_one = outcome.bankrolls[0],
                bankroll_two = outcome.bankrolls[1],
            );
        }

        Ok(MatchResult {
            match_id,
            pairing_index,
            game_index,
            match_seed,
            outcome,
            seats: [one, two],
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_match_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    result: &MatchResult,
) -> Result<usize, RunnerError> {
    let mut rows_written = 0usize;
    for seat in &result.seats {
        let row = MatchLogRow {
            run_id: config.run_id.clone(),
            match_id: result.match_id.clone(),
            pairing_index: result.pairing_index,
            game_index: result.game_index,
            match_seed: result.match_seed,
            seat: seat_label(seat.seat),
            bot: seat.agent_name.clone(),
            opponent: seat.opponent_name.clone(),
            standing: seat.standing,
            termination: result.outcome.termination,
            rounds_played: result.outcome.rounds_played,
            final_bankroll: seat.final_bankroll,
            net: seat.net,
            revisions: seat.revisions,
            decisions: seat.metrics.decisions,
            speed_ms_turn: seat.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

fn seat_label(position: PlayerPosition) -> &'static str {
    match position {
        PlayerPosition::PlayerOne => "player_one",
        PlayerPosition::PlayerTwo => "player_two",
    }
}

/// An agent instance plus its decision timings for the current match.
struct Contestant {
    name: String,
    kind: StrategyKind,
    strategy: Box<dyn Strategy>,
    metrics: DecisionMetrics,
}

impl Contestant {
    fn spawn(blueprint: &AgentBlueprint, seed: u64) -> Result<Self, AgentError> {
        let strategy = blueprint.spawn_strategy(seed)?;
        Ok(Self {
            name: blueprint.name.clone(),
            kind: blueprint.kind,
            strategy,
            metrics: DecisionMetrics::default(),
        })
    }
}

impl Strategy for Contestant {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, observation: &Observation) -> Card {
        let start = Instant::now();
        let card = self.strategy.decide(observation);
        self.metrics.record(start.elapsed());
        card
    }

    fn end_of_round(&mut self, reward: i64, reveal: &RoundReveal) {
        self.strategy.end_of_round(reward, reveal);
    }
}

/// Result of a match from one seat's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Win,
    Loss,
    Tie,
}

impl Standing {
    fn for_seat(outcome: &MatchOutcome, seat: PlayerPosition) -> Self {
        match outcome.winner {
            Some(winner) if winner == seat => Standing::Win,
            Some(_) => Standing::Loss,
            None => Standing::Tie,
        }
    }
}

pub struct MatchResult {
    pub match_id: String,
    pub pairing_index: usize,
    pub game_index: usize,
    pub match_seed: u64,
    pub outcome: MatchOutcome,
    pub seats: [SeatResult; 2],
}

pub struct SeatResult {
    pub agent_name: String,
    pub opponent_name: String,
    pub kind: StrategyKind,
    pub seat: PlayerPosition,
    pub final_bankroll: i64,
    pub net: i64,
    pub standing: Standing,
    pub revisions: u32,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    /// Summarises and resets, so each match reports only its own decisions.
    fn take_summary(&mut self) -> DecisionSummary {
        let metrics = std::mem::take(self);
        let avg_ms = if metrics.decisions == 0 {
            0.0
        } else {
            metrics.total.as_secs_f64() * 1000.0 / f64::from(metrics.decisions)
        };

        DecisionSummary {
            decisions: metrics.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: metrics.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct MatchLogRow {
    run_id: String,
    match_id: String,
    pairing_index: usize,
    game_index: usize,
    match_seed: u64,
    seat: &'static str,
    bot: String,
    opponent: String,
    standing: Standing,
    termination: Termination,
    rounds_played: u32,
    final_bankroll: i64,
    net: i64,
    revisions: u32,
    decisions: u32,
    speed_ms_turn: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid match settings: {0}")]
    MatchConfig(#[from] MatchConfigError),
    #[error("match execution failed: {0}")]
    Match(#[from] MatchError),
    #[error("tournament requires at least 2 agents but found {found}")]
    AgentCount { found: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for agent '{name}': {message}")]
    InvalidParam { name: String, message: String },
    #[error("agent '{name}' cannot be built: {source}")]
    Spawn {
        name: String,
        #[source]
        source: SpawnError,
    },
}

struct AgentBlueprint {
    name: String,
    kind: StrategyKind,
    params: StrategyParams,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let params = parse_params(&config.name, &config.params)?;
        let blueprint = Self {
            name: config.name.clone(),
            kind: config.kind,
            params,
        };
        // Surface bad parameters before any match starts.
        blueprint.spawn_strategy(0)?;
        Ok(blueprint)
    }

    fn spawn_strategy(&self, seed: u64) -> Result<Box<dyn Strategy>, AgentError> {
        self.kind
            .spawn(&self.params, seed)
            .map_err(|source| AgentError::Spawn {
                name: self.name.clone(),
                source,
            })
    }
}

fn parse_params(name: &str, params: &serde_yaml::Value) -> Result<StrategyParams, AgentError> {
    let mut parsed = StrategyParams::default();
    if params.is_null() {
        return Ok(parsed);
    }

    let invalid = |message: &str| AgentError::InvalidParam {
        name: name.to_string(),
        message: message.to_string(),
    };

    let mapping = params
        .as_mapping()
        .ok_or_else(|| invalid("expected mapping for agent params"))?;

    for (key, value) in mapping {
        match key.as_str() {
            Some("apriori") => {
                parsed.apriori = value
                    .as_u64()
                    .and_then(|raw| u32::try_from(raw).ok())
                    .ok_or_else(|| invalid("apriori must be a non-negative 32-bit integer"))?;
            }
            Some("learning_time") => {
                parsed.learning_time = value
                    .as_u64()
                    .ok_or_else(|| invalid("learning_time must be a non-negative integer"))?;
            }
            Some("members") => {
                let seq = value
                    .as_sequence()
                    .ok_or_else(|| invalid("members must be an array of strategy kinds"))?;
                parsed.members = seq
                    .iter()
                    .map(|member| {
                        let text = member
                            .as_str()
                            .ok_or_else(|| invalid("members must be an array of strings"))?;
                        text.parse::<StrategyKind>()
                            .map_err(|err| invalid(&err.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
            }
            _ => {}
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::FromIterator;

    fn mapping(entries: &[(&str, serde_yaml::Value)]) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::from_iter(entries.iter().map(
            |(key, value)| (serde_yaml::Value::String((*key).into()), value.clone()),
        )))
    }

    #[test]
    fn empty_params_use_defaults() {
        let params = parse_params("bot", &serde_yaml::Value::Mapping(Default::default())).unwrap();
        assert_eq!(params, StrategyParams::default());
    }

    #[test]
    fn params_parse_every_known_key() {
        let raw = mapping(&[
            ("apriori", serde_yaml::Value::from(3u64)),
            ("learning_time", serde_yaml::Value::from(50u64)),
            (
                "members",
                serde_yaml::Value::Sequence(vec!["bayesian".into(), "always_red".into()]),
            ),
        ]);
        let params = parse_params("mix", &raw).unwrap();
        assert_eq!(params.apriori, 3);
        assert_eq!(params.learning_time, 50);
        assert_eq!(
            params.members,
            vec![StrategyKind::Bayesian, StrategyKind::AlwaysRed]
        );
    }

    #[test]
    fn bad_params_are_reported_per_agent() {
        let raw = mapping(&[("members", serde_yaml::Value::from("contrarian"))]);
        assert!(matches!(
            parse_params("mix", &raw),
            Err(AgentError::InvalidParam { name, .. }) if name == "mix"
        ));

        let config = AgentConfig {
            name: "bayes".to_string(),
            kind: StrategyKind::Bayesian,
            params: mapping(&[("apriori", serde_yaml::Value::from(0u64))]),
        };
        assert!(matches!(
            AgentBlueprint::from_config(&config),
            Err(AgentError::Spawn { .. })
        ));
    }

    #[test]
    fn standing_follows_the_winner() {
        let outcome = MatchOutcome {
            winner: Some(PlayerPosition::PlayerTwo),
            termination: Termination::RoundLimit,
            rounds_played: 10,
            bankrolls: [90, 110],
        };
        assert_eq!(
            Standing::for_seat(&outcome, PlayerPosition::PlayerOne),
            Standing::Loss
        );
        assert_eq!(
            Standing::for_seat(&outcome, PlayerPosition::PlayerTwo),
            Standing::Win
        );
        let tie = MatchOutcome {
            winner: None,
            ..outcome
        };
        assert_eq!(
            Standing::for_seat(&tie, PlayerPosition::PlayerOne),
            Standing::Tie
        );
    }
}
