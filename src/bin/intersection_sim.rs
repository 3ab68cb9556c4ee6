//! Thin CLI driver on top of `intersection_sim_core`: parses argv, builds a
//! two-lane intersection, runs the tick loop, and prints the mandated
//! progress and summary lines. Mirrors the library's own
//! `src/bin/bench_sp.rs` convention of a binary that only wires pieces
//! together and does I/O.
//!
//! cargo run --release --bin intersection_sim -- -n 50 -l

use intersection_sim_core::coordinator::{Coordinator, LaneId, StrategyKind};
use intersection_sim_core::lane::Lane;
use intersection_sim_core::phase::{Phase, PhaseDurations, PhaseTimer};
use intersection_sim_core::verbose::{self, LocalLogger, VerboseLevel};
use intersection_sim_core::{SimConfig, SimError};
use rand::Rng;
use std::fmt;
use std::process::ExitCode;
use uuid::Uuid;

const NORTH_SOUTH: LaneId = LaneId(1);
const WEST_EAST: LaneId = LaneId(2);

struct CliArgs {
    runs: u32,
    strategy: Option<StrategyKind>,
    verbose: bool,
}

fn usage() -> &'static str {
    "usage: intersection_sim [-n N] [-s fixed|fuzzy] [-l] [-h]\n\n\
     -n N            number of paired simulation runs (default 1)\n\
     -s fixed|fuzzy  restrict to a single strategy (default: alternate fixed/fuzzy)\n\
     -l              enable verbose per-tick logging\n\
     -h              print this message and exit"
}

fn parse_args(argv: &[String]) -> Result<CliArgs, String> {
    let mut runs = 1u32;
    let mut strategy = None;
    let mut verbose = false;
    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-n" => {
                i += 1;
                let value = argv.get(i).ok_or("-n requires a value")?;
                runs = value.parse::<u32>().map_err(|_| format!("invalid -n value: {value}"))?;
                if runs == 0 {
                    return Err("-n must be a positive integer".to_string());
                }
            }
            "-s" => {
                i += 1;
                let value = argv.get(i).ok_or("-s requires a value")?;
                strategy = Some(match value.as_str() {
                    "fixed" => StrategyKind::Fixed,
                    "fuzzy" => StrategyKind::Fuzzy,
                    other => return Err(format!("invalid -s value: {other} (expected fixed|fuzzy)")),
                });
            }
            "-l" => verbose = true,
            other => return Err(format!("unrecognized option: {other}")),
        }
        i += 1;
    }
    Ok(CliArgs { runs, strategy, verbose })
}

/// Per-run result handed to the summary aggregator.
struct RunOutcome {
    strategy_label: &'static str,
    total_wait: u64,
    ticks_run: u32,
}

#[derive(Debug)]
enum RunError {
    Sim(SimError),
    StepCapExceeded,
}

impl From<SimError> for RunError {
    fn from(e: SimError) -> Self {
        RunError::Sim(e)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Sim(e) => write!(f, "{e}"),
            RunError::StepCapExceeded => write!(f, "step cap exceeded without reaching the car_out threshold"),
        }
    }
}

fn strategy_label(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Fixed => "fixed",
        StrategyKind::Fuzzy => "fuzzy",
    }
}

fn run_simulation(
    config: &SimConfig,
    kind: StrategyKind,
    rng: &mut impl Rng,
    logger: &LocalLogger,
) -> Result<RunOutcome, RunError> {
    let durations = PhaseDurations::new(config.green_secs, config.amber_secs, config.red_secs);

    let mut coordinator = Coordinator::new(kind, config.extension_cap);
    coordinator.register(PhaseTimer::new(NORTH_SOUTH, durations, Phase::Green));
    coordinator.register(PhaseTimer::new(WEST_EAST, durations, Phase::Red));

    let mut north_to_south = Lane::new(NORTH_SOUTH, "north_to_south", config.lane_size, config.sensor_distance);
    let mut west_to_east = Lane::new(WEST_EAST, "west_to_east", config.lane_size, config.sensor_distance);

    logger.log(verbose::EVENT_RUN_START, &format!("starting {} run", strategy_label(kind)));

    for tick in 0..config.step_cap {
        if rng.random_bool(config.ns_spawn_probability) && north_to_south.append() {
            logger.log(verbose::EVENT_SPAWN, "vehicle spawned on north_to_south");
        }
        if rng.random_bool(config.we_spawn_probability) && west_to_east.append() {
            logger.log(verbose::EVENT_SPAWN, "vehicle spawned on west_to_east");
        }

        coordinator.tick()?;
        logger.log_with_fields(verbose::EVENT_TICK, "advanced one tick", &[("tick", &tick)]);

        for lane in [&mut north_to_south, &mut west_to_east] {
            let phase = coordinator.phase_of(lane.id()).expect("lane registered above");
            for (lane_id, position) in lane.tick(phase)? {
                coordinator.on_detect(lane_id, position)?;
                // Skip the lane/position formatting entirely below Main; avoids
                // paying for it on every sensor crossing in a quiet run.
                if logger.is_at_least(VerboseLevel::Main) {
                    logger.log_with_fields(
                        verbose::EVENT_DETECT,
                        "sensor fired",
                        &[("lane", &lane_id), ("position", &position)],
                    );
                }
            }
        }

        if north_to_south.car_out >= config.car_out_cap || west_to_east.car_out >= config.car_out_cap {
            let outcome = RunOutcome {
                strategy_label: strategy_label(kind),
                total_wait: north_to_south.total_wait + west_to_east.total_wait,
                ticks_run: tick + 1,
            };
            logger.log_with_fields(
                verbose::EVENT_RUN_SUMMARY,
                "run complete",
                &[("total_wait", &outcome.total_wait), ("ticks", &outcome.ticks_run)],
            );
            return Ok(outcome);
        }
    }

    Err(RunError::StepCapExceeded)
}

fn print_summary(outcomes: &[RunOutcome]) {
    for label in ["fixed", "fuzzy"] {
        let matching: Vec<&RunOutcome> = outcomes.iter().filter(|o| o.strategy_label == label).collect();
        if matching.is_empty() {
            continue;
        }
        let mean = matching.iter().map(|o| o.total_wait).sum::<u64>() as f64 / matching.len() as f64;
        println!(
            "total average wait time for {} simulations of {} controller was {:.3}",
            matching.len(),
            label,
            mean
        );
    }
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.iter().any(|a| a == "-h") {
        println!("{}", usage());
        return ExitCode::SUCCESS;
    }

    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n\n{}", usage());
            return ExitCode::FAILURE;
        }
    };

    if args.verbose {
        verbose::ensure_logger_init();
        verbose::set_verbose_level(VerboseLevel::Main);
    }

    let config = SimConfig::default();
    let mut rng = rand::rng();
    let mut outcomes = Vec::with_capacity(args.runs as usize);

    for run_index in 0..args.runs {
        let kind = args
            .strategy
            .unwrap_or(if run_index % 2 == 0 { StrategyKind::Fixed } else { StrategyKind::Fuzzy });
        let run_id = Uuid::new_v4();
        let logger = LocalLogger::with_session(verbose::get_verbose_level(), run_id.to_string());

        match run_simulation(&config, kind, &mut rng, &logger) {
            Ok(outcome) => {
                println!(
                    "run {}: {} controller, total_wait={}, ticks={}",
                    run_index, outcome.strategy_label, outcome.total_wait, outcome.ticks_run
                );
                outcomes.push(outcome);
            }
            Err(e) => {
                eprintln!("run {run_index} aborted: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    print_summary(&outcomes);
    ExitCode::SUCCESS
}
