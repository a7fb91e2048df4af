//! Scripted simulation: drives a full experiment against the in-memory core.
//!
//! Creates the configured experiment, runs every round with concurrent
//! simulated traders, and logs reserve/invariant summaries per pool.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use experiment_sim::application::ports::{
    ExperimentReader, IdentityDirectory, PoolReader, TransactionLedger,
};
use experiment_sim::infrastructure::ScenarioConfig;
use experiment_sim::{
    BroadcastEventPublisher, Clock, CreateExperimentCommand, CreateExperimentUseCase,
    CreateRoundCommand, CreateRoundUseCase, Currency, CurrencyId, ExperimentLifecycleUseCase,
    InMemoryCurrencyDirectory, InMemoryExperimentRepository, InMemoryIdentityDirectory,
    InMemoryLedgerRepository, InMemoryPoolRepository, InMemoryRoundRepository, KnowledgeAssigner,
    PoolLocks, RoundLifecycleUseCase, SwapCommand, SwapDirection, SwapError, SwapUseCase,
    SystemClock, User,
};

fn print_help() {
    eprintln!(
        r#"Experiment Simulator - runs a scripted trading experiment

USAGE:
    experiment-sim [OPTIONS]

OPTIONS:
    --config <PATH>     Load scenario from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter

EXAMPLES:
    # Run the built-in scenario
    experiment-sim

    # Run a custom scenario
    experiment-sim --config scenario.json
"#
    );
}

type Swaps = SwapUseCase<
    SystemClock,
    InMemoryRoundRepository,
    InMemoryPoolRepository,
    InMemoryLedgerRepository,
    InMemoryIdentityDirectory,
    BroadcastEventPublisher,
>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "experiment_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {arg}");
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let scenario = match config_path {
        Some(path) => {
            info!("loading scenario from: {path}");
            ScenarioConfig::from_file(&path).context("loading scenario")?
        }
        None => ScenarioConfig::default(),
    };
    info!(
        scenario = %scenario.name,
        groups = scenario.experiment.num_groups,
        rounds = scenario.rounds.len(),
        "starting simulation"
    );

    run_scenario(scenario).await
}

async fn run_scenario(scenario: ScenarioConfig) -> anyhow::Result<()> {
    let clock = Arc::new(SystemClock::new());
    let experiments = Arc::new(InMemoryExperimentRepository::new());
    let rounds = Arc::new(InMemoryRoundRepository::new());
    let pools = Arc::new(InMemoryPoolRepository::new());
    let ledger = Arc::new(InMemoryLedgerRepository::new());
    let currencies = Arc::new(InMemoryCurrencyDirectory::new());
    let identities = Arc::new(InMemoryIdentityDirectory::new());
    let events = Arc::new(BroadcastEventPublisher::default());
    let locks = Arc::new(PoolLocks::new());

    // Seed the collaborator-owned data: currency catalog and users
    let mut currency_ids: HashMap<String, CurrencyId> = HashMap::new();
    for config in &scenario.currencies {
        let id = currencies.insert(Currency::new(
            &config.symbol,
            &config.name_en,
            &config.name_he,
            clock.now(),
        ));
        currency_ids.insert(config.symbol.to_uppercase(), id);
    }
    let admin_id = identities.insert(User::admin("admin", clock.now()));

    let create_experiment =
        CreateExperimentUseCase::new(clock.clone(), experiments.clone(), identities.clone());
    let create_round = CreateRoundUseCase::new(
        clock.clone(),
        experiments.clone(),
        rounds.clone(),
        currencies.clone(),
    );
    let experiment_lifecycle = ExperimentLifecycleUseCase::new(
        clock.clone(),
        experiments.clone(),
        rounds.clone(),
        pools.clone(),
        ledger.clone(),
        events.clone(),
        locks.clone(),
    );
    let round_lifecycle = RoundLifecycleUseCase::new(
        clock.clone(),
        experiments.clone(),
        rounds.clone(),
        pools.clone(),
        ledger.clone(),
        identities.clone(),
        events.clone(),
        locks.clone(),
        KnowledgeAssigner::new(scenario.knowledge_policy),
    );
    let swaps: Arc<Swaps> = Arc::new(SwapUseCase::new(
        clock.clone(),
        rounds.clone(),
        pools.clone(),
        ledger.clone(),
        identities.clone(),
        events.clone(),
        locks.clone(),
    ));

    let experiment = create_experiment
        .execute(CreateExperimentCommand {
            name: scenario.experiment.name.clone(),
            admin_id,
            num_rounds: scenario.experiment.num_rounds,
            num_training_rounds: scenario.experiment.num_training_rounds,
            num_rounds_for_payment: scenario.experiment.num_rounds_for_payment,
            num_players: scenario.experiment.num_groups * scenario.experiment.players_per_group,
            num_groups: scenario.experiment.num_groups,
        })
        .await?;

    // Register players per group
    let groups = experiments.groups_by_experiment(&experiment.id).await?;
    for group in &groups {
        for p in 1..=scenario.experiment.players_per_group {
            identities.insert(User::player(
                format!("g{}p{}", group.group_number, p),
                Some(group.id),
                clock.now(),
            ));
        }
    }

    // Create all round templates up front
    let mut round_ids = Vec::new();
    for template in &scenario.rounds {
        let x = *currency_ids
            .get(&template.currency_x.to_uppercase())
            .with_context(|| format!("unknown currency {}", template.currency_x))?;
        let y = *currency_ids
            .get(&template.currency_y.to_uppercase())
            .with_context(|| format!("unknown currency {}", template.currency_y))?;
        if x == y {
            bail!("round {} uses the same currency twice", template.round_number);
        }
        let round = create_round
            .execute(CreateRoundCommand {
                experiment_id: experiment.id,
                round_number: template.round_number,
                is_training_round: template.is_training_round,
                counts_for_payment: template.counts_for_payment,
                duration_minutes: template.duration_minutes,
                currency_x_id: x,
                currency_y_id: y,
                external_price_x: template.external_price_x,
                external_price_y: template.external_price_y,
                initial_reserve_x: template.initial_reserve_x,
                initial_reserve_y: template.initial_reserve_y,
                endowment_x: template.endowment_x,
                endowment_y: template.endowment_y,
            })
            .await?;
        round_ids.push(round.id);
    }

    experiment_lifecycle.start(experiment.id).await?;

    for (index, round_id) in round_ids.iter().enumerate() {
        round_lifecycle.initialize_pools(*round_id).await?;
        round_lifecycle.start(*round_id).await?;

        drive_round(
            *round_id,
            &pools,
            &identities,
            &swaps,
            scenario.swaps_per_player,
            scenario.seed + index as u64,
        )
        .await?;

        round_lifecycle.end(*round_id).await?;

        for pool in pools.by_round(round_id).await? {
            let (_, tx_count) = ledger.by_pool(&pool.id, 0, 1).await?;
            info!(
                pool_id = %pool.id,
                reserve_x = %pool.reserve_x,
                reserve_y = %pool.reserve_y,
                swaps = pool.swap_count,
                transactions = tx_count,
                drift = %pool.invariant_drift(),
                "round summary"
            );
        }
    }

    experiment_lifecycle.end(experiment.id).await?;
    info!(experiment_id = %experiment.id, "simulation complete");
    Ok(())
}

/// Run every player of every pool concurrently for one round
async fn drive_round(
    round_id: experiment_sim::RoundId,
    pools: &Arc<InMemoryPoolRepository>,
    identities: &Arc<InMemoryIdentityDirectory>,
    swaps: &Arc<Swaps>,
    swaps_per_player: u32,
    seed: u64,
) -> anyhow::Result<()> {
    let mut tasks: JoinSet<(u32, u32)> = JoinSet::new();
    let mut trader_index = 0u64;

    for pool in pools.by_round(&round_id).await? {
        for player in identities.players_in_group(&pool.group_id).await? {
            let swaps = Arc::clone(swaps);
            let pool_id = pool.id;
            let player_id = player.id;
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trader_index));
            trader_index += 1;

            tasks.spawn(async move {
                let mut committed = 0u32;
                let mut rejected = 0u32;
                for _ in 0..swaps_per_player {
                    let direction = if rng.gen_bool(0.5) {
                        SwapDirection::XForY
                    } else {
                        SwapDirection::YForX
                    };
                    let amount_in = Decimal::new(rng.gen_range(100..2000i64), 2);
                    // Every few swaps, demand an unrealistic output to
                    // exercise the slippage guard
                    let min_amount_out = if rng.gen_ratio(1, 10) {
                        Some(amount_in * Decimal::TWO)
                    } else {
                        None
                    };

                    match swaps
                        .execute(
                            player_id,
                            SwapCommand {
                                pool_id,
                                direction,
                                amount_in,
                                min_amount_out,
                            },
                        )
                        .await
                    {
                        Ok(_) => committed += 1,
                        Err(
                            SwapError::SlippageExceeded { .. }
                            | SwapError::InsufficientBalance { .. },
                        ) => rejected += 1,
                        Err(error) => {
                            warn!(%pool_id, %player_id, %error, "unexpected swap failure");
                            rejected += 1;
                        }
                    }
                }
                (committed, rejected)
            });
        }
    }

    let mut committed = 0u32;
    let mut rejected = 0u32;
    while let Some(result) = tasks.join_next().await {
        let (c, r) = result?;
        committed += c;
        rejected += r;
    }
    info!(%round_id, committed, rejected, "round trading finished");
    Ok(())
}
