//! # CLI Commands
//!
//! Command implementations for the `questline` binary.
//!
//! Every command opens the store, rebuilds the engine, reads the wall clock
//! and drives the engine with `tick` until the work it started has resolved.
//! Board state is recomputed on every invocation; only player stats,
//! completion records and cooldowns persist.

use crate::store::HostBackend;
use crate::witness::RandomWitness;
use questline_core::view::{StatusView, describe_event, format_countdown};
use questline_core::{
    Attachment, EngineConfig, Event, Proof, QuestCatalog, QuestEngine, QuestId, Selection,
    Timestamp,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Upper bound on one sleep of the tick loop.
const TICK_MS: u64 = 1_000;

pub type Engine = QuestEngine<HostBackend, RandomWitness>;

/// Where state lives and how the engine is configured.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub db_path: PathBuf,
    pub backend: String,
    pub config_path: Option<PathBuf>,
    pub quests_path: Option<PathBuf>,
    /// Seed for the mock witness; entropy when absent.
    pub witness_seed: Option<u64>,
}

impl HostOptions {
    pub fn new(db_path: impl Into<PathBuf>, backend: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            backend: backend.into(),
            config_path: None,
            quests_path: None,
            witness_seed: None,
        }
    }
}

// =============================================================================
// ENGINE SETUP
// =============================================================================

/// Wall clock as a [`Timestamp`].
pub fn now() -> Timestamp {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
    Timestamp::from_millis(millis)
}

/// Load the engine config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(EngineConfig::from_json(&json)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Load a quest catalog, or the built-in one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<QuestCatalog, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(QuestCatalog::from_json(&json)?)
        }
        None => Ok(QuestCatalog::builtin()),
    }
}

/// Open the store (creating it if needed) and assemble an engine.
pub fn load_or_create_engine(options: &HostOptions) -> Result<Engine, Box<dyn std::error::Error>> {
    let config = load_config(options.config_path.as_deref())?;
    let catalog = load_catalog(options.quests_path.as_deref())?;
    let backend = HostBackend::open(&options.db_path, &options.backend)?;
    let witness = match options.witness_seed {
        Some(seed) => RandomWitness::seeded(&config, seed),
        None => RandomWitness::new(&config),
    };
    debug!(path = %options.db_path.display(), backend = %options.backend, "engine ready");
    Ok(QuestEngine::new(catalog, config, backend, witness)?)
}

/// Tick until `done` holds or `deadline` passes.
fn drive(
    engine: &mut Engine,
    deadline: Timestamp,
    events: &mut Vec<Event>,
    done: impl Fn(&Engine) -> bool,
) {
    loop {
        let now = now();
        events.extend(engine.tick(now));
        if done(engine) || now >= deadline {
            return;
        }
        let wait = now.millis_until(deadline).clamp(1, TICK_MS);
        std::thread::sleep(Duration::from_millis(wait));
    }
}

fn print_events(events: &[Event], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(events)?);
        return Ok(());
    }
    for event in events {
        println!("{}", describe_event(event));
        if let Event::ProofRejected {
            reason: Some(reason),
            ..
        } = event
        {
            println!("  {}", reason.supportive_message());
        }
    }
    Ok(())
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Initialize a new store.
pub fn cmd_init(db_path: &Path, backend: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if db_path.exists() {
        if !force {
            return Err(format!(
                "Database already exists at {}. Use --force to overwrite.",
                db_path.display()
            )
            .into());
        }
        std::fs::remove_file(db_path)?;
    }

    HostBackend::create(db_path, backend)?;
    info!(path = %db_path.display(), backend, "store initialized");
    println!("Initialized {} store at {}", backend, db_path.display());
    Ok(())
}

/// Show stats, the quest board and any due reflection.
pub fn cmd_status(options: &HostOptions, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = load_or_create_engine(options)?;
    let now = now();
    engine.start(now);
    let view = StatusView::capture(&engine, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.to_text());
    }
    Ok(())
}

/// Show the offered quest in full.
pub fn cmd_quest(options: &HostOptions, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = load_or_create_engine(options)?;
    let now = now();
    let selection = engine.select_next_quest(now);

    if json {
        let output = match engine.offered_quest() {
            Some(quest) => serde_json::json!({ "selection": selection, "quest": quest }),
            None => serde_json::json!({ "selection": selection }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match (&selection, engine.offered_quest()) {
        (Selection::Offered { .. }, Some(quest)) => {
            println!("{} [{}]", quest.title, quest.id);
            println!("{}", quest.description);
            println!("Objective: {}", quest.objective);
            println!("Proof: {}", quest.proof_type.label());
            println!("Reward: {} XP", quest.experience_reward);
        }
        (Selection::CoolingDown { until }, _) => {
            println!(
                "All quests cooling down. Next in {}",
                format_countdown(now.millis_until(*until))
            );
        }
        _ => println!("No quests available."),
    }
    Ok(())
}

/// Build a proof payload from command-line inputs.
pub fn build_proof(
    text: Option<String>,
    image: Option<&Path>,
    recording: Option<String>,
) -> Result<Proof, Box<dyn std::error::Error>> {
    let mut proof = Proof::empty();
    if let Some(text) = text {
        proof.text = text;
    }
    if let Some(path) = image {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        proof.attachment = Some(Attachment::new(name, size));
    }
    if let Some(description) = recording {
        proof.recording_description = description;
    }
    Ok(proof)
}

/// Begin the offered quest, optionally ask a witness, submit the proof and
/// wait for the verdict.
pub fn cmd_submit(
    options: &HostOptions,
    quest_id: &str,
    proof: &Proof,
    witness: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = load_or_create_engine(options)?;
    let quest_id = QuestId::from(quest_id);
    let mut events = engine.start(now());

    engine.begin_quest(&quest_id, now())?;

    if let Some(code) = witness {
        let requested_at = now();
        engine.request_peer_confirmation(code, requested_at)?;
        if !json {
            println!("Witness request sent to {}. Awaiting confirmation...", code.trim());
        }
        let deadline = engine.attester().deadline(requested_at);
        drive(&mut engine, deadline, &mut events, |e| {
            !e.session().witness().is_pending()
        });
    }

    let receipt = engine.submit_proof(proof, now())?;
    if !json {
        println!("Transmitting proof...");
    }
    drive(&mut engine, receipt.resolves_at, &mut events, |e| {
        !e.session().submission_in_flight()
    });

    print_events(&events, json)
}

/// Seal a reflection, or postpone the prompt when no text is given.
pub fn cmd_reflect(
    options: &HostOptions,
    quest_id: &str,
    text: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = load_or_create_engine(options)?;
    let now = now();

    let Some(text) = text else {
        let notice = engine.dismiss_reflection(now);
        if json {
            println!("{}", serde_json::json!({ "notice": notice }));
        } else {
            println!("{notice}");
        }
        return Ok(());
    };

    let outcome = engine.submit_reflection(&QuestId::from(quest_id), text, now)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "Reflection sealed. +{} XP (total {}).",
        engine.config().reflection_bonus,
        outcome.stats.experience
    );
    if outcome.levels_gained > 0 {
        println!("Ascension! You reached level {}.", outcome.stats.level);
    }
    if let Some(next) = outcome.next_due {
        println!("Another reflection awaits: \"{}\" [{}]", next.title, next.quest_id);
    }
    Ok(())
}

/// List every completion record with its reflection state.
pub fn cmd_reflections(options: &HostOptions, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let engine = load_or_create_engine(options)?;
    let now = now();
    let completions = engine.completions();

    let rows: Vec<_> = completions
        .iter()
        .map(|(id, record)| {
            let state = if record.reflection_completed {
                "sealed"
            } else if record.is_reflection_due(now) {
                "due"
            } else {
                "pending"
            };
            (id, record, state)
        })
        .collect();

    if json {
        let output: Vec<_> = rows
            .iter()
            .map(|(id, record, state)| {
                serde_json::json!({
                    "questId": id,
                    "title": record.title,
                    "state": state,
                    "reflectionDueTime": record.reflection_due_time,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No verified quests yet.");
        return Ok(());
    }
    for (id, record, state) in rows {
        match state {
            "pending" => println!(
                "{} [{}]: due in {}",
                record.title,
                id,
                format_countdown(now.millis_until(record.reflection_due_time))
            ),
            _ => println!("{} [{}]: {}", record.title, id, state),
        }
    }
    Ok(())
}

/// Write the persisted profile as JSON.
pub fn cmd_export(options: &HostOptions, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let engine = load_or_create_engine(options)?;
    let profile = engine.profile();
    std::fs::write(output, serde_json::to_string_pretty(&profile)?)?;
    println!("Exported profile to {}", output.display());
    Ok(())
}
