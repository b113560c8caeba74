//! Integration tests for Questline CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use questline::cli::{
    HostOptions, build_proof, cmd_export, cmd_init, cmd_quest, cmd_reflect, cmd_reflections,
    cmd_status, cmd_submit, load_or_create_engine,
};
use questline_core::{Proof, QuestId};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Config with every delay at zero and a witness that always confirms.
fn create_instant_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.json");
    let content = r#"{
        "verification_delay_ms": 0,
        "display_delay_ms": 0,
        "reflection_delay_ms": 0,
        "witness_min_delay_ms": 0,
        "witness_max_delay_ms": 0,
        "witness_success_percent": 100
    }"#;
    std::fs::write(&path, content).unwrap();
    path
}

/// Initialized store plus instant config.
fn setup(dir: &TempDir, backend: &str) -> HostOptions {
    let db_path = dir.path().join(format!("questline.{backend}"));
    cmd_init(&db_path, backend, false).unwrap();
    let mut options = HostOptions::new(db_path, backend);
    options.config_path = Some(create_instant_config(dir));
    options.witness_seed = Some(7);
    options
}

fn resonant_text() -> String {
    format!("{} Breathing slowly, I found peace and calm.", "x".repeat(150))
}

// =============================================================================
// INIT COMMAND TESTS
// =============================================================================

#[test]
fn test_init_creates_file_store() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("test.db");

    let result = cmd_init(&db_path, "file", false);
    assert!(result.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_init_creates_redb_store() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("test.redb");

    let result = cmd_init(&db_path, "redb", false);
    assert!(result.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_init_fails_if_exists_without_force() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("test.db");

    cmd_init(&db_path, "file", false).unwrap();
    let result = cmd_init(&db_path, "file", false);
    assert!(result.is_err());
}

#[test]
fn test_init_succeeds_with_force() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("test.db");

    cmd_init(&db_path, "file", false).unwrap();
    let result = cmd_init(&db_path, "file", true);
    assert!(result.is_ok());
}

#[test]
fn test_init_unknown_backend() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("test.db");

    let result = cmd_init(&db_path, "sqlite", false);
    assert!(result.is_err());
}

// =============================================================================
// STATUS / QUEST COMMAND TESTS
// =============================================================================

#[test]
fn test_status_fresh_store() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    assert!(cmd_status(&options, false).is_ok());
    assert!(cmd_status(&options, true).is_ok());
}

#[test]
fn test_quest_shows_offered() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    assert!(cmd_quest(&options, false).is_ok());
    assert!(cmd_quest(&options, true).is_ok());
}

#[test]
fn test_missing_store_file_starts_empty() {
    let temp = create_temp_dir();
    let options = HostOptions::new(temp.path().join("never-created.db"), "file");

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().experience, 0);
    assert!(engine.completions().is_empty());
}

#[test]
fn test_truncated_store_falls_back_to_defaults() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");
    cmd_submit(&options, "meditate01", &Proof::text(resonant_text()), None, false).unwrap();

    let bytes = std::fs::read(&options.db_path).unwrap();
    std::fs::write(&options.db_path, &bytes[..3]).unwrap();

    assert!(cmd_status(&options, false).is_ok());
    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().experience, 0);
    assert!(engine.completions().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp = create_temp_dir();
    let mut options = setup(&temp, "file");
    let bad = temp.path().join("bad.json");
    std::fs::write(&bad, r#"{"witness_min_delay_ms": 9000, "witness_max_delay_ms": 10}"#).unwrap();
    options.config_path = Some(bad);

    assert!(cmd_status(&options, false).is_err());
}

// =============================================================================
// SUBMIT COMMAND TESTS
// =============================================================================

#[test]
fn test_submit_passing_text_proof() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    let proof = Proof::text(resonant_text());
    cmd_submit(&options, "meditate01", &proof, None, false).unwrap();

    let engine = load_or_create_engine(&options).unwrap();
    let stats = engine.stats();
    assert_eq!(stats.experience, 100);
    assert_eq!(stats.level, 2);
    assert_eq!(stats.verified_quest_count, 1);
    assert!(
        engine
            .cooldowns()
            .expiry(&QuestId::from("meditate01"))
            .is_some()
    );
    assert!(
        engine
            .completions()
            .get(&QuestId::from("meditate01"))
            .is_some()
    );
}

#[test]
fn test_submit_rejected_proof_changes_nothing() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    let proof = Proof::text("too brief");
    cmd_submit(&options, "meditate01", &proof, None, true).unwrap();

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().experience, 0);
    assert!(engine.completions().is_empty());
    assert!(engine.cooldowns().is_empty());
}

#[test]
fn test_submit_wrong_quest_fails() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    let result = cmd_submit(&options, "fear01", &Proof::text(resonant_text()), None, false);
    assert!(result.is_err());
}

#[test]
fn test_submit_with_witness_passes_empty_proof() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    cmd_submit(&options, "meditate01", &Proof::empty(), Some("friend"), false).unwrap();

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().verified_quest_count, 1);
}

#[test]
fn test_submit_blank_witness_code_fails() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    let result = cmd_submit(&options, "meditate01", &Proof::empty(), Some("  "), false);
    assert!(result.is_err());
}

#[test]
fn test_submit_image_for_second_quest() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");
    cmd_submit(&options, "meditate01", &Proof::text(resonant_text()), None, false).unwrap();

    let image = temp.path().join("sigil.png");
    std::fs::write(&image, [0u8; 64]).unwrap();
    let proof = build_proof(None, Some(&image), None).unwrap();
    assert_eq!(proof.attachment.as_ref().map(|a| a.size_bytes), Some(64));

    cmd_submit(&options, "sigil01", &proof, None, false).unwrap();

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().experience, 180);
    assert_eq!(engine.completions().len(), 2);
}

#[test]
fn test_build_proof_missing_image_fails() {
    let temp = create_temp_dir();
    let missing = temp.path().join("missing.png");
    assert!(build_proof(None, Some(&missing), None).is_err());
}

// =============================================================================
// REFLECTION COMMAND TESTS
// =============================================================================

#[test]
fn test_reflect_seals_and_awards_bonus() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");
    cmd_submit(&options, "meditate01", &Proof::text(resonant_text()), None, false).unwrap();

    let reflection = "The silence taught me that my thoughts pass like weather.";
    cmd_reflect(&options, "meditate01", Some(reflection), false).unwrap();

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().experience, 125);
    let completions = engine.completions();
    let record = completions.get(&QuestId::from("meditate01")).unwrap();
    assert!(record.reflection_completed);

    // Sealed once.
    assert!(cmd_reflect(&options, "meditate01", Some(reflection), false).is_err());
}

#[test]
fn test_reflect_too_short_fails() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");
    cmd_submit(&options, "meditate01", &Proof::text(resonant_text()), None, false).unwrap();

    let result = cmd_reflect(&options, "meditate01", Some("short"), false);
    assert!(result.is_err());

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().experience, 100);
}

#[test]
fn test_reflect_without_text_postpones() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    assert!(cmd_reflect(&options, "meditate01", None, false).is_ok());
    assert!(cmd_reflect(&options, "meditate01", None, true).is_ok());
}

#[test]
fn test_reflect_unknown_quest_fails() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");

    let result = cmd_reflect(&options, "nature01", Some(&"r".repeat(80)), false);
    assert!(result.is_err());
}

#[test]
fn test_reflections_listing() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");
    assert!(cmd_reflections(&options, false).is_ok());

    cmd_submit(&options, "meditate01", &Proof::text(resonant_text()), None, false).unwrap();
    assert!(cmd_reflections(&options, false).is_ok());
    assert!(cmd_reflections(&options, true).is_ok());
}

// =============================================================================
// EXPORT / BACKEND TESTS
// =============================================================================

#[test]
fn test_export_profile_json() {
    let temp = create_temp_dir();
    let options = setup(&temp, "file");
    cmd_submit(&options, "meditate01", &Proof::text(resonant_text()), None, false).unwrap();

    let output = temp.path().join("profile.json");
    cmd_export(&options, &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["stats"]["experience"], 100);
    assert_eq!(json["stats"]["verifiedQuestCount"], 1);
    assert!(json["completions"]["meditate01"].is_object());
    assert!(json["cooldowns"]["meditate01"].is_u64());
}

#[test]
fn test_redb_backend_persists_progress() {
    let temp = create_temp_dir();
    let options = setup(&temp, "redb");

    cmd_submit(&options, "meditate01", &Proof::text(resonant_text()), None, false).unwrap();

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().verified_quest_count, 1);
}

#[test]
fn test_custom_quest_catalog() {
    let temp = create_temp_dir();
    let mut options = setup(&temp, "file");
    let quests = temp.path().join("quests.json");
    std::fs::write(
        &quests,
        r#"[{
            "id": "walk01",
            "title": "Walk",
            "description": "Take a walk.",
            "objective": "Describe the walk you recorded.",
            "proofType": "video",
            "experienceReward": 40
        }]"#,
    )
    .unwrap();
    options.quests_path = Some(quests);

    let proof = build_proof(None, None, Some("Twenty minutes along the river at dusk.".into())).unwrap();
    cmd_submit(&options, "walk01", &proof, None, false).unwrap();

    let engine = load_or_create_engine(&options).unwrap();
    assert_eq!(engine.stats().experience, 40);
}
