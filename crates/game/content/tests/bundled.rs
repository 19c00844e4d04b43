#![cfg(feature = "loaders")]

use std::fs;

use effect_content::{ContentFactory, loaders::ChainLoader};
use effect_core::effect::{EffectRequest, execute};
use effect_core::state::{Cave, PlayerTimed, Position, Source};
use effect_core::{EffectTable, EngineConfig, GameState, ProjectionTable, describe};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn shipped_tables_match_the_built_in_ones() {
    init_logging();
    let factory = ContentFactory::bundled();
    assert_eq!(factory.load_effects().unwrap(), EffectTable::standard());
    assert_eq!(factory.load_projections().unwrap(), ProjectionTable::standard());
    assert_eq!(factory.load_config().unwrap(), EngineConfig::default());
}

#[test]
fn every_shipped_chain_is_described() {
    init_logging();
    let content = ContentFactory::bundled().load_all().unwrap();
    assert!(!content.chains.is_empty());
    for (name, chain) in content.chains.iter() {
        let text = describe(chain, &content.effects, &content.projections, None, 0, false);
        assert!(text.is_some(), "{name} has no description");
    }
}

#[test]
fn loaded_chains_run_against_the_engine() {
    init_logging();
    let content = ContentFactory::bundled().load_all().unwrap();
    let chain = content.chains.get("Potion of Speed").unwrap();

    let mut state = GameState::new(Cave::new(20, 12), Position::new(5, 5), 3);
    let mut ident = false;
    let done = execute(
        content.env(),
        &mut state,
        chain,
        &EffectRequest::new(Source::Player),
        &mut ident,
        None,
    );
    assert!(done);
    assert!(state.player.timer(PlayerTimed::Fast) >= 21);
}

#[test]
fn factory_reads_a_custom_directory() {
    let dir = tempfile::tempdir().unwrap();
    let bundled = ContentFactory::bundled();
    for file in ["effects.ron", "projections.ron"] {
        fs::copy(bundled.data_dir().join(file), dir.path().join(file)).unwrap();
    }
    fs::write(dir.path().join("config.toml"), "max_swarm = 3\n").unwrap();
    fs::write(
        dir.path().join("chains.ron"),
        r#"[(name: "Test Bolt", effects: [(effect: "BOLT", subtype: "ACID", dice: "2d6")])]"#,
    )
    .unwrap();

    let content = ContentFactory::new(dir.path()).load_all().unwrap();
    assert_eq!(content.config.max_swarm, 3);
    assert_eq!(content.chains.names().collect::<Vec<_>>(), ["Test Bolt"]);
}

#[test]
fn missing_files_are_reported_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContentFactory::new(dir.path()).load_chains().unwrap_err();
    assert!(err.to_string().contains("chains.ron"));
    assert!(ChainLoader::parse("not ron").is_err());
}
