use traffic_game::config::{SimulationConfig, Span, Validate};

#[test]
fn test_default_config_is_valid() {
    let config = SimulationConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.session.reset_delay_ms, 2_500);
    assert_eq!(config.frame_loop.fps, 60);
    assert_eq!(config.spawner.first_delay_ms, Span::new(2_800, 3_800));
    assert_eq!(config.random.seed, None);
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = SimulationConfig::from_toml_str("").expect("empty config should load");
    assert_eq!(config.playfield.width, 600.0);
    assert_eq!(config.playfield.height, 800.0);
    assert_eq!(config.display.collision_margin.left, 75.0);
}

#[test]
fn test_partial_override_keeps_other_defaults() {
    let config = SimulationConfig::from_toml_str(
        r#"
        [session]
        reset_delay_ms = 1000

        [spawner]
        speed = { min = 1.5, max = 2.0 }

        [random]
        seed = 42
        "#,
    )
    .expect("partial config should load");

    assert_eq!(config.session.reset_delay_ms, 1_000);
    assert_eq!(config.spawner.speed, Span::new(1.5, 2.0));
    assert_eq!(config.spawner.delay_ms, Span::new(3_100, 5_300));
    assert_eq!(config.random.seed, Some(42));
    assert_eq!(config.frame_loop.fps, 60);
}

#[test]
fn test_empty_span_is_rejected() {
    let err = SimulationConfig::from_toml_str(
        r#"
        [spawner]
        delay_ms = { min = 4000, max = 4000 }
        "#,
    )
    .expect_err("empty delay range should fail");

    assert!(err.to_string().contains("range is empty"), "unexpected error: {err}");
}

#[test]
fn test_non_finite_bounds_are_rejected() {
    let err = SimulationConfig::from_toml_str("[spawner]\nspeed = { min = nan, max = 2.2 }\n")
        .expect_err("nan speed bound should fail");
    assert!(err.to_string().contains("spawner.speed"), "unexpected error: {err}");

    assert!(SimulationConfig::from_toml_str("[spawner]\nacceleration = { min = 0.5, max = inf }\n").is_err());
    assert!(SimulationConfig::from_toml_str("[playfield]\nwidth = nan\n").is_err());
    assert!(SimulationConfig::from_toml_str("[playfield]\nheight = inf\n").is_err());
    assert!(SimulationConfig::from_toml_str("[display.collision_margin]\nleft = nan\n").is_err());
}

#[test]
fn test_asymmetric_collision_margin_is_accepted() {
    let config = SimulationConfig::from_toml_str(
        "[display.collision_margin]\nleft = 40.0\ntop = 30.0\nextra_width = 10.0\nextra_height = 0.0\n",
    )
    .expect("any non-negative margin should load");

    assert_eq!(config.display.collision_margin.extra_width, 10.0);
    assert!(SimulationConfig::from_toml_str("[display.collision_margin]\ntop = -1.0\n").is_err());
}

#[test]
fn test_zero_frame_rate_is_rejected() {
    let result = SimulationConfig::from_toml_str("[frame_loop]\nfps = 0\n");
    assert!(result.is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = SimulationConfig::load_or_default("definitely/not/here/game.toml")
        .expect("missing file should not be an error");
    assert_eq!(config.session.reset_delay_ms, 2_500);

    assert!(SimulationConfig::load_from_file("definitely/not/here/game.toml").is_err());
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("traffic-game-{}.toml", std::process::id()));
    std::fs::write(&path, "[playfield]\nwidth = 640.0\n").expect("write temp config");

    let loaded = SimulationConfig::load_from_file(&path);
    std::fs::remove_file(&path).ok();

    let config = loaded.expect("temp config should load");
    assert_eq!(config.playfield.width, 640.0);
    assert_eq!(config.playfield.height, 800.0);
}

#[test]
fn test_bundled_game_toml_loads() {
    let config = SimulationConfig::load_from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/game.toml"))
        .expect("bundled game.toml should load");

    assert_eq!(config.frame_loop.stats_samples, 120);
    assert_eq!(config.spawner.color_channel, Span::new(40, 240));
    assert_eq!(config.random.seed, None);
}
