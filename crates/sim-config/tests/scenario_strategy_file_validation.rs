use std::io::Write;

use sim_config::{load_strategy_file, ConfigError};

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("sim-config-scenario-{}-{name}", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn unknown_top_level_field_is_rejected() {
    let path = write_temp(
        "unknown.json",
        r#"[{"strategy_id":"s1","plugin":"equal_weight","rebalance":{"frequency":"monthly"},"extra":true}]"#,
    );
    let err = load_strategy_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn duplicate_strategy_ids_across_two_entries_are_rejected() {
    let path = write_temp(
        "dup.json",
        r#"[
            {"strategy_id":"dup","plugin":"equal_weight","rebalance":{"frequency":"monthly"}},
            {"strategy_id":"dup","plugin":"sp500_proxy","rebalance":{"frequency":"never"}}
        ]"#,
    );
    let err = load_strategy_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateStrategyId(id) if id == "dup"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn unsupported_extension_is_rejected_before_parsing() {
    let path = write_temp("strategies.toml", "strategy_id = \"s1\"");
    let err = load_strategy_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedExtension { .. }));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn well_formed_yaml_list_loads_multiple_strategies() {
    let path = write_temp(
        "ok.yaml",
        "- strategy_id: s1\n  plugin: equal_weight\n  rebalance:\n    frequency: monthly\n\
         - strategy_id: s2\n  plugin: sp500_proxy\n  rebalance:\n    frequency: never\n",
    );
    let loaded = load_strategy_file(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].strategy_id, "s1");
    assert_eq!(loaded[1].strategy_id, "s2");
    let _ = std::fs::remove_file(&path);
}
