use std::io::Write;

use assert_cmd::Command;

fn write_csv(path: &std::path::Path) {
    let mut f = std::fs::File::create(path).unwrap();
    writeln!(f, "Date,Ticker,Open,High,Low,Close,Volume,Dividends,Stock Splits").unwrap();
    let mut close = 100.0;
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    for i in 0..40 {
        let date = start + chrono::Duration::days(i);
        if date.format("%u").to_string().parse::<u32>().unwrap() > 5 {
            continue;
        }
        close += 0.25;
        writeln!(
            f,
            "{date},AAA,{close},{close},{close},{close},1000000,0,1"
        )
        .unwrap();
    }
}

fn write_strategy_file(path: &std::path::Path) {
    let mut f = std::fs::File::create(path).unwrap();
    write!(
        f,
        r#"[{{"strategy_id":"only","plugin":"equal_weight","rebalance":{{"frequency":"monthly"}}}}]"#
    )
    .unwrap();
}

#[test]
fn full_run_produces_every_artifact_and_exits_zero() {
    let dir = std::env::temp_dir().join(format!("sim-cli-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let data_path = dir.join("data.csv");
    let strategy_path = dir.join("strategies.json");
    let output_dir = dir.join("out");
    write_csv(&data_path);
    write_strategy_file(&strategy_path);

    let mut cmd = Command::cargo_bin("simrun").unwrap();
    cmd.args([
        "--data-path",
        data_path.to_str().unwrap(),
        "--start-date",
        "2020-01-02",
        "--end-date",
        "2020-02-10",
        "--initial-capital",
        "10000",
        "--strategy-file",
        strategy_path.to_str().unwrap(),
        "--output-dir",
        output_dir.to_str().unwrap(),
    ]);
    cmd.assert().success();

    for name in [
        "daily_equity.csv",
        "trades.csv",
        "annual_summary.csv",
        "terminal_summary.csv",
        "run_manifest.json",
    ] {
        assert!(output_dir.join(name).exists(), "missing artifact {name}");
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_strategy_field_exits_with_config_error_code() {
    let dir = std::env::temp_dir().join(format!("sim-cli-e2e-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let data_path = dir.join("data.csv");
    let strategy_path = dir.join("strategies.json");
    let output_dir = dir.join("out");
    write_csv(&data_path);
    std::fs::write(
        &strategy_path,
        r#"[{"strategy_id":"only","plugin":"equal_weight","rebalance":{"frequency":"monthly"},"bogus":1}]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("simrun").unwrap();
    cmd.args([
        "--data-path",
        data_path.to_str().unwrap(),
        "--start-date",
        "2020-01-02",
        "--end-date",
        "2020-02-10",
        "--initial-capital",
        "10000",
        "--strategy-file",
        strategy_path.to_str().unwrap(),
        "--output-dir",
        output_dir.to_str().unwrap(),
    ]);
    cmd.assert().code(1);

    let _ = std::fs::remove_dir_all(&dir);
}
