// Integration tests for `expedicao config`.
// Run with: cargo test -p expedicao-cli --test config_cli

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn expedicao() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_expedicao"));
    cmd.env_remove("EXPEDICAO_CONFIG");
    cmd
}

#[test]
fn show_prints_merged_settings_as_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "// staging\n{ \"tracking\": { \"timeoutSecs\": 3 } }\n").unwrap();

    let output = expedicao()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(0));
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["tracking"]["timeoutSecs"], 3);
    assert_eq!(
        shown["tracking"]["baseUrl"],
        "https://proxyapp.correios.com.br/v1/sro-rastro"
    );
    assert_eq!(shown["output"]["directory"], serde_json::Value::Null);
}

#[test]
fn path_echoes_explicit_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("outro.json");

    let output = expedicao()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        path.display().to_string()
    );
}
