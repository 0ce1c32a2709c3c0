use std::{fs, process::Command};

#[test]
fn short_skirmish_exits_cleanly() {
    let status = Command::new(env!("CARGO_BIN_EXE_bastion"))
        .args(["--ticks", "120", "--seed", "9"])
        .env("RUST_LOG", "warn")
        .status()
        .expect("failed to launch bastion binary");

    assert!(status.success(), "bastion --ticks 120 should succeed");
}

#[test]
fn scenario_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("bastion-scenario-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
        [projectiles]
        capacity = 16

        [creeps]
        count = 5

        [[towers]]
        x = 200.0
        y = 300.0
        kind = "missile"
        damage = 15.0
        range = 200.0
        fire_interval = 10.0
        "#,
    )
    .expect("write scenario");

    let status = Command::new(env!("CARGO_BIN_EXE_bastion"))
        .arg("--config")
        .arg(&path)
        .args(["--ticks", "300"])
        .env("RUST_LOG", "warn")
        .status()
        .expect("failed to launch bastion binary");
    let _ = fs::remove_file(&path);

    assert!(status.success(), "bastion should accept a valid scenario");
}

#[test]
fn invalid_scenario_is_reported() {
    let path = std::env::temp_dir().join(format!("bastion-invalid-{}.toml", std::process::id()));
    fs::write(&path, "[projectiles]\ncapacity = 0\n").expect("write scenario");

    let output = Command::new(env!("CARGO_BIN_EXE_bastion"))
        .arg("--config")
        .arg(&path)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch bastion binary");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("projectiles.capacity"), "stderr: {stderr}");
}
