//! Binary tests: run `bale` the way a user would.

mod common;

use assert_cmd::Command;
use common::{BROWSER_CONFIG, Project};
use predicates::prelude::*;

fn bale(project: &Project) -> Command {
    let mut cmd = Command::cargo_bin("bale").unwrap();
    cmd.current_dir(project.root())
        .env_remove("NODE_ENV")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn build_development() {
    let project = Project::new(BROWSER_CONFIG);

    bale(&project)
        .arg("build")
        .assert()
        .success()
        .stderr(predicate::str::contains("development mode"))
        .stderr(predicate::str::contains("Built 1 target(s)"));

    let bundle = project.read("dist/bundle.js");
    assert!(bundle.contains("global.App = factory()"));
    assert!(bundle.contains("if (\"development\" !== 'production') {"));
    assert!(bundle.contains("    // development only"));
    assert!(!bundle.contains("style.css"));
    assert!(bundle.ends_with("//# sourceMappingURL=bundle.js.map\n"));

    assert!(project.path("dist/bundle.js.map").exists());
    assert_eq!(project.read("dist/bundle.css"), "body {\n  margin: 0;\n}\n");
}

#[test]
fn build_production_from_mode_flag() {
    let project = Project::new(BROWSER_CONFIG);

    bale(&project)
        .args(["build", "--mode", "production"])
        .assert()
        .success()
        .stderr(predicate::str::contains("production mode"));

    let bundle = project.read("dist/bundle.js");
    assert!(bundle.contains("if (\"production\" !== 'production') {"));
    assert!(!bundle.contains("// development only"));
    assert!(!bundle.contains("sourceMappingURL"));
    assert!(!project.path("dist/bundle.js.map").exists());
}

#[test]
fn build_production_from_node_env() {
    let project = Project::new(BROWSER_CONFIG);

    bale(&project)
        .env("NODE_ENV", "production")
        .arg("build")
        .assert()
        .success();

    assert!(!project.path("dist/bundle.js.map").exists());
}

#[test]
fn mode_flag_beats_node_env() {
    let project = Project::new(BROWSER_CONFIG);

    bale(&project)
        .env("NODE_ENV", "production")
        .args(["build", "--mode", "development"])
        .assert()
        .success();

    assert!(project.path("dist/bundle.js.map").exists());
}

#[test]
fn build_with_cwd_and_explicit_config() {
    let project = Project::new("input = \"nope.js\"\n");
    std::fs::create_dir_all(project.path("configs")).unwrap();
    std::fs::write(project.path("configs/app.toml"), BROWSER_CONFIG).unwrap();

    let mut cmd = Command::cargo_bin("bale").unwrap();
    cmd.env_remove("NODE_ENV")
        .args(["--quiet", "build", "--config", "configs/app.toml", "--cwd"])
        .arg(project.root())
        .assert()
        .success();

    assert!(project.path("dist/bundle.js").exists());
}

#[test]
fn quiet_build_prints_nothing() {
    let project = Project::new(BROWSER_CONFIG);

    bale(&project)
        .args(["--quiet", "build"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert!(project.path("dist/bundle.js").exists());
}

#[test]
fn quiet_still_reports_errors() {
    let project = Project::new("[output]\nfile = \"dist/bundle.js\"\nformat = \"esm\"\n");

    bale(&project)
        .args(["--quiet", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field `input`"));
}

#[test]
fn check_reports_plugins() {
    let project = Project::new(BROWSER_CONFIG);

    bale(&project)
        .args(["check", "--mode", "production"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid!"))
        .stderr(predicate::str::contains("plugins: replace, css, minify"));

    assert!(!project.path("dist").exists());
}

#[test]
fn check_missing_input() {
    let project = Project::new("[output]\nfile = \"dist/bundle.js\"\nformat = \"esm\"\n");

    bale(&project)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field `input`"));
}

#[test]
fn check_umd_without_name() {
    let project = Project::new(
        "input = \"src/main.js\"\n[output]\nfile = \"dist/bundle.js\"\nformat = \"umd\"\n",
    );

    bale(&project)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn check_missing_entry_file() {
    let project = Project::new(
        "input = \"src/gone.js\"\n[output]\nfile = \"dist/bundle.js\"\nformat = \"esm\"\n",
    );

    bale(&project)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry module not found"));
}

#[test]
fn unknown_plugin_lists_registered_ones() {
    let project = Project::new(
        "input = \"src/main.js\"\nplugins = [\"babel\"]\n\
         [output]\nfile = \"dist/bundle.js\"\nformat = \"esm\"\n",
    );

    bale(&project)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown plugin `babel`"))
        .stderr(predicate::str::contains("banner, css, minify, replace, serve"));

    assert!(!project.path("dist").exists());
}

#[test]
fn no_config_found() {
    let project = Project::new("");
    std::fs::remove_file(project.path("bale.toml")).unwrap();

    bale(&project)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no bale.toml"));
}

#[test]
fn verbose_and_quiet_conflict() {
    let project = Project::new(BROWSER_CONFIG);

    bale(&project)
        .args(["build", "--verbose", "--quiet"])
        .assert()
        .failure();
}
