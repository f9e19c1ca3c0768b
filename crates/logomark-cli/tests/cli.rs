use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;

fn command(temp: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("logomark");
    cmd.env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env("XDG_DATA_HOME", temp.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn run_raw(temp: &TempDir, db_path: &Path, args: &[&str]) -> Output {
    command(temp)
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(temp: &TempDir, db_path: &Path, args: &[&str]) -> String {
    let output = run_raw(temp, db_path, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(temp: &TempDir, db_path: &Path, args: &[&str]) -> Value {
    let output = command(temp)
        .args(["--db-path", db_path.to_str().expect("db path"), "--json"])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

#[test]
fn domain_uses_known_names_and_compaction() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    assert_eq!(run_cmd(&temp, &db_path, &["domain", "PwC"]).trim(), "pwc.com");
    assert_eq!(
        run_cmd(&temp, &db_path, &["domain", "Acme Widgets"]).trim(),
        "acmewidgets.com"
    );
    assert_eq!(run_cmd(&temp, &db_path, &["domain", "   "]).trim(), "no domain");
}

#[test]
fn institution_domains_list_every_guess() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    let report = run_cmd_json(&temp, &db_path, &["domain", "--institution", "Springfield"]);
    assert_eq!(report["kind"], "institution");
    let domains: Vec<&str> = report["domains"]
        .as_array()
        .expect("array")
        .iter()
        .map(|domain| domain["value"].as_str().expect("value"))
        .collect();
    assert_eq!(
        domains,
        vec!["springfield.edu", "springfield.ac.uk", "springfield.com"]
    );
}

#[test]
fn urls_follow_the_provider_cascade() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    let items = run_cmd_json(&temp, &db_path, &["urls", "PwC"]);
    let items = items.as_array().expect("array");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["url"], "https://logo.clearbit.com/pwc.com");
    assert_eq!(items[1]["url"], "https://logo.uplead.com/pwc.com");
    assert_eq!(
        items[2]["url"],
        "https://www.google.com/s2/favicons?domain=pwc.com&sz=128"
    );
}

#[test]
fn cache_set_get_list_remove_flow() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    run_cmd(
        &temp,
        &db_path,
        &["cache", "set", "PwC", "https://cdn.example/pwc.png"],
    );
    run_cmd(&temp, &db_path, &["cache", "set", "Nowhere Inc", "--negative"]);

    let entry = run_cmd_json(&temp, &db_path, &["cache", "get", "  pwc "]);
    assert_eq!(entry["key"], "pwc");
    assert_eq!(entry["url"], "https://cdn.example/pwc.png");
    assert_eq!(entry["fresh"], true);

    let list = run_cmd_json(&temp, &db_path, &["cache", "ls"]);
    let items = list.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["key"], "nowhere inc");
    assert!(items[0]["url"].is_null());

    run_cmd(&temp, &db_path, &["cache", "rm", "PwC"]);
    let missing = run_raw(&temp, &db_path, &["cache", "get", "PwC"]);
    assert_eq!(missing.status.code(), Some(2));

    let cleared = run_cmd_json(&temp, &db_path, &["cache", "clear"]);
    assert_eq!(cleared["removed"], 1);
}

#[test]
fn cache_set_rejects_invalid_urls() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    let output = run_raw(&temp, &db_path, &["cache", "set", "PwC", "ftp://x/logo.png"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn prune_keeps_fresh_entries() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    run_cmd(
        &temp,
        &db_path,
        &["cache", "set", "PwC", "https://cdn.example/pwc.png"],
    );
    let pruned = run_cmd_json(&temp, &db_path, &["cache", "prune"]);
    assert_eq!(pruned["removed"], 0);
    let list = run_cmd_json(&temp, &db_path, &["cache", "ls", "--fresh"]);
    assert_eq!(list.as_array().expect("array").len(), 1);
}

#[test]
fn resolve_serves_cache_hits_without_probing() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    run_cmd(
        &temp,
        &db_path,
        &["cache", "set", "PwC", "https://cdn.example/pwc.png"],
    );
    let out = run_cmd(&temp, &db_path, &["resolve", "PwC"]);
    assert_eq!(out.trim(), "https://cdn.example/pwc.png");

    let report = run_cmd_json(&temp, &db_path, &["resolve", "pwc"]);
    assert_eq!(report["cached"], true);
    assert_eq!(report["display"]["kind"], "image");
    assert!(report["attempts"].as_array().expect("array").is_empty());
}

#[test]
fn resolve_negative_hits_show_fallback() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    run_cmd(&temp, &db_path, &["cache", "set", "Acme Widgets", "--negative"]);
    let report = run_cmd_json(&temp, &db_path, &["resolve", "Acme Widgets"]);
    assert_eq!(report["display"]["kind"], "fallback");
    assert_eq!(report["display"]["initials"], "AW");
    assert_eq!(report["display"]["icon"], "building");
}

#[test]
fn resolve_empty_name_falls_back_to_icon() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    let out = run_cmd(&temp, &db_path, &["resolve", "--institution", ""]);
    assert_eq!(out.trim(), "fallback icon (school)");

    let report = run_cmd_json(&temp, &db_path, &["resolve", ""]);
    assert_eq!(report["cached"], false);
    assert_eq!(report["display"]["kind"], "fallback");
    assert!(report["attempts"].as_array().expect("array").is_empty());

    let list = run_cmd_json(&temp, &db_path, &["cache", "ls"]);
    assert!(list.as_array().expect("array").is_empty());
}

#[test]
fn resolve_unresolvable_name_is_not_cached() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");

    let report = run_cmd_json(&temp, &db_path, &["resolve", "ab"]);
    assert_eq!(report["cached"], false);
    assert_eq!(report["display"]["initials"], "A");
    let list = run_cmd_json(&temp, &db_path, &["cache", "ls"]);
    assert!(list.as_array().expect("array").is_empty());
}

#[test]
fn config_known_names_extend_the_resolver() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");
    let config_dir = temp.path().join("config").join("logomark");
    fs::create_dir_all(&config_dir).expect("config dir");
    let config_path = config_dir.join("config.toml");
    fs::write(
        &config_path,
        "[providers]\ntiers = 1\n\n[known_names]\n\"globex\" = \"globex.example\"\n",
    )
    .expect("write config");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))
            .expect("chmod");
    }

    assert_eq!(
        run_cmd(&temp, &db_path, &["domain", "Globex"]).trim(),
        "globex.example"
    );
    let items = run_cmd_json(&temp, &db_path, &["urls", "Globex"]);
    assert_eq!(items.as_array().expect("array").len(), 1);
}

#[test]
fn memory_mode_does_not_touch_the_database() {
    let temp = TempDir::new().expect("temp dir");
    let output = command(&temp)
        .args(["--memory", "--json", "cache", "ls"])
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let list: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert!(list.as_array().expect("array").is_empty());
    assert!(!temp.path().join("data").exists());
}
