use std::io::Write;
use std::time::Duration;

use scrim_coordinator::{config::GlobalConfig, AppError};

fn sample_toml() -> String {
    r#"
http_port = 8080

[platform]
api_base = "https://chat.example/api/v10/"
guild_id = "G1"
category_id = "CAT"
moderator_role_id = "MOD"
penalty_role_id = "PENALTY"
mod_log_channel_id = "LOG"

[backend]
url = "https://backend.example"

[timeouts]
ready_check_seconds = 45
captain_seconds = 20
host_seconds = 25
report_window_seconds = 300
temp_channel_hours = 3

[bans]
table_minutes = [1, 2]
escalation_base_minutes = 15
reset_hour_utc = 4
reset_minute_utc = 30

[[modes]]
lobby_channel = "Ranked 2v2"
label = "Ranked 2v2"
team_size = 2
penalties = true
ready_check = true

[[modes]]
lobby_channel = "1v1"
label = "1v1"
team_size = 1
"#
    .to_owned()
}

fn minimal_toml() -> String {
    r#"
[platform]
guild_id = "G1"
penalty_role_id = "PENALTY"

[backend]
url = "https://backend.example"

[[modes]]
lobby_channel = "Casual 3v3"
label = "3v3"
team_size = 3
"#
    .to_owned()
}

#[test]
fn parses_full_config() {
    let config = GlobalConfig::from_toml_str(&sample_toml()).expect("config parses");

    assert_eq!(config.http_port, 8080);
    assert_eq!(config.platform.guild_id, "G1");
    assert_eq!(config.platform.category_id.as_deref(), Some("CAT"));
    assert_eq!(config.platform.mod_log_channel_id.as_deref(), Some("LOG"));
    assert_eq!(config.timeouts.ready_check(), Duration::from_secs(45));
    assert_eq!(config.timeouts.captain(), Duration::from_secs(20));
    assert_eq!(config.timeouts.host(), Duration::from_secs(25));
    assert_eq!(config.timeouts.report_window(), Duration::from_secs(300));
    assert_eq!(config.timeouts.temp_channel_hours, 3);
    assert_eq!(config.bans.table_minutes, vec![1, 2]);
    assert_eq!(config.bans.escalation_base_minutes, 15);
    assert_eq!(config.modes.len(), 2);
    assert!(config.modes[0].penalties);
    assert!(config.modes[0].ready_check);
    assert!(!config.modes[1].penalties);
}

#[test]
fn minimal_config_uses_defaults() {
    let config = GlobalConfig::from_toml_str(&minimal_toml()).expect("config parses");

    assert_eq!(config.http_port, 3000);
    assert_eq!(config.platform.api_base, "https://discord.com/api/v10");
    assert!(config.platform.category_id.is_none());
    assert!(config.platform.moderator_role_id.is_none());
    assert_eq!(config.timeouts.ready_check_seconds, 30);
    assert_eq!(config.timeouts.captain_seconds, 15);
    assert_eq!(config.timeouts.host_seconds, 30);
    assert_eq!(config.timeouts.report_window_seconds, 120);
    assert_eq!(config.timeouts.temp_channel_hours, 2);
    assert_eq!(config.bans.table_minutes, vec![5, 10, 20, 30]);
    assert_eq!(config.bans.escalation_base_minutes, 60);
    assert_eq!(config.bans.reset_hour_utc, 0);
    assert_eq!(config.bans.reset_minute_utc, 0);
}

#[test]
fn secrets_are_never_read_from_toml() {
    let raw = minimal_toml().replace(
        "penalty_role_id = \"PENALTY\"",
        "penalty_role_id = \"PENALTY\"\nbot_token = \"leaked\"",
    );
    let config = GlobalConfig::from_toml_str(&raw).expect("unknown keys are ignored");

    assert!(config.platform.bot_token.is_empty());
    assert!(config.backend.api_key.is_empty());
    assert!(config.ingest_secret.is_none());
}

#[test]
fn mode_lookup_is_by_exact_lobby_name() {
    let config = GlobalConfig::from_toml_str(&sample_toml()).expect("config parses");

    let mode = config.mode_for_lobby("Ranked 2v2").expect("mode found");
    assert_eq!(mode.quorum(), 4);
    assert!(!mode.skips_captain_election());

    let duel = config.mode_for_lobby("1v1").expect("mode found");
    assert_eq!(duel.quorum(), 2);
    assert!(duel.skips_captain_election());

    assert!(config.mode_for_lobby("ranked 2v2").is_none());
    assert!(config.mode_for_lobby("General").is_none());
}

#[test]
fn rejects_missing_modes() {
    let raw = r#"
modes = []

[platform]
guild_id = "G1"
penalty_role_id = "PENALTY"

[backend]
url = "https://backend.example"
"#;
    let err = GlobalConfig::from_toml_str(raw).unwrap_err();
    assert_eq!(
        err,
        AppError::Config("at least one mode is required".into())
    );
}

#[test]
fn rejects_zero_team_size() {
    let raw = minimal_toml().replace("team_size = 3", "team_size = 0");
    let err = GlobalConfig::from_toml_str(&raw).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("team_size")));
}

#[test]
fn rejects_duplicate_lobby_channels() {
    let raw = format!(
        "{}\n[[modes]]\nlobby_channel = \"Casual 3v3\"\nlabel = \"other\"\nteam_size = 2\n",
        minimal_toml()
    );
    let err = GlobalConfig::from_toml_str(&raw).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("more than one mode")));
}

#[test]
fn rejects_empty_ban_table() {
    let raw = format!("{}\n[bans]\ntable_minutes = []\n", minimal_toml());
    let err = GlobalConfig::from_toml_str(&raw).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("table_minutes")));
}

#[test]
fn rejects_invalid_reset_time() {
    let raw = format!("{}\n[bans]\nreset_hour_utc = 24\n", minimal_toml());
    let err = GlobalConfig::from_toml_str(&raw).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("reset time")));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = GlobalConfig::from_toml_str("http_port = \"not a number\"").unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.starts_with("invalid config")));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(sample_toml().as_bytes()).expect("write");

    let config = GlobalConfig::load_from_path(file.path()).expect("config loads");
    assert_eq!(config.http_port, 8080);
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = GlobalConfig::load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.starts_with("failed to read config")));
}

#[test]
fn shipped_example_config_is_valid() {
    let config = GlobalConfig::from_toml_str(include_str!("../../config.example.toml"))
        .expect("example config parses");
    assert_eq!(config.modes.len(), 3);
    assert!(config.mode_for_lobby("Ranked 1v1").expect("1v1").ready_check);
    assert!(!config.mode_for_lobby("2v2").expect("casual").penalties);
}
