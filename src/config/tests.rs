use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use super::*;

fn import_args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["quire", "import"];
    argv.extend_from_slice(extra);
    argv.push("/tmp/content.toml");
    CliArgs::parse_from(argv)
}

#[test]
fn defaults_when_nothing_is_configured() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(CacheConfig::from(&settings.cache), CacheConfig::default());
    assert_eq!(settings.cache.post_list_limit, 50);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("info".to_string());
    raw.cache.enabled = Some(true);

    let overrides = RuntimeOverrides {
        log_level: Some("debug".to_string()),
        cache_enabled: Some(false),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(!settings.cache.enabled);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = RuntimeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_cache_limit_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.post_list_limit = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero limit must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.post_list_limit",
            ..
        }
    ));
}

#[test]
fn unknown_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    let err = Settings::from_raw(raw).expect_err("bad level must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn parse_import_arguments() {
    let args = CliArgs::parse_from([
        "quire",
        "import",
        "--log-level",
        "warn",
        "--cache-enabled",
        "false",
        "--out",
        "/tmp/normalized.toml",
        "/tmp/content.toml",
    ]);

    match args.command {
        Command::Import(import) => {
            assert_eq!(import.file, std::path::Path::new("/tmp/content.toml"));
            assert_eq!(
                import.out.as_deref(),
                Some(std::path::Path::new("/tmp/normalized.toml"))
            );
            assert_eq!(import.overrides.log_level.as_deref(), Some("warn"));
            assert_eq!(import.overrides.cache_enabled, Some(false));
        }
    }
}

#[test]
#[serial]
fn config_file_then_environment_then_cli() {
    let mut file = NamedTempFile::with_suffix(".toml").expect("temp config");
    writeln!(
        file,
        "[logging]\nlevel = \"error\"\n\n[cache]\npost_limit = 11\ncomment_limit = 12\n"
    )
    .expect("write config");

    // SAFETY: serialised with every other test that touches the environment.
    unsafe { std::env::set_var("QUIRE__CACHE__COMMENT_LIMIT", "21") };

    let mut args = import_args(&["--log-level", "trace"]);
    args.config_file = Some(file.path().to_path_buf());
    let result = load(&args);

    unsafe { std::env::remove_var("QUIRE__CACHE__COMMENT_LIMIT") };

    let settings = result.expect("layered settings");
    assert_eq!(settings.cache.post_limit, 11);
    assert_eq!(settings.cache.comment_limit, 21);
    assert_eq!(settings.logging.level, LevelFilter::TRACE);
}

#[test]
#[serial]
fn missing_explicit_config_file_fails() {
    let mut args = import_args(&[]);
    args.config_file = Some(PathBuf::from("/nonexistent/quire-config.toml"));

    assert!(matches!(load(&args), Err(LoadError::Build(_))));
}
