use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.public_addr.to_string(), "127.0.0.1:8000");
    assert_eq!(settings.server.admin_addr.to_string(), "127.0.0.1:8001");
    assert_eq!(settings.database.max_connections.get(), 8);
    assert!(settings.database.url.is_none());
    assert_eq!(
        settings.cache,
        CacheSettings {
            enabled: true,
            ttl_seconds: 300,
            auto_refresh_interval_seconds: 0,
        }
    );
    assert!(settings.admin.api_key.is_none());
    assert_eq!(settings.logging.level, LevelFilter::INFO);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.ttl_seconds = Some(60);

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_ttl_seconds: Some(0),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.cache.ttl_seconds, 0);
}

#[test]
fn env_aliases_override_file_values() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("postgres://from-file".to_string());
    raw.cache.enabled = Some(true);

    raw.apply_env_aliases(env(&[
        ("DATABASE_URL", "postgres://from-env"),
        ("CACHE_ENABLED", "False"),
        ("CACHE_TTL", " 120 "),
        ("ADMIN_API_KEY", "letmein"),
    ]))
    .expect("aliases apply");
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.database.url.as_deref(), Some("postgres://from-env"));
    assert!(!settings.cache.enabled);
    assert_eq!(settings.cache.ttl_seconds, 120);
    assert_eq!(settings.admin.api_key.as_deref(), Some("letmein"));
}

#[test]
fn cli_beats_env_aliases() {
    let mut raw = RawSettings::default();
    raw.apply_env_aliases(env(&[("CACHE_ENABLED", "0")]))
        .expect("aliases apply");
    raw.apply_serve_overrides(&ServeOverrides {
        cache_enabled: Some(true),
        ..Default::default()
    });

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.cache.enabled);
}

#[test]
fn malformed_env_aliases_are_rejected() {
    let mut raw = RawSettings::default();
    let err = raw
        .apply_env_aliases(env(&[("CACHE_ENABLED", "maybe")]))
        .expect_err("not a boolean");
    assert!(matches!(err, LoadError::Invalid { key: "CACHE_ENABLED", .. }));

    let err = raw
        .apply_env_aliases(env(&[("CACHE_TTL", "five minutes")]))
        .expect_err("not an integer");
    assert!(matches!(err, LoadError::Invalid { key: "CACHE_TTL", .. }));
}

#[test]
fn blank_admin_key_is_treated_as_unset() {
    let mut raw = RawSettings::default();
    raw.admin.api_key = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.admin.api_key.is_none());
}

#[test]
fn admin_key_is_redacted_in_debug_output() {
    let settings = AdminSettings {
        api_key: Some("hunter2".to_string()),
    };
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("redacted"));
}

#[test]
fn zero_pool_size_is_invalid() {
    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "database.max_connections",
            ..
        })
    ));
}

#[test]
fn shared_listener_address_is_invalid() {
    let mut raw = RawSettings::default();
    raw.server.admin_port = Some(DEFAULT_PUBLIC_PORT);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["chunt-schedule"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "chunt-schedule",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--cache-enabled",
        "false",
        "--cache-ttl-seconds",
        "-1",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(serve.overrides.cache_enabled, Some(false));
            assert_eq!(serve.overrides.cache_ttl_seconds, Some(-1));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from([
        "chunt-schedule",
        "migrate",
        "--database-url",
        "postgres://example",
    ]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(
                migrate.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}
