use super::*;

fn seed_account(email: &str, display_name: Option<&str>, role: Option<UserRole>) -> RawSeedAccount {
    RawSeedAccount {
        email: Some(email.to_string()),
        display_name: display_name.map(str::to_string),
        role,
    }
}

fn raw_from_toml(source: &str) -> Result<RawSettings, config::ConfigError> {
    Config::builder()
        .add_source(File::from_str(source, config::FileFormat::Toml))
        .build()?
        .try_deserialize()
}

#[test]
fn defaults_are_valid() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.database.max_connections.get(), DEFAULT_DB_MAX_CONNECTIONS);
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.ttl, Duration::from_secs(300));
    assert_eq!(settings.cache.sweep_interval, Duration::from_secs(60));
    assert_eq!(settings.cache.namespace, "caltrade");
    assert!(!settings.seed.enabled);
    assert!(settings.seed.accounts.is_empty());
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.ttl_seconds = Some(120);

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_ttl_seconds: Some(30),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.cache.ttl, Duration::from_secs(30));
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
fn invalid_values_name_their_key() {
    let mut raw = RawSettings::default();
    raw.cache.sweep_interval_seconds = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero sweep interval");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.sweep_interval_seconds",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero pool");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "database.max_connections",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn seed_accounts_are_normalized() {
    let mut raw = RawSettings::default();
    raw.seed.enabled = Some(true);
    raw.seed.accounts = vec![
        seed_account(" Admin@CalTrade.test ", Some("Site Admin"), Some(UserRole::Admin)),
        seed_account("helper@caltrade.test", None, None),
    ];

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.seed.enabled);
    assert_eq!(
        settings.seed.accounts,
        vec![
            SeedAccountSettings {
                email: "admin@caltrade.test".to_string(),
                display_name: "Site Admin".to_string(),
                role: UserRole::Admin,
            },
            SeedAccountSettings {
                email: "helper@caltrade.test".to_string(),
                display_name: "helper".to_string(),
                role: UserRole::User,
            },
        ]
    );
}

#[test]
fn seed_account_roles_deserialize_from_settings_files() {
    let raw = raw_from_toml(
        r#"
        [[seed.accounts]]
        email = "mod@caltrade.test"
        role = "moderator"

        [[seed.accounts]]
        email = "plain@caltrade.test"
        "#,
    )
    .expect("valid seed accounts");

    let settings = Settings::from_raw(raw).expect("valid settings");
    let roles: Vec<UserRole> = settings.seed.accounts.iter().map(|a| a.role).collect();
    assert_eq!(roles, vec![UserRole::Moderator, UserRole::User]);
}

#[test]
fn seed_accounts_reject_unknown_roles() {
    let err = raw_from_toml(
        r#"
        [[seed.accounts]]
        email = "a@b.test"
        role = "owner"
        "#,
    )
    .expect_err("unknown role");

    assert!(err.to_string().contains("owner"));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["caltrade"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "caltrade",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--cache-enabled",
        "false",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(serve.overrides.cache_enabled, Some(false));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_seed_arguments() {
    let args = CliArgs::parse_from(["caltrade", "seed", "--database-url", "postgres://example"]);

    match args.command.expect("seed command") {
        Command::Seed(seed) => {
            assert_eq!(
                seed.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}
