// # gddns - one-shot dynamic DNS updater
//
// This binary is a THIN integration layer:
// 1. Reading the config path from the command line
// 2. Reading runtime settings from environment variables
// 3. Loading the configuration file
// 4. Wiring the REST provider and HTTP IP source into the Reconciler
// 5. Printing the outcome line on stdout
//
// Selection, comparison and retry logic live in gddns-core.
//
// ## Usage
//
// ```bash
// gddns ./conf.json
// ```
//
// ## Environment
//
// - `GDDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `GDDNS_ERROR_MODE`: strict, permissive (default: strict)
// - `GDDNS_DRY_RUN`: true/false (default: false)
//
// Logs go to stderr. Stdout carries only the outcome line:
// `ip is:<ip>` or `new ip is:<ip>`.

use anyhow::Result;
use gddns_core::{Configuration, ErrorMode, Reconciler, ReconcilerSettings};
use gddns_ip_http::HttpIpSource;
use gddns_provider_rest::RestProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GddnsExitCode {
    /// Record was current or has been updated
    Success = 0,
    /// Configuration or startup error
    ConfigError = 1,
    /// A pipeline step failed
    RuntimeError = 2,
    /// Missing command-line argument (EX_USAGE)
    UsageError = 64,
}

impl From<GddnsExitCode> for ExitCode {
    fn from(code: GddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Runtime settings taken from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    log_level: Level,
    error_mode: ErrorMode,
    dry_run: bool,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = match lookup("GDDNS_LOG_LEVEL") {
            Some(level) => parse_log_level(&level)?,
            None => Level::INFO,
        };

        let error_mode = match lookup("GDDNS_ERROR_MODE") {
            Some(mode) => mode.parse()?,
            None => ErrorMode::default(),
        };

        let dry_run = match lookup("GDDNS_DRY_RUN") {
            Some(flag) => parse_flag("GDDNS_DRY_RUN", &flag)?,
            None => false,
        };

        Ok(Self {
            log_level,
            error_mode,
            dry_run,
        })
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "GDDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be true or false. Got: {}", name, value),
    }
}

/// Load the configuration according to the error mode
///
/// Strict mode rejects unreadable or incomplete files. Permissive mode logs
/// the problem and continues with the zero-valued configuration.
fn load_config(path: &str, mode: ErrorMode) -> gddns_core::Result<Configuration> {
    match mode {
        ErrorMode::Strict => {
            let config = Configuration::load(path)?;
            config.validate()?;
            Ok(config)
        }
        ErrorMode::Permissive => Ok(Configuration::load_or_default(path)),
    }
}

/// Usage text printed on stderr when the config path is missing
const USAGE: &str = "usage: gddns PATH_TO_CONFJSON\nexample: gddns ./conf.json";

/// Take the config path from the command line (program name first)
fn config_path_from_args(
    mut args: impl Iterator<Item = String>,
) -> std::result::Result<String, GddnsExitCode> {
    match args.nth(1) {
        Some(path) => Ok(path),
        None => {
            eprintln!("{}", USAGE);
            Err(GddnsExitCode::UsageError)
        }
    }
}

fn main() -> ExitCode {
    let config_path = match config_path_from_args(env::args()) {
        Ok(path) => path,
        Err(code) => return code.into(),
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return GddnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return GddnsExitCode::ConfigError.into();
    }

    let config = match load_config(&config_path, settings.error_mode) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return GddnsExitCode::ConfigError.into();
        }
    };

    info!("Configuration loaded from {}", config_path);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return GddnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run(&config, &settings).await {
            Ok(line) => {
                println!("{}", line);
                GddnsExitCode::Success
            }
            Err(e) => {
                error!("Update failed: {}", e);
                GddnsExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Build the components and run the reconciler once
async fn run(config: &Configuration, settings: &Settings) -> Result<String> {
    if settings.error_mode == ErrorMode::Permissive {
        warn!("Running in permissive mode - failures are logged and replaced by blank values");
    }

    let provider = RestProvider::from_config(config, settings.dry_run)?;
    let ip_source = HttpIpSource::from_config(config)?;

    let reconciler = Reconciler::new(
        Box::new(provider),
        Box::new(ip_source),
        ReconcilerSettings::from_config(config, settings.error_mode),
    );

    let outcome = reconciler.run().await?;
    Ok(outcome.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn settings_default_to_strict_live_info() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            settings,
            Settings {
                log_level: Level::INFO,
                error_mode: ErrorMode::Strict,
                dry_run: false,
            }
        );
    }

    #[test]
    fn settings_read_all_variables() {
        let settings = Settings::from_lookup(lookup(&[
            ("GDDNS_LOG_LEVEL", "DEBUG"),
            ("GDDNS_ERROR_MODE", "permissive"),
            ("GDDNS_DRY_RUN", "true"),
        ]))
        .unwrap();

        assert_eq!(settings.log_level, Level::DEBUG);
        assert_eq!(settings.error_mode, ErrorMode::Permissive);
        assert!(settings.dry_run);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(Settings::from_lookup(lookup(&[("GDDNS_LOG_LEVEL", "loud")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("GDDNS_ERROR_MODE", "lenient")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("GDDNS_DRY_RUN", "maybe")])).is_err());
    }

    #[test]
    fn exit_codes() {
        assert_eq!(GddnsExitCode::Success as u8, 0);
        assert_eq!(GddnsExitCode::ConfigError as u8, 1);
        assert_eq!(GddnsExitCode::RuntimeError as u8, 2);
        assert_eq!(GddnsExitCode::UsageError as u8, 64);
    }

    #[test]
    fn missing_config_argument_is_usage_error() {
        let args = vec!["gddns".to_string()];
        assert_eq!(
            config_path_from_args(args.into_iter()),
            Err(GddnsExitCode::UsageError)
        );
        assert!(USAGE.contains("example: gddns ./conf.json"));
    }

    #[test]
    fn first_argument_is_config_path() {
        let args = ["gddns", "./conf.json", "ignored"].map(String::from);
        assert_eq!(
            config_path_from_args(args.into_iter()),
            Ok("./conf.json".to_string())
        );
    }

    #[test]
    fn core_errors_carry_their_message_into_anyhow() {
        let err: anyhow::Error = load_config("/nonexistent/gddns.json", ErrorMode::Strict)
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn strict_load_rejects_missing_file() {
        assert!(load_config("/nonexistent/gddns.json", ErrorMode::Strict).is_err());
    }

    #[test]
    fn permissive_load_falls_back_to_blank_config() {
        let config = load_config("/nonexistent/gddns.json", ErrorMode::Permissive).unwrap();
        assert!(config.api_base_url.is_empty());
        assert!(config.zone_name.is_empty());
    }

    #[test]
    fn strict_load_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"URL":"https://dns.example.net/api/zones","TOKEN":"t","SECRET":"s","ZONE":"","DOMAIN_NAME":"home.example.com","TTL":300}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert!(load_config(&path, ErrorMode::Strict).is_err());
        assert_eq!(
            load_config(&path, ErrorMode::Permissive).unwrap().ttl,
            300
        );
    }
}
