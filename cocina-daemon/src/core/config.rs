//! Runtime configuration
//!
//! Command line flags plus the backend credentials from the environment
//! (usually a `.env` next to the binary).

use clap::Parser;
use thiserror::Error;

use crate::printing::{
    DEFAULT_AUTO_INTERVAL_SECS, DEFAULT_MAX_ORDERS, PrinterTarget, ServiceOptions,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0} (set it in the environment or .env)")]
    MissingEnv(&'static str),
}

/// Command line surface.
#[derive(Parser, Debug)]
#[command(name = "cocina-daemon")]
#[command(about = "Prints kitchen tickets for paid POS orders")]
#[command(version)]
pub struct Args {
    /// Render and report tickets without printing or marking anything
    #[arg(long)]
    pub dry_run: bool,

    /// POS category id to print (includes child categories)
    #[arg(long, value_name = "ID")]
    pub pos_categ: Option<i64>,

    /// Max orders handled per cycle
    #[arg(long, default_value_t = DEFAULT_MAX_ORDERS, value_name = "N")]
    pub max_orders: usize,

    /// Send a printer test page and exit, no backend needed
    #[arg(long)]
    pub print_test: bool,

    /// Windows printer queue name (system default when omitted)
    #[arg(long, value_name = "NAME")]
    pub printer: Option<String>,

    /// Network printer address, `host` or `host:port` (9100 when omitted)
    #[arg(long, value_name = "ADDR", conflicts_with = "printer")]
    pub printer_addr: Option<String>,

    /// Keep running, printing pending tickets on an interval
    #[arg(long, conflicts_with = "print_test")]
    pub watch: bool,

    /// Seconds between automatic cycles in watch mode (floor 5)
    #[arg(long, default_value_t = DEFAULT_AUTO_INTERVAL_SECS, value_name = "SECS")]
    pub auto_interval: u64,

    /// Extra printed-flag write attempts after a successful print
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub commit_retries: u32,
}

/// Backend connection settings, environment only.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub db: String,
    pub username: String,
    pub password: String,
}

impl BackendConfig {
    /// Read the `ODOO_*` variables. All four are required; without them
    /// the only thing the binary can do is `--print-test`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: required_env("ODOO_URL")?,
            db: required_env("ODOO_DB")?,
            username: required_env("ODOO_USERNAME")?,
            password: required_env("ODOO_PASSWORD")?,
        })
    }
}

fn required_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

/// Everything the daemon needs to run, resolved and validated
///
/// # Environment variables
///
/// | Variable | Required | Purpose |
/// |----------|----------|---------|
/// | ODOO_URL | unless `--print-test` | Backend base URL |
/// | ODOO_DB | unless `--print-test` | Database name |
/// | ODOO_USERNAME | unless `--print-test` | Login |
/// | ODOO_PASSWORD | unless `--print-test` | Password or API key |
/// | COMANDA_LOG_DIR | no | Daily log files when set |
/// | RUST_LOG | no | Log filter override |
#[derive(Debug, Clone)]
pub struct Config {
    /// None only for `--print-test`, which never talks to the backend.
    pub backend: Option<BackendConfig>,
    pub printer_target: PrinterTarget,
    pub service: ServiceOptions,
    pub print_test: bool,
    pub watch: bool,
    /// Raw value; the worker clamps it to the floor.
    pub auto_interval_secs: u64,
    pub log_dir: Option<String>,
}

impl Config {
    /// Parse the command line and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let backend = if args.print_test {
            None
        } else {
            Some(BackendConfig::from_env()?)
        };

        let printer_target = match (args.printer_addr, args.printer) {
            (Some(addr), _) => PrinterTarget::Network(addr),
            (None, Some(name)) => PrinterTarget::Spooler(name),
            (None, None) => PrinterTarget::DefaultSpooler,
        };

        Ok(Self {
            backend,
            printer_target,
            service: ServiceOptions {
                category_id: args.pos_categ,
                max_orders: args.max_orders,
                dry_run: args.dry_run,
                commit_retries: args.commit_retries,
            },
            print_test: args.print_test,
            watch: args.watch,
            auto_interval_secs: args.auto_interval,
            log_dir: std::env::var("COMANDA_LOG_DIR").ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["cocina-daemon", "--print-test"]).unwrap();
        assert!(!args.dry_run);
        assert_eq!(args.max_orders, DEFAULT_MAX_ORDERS);
        assert_eq!(args.auto_interval, DEFAULT_AUTO_INTERVAL_SECS);
        assert_eq!(args.commit_retries, 0);
        assert!(args.pos_categ.is_none());
    }

    #[test]
    fn test_watch_conflicts_with_print_test() {
        assert!(Args::try_parse_from(["cocina-daemon", "--watch", "--print-test"]).is_err());
    }

    #[test]
    fn test_printer_flags_conflict() {
        assert!(
            Args::try_parse_from([
                "cocina-daemon",
                "--printer",
                "EPSON",
                "--printer-addr",
                "10.0.0.5"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_target_resolution() {
        let addr = Args::try_parse_from([
            "cocina-daemon",
            "--print-test",
            "--printer-addr",
            "10.0.0.5:9100",
        ])
        .unwrap();
        let config = Config::from_args(addr).unwrap();
        assert_eq!(
            config.printer_target,
            PrinterTarget::Network("10.0.0.5:9100".to_string())
        );

        let named =
            Args::try_parse_from(["cocina-daemon", "--print-test", "--printer", "EPSON"]).unwrap();
        let config = Config::from_args(named).unwrap();
        assert_eq!(
            config.printer_target,
            PrinterTarget::Spooler("EPSON".to_string())
        );

        let default = Args::try_parse_from(["cocina-daemon", "--print-test"]).unwrap();
        let config = Config::from_args(default).unwrap();
        assert_eq!(config.printer_target, PrinterTarget::DefaultSpooler);
    }

    #[test]
    fn test_print_test_skips_backend_requirement() {
        let args = Args::try_parse_from(["cocina-daemon", "--print-test"]).unwrap();
        let config = Config::from_args(args).unwrap();
        assert!(config.backend.is_none());
        assert!(config.print_test);
    }

    #[test]
    fn test_cycle_options_mapping() {
        let args = Args::try_parse_from([
            "cocina-daemon",
            "--print-test",
            "--dry-run",
            "--pos-categ",
            "12",
            "--max-orders",
            "5",
            "--commit-retries",
            "2",
        ])
        .unwrap();
        let config = Config::from_args(args).unwrap();
        assert!(config.service.dry_run);
        assert_eq!(config.service.category_id, Some(12));
        assert_eq!(config.service.max_orders, 5);
        assert_eq!(config.service.commit_retries, 2);
    }
}
