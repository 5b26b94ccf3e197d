use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;
use tinylink_core::shortcode::DEFAULT_CODE_LENGTH;
use tinylink_core::{Alphabet, CodeFormat, CoreError};
use tinylink_shortener::settings::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_URL_LENGTH};
use tinylink_shortener::ServiceSettings;
use tinylink_storage::DynamoDbConfig;
use tinylink_telemetry::{LogFormat, TelemetrySettings};

pub const LISTEN_ADDR_ENV: &str = "TINYLINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "TINYLINK_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "TINYLINK_MYSQL_DSN";
pub const DYNAMODB_TABLE_ENV: &str = "URL_SHORTENER_DDB_TABLE";
pub const DYNAMODB_ENDPOINT_ENV: &str = "TINYLINK_DYNAMODB_ENDPOINT";
pub const DYNAMODB_REGION_ENV: &str = "TINYLINK_DYNAMODB_REGION";
pub const CODE_LENGTH_ENV: &str = "TINYLINK_CODE_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "TINYLINK_MAX_ATTEMPTS";
pub const MAX_URL_LENGTH_ENV: &str = "TINYLINK_MAX_URL_LENGTH";
pub const STORE_TIMEOUT_MS_ENV: &str = "TINYLINK_STORE_TIMEOUT_MS";
pub const GENERATOR_NAMESPACE_ENV: &str = "TINYLINK_GENERATOR_NAMESPACE";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "TINYLINK_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_GENERATOR_NAMESPACE: &str = "tinylink";
pub const SERVICE_NAME: &str = "tinylink-gateway";

pub fn default_public_base_url(listen_addr: SocketAddr) -> String {
    format!("http://{}", listen_addr)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
    #[value(name = "dynamodb")]
    DynamoDb,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
            StorageBackendArg::DynamoDb => write!(f, "dynamodb"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinylink-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Origin short URLs are built on. Defaults to `http://<listen_addr>`.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = DYNAMODB_TABLE_ENV, required_if_eq("storage", "dynamodb"))]
    pub dynamodb_table: Option<String>,

    /// Endpoint override, e.g. a DynamoDB Local instance.
    #[arg(long, env = DYNAMODB_ENDPOINT_ENV)]
    pub dynamodb_endpoint: Option<String>,

    #[arg(long, env = DYNAMODB_REGION_ENV)]
    pub dynamodb_region: Option<String>,

    #[arg(long, env = CODE_LENGTH_ENV, default_value_t = DEFAULT_CODE_LENGTH)]
    pub code_length: usize,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    #[arg(long, env = MAX_URL_LENGTH_ENV, default_value_t = DEFAULT_MAX_URL_LENGTH)]
    pub max_url_length: usize,

    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = DEFAULT_STORE_TIMEOUT_MS)]
    pub store_timeout_ms: u64,

    #[arg(
        long,
        env = GENERATOR_NAMESPACE_ENV,
        default_value = DEFAULT_GENERATOR_NAMESPACE,
    )]
    pub generator_namespace: String,

    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn public_base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| default_public_base_url(self.listen_addr))
    }

    pub fn code_format(&self) -> Result<CodeFormat, CoreError> {
        CodeFormat::new(Alphabet::base62(), self.code_length)
    }

    pub fn service_settings(&self) -> Result<ServiceSettings, CoreError> {
        Ok(ServiceSettings::builder()
            .max_attempts(self.max_attempts)
            .max_url_length(self.max_url_length)
            .store_timeout(Duration::from_millis(self.store_timeout_ms))
            .code_format(self.code_format()?)
            .build())
    }

    /// `None` unless a table name was given.
    pub fn dynamodb_config(&self) -> Option<DynamoDbConfig> {
        self.dynamodb_table.clone().map(|table_name| DynamoDbConfig {
            table_name,
            region: self.dynamodb_region.clone(),
            endpoint: self.dynamodb_endpoint.clone(),
        })
    }

    pub fn telemetry_settings(&self) -> TelemetrySettings {
        TelemetrySettings {
            format: self.log_format,
            otlp_endpoint: self.otlp_endpoint.clone(),
            ..TelemetrySettings::new(SERVICE_NAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        CLI::command().debug_assert();
    }

    #[test]
    fn explicit_flags_are_applied() {
        let cli = CLI::try_parse_from([
            "tinylink-gateway",
            "--listen-addr",
            "0.0.0.0:9000",
            "--code-length",
            "9",
            "--max-attempts",
            "3",
            "--store-timeout-ms",
            "250",
            "--log-format",
            "compact",
        ])
        .unwrap();

        assert_eq!(cli.listen_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(cli.log_format, LogFormat::Compact);

        let settings = cli.service_settings().unwrap();
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.code_format.length(), 9);
        assert_eq!(settings.store_timeout, Duration::from_millis(250));
    }

    #[test]
    fn out_of_range_code_length_is_rejected() {
        let cli = CLI::try_parse_from(["tinylink-gateway", "--code-length", "40"]).unwrap();
        assert!(cli.service_settings().is_err());
    }

    #[test]
    fn public_base_url_falls_back_to_listen_addr() {
        assert_eq!(
            default_public_base_url("127.0.0.1:7000".parse().unwrap()),
            "http://127.0.0.1:7000"
        );
    }

    #[test]
    fn explicit_public_base_url_wins() {
        let cli = CLI::try_parse_from([
            "tinylink-gateway",
            "--listen-addr",
            "127.0.0.1:7000",
            "--public-base-url",
            "https://tiny.link",
        ])
        .unwrap();
        assert_eq!(cli.public_base_url(), "https://tiny.link");
    }

    #[test]
    fn dynamodb_config_carries_overrides() {
        let cli = CLI::try_parse_from([
            "tinylink-gateway",
            "--storage",
            "dynamodb",
            "--dynamodb-table",
            "UrlShortenerTable",
            "--dynamodb-endpoint",
            "http://localhost:8000",
            "--dynamodb-region",
            "us-east-1",
        ])
        .unwrap();

        let config = cli.dynamodb_config().unwrap();
        assert_eq!(cli.storage, StorageBackendArg::DynamoDb);
        assert_eq!(config.table_name, "UrlShortenerTable");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        let err = CLI::try_parse_from(["tinylink-gateway", "--max-attempts", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(CLI::try_parse_from(["tinylink-gateway", "--max-attempts", "1"]).is_ok());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(CLI::try_parse_from(["tinylink-gateway", "--storage", "redis"]).is_err());
    }
}
