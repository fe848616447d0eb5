use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use fakesql_core::Value;

/// Connection properties. None of them change how the fake behaves, they are reported back
/// to the code under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    connection_string: String,
    database: String,
    connect_timeout: Duration,
    data_source: String,
    server_version: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            database: String::new(),
            connect_timeout: Duration::from_secs(15),
            data_source: "FakeProvider".into(),
            server_version: "42".into(),
        }
    }
}

impl ConnectionConfig {
    /// Parses `key=value;` pairs. Keys are case-insensitive and unknown keys are skipped.
    pub fn from_connection_string(s: &str) -> anyhow::Result<Self> {
        let mut config = Self { connection_string: s.to_owned(), ..Self::default() };
        for segment in s.split(';').map(str::trim).filter(|segment| !segment.is_empty()) {
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => bail!("connection string segment `{segment}` is not of the form `key=value`"),
            };

            let option = match ConfigurationOption::from_connection_string_key(key) {
                Some(option) => option,
                None => {
                    tracing::debug!(%key, "ignoring unknown connection string key");
                    continue;
                }
            };

            config.set_option(option, Value::from(value))?;
        }
        Ok(config)
    }

    #[inline]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    #[inline]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[inline]
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    #[inline]
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub(crate) fn set_database(&mut self, database: impl Into<String>) {
        self.database = database.into();
    }

    /// Sets the option called `name`, see [`ConfigurationOption`] for the accepted names.
    pub fn set(&mut self, name: &str, value: Value) -> anyhow::Result<()> {
        self.set_option(ConfigurationOption::from_str(name)?, value)
    }

    fn set_option(&mut self, option: ConfigurationOption, value: Value) -> anyhow::Result<()> {
        match option {
            ConfigurationOption::Database => self.database = text(option, value)?,
            ConfigurationOption::DataSource => self.data_source = text(option, value)?,
            ConfigurationOption::ServerVersion => self.server_version = text(option, value)?,
            ConfigurationOption::ConnectTimeout => {
                let secs = match value {
                    Value::Byte(secs) => u64::from(secs),
                    Value::Int16(secs) => u64::try_from(secs)?,
                    Value::Int32(secs) => u64::try_from(secs)?,
                    Value::Int64(secs) => u64::try_from(secs)?,
                    Value::Text(s) => s
                        .parse()
                        .with_context(|| format!("invalid value `{s}` for `connect_timeout`"))?,
                    _ => bail!("value for `connect_timeout` must be a number of seconds"),
                };
                self.connect_timeout = Duration::from_secs(secs);
            }
        }
        Ok(())
    }
}

fn text(option: ConfigurationOption, value: Value) -> anyhow::Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        _ => bail!("value for `{}` must be of type text", option.name()),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigurationOption {
    Database,
    ConnectTimeout,
    DataSource,
    ServerVersion,
}

impl ConfigurationOption {
    pub fn name(self) -> &'static str {
        match self {
            ConfigurationOption::Database => "database",
            ConfigurationOption::ConnectTimeout => "connect_timeout",
            ConfigurationOption::DataSource => "data_source",
            ConfigurationOption::ServerVersion => "server_version",
        }
    }

    fn from_connection_string_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "database" | "initial catalog" => Some(ConfigurationOption::Database),
            "server" | "data source" => Some(ConfigurationOption::DataSource),
            "connect timeout" | "connection timeout" | "timeout" => {
                Some(ConfigurationOption::ConnectTimeout)
            }
            _ => None,
        }
    }
}

impl FromStr for ConfigurationOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "database" => Ok(ConfigurationOption::Database),
            "connect_timeout" => Ok(ConfigurationOption::ConnectTimeout),
            "data_source" => Ok(ConfigurationOption::DataSource),
            "server_version" => Ok(ConfigurationOption::ServerVersion),
            _ => bail!("unknown configuration option `{s}`"),
        }
    }
}
