//! Server configuration and command-line parsing.
//!
//! Usage:
//!   skirmish [OPTIONS]
//!
//! Options:
//!   --bind ADDR     Address to listen on (default: 0.0.0.0:8080)
//!   --port N        Port to listen on, keeping the bind host
//!   --log FILTER    Log filter directive (default: RUST_LOG, else skirmish=info)
//!   --help          Print usage

use std::net::SocketAddr;

use crate::error::ConfigError;

/// Default listening address.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Log filter used when neither `--log` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_FILTER: &str = "skirmish=info";

pub const USAGE: &str = "\
Usage: skirmish [OPTIONS]

Options:
  --bind ADDR     Address to listen on (default: 0.0.0.0:8080)
  --port N        Port to listen on, keeping the bind host
  --log FILTER    Log filter directive (default: RUST_LOG, else skirmish=info)
  --help          Print this message";

/// Runtime settings for the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Explicit log filter; `None` defers to `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_filter: None,
        }
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(ServerConfig),
    Help,
}

impl ServerConfig {
    /// Parses command-line arguments (without the program name).
    pub fn from_args<I>(args: I) -> Result<CliAction, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = ServerConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bind" => {
                    let value = next_value(&mut args, &arg)?;
                    config.bind = parse_value(&arg, &value)?;
                }
                "--port" => {
                    let value = next_value(&mut args, &arg)?;
                    config.bind.set_port(parse_value(&arg, &value)?);
                }
                "--log" => {
                    config.log_filter = Some(next_value(&mut args, &arg)?);
                }
                "--help" | "-h" => return Ok(CliAction::Help),
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }

        Ok(CliAction::Run(config))
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, ConfigError> {
    args.next()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliAction, ConfigError> {
        ServerConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(parse(&[]), Ok(CliAction::Run(config)));
    }

    #[test]
    fn bind_port_and_log() {
        let Ok(CliAction::Run(config)) = parse(&["--bind", "127.0.0.1:9000", "--log", "debug"])
        else {
            panic!("expected a run configuration");
        };
        assert_eq!(config.bind.to_string(), "127.0.0.1:9000");
        assert_eq!(config.log_filter.as_deref(), Some("debug"));

        let Ok(CliAction::Run(config)) = parse(&["--port", "4000"]) else {
            panic!("expected a run configuration");
        };
        assert_eq!(config.bind.to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn help() {
        assert_eq!(parse(&["--help"]), Ok(CliAction::Help));
        assert_eq!(parse(&["--port", "1", "-h"]), Ok(CliAction::Help));
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse(&["--port"]),
            Err(ConfigError::MissingValue("--port".to_string()))
        );
        assert_eq!(
            parse(&["--port", "99999"]),
            Err(ConfigError::InvalidValue {
                flag: "--port".to_string(),
                value: "99999".to_string()
            })
        );
        assert_eq!(
            parse(&["--bind", "localhost"]),
            Err(ConfigError::InvalidValue {
                flag: "--bind".to_string(),
                value: "localhost".to_string()
            })
        );
        assert_eq!(
            parse(&["--verbose"]),
            Err(ConfigError::UnknownArgument("--verbose".to_string()))
        );
    }
}
