use crate::engine::EngineError;
use crate::limits::DEFAULT_QUEUE_DEPTH;

pub const TABLES_VAR: &str = "SEATWISE_TABLES";
pub const METRICS_PORT_VAR: &str = "SEATWISE_METRICS_PORT";
pub const QUEUE_DEPTH_VAR: &str = "SEATWISE_QUEUE_DEPTH";

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seat count of every table on the floor.
    pub tables: Vec<u32>,
    pub metrics_port: Option<u16>,
    pub queue_depth: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let tables = match lookup(TABLES_VAR) {
            Some(raw) => parse_tables(&raw)?,
            None => return Err(EngineError::InvalidConfig(format!("{TABLES_VAR} is not set"))),
        };
        let metrics_port = lookup(METRICS_PORT_VAR)
            .map(|raw| parse_var::<u16>(METRICS_PORT_VAR, &raw))
            .transpose()?;
        let queue_depth = match lookup(QUEUE_DEPTH_VAR) {
            Some(raw) => parse_var::<usize>(QUEUE_DEPTH_VAR, &raw)?,
            None => DEFAULT_QUEUE_DEPTH,
        };
        if queue_depth == 0 {
            return Err(EngineError::InvalidConfig(format!("{QUEUE_DEPTH_VAR} must be positive")));
        }

        Ok(Self {
            tables,
            metrics_port,
            queue_depth,
        })
    }
}

/// Parse a comma-separated list of seat counts, e.g. `2,6,4`.
pub fn parse_tables(raw: &str) -> Result<Vec<u32>, EngineError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_var::<u32>(TABLES_VAR, s))
        .collect()
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, EngineError> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::InvalidConfig(format!("{key}: cannot parse {raw:?}")))
}
