//! Run configuration and the rule-file loader.
//!
//! Rule files are plain `key: value` lines; `#` starts a comment and
//! blank lines are skipped. Unknown keys and malformed values are logged
//! and ignored so a rule file can carry entries for newer versions, but
//! out-of-range values fail the run.

use std::path::Path;

use log::warn;

use crate::error::{Error, Result};

/// Parameters of one checking run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum permitted spacing and feature width, in grid units.
    pub rule_distance: f64,
    /// Sampling radius as a multiple of a polygon's mean edge length.
    pub sampling_multiplier: f64,
    /// Worker threads; 0 means auto-detect.
    pub threads: usize,
    pub space_check: bool,
    pub width_check: bool,
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rule_distance: 50.0,
            sampling_multiplier: 4.0,
            threads: 0,
            space_check: true,
            width_check: true,
            parallel: true,
        }
    }
}

impl Config {
    pub fn with_rule_distance(mut self, rule_distance: f64) -> Self {
        self.rule_distance = rule_distance;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.rule_distance > 0.0) {
            return Err(Error::Config(format!(
                "rule_distance must be positive, got {}",
                self.rule_distance
            )));
        }
        if !(self.sampling_multiplier > 0.0) {
            return Err(Error::Config(format!(
                "sampling_multiplier must be positive, got {}",
                self.sampling_multiplier
            )));
        }
        Ok(())
    }

    /// Load a rule file from disk.
    pub fn from_rule_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let text = std::fs::read_to_string(path)?;
        Config::parse(&text)
    }

    /// Parse rule-file text.
    pub fn parse(text: &str) -> Result<Config> {
        let mut config = Config::default();

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                warn!(
                    "line {}: expected 'key: value', skipping: {}",
                    line_number, line
                );
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "rule_distance" => match value.parse::<f64>() {
                    Ok(v) => config.rule_distance = v,
                    Err(_) => warn!("line {}: bad rule_distance '{}', skipping", line_number, value),
                },
                "sampling_multiplier" => match value.parse::<f64>() {
                    Ok(v) => config.sampling_multiplier = v,
                    Err(_) => warn!(
                        "line {}: bad sampling_multiplier '{}', skipping",
                        line_number, value
                    ),
                },
                "threads" => {
                    if value == "auto" {
                        config.threads = 0;
                    } else {
                        match value.parse::<i64>() {
                            Ok(n) if n < 0 => {
                                return Err(Error::Config(format!(
                                    "threads must not be negative, got {}",
                                    n
                                )));
                            }
                            Ok(n) => config.threads = n as usize,
                            Err(_) => {
                                warn!("line {}: bad threads '{}', skipping", line_number, value)
                            }
                        }
                    }
                }
                "space_check" => config.space_check = parse_bool(value),
                "width_check" => config.width_check = parse_bool(value),
                "parallel" => config.parallel = parse_bool(value),
                _ => warn!("line {}: unknown parameter '{}'", line_number, key),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_bool(value: &str) -> bool {
    value == "true" || value == "1"
}
