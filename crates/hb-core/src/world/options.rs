//! Engine options
//!
//! Options can be read from JSON or from a plain `name=value` config text
//! (one option per line, `#` starts a comment).

use serde::{Deserialize, Serialize};

use crate::consts::MAX_RANGE;
use crate::world::EngineError;

/// Difficulty and narration switches consulted during resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Monsters notice the player more easily and evolve tougher
    pub nightmare: bool,
    /// Only narrate what the player can actually see
    pub ignore_unview: bool,
    /// Projection range cap
    pub max_range: i32,
    /// Hit points strictly below this are fatal
    pub death_floor: i32,
    /// Arena fight: no experience or death bookkeeping
    pub arena: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            nightmare: false,
            ignore_unview: false,
            max_range: MAX_RANGE,
            death_floor: 0,
            arena: false,
        }
    }
}

impl EngineOptions {
    /// Parse options from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json_string(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse `name=value` lines
    pub fn parse_config(contents: &str) -> Result<Self, EngineError> {
        let mut options = Self::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((name, value)) => options.set_option(name.trim(), value.trim())?,
                // A bare name switches a boolean on, `!name` switches it off
                None => match line.strip_prefix('!') {
                    Some(name) => options.set_option(name.trim(), "false")?,
                    None => options.set_option(line, "true")?,
                },
            }
        }
        options.validate()?;
        Ok(options)
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        match name {
            "nightmare" => self.nightmare = parse_bool(name, value)?,
            "ignore_unview" => self.ignore_unview = parse_bool(name, value)?,
            "arena" => self.arena = parse_bool(name, value)?,
            "max_range" => self.max_range = parse_int(name, value)?,
            "death_floor" => self.death_floor = parse_int(name, value)?,
            _ => return Err(EngineError::Config(format!("unknown option: {name}"))),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.max_range < 1 {
            return Err(EngineError::Config(format!(
                "max_range must be positive, got {}",
                self.max_range
            )));
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, EngineError> {
    match value {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(EngineError::Config(format!("{name}: expected a boolean, got '{value}'"))),
    }
}

fn parse_int(name: &str, value: &str) -> Result<i32, EngineError> {
    value
        .parse()
        .map_err(|_| EngineError::Config(format!("{name}: expected an integer, got '{value}'")))
}
