//! Activity control commands.
//!
//! The host drives the activity channel with named methods. `start` and
//! `reset` zero the step counter; `stop` is acknowledged without touching
//! pipeline state (the sensor registration lives until the stream is
//! cancelled).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SensingError;

/// A command accepted on the activity control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Start,
    Stop,
    Reset,
}

impl ControlCommand {
    pub fn method_name(&self) -> &'static str {
        match self {
            ControlCommand::Start => "start",
            ControlCommand::Stop => "stop",
            ControlCommand::Reset => "reset",
        }
    }

    /// Whether this command zeroes the step counter.
    pub fn resets_steps(&self) -> bool {
        matches!(self, ControlCommand::Start | ControlCommand::Reset)
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl FromStr for ControlCommand {
    type Err = SensingError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method {
            "start" => Ok(ControlCommand::Start),
            "stop" => Ok(ControlCommand::Stop),
            "reset" => Ok(ControlCommand::Reset),
            other => Err(SensingError::NotImplemented {
                method: other.to_string(),
            }),
        }
    }
}

/// Acknowledgement returned for every handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub command: ControlCommand,
    /// Step count after the command was applied.
    pub step_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_methods() {
        assert_eq!("start".parse::<ControlCommand>().unwrap(), ControlCommand::Start);
        assert_eq!("stop".parse::<ControlCommand>().unwrap(), ControlCommand::Stop);
        assert_eq!("reset".parse::<ControlCommand>().unwrap(), ControlCommand::Reset);
    }

    #[test]
    fn test_unknown_method_not_implemented() {
        let err = "pause".parse::<ControlCommand>().unwrap_err();
        assert_eq!(err.code(), "NOT_IMPLEMENTED");
        assert!(matches!(err, SensingError::NotImplemented { method } if method == "pause"));
    }

    #[test]
    fn test_method_names_round_trip() {
        for command in [ControlCommand::Start, ControlCommand::Stop, ControlCommand::Reset] {
            assert_eq!(command.to_string().parse::<ControlCommand>().unwrap(), command);
        }
    }

    #[test]
    fn test_only_stop_keeps_steps() {
        assert!(ControlCommand::Start.resets_steps());
        assert!(ControlCommand::Reset.resets_steps());
        assert!(!ControlCommand::Stop.resets_steps());
    }
}
