use clap::{Arg, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Accept a level name or a number, mapped onto the `-v` count.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("VESTLY_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_accepts_names_and_numbers() {
        for (level, expected) in [("error", 0), ("WARN", 1), ("info", 2), ("5", 5)] {
            // clap reads the env fallback when the argument is built.
            let matches = temp_env::with_var("VESTLY_LOG_LEVEL", Some(level), || {
                with_args(Command::new("vestly")).get_matches_from(vec!["vestly"])
            });
            assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(expected));
        }
    }

    #[test]
    fn test_validator_rejects_unknown_level() {
        let result = temp_env::with_var("VESTLY_LOG_LEVEL", Some("loud"), || {
            with_args(Command::new("vestly")).try_get_matches_from(vec!["vestly"])
        });
        assert!(result.is_err());
    }
}
