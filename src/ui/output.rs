//! Output verbosity.

use std::str::FromStr;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all output including command output.
    Verbose,
    /// Show progress and status only.
    #[default]
    Normal,
    /// Show minimal output (spinners + final status).
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows command output.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal | Self::Quiet)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes_case_insensitively() {
        assert_eq!("Verbose".parse::<OutputMode>(), Ok(OutputMode::Verbose));
        assert_eq!("quiet".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert!("loud".parse::<OutputMode>().is_err());
    }

    #[test]
    fn only_verbose_shows_command_output() {
        assert!(OutputMode::Verbose.shows_command_output());
        assert!(!OutputMode::Normal.shows_command_output());
    }

    #[test]
    fn silent_hides_status_and_spinners() {
        assert!(!OutputMode::Silent.shows_status());
        assert!(!OutputMode::Silent.shows_spinners());
        assert!(OutputMode::Quiet.shows_status());
    }
}
