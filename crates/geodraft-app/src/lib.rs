//! geodraft Application Library
//!
//! Headless driver that replays session scripts through the editor's
//! frame loop.

pub mod script;

pub use script::{ScriptCommand, ScriptError, Session, parse_line, parse_script};

use clap::Parser;
use geodraft_core::EditorSettings;
use std::path::PathBuf;

/// Command-line options of the `geodraft` binary.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "geodraft", about = "Replay a geodraft session script")]
pub struct Options {
    /// Session script, one command per line.
    pub script: PathBuf,

    /// Settings file; the platform default when unset.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Save the final drawing here.
    #[arg(long)]
    pub out: Option<String>,
}

impl Options {
    /// Settings from the chosen file, or defaults.
    pub fn load_settings(&self) -> EditorSettings {
        let path = self.settings.clone().unwrap_or_else(EditorSettings::default_path);
        EditorSettings::load_or_default(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let options =
            Options::try_parse_from(["geodraft", "run.txt", "--out", "result.txt", "--settings", "cfg.json"]).unwrap();
        assert_eq!(options.script, PathBuf::from("run.txt"));
        assert_eq!(options.out.as_deref(), Some("result.txt"));
        assert_eq!(options.settings, Some(PathBuf::from("cfg.json")));
    }

    #[test]
    fn test_parse_options_defaults() {
        let options = Options::try_parse_from(["geodraft", "run.txt"]).unwrap();
        assert_eq!(options.out, None);
        assert_eq!(options.settings, None);
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(Options::try_parse_from(["geodraft"]).is_err());
        assert!(Options::try_parse_from(["geodraft", "a", "b"]).is_err());
        assert!(Options::try_parse_from(["geodraft", "a", "--out"]).is_err());
        assert!(Options::try_parse_from(["geodraft", "a", "--verbose"]).is_err());
    }
}
