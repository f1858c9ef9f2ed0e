use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crate::Args;

/// Destination extension used when neither CLI args nor user config give one.
pub const DEFAULT_EXTENSION: &str = "png";

/// Final config created from CLI arguments and user config file.
#[derive(Debug, Default)]
pub struct Config {
    pub(crate) debug: bool,
    pub(crate) dryrun: bool,
    pub(crate) extension: String,
    pub(crate) move_files: bool,
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) prefix: String,
    pub(crate) verbose: bool,
}

/// Config from a config file
#[derive(Debug, Default, Deserialize)]
struct PmatchConfig {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    extension: Option<String>,
    #[serde(default)]
    move_files: bool,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    pmatch: PmatchConfig,
}

impl PmatchConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = prompt_match::config::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.pmatch)
            .context("Failed to parse pmatch config TOML")
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let user_config = PmatchConfig::get_user_config()?;

        Ok(Self {
            debug: args.debug,
            dryrun: args.print || user_config.dryrun,
            extension: args
                .extension
                .clone()
                .or(user_config.extension)
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            move_files: args.move_files || user_config.move_files,
            output_dir: args.output.clone().or(user_config.output_dir),
            prefix: args.prefix.clone().or(user_config.prefix).unwrap_or_default(),
            verbose: args.verbose || user_config.verbose,
        })
    }
}

#[cfg(test)]
mod pmatch_config_tests {
    use super::*;

    #[test]
    fn from_toml_str_parses_empty_config() {
        let toml = "";
        let config = PmatchConfig::from_toml_str(toml).unwrap();
        assert!(!config.dryrun);
        assert!(!config.move_files);
        assert!(!config.verbose);
        assert!(config.extension.is_none());
        assert!(config.prefix.is_none());
    }

    #[test]
    fn from_toml_str_parses_pmatch_section() {
        let toml = r"
[pmatch]
dryrun = true
move_files = true
verbose = true
";
        let config = PmatchConfig::from_toml_str(toml).unwrap();
        assert!(config.dryrun);
        assert!(config.move_files);
        assert!(config.verbose);
    }

    #[test]
    fn from_toml_str_parses_naming_options() {
        let toml = r#"
[pmatch]
extension = "jpg"
prefix = "img_"
output_dir = "/tmp/out"
"#;
        let config = PmatchConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.extension.as_deref(), Some("jpg"));
        assert_eq!(config.prefix.as_deref(), Some("img_"));
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn from_toml_str_invalid_toml_returns_error() {
        let toml = "this is not valid toml {{{";
        let result = PmatchConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn from_toml_str_ignores_other_sections() {
        let toml = r"
[other_section]
some_value = true

[pmatch]
verbose = true
";
        let config = PmatchConfig::from_toml_str(toml).unwrap();
        assert!(config.verbose);
        assert!(!config.dryrun);
    }
}

#[cfg(test)]
mod config_from_args_tests {
    use super::*;

    fn default_args() -> Args {
        Args {
            prompts: None,
            source: None,
            output: None,
            prefix: None,
            extension: None,
            move_files: false,
            print: false,
            debug: false,
            completion: None,
            verbose: false,
        }
    }

    #[test]
    fn from_args_uses_defaults() {
        let config = Config::from_args(&default_args()).expect("config should parse");
        assert_eq!(config.extension, DEFAULT_EXTENSION);
        assert!(config.prefix.is_empty());
        assert!(!config.dryrun);
        assert!(!config.move_files);
    }

    #[test]
    fn from_args_cli_overrides_defaults() {
        let mut args = default_args();
        args.extension = Some("jpg".to_string());
        args.prefix = Some("img".to_string());
        args.output = Some(PathBuf::from("/tmp/renamed"));
        args.move_files = true;
        args.print = true;
        args.verbose = true;

        let config = Config::from_args(&args).expect("config should parse");
        assert_eq!(config.extension, "jpg");
        assert_eq!(config.prefix, "img");
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/renamed")));
        assert!(config.move_files);
        assert!(config.dryrun);
        assert!(config.verbose);
    }
}
