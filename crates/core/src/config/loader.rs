use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix for overrides.
///
/// Nested keys are separated by a double underscore, so
/// `MOODMIX_YOUTUBE__API_KEY` sets `youtube.api_key`.
pub const ENV_PREFIX: &str = "MOODMIX_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[youtube]
api_key = "AIza-test"

[playback]
fan_out = 25
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.playback.fan_out, 25);
    }

    #[test]
    fn test_load_config_from_str_missing_youtube() {
        let toml = r#"
[cache]
expiry_secs = 10
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/moodmix.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[youtube]
api_key = "AIza-from-file"
timeout_secs = 3

[cache]
expiry_secs = 120
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.youtube.api_key, "AIza-from-file");
        assert_eq!(config.youtube.timeout_secs, 3);
        assert_eq!(config.cache.expiry_secs, 120);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "moodmix.toml",
                r#"
[youtube]
api_key = "from-file"

[playback]
fan_out = 10
"#,
            )?;
            jail.set_env("MOODMIX_YOUTUBE__API_KEY", "from-env");
            jail.set_env("MOODMIX_PLAYBACK__FAN_OUT", "30");

            let config = load_config(Path::new("moodmix.toml")).unwrap();
            assert_eq!(config.youtube.api_key, "from-env");
            assert_eq!(config.playback.fan_out, 30);
            Ok(())
        });
    }
}
