//! Client configuration
//!
//! A single required value (the backend base URL) plus the startup
//! language, resolved CLI flag -> environment -> hardcoded default.
//! Nothing is persisted to disk.

use crate::language::Language;

/// Fallback backend when neither the flag nor the environment names one
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "DOCLYST_BACKEND_URL";

/// Environment variable overriding the startup language
pub const LANGUAGE_ENV: &str = "DOCLYST_LANGUAGE";

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub language: Language,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            language: Language::En,
        }
    }
}

impl Config {
    /// Resolve configuration from CLI overrides and the process environment
    pub fn resolve(cli_url: Option<&str>, cli_language: Option<&str>) -> Self {
        Self::resolve_from(
            cli_url,
            std::env::var(BACKEND_URL_ENV).ok().as_deref(),
            cli_language,
            std::env::var(LANGUAGE_ENV).ok().as_deref(),
        )
    }

    fn resolve_from(
        cli_url: Option<&str>,
        env_url: Option<&str>,
        cli_language: Option<&str>,
        env_language: Option<&str>,
    ) -> Self {
        let backend_url = cli_url
            .or(env_url)
            .map(normalize_url)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let language = cli_language
            .or(env_language)
            .and_then(Language::parse)
            .unwrap_or_default();

        Self {
            backend_url,
            language,
        }
    }
}

/// Trim trailing slashes so endpoint paths can always be appended verbatim
fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_cli_wins_over_env() {
        let config = Config::resolve_from(
            Some("https://cli.example.com/"),
            Some("https://env.example.com"),
            Some("es"),
            Some("hi"),
        );
        assert_eq!(config.backend_url, "https://cli.example.com");
        assert_eq!(config.language, Language::Es);
    }

    #[test]
    fn test_env_fallback() {
        let config = Config::resolve_from(None, Some("https://env.example.com//"), None, Some("bn"));
        assert_eq!(config.backend_url, "https://env.example.com");
        assert_eq!(config.language, Language::Bn);
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let config = Config::resolve_from(None, None, Some("tlh"), None);
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_blank_url_falls_back_to_default() {
        let config = Config::resolve_from(Some("   "), None, None, None);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }
}
