//! Supported languages
//!
//! The analysis and speech services accept a language code with every
//! request; the UI offers the same catalogue for its own strings.

use serde::{Deserialize, Serialize};

/// Languages supported by the backend and the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Bn,
    Zh,
    Hi,
    Es,
}

impl std::str::FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "bn" | "bengali" => Ok(Language::Bn),
            "zh" | "chinese" => Ok(Language::Zh),
            "hi" | "hindi" => Ok(Language::Hi),
            "es" | "spanish" => Ok(Language::Es),
            _ => Err(()),
        }
    }
}

impl Language {
    /// All supported languages, in picker order
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Bn,
        Language::Zh,
        Language::Hi,
        Language::Es,
    ];

    /// Wire code sent to the backend
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Bn => "bn",
            Language::Zh => "zh",
            Language::Hi => "hi",
            Language::Es => "es",
        }
    }

    /// English display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Bn => "Bengali",
            Language::Zh => "Chinese",
            Language::Hi => "Hindi",
            Language::Es => "Spanish",
        }
    }

    /// Native display name, shown in the language picker
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Bn => "বাংলা",
            Language::Zh => "中文",
            Language::Hi => "हिन्दी",
            Language::Es => "Español",
        }
    }

    /// Parse from string (Convenience)
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.native_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!(Language::parse("bn"), Some(Language::Bn));
        assert_eq!(Language::parse("Spanish"), Some(Language::Es));
        assert_eq!(Language::parse("ZH"), Some(Language::Zh));
        assert_eq!(Language::parse("klingon"), None);
    }

    #[test]
    fn test_code_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::parse(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Language::default(), Language::En);
    }
}
