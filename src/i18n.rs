//! Internationalization (i18n) Support
//!
//! Pure `(language, key)` -> display string lookup for the UI. Tables for
//! the five supported languages are embedded; anything missing falls back
//! to English, then to the key itself. A user overlay directory can
//! replace individual entries without a rebuild.

use crate::language::Language;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

type Table = HashMap<&'static str, &'static str>;

lazy_static! {
    static ref EMBEDDED: HashMap<Language, Table> = build_embedded_tables();

    /// User-provided replacements (language -> key -> value)
    static ref OVERLAYS: RwLock<HashMap<Language, HashMap<String, String>>> =
        RwLock::new(HashMap::new());
}

/// Translate a key for the given language
pub fn tr(lang: Language, key: &str) -> String {
    if let Ok(overlays) = OVERLAYS.read() {
        if let Some(value) = overlays.get(&lang).and_then(|table| table.get(key)) {
            return value.clone();
        }
    }

    if let Some(value) = EMBEDDED.get(&lang).and_then(|table| table.get(key)) {
        return (*value).to_string();
    }

    if let Some(value) = EMBEDDED.get(&Language::En).and_then(|table| table.get(key)) {
        return (*value).to_string();
    }

    // Fallback to key itself
    key.to_string()
}

/// Load user overlays for every supported language, if present
pub fn load_overlays() {
    let Some(dir) = overlay_dir() else {
        return;
    };

    for lang in Language::ALL {
        let path = dir.join(format!("{}.json", lang.code()));
        if path.exists() {
            load_overlay_from(lang, &path);
        }
    }
}

fn overlay_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("doclyst").join("locale"))
}

/// Merge one overlay file into the live table; returns the entry count
pub(crate) fn load_overlay_from(lang: Language, path: &Path) -> usize {
    let Ok(content) = std::fs::read_to_string(path) else {
        debug!("Could not read locale overlay {}", path.display());
        return 0;
    };

    match serde_json::from_str::<HashMap<String, String>>(&content) {
        Ok(entries) => {
            let count = entries.len();
            if let Ok(mut overlays) = OVERLAYS.write() {
                overlays.entry(lang).or_default().extend(entries);
            }
            info!("🌐 Loaded {} overlay strings for '{}'", count, lang.code());
            count
        }
        Err(e) => {
            debug!("Invalid locale overlay {}: {}", path.display(), e);
            0
        }
    }
}

fn build_embedded_tables() -> HashMap<Language, Table> {
    let mut tables = HashMap::new();

    tables.insert(
        Language::En,
        Table::from([
            ("app_title", "Doclyst"),
            ("tagline", "Your medical reports, in plain language"),
            ("nav_back", "Back"),
            ("nav_about", "About"),
            ("nav_close_about", "Close"),
            ("health_online", "● backend online"),
            ("health_offline", "● backend unreachable"),
            ("landing_heading", "Understand your lab results"),
            (
                "landing_blurb",
                "Upload a medical report and get a calm, plain-language explanation of what it says — and what it doesn't.",
            ),
            ("landing_start", "Get started"),
            ("upload_heading", "Let's see what we have"),
            (
                "upload_hint",
                "Upload all pages of your report for a complete analysis.",
            ),
            ("mode_single", "Single report"),
            ("mode_comparison", "Compare two reports"),
            ("pick_files", "Choose files"),
            ("old_report", "Older report"),
            ("new_report", "Newer report"),
            ("analyze", "Analyze"),
            ("compare", "Compare"),
            ("no_files", "No files selected yet"),
            ("notice_dismiss", "Dismiss"),
            ("processing_heading", "Reading your report..."),
            (
                "processing_hint",
                "This usually takes a few seconds. Please keep the window open.",
            ),
            ("status_normal", "Everything looks good"),
            ("status_attention", "Worth keeping an eye on"),
            ("status_urgent", "Please see a doctor soon"),
            ("summary_heading", "Simple summary"),
            ("tests_heading", "Your results, one by one"),
            ("does_not_mean_heading", "What this does not mean"),
            ("next_steps_heading", "Suggested next steps"),
            ("doctor_questions_heading", "Questions for your doctor"),
            ("comparison_heading", "What changed between reports"),
            ("improved_heading", "Improved"),
            ("worsened_heading", "Worsened"),
            ("stable_heading", "Stable"),
            ("new_findings_heading", "New findings"),
            ("read_aloud", "Read aloud"),
            ("stop_reading", "Stop reading"),
            ("start_over", "Start over"),
            ("about_heading", "About Doclyst"),
            (
                "about_body",
                "Doclyst turns dense medical reports into calm, plain-language explanations. Your files are sent to the analysis service you configure and are not stored by this app. Doclyst is not a diagnosis and never replaces a conversation with your doctor.",
            ),
        ]),
    );

    tables.insert(
        Language::Bn,
        Table::from([
            ("tagline", "আপনার মেডিকেল রিপোর্ট, সহজ ভাষায়"),
            ("landing_heading", "আপনার ল্যাব ফলাফল বুঝুন"),
            ("landing_start", "শুরু করুন"),
            ("upload_heading", "দেখা যাক কী আছে"),
            ("upload_hint", "সম্পূর্ণ বিশ্লেষণের জন্য রিপোর্টের সব পৃষ্ঠা আপলোড করুন।"),
            ("mode_single", "একটি রিপোর্ট"),
            ("mode_comparison", "দুটি রিপোর্ট তুলনা করুন"),
            ("pick_files", "ফাইল নির্বাচন করুন"),
            ("analyze", "বিশ্লেষণ করুন"),
            ("compare", "তুলনা করুন"),
            ("processing_heading", "আপনার রিপোর্ট পড়া হচ্ছে..."),
            ("summary_heading", "সহজ সারসংক্ষেপ"),
            ("tests_heading", "আপনার ফলাফল, একে একে"),
            ("read_aloud", "জোরে পড়ুন"),
            ("stop_reading", "পড়া থামান"),
            ("about_heading", "Doclyst সম্পর্কে"),
        ]),
    );

    tables.insert(
        Language::Zh,
        Table::from([
            ("tagline", "用通俗的语言解读您的体检报告"),
            ("landing_heading", "看懂您的化验结果"),
            ("landing_start", "开始"),
            ("upload_heading", "让我们看看报告"),
            ("upload_hint", "请上传报告的所有页面以获得完整分析。"),
            ("mode_single", "单份报告"),
            ("mode_comparison", "对比两份报告"),
            ("pick_files", "选择文件"),
            ("analyze", "分析"),
            ("compare", "对比"),
            ("processing_heading", "正在阅读您的报告..."),
            ("summary_heading", "简明摘要"),
            ("tests_heading", "逐项结果"),
            ("read_aloud", "朗读"),
            ("stop_reading", "停止朗读"),
            ("about_heading", "关于 Doclyst"),
        ]),
    );

    tables.insert(
        Language::Hi,
        Table::from([
            ("tagline", "आपकी मेडिकल रिपोर्ट, सरल भाषा में"),
            ("landing_heading", "अपने लैब नतीजे समझें"),
            ("landing_start", "शुरू करें"),
            ("upload_heading", "देखते हैं क्या है"),
            ("upload_hint", "पूर्ण विश्लेषण के लिए रिपोर्ट के सभी पृष्ठ अपलोड करें।"),
            ("mode_single", "एक रिपोर्ट"),
            ("mode_comparison", "दो रिपोर्ट की तुलना करें"),
            ("pick_files", "फ़ाइलें चुनें"),
            ("analyze", "विश्लेषण करें"),
            ("compare", "तुलना करें"),
            ("processing_heading", "आपकी रिपोर्ट पढ़ी जा रही है..."),
            ("summary_heading", "सरल सारांश"),
            ("tests_heading", "आपके नतीजे, एक-एक करके"),
            ("read_aloud", "ज़ोर से पढ़ें"),
            ("stop_reading", "पढ़ना रोकें"),
            ("about_heading", "Doclyst के बारे में"),
        ]),
    );

    tables.insert(
        Language::Es,
        Table::from([
            ("tagline", "Tus informes médicos, en lenguaje sencillo"),
            ("landing_heading", "Entiende tus resultados de laboratorio"),
            ("landing_start", "Empezar"),
            ("upload_heading", "Veamos qué tenemos"),
            (
                "upload_hint",
                "Sube todas las páginas de tu informe para un análisis completo.",
            ),
            ("mode_single", "Un informe"),
            ("mode_comparison", "Comparar dos informes"),
            ("pick_files", "Elegir archivos"),
            ("analyze", "Analizar"),
            ("compare", "Comparar"),
            ("processing_heading", "Leyendo tu informe..."),
            ("summary_heading", "Resumen sencillo"),
            ("tests_heading", "Tus resultados, uno a uno"),
            ("read_aloud", "Leer en voz alta"),
            ("stop_reading", "Dejar de leer"),
            ("about_heading", "Acerca de Doclyst"),
        ]),
    );

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_translation_fallback() {
        // Unknown key returns itself
        assert_eq!(tr(Language::En, "unknown_key"), "unknown_key");
        // Key missing from a partial table falls back to English
        assert_eq!(tr(Language::Bn, "nav_back"), "Back");
    }

    #[test]
    fn test_embedded_lookup() {
        assert_eq!(tr(Language::Es, "analyze"), "Analizar");
        assert_eq!(tr(Language::En, "analyze"), "Analyze");
    }

    #[test]
    fn test_overlay_replaces_entry() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"landing_start": "Adelante"}}"#).expect("write overlay");

        let loaded = load_overlay_from(Language::Es, file.path());
        assert_eq!(loaded, 1);
        assert_eq!(tr(Language::Es, "landing_start"), "Adelante");
        // Untouched keys keep their embedded value
        assert_eq!(tr(Language::Es, "compare"), "Comparar");
    }

    #[test]
    fn test_invalid_overlay_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ not valid json").expect("write overlay");

        assert_eq!(load_overlay_from(Language::Hi, file.path()), 0);
        assert_eq!(tr(Language::Hi, "analyze"), "विश्लेषण करें");
    }
}
