//! Locale codes accepted by the Play Console for listings and release notes.

/// Every locale directory name the Play Console recognises, sorted.
pub const LOCALES: &[&str] = &[
    "af", "am", "ar", "az-AZ", "be", "bg", "bn-BD", "ca", "cs-CZ", "da-DK", "de-DE", "el-GR",
    "en-AU", "en-CA", "en-GB", "en-IN", "en-SG", "en-US", "en-ZA", "es-419", "es-ES", "es-US",
    "et", "eu-ES", "fa", "fi-FI", "fil", "fr-CA", "fr-FR", "gl-ES", "hi-IN", "hr", "hu-HU",
    "hy-AM", "id", "is-IS", "it-IT", "iw-IL", "ja-JP", "ka-GE", "km-KH", "kn-IN", "ko-KR",
    "ky-KG", "lo-LA", "lt", "lv", "mk-MK", "ml-IN", "mn-MN", "mr-IN", "ms", "ms-MY", "my-MM",
    "ne-NP", "nl-NL", "no-NO", "pl-PL", "pt-BR", "pt-PT", "rm", "ro", "ru-RU", "si-LK", "sk",
    "sl", "sr", "sv-SE", "sw", "ta-IN", "te-IN", "th", "tr-TR", "uk", "vi", "zh-CN", "zh-HK",
    "zh-TW", "zu",
];

/// Whether `name` is a recognised locale directory name. Matching is exact
/// and case-sensitive (`en-us` is rejected).
pub fn is_known_locale(name: &str) -> bool {
    LOCALES.binary_search(&name).is_ok()
}
