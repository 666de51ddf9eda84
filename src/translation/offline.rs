/*!
 * Deterministic, network-free translator.
 *
 * Used whenever a provider is missing, misconfigured, failing, or too slow.
 * It never fails: the worst case is the original text with a visible marker.
 */

use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use crate::language_utils::language_codes_match;
use crate::translation::glossary::{Glossary, GlossaryMatcher};

/// Suffix appended when no dictionary entry applies.
pub const AUTO_MARKER: &str = "(auto)";

/// Punctuation stripped from words before dictionary lookup.
const WORD_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

static BUNDLED_DICTIONARY: Lazy<Arc<OfflineDictionary>> =
    Lazy::new(|| Arc::new(OfflineDictionary::build_bundled()));

/// Small bilingual dictionary for English and Chinese
#[derive(Debug, Clone, Default)]
pub struct OfflineDictionary {
    /// Lowercase English phrase to Chinese; an empty value deletes the word
    en_to_zh: HashMap<String, String>,

    /// Chinese phrase to English, in lookup order
    zh_to_en: Vec<(String, String)>,
}

impl OfflineDictionary {
    pub fn new(en_to_zh: HashMap<String, String>, zh_to_en: Vec<(String, String)>) -> Self {
        Self { en_to_zh, zh_to_en }
    }

    /// Shared instance of the bundled dictionary, built on first use.
    pub fn bundled() -> Arc<Self> {
        Arc::clone(&BUNDLED_DICTIONARY)
    }

    fn build_bundled() -> Self {
        let en_to_zh = [
            ("hello", "你好"),
            ("world", "世界"),
            ("how are you", "你好吗"),
            ("thank you", "谢谢"),
            ("goodbye", "再见"),
            ("yes", "是"),
            ("no", "否"),
            ("please", "请"),
            ("sorry", "对不起"),
            ("welcome", "欢迎"),
            ("good morning", "早上好"),
            ("good night", "晚安"),
            ("i love you", "我爱你"),
            // function words are dropped
            ("the", ""),
            ("a", ""),
            ("an", ""),
            ("is", "是"),
            ("are", "是"),
            ("am", "是"),
            ("was", "是"),
            ("were", "是"),
            ("quick", "快速的"),
            ("brown", "棕色的"),
            ("fox", "狐狸"),
            ("jumps", "跳过"),
            ("over", "越过"),
            ("lazy", "懒惰的"),
            ("dog", "狗"),
            ("today", "今天"),
            ("how", "如何"),
            ("you", "你"),
            ("computer", "计算机"),
            ("phone", "电话"),
            ("book", "书"),
            ("water", "水"),
            ("food", "食物"),
            ("cloud", "云"),
            ("service", "服务"),
            ("database", "数据库"),
            ("server", "服务器"),
            ("application", "应用程序"),
            ("translate", "翻译"),
            ("language", "语言"),
            ("text", "文本"),
            ("document", "文档"),
        ]
        .into_iter()
        .map(|(en, zh)| (en.to_string(), zh.to_string()))
        .collect();

        let zh_to_en = [
            ("你好", "Hello"),
            ("世界", "World"),
            ("你好吗", "How are you"),
            ("谢谢", "Thank you"),
            ("再见", "Goodbye"),
            ("是", "Yes"),
            ("否", "No"),
            ("请", "Please"),
            ("对不起", "Sorry"),
            ("欢迎", "Welcome"),
            ("早上好", "Good morning"),
            ("晚安", "Good night"),
            ("我爱你", "I love you"),
            ("计算机", "Computer"),
            ("电话", "Phone"),
            ("书", "Book"),
            ("水", "Water"),
            ("食物", "Food"),
            ("云", "Cloud"),
            ("服务", "Service"),
            ("数据库", "Database"),
            ("服务器", "Server"),
            ("应用程序", "Application"),
        ]
        .into_iter()
        .map(|(zh, en)| (zh.to_string(), en.to_string()))
        .collect();

        Self::new(en_to_zh, zh_to_en)
    }

    fn english_to_chinese(&self, text: &str) -> Option<String> {
        let lower = text.trim().to_lowercase();
        if let Some(exact) = self.en_to_zh.get(&lower).filter(|m| !m.is_empty()) {
            return Some(exact.clone());
        }

        let words: Vec<&str> = lower.split_whitespace().collect();
        if words.len() > 1 {
            let translated: Vec<String> = words
                .iter()
                .map(|word| word.replace(WORD_PUNCTUATION, ""))
                .filter_map(|word| match self.en_to_zh.get(&word) {
                    Some(mapped) if mapped.is_empty() => None,
                    Some(mapped) => Some(mapped.clone()),
                    None => Some(word),
                })
                .filter(|word| !word.is_empty())
                .collect();
            if !translated.is_empty() {
                return Some(translated.concat());
            }
        }

        let cleaned = lower.replace(WORD_PUNCTUATION, "");
        self.en_to_zh
            .get(&cleaned)
            .filter(|mapped| !mapped.is_empty())
            .cloned()
    }

    fn chinese_to_english(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if let Some((_, en)) = self.zh_to_en.iter().find(|(zh, _)| zh == trimmed) {
            return Some(en.clone());
        }

        self.zh_to_en
            .iter()
            .find(|(zh, _)| text.contains(zh.as_str()))
            .map(|(zh, en)| text.replace(zh.as_str(), en))
    }
}

/// Glossary-aware offline translator
#[derive(Debug, Clone)]
pub struct OfflineTranslator {
    matcher: GlossaryMatcher,
    dictionary: Arc<OfflineDictionary>,
}

impl OfflineTranslator {
    pub fn new(glossary: Arc<Glossary>, dictionary: Arc<OfflineDictionary>) -> Self {
        Self {
            matcher: GlossaryMatcher::new(&glossary),
            dictionary,
        }
    }

    /// Translator over the bundled dictionary and an empty glossary.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(Glossary::default()), OfflineDictionary::bundled())
    }

    /// Translate `text`. Always succeeds.
    ///
    /// Glossary substitution wins when any term matches. Otherwise English and
    /// Chinese go through the dictionary, and other pairs come back marked as
    /// untranslated.
    pub fn translate(&self, text: &str, source_language: &str, target_language: &str) -> String {
        let substitution = self.matcher.substitute(text);
        if substitution.is_changed() {
            debug!("Offline glossary substitution applied ({} terms)", substitution.matched.len());
            return substitution.text;
        }

        let is_pair = |src: &str, tgt: &str| {
            language_codes_match(source_language, src) && language_codes_match(target_language, tgt)
        };

        if is_pair("en", "zh") {
            return self
                .dictionary
                .english_to_chinese(text)
                .unwrap_or_else(|| auto_marked(text));
        }

        if is_pair("zh", "en") {
            return self
                .dictionary
                .chinese_to_english(text)
                .unwrap_or_else(|| auto_marked(text));
        }

        format!("[offline {}→{}] {}", source_language, target_language, text)
    }
}

fn auto_marked(text: &str) -> String {
    format!("{} {}", text, AUTO_MARKER)
}
