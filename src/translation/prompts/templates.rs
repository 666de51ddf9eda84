/*!
 * Prompt templates for document translation.
 *
 * Prompts are plain text. The single-text layout ends with the target
 * language's own name as an answer cue; the batch layout numbers every
 * paragraph so the response can be split back apart.
 */

use crate::app_config::TranslationMode;
use crate::language_utils::{native_language_name, prompt_language_name};
use crate::translation::glossary::GlossaryTerm;

/// Instruction template for one translation mode.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    pub const PROFESSIONAL: &'static str = "Translate the following text from {source_language} to {target_language}.\nBe precise and professional. Keep technical terms with original in parentheses.\nOutput only the translation, nothing else.";

    pub const CASUAL: &'static str = "Translate from {source_language} to {target_language} in a simple, easy-to-understand way.\nExplain technical concepts briefly. Output only the translation.";

    pub const SUMMARY: &'static str = "Summarize and translate from {source_language} to {target_language}.\nKeep only key points. Output only the summary.";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Template carrying the instructions of `mode`.
    pub fn for_mode(mode: TranslationMode) -> Self {
        match mode {
            TranslationMode::Professional => Self::new(Self::PROFESSIONAL),
            TranslationMode::Casual => Self::new(Self::CASUAL),
            TranslationMode::Summary => Self::new(Self::SUMMARY),
        }
    }

    /// Render the template with the given variables.
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::for_mode(TranslationMode::default())
    }
}

/// Builder for translation prompts with glossary and context hints.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    source_language: String,
    target_language: String,
    mode: TranslationMode,
    glossary_terms: Vec<GlossaryTerm>,
    context: Option<String>,
}

impl TranslationPromptBuilder {
    /// Create a new prompt builder from ISO language codes.
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            mode: TranslationMode::default(),
            glossary_terms: Vec::new(),
            context: None,
        }
    }

    /// Set the translation mode.
    pub fn with_mode(mut self, mode: TranslationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the glossary terms the provider must respect.
    pub fn with_glossary_terms(mut self, terms: &[GlossaryTerm]) -> Self {
        self.glossary_terms = terms.to_vec();
        self
    }

    /// Set free-form context about the surrounding document.
    pub fn with_context(mut self, context: &str) -> Self {
        let context = context.trim();
        self.context = (!context.is_empty()).then(|| context.to_string());
        self
    }

    fn instructions(&self) -> String {
        PromptTemplate::for_mode(self.mode).render(
            &prompt_language_name(&self.source_language),
            &prompt_language_name(&self.target_language),
        )
    }

    /// Glossary and context blocks, each followed by a blank line.
    fn hint_blocks(&self) -> String {
        let mut hints = String::new();

        if !self.glossary_terms.is_empty() {
            hints.push_str("Glossary Terms (Must use these translations):\n");
            for term in &self.glossary_terms {
                hints.push_str(&format!("- {}: {}\n", term.source, term.target));
            }
            hints.push('\n');
        }

        if let Some(context) = &self.context {
            hints.push_str(&format!("Context:\n{}\n\n", context));
        }

        hints
    }

    /// Prompt for a single text.
    pub fn build_single(&self, text: &str) -> String {
        format!(
            "{}\n\n{}Text:\n{}\n\n{}:",
            self.instructions(),
            self.hint_blocks(),
            text,
            native_language_name(&self.target_language)
        )
    }

    /// Prompt for a batch of texts, each prefixed with its 1-based marker.
    pub fn build_batch<S: AsRef<str>>(&self, texts: &[S]) -> String {
        let numbered = texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("[{}] {}", i + 1, text.as_ref()))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{}\nThe text contains {} numbered paragraphs. Translate each paragraph separately and start every translation with its original marker ([1], [2], ...). Do not merge, split, or skip paragraphs.\n\n{}Text:\n{}\n\n{}:",
            self.instructions(),
            texts.len(),
            self.hint_blocks(),
            numbered,
            native_language_name(&self.target_language)
        )
    }
}
