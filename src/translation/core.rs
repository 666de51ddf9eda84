/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which owns the
 * configured provider, the glossary and the offline translator, and applies
 * the one fallback policy used everywhere: any provider failure, including a
 * missing or placeholder API key, degrades to the offline translator.
 */

use log::{debug, warn};
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationMode, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::validate_language_code;
use crate::providers::{create_provider, Provider};
use crate::translation::glossary::{Glossary, GlossaryMatcher, GlossaryTerm};
use crate::translation::offline::{OfflineDictionary, OfflineTranslator};
use crate::translation::prompts::TranslationPromptBuilder;

/// Name reported when the offline translator produced the text
pub const OFFLINE_PROVIDER: &str = "offline";

/// Confidence reported for offline translations
pub const OFFLINE_CONFIDENCE: f32 = 0.88;

/// Confidence for providers outside the built-in table, such as test doubles
const UNKNOWN_PROVIDER_CONFIDENCE: f32 = 0.9;

/// Result of translating one text
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TranslationOutcome {
    /// The translated text
    pub translated: String,

    /// Provider that produced the text, or `offline`
    pub provider: String,

    /// Provider-level confidence
    pub confidence: f32,
}

impl TranslationOutcome {
    pub fn is_offline(&self) -> bool {
        self.provider == OFFLINE_PROVIDER
    }
}

/// Translation service shared by single-text and batch translation
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Remote provider, absent when no credential is configured
    provider: Option<Arc<dyn Provider>>,

    /// Glossary matcher for prompt hints
    matcher: Arc<GlossaryMatcher>,

    /// Network-free fallback
    offline: Arc<OfflineTranslator>,

    /// Prompt style
    mode: TranslationMode,
}

impl TranslationService {
    /// Create a service for the provider selected in `config`.
    ///
    /// A provider that cannot be built is logged and left out; every call then
    /// goes straight to the offline translator.
    pub fn new(config: &TranslationConfig, glossary: Arc<Glossary>) -> Self {
        Self::for_provider(config.provider, config, glossary)
    }

    /// Create a service for an explicitly requested provider.
    pub fn for_provider(
        provider: TranslationProvider,
        config: &TranslationConfig,
        glossary: Arc<Glossary>,
    ) -> Self {
        let client = match create_provider(provider, config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("{} unavailable, using offline translation: {}", provider.display_name(), e);
                None
            }
        };
        Self::with_provider(client, glossary).with_mode(config.common.mode)
    }

    /// Create a service around an existing provider (or none).
    pub fn with_provider(provider: Option<Arc<dyn Provider>>, glossary: Arc<Glossary>) -> Self {
        Self {
            provider,
            matcher: Arc::new(GlossaryMatcher::new(&glossary)),
            offline: Arc::new(OfflineTranslator::new(glossary, OfflineDictionary::bundled())),
            mode: TranslationMode::default(),
        }
    }

    /// Set the prompt style.
    pub fn with_mode(mut self, mode: TranslationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> TranslationMode {
        self.mode
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the remote provider, or `offline` when there is none.
    pub fn provider_name(&self) -> &str {
        self.provider.as_deref().map(|p| p.name()).unwrap_or(OFFLINE_PROVIDER)
    }

    /// Glossary terms occurring in `text`.
    pub fn relevant_terms(&self, text: &str) -> Vec<GlossaryTerm> {
        self.matcher.find_relevant(text)
    }

    /// Prompt builder carrying the mode and the glossary terms found in `text`.
    pub fn prompt_builder(&self, text: &str, source_language: &str, target_language: &str) -> TranslationPromptBuilder {
        TranslationPromptBuilder::new(source_language, target_language)
            .with_mode(self.mode)
            .with_glossary_terms(&self.relevant_terms(text))
    }

    /// Send `prompt` to the provider. A missing provider is an authentication error.
    pub async fn call_provider(&self, prompt: &str) -> Result<String, ProviderError> {
        match &self.provider {
            Some(provider) => provider.translate(prompt).await,
            None => Err(ProviderError::AuthenticationError(
                "No translation provider configured".to_string(),
            )),
        }
    }

    /// Translate without touching the network.
    pub fn translate_offline(&self, text: &str, source_language: &str, target_language: &str) -> String {
        self.offline.translate(text, source_language, target_language)
    }

    /// Offline translation wrapped as an outcome.
    pub fn offline_outcome(&self, text: &str, source_language: &str, target_language: &str) -> TranslationOutcome {
        TranslationOutcome {
            translated: self.translate_offline(text, source_language, target_language),
            provider: OFFLINE_PROVIDER.to_string(),
            confidence: OFFLINE_CONFIDENCE,
        }
    }

    /// Translate one text through the provider, falling back offline on any failure.
    pub async fn translate_with_fallback(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        context: Option<&str>,
    ) -> TranslationOutcome {
        if self.provider.is_none() {
            debug!("No provider configured, translating offline");
            return self.offline_outcome(text, source_language, target_language);
        }

        let mut builder = self.prompt_builder(text, source_language, target_language);
        if let Some(context) = context {
            builder = builder.with_context(context);
        }

        match self.call_provider(&builder.build_single(text)).await {
            Ok(translated) => TranslationOutcome {
                translated,
                provider: self.provider_name().to_string(),
                confidence: provider_confidence(self.provider_name()),
            },
            Err(e) => {
                warn!("{} translation failed, falling back to offline: {}", self.provider_name(), e);
                self.offline_outcome(text, source_language, target_language)
            }
        }
    }

    /// Validate and translate a single text.
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslationOutcome, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::InvalidRequest("Text is required".to_string()));
        }
        for code in [source_language, target_language] {
            validate_language_code(code)
                .map_err(|e| TranslationError::InvalidRequest(e.to_string()))?;
        }

        Ok(self.translate_with_fallback(text, source_language, target_language, None).await)
    }
}

/// Confidence reported for a provider name
pub fn provider_confidence(name: &str) -> f32 {
    if name == OFFLINE_PROVIDER {
        return OFFLINE_CONFIDENCE;
    }
    name.parse::<TranslationProvider>()
        .map(|p| p.confidence())
        .unwrap_or(UNKNOWN_PROVIDER_CONFIDENCE)
}
