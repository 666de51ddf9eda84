/*!
 * End-to-end document translation.
 *
 * A request is validated, its input fetched (URL) or taken as is (content),
 * parsed into paragraphs and translated batch by batch. Fetch and parse
 * failures abort before any translation; provider failures never do.
 */

use log::info;
use std::sync::Arc;

use crate::app_config::{Config, TranslationMode, TranslationProvider};
use crate::document::{ParsedDocument, SourceFormat, TranslatedDocument};
use crate::errors::{AppError, ParseError, TranslationError};
use crate::fetch::{split_anchor, Fetcher, HttpFetcher};
use crate::language_utils::validate_language_code;
use crate::parsing::{parse_content, parse_with_format, ContentFormat, HtmlParser};
use crate::providers::Provider;
use crate::translation::{
    BatchContext, BatchProgress, BatchSummary, BatchTranslator, CancellationFlag, Glossary,
    TranslationService,
};

/// Marker stored as the source of uploaded content
pub const UPLOAD_SOURCE: &str = "upload";

/// What to translate
#[derive(Debug, Clone, PartialEq)]
pub enum RequestInput {
    /// A page to fetch, optionally with a `#anchor`
    Url(String),
    /// Raw content; the format is detected when not given
    Content {
        content: String,
        format: Option<ContentFormat>,
    },
}

/// A validated unit of work for the pipeline
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub input: RequestInput,
    pub source_language: String,
    pub target_language: String,
    /// Overrides the configured mode
    pub mode: Option<TranslationMode>,
    /// Overrides the configured provider
    pub provider: Option<TranslationProvider>,
}

impl TranslationRequest {
    pub fn from_url(url: &str, source_language: &str, target_language: &str) -> Self {
        Self::new(RequestInput::Url(url.to_string()), source_language, target_language)
    }

    pub fn from_content(content: &str, source_language: &str, target_language: &str) -> Self {
        let input = RequestInput::Content {
            content: content.to_string(),
            format: None,
        };
        Self::new(input, source_language, target_language)
    }

    fn new(input: RequestInput, source_language: &str, target_language: &str) -> Self {
        Self {
            input,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            mode: None,
            provider: None,
        }
    }

    pub fn with_mode(mut self, mode: TranslationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_provider(mut self, provider: TranslationProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Reject requests the pipeline cannot act on.
    pub fn validate(&self) -> Result<(), TranslationError> {
        match &self.input {
            RequestInput::Url(url) => {
                split_anchor(url).map_err(|e| TranslationError::InvalidRequest(e.to_string()))?;
            }
            RequestInput::Content { content, .. } => {
                if content.trim().is_empty() {
                    return Err(TranslationError::InvalidRequest("Content is required".to_string()));
                }
            }
        }

        for code in [&self.source_language, &self.target_language] {
            validate_language_code(code)
                .map_err(|e| TranslationError::InvalidRequest(e.to_string()))?;
        }
        Ok(())
    }
}

/// Where the pipeline gets its provider from
enum ProviderSelection {
    /// Built per request from the configuration
    FromConfig,
    /// Fixed provider, or none for offline-only translation
    Fixed(Option<Arc<dyn Provider>>),
}

/// Fetch, parse and translate documents
pub struct DocumentPipeline {
    config: Config,
    glossary: Arc<Glossary>,
    fetcher: Arc<dyn Fetcher>,
    html_parser: HtmlParser,
    provider: ProviderSelection,
}

impl DocumentPipeline {
    pub fn new(config: Config, glossary: Arc<Glossary>) -> Self {
        Self {
            config,
            glossary,
            fetcher: Arc::new(HttpFetcher::default()),
            html_parser: HtmlParser::new(),
            provider: ProviderSelection::FromConfig,
        }
    }

    /// Replace the HTTP fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Use `provider` regardless of the configured one.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = ProviderSelection::Fixed(Some(provider));
        self
    }

    /// Translate with the offline translator only.
    pub fn offline_only(mut self) -> Self {
        self.provider = ProviderSelection::Fixed(None);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse the input without translating it.
    pub async fn parse(&self, input: &RequestInput) -> Result<ParsedDocument, AppError> {
        let document = match input {
            RequestInput::Url(raw_url) => {
                let (url, anchor) = split_anchor(raw_url)?;
                let html = self.fetcher.fetch(&url).await?;
                self.html_parser.parse(&html, &url, SourceFormat::Url, anchor.as_deref())
            }
            RequestInput::Content { content, format } => {
                if content.trim().is_empty() {
                    return Err(ParseError::EmptyInput.into());
                }
                match format {
                    Some(format) => parse_with_format(content, UPLOAD_SOURCE, *format),
                    None => parse_content(content, UPLOAD_SOURCE),
                }
            }
        };

        if document.paragraphs.is_empty() {
            return Err(ParseError::NoContent.into());
        }

        info!(
            "Parsed \"{}\": {} paragraphs ({} before cap)",
            document.title,
            document.paragraphs.len(),
            document.metadata.total_paragraphs
        );
        Ok(document)
    }

    /// Run a request to completion.
    pub async fn translate<F>(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationFlag,
        progress: F,
    ) -> Result<(TranslatedDocument, BatchSummary), AppError>
    where
        F: Fn(&BatchProgress),
    {
        request.validate()?;

        let mut document = self.parse(&request.input).await?;
        let limit = self.config.translation.common.max_paragraphs_per_request;
        if limit > 0 && document.paragraphs.len() > limit {
            info!("Translating the first {} of {} paragraphs", limit, document.paragraphs.len());
            document.paragraphs.truncate(limit);
        }

        let translator = BatchTranslator::new(
            self.service_for(request),
            self.config.translation.common.batch.clone(),
        );
        let context = BatchContext::new(&request.source_language, &request.target_language)
            .with_document_title(&document.title);

        let summary = translator
            .translate_document(&mut document.paragraphs, &context, cancel, progress)
            .await;

        info!(
            "Translation finished: {} by provider, {} offline, {} passthrough, {} failed, {} pending",
            summary.translated, summary.fallback, summary.passthrough, summary.failed, summary.pending
        );

        let translated = TranslatedDocument::new(document, &request.source_language, &request.target_language);
        Ok((translated, summary))
    }

    fn service_for(&self, request: &TranslationRequest) -> TranslationService {
        let mode = request.mode.unwrap_or(self.config.translation.common.mode);

        match &self.provider {
            ProviderSelection::Fixed(provider) => {
                TranslationService::with_provider(provider.clone(), Arc::clone(&self.glossary))
                    .with_mode(mode)
            }
            ProviderSelection::FromConfig => TranslationService::for_provider(
                request.provider.unwrap_or(self.config.translation.provider),
                &self.config.translation,
                Arc::clone(&self.glossary),
            )
            .with_mode(mode),
        }
    }
}
