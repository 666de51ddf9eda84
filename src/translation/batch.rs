/*!
 * Batch translation processing.
 *
 * This module translates the paragraphs of one document in fixed-size
 * batches. Batches run strictly one after another with a delay in between;
 * within a batch the provider is called once (combined mode) or once per
 * paragraph concurrently (per-paragraph mode). Every paragraph leaves in a
 * terminal state unless the run is cancelled before its batch starts.
 */

use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{BatchOptions, DispatchMode};
use crate::document::ParsedParagraph;
use crate::errors::ProviderError;
use crate::translation::core::TranslationService;
use crate::translation::reassembly::parse_batch_response;

/// Request-scoped cancellation signal
///
/// Clones share the same flag. Cancelling stops further batches from being
/// dispatched; a batch already in flight still completes.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Languages and optional document context for one run
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub source_language: String,
    pub target_language: String,
    /// Title of the document, passed to the provider as context
    pub document_title: Option<String>,
}

impl BatchContext {
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            document_title: None,
        }
    }

    pub fn with_document_title(mut self, title: &str) -> Self {
        self.document_title = Some(title.to_string());
        self
    }

    fn prompt_context(&self) -> Option<String> {
        self.document_title
            .as_ref()
            .map(|title| format!("These paragraphs belong to the document \"{}\".", title))
    }
}

/// Progress report sent after every batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based index of the finished batch
    pub batch: usize,
    pub total_batches: usize,
    /// Translatable paragraphs in a terminal state so far
    pub paragraphs_done: usize,
    pub paragraphs_total: usize,
}

/// Counters describing one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Batches dispatched
    pub batches: usize,
    /// Paragraphs translated by the provider
    pub translated: usize,
    /// Paragraphs passed through untranslated (code, tables)
    pub passthrough: usize,
    /// Paragraphs translated offline after a provider failure
    pub fallback: usize,
    /// Paragraphs marked as failed
    pub failed: usize,
    /// Paragraphs left pending by cancellation
    pub pending: usize,
    pub cancelled: bool,
}

/// Batch translator for the paragraphs of one document
pub struct BatchTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Batch size, delay, timeout, dispatch mode and fallback switch
    options: BatchOptions,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(service: TranslationService, options: BatchOptions) -> Self {
        Self { service, options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Translate `paragraphs` in place.
    ///
    /// Only `translated` and `translation_status` change; ids and order never do.
    pub async fn translate_document<F>(
        &self,
        paragraphs: &mut [ParsedParagraph],
        context: &BatchContext,
        cancel: &CancellationFlag,
        progress: F,
    ) -> BatchSummary
    where
        F: Fn(&BatchProgress),
    {
        let mut summary = BatchSummary::default();

        // Code and tables never reach a provider
        for paragraph in paragraphs.iter_mut().filter(|p| !p.kind.is_translatable()) {
            let original = paragraph.original.clone();
            paragraph.mark_completed(original);
            summary.passthrough += 1;
        }

        // Batches cover fixed positions of the whole document; code and tables
        // inside a batch are skipped and a batch left empty sends no request
        let batch_size = self.options.batch_size.max(1);
        let batches: Vec<Vec<usize>> = (0..paragraphs.len())
            .collect::<Vec<_>>()
            .chunks(batch_size)
            .map(|chunk| chunk.iter().copied().filter(|&i| paragraphs[i].kind.is_translatable()).collect::<Vec<_>>())
            .filter(|members| !members.is_empty())
            .collect();
        let eligible_count: usize = batches.iter().map(Vec::len).sum();
        let total_batches = batches.len();
        let mut done = 0;

        info!(
            "Translating {} paragraphs in {} batches via {}",
            eligible_count,
            total_batches,
            self.service.provider_name()
        );

        for (batch_index, members) in batches.iter().enumerate() {
            if batch_index > 0 && self.options.batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.options.batch_delay_ms)).await;
            }

            if cancel.is_cancelled() {
                summary.cancelled = true;
                summary.pending = eligible_count - done;
                info!("Translation cancelled, {} paragraphs left pending", summary.pending);
                break;
            }

            for &index in members.iter() {
                paragraphs[index].mark_translating();
            }
            let texts: Vec<String> = members.iter().map(|&i| paragraphs[i].original.clone()).collect();

            let start_time = Instant::now();
            let slots = self.dispatch_with_timeout(&texts, context).await;
            summary.batches += 1;

            match slots {
                Ok(slots) => {
                    for (&index, slot) in members.iter().zip(slots) {
                        match slot {
                            Some(translated) => {
                                paragraphs[index].mark_completed(translated);
                                summary.translated += 1;
                            }
                            None => self.recover(&mut paragraphs[index], context, &mut summary),
                        }
                    }
                    debug!("Batch {}/{} completed in {:?}", batch_index + 1, total_batches, start_time.elapsed());
                }
                Err(e) => {
                    if self.service.has_provider() {
                        warn!("Batch {}/{} failed: {}", batch_index + 1, total_batches, e);
                    } else {
                        debug!("Batch {}/{} translated offline: {}", batch_index + 1, total_batches, e);
                    }
                    for &index in members.iter() {
                        self.recover(&mut paragraphs[index], context, &mut summary);
                    }
                }
            }

            done += members.len();
            progress(&BatchProgress {
                batch: batch_index + 1,
                total_batches,
                paragraphs_done: done,
                paragraphs_total: eligible_count,
            });
        }

        summary
    }

    /// Run one batch under the configured timeout.
    ///
    /// Each returned slot is `None` when that paragraph got no usable text.
    async fn dispatch_with_timeout(
        &self,
        texts: &[String],
        context: &BatchContext,
    ) -> Result<Vec<Option<String>>, ProviderError> {
        if !self.service.has_provider() {
            return Err(ProviderError::AuthenticationError(
                "No translation provider configured".to_string(),
            ));
        }

        let timeout_secs = self.options.batch_timeout_secs;
        let dispatch = async {
            match self.options.mode {
                DispatchMode::Combined => self.dispatch_combined(texts, context).await,
                DispatchMode::PerParagraph => Ok(self.dispatch_per_paragraph(texts, context).await),
            }
        };

        tokio::time::timeout(Duration::from_secs(timeout_secs), dispatch)
            .await
            .unwrap_or(Err(ProviderError::Timeout(timeout_secs)))
    }

    /// One numbered prompt for the whole batch, split back by marker.
    async fn dispatch_combined(
        &self,
        texts: &[String],
        context: &BatchContext,
    ) -> Result<Vec<Option<String>>, ProviderError> {
        let mut builder = self.service.prompt_builder(
            &texts.join("\n\n"),
            &context.source_language,
            &context.target_language,
        );
        if let Some(prompt_context) = context.prompt_context() {
            builder = builder.with_context(&prompt_context);
        }

        let response = self.service.call_provider(&builder.build_batch(texts)).await?;
        let slots = parse_batch_response(&response, texts.len());

        let missing = slots.iter().filter(|s| s.is_empty()).count();
        if missing > 0 {
            warn!("Batch response left {} of {} paragraphs unanswered", missing, texts.len());
        }

        Ok(slots
            .into_iter()
            .map(|slot| (!slot.is_empty()).then_some(slot))
            .collect())
    }

    /// One prompt per paragraph, all in flight together.
    async fn dispatch_per_paragraph(&self, texts: &[String], context: &BatchContext) -> Vec<Option<String>> {
        let prompt_context = context.prompt_context();

        let calls = texts.iter().map(|text| {
            let mut builder = self.service.prompt_builder(text, &context.source_language, &context.target_language);
            if let Some(prompt_context) = &prompt_context {
                builder = builder.with_context(prompt_context);
            }
            let prompt = builder.build_single(text);
            async move {
                match self.service.call_provider(&prompt).await {
                    Ok(translated) => Some(translated),
                    Err(e) => {
                        warn!("Paragraph translation failed: {}", e);
                        None
                    }
                }
            }
        });

        join_all(calls).await
    }

    /// Give a paragraph without provider output its terminal state.
    fn recover(&self, paragraph: &mut ParsedParagraph, context: &BatchContext, summary: &mut BatchSummary) {
        if self.options.fallback_to_offline {
            let translated = self.service.translate_offline(
                &paragraph.original,
                &context.source_language,
                &context.target_language,
            );
            paragraph.mark_completed(translated);
            summary.fallback += 1;
        } else {
            paragraph.mark_failed();
            summary.failed += 1;
        }
    }
}
