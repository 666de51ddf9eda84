/*!
 * Glossary matching for terminology-aware translation.
 *
 * A glossary is a read-only list of source/target term pairs. The matcher
 * finds which terms occur in a text and can substitute each occurrence with
 * `"<target> (<source>)"`.
 *
 * Terms are applied longest source first, as a fold over one running buffer.
 * Text produced by an earlier substitution is never matched again, so a short
 * term such as "AWS" cannot split an already substituted "AWS Lambda".
 */

use anyhow::{Context, Result};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A single glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// Term in the source language
    #[serde(alias = "english")]
    pub source: String,

    /// Required rendering in the target language
    #[serde(alias = "chinese")]
    pub target: String,
}

impl GlossaryTerm {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Read-only collection of glossary terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Glossary {
    #[serde(default)]
    terms: Vec<GlossaryTerm>,
}

impl Glossary {
    /// Create a glossary from term pairs, in the order given.
    pub fn new(terms: Vec<GlossaryTerm>) -> Self {
        Self { terms }
    }

    /// Convenience constructor from `(source, target)` pairs.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, S)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(s, t)| GlossaryTerm::new(s.as_ref(), t.as_ref()))
                .collect(),
        )
    }

    /// Cloud-service terminology shipped with the binary.
    pub fn bundled() -> Self {
        Self::from_pairs(&[
            ("EC2 (Elastic Compute Cloud)", "弹性计算云"),
            ("S3 (Simple Storage Service)", "简单存储服务"),
            ("AWS Lambda", "AWS Lambda"),
            ("RDS (Relational Database Service)", "关系数据库服务"),
            ("VPC (Virtual Private Cloud)", "虚拟私有云"),
            ("IAM (Identity and Access Management)", "身份与访问管理"),
            ("CloudFront", "CloudFront"),
            ("DynamoDB", "DynamoDB"),
            ("CloudWatch", "CloudWatch"),
            ("CloudFormation", "CloudFormation"),
            ("Compute Engine", "计算引擎"),
            ("Cloud Storage", "云存储"),
            ("BigQuery", "BigQuery"),
            ("GKE (Google Kubernetes Engine)", "Google Kubernetes Engine"),
            ("Load Balancer", "负载均衡器"),
            ("Auto Scaling", "自动伸缩"),
        ])
    }

    /// Load a glossary from a JSON file of the form `{"terms": [{"source": .., "target": ..}]}`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open glossary file: {}", path.display()))?;
        let glossary: Glossary = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse glossary file: {}", path.display()))?;
        debug!("Loaded {} glossary terms from {}", glossary.len(), path.display());
        Ok(glossary)
    }

    pub fn terms(&self) -> &[GlossaryTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Result of substituting glossary terms into a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The text after every substitution
    pub text: String,

    /// Terms that matched, longest source first
    pub matched: Vec<GlossaryTerm>,
}

impl Substitution {
    pub fn is_changed(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// Piece of the running buffer
struct Segment {
    text: String,
    /// Output of an earlier substitution
    protected: bool,
}

/// Compiled glossary, ready for repeated matching
#[derive(Debug, Clone)]
pub struct GlossaryMatcher {
    entries: Vec<(GlossaryTerm, Regex)>,
}

impl GlossaryMatcher {
    /// Compile every term. Terms are ordered by source length, longest first;
    /// equal lengths keep their glossary order.
    pub fn new(glossary: &Glossary) -> Self {
        let mut terms: Vec<&GlossaryTerm> = glossary
            .terms()
            .iter()
            .filter(|t| !t.source.trim().is_empty())
            .collect();
        terms.sort_by(|a, b| b.source.chars().count().cmp(&a.source.chars().count()));

        let entries = terms
            .into_iter()
            .filter_map(|term| match term_pattern(&term.source) {
                Ok(regex) => Some((term.clone(), regex)),
                Err(e) => {
                    warn!("Skipping glossary term '{}': {}", term.source, e);
                    None
                }
            })
            .collect();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Terms relevant to `text`, in application order.
    pub fn find_relevant(&self, text: &str) -> Vec<GlossaryTerm> {
        self.substitute(text).matched
    }

    /// Replace every term occurrence with `"<target> (<source>)"`.
    pub fn substitute(&self, text: &str) -> Substitution {
        let mut segments = vec![Segment {
            text: text.to_string(),
            protected: false,
        }];
        let mut matched = Vec::new();

        for (term, regex) in &self.entries {
            let replacement = format!("{} ({})", term.target, term.source);
            let mut found = false;
            let mut next = Vec::with_capacity(segments.len());

            for segment in segments {
                if segment.protected || !regex.is_match(&segment.text) {
                    next.push(segment);
                    continue;
                }

                found = true;
                let mut last = 0;
                for m in regex.find_iter(&segment.text) {
                    if m.start() > last {
                        next.push(Segment {
                            text: segment.text[last..m.start()].to_string(),
                            protected: false,
                        });
                    }
                    next.push(Segment {
                        text: replacement.clone(),
                        protected: true,
                    });
                    last = m.end();
                }
                if last < segment.text.len() {
                    next.push(Segment {
                        text: segment.text[last..].to_string(),
                        protected: false,
                    });
                }
            }

            segments = next;
            if found {
                matched.push(term.clone());
            }
        }

        Substitution {
            text: segments.into_iter().map(|s| s.text).collect(),
            matched,
        }
    }
}

/// Case-insensitive pattern with word boundaries on word-character edges.
///
/// Boundaries are ASCII-only so a term still matches when it sits directly
/// against CJK text, which has no spaces between words.
fn term_pattern(source: &str) -> std::result::Result<Regex, regex::Error> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let leading = if source.chars().next().is_some_and(is_word) { r"(?-u:\b)" } else { "" };
    let trailing = if source.chars().last().is_some_and(is_word) { r"(?-u:\b)" } else { "" };
    Regex::new(&format!("(?i){}{}{}", leading, regex::escape(source), trailing))
}
