/*!
 * Tests for glossary loading and matching
 */

use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use doctra::translation::{Glossary, GlossaryMatcher, GlossaryTerm};

/// Test the bundled cloud glossary
#[test]
fn test_bundled_glossary_shouldMatchCloudTerms() {
    let matcher = GlossaryMatcher::new(&Glossary::bundled());

    let terms = matcher.find_relevant("Put a Load Balancer in front of DynamoDB readers.");
    let sources: Vec<&str> = terms.iter().map(|t| t.source.as_str()).collect();
    assert!(sources.contains(&"Load Balancer"));
    assert!(sources.contains(&"DynamoDB"));
    assert!(matcher.find_relevant("Nothing relevant here").is_empty());
}

/// Test case-insensitive substitution
#[test]
fn test_substitute_withDifferentCase_shouldKeepCanonicalSource() {
    let glossary = Glossary::from_pairs(&[("Auto Scaling", "自动伸缩")]);
    let result = GlossaryMatcher::new(&glossary).substitute("Enable auto scaling today");

    assert_eq!(result.text, "Enable 自动伸缩 (Auto Scaling) today");
    assert!(result.is_changed());
}

/// Test that partial words are not replaced
#[test]
fn test_substitute_insideLongerWord_shouldNotMatch() {
    let glossary = Glossary::from_pairs(&[("VPC", "虚拟私有云")]);
    let result = GlossaryMatcher::new(&glossary).substitute("VPCs and myVPC stay");

    assert_eq!(result.text, "VPCs and myVPC stay");
    assert!(!result.is_changed());
}

/// Test loading both key spellings from a file
#[test]
fn test_from_file_withLegacyKeys_shouldLoadTerms() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("glossary.json");
    fs::write(
        &path,
        r#"{"terms": [{"source": "Kubernetes", "target": "K8s"}, {"english": "Pod", "chinese": "容器组"}]}"#,
    )?;

    let glossary = Glossary::from_file(&path)?;
    assert_eq!(glossary.len(), 2);
    assert_eq!(glossary.terms()[1], GlossaryTerm::new("Pod", "容器组"));
    assert!(Glossary::from_file(temp_dir.path().join("missing.json")).is_err());

    Ok(())
}
