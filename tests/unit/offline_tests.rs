/*!
 * Tests for the offline translator
 */

use std::collections::HashMap;
use std::sync::Arc;

use doctra::translation::{Glossary, OfflineDictionary, OfflineTranslator};

/// Test the documented offline examples
#[test]
fn test_translate_withGlossaryAndDictionary_shouldProduceExpectedText() {
    let translator = OfflineTranslator::new(
        Arc::new(Glossary::from_pairs(&[("VPC", "虚拟私有云")])),
        OfflineDictionary::bundled(),
    );

    assert_eq!(translator.translate("Hello", "en", "zh"), "你好");
    assert_eq!(translator.translate("VPC config", "en", "zh"), "虚拟私有云 (VPC) config");
}

/// Test that glossary substitution applies for any language pair
#[test]
fn test_translate_withGlossaryOnOtherPair_shouldStillSubstitute() {
    let translator = OfflineTranslator::new(
        Arc::new(Glossary::from_pairs(&[("Cloud Storage", "Stockage cloud")])),
        OfflineDictionary::bundled(),
    );

    assert_eq!(
        translator.translate("Use Cloud Storage", "en", "fr"),
        "Use Stockage cloud (Cloud Storage)"
    );
    assert_eq!(translator.translate("Use buckets", "en", "fr"), "[offline en→fr] Use buckets");
}

/// Test a custom dictionary
#[test]
fn test_translate_withCustomDictionary_shouldUseIt() {
    let mut en_to_zh = HashMap::new();
    en_to_zh.insert("deploy".to_string(), "部署".to_string());
    let dictionary = Arc::new(OfflineDictionary::new(en_to_zh, vec![("部署".to_string(), "Deploy".to_string())]));
    let translator = OfflineTranslator::new(Arc::new(Glossary::default()), dictionary);

    assert_eq!(translator.translate("Deploy", "en", "zh"), "部署");
    assert_eq!(translator.translate("部署", "zh", "en"), "Deploy");
    assert_eq!(translator.translate("Hello", "en", "zh"), "Hello (auto)");
}

/// Test that translation is deterministic
#[test]
fn test_translate_repeated_shouldBeDeterministic() {
    let translator = OfflineTranslator::with_defaults();
    let first = translator.translate("Welcome to the database server", "en", "zh");
    let second = translator.translate("Welcome to the database server", "en", "zh");

    assert_eq!(first, second);
    assert_eq!(first, "欢迎to数据库服务器");
}
