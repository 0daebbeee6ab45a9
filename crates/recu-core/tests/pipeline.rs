//! End-to-end scenarios across the full pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;

use recu_core::{
    AiError, AiExtraction, AiItem, AiReceiptExtractor, BatchItem, LearningEngine, MatchMethod,
    ProcessingMethod, ProductNormalizer, ReceiptProcessor, RecuConfig, ShopIdentifier,
    ShopIdentity, TemplateLibrary, seed,
};

struct CountingAi {
    response: AiExtraction,
    calls: Arc<AtomicUsize>,
}

impl AiReceiptExtractor for CountingAi {
    fn extract(&self, _image: Option<&[u8]>, _ocr_text: &str) -> Result<AiExtraction, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

fn build_processor(
    ai: Option<Box<dyn AiReceiptExtractor>>,
) -> (ReceiptProcessor, Arc<LearningEngine>) {
    let config = RecuConfig::default();
    let normalizer = Arc::new(ProductNormalizer::new(
        seed::default_catalog(),
        config.normalizer.clone(),
    ));
    let templates = Arc::new(TemplateLibrary::default());
    let learner = Arc::new(LearningEngine::new(templates.clone(), config.learning.clone()));

    let mut processor =
        ReceiptProcessor::new(normalizer, templates, learner.clone(), config);
    if let Some(ai) = ai {
        processor = processor.with_ai(ai);
    }
    (processor, learner)
}

#[test]
fn scenario_shoprite_keyword_identifies_shop() {
    let identifier = ShopIdentifier::new();
    let identity = identifier.identify(
        "Bienvenue\nSHOPRITE SUPERMARKET\nAvenue du Commerce\nTOTAL: 5000",
    );
    assert_eq!(identity, ShopIdentity::Known("Shoprite".to_string()));
    assert!(!identity.is_unknown());
}

#[test]
fn scenario_abbreviation_resolves_like_full_name() {
    let normalizer = ProductNormalizer::new(
        seed::default_catalog(),
        RecuConfig::default().normalizer,
    );

    let abbreviated = normalizer.normalize("BNN PLTN", None);
    let full = normalizer.normalize("plantain", None);

    assert_ne!(abbreviated.match_method, MatchMethod::None);
    assert_ne!(full.match_method, MatchMethod::None);
    assert!(abbreviated.product_id.is_some());
    assert_eq!(abbreviated.product_id, full.product_id);
}

#[test]
fn scenario_low_confidence_document_goes_to_ai_and_learns_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let response = AiExtraction {
        success: true,
        merchant: "Chez Mama".to_string(),
        date: Some("2024-03-12".to_string()),
        currency: Some("CDF".to_string()),
        items: vec![AiItem {
            name: "Plantain".to_string(),
            price: Decimal::new(1500, 0),
            quantity: Decimal::new(2, 0),
        }],
        total: Some(Decimal::new(3000, 0)),
        ..Default::default()
    };
    let (processor, learner) = build_processor(Some(Box::new(CountingAi {
        response,
        calls: calls.clone(),
    })));

    // Unknown shop, no parseable items: local confidence is far below the
    // acceptance threshold.
    let result = processor.process_text("corner kiosk\nillegible scrawl 123\n");

    assert!(result.success);
    assert_eq!(result.processing_method, ProcessingMethod::Ai);
    assert_eq!(result.merchant, "Chez Mama");
    assert_eq!(result.total, Decimal::new(3000, 0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // The correction was recorded exactly once.
    assert_eq!(learner.sample_count("Unknown"), 1);
}

#[test]
fn scenario_adequate_local_confidence_does_not_learn() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (processor, learner) = build_processor(Some(Box::new(CountingAi {
        response: AiExtraction { success: true, ..Default::default() },
        calls: calls.clone(),
    })));

    // Confident local extraction: no fallback, no learning.
    let result = processor.process_text(
        "SHOPRITE SUPERMARKET\nPlantain 2 x 1500\nTomate 3 x 600\nPain 1 x 500\nTOTAL: 5300\n",
    );

    assert_eq!(result.processing_method, ProcessingMethod::Local);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(learner.sample_count("Shoprite"), 0);
}

#[test]
fn scenario_batch_of_five_names_with_one_nonsense_item() {
    let normalizer = ProductNormalizer::new(
        seed::default_catalog(),
        RecuConfig::default().normalizer,
    );

    let names = [
        "Banane Plantain",
        "Pomme de terre",
        "Tomate",
        "xyz unknown product 123",
        "Pain",
    ];
    let items: Vec<BatchItem> = names
        .iter()
        .map(|name| BatchItem {
            name: name.to_string(),
            price: None,
            quantity: None,
        })
        .collect();

    let results = normalizer.normalize_batch(&items);
    assert_eq!(results.len(), 5);

    for (outcome, name) in results.iter().zip(names.iter()) {
        assert_eq!(&outcome.input.name, name);
    }

    let nonsense = &results[3].normalization;
    assert!(nonsense.product_id.is_none() || nonsense.confidence < 0.85);
    assert!(nonsense.needs_review);

    // The real products all resolve.
    for index in [0usize, 1, 2, 4] {
        assert!(results[index].normalization.product_id.is_some(), "item {index} unmatched");
    }
}

#[test]
fn scenario_three_corrections_synthesize_template_used_by_next_document() {
    let raw_text = "\
CHEZ MAMA BOUTIQUE
Plantain 2 x 1500
Pain 1 x 500
TOTAL: 3500
";
    let calls = Arc::new(AtomicUsize::new(0));
    let response = AiExtraction {
        success: true,
        merchant: "Chez Mama".to_string(),
        currency: Some("CDF".to_string()),
        items: vec![
            AiItem {
                name: "Plantain".to_string(),
                price: Decimal::new(1500, 0),
                quantity: Decimal::new(2, 0),
            },
            AiItem {
                name: "Pain".to_string(),
                price: Decimal::new(500, 0),
                quantity: Decimal::ONE,
            },
        ],
        total: Some(Decimal::new(3500, 0)),
        ..Default::default()
    };
    let (processor, learner) = build_processor(Some(Box::new(CountingAi {
        response,
        calls: calls.clone(),
    })));

    for _ in 0..3 {
        let result = processor.process_text(raw_text);
        assert_eq!(result.processing_method, ProcessingMethod::Ai);
    }
    assert_eq!(learner.sample_count("Unknown"), 3);

    // Learning threshold reached: the learned template now exists and
    // carries its provenance.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn scenario_learned_mapping_sticks_end_to_end() {
    let normalizer = ProductNormalizer::new(
        seed::default_catalog(),
        RecuConfig::default().normalizer,
    );

    let before = normalizer.normalize("mama special mix", None);
    assert!(before.product_id.is_none() || before.confidence < 1.0);

    normalizer.learn_mapping("mama special mix", "PROD_024", None).unwrap();

    let after = normalizer.normalize("mama special mix", None);
    assert_eq!(after.product_id.as_deref(), Some("PROD_024"));
    assert_eq!(after.confidence, 1.0);
    assert_eq!(after.match_method, MatchMethod::Learned);
    assert!(!after.needs_review);
}
