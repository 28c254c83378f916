//! Integration tests for the research pipeline.
//!
//! These tests run the full public entry points over mock collaborators:
//! 1. Website-seeded research: scan → opportunities → classification
//! 2. Competitor path: find → gap analysis
//! 3. Planning path: silos → complete site plan

use std::sync::Arc;

use keyword_research::{
    BuyerJourneyStage, ChannelReporter, KeywordTier, MockFetcher, MockGenerator, Pipeline,
    PipelineConfig, PipelineError,
};

fn opportunity_batch() -> &'static str {
    r#"[
        {"keyword": "Best yoga mat", "searchVolume": 5400, "difficulty": 35, "cpc": 1.4,
         "competition": "medium", "intent": "commercial", "category": "gear",
         "relatedKeywords": ["thick yoga mat", "yoga mat 2024"],
         "questions": ["which yoga mat is best"],
         "contentIdeas": ["yoga mat buying guide"]},
        {"keyword": "yoga mat price", "searchVolume": 1900, "difficulty": 25, "cpc": 0.9,
         "competition": "low", "intent": "transactional", "category": "gear"},
        {"keyword": "yoga mat 2023", "searchVolume": 900, "difficulty": 20, "cpc": 0.5,
         "competition": "low", "intent": "commercial", "category": "gear"},
        {"keyword": "what is yoga", "searchVolume": 8000, "difficulty": 70, "cpc": 0.2,
         "competition": "high", "intent": "informational", "category": "basics"}
    ]"#
}

#[tokio::test]
async fn test_seed_keyword_research_end_to_end() {
    let generator =
        MockGenerator::new().with_response("keyword research specialist", opportunity_batch());
    let pipeline = Pipeline::new(generator, MockFetcher::new());

    let candidates = pipeline
        .generate_keyword_opportunities_from_keyword("yoga mat", Some("fitness"))
        .await
        .unwrap();

    // Non-empty, every element scored, no blocked year anywhere
    assert!(!candidates.is_empty());
    for candidate in &candidates {
        assert!(candidate.potential_score <= 100);
        for text in std::iter::once(&candidate.keyword)
            .chain(&candidate.related_keywords)
            .chain(&candidate.questions)
            .chain(&candidate.content_ideas)
        {
            assert!(!text.contains("2023"), "blocked year in {:?}", text);
            assert!(!text.contains("2024"), "blocked year in {:?}", text);
        }
    }

    // "yoga mat 2023" was dropped entirely
    assert!(!candidates.iter().any(|c| c.keyword.contains("2023")));

    // Sorted descending by recomputed score
    for pair in candidates.windows(2) {
        assert!(pair[0].potential_score >= pair[1].potential_score);
    }
}

#[tokio::test]
async fn test_website_research_dedups_existing_keywords() {
    let generator =
        MockGenerator::new().with_response("keyword research specialist", opportunity_batch());
    let pipeline = Pipeline::new(generator, MockFetcher::new());

    // The site already targets "best yoga mat" (different case)
    let existing = vec!["Best Yoga Mat".to_string()];
    let candidates = pipeline
        .generate_keyword_opportunities("https://yogashop.example", &existing, Some("fitness"))
        .await
        .unwrap();

    assert!(!candidates.iter().any(|c| c.keyword.eq_ignore_ascii_case("best yoga mat")));
    assert!(candidates.iter().any(|c| c.keyword == "yoga mat price"));
}

#[tokio::test]
async fn test_scan_then_classify_full_path() {
    let generator = MockGenerator::new()
        .with_response(
            "extract the keyword phrases",
            r#"["yoga mats", "yoga accessories"]"#,
        )
        .with_response("keyword research specialist", opportunity_batch())
        .with_response(
            "content strategist",
            r#"[
                {"keyword": "yoga mat price", "keywordTier": "primary", "cluster": "pricing",
                 "buyerJourneyStage": "decision", "conversionPotential": 90}
            ]"#,
        );

    let fetcher = MockFetcher::new().with_page(
        "https://yogashop.example",
        "<html><body><h1>Yoga mats and accessories</h1></body></html>",
    );

    let pipeline = Pipeline::new(generator, fetcher);

    let existing = pipeline
        .scan_website_for_keywords("https://yogashop.example")
        .await
        .unwrap();
    assert_eq!(existing.len(), 2);

    let candidates = pipeline
        .generate_keyword_opportunities("https://yogashop.example", &existing, Some("fitness"))
        .await
        .unwrap();

    let classified = pipeline
        .strategically_analyze_keywords(candidates, "yoga gear")
        .await
        .unwrap();

    // Every keyword ends up fully classified: the one the model answered
    // for takes its values, the rest get the deterministic fallback
    for candidate in &classified {
        assert!(candidate.keyword_tier.is_some());
        assert!(candidate.cluster.is_some());
        assert!(candidate.buyer_journey_stage.is_some());
        assert!(candidate.conversion_potential.is_some());
    }

    let priced = classified.iter().find(|c| c.keyword == "yoga mat price").unwrap();
    assert_eq!(priced.keyword_tier, Some(KeywordTier::Primary));
    assert_eq!(priced.conversion_potential, Some(90));

    // Informational fallback keyword landed in awareness
    let informational = classified.iter().find(|c| c.keyword == "what is yoga").unwrap();
    assert_eq!(informational.buyer_journey_stage, Some(BuyerJourneyStage::Awareness));

    // Primary tier sorts first
    assert_eq!(classified[0].keyword_tier, Some(KeywordTier::Primary));
}

#[tokio::test]
async fn test_competitor_path_with_gap_analysis() {
    let generator = MockGenerator::new()
        .with_response(
            "real competitors",
            r#"[
                {"name": "MatCo", "url": "https://matco.example", "estimatedTraffic": 10000},
                {"name": "YogaPro", "url": "https://yogapro.example", "estimatedTraffic": 20000},
                {"name": "Stretchy", "url": "https://stretchy.example"}
            ]"#,
        )
        .with_response(
            "extract the keyword phrases",
            r#"["yoga blocks", "yoga straps"]"#,
        )
        .with_response("content-focus labels", r#"["accessories"]"#);

    let fetcher = MockFetcher::new()
        .with_page("https://matco.example", "<p>blocks and straps</p>")
        .with_page("https://yogapro.example", "<p>blocks and straps</p>")
        .with_page("https://stretchy.example", "<p>blocks and straps</p>");

    let pipeline = Pipeline::new(generator, fetcher);

    let competitors = pipeline
        .find_competitors("https://yogashop.example", "fitness")
        .await
        .unwrap();
    assert_eq!(competitors.len(), 3);

    // Own site covers straps but not blocks
    let own = vec!["Yoga Straps".to_string()];
    let gaps = pipeline.analyze_keyword_gaps(&own, &competitors);

    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].keyword, "yoga blocks");
    assert!(gaps[0].missing_in_own_site);
    assert_eq!(gaps[0].used_by_competitors.len(), 3);
}

#[tokio::test]
async fn test_complete_site_plan_from_keyword() {
    let silos_response = r#"[
        {"pillarTopic": "Yoga Mat Guide", "pillarKeyword": "yoga mat",
         "description": "everything mats", "estimatedSearchVolume": 5000,
         "subTopics": [
            {"topic": "Thick vs thin mats", "keyword": "thick yoga mat",
             "contentType": "comparison", "priority": "high", "estimatedSearchVolume": 800},
            {"topic": "Mat care", "keyword": "clean yoga mat",
             "contentType": "tutorial", "priority": "medium", "estimatedSearchVolume": 400}
         ],
         "internalLinkingStrategy": "hub and spoke"}
    ]"#;

    let generator = MockGenerator::new()
        .with_response("Design 5 content silos", silos_response)
        .with_response(
            "additional sub-topic articles",
            r#"[{"topic": "Travel mats", "keyword": "travel yoga mat",
                 "contentType": "listicle", "priority": "low", "estimatedSearchVolume": 200}]"#,
        )
        .with_response(
            "implementation roadmap",
            r#"{"phases": [
                {"phase": 1, "title": "Foundation", "articles": ["Yoga Mat Guide"],
                 "estimatedDuration": "4 weeks", "focus": "pillars"},
                {"phase": 2, "title": "Commercial", "articles": ["Thick vs thin mats"],
                 "estimatedDuration": "6 weeks", "focus": "money pages"},
                {"phase": 3, "title": "Long tail", "articles": ["Mat care"],
                 "estimatedDuration": "6 weeks", "focus": "support"},
                {"phase": 4, "title": "Coverage", "articles": ["Travel mats"],
                 "estimatedDuration": "8 weeks", "focus": "completeness"}
            ], "longTermStrategy": "own the yoga mat topic"}"#,
        );

    let pipeline = Pipeline::new(generator, MockFetcher::new());

    let plan = pipeline
        .generate_complete_site_plan("yoga mat", Some("fitness"), Some("home yogis"))
        .await
        .unwrap();

    assert_eq!(plan.main_keyword, "yoga mat");
    assert_eq!(plan.niche, "fitness");
    assert_eq!(plan.target_audience, "home yogis");
    assert_eq!(plan.implementation_phases.len(), 4);
    assert_eq!(plan.long_term_strategy, "own the yoga mat topic");

    // Totals derived from silo data, not from the roadmap response:
    // one silo with 2 original + topped-up sub-topics
    assert_eq!(plan.content_silos.len(), 1);
    let silo = &plan.content_silos[0];
    assert!(silo.sub_topics.len() >= 3);
    assert_eq!(plan.total_articles, 1 + silo.sub_topics.len());
    assert_eq!(plan.estimated_total_traffic, silo.total_potential_traffic);

    // Keyword input skips the competitor pass
    assert!(plan.competitor_insights.is_empty());
}

#[tokio::test]
async fn test_site_plan_roadmap_failure_degrades_locally() {
    let silos_response = r#"[
        {"pillarTopic": "Yoga Mat Guide", "pillarKeyword": "yoga mat",
         "estimatedSearchVolume": 5000,
         "subTopics": [
            {"topic": "Mat care", "keyword": "clean yoga mat",
             "contentType": "tutorial", "priority": "medium", "estimatedSearchVolume": 400}
         ]}
    ]"#;

    let generator = MockGenerator::new()
        .with_response("Design 5 content silos", silos_response)
        .with_response("additional sub-topic articles", "[]")
        .with_failure("implementation roadmap");

    let pipeline = Pipeline::new(generator, MockFetcher::new());

    let plan = pipeline
        .generate_complete_site_plan("yoga mat", None, None)
        .await
        .unwrap();

    // Roadmap call failed, the deterministic local roadmap filled in
    assert_eq!(plan.implementation_phases.len(), 4);
    assert_eq!(plan.implementation_phases[0].articles, vec!["Yoga Mat Guide".to_string()]);
    assert!(!plan.long_term_strategy.is_empty());
}

#[tokio::test]
async fn test_fatal_empty_generation_after_retries() {
    // Both retry attempts parse to zero candidates
    let generator = MockGenerator::new()
        .with_response("keyword research specialist", "I cannot help with that.");

    let config = PipelineConfig::default().with_retry(2, std::time::Duration::ZERO);
    let pipeline = Pipeline::new(generator, MockFetcher::new()).with_config(config);

    let result = pipeline
        .generate_keyword_opportunities_from_keyword("yoga mat", None)
        .await;

    match result {
        Err(PipelineError::EmptyGeneration { stage }) => {
            assert_eq!(stage, "opportunity generation")
        }
        other => panic!("expected EmptyGeneration, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn test_progress_flows_to_channel_consumer() {
    let (reporter, mut rx) = ChannelReporter::new(32);

    let generator =
        MockGenerator::new().with_response("keyword research specialist", opportunity_batch());
    let pipeline = Pipeline::new(generator, MockFetcher::new())
        .with_progress(Arc::new(reporter));

    pipeline
        .generate_keyword_opportunities_from_keyword("yoga mat", None)
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(events.len() >= 2);
    assert_eq!(events.last().unwrap().percent, 100);
}
