//! Golden file tests for recipe lookup and normalization.
//!
//! Each JSON file in `fixtures/` holds a recorded `search.php` response and
//! the recipe it must normalize to, including the exact text rendering.

use cocktail_core::{LookupClient, MockClient};
use glob::glob;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// A test case loaded from a JSON fixture file
#[derive(Debug, Deserialize)]
struct TestCase {
    /// Name passed to the lookup
    query: String,
    /// Body the API returned for that query
    response: serde_json::Value,
    expected: ExpectedRecipe,
}

#[derive(Debug, Deserialize)]
struct ExpectedRecipe {
    name: String,
    glass: String,
    /// Ingredient/amount pairs in slot order
    ingredients: Vec<(String, String)>,
    instructions: Vec<String>,
    rendered: String,
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let pattern = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/*.json");

    let mut cases = Vec::new();
    for entry in glob(&pattern.to_string_lossy()).expect("Failed to read glob pattern") {
        let path = entry.expect("Failed to read directory entry");
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        let case: TestCase = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
        cases.push((name, case));
    }

    assert!(!cases.is_empty(), "No test fixtures found for {:?}", pattern);
    cases
}

#[tokio::test]
async fn test_lookup_golden_files() {
    for (name, case) in load_test_cases() {
        println!("Testing: {}", name);

        let urls = LookupClient::new(MockClient::new());
        let url = urls.search_url(&case.query).unwrap();
        let lookup = LookupClient::new(MockClient::new().with_json(&url, &case.response));

        let recipe = lookup
            .lookup_by_name(&case.query)
            .await
            .unwrap_or_else(|e| panic!("Lookup failed for {}: {}", name, e));

        assert_eq!(recipe.name(), case.expected.name, "Name mismatch for {}", name);
        assert_eq!(recipe.glass(), case.expected.glass, "Glass mismatch for {}", name);

        let ingredients: Vec<(String, String)> = recipe
            .ingredients()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(
            ingredients, case.expected.ingredients,
            "Ingredients mismatch for {}",
            name
        );

        assert_eq!(
            recipe.instructions(),
            case.expected.instructions.as_slice(),
            "Instructions mismatch for {}",
            name
        );
        assert!(
            recipe.instructions().iter().all(|step| !step.is_empty()),
            "Empty instruction step for {}",
            name
        );

        assert_eq!(
            recipe.to_string(),
            case.expected.rendered,
            "Rendering mismatch for {}\n\nExpected:\n{}\n\nActual:\n{}",
            name,
            case.expected.rendered,
            recipe
        );
    }
}

#[tokio::test]
async fn test_mojito_ingredients() {
    let content = fs::read_to_string(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mojito.json"),
    )
    .unwrap();
    let case: TestCase = serde_json::from_str(&content).unwrap();

    let urls = LookupClient::new(MockClient::new());
    let url = urls.search_url("Mojito").unwrap();
    let lookup = LookupClient::new(MockClient::new().with_json(&url, &case.response));
    let recipe = lookup.lookup_by_name("Mojito").await.unwrap();

    let mut ingredients: Vec<(&str, &str)> = recipe
        .ingredients()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    ingredients.sort();
    assert_eq!(
        ingredients,
        vec![
            ("Light rum", "2-3 oz"),
            ("Lime", "Juice of 1"),
            ("Mint", "2-4"),
            ("Soda water", "To Taste"),
            ("Sugar", "2 tsp"),
        ]
    );
}

#[tokio::test]
async fn test_tom_collins_drops_trailing_empty_steps() {
    let content = fs::read_to_string(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tom_collins.json"),
    )
    .unwrap();
    let case: TestCase = serde_json::from_str(&content).unwrap();

    let raw = case.response["drinks"][0]["strInstructions"].as_str().unwrap();
    assert!(raw.ends_with("\r\n\r\n"));

    let steps = cocktail_core::parse_instructions(raw);
    assert_eq!(steps.len(), 5);
    assert_eq!(steps[1], "Shake well");
}
