use alz_recipes::api_connection::{
    connection::ApiConnectionError,
    endpoints::{is_known_model, ChatCompletionRequest, ChatMessage, Provider, DEFAULT_MODEL},
};
use alz_recipes::diet::Disease;
use alz_recipes::recipe_generator::{generate_recipe, GenerationError};
use dotenv::dotenv;
use std::env;

const TEST_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

fn get_default_test_model() -> String {
    assert!(is_known_model(DEFAULT_MODEL), "DEFAULT_MODEL missing from OPENROUTER_MODELS");
    DEFAULT_MODEL.to_string()
}

fn setup_test_environment() {
    dotenv().ok();
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let provider = Provider::openrouter("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let request = ChatCompletionRequest {
        model: get_default_test_model(),
        messages: vec![ChatMessage::user("Olá")],
        response_format: None,
        temperature: None,
        max_tokens: None,
    };
    let result = provider.call_chat_completion(request).await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
    if let Err(ApiConnectionError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[tokio::test]
async fn test_generation_surfaces_missing_key_as_generation_error() {
    setup_test_environment();
    let provider = Provider::openrouter("ANOTHER_KEY_THAT_DOES_NOT_EXIST_QWERTY");
    let result = generate_recipe(
        &provider,
        &get_default_test_model(),
        "Purê de abóbora",
        &[Disease::Diabetes],
    )
    .await;
    assert!(matches!(
        result,
        Err(GenerationError::Connection(ApiConnectionError::MissingApiKey(_)))
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    setup_test_environment();
    const KEY_ENV: &str = "ALZ_TEST_UNREACHABLE_ENDPOINT_KEY";
    std::env::set_var(KEY_ENV, "unused");
    // Port 9 (discard) on localhost is not expected to serve HTTP.
    let provider = Provider::openrouter_at(KEY_ENV, "http://127.0.0.1:9/v1/chat/completions");
    let request = ChatCompletionRequest {
        model: get_default_test_model(),
        messages: vec![ChatMessage::user("Olá")],
        response_format: None,
        temperature: None,
        max_tokens: None,
    };
    let result = provider.call_chat_completion(request).await;
    assert!(
        matches!(result, Err(ApiConnectionError::NetworkError(_))),
        "Expected NetworkError, got {:?}",
        result
    );
    std::env::remove_var(KEY_ENV);
}

#[tokio::test]
#[ignore]
async fn test_successful_recipe_generation() {
    setup_test_environment();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!(
            "Skipping test_successful_recipe_generation: {} not set.",
            TEST_API_KEY_ENV_VAR
        );
        return;
    }

    let provider = Provider::openrouter(TEST_API_KEY_ENV_VAR);
    let result = generate_recipe(
        &provider,
        &get_default_test_model(),
        "Sopa de legumes",
        &[Disease::Hipertensao],
    )
    .await;
    assert!(result.is_ok(), "Generation failed: {:?}", result.err());
    let recipe = result.unwrap();
    assert!(!recipe.name.is_empty());
    assert!(!recipe.ingredients.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_api_error_with_invalid_key() {
    setup_test_environment();

    const INVALID_KEY_ENV_NAME_FOR_THIS_TEST: &str = "ENV_VAR_WITH_BAD_KEY_VALUE";
    std::env::set_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST, "this_is_a_deliberately_bad_api_key_string_for_testing");

    let provider = Provider::openrouter(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    let request = ChatCompletionRequest {
        model: get_default_test_model(),
        messages: vec![ChatMessage::user("This call should fail due to invalid key.")],
        response_format: None,
        temperature: None,
        max_tokens: None,
    };

    let result = provider.call_chat_completion(request).await;
    assert!(matches!(result, Err(ApiConnectionError::ApiError { .. })), "Expected ApiError, got {:?}", result);
    if let Err(ApiConnectionError::ApiError { status, .. }) = result {
        assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
    }

    std::env::remove_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
}
