use thiserror::Error;
use tracing::{debug, info};

use crate::api_connection::endpoints::{ChatCompletionRequest, ChatMessage, Provider, ResponseFormat};
use crate::api_connection::connection::ApiConnectionError;
use crate::diet::{Disease, FilterError};
use crate::recipe::Recipe;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Connection(#[from] ApiConnectionError),
    #[error("generation service returned no content")]
    EmptyResponse,
    #[error("generation service returned unparsable content: {0}")]
    Unparsable(#[source] serde_json::Error),
    /// Valid JSON that does not have the recipe shape.
    #[error("generation service returned a malformed recipe: {0}")]
    MalformedRecipe(#[source] FilterError),
}

fn build_prompt(title: &str, diseases: &[Disease]) -> String {
    let conditions = if diseases.is_empty() {
        String::new()
    } else {
        let labels: Vec<&str> = diseases.iter().map(Disease::label).collect();
        format!(
            "\nA pessoa também tem: {}. Evite ingredientes inadequados para essas condições.\n",
            labels.join(", ")
        )
    };

    format!(
        "Crie uma receita adequada para pessoas com Alzheimer.
{conditions}
Regras IMPORTANTES:
- Responda APENAS com um JSON válido
- NÃO use ```json
- NÃO escreva texto fora do JSON

Formato obrigatório:
{{
  \"nome\": \"Nome da receita\",
  \"descricao\": \"Breve descrição\",
  \"rendimento\": \"Ex: 2 porções\",
  \"tempoPreparo\": \"Ex: 30 minutos\",
  \"ingredientes\": [
    {{\"item\": \"Ingrediente\", \"quantidade\": \"Quantidade\"}}
  ],
  \"modoPreparo\": [
    \"Passo 1\",
    \"Passo 2\"
  ],
  \"beneficios\": [
    \"Benefício 1\",
    \"Benefício 2\"
  ]
}}

Título da receita: \"{title}\"
"
    )
}

/// Removes a surrounding ```json ... ``` (or bare ```) fence if the model
/// added one despite being told not to.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.ends_with("```") {
        return trimmed;
    }
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    inner.trim_end_matches("```").trim()
}

/// Parses the raw text of a completion into a recipe.
pub fn parse_recipe_content(content: &str) -> Result<Recipe, GenerationError> {
    let content = strip_code_fences(content);
    if content.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        debug!("failed to parse completion as JSON: {}. Content was:\n{}", e, content);
        GenerationError::Unparsable(e)
    })?;
    Recipe::from_value(value).map_err(GenerationError::MalformedRecipe)
}

pub async fn generate_recipe(
    provider: &Provider,
    model: &str,
    title: &str,
    diseases: &[Disease],
) -> Result<Recipe, GenerationError> {
    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(build_prompt(title, diseases))],
        response_format: Some(ResponseFormat::json_object()),
        temperature: Some(0.4),
        max_tokens: Some(2048),
    };

    info!(%title, %model, "requesting recipe");
    let response = provider.call_chat_completion(request).await?;
    let choice = response
        .choices
        .first()
        .ok_or(GenerationError::EmptyResponse)?;
    debug!("raw completion content:\n{}", choice.message.content);

    parse_recipe_content(&choice.message.content)
}
