use serde::{Deserialize, Serialize};

use crate::diet::FilterError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub item: String,
    #[serde(rename = "quantidade", alias = "quantity")]
    pub quantity: String,
}

/// A recipe as produced by the generation service. Field names on the wire
/// are the Portuguese ones the service emits; English names are accepted too.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Recipe {
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(rename = "descricao", alias = "description")]
    pub description: String,
    #[serde(rename = "rendimento", alias = "yield")]
    pub recipe_yield: String,
    #[serde(rename = "tempoPreparo", alias = "prepTime")]
    pub prep_time: String,
    #[serde(rename = "ingredientes", alias = "ingredients")]
    pub ingredients: Vec<IngredientLine>,
    #[serde(rename = "modoPreparo", alias = "steps", default)]
    pub steps: Vec<String>,
    #[serde(rename = "beneficios", alias = "benefits")]
    pub benefits: Vec<String>,
}

impl Recipe {
    pub fn from_json(text: &str) -> Result<Self, FilterError> {
        serde_json::from_str(text).map_err(|e| FilterError::MalformedRecipe(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, FilterError> {
        serde_json::from_value(value).map_err(|e| FilterError::MalformedRecipe(e.to_string()))
    }

    /// Placeholder recipe served when generation fails and the caller opted
    /// into a fallback.
    pub fn fallback(title: &str) -> Self {
        Recipe {
            name: format!("Receita de {}", title),
            description: "Receita nutritiva para Alzheimer".to_string(),
            recipe_yield: "2 porções".to_string(),
            prep_time: "30 minutos".to_string(),
            ingredients: vec![
                IngredientLine {
                    item: "Ingrediente 1".to_string(),
                    quantity: "100g".to_string(),
                },
                IngredientLine {
                    item: "Ingrediente 2".to_string(),
                    quantity: "50g".to_string(),
                },
            ],
            steps: vec!["Passo 1".to_string(), "Passo 2".to_string()],
            benefits: vec![
                "Melhora memória".to_string(),
                "Fortalece o cérebro".to_string(),
            ],
        }
    }
}
