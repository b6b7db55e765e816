use serde::{Deserialize, Serialize};
use tracing::info;

use super::rules::{Disease, RuleRepository};
use super::substitution::{substitute_ingredient, substitute_step};
use super::FilterError;
use crate::recipe::Recipe;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub recipe: Recipe,
    #[serde(default)]
    pub diseases: Vec<String>,
}

/// Parses and de-duplicates disease codes, keeping first-occurrence order.
/// Fails on the first code outside the supported set.
pub fn resolve_diseases<S: AsRef<str>>(codes: &[S]) -> Result<Vec<Disease>, FilterError> {
    let mut diseases = Vec::with_capacity(codes.len());
    for code in codes {
        let disease: Disease = code.as_ref().parse()?;
        if !diseases.contains(&disease) {
            diseases.push(disease);
        }
    }
    Ok(diseases)
}

/// Rewrites ingredient items and steps so the recipe respects every selected
/// disease. The input is never modified; name, description, yield, prep time,
/// benefits and quantities pass through unchanged.
pub fn filter(repository: &RuleRepository, request: FilterRequest) -> Result<Recipe, FilterError> {
    let FilterRequest { recipe, diseases } = request;
    if diseases.is_empty() {
        return Ok(recipe);
    }
    let diseases = resolve_diseases(&diseases)?;
    Ok(filter_recipe(repository, &recipe, &diseases))
}

/// Same transform over already-validated diseases, borrowing the recipe.
pub fn filter_recipe(repository: &RuleRepository, recipe: &Recipe, diseases: &[Disease]) -> Recipe {
    if diseases.is_empty() {
        return recipe.clone();
    }

    let ingredients: Vec<_> = recipe
        .ingredients
        .iter()
        .map(|line| substitute_ingredient(line, diseases, repository))
        .collect();
    let steps: Vec<_> = recipe
        .steps
        .iter()
        .map(|step| substitute_step(step, diseases, repository))
        .collect();

    let changed_ingredients = ingredients
        .iter()
        .zip(&recipe.ingredients)
        .filter(|(new, old)| new != old)
        .count();
    let changed_steps = steps
        .iter()
        .zip(&recipe.steps)
        .filter(|(new, old)| new != old)
        .count();
    info!(
        recipe = %recipe.name,
        diseases = ?diseases,
        changed_ingredients,
        changed_steps,
        "dietary filter applied"
    );

    Recipe {
        ingredients,
        steps,
        ..recipe.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_diseases_dedups_in_order() {
        let diseases = resolve_diseases(&["Colesterol", "diabetes", "colesterol"]).unwrap();
        assert_eq!(diseases, vec![Disease::Colesterol, Disease::Diabetes]);
    }

    #[test]
    fn test_resolve_diseases_fails_fast() {
        let result = resolve_diseases(&["diabetes", "gota", "escorbuto"]);
        assert_eq!(result, Err(FilterError::UnknownDisease("gota".to_string())));
    }
}
