use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

use alz_recipes::api_connection::Provider;
use alz_recipes::cli::parse_args;
use alz_recipes::config::AppConfig;
use alz_recipes::diet::filter::{filter_recipe, resolve_diseases};
use alz_recipes::diet::RuleRepository;
use alz_recipes::logging::init_logging;
use alz_recipes::recipe::Recipe;
use alz_recipes::recipe_generator::generate_recipe;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();
    init_logging(&cli_args.log_level);

    let mut config = AppConfig::from_env();
    if let Some(path) = &cli_args.rules_file {
        config.rules_file = Some(PathBuf::from(path));
    }
    let repository: Arc<RuleRepository> = Arc::new(config.load_rules()?);

    if cli_args.list_diseases {
        for disease in repository.supported() {
            println!("{}\t{}", disease.code(), disease.label());
        }
        return Ok(());
    }

    // Reject bad codes before spending a generation call.
    let diseases = resolve_diseases(&cli_args.diseases)?;

    let recipe = if let Some(recipe_file) = &cli_args.recipe_file {
        let content = fs::read_to_string(recipe_file)
            .await
            .with_context(|| format!("Failed to read recipe file '{}'", recipe_file))?;
        Recipe::from_json(&content)?
    } else {
        let title = cli_args.title.as_deref().unwrap_or_default();
        let provider = Provider::openrouter(&config.api_key_env_var);
        match generate_recipe(&provider, &config.model, title, &diseases).await {
            Ok(recipe) => recipe,
            Err(e) if cli_args.fallback => {
                warn!("generation failed, serving fallback recipe: {}", e);
                Recipe::fallback(title)
            }
            Err(e) => return Err(anyhow::anyhow!("Recipe generation failed: {}", e)),
        }
    };

    info!(recipe = %recipe.name, "applying dietary restrictions");
    let filtered = filter_recipe(&repository, &recipe, &diseases);

    println!("{}", serde_json::to_string_pretty(&filtered)?);
    Ok(())
}
