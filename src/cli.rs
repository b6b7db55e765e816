use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").args(["title", "recipe_file", "list_diseases"]).required(true)))]
pub struct Cli {
    /// Title of the recipe to generate
    #[arg(short, long)]
    pub title: Option<String>,

    /// Path to an existing recipe JSON file to filter instead of generating one
    #[arg(short, long)]
    pub recipe_file: Option<String>,

    /// Disease codes to adapt the recipe for (diabetes, hipertensao, colesterol)
    #[arg(short, long, value_delimiter = ',')]
    pub diseases: Vec<String>,

    /// JSON file overriding the built-in substitution rules
    #[arg(long)]
    pub rules_file: Option<String>,

    /// Serve a placeholder recipe when generation fails
    #[arg(long)]
    pub fallback: bool,

    /// Print the supported disease codes and exit
    #[arg(long)]
    pub list_diseases: bool,

    #[arg(long, default_value = "info")]
    pub log_level: String,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
