use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::matcher::is_matchable;
use super::normalizer::normalize;
use super::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disease {
    Diabetes,
    Hipertensao,
    Colesterol,
}

impl Disease {
    pub const ALL: [Disease; 3] = [Disease::Diabetes, Disease::Hipertensao, Disease::Colesterol];

    pub fn code(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::Hipertensao => "hipertensao",
            Disease::Colesterol => "colesterol",
        }
    }

    /// Human-readable condition name, used when prompting the generator.
    pub fn label(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::Hipertensao => "hipertensão",
            Disease::Colesterol => "colesterol alto",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Disease {
    type Err = FilterError;

    /// Accepts any casing or accentuation of a known code ("Hipertensão").
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(code.trim());
        Disease::ALL
            .into_iter()
            .find(|disease| disease.code() == wanted)
            .ok_or_else(|| FilterError::UnknownDisease(code.to_string()))
    }
}

/// One forbidden term and what replaces it. `normalized_term` is the
/// comparison form, computed once when the repository is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub term: String,
    pub substitute: String,
    pub normalized_term: String,
}

impl Rule {
    pub fn new(term: &str, substitute: &str) -> Self {
        Rule {
            term: term.to_string(),
            substitute: substitute.to_string(),
            normalized_term: normalize(term),
        }
    }
}

// Phrases come before the single words they start with.
const DIABETES_RULES: &[(&str, &str)] = &[
    ("açúcar mascavo", "adoçante culinário"),
    ("açúcar", "adoçante culinário"),
    ("leite condensado", "iogurte natural com adoçante"),
    ("mel", "canela em pó"),
    ("farinha de trigo", "farinha de aveia"),
    ("arroz branco", "arroz integral"),
    ("refrigerante", "água com gás e limão"),
];

const HIPERTENSAO_RULES: &[(&str, &str)] = &[
    ("sal", "ervas finas"),
    ("caldo de carne", "caldo caseiro sem sal"),
    ("molho de soja", "molho de ervas"),
    ("shoyu", "molho de ervas"),
    ("bacon", "peito de frango grelhado"),
    ("linguiça", "frango desfiado"),
    ("presunto", "frango desfiado"),
    ("azeitona", "tomate-cereja"),
];

const COLESTEROL_RULES: &[(&str, &str)] = &[
    ("manteiga", "azeite de oliva"),
    ("margarina", "azeite de oliva"),
    ("creme de leite", "iogurte natural desnatado"),
    ("leite integral", "leite desnatado"),
    ("bacon", "peito de peru"),
    ("banha", "óleo de canola"),
    ("queijo amarelo", "queijo branco"),
];

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rules file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("rule for {disease} has a forbidden term with no letters or digits")]
    EmptyTerm { disease: Disease },
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    term: String,
    substitute: String,
}

/// Read-only mapping from disease to its ordered substitution rules.
/// Built once at start-up and shared by reference afterwards.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    tables: HashMap<Disease, Vec<Rule>>,
}

impl Default for RuleRepository {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleRepository {
    pub fn builtin() -> Self {
        let table = |rules: &[(&str, &str)]| -> Vec<Rule> {
            rules
                .iter()
                .map(|(term, substitute)| Rule::new(term, substitute))
                .collect()
        };

        let mut tables = HashMap::new();
        tables.insert(Disease::Diabetes, table(DIABETES_RULES));
        tables.insert(Disease::Hipertensao, table(HIPERTENSAO_RULES));
        tables.insert(Disease::Colesterol, table(COLESTEROL_RULES));
        RuleRepository { tables }
    }

    /// Built-in tables, with every disease named in the JSON file replaced
    /// by the file's list. Unknown disease keys fail deserialization.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, RulesError> {
        let overrides: HashMap<Disease, Vec<RuleEntry>> =
            serde_json::from_str(json).map_err(|source| RulesError::Parse {
                path: origin.to_string(),
                source,
            })?;

        let mut repository = Self::builtin();
        for (disease, entries) in overrides {
            let mut rules = Vec::with_capacity(entries.len());
            for entry in entries {
                let rule = Rule::new(&entry.term, &entry.substitute);
                if !is_matchable(&rule.normalized_term) {
                    return Err(RulesError::EmptyTerm { disease });
                }
                rules.push(rule);
            }
            tracing::debug!(%disease, count = rules.len(), "rules overridden from {}", origin);
            repository.tables.insert(disease, rules);
        }
        Ok(repository)
    }

    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let display = path.display().to_string();
        let json = fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json_str(&json, &display)
    }

    pub fn supported(&self) -> &'static [Disease] {
        &Disease::ALL
    }

    pub fn rules_for(&self, disease: Disease) -> &[Rule] {
        self.tables
            .get(&disease)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks up rules by raw code, rejecting anything outside the fixed set.
    pub fn rules_for_code(&self, code: &str) -> Result<&[Rule], FilterError> {
        let disease = code.parse::<Disease>()?;
        Ok(self.rules_for(disease))
    }
}
