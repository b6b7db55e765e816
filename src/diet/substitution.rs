use tracing::debug;

use super::matcher::{find_matches, MatchSpan};
use super::normalizer::NormalizedText;
use super::rules::{Disease, Rule, RuleRepository};
use crate::recipe::IngredientLine;

struct Replacement<'r> {
    span: MatchSpan,
    rule: &'r Rule,
}

/// Rebuilds `normalized.original()` with every replacement spliced in. Spans
/// are comparison-form spans, sorted and non-overlapping.
fn splice(normalized: &NormalizedText<'_>, replacements: &[Replacement<'_>]) -> String {
    let original = normalized.original();
    let mut output = String::with_capacity(original.len());
    let mut cursor = 0;
    for replacement in replacements {
        let range = normalized.original_range(replacement.span.range());
        output.push_str(&original[cursor..range.start]);
        output.push_str(&replacement.rule.substitute);
        cursor = range.end;
    }
    output.push_str(&original[cursor..]);
    output
}

/// Ingredient mode: the first rule (diseases in the given order, rules in
/// repository order) that matches the item wins, and no other rule is tried.
/// Every occurrence of the winning term is replaced and the item is
/// annotated with the text it replaced. `quantity` is never touched.
pub fn substitute_ingredient(
    line: &IngredientLine,
    diseases: &[Disease],
    repository: &RuleRepository,
) -> IngredientLine {
    let normalized = NormalizedText::new(&line.item);

    for &disease in diseases {
        for rule in repository.rules_for(disease) {
            let spans = find_matches(normalized.as_str(), &rule.normalized_term);
            let Some(first) = spans.first() else {
                continue;
            };

            let replaced = &line.item[normalized.original_range(first.range())];
            let replacements: Vec<Replacement<'_>> = spans
                .iter()
                .map(|span| Replacement {
                    span: span.clone(),
                    rule,
                })
                .collect();
            let item = format!(
                "{} (replacing {})",
                splice(&normalized, &replacements),
                replaced
            );
            debug!(%disease, term = %rule.term, "ingredient '{}' -> '{}'", line.item, item);

            return IngredientLine {
                item,
                quantity: line.quantity.clone(),
            };
        }
    }
    line.clone()
}

/// Step mode: every occurrence of every forbidden term of every selected
/// disease is replaced by the bare substitute. All matches are found against
/// the original step, so a substitute is never itself rewritten. When two
/// terms overlap, the earlier disease (then the earlier rule) keeps its match.
pub fn substitute_step(step: &str, diseases: &[Disease], repository: &RuleRepository) -> String {
    let normalized = NormalizedText::new(step);
    let mut replacements: Vec<Replacement<'_>> = Vec::new();

    for &disease in diseases {
        for rule in repository.rules_for(disease) {
            for span in find_matches(normalized.as_str(), &rule.normalized_term) {
                if replacements.iter().any(|taken| taken.span.overlaps(&span)) {
                    continue;
                }
                debug!(%disease, term = %rule.term, "step match at {}..{}", span.start, span.end);
                replacements.push(Replacement { span, rule });
            }
        }
    }

    if replacements.is_empty() {
        return step.to_string();
    }
    replacements.sort_by_key(|replacement| replacement.span.start);
    splice(&normalized, &replacements)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(item: &str, quantity: &str) -> IngredientLine {
        IngredientLine {
            item: item.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn test_ingredient_substitution_with_annotation() {
        let repository = RuleRepository::builtin();
        let result = substitute_ingredient(
            &line("1 colher de manteiga", "15g"),
            &[Disease::Colesterol],
            &repository,
        );
        assert_eq!(result, line("1 colher de azeite de oliva (replacing manteiga)", "15g"));
    }

    #[test]
    fn test_ingredient_keeps_original_spelling_in_annotation() {
        let repository = RuleRepository::builtin();
        let result = substitute_ingredient(
            &line("Açúcar refinado", "2 xícaras"),
            &[Disease::Diabetes],
            &repository,
        );
        assert_eq!(result.item, "adoçante culinário refinado (replacing Açúcar)");
        assert_eq!(result.quantity, "2 xícaras");
    }

    #[test]
    fn test_ingredient_prefers_phrase_listed_first() {
        let repository = RuleRepository::builtin();
        let result = substitute_ingredient(
            &line("açúcar mascavo", "50g"),
            &[Disease::Diabetes],
            &repository,
        );
        assert_eq!(result.item, "adoçante culinário (replacing açúcar mascavo)");
    }

    #[test]
    fn test_ingredient_single_substitution_across_diseases() {
        let repository = RuleRepository::builtin();
        let result = substitute_ingredient(
            &line("manteiga com sal", "20g"),
            &[Disease::Hipertensao, Disease::Colesterol],
            &repository,
        );
        assert_eq!(result.item, "manteiga com ervas finas (replacing sal)");

        let reversed = substitute_ingredient(
            &line("manteiga com sal", "20g"),
            &[Disease::Colesterol, Disease::Hipertensao],
            &repository,
        );
        assert_eq!(reversed.item, "azeite de oliva com sal (replacing manteiga)");
    }

    #[test]
    fn test_shared_term_resolved_by_disease_order() {
        let repository = RuleRepository::builtin();
        let result = substitute_ingredient(
            &line("bacon em cubos", "100g"),
            &[Disease::Colesterol, Disease::Hipertensao],
            &repository,
        );
        assert_eq!(result.item, "peito de peru em cubos (replacing bacon)");
    }

    #[test]
    fn test_ingredient_without_forbidden_term_unchanged() {
        let repository = RuleRepository::builtin();
        let original = line("salsicha de frango", "2 unidades");
        let result = substitute_ingredient(
            &original,
            &[Disease::Hipertensao, Disease::Colesterol, Disease::Diabetes],
            &repository,
        );
        assert_eq!(result, original);
    }

    #[test]
    fn test_step_replaces_terms_from_several_diseases() {
        let repository = RuleRepository::builtin();
        let result = substitute_step(
            "Adicione sal e depois manteiga",
            &[Disease::Hipertensao, Disease::Colesterol],
            &repository,
        );
        assert_eq!(result, "Adicione ervas finas e depois azeite de oliva");
    }

    #[test]
    fn test_step_replaces_every_occurrence() {
        let repository = RuleRepository::builtin();
        let result = substitute_step(
            "Tempere com Sal, prove e acrescente mais sal.",
            &[Disease::Hipertensao],
            &repository,
        );
        assert_eq!(result, "Tempere com ervas finas, prove e acrescente mais ervas finas.");
    }

    #[test]
    fn test_step_does_not_rewrite_substitutes() {
        // "caldo caseiro sem sal" contains "sal" but must survive as-is.
        let repository = RuleRepository::builtin();
        let result = substitute_step(
            "Junte o caldo de carne",
            &[Disease::Hipertensao],
            &repository,
        );
        assert_eq!(result, "Junte o caldo caseiro sem sal");
    }

    #[test]
    fn test_step_leaves_lookalike_words() {
        let repository = RuleRepository::builtin();
        let step = "Guarde o açucareiro e sirva a salada";
        assert_eq!(
            substitute_step(step, &[Disease::Diabetes, Disease::Hipertensao], &repository),
            step
        );
    }
}
