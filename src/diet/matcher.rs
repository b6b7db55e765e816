use std::ops::Range;

/// Byte span of a match inside the comparison-form haystack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

/// Maximal runs of letters and digits. Everything else is a boundary.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut current: Option<usize> = None;

    for (at, c) in text.char_indices() {
        match (c.is_alphanumeric(), current) {
            (true, None) => current = Some(at),
            (false, Some(start)) => {
                tokens.push(Token {
                    text: &text[start..at],
                    start,
                    end: at,
                });
                current = None;
            }
            _ => {}
        }
    }
    if let Some(start) = current {
        tokens.push(Token {
            text: &text[start..],
            start,
            end: text.len(),
        });
    }
    tokens
}

// "creme  de leite" joins like "creme de leite"; "creme, de" does not.
fn same_separator(haystack_gap: &str, term_gap: &str) -> bool {
    haystack_gap.split_whitespace().eq(term_gap.split_whitespace())
}

/// True when `term` (in comparison form) has at least one token, i.e. it
/// can ever produce a match.
pub fn is_matchable(term: &str) -> bool {
    !tokenize(term).is_empty()
}

/// Finds whole-token occurrences of `term` in `haystack`. Both must already
/// be in comparison form. Returned spans never overlap and are in order.
pub fn find_matches(haystack: &str, term: &str) -> Vec<MatchSpan> {
    let term_tokens = tokenize(term);
    if term_tokens.is_empty() {
        return Vec::new();
    }
    let term_gaps: Vec<&str> = term_tokens
        .windows(2)
        .map(|pair| &term[pair[0].end..pair[1].start])
        .collect();

    let tokens = tokenize(haystack);
    let width = term_tokens.len();
    let mut matches = Vec::new();
    let mut index = 0;

    while index + width <= tokens.len() {
        let window = &tokens[index..index + width];
        let words_match = window
            .iter()
            .zip(&term_tokens)
            .all(|(candidate, wanted)| candidate.text == wanted.text);
        let gaps_match = words_match
            && window
                .windows(2)
                .zip(&term_gaps)
                .all(|(pair, gap)| same_separator(&haystack[pair[0].end..pair[1].start], gap));

        if gaps_match {
            matches.push(MatchSpan {
                start: window[0].start,
                end: window[width - 1].end,
            });
            index += width;
        } else {
            index += 1;
        }
    }
    matches
}
