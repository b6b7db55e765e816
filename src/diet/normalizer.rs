use std::ops::Range;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase, decompose, drop combining marks. Comparison-only: the result
/// is never written back into a recipe.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Comparison form of a text together with, for every character of that
/// form, the byte range of the original character it came from.
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    original: &'a str,
    form: String,
    // (byte offset in `form`, byte range in `original`)
    origins: Vec<(usize, Range<usize>)>,
}

impl<'a> NormalizedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut form = String::with_capacity(original.len());
        let mut origins = Vec::with_capacity(original.len());

        for (start, c) in original.char_indices() {
            let source = start..start + c.len_utf8();
            for folded in c.to_lowercase().nfd().filter(|f| !is_combining_mark(*f)) {
                origins.push((form.len(), source.clone()));
                form.push(folded);
            }
        }

        NormalizedText {
            original,
            form,
            origins,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.form
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    /// Maps a byte span of the comparison form back onto the original text.
    /// Spans must start and end on character boundaries of the form.
    pub fn original_range(&self, span: Range<usize>) -> Range<usize> {
        if span.start >= span.end {
            let at = self.original_offset(span.start);
            return at..at;
        }
        let first = self.origin_index(span.start);
        let last = self.origin_index(span.end - 1);
        let mut end = self.origins[last].1.end;
        // Trailing combining marks belong to the last character.
        for c in self.original[end..].chars() {
            if !is_combining_mark(c) {
                break;
            }
            end += c.len_utf8();
        }
        self.origins[first].1.start..end
    }

    fn original_offset(&self, form_offset: usize) -> usize {
        if form_offset >= self.form.len() {
            return self.original.len();
        }
        self.origins[self.origin_index(form_offset)].1.start
    }

    fn origin_index(&self, form_offset: usize) -> usize {
        match self.origins.binary_search_by_key(&form_offset, |(at, _)| *at) {
            Ok(index) => index,
            // Offset falls inside a multi-byte char of the form.
            Err(index) => index.saturating_sub(1),
        }
    }
}
