//! Whole-word, case-insensitive keyword matching.
//!
//! The keyword is escaped, so `c++` or `a.b` match literally. A match only
//! counts when the characters on both sides of it are not word characters
//! (alphanumeric or `_`) or are the text edges. The check looks at the
//! neighbors instead of using `\b`, so keywords that start or end with
//! punctuation still match: `c++` is found in `"I love c++ too"`.
//! `"niño"` is one word and `"cat"` does not match inside `"catnip"`.

use regex::{Regex, RegexBuilder};

/// A compiled keyword matcher.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
}

impl KeywordMatcher {
    /// Compile a matcher for `keyword`. Returns `None` for blank input.
    pub fn new(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return None;
        }
        // An escaped literal always compiles; the size limit is the only way out.
        let regex = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
            .ok()?;
        Some(Self { regex })
    }

    /// Whether `text` contains the keyword as a whole word.
    pub fn is_match(&self, text: &str) -> bool {
        self.whole_words(text).next().is_some()
    }

    /// Byte ranges of every match, for highlighting.
    pub fn find_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        self.whole_words(text).collect()
    }

    /// Literal hits that are bounded by non-word characters on both sides.
    fn whole_words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        let mut from = 0;
        std::iter::from_fn(move || {
            while let Some(m) = self.regex.find_at(text, from) {
                if is_bounded(text, m.start(), m.end()) {
                    from = m.end();
                    return Some((m.start(), m.end()));
                }
                // Retry one character further; hits may overlap
                from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            }
            None
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(keyword: &str, text: &str) -> bool {
        KeywordMatcher::new(keyword).unwrap().is_match(text)
    }

    #[test]
    fn test_whole_word_only() {
        assert!(!matches("cat", "I love catnip"));
        assert!(matches("cat", "I have a cat"));
        assert!(matches("cat", "cat."));
        assert!(!matches("cat", "concatenate"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("CAT", "I have a cat"));
        assert!(matches("cat", "My CAT is asleep"));
    }

    #[test]
    fn test_special_characters_are_literal() {
        assert!(matches("a.b", "see a.b here"));
        assert!(!matches("a.b", "see axb here"));
        assert!(matches("1+1", "is 1+1 two"));
        assert!(!matches("1+1", "is 11 two"));
    }

    #[test]
    fn test_unicode_word_characters() {
        assert!(matches("niño", "el niño juega"));
        assert!(!matches("niñ", "el niño juega"));
        assert!(matches("ÁRBOL", "un árbol"));
        assert!(!matches("foo", "foo_bar"));
    }

    #[test]
    fn test_punctuation_at_keyword_edges() {
        assert!(matches("c++", "I love c++ too"));
        assert!(matches("c++", "c++"));
        assert!(matches("C++", "(c++)"));
        assert!(!matches("c++", "I love c++x"));
        assert!(!matches("c++", "abc++ too"));
        assert!(matches(".net", "we use .net here"));
        assert!(!matches(".net", "see a.net"));
        assert!(matches("hola!", "dijo hola! y se fue"));
    }

    #[test]
    fn test_overlapping_candidates() {
        // First literal hit is inside a word, the next one is whole
        assert!(matches("aa", "aaa aa"));
        let m = KeywordMatcher::new("c++").unwrap();
        assert_eq!(m.find_ranges("c++ c++"), vec![(0, 3), (4, 7)]);
    }

    #[test]
    fn test_blank_keyword_has_no_matcher() {
        assert!(KeywordMatcher::new("").is_none());
        assert!(KeywordMatcher::new("  \t").is_none());
    }

    #[test]
    fn test_find_ranges() {
        let m = KeywordMatcher::new("sol").unwrap();
        assert_eq!(m.find_ranges("Sol y sol, solsticio"), vec![(0, 3), (6, 9)]);
    }
}
