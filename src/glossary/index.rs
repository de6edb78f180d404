//! Case-insensitive, longest-match glossary replacement.

use regex::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use super::{GlossaryError, GlossaryRule};

// Large glossaries compile to big alternations; the regex default of 10 MiB
// is too small for a few thousand multi-word terms.
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Immutable, case-insensitive lookup of glossary rules.
///
/// Rules are keyed by a case-folded source term, so `Hello`, `hello` and
/// `HELLO` share one entry. When two rules share a key, the later one wins.
///
/// Folding goes through uppercase first, which also unifies letters whose
/// lowercase does not round-trip (`qızıl` and `QIZIL` share a key).
#[derive(Debug, Clone, Default)]
pub struct GlossaryIndex {
    /// Rules in match precedence order (longest source first).
    rules: Vec<GlossaryRule>,
    /// Folded source term to position in `rules`.
    keys: HashMap<String, usize>,
    pattern: Option<Regex>,
}

impl GlossaryIndex {
    /// Creates an index with no rules. Applying it is the identity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an index from rules, compiling a single word-bounded pattern.
    ///
    /// Each source contributes its verbatim, lowercase, titlecase and
    /// uppercase spellings as branches, so case pairs the regex engine does
    /// not fold (dotless `ı` against `I`) still match.
    pub fn from_rules<I>(rules: I) -> Result<Self, GlossaryError>
    where
        I: IntoIterator<Item = GlossaryRule>,
    {
        let mut by_key: HashMap<String, GlossaryRule> = HashMap::new();
        for rule in rules {
            if rule.source.trim().is_empty() {
                continue;
            }
            by_key.insert(fold_case(&rule.source), rule);
        }

        if by_key.is_empty() {
            return Ok(Self::empty());
        }

        let mut entries: Vec<(String, GlossaryRule)> = by_key.into_iter().collect();
        entries.sort_by(|(a_key, a), (b_key, b)| {
            b.source
                .chars()
                .count()
                .cmp(&a.source.chars().count())
                .then_with(|| a_key.cmp(b_key))
        });

        let branches: BTreeSet<(Reverse<usize>, String)> = entries
            .iter()
            .flat_map(|(_, rule)| case_variants(&rule.source))
            .map(|variant| (Reverse(variant.chars().count()), variant))
            .collect();
        let alternation = branches
            .iter()
            .map(|(_, variant)| regex::escape(variant))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        let mut keys = HashMap::new();
        for (position, (key, rule)) in entries.iter().enumerate() {
            keys.insert(key.clone(), position);
            for variant in case_variants(&rule.source) {
                keys.entry(fold_case(&variant)).or_insert(position);
            }
        }
        let rules = entries.into_iter().map(|(_, rule)| rule).collect();

        Ok(Self {
            rules,
            keys,
            pattern: Some(pattern),
        })
    }

    /// Number of distinct (case-insensitive) source terms.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in the order they take precedence when matching.
    pub fn rules(&self) -> &[GlossaryRule] {
        &self.rules
    }

    /// Returns the authored target for `term`, ignoring the case of `term`.
    pub fn lookup(&self, term: &str) -> Option<&str> {
        self.keys
            .get(&fold_case(term))
            .and_then(|&position| self.rules.get(position))
            .map(|rule| rule.target.as_str())
    }

    /// Replaces every whole-word occurrence of a source term in `text`.
    ///
    /// The longest source term wins where several could match, and the
    /// replacement is the target exactly as authored. Text is returned
    /// borrowed when nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let Some(pattern) = &self.pattern else {
            return Cow::Borrowed(text);
        };

        pattern.replace_all(text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            self.lookup(matched).unwrap_or(matched).to_owned()
        })
    }
}

/// Case key shared by every spelling of a term.
fn fold_case(term: &str) -> String {
    term.to_uppercase().to_lowercase()
}

/// Verbatim, lowercase, titlecase and uppercase spellings of `source`.
fn case_variants(source: &str) -> [String; 4] {
    let lower = source.to_lowercase();
    let mut chars = lower.chars();
    let title = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    });
    [source.to_string(), lower, title, source.to_uppercase()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn index(rules: &[(&str, &str)]) -> GlossaryIndex {
        GlossaryIndex::from_rules(
            rules
                .iter()
                .map(|(source, target)| GlossaryRule::new(*source, *target)),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_index_is_identity() {
        let glossary = GlossaryIndex::empty();
        let result = glossary.apply("Nothing changes here.");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Nothing changes here.");
        assert!(glossary.is_empty());
    }

    #[test]
    fn test_from_rules_without_rules_is_empty() {
        let glossary = GlossaryIndex::from_rules(Vec::new()).unwrap();
        assert!(glossary.is_empty());
        assert_eq!(glossary.apply("text"), "text");
    }

    #[test]
    fn test_apply_ignores_match_case() {
        let glossary = index(&[("hello", "salam")]);
        assert_eq!(glossary.apply("HELLO there"), "salam there");
        assert_eq!(glossary.apply("Hello"), "salam");
        assert_eq!(glossary.apply("hElLo"), "salam");
    }

    #[test]
    fn test_apply_emits_target_as_authored() {
        let glossary = index(&[("Baku", "BAKI")]);
        assert_eq!(glossary.apply("welcome to baku"), "welcome to BAKI");
    }

    #[test]
    fn test_apply_prefers_longest_term() {
        let glossary = index(&[("bank", "banka"), ("bank account", "hesab")]);
        assert_eq!(glossary.apply("open a bank account"), "open a hesab");
        assert_eq!(glossary.apply("the bank is closed"), "the banka is closed");
    }

    #[test]
    fn test_apply_longest_term_independent_of_rule_order() {
        let glossary = index(&[("state machine", "vəziyyət maşını"), ("state", "dövlət")]);
        assert_eq!(
            glossary.apply("The state machine and the state."),
            "The vəziyyət maşını and the dövlət."
        );
    }

    #[test]
    fn test_apply_whole_words_only() {
        let glossary = index(&[("cat", "pişik")]);
        assert_eq!(glossary.apply("concatenate"), "concatenate");
        assert_eq!(glossary.apply("cats"), "cats");
        assert_eq!(glossary.apply("a cat, a CAT."), "a pişik, a pişik.");
    }

    #[test]
    fn test_apply_escapes_regex_metacharacters() {
        let glossary = index(&[("e.g", "məsələn"), ("a+b", "cəm")]);
        assert_eq!(glossary.apply("e.g here"), "məsələn here");
        assert_eq!(glossary.apply("eXg here"), "eXg here");
    }

    #[test]
    fn test_apply_is_idempotent_without_chains() {
        let glossary = index(&[("hello", "salam"), ("world", "dünya")]);
        let once = glossary.apply("Hello world, HELLO WORLD").into_owned();
        let twice = glossary.apply(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_later_rule_wins_for_same_key() {
        let glossary = index(&[("Hello", "first"), ("HELLO", "second")]);
        assert_eq!(glossary.len(), 1);
        assert_eq!(glossary.apply("hello"), "second");
    }

    #[test]
    fn test_case_variants_register_once() {
        let glossary = index(&[("bank", "banka"), ("Bank", "banka"), ("BANK", "banka")]);
        assert_eq!(glossary.len(), 1);
        assert_eq!(glossary.rules().len(), 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let glossary = index(&[("Hello", "salam")]);
        assert_eq!(glossary.lookup("hello"), Some("salam"));
        assert_eq!(glossary.lookup("HELLO"), Some("salam"));
        assert_eq!(glossary.lookup("bye"), None);
    }

    #[test]
    fn test_rules_in_precedence_order() {
        let glossary = index(&[("a", "1"), ("abc", "3"), ("ab", "2")]);
        let sources: Vec<_> = glossary.rules().iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["abc", "ab", "a"]);
    }

    #[test]
    fn test_blank_source_rules_are_ignored() {
        let glossary = index(&[("  ", "x"), ("cat", "pişik")]);
        assert_eq!(glossary.len(), 1);
        assert_eq!(glossary.apply("a cat"), "a pişik");
    }

    #[test]
    fn test_apply_unicode_terms() {
        let glossary = index(&[("Azərbaycan", "Azerbaijan")]);
        assert_eq!(glossary.apply("AZƏRBAYCAN dili"), "Azerbaijan dili");
    }

    #[test]
    fn test_apply_dotless_i_uppercase() {
        let glossary = index(&[("qızıl", "gold")]);
        assert_eq!(glossary.apply("QIZIL medal"), "gold medal");
        assert_eq!(glossary.apply("Qızıl medal"), "gold medal");
        assert_eq!(glossary.lookup("QIZIL"), Some("gold"));
    }

    #[test]
    fn test_apply_every_case_variant_of_turkic_terms() {
        let cases = [
            ("qızıl", "gold"),
            ("balıq", "fish"),
            ("İstanbul", "Istanbul"),
            ("İşıq", "light"),
        ];
        let glossary = index(&cases);

        for (source, target) in cases {
            for variant in case_variants(source) {
                let text = format!("the {variant} here");
                assert_eq!(
                    glossary.apply(&text),
                    format!("the {target} here"),
                    "variant {variant:?} of {source:?}"
                );
            }
        }
    }

    #[test]
    fn test_case_variants_spellings() {
        assert_eq!(
            case_variants("qızıl"),
            ["qızıl", "qızıl", "Qızıl", "QIZIL"].map(String::from)
        );
        assert_eq!(fold_case("QIZIL"), fold_case("qızıl"));
    }
}
