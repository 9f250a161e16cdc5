//! Identifier case conversion used when matching record fields to JSON keys.
use alloc::string::String;

/// A fixed strategy for rewriting a `camelCase` identifier.
///
/// `Snake` and `Kebab` insert their separator before every ASCII uppercase
/// letter that directly follows an ASCII lowercase letter or digit, then
/// lowercase the whole result.
///
/// ```
/// use jsonbind::NameTransformer;
///
/// assert_eq!(NameTransformer::Snake.apply("wordWithAnotherWord"), "word_with_another_word");
/// assert_eq!(NameTransformer::Kebab.apply("word2Numbers"), "word2-numbers");
/// assert_eq!(NameTransformer::None.apply("aA"), "aA");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameTransformer {
    /// Identity.
    #[default]
    None,
    /// `snake_case`.
    Snake,
    /// `kebab-case`.
    Kebab,
}

impl NameTransformer {
    fn separator(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Snake => Some('_'),
            Self::Kebab => Some('-'),
        }
    }

    /// Rewrites `from` with this strategy.
    #[must_use]
    pub fn apply(self, from: &str) -> String {
        let Some(separator) = self.separator() else {
            return from.into();
        };

        let mut out = String::with_capacity(from.len() + 4);
        let mut prev: Option<char> = None;
        for c in from.chars() {
            if c.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                out.push(separator);
            }
            out.extend(c.to_lowercase());
            prev = Some(c);
        }
        out
    }

    /// Like [`apply`](Self::apply), passing an absent name through unchanged.
    #[must_use]
    pub fn transform(self, from: Option<&str>) -> Option<String> {
        from.map(|name| self.apply(name))
    }
}
