//! URL slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing or generating a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input produced no usable characters.
    #[error("slug cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `a-z`, `0-9` and `-`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input starts or ends with a hyphen, or has two in a row.
    #[error("slug has a misplaced hyphen")]
    MisplacedHyphen,
}

/// A URL-safe identifier such as `silk-evening-gown`.
///
/// ## Constraints
///
/// - Length: 1-120 characters
/// - Only lowercase ASCII letters, digits and hyphens
/// - No leading, trailing or consecutive hyphens
///
/// ## Examples
///
/// ```
/// use maison_core::Slug;
///
/// assert_eq!(Slug::from_name("Hermès Silk Scarf").unwrap().as_str(), "hermes-silk-scarf");
/// assert!(Slug::parse("evening-wear").is_ok());
/// assert!(Slug::parse("Evening Wear").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 120;

    /// Parse an already-formed slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains characters
    /// other than `a-z`, `0-9` and `-`, or has a misplaced hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(bad));
        }

        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::MisplacedHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Generate a slug from a display name.
    ///
    /// Letters are lowercased and common accents folded to ASCII; every run
    /// of other characters becomes a single hyphen. Overlong results are cut
    /// at the last hyphen that fits.
    ///
    /// # Errors
    ///
    /// Returns `SlugError::Empty` if the name has no letters or digits.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut out = String::with_capacity(name.len());
        let mut pending_hyphen = false;

        for ch in name.chars().flat_map(char::to_lowercase) {
            let is_plain = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            let folded = fold_accent(ch);
            if !is_plain && folded.is_none() {
                pending_hyphen = true;
                continue;
            }
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            match folded {
                Some(ascii) => out.push_str(ascii),
                None => out.push(ch),
            }
        }

        if out.len() > Self::MAX_LENGTH {
            out.truncate(Self::MAX_LENGTH);
            if let Some(cut) = out.rfind('-') {
                out.truncate(cut);
            }
        }

        if out.is_empty() {
            return Err(SlugError::Empty);
        }

        Ok(Self(out))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// ASCII spelling of a lowercase character, or `None` for separators.
fn fold_accent(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_basic() {
        assert_eq!(
            Slug::from_name("Cashmere Wrap Coat").unwrap().as_str(),
            "cashmere-wrap-coat"
        );
    }

    #[test]
    fn test_from_name_collapses_separators() {
        assert_eq!(
            Slug::from_name("  Gold -- & Pearl   Earrings!! ").unwrap().as_str(),
            "gold-pearl-earrings"
        );
    }

    #[test]
    fn test_from_name_folds_accents() {
        assert_eq!(
            Slug::from_name("Crème Brûlée Œuvre").unwrap().as_str(),
            "creme-brulee-oeuvre"
        );
    }

    #[test]
    fn test_from_name_empty() {
        assert_eq!(Slug::from_name("!!! ???"), Err(SlugError::Empty));
    }

    #[test]
    fn test_from_name_truncates_at_word_boundary() {
        let name = "word ".repeat(40);
        let slug = Slug::from_name(&name).unwrap();
        assert!(slug.as_str().len() <= Slug::MAX_LENGTH);
        assert!(!slug.as_str().ends_with('-'));
        assert!(Slug::parse(slug.as_str()).is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(
            Slug::parse("Upper"),
            Err(SlugError::InvalidCharacter('U'))
        );
        assert_eq!(Slug::parse("-lead"), Err(SlugError::MisplacedHyphen));
        assert_eq!(Slug::parse("double--dash"), Err(SlugError::MisplacedHyphen));
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Slug>("\"fine-jewelry\"").is_ok());
        assert!(serde_json::from_str::<Slug>("\"Fine Jewelry\"").is_err());
    }
}
