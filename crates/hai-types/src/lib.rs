//! Validated text types shared by the Hospital AI crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input reached or exceeded the character limit
    #[error("Text must be fewer than {limit} characters (got {len})")]
    TooLong { limit: usize, len: usize },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A plausible medicine name: trimmed, non-empty and short.
///
/// Uploaded files are only treated as a medicine name when their decoded text passes this
/// check. Length is counted in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineName(NonEmptyText);

impl MedicineName {
    /// Exclusive upper bound on the trimmed name length, in characters.
    pub const LIMIT: usize = 100;

    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let text = NonEmptyText::new(input)?;
        let len = text.as_str().chars().count();
        if len >= Self::LIMIT {
            return Err(TextError::TooLong {
                limit: Self::LIMIT,
                len,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for MedicineName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for MedicineName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  What is fever?\n").unwrap();
        assert_eq!(text.as_str(), "What is fever?");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace_only() {
        assert_eq!(NonEmptyText::new(" \t\n "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn test_non_empty_text_deserialize_rejects_blank() {
        let ok: NonEmptyText = serde_json::from_str("\"  ibuprofen \"").unwrap();
        assert_eq!(ok.as_str(), "ibuprofen");

        let err = serde_json::from_str::<NonEmptyText>("\"   \"").expect_err("should reject blank");
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_medicine_name_accepts_short_name() {
        let name = MedicineName::new("Amoxicillin 500mg\n").unwrap();
        assert_eq!(name.as_str(), "Amoxicillin 500mg");
        assert_eq!(name.to_string(), "Amoxicillin 500mg");
    }

    #[test]
    fn test_medicine_name_length_boundary() {
        assert!(MedicineName::new("a".repeat(99)).is_ok());
        assert_eq!(
            MedicineName::new("a".repeat(100)),
            Err(TextError::TooLong { limit: 100, len: 100 })
        );
    }

    #[test]
    fn test_medicine_name_counts_characters_not_bytes() {
        // 60 two-byte characters: 120 bytes but only 60 characters.
        let name = "é".repeat(60);
        assert!(MedicineName::new(&name).is_ok());
    }

    #[test]
    fn test_medicine_name_rejects_blank() {
        assert_eq!(MedicineName::new("   "), Err(TextError::Empty));
    }
}
