use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug)]
pub struct PersonName(String);

impl PersonName {
    /// Returns a `PersonName` if the input satisfies our validation
    /// constraints, an error message otherwise.
    pub fn parse(s: String) -> Result<PersonName, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > 256;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters =
            s.chars().any(|c| forbidden_characters.contains(&c));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("`{}` is not a valid name", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
