use crate::error::PantryError;
use regex::Regex;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("identifier pattern is valid"))
}

/// Accept only unquoted warehouse identifiers. Names that must be spliced into
/// statement text (for `DESC`, which takes no bindings) go through here first.
pub fn validate_identifier(name: &str) -> Result<&str, PantryError> {
    if identifier_re().is_match(name) {
        Ok(name)
    } else {
        Err(PantryError::config(format!(
            "'{}' is not a valid identifier",
            name.escape_default()
        )))
    }
}

/// Strip characters that can end a string literal or a statement from
/// user-typed text before it flows into any query or prompt.
pub fn sanitize_user_input(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\'' | ';' | '\\'))
        .collect()
}
