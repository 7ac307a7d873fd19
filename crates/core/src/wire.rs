//! Helpers for parsing enumerated values that arrive as free-form strings.

/// Reduce a user-supplied label to a comparison key.
///
/// Lowercases and drops whitespace, `_` and `-`, so `"EN_PROCESO"`,
/// `"en proceso"` and `"EnProceso"` share the key `"enproceso"`.
pub fn label_key(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_and_case_are_ignored() {
        assert_eq!(label_key("EN_PROCESO"), "enproceso");
        assert_eq!(label_key("  En   Cola "), "encola");
        assert_eq!(label_key("in-progress"), "inprogress");
    }

    #[test]
    fn accented_letters_are_lowercased() {
        assert_eq!(label_key("BÁSICO"), "básico");
    }

    #[test]
    fn blank_input_yields_empty_key() {
        assert_eq!(label_key("   "), "");
    }
}
