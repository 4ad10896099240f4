// src/engine/prompt.rs — Prompt composition

/// Label prefixing the optional caller-specific context block.
pub const USER_CONTEXT_LABEL: &str = "User context: ";
/// Label prefixing the optional retrieved technical context block.
pub const TECHNICAL_CONTEXT_LABEL: &str = "Technical context: ";

/// Build the final prompt text: user-context block, technical-context block,
/// then the instruction, blank-line separated. Order matters — the Groq
/// adapter's role-splitting heuristic expects the first block to be a
/// recognizable context preamble.
pub fn compose(
    instruction: &str,
    technical_context: Option<&str>,
    user_context: Option<&str>,
) -> String {
    let mut full = String::new();
    if let Some(user) = user_context {
        full.push_str(USER_CONTEXT_LABEL);
        full.push_str(user);
        full.push_str("\n\n");
    }
    if let Some(technical) = technical_context {
        full.push_str(TECHNICAL_CONTEXT_LABEL);
        full.push_str(technical);
        full.push_str("\n\n");
    }
    full.push_str(instruction);
    full
}

/// If the prompt opens with a context preamble followed by a blank line,
/// split it into (system, user) segments at the first blank line.
pub fn split_roles(prompt: &str) -> Option<(&str, &str)> {
    if !(prompt.starts_with(USER_CONTEXT_LABEL.trim_end())
        || prompt.starts_with(TECHNICAL_CONTEXT_LABEL.trim_end()))
    {
        return None;
    }
    let (system, user) = prompt.split_once("\n\n")?;
    Some((system, user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compose_instruction_only() {
        assert_eq!(compose("Explain this query.", None, None), "Explain this query.");
    }

    #[test]
    fn test_compose_full_ordering() {
        let p = compose("Explain this query.", Some("use indexes"), Some("1GB base"));
        assert_eq!(
            p,
            "User context: 1GB base\n\nTechnical context: use indexes\n\nExplain this query."
        );
    }

    #[test]
    fn test_compose_technical_only() {
        let p = compose("Explain.", Some("use indexes"), None);
        assert_eq!(p, "Technical context: use indexes\n\nExplain.");
    }

    #[test]
    fn test_compose_is_deterministic() {
        let a = compose("i", Some("t"), Some("u"));
        let b = compose("i", Some("t"), Some("u"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_roles_on_composed_prompt() {
        let p = compose("Explain.", Some("use indexes"), None);
        let (system, user) = split_roles(&p).unwrap();
        assert_eq!(system, "Technical context: use indexes");
        assert_eq!(user, "Explain.");
    }

    #[test]
    fn test_split_roles_takes_first_block_only() {
        let p = compose("Explain.", Some("use indexes"), Some("1GB base"));
        let (system, user) = split_roles(&p).unwrap();
        assert_eq!(system, "User context: 1GB base");
        assert_eq!(user, "Technical context: use indexes\n\nExplain.");
    }

    #[test]
    fn test_split_roles_plain_prompt() {
        assert!(split_roles("Explain this query.").is_none());
    }

    #[test]
    fn test_split_roles_preamble_without_separator() {
        assert!(split_roles("Technical context: indexes, one line").is_none());
    }
}
