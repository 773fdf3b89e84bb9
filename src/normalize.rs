//! Name normalization for deduplication.
//!
//! Author names (and book titles at creation) are stored in canonical form:
//! trimmed, internal whitespace runs collapsed to a single space, lowercased.
//! Two raw inputs normalizing to the same string refer to the same entity.

/// Canonicalize a free-text name. Pure and idempotent.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(normalize("  Gabriel   García  Márquez "), "gabriel garcía márquez");
        assert_eq!(normalize("\tIsabel\n Allende\t"), "isabel allende");
    }

    #[test]
    fn lowercases() {
        assert_eq!(normalize("ANONIMO"), "anonimo");
    }

    #[test]
    fn idempotent() {
        for s in ["  Mixed   CASE  input ", "already normal", "", "   "] {
            assert_eq!(normalize(&normalize(s)), normalize(s));
        }
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
    }

    #[test]
    fn equivalent_raw_forms_fold_together() {
        assert_eq!(normalize("garcía  MÁRQUEZ"), normalize(" García Márquez"));
    }
}
