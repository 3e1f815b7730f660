// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for diagnostics module

#[cfg(test)]
mod tests {
    use crate::diagnostics::*;

    #[test]
    fn test_warning_is_not_error() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::warning("Deprecated", "use something else"));

        assert!(!diagnostics.has_error());
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn test_attribute_error_display() {
        let diagnostic =
            Diagnostic::attribute_error("ttl", "Invalid Attribute Combination", "needs use_ttl");
        assert!(diagnostic.is_error());
        assert_eq!(
            diagnostic.to_string(),
            "Invalid Attribute Combination (ttl): needs use_ttl"
        );
    }

    #[test]
    fn test_for_attribute_filters() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::attribute_error("ttl", "A", "a"));
        diagnostics.push(Diagnostic::attribute_error("use_ttl", "B", "b"));
        diagnostics.push(Diagnostic::error("C", "c"));

        assert_eq!(diagnostics.for_attribute("ttl").count(), 1);
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.has_error());
    }

    #[test]
    fn test_display_joins_entries() {
        let mut diagnostics: Diagnostics = Diagnostic::error("A", "first").into();
        let mut more = Diagnostics::new();
        more.push(Diagnostic::error("B", "second"));
        diagnostics.extend(more);

        assert_eq!(diagnostics.to_string(), "A: first; B: second");
        let summaries: Vec<String> = diagnostics.into_iter().map(|d| d.summary).collect();
        assert_eq!(summaries, vec!["A", "B"]);
    }
}
