//! Validation of an already-flat term dataset.
//!
//! Repeated source or target terms are reported but are not problems on
//! their own: a source term may legitimately have several translations.
//! Missing ids, exact duplicate pairs and metadata that disagrees with the
//! dictionary profile are problems.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{flag_str, DictionaryProfile};
use crate::tabular::TermRow;

/// Number of example values kept per finding.
const MAX_EXAMPLES: usize = 10;

/// A term occurring more than once, with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatedTerm {
    pub term: String,
    pub count: usize,
}

/// Metadata field disagreeing with the expectation, with affected rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inconsistency {
    pub field: String,
    pub expected: String,

    /// 1-based data row numbers (header excluded), capped.
    pub rows: Vec<usize>,
    pub count: usize,
}

/// What the validator expects of every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectations {
    pub source_lang: String,
    pub target_lang: String,
    pub profile: DictionaryProfile,
}

/// Result of validating a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub empty_ids: usize,
    pub empty_external_refs: usize,
    pub duplicate_source_terms: Vec<RepeatedTerm>,
    pub duplicate_target_terms: Vec<RepeatedTerm>,

    /// Exact `(source, target)` repeats beyond the first occurrence.
    pub exact_duplicate_pairs: usize,
    pub inconsistencies: Vec<Inconsistency>,
}

impl ValidationReport {
    /// Whether the dataset has no problems.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.empty_ids == 0 && self.exact_duplicate_pairs == 0 && self.inconsistencies.is_empty()
    }
}

/// Validate rows against the expected languages and profile.
#[must_use]
pub fn validate_rows(rows: &[TermRow], expect: &Expectations) -> ValidationReport {
    let mut report = ValidationReport {
        total_rows: rows.len(),
        ..ValidationReport::default()
    };

    let mut sources: HashMap<String, usize> = HashMap::new();
    let mut targets: HashMap<String, usize> = HashMap::new();
    let mut pairs: HashMap<(String, String), usize> = HashMap::new();

    for row in rows {
        if row.id.is_empty() {
            report.empty_ids += 1;
        }
        if row.external_ref.is_empty() {
            report.empty_external_refs += 1;
        }

        let (source, target) = row.texts();
        *sources.entry(source.clone()).or_default() += 1;
        *targets.entry(target.clone()).or_default() += 1;
        *pairs.entry((source, target)).or_default() += 1;
    }

    report.duplicate_source_terms = repeated(sources);
    report.duplicate_target_terms = repeated(targets);
    report.exact_duplicate_pairs = pairs.values().map(|n| n - 1).sum();

    let reviewed = flag_str(expect.profile.reviewed);
    let checks: [(&str, &str, fn(&TermRow) -> &str); 4] = [
        ("lang_source", expect.source_lang.as_str(), |r| r.lang_source.as_str()),
        ("lang_target", expect.target_lang.as_str(), |r| r.lang_target.as_str()),
        ("author", expect.profile.author.as_str(), |r| r.author.as_str()),
        ("reviewed_flag", reviewed, |r| r.reviewed_flag.as_str()),
    ];

    for (field, expected, get) in checks {
        if expected.is_empty() {
            continue;
        }
        let offending: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !get(row).eq_ignore_ascii_case(expected))
            .map(|(i, _)| i + 1)
            .collect();
        if !offending.is_empty() {
            report.inconsistencies.push(Inconsistency {
                field: field.to_string(),
                expected: expected.to_string(),
                count: offending.len(),
                rows: offending.into_iter().take(MAX_EXAMPLES).collect(),
            });
        }
    }

    tracing::info!(
        rows = report.total_rows,
        empty_ids = report.empty_ids,
        exact_duplicates = report.exact_duplicate_pairs,
        inconsistencies = report.inconsistencies.len(),
        "Validated dataset"
    );

    report
}

/// Terms seen more than once, most frequent first, capped.
fn repeated(counts: HashMap<String, usize>) -> Vec<RepeatedTerm> {
    let mut terms: Vec<RepeatedTerm> = counts
        .into_iter()
        .filter(|(term, count)| *count > 1 && !term.is_empty())
        .map(|(term, count)| RepeatedTerm { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(MAX_EXAMPLES);
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(id: &str, source: &str, target: &str) -> TermRow {
        TermRow {
            id: id.to_string(),
            source_text: source.to_string(),
            lang_source: "nl-nl".to_string(),
            target_text: target.to_string(),
            lang_target: "de-de".to_string(),
            author: "van Gassen".to_string(),
            reviewed_flag: "TRUE".to_string(),
            external_ref: "x".to_string(),
            ..TermRow::default()
        }
    }

    fn expectations() -> Expectations {
        Expectations {
            source_lang: "nl-nl".to_string(),
            target_lang: "de-de".to_string(),
            profile: DictionaryProfile {
                author: "van Gassen".to_string(),
                reviewed: true,
                ..DictionaryProfile::default()
            },
        }
    }

    #[test]
    fn test_clean_dataset() {
        let rows = vec![
            row("1", "inwoner", "ansässig"),
            row("2", "inwoner", "ansässige Person"),
        ];
        let report = validate_rows(&rows, &expectations());

        assert!(report.is_clean());
        assert_eq!(report.total_rows, 2);
        assert_eq!(
            report.duplicate_source_terms,
            vec![RepeatedTerm {
                term: "inwoner".to_string(),
                count: 2
            }]
        );
        assert!(report.duplicate_target_terms.is_empty());
    }

    #[test]
    fn test_problems_are_reported() {
        let mut rows = vec![
            row("", "verdrag", "Abkommen"),
            row("2", "verdrag", "Abkommen"),
            row("3", "verdrag", "Abkommen"),
            row("4", "belasting", "Steuer"),
        ];
        rows[3].lang_target = "en-gb".to_string();
        rows[3].external_ref = String::new();

        let report = validate_rows(&rows, &expectations());
        assert!(!report.is_clean());
        assert_eq!(report.empty_ids, 1);
        assert_eq!(report.empty_external_refs, 1);
        assert_eq!(report.exact_duplicate_pairs, 2);
        assert_eq!(
            report.inconsistencies,
            vec![Inconsistency {
                field: "lang_target".to_string(),
                expected: "de-de".to_string(),
                rows: vec![4],
                count: 1,
            }]
        );
    }

    #[test]
    fn test_flag_comparison_ignores_case() {
        let mut rows = vec![row("1", "a", "b")];
        rows[0].reviewed_flag = "True".to_string();
        let report = validate_rows(&rows, &expectations());
        assert!(report.inconsistencies.is_empty());
    }

    #[test]
    fn test_empty_expectation_is_not_checked() {
        let mut expect = expectations();
        expect.profile.author = String::new();
        let mut rows = vec![row("1", "a", "b")];
        rows[0].author = "Kalf".to_string();

        let report = validate_rows(&rows, &expect);
        assert!(report.is_clean());
    }

    #[test]
    fn test_report_serializes() {
        let report = validate_rows(&[row("1", "a", "b")], &expectations());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_rows"], 1);
        assert_eq!(json["exact_duplicate_pairs"], 0);
    }
}
