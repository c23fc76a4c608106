use chrono::NaiveDate;
use jobledger_core::{DateRange, JobRule, JobRuleSet, RuleError};
use serde::Deserialize;
use std::path::Path;

/// On-disk shape of a rules document. Every field is optional here so that a
/// missing one can be reported by name instead of as a generic parse failure.
#[derive(Debug, Deserialize)]
struct RuleDocument {
    jobs: Option<Vec<RawJob>>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    name: Option<String>,
    date_start: Option<String>,
    date_end: Option<String>,
    vendor_patterns: Option<Vec<String>>,
    description_patterns: Option<Vec<String>>,
}

/// Load a rules document from disk. `.toml` files are read as TOML, anything
/// else as JSON.
pub fn load_rules(path: &Path) -> Result<JobRuleSet, RuleError> {
    let content = std::fs::read_to_string(path).map_err(|source| RuleError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let rules = if is_toml {
        parse_rules_toml(&content)?
    } else {
        parse_rules_json(&content)?
    };

    tracing::debug!(path = %path.display(), jobs = rules.len(), "Loaded job rules");
    Ok(rules)
}

pub fn parse_rules_json(content: &str) -> Result<JobRuleSet, RuleError> {
    let doc: RuleDocument = serde_json::from_str(content).map_err(|e| RuleError::Syntax {
        format: "JSON",
        message: e.to_string(),
    })?;
    build_rule_set(doc)
}

pub fn parse_rules_toml(content: &str) -> Result<JobRuleSet, RuleError> {
    let doc: RuleDocument = toml::from_str(content).map_err(|e| RuleError::Syntax {
        format: "TOML",
        message: e.to_string(),
    })?;
    build_rule_set(doc)
}

fn build_rule_set(doc: RuleDocument) -> Result<JobRuleSet, RuleError> {
    let raw_jobs = doc.jobs.ok_or(RuleError::MissingJobs)?;

    let rules = raw_jobs
        .into_iter()
        .enumerate()
        .map(|(i, raw)| build_rule(i + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    for rule in &rules {
        if !rule.has_patterns() {
            tracing::warn!(job = %rule.name, "Job has no patterns and will never match");
        }
        tracing::trace!(job = %rule.name, active = %rule.active, days = rule.active.days());
    }

    JobRuleSet::new(rules)
}

fn build_rule(index: usize, raw: RawJob) -> Result<JobRule, RuleError> {
    let missing = |field| RuleError::MissingField { index, field };

    let name = raw.name.ok_or_else(|| missing("name"))?;
    let date_start = raw.date_start.ok_or_else(|| missing("date_start"))?;
    let date_end = raw.date_end.ok_or_else(|| missing("date_end"))?;
    let vendor_patterns = raw.vendor_patterns.ok_or_else(|| missing("vendor_patterns"))?;
    let description_patterns = raw
        .description_patterns
        .ok_or_else(|| missing("description_patterns"))?;

    let start = parse_rule_date(&name, "date_start", &date_start)?;
    let end = parse_rule_date(&name, "date_end", &date_end)?;
    let active = DateRange::new(start, end).ok_or_else(|| RuleError::InvertedRange {
        job: name.clone(),
        start,
        end,
    })?;

    Ok(JobRule::new(name, active, vendor_patterns, description_patterns))
}

fn parse_rule_date(job: &str, field: &'static str, value: &str) -> Result<NaiveDate, RuleError> {
    NaiveDate::parse_from_str(value.trim(), jobledger_core::transaction::DATE_FORMAT).map_err(
        |_| RuleError::InvalidDate {
            job: job.to_string(),
            field,
            value: value.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KITCHEN: &str = r#"{
        "jobs": [
            {
                "name": "Kitchen Remodel",
                "date_start": "2024-01-01",
                "date_end": "2024-03-31",
                "vendor_patterns": ["Home Depot", "Lowes"],
                "description_patterns": []
            },
            {
                "name": "Deck Build",
                "date_start": "2024-03-01",
                "date_end": "2024-06-30",
                "vendor_patterns": [],
                "description_patterns": ["deck", "composite"]
            }
        ]
    }"#;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_jobs_in_document_order() {
        let rules = parse_rules_json(KITCHEN).unwrap();
        let names: Vec<_> = rules.names().collect();
        assert_eq!(names, vec!["Kitchen Remodel", "Deck Build"]);

        let kitchen = rules.iter().next().unwrap();
        assert_eq!(kitchen.active.start, d(2024, 1, 1));
        assert_eq!(kitchen.active.end, d(2024, 3, 31));
        assert_eq!(kitchen.vendor_patterns, vec!["Home Depot", "Lowes"]);
        assert!(kitchen.description_patterns.is_empty());
    }

    #[test]
    fn parses_toml_document() {
        let toml = r#"
            [[jobs]]
            name = "Bathroom"
            date_start = "2024-05-01"
            date_end = "2024-05-31"
            vendor_patterns = ["Ferguson"]
            description_patterns = ["tile"]
        "#;
        let rules = parse_rules_toml(toml).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.iter().next().unwrap().description_patterns, vec!["tile"]);
    }

    #[test]
    fn empty_jobs_list_is_valid() {
        assert!(parse_rules_json(r#"{"jobs": []}"#).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_syntax_error() {
        let err = parse_rules_json("{ not json").unwrap_err();
        assert!(matches!(err, RuleError::Syntax { format: "JSON", .. }));
    }

    #[test]
    fn missing_jobs_key() {
        let err = parse_rules_json(r#"{"projects": []}"#).unwrap_err();
        assert!(matches!(err, RuleError::MissingJobs));
    }

    #[test]
    fn missing_field_reports_position_and_name() {
        let doc = r#"{"jobs": [
            {"name": "A", "date_start": "2024-01-01", "date_end": "2024-01-31",
             "vendor_patterns": ["x"], "description_patterns": []},
            {"name": "B", "date_start": "2024-01-01",
             "vendor_patterns": ["y"], "description_patterns": []}
        ]}"#;
        let err = parse_rules_json(doc).unwrap_err();
        assert!(matches!(
            err,
            RuleError::MissingField { index: 2, field: "date_end" }
        ));
    }

    #[test]
    fn missing_pattern_list_is_an_error() {
        let doc = r#"{"jobs": [{"name": "A", "date_start": "2024-01-01",
            "date_end": "2024-01-31", "vendor_patterns": ["x"]}]}"#;
        let err = parse_rules_json(doc).unwrap_err();
        assert!(matches!(
            err,
            RuleError::MissingField { field: "description_patterns", .. }
        ));
    }

    #[test]
    fn unparseable_date() {
        let doc = r#"{"jobs": [{"name": "A", "date_start": "01/01/2024",
            "date_end": "2024-01-31", "vendor_patterns": [], "description_patterns": []}]}"#;
        let err = parse_rules_json(doc).unwrap_err();
        match err {
            RuleError::InvalidDate { job, field, value } => {
                assert_eq!(job, "A");
                assert_eq!(field, "date_start");
                assert_eq!(value, "01/01/2024");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn start_after_end_is_rejected() {
        let doc = r#"{"jobs": [{"name": "A", "date_start": "2024-02-01",
            "date_end": "2024-01-31", "vendor_patterns": ["x"], "description_patterns": []}]}"#;
        let err = parse_rules_json(doc).unwrap_err();
        assert!(matches!(err, RuleError::InvertedRange { .. }));
    }

    #[test]
    fn same_day_range_is_accepted() {
        let doc = r#"{"jobs": [{"name": "A", "date_start": "2024-02-01",
            "date_end": "2024-02-01", "vendor_patterns": ["x"], "description_patterns": []}]}"#;
        assert_eq!(parse_rules_json(doc).unwrap().len(), 1);
    }

    #[test]
    fn wrong_field_type_is_syntax_error() {
        let doc = r#"{"jobs": [{"name": "A", "date_start": "2024-02-01",
            "date_end": "2024-02-01", "vendor_patterns": "x", "description_patterns": []}]}"#;
        assert!(matches!(
            parse_rules_json(doc).unwrap_err(),
            RuleError::Syntax { .. }
        ));
    }

    #[test]
    fn load_rules_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("rules.json");
        std::fs::write(&json_path, KITCHEN).unwrap();
        assert_eq!(load_rules(&json_path).unwrap().len(), 2);

        let toml_path = dir.path().join("rules.TOML");
        let mut f = std::fs::File::create(&toml_path).unwrap();
        writeln!(
            f,
            "[[jobs]]\nname = \"Fence\"\ndate_start = \"2024-01-01\"\n\
             date_end = \"2024-12-31\"\nvendor_patterns = []\ndescription_patterns = [\"fence\"]"
        )
        .unwrap();
        drop(f);
        assert_eq!(load_rules(&toml_path).unwrap().names().collect::<Vec<_>>(), vec!["Fence"]);
    }

    #[test]
    fn load_rules_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_rules(&path).unwrap_err();
        match err {
            RuleError::Unreadable { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
