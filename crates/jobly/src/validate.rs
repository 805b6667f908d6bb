//! JSON Schema validation of request payloads.
//!
//! The schemas ship with the crate and are compiled once, on first use.

use crate::error::{JoblyError, JoblyResult};
use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;

/// Request shapes accepted by the jobs handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    JobNew,
    JobUpdate,
    JobSearch,
}

impl Schema {
    pub fn name(self) -> &'static str {
        match self {
            Schema::JobNew => "jobNew",
            Schema::JobUpdate => "jobUpdate",
            Schema::JobSearch => "jobSearch",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Schema::JobNew => include_str!("../schemas/jobNew.json"),
            Schema::JobUpdate => include_str!("../schemas/jobUpdate.json"),
            Schema::JobSearch => include_str!("../schemas/jobSearch.json"),
        }
    }

    fn validator(self) -> &'static Validator {
        static JOB_NEW: OnceLock<Validator> = OnceLock::new();
        static JOB_UPDATE: OnceLock<Validator> = OnceLock::new();
        static JOB_SEARCH: OnceLock<Validator> = OnceLock::new();

        let cell = match self {
            Schema::JobNew => &JOB_NEW,
            Schema::JobUpdate => &JOB_UPDATE,
            Schema::JobSearch => &JOB_SEARCH,
        };
        cell.get_or_init(|| {
            let schema: Value =
                serde_json::from_str(self.source()).expect("invalid built-in schema JSON");
            jsonschema::validator_for(&schema).expect("invalid built-in schema")
        })
    }
}

/// Outcome of validating one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    /// Error messages in the order the validator reported them.
    pub errors: Vec<String>,
}

/// Validate `instance` against `schema`.
pub fn validate(schema: Schema, instance: &Value) -> ValidationReport {
    let errors: Vec<String> = schema
        .validator()
        .iter_errors(instance)
        .map(|e| e.to_string())
        .collect();
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Validate and turn failure into [`JoblyError::BadRequest`].
pub fn ensure_valid(schema: Schema, instance: &Value) -> JoblyResult<()> {
    let report = validate(schema, instance);
    if report.valid {
        Ok(())
    } else {
        tracing::debug!(schema = schema.name(), errors = report.errors.len(), "payload rejected");
        Err(JoblyError::BadRequest(report.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn built_in_schemas_compile() {
        for schema in [Schema::JobNew, Schema::JobUpdate, Schema::JobSearch] {
            let _ = schema.validator();
        }
    }

    #[test]
    fn job_new_accepts_full_payload() {
        let report = validate(
            Schema::JobNew,
            &json!({"title": "Engineer", "salary": 100, "equity": "0.1", "companyHandle": "c1"}),
        );
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn job_new_requires_company_handle() {
        let report = validate(Schema::JobNew, &json!({"title": "Engineer"}));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("companyHandle"));
    }

    #[test]
    fn job_new_reports_every_error() {
        let report = validate(
            Schema::JobNew,
            &json!({"title": "", "salary": "lots", "companyHandle": "c1"}),
        );
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn equity_must_be_fraction_string() {
        for ok in ["0", "0.5", ".5", "1", "1.0"] {
            let report = validate(Schema::JobUpdate, &json!({"equity": ok}));
            assert!(report.valid, "{ok}: {:?}", report.errors);
        }
        for bad in ["1.5", "2", "-0.1", "abc"] {
            assert!(!validate(Schema::JobUpdate, &json!({"equity": bad})).valid, "{bad}");
        }
    }

    #[test]
    fn job_update_cannot_change_company() {
        let report = validate(Schema::JobUpdate, &json!({"companyHandle": "c2"}));
        assert!(!report.valid);
    }

    #[test]
    fn job_search_types() {
        assert!(validate(Schema::JobSearch, &json!({})).valid);
        assert!(validate(Schema::JobSearch, &json!({"minSalary": 5, "hasEquity": true, "title": "e"})).valid);
        assert!(!validate(Schema::JobSearch, &json!({"minSalary": "5"})).valid);
        assert!(!validate(Schema::JobSearch, &json!({"color": "red"})).valid);
    }

    #[test]
    fn salary_must_fit_an_int4_column() {
        let max = i64::from(i32::MAX);
        let job = |salary: i64| json!({"title": "t", "salary": salary, "companyHandle": "c"});

        assert!(validate(Schema::JobNew, &job(max)).valid);
        assert!(!validate(Schema::JobNew, &job(max + 1)).valid);
        assert!(validate(Schema::JobUpdate, &json!({"salary": max})).valid);
        assert!(!validate(Schema::JobUpdate, &json!({"salary": 3_000_000_000_i64})).valid);
        assert!(validate(Schema::JobSearch, &json!({"minSalary": max})).valid);
        assert!(!validate(Schema::JobSearch, &json!({"minSalary": 3_000_000_000_i64})).valid);
    }

    #[test]
    fn ensure_valid_yields_bad_request() {
        let err = ensure_valid(Schema::JobSearch, &json!({"minSalary": -1})).unwrap_err();
        assert!(matches!(err, JoblyError::BadRequest(ref errors) if errors.len() == 1));
        assert_eq!(err.status_code(), 400);
    }
}
