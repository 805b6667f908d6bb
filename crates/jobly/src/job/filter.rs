use crate::error::{JoblyError, JoblyResult};
use crate::sql::{BindValue, FragmentBuilder, SqlFragment};
use serde_json::{Map, Value};

/// Build the `WHERE` predicates for a job search.
///
/// Recognized keys, handled in the order they appear in `criteria`:
///
/// - `minSalary`: `salary > $i` (exclusive bound)
/// - `hasEquity`: `equity > $i` bound to `0`, only when the value is truthy
/// - `title`: `LOWER(title) LIKE $i` bound to `%<lowercased title>%`
///
/// Other keys are ignored. A placeholder index is only consumed by a
/// predicate that is actually emitted, so placeholders stay contiguous no
/// matter which keys were skipped. When nothing is emitted the fragment is
/// empty and must not be spliced into a `WHERE` clause.
pub fn job_filter(criteria: &Map<String, Value>) -> JoblyResult<SqlFragment> {
    let mut predicates = FragmentBuilder::new();

    for (key, value) in criteria {
        match key.as_str() {
            "minSalary" => {
                let threshold = match value {
                    Value::Number(_) => BindValue::from_json(key, value)?,
                    _ => {
                        return Err(JoblyError::validation("minSalary must be a number"));
                    }
                };
                // salary is an int4 column
                if let BindValue::Int(n) = threshold {
                    if i32::try_from(n).is_err() {
                        return Err(JoblyError::validation("minSalary is out of range"));
                    }
                }
                predicates.push_bound(|p| format!("salary > {p}"), threshold);
            }
            "hasEquity" => {
                if is_truthy(value) {
                    predicates.push_bound(|p| format!("equity > {p}"), BindValue::Int(0));
                }
            }
            "title" => {
                let Some(title) = value.as_str() else {
                    return Err(JoblyError::validation("title must be a string"));
                };
                let pattern = format!("%{}%", title.to_lowercase());
                predicates.push_bound(|p| format!("LOWER(title) LIKE {p}"), BindValue::Text(pattern));
            }
            _ => {}
        }
    }

    Ok(predicates.finish(" AND "))
}

/// JSON truthiness: `false`, `null`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn criteria(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!("test criteria are objects"),
        }
    }

    #[test]
    fn min_salary() {
        let f = job_filter(&criteria(json!({"minSalary": 50000}))).unwrap();
        assert_eq!(f.fragment, "salary > $1");
        assert_eq!(f.values, vec![BindValue::Int(50000)]);
    }

    #[test]
    fn has_equity_true() {
        let f = job_filter(&criteria(json!({"hasEquity": true}))).unwrap();
        assert_eq!(f.fragment, "equity > $1");
        assert_eq!(f.values, vec![BindValue::Int(0)]);
    }

    #[test]
    fn has_equity_false_emits_nothing() {
        let f = job_filter(&criteria(json!({"hasEquity": false}))).unwrap();
        assert!(f.is_empty());
        assert!(f.values.is_empty());
    }

    #[test]
    fn title_is_lowercased_substring() {
        let f = job_filter(&criteria(json!({"title": "Engineer"}))).unwrap();
        assert_eq!(f.fragment, "LOWER(title) LIKE $1");
        assert_eq!(f.values, vec![BindValue::from("%engineer%")]);
    }

    #[test]
    fn all_filters_in_supplied_order() {
        let f = job_filter(&criteria(
            json!({"title": "eng", "minSalary": 100, "hasEquity": true}),
        ))
        .unwrap();
        assert_eq!(f.fragment, "LOWER(title) LIKE $1 AND salary > $2 AND equity > $3");
        assert_eq!(
            f.values,
            vec![BindValue::from("%eng%"), BindValue::Int(100), BindValue::Int(0)]
        );
    }

    #[test]
    fn skipped_keys_do_not_consume_placeholders() {
        let f = job_filter(&criteria(json!({
            "hasEquity": false,
            "color": "blue",
            "minSalary": 10,
            "title": "dev",
        })))
        .unwrap();
        assert_eq!(f.fragment, "salary > $1 AND LOWER(title) LIKE $2");
        assert_eq!(f.placeholder_count(), f.values.len());
    }

    #[test]
    fn unknown_keys_only_yield_empty_fragment() {
        let f = job_filter(&criteria(json!({"nope": 1}))).unwrap();
        assert!(f.is_empty());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(job_filter(&criteria(json!({"minSalary": "lots"}))).is_err());
        assert!(job_filter(&criteria(json!({"title": 5}))).is_err());
    }

    #[test]
    fn min_salary_beyond_int4_is_rejected() {
        let err = job_filter(&criteria(json!({"minSalary": 3_000_000_000_i64}))).unwrap_err();
        assert!(matches!(err, JoblyError::Validation(ref m) if m == "minSalary is out of range"));
        assert_eq!(err.status_code(), 400);
        assert!(job_filter(&criteria(json!({"minSalary": i32::MAX}))).is_ok());
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }

    #[test]
    fn same_input_same_output() {
        let c = criteria(json!({"minSalary": 1, "title": "a"}));
        assert_eq!(job_filter(&c).unwrap(), job_filter(&c).unwrap());
    }
}
