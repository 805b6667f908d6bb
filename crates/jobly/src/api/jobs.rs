//! Handlers for the jobs routes.
//!
//! | Route          | Handler    | Access |
//! |----------------|------------|--------|
//! | `POST /`       | [`create`] | admin  |
//! | `GET /`        | [`list`]   | public |
//! | `GET /:id`     | [`get`]    | public |
//! | `PATCH /:id`   | [`update`] | admin  |
//! | `DELETE /:id`  | [`remove`] | admin  |

use super::{ApiResponse, respond};
use crate::auth::{Actor, ensure_admin};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::job::{self, NewJob};
use crate::validate::{Schema, ensure_valid};
use serde_json::{Map, Value, json};

/// `POST /`: create a job. Responds `201 {job}`.
pub async fn create(conn: &impl GenericClient, actor: &Actor, body: &Value) -> ApiResponse {
    respond(try_create(conn, actor, body).await)
}

/// `GET /`: list jobs, optionally filtered by `minSalary`, `hasEquity` and `title`.
///
/// `query` holds the raw query-string pairs. Responds `200 {jobs}`.
pub async fn list(conn: &impl GenericClient, query: &[(String, String)]) -> ApiResponse {
    respond(try_list(conn, query).await)
}

/// `GET /:id`: one job with its company. Responds `200 {job}`.
pub async fn get(conn: &impl GenericClient, id: &str) -> ApiResponse {
    respond(try_get(conn, id).await)
}

/// `PATCH /:id`: change `title`, `salary` or `equity`. Responds `200 {job}`.
pub async fn update(
    conn: &impl GenericClient,
    actor: &Actor,
    id: &str,
    body: &Value,
) -> ApiResponse {
    respond(try_update(conn, actor, id, body).await)
}

/// `DELETE /:id`. Responds `200 {deleted: id}`.
pub async fn remove(conn: &impl GenericClient, actor: &Actor, id: &str) -> ApiResponse {
    respond(try_remove(conn, actor, id).await)
}

async fn try_create(
    conn: &impl GenericClient,
    actor: &Actor,
    body: &Value,
) -> JoblyResult<ApiResponse> {
    ensure_admin(actor)?;
    ensure_valid(Schema::JobNew, body)?;
    let new_job: NewJob = serde_json::from_value(body.clone())
        .map_err(|e| JoblyError::validation(e.to_string()))?;
    let created = job::create(conn, &new_job).await?;
    Ok(ApiResponse::created(json!({ "job": created })))
}

async fn try_list(
    conn: &impl GenericClient,
    query: &[(String, String)],
) -> JoblyResult<ApiResponse> {
    let criteria = normalize_search_query(query);
    ensure_valid(Schema::JobSearch, &Value::Object(criteria.clone()))?;
    let jobs = if criteria.is_empty() {
        job::find_all(conn).await?
    } else {
        job::filter(conn, &criteria).await?
    };
    Ok(ApiResponse::ok(json!({ "jobs": jobs })))
}

async fn try_get(conn: &impl GenericClient, id: &str) -> JoblyResult<ApiResponse> {
    let id = parse_id(id)?;
    let found = job::get(conn, id).await?;
    Ok(ApiResponse::ok(json!({ "job": found })))
}

async fn try_update(
    conn: &impl GenericClient,
    actor: &Actor,
    id: &str,
    body: &Value,
) -> JoblyResult<ApiResponse> {
    ensure_admin(actor)?;
    let id = parse_id(id)?;
    ensure_valid(Schema::JobUpdate, body)?;
    let payload = body
        .as_object()
        .ok_or_else(|| JoblyError::validation("Request body must be an object"))?;
    let updated = job::update(conn, id, payload).await?;
    Ok(ApiResponse::ok(json!({ "job": updated })))
}

async fn try_remove(conn: &impl GenericClient, actor: &Actor, id: &str) -> JoblyResult<ApiResponse> {
    ensure_admin(actor)?;
    let id = parse_id(id)?;
    job::remove(conn, id).await?;
    Ok(ApiResponse::ok(json!({ "deleted": id })))
}

/// Coerce raw query-string pairs into search criteria.
///
/// - `hasEquity` with any non-empty value becomes `true`
/// - `minSalary` becomes the integer its value starts with, so `12abc` is `12`
/// - empty values, a `minSalary` with no leading digits, and every other key
///   stay strings, leaving schema validation to reject what it must
///
/// A repeated key keeps its last value.
pub fn normalize_search_query(query: &[(String, String)]) -> Map<String, Value> {
    let mut criteria = Map::new();
    for (key, raw) in query {
        let value = match key.as_str() {
            "hasEquity" if !raw.is_empty() => Value::Bool(true),
            "minSalary" => leading_integer(raw)
                .map(Value::from)
                .unwrap_or_else(|| Value::String(raw.clone())),
            _ => Value::String(raw.clone()),
        };
        criteria.insert(key.clone(), value);
    }
    criteria
}

/// The optionally signed integer at the start of `raw`, ignoring leading whitespace.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len() - sign_len);
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

fn parse_id(raw: &str) -> JoblyResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| JoblyError::validation(format!("Invalid job id: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn has_equity_presence_means_true() {
        for raw in ["true", "false", "0"] {
            let c = normalize_search_query(&pairs(&[("hasEquity", raw)]));
            assert_eq!(c["hasEquity"], json!(true));
        }
    }

    #[test]
    fn empty_has_equity_fails_schema() {
        let c = normalize_search_query(&pairs(&[("hasEquity", "")]));
        assert_eq!(c["hasEquity"], json!(""));
        assert!(ensure_valid(Schema::JobSearch, &Value::Object(c)).is_err());
    }

    #[test]
    fn min_salary_is_parsed() {
        let c = normalize_search_query(&pairs(&[("minSalary", "50000")]));
        assert_eq!(c["minSalary"], json!(50000));
    }

    #[test]
    fn min_salary_uses_leading_digits() {
        for (raw, expected) in [("12abc", json!(12)), (" 7", json!(7)), ("-3x", json!(-3))] {
            let c = normalize_search_query(&pairs(&[("minSalary", raw)]));
            assert_eq!(c["minSalary"], expected, "{raw}");
        }
        for raw in ["", "abc", "-", "+x"] {
            let c = normalize_search_query(&pairs(&[("minSalary", raw)]));
            assert_eq!(c["minSalary"], json!(raw), "{raw}");
        }
    }

    #[test]
    fn oversized_min_salary_fails_schema() {
        let c = normalize_search_query(&pairs(&[("minSalary", "3000000000")]));
        assert_eq!(c["minSalary"], json!(3_000_000_000_i64));
        assert!(ensure_valid(Schema::JobSearch, &Value::Object(c)).is_err());
    }

    #[test]
    fn unparsable_min_salary_fails_schema() {
        let c = normalize_search_query(&pairs(&[("minSalary", "lots")]));
        assert_eq!(c["minSalary"], json!("lots"));
        assert!(ensure_valid(Schema::JobSearch, &Value::Object(c)).is_err());
    }

    #[test]
    fn keeps_query_order() {
        let c = normalize_search_query(&pairs(&[("title", "eng"), ("minSalary", "1")]));
        let keys: Vec<&str> = c.keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "minSalary"]);
    }

    #[test]
    fn parse_id_rejects_non_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Invalid job id: abc");
    }
}
