//! The jobs resource: storage types and model operations.
//!
//! Every operation takes `&impl GenericClient` and runs a single statement.

mod filter;

pub use filter::job_filter;

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{ColumnMap, Query, partial_update};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_postgres::Row;

const JOB_COLUMNS: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

const LISTING_SELECT: &str = r#"SELECT j.id,
        j.title,
        j.salary,
        j.equity,
        j.company_handle AS "companyHandle",
        c.name AS "companyName"
   FROM jobs j"#;

/// A row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

/// A job as it appears in listings, with its company's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
            company_name: row.try_get_column("companyName")?,
        })
    }
}

/// The owning company, embedded in [`JobDetail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A single job with its company inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: CompanySummary,
}

impl FromRow for JobDetail {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company: CompanySummary {
                handle: row.try_get_column("handle")?,
                name: row.try_get_column("name")?,
                description: row.try_get_column("description")?,
                num_employees: row.try_get_column("numEmployees")?,
                logo_url: row.try_get_column("logoUrl")?,
            },
        })
    }
}

/// Input for [`create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Fields a client may change through [`update`].
///
/// Ids and the owning company are fixed once a job exists.
pub fn update_columns() -> JoblyResult<ColumnMap> {
    ColumnMap::closed()
        .column("title")?
        .column("salary")?
        .column("equity")
}

/// Insert a job and return the stored row.
pub async fn create(conn: &impl GenericClient, new_job: &NewJob) -> JoblyResult<Job> {
    let job: Job = Query::new(format!(
        "INSERT INTO jobs (title, salary, equity, company_handle) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {JOB_COLUMNS}"
    ))
    .tag("jobs.create")
    .bind(new_job.title.clone())
    .bind(new_job.salary)
    .bind(new_job.equity)
    .bind(new_job.company_handle.clone())
    .fetch_one_as(conn)
    .await?;

    tracing::info!(id = job.id, company = %job.company_handle, "job created");
    Ok(job)
}

/// All jobs, each with its company name.
pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<JobListing>> {
    Query::new(format!(
        "{LISTING_SELECT}
   LEFT JOIN companies AS c ON c.handle = j.company_handle
   ORDER BY title, id"
    ))
    .tag("jobs.find_all")
    .fetch_all_as(conn)
    .await
}

/// Jobs matching `criteria` (see [`job_filter`]).
///
/// When no recognized criterion produces a predicate this is [`find_all`].
pub async fn filter(
    conn: &impl GenericClient,
    criteria: &Map<String, Value>,
) -> JoblyResult<Vec<JobListing>> {
    let predicates = job_filter(criteria)?;
    if predicates.is_empty() {
        return find_all(conn).await;
    }

    Query::from_fragment(predicates, |where_clause| {
        format!(
            "{LISTING_SELECT}
   JOIN companies AS c ON c.handle = j.company_handle
   WHERE {where_clause}
   ORDER BY title, id"
        )
    })
    .tag("jobs.filter")
    .fetch_all_as(conn)
    .await
}

/// One job with its company.
pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<JobDetail> {
    Query::new(
        r#"SELECT j.id,
        j.title,
        j.salary,
        j.equity,
        c.handle,
        c.name,
        c.description,
        c.num_employees AS "numEmployees",
        c.logo_url AS "logoUrl"
   FROM jobs j
   JOIN companies AS c ON c.handle = j.company_handle
   WHERE j.id = $1"#,
    )
    .tag("jobs.get")
    .bind(id)
    .fetch_opt_as(conn)
    .await?
    .ok_or_else(|| no_job(id))
}

/// Apply a partial update; only `title`, `salary` and `equity` may change.
pub async fn update(
    conn: &impl GenericClient,
    id: i32,
    payload: &Map<String, Value>,
) -> JoblyResult<Job> {
    let set = partial_update(payload, &update_columns()?)?;
    let id_idx = set.next_placeholder();

    let job: Job = Query::from_fragment(set, |set| {
        format!("UPDATE jobs SET {set} WHERE id = ${id_idx} RETURNING {JOB_COLUMNS}")
    })
    .tag("jobs.update")
    .bind(id)
    .fetch_opt_as(conn)
    .await?
    .ok_or_else(|| no_job(id))?;

    tracing::info!(id, fields = payload.len(), "job updated");
    Ok(job)
}

/// Delete a job.
pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
    let deleted = Query::new("DELETE FROM jobs WHERE id = $1 RETURNING id")
        .tag("jobs.remove")
        .bind(id)
        .fetch_opt(conn)
        .await?;

    if deleted.is_none() {
        return Err(no_job(id));
    }
    tracing::info!(id, "job removed");
    Ok(())
}

fn no_job(id: i32) -> JoblyError {
    JoblyError::not_found(format!("No job: {id}"))
}
