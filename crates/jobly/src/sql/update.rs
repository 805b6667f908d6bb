use super::columns::ColumnMap;
use super::fragment::{FragmentBuilder, SqlFragment};
use super::value::BindValue;
use crate::error::{JoblyError, JoblyResult};
use serde_json::{Map, Value};

/// Build the `SET` list of a partial update.
///
/// Each entry of `payload`, in the order it was supplied, becomes
/// `"<column>"=$i` with its value at `values[i - 1]`. Columns come from
/// `columns`; see [`ColumnMap::resolve`] for the fallback rules.
///
/// The caller appends its own parameters (typically the row id) starting at
/// [`SqlFragment::next_placeholder`].
///
/// # Example
/// ```ignore
/// let set = jobly::sql::partial_update(&payload, &ColumnMap::new())?;
/// let id_idx = set.next_placeholder();
/// let sql = format!("UPDATE jobs SET {} WHERE id = ${id_idx}", set.fragment);
/// ```
///
/// Fails with [`JoblyError::Validation`] when `payload` is empty, when a key
/// does not resolve to a valid column, or when a value is not a scalar.
pub fn partial_update(payload: &Map<String, Value>, columns: &ColumnMap) -> JoblyResult<SqlFragment> {
    if payload.is_empty() {
        return Err(JoblyError::validation("No data"));
    }

    let mut set = FragmentBuilder::new();
    for (field, value) in payload {
        let column = columns.resolve(field)?;
        let value = BindValue::from_json(field, value)?;
        set.push_bound(|p| format!("{}={p}", column.to_sql()), value);
    }
    Ok(set.finish(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!("test payloads are objects"),
        }
    }

    #[test]
    fn one_field() {
        let cols = ColumnMap::from_pairs([("f1", "f1"), ("sf2", "f2")]).unwrap();
        let res = partial_update(&payload(json!({"f1": "2"})), &cols).unwrap();
        assert_eq!(res.fragment, r#""f1"=$1"#);
        assert_eq!(res.values, vec![BindValue::from("2")]);
    }

    #[test]
    fn two_fields_fall_back_to_field_names() {
        let cols = ColumnMap::from_pairs([("sf2", "f2")]).unwrap();
        let res = partial_update(&payload(json!({"f1": "2", "f2": "3"})), &cols).unwrap();
        assert_eq!(res.fragment, r#""f1"=$1, "f2"=$2"#);
        assert_eq!(res.values, vec![BindValue::from("2"), BindValue::from("3")]);
    }

    #[test]
    fn empty_payload_is_rejected() {
        let cols = ColumnMap::from_pairs([("sf2", "f2")]).unwrap();
        let err = partial_update(&Map::new(), &cols).unwrap_err();
        assert!(matches!(err, JoblyError::Validation(ref m) if m == "No data"));
    }

    #[test]
    fn mapped_fields_use_column_names() {
        let cols = ColumnMap::new()
            .rename("firstName", "first_name")
            .unwrap();
        let res = partial_update(&payload(json!({"firstName": "Aliya", "age": 32})), &cols).unwrap();
        assert_eq!(res.fragment, r#""first_name"=$1, "age"=$2"#);
        assert_eq!(res.values, vec![BindValue::from("Aliya"), BindValue::Int(32)]);
    }

    #[test]
    fn keeps_supplied_key_order() {
        let res = partial_update(
            &payload(json!({"salary": 10, "title": "x", "equity": null})),
            &ColumnMap::new(),
        )
        .unwrap();
        assert_eq!(res.fragment, r#""salary"=$1, "title"=$2, "equity"=$3"#);
        assert_eq!(
            res.values,
            vec![BindValue::Int(10), BindValue::from("x"), BindValue::Null]
        );
        assert_eq!(res.placeholder_count(), res.values.len());
        assert_eq!(res.next_placeholder(), 4);
    }

    #[test]
    fn closed_map_rejects_unlisted_field() {
        let cols = ColumnMap::closed().column("title").unwrap();
        let err = partial_update(&payload(json!({"title": "x", "id": 9})), &cols).unwrap_err();
        assert_eq!(err.to_string(), "Unknown field: id");
    }

    #[test]
    fn hostile_key_never_reaches_sql() {
        let hostile = payload(json!({r#"title"='x', "salary"#: 1}));
        assert!(partial_update(&hostile, &ColumnMap::new()).is_err());
    }

    #[test]
    fn container_values_are_rejected() {
        let err = partial_update(&payload(json!({"title": ["a", "b"]})), &ColumnMap::new())
            .unwrap_err();
        assert!(matches!(err, JoblyError::Validation(_)));
    }

    #[test]
    fn same_input_same_output() {
        let p = payload(json!({"f1": "2", "f2": "3"}));
        let cols = ColumnMap::new();
        assert_eq!(
            partial_update(&p, &cols).unwrap(),
            partial_update(&p, &cols).unwrap()
        );
    }
}
