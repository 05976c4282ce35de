use crate::domain::model::{
    iso8601, Artifact, ConversionRequest, DataSource, Destination, ResultSet, Row, SqlDialect,
    Value,
};
use crate::domain::ports::Converter;
use crate::utils::error::Result;

/// Emits a `CREATE TABLE` statement followed by `INSERT`s, suitable for
/// replaying the data into another database.
pub struct SqlConverter;

impl Converter for SqlConverter {
    /// Column names are rewritten into plain SQL identifiers before any
    /// statement references them.
    fn preprocess(&self, rows: ResultSet, _request: &ConversionRequest) -> ResultSet {
        let columns = rows
            .columns()
            .iter()
            .map(|c| sanitize_identifier(c))
            .collect();
        rows.with_columns(columns)
    }

    fn convert(&self, rows: &ResultSet, request: &ConversionRequest) -> Result<Artifact> {
        let table = table_name(request);
        let dialect = request.sql.dialect;

        let mut out = create_table(rows, &table, dialect);

        if !rows.is_empty() {
            out.push_str("\n-- Data insertion statements\n");
            if request.sql.use_batch_insert {
                for batch in rows.rows().chunks(request.sql.batch_size.max(1)) {
                    out.push_str(&batch_insert(rows.columns(), batch, &table, dialect));
                    out.push('\n');
                }
            } else {
                for row in rows.rows() {
                    out.push_str(&single_insert(rows.columns(), row, &table, dialect));
                    out.push('\n');
                }
            }
        }

        Ok(Artifact::Bytes(out.into_bytes()))
    }
}

/// Explicit option first, then the source table, then the output file stem.
fn table_name(request: &ConversionRequest) -> String {
    if let Some(name) = &request.sql.table_name {
        return name.clone();
    }
    if let DataSource::Table(name) = &request.source {
        // Strip any schema qualifier; the target schema is the reader's call.
        return name.rsplit('.').next().unwrap_or(name).to_string();
    }
    if let Destination::File(path) = &request.destination {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            return sanitize_identifier(stem);
        }
    }
    "exported_data".to_string()
}

fn create_table(rows: &ResultSet, table: &str, dialect: SqlDialect) -> String {
    let mut sql = format!("CREATE TABLE `{}` (\n", table);
    let columns: Vec<String> = rows
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| format!("    `{}` {}", name, infer_column_type(rows, idx, dialect)))
        .collect();
    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n);\n");
    sql
}

/// Column type from the first non-null tag observed down the column.
/// Text width is the maximum observed length; a column that never shows a
/// non-null value falls back to `VARCHAR(255)`.
fn infer_column_type(rows: &ResultSet, idx: usize, dialect: SqlDialect) -> String {
    let first_non_null = rows
        .rows()
        .iter()
        .filter_map(|row| row.values.get(idx))
        .find(|v| !v.is_null());

    match first_non_null {
        None | Some(Value::Null) => "VARCHAR(255)".to_string(),
        Some(Value::Integer(_)) => "INT".to_string(),
        Some(Value::Float(_)) => "DECIMAL(18, 6)".to_string(),
        Some(Value::Boolean(_)) => "BOOLEAN".to_string(),
        Some(Value::Timestamp(_)) => "DATETIME".to_string(),
        Some(Value::Json(_)) => match dialect {
            SqlDialect::Mysql => "JSON".to_string(),
            SqlDialect::Postgresql => "JSONB".to_string(),
            SqlDialect::Generic => "TEXT".to_string(),
        },
        Some(Value::Text(_)) => {
            let width = rows
                .rows()
                .iter()
                .filter_map(|row| match row.values.get(idx) {
                    Some(Value::Text(s)) => Some(s.chars().count()),
                    _ => None,
                })
                .max()
                .unwrap_or(255);
            format!("VARCHAR({})", width.max(1))
        }
    }
}

fn column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn batch_insert(columns: &[String], rows: &[Row], table: &str, dialect: SqlDialect) -> String {
    let mut sql = format!("INSERT INTO `{}` ({}) VALUES\n", table, column_list(columns));
    let tuples: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "({})",
                row.values
                    .iter()
                    .map(|v| format_value(v, dialect))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
        .collect();
    sql.push_str(&tuples.join(",\n"));
    sql.push(';');
    sql
}

fn single_insert(columns: &[String], row: &Row, table: &str, dialect: SqlDialect) -> String {
    format!(
        "INSERT INTO `{}` ({}) VALUES ({});",
        table,
        column_list(columns),
        row.values
            .iter()
            .map(|v| format_value(v, dialect))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn format_value(value: &Value, dialect: SqlDialect) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => {
            let literal = match (dialect, *b) {
                (SqlDialect::Mysql, true) => "1",
                (SqlDialect::Mysql, false) => "0",
                (_, true) => "TRUE",
                (_, false) => "FALSE",
            };
            literal.to_string()
        }
        Value::Timestamp(ts) => format!("'{}'", iso8601(ts)),
        Value::Text(s) => quote(s),
        Value::Json(doc) => quote(&doc.to_string()),
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn sanitize_identifier(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        cleaned.insert_str(0, "c_");
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Format, SqlOptions};
    use std::path::PathBuf;

    fn request(sql: SqlOptions) -> ConversionRequest {
        ConversionRequest {
            format: Format::Sql,
            source: DataSource::Table("users".into()),
            destination: Destination::File(PathBuf::from("out.sql")),
            json: Default::default(),
            csv: Default::default(),
            sql,
            mongo: Default::default(),
        }
    }

    fn convert(rows: ResultSet, sql: SqlOptions) -> String {
        let req = request(sql);
        let rows = SqlConverter.preprocess(rows, &req);
        let artifact = SqlConverter.convert(&rows, &req).unwrap();
        String::from_utf8(artifact.as_bytes().unwrap().to_vec()).unwrap()
    }

    #[test]
    fn empty_result_set_still_creates_the_table() {
        let out = convert(
            ResultSet::empty(vec!["id".into(), "name".into()]),
            SqlOptions::default(),
        );
        assert_eq!(
            out,
            "CREATE TABLE `users` (\n    `id` VARCHAR(255),\n    `name` VARCHAR(255)\n);\n"
        );
        assert!(!out.contains("INSERT"));
    }

    #[test]
    fn nulls_are_the_unquoted_literal() {
        let out = convert(
            ResultSet::new(
                vec!["id".into(), "email".into()],
                vec![
                    Row::new(vec![Value::Integer(1), Value::Null]),
                    Row::new(vec![Value::Integer(2), Value::Text("x@y.z".into())]),
                ],
            ),
            SqlOptions::default(),
        );
        assert!(out.contains("(1, NULL)"));
        assert!(out.contains("(2, 'x@y.z')"));
        assert!(!out.contains("'NULL'"));
        assert!(!out.contains("None"));
    }

    #[test]
    fn type_inference_skips_leading_nulls() {
        let out = convert(
            ResultSet::new(
                vec!["age".into()],
                vec![
                    Row::new(vec![Value::Null]),
                    Row::new(vec![Value::Integer(35)]),
                ],
            ),
            SqlOptions::default(),
        );
        assert!(out.contains("`age` INT"));
    }

    #[test]
    fn varchar_width_is_the_observed_maximum() {
        let out = convert(
            ResultSet::new(
                vec!["name".into()],
                vec![
                    Row::new(vec![Value::Text("Bo".into())]),
                    Row::new(vec![Value::Text("Alexander".into())]),
                ],
            ),
            SqlOptions::default(),
        );
        assert!(out.contains("`name` VARCHAR(9)"));
    }

    #[test]
    fn booleans_follow_the_dialect() {
        let rows = ResultSet::new(
            vec!["is_active".into()],
            vec![Row::new(vec![Value::Boolean(true)])],
        );
        let mysql = convert(rows.clone(), SqlOptions::default());
        assert!(mysql.contains("(1);"));

        let pg = convert(
            rows,
            SqlOptions {
                dialect: SqlDialect::Postgresql,
                ..SqlOptions::default()
            },
        );
        assert!(pg.contains("(TRUE);"));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let out = convert(
            ResultSet::new(
                vec!["name".into()],
                vec![Row::new(vec![Value::Text("O'Brien".into())])],
            ),
            SqlOptions::default(),
        );
        assert!(out.contains("('O''Brien')"));
    }

    #[test]
    fn per_row_inserts_when_batching_is_disabled() {
        let out = convert(
            ResultSet::new(
                vec!["id".into()],
                vec![
                    Row::new(vec![Value::Integer(1)]),
                    Row::new(vec![Value::Integer(2)]),
                ],
            ),
            SqlOptions {
                use_batch_insert: false,
                ..SqlOptions::default()
            },
        );
        assert_eq!(out.matches("INSERT INTO").count(), 2);
    }

    #[test]
    fn column_names_are_sanitized() {
        let req = request(SqlOptions::default());
        let rows = SqlConverter.preprocess(
            ResultSet::empty(vec!["user name".into(), "1st".into()]),
            &req,
        );
        assert_eq!(rows.columns().to_vec(), vec!["user_name", "c_1st"]);
    }
}
