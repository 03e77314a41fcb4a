//! Read table and column information from a live database.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OptionalExtension};

use super::info::{ColumnInfo, GeometryInfo, TableInfo};
use super::{quote_ident, DbResult};
use crate::types::ColumnType;

const DEFAULT_SCHEMA: &str = "main";

/// Names of the user tables in `schema` (default `main`), sorted.
pub fn list_tables(conn: &Connection, schema: Option<&str>) -> DbResult<Vec<String>> {
    let schema = schema.unwrap_or(DEFAULT_SCHEMA);
    let sql = format!(
        "SELECT name FROM {}.sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
        quote_ident(schema)
    );
    let mut stmt = conn.prepare(&sql)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Describe a table, or `None` when it does not exist.
pub fn table_info(
    conn: &Connection,
    schema: Option<&str>,
    table: &str,
) -> DbResult<Option<TableInfo>> {
    let schema = schema.unwrap_or(DEFAULT_SCHEMA);
    let sql = format!("PRAGMA {}.table_info({})", quote_ident(schema), quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let declared = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    if declared.is_empty() {
        return Ok(None);
    }

    let has_geometry_table = has_geometry_columns(conn, schema)?;
    let mut columns = Vec::with_capacity(declared.len());
    for (column_name, sql_type) in declared {
        let geometry = if has_geometry_table {
            geometry_info(conn, schema, table, &column_name)?
        } else {
            None
        };
        let orm_type = match &geometry {
            Some(g) => ColumnType::Geometry {
                geometry_type: Some(g.geometry_type.clone()),
                srid: Some(g.srid),
            },
            None => ColumnType::parse(&sql_type),
        };
        columns.push(ColumnInfo {
            column_name,
            orm_type,
            sql_type,
            geometry,
        });
    }

    Ok(Some(TableInfo {
        schema: schema.to_string(),
        table_name: table.to_string(),
        columns,
    }))
}

fn has_geometry_columns(conn: &Connection, schema: &str) -> DbResult<bool> {
    let sql = format!(
        "SELECT 1 FROM {}.sqlite_master \
         WHERE type IN ('table', 'view') AND name = 'geometry_columns'",
        quote_ident(schema)
    );
    Ok(conn.query_row(&sql, [], |_| Ok(())).optional()?.is_some())
}

fn geometry_info(
    conn: &Connection,
    schema: &str,
    table: &str,
    column: &str,
) -> DbResult<Option<GeometryInfo>> {
    let sql = format!(
        "SELECT geometry_type, coord_dimension, srid FROM {}.geometry_columns \
         WHERE lower(f_table_name) = lower(?1) AND lower(f_geometry_column) = lower(?2)",
        quote_ident(schema)
    );
    let row = conn
        .query_row(&sql, params![table, column], |row| {
            Ok((
                row.get::<_, SqlValue>(0)?,
                row.get::<_, SqlValue>(1)?,
                row.get::<_, Option<i32>>(2)?,
            ))
        })
        .optional()?;
    Ok(row.map(|(geometry_type, dimension, srid)| {
        let (name, code_dimension) = geometry_type_name(&geometry_type);
        GeometryInfo {
            coord_dimension: coord_dimension(&dimension).unwrap_or(code_dimension),
            geometry_type: name,
            srid: srid.unwrap_or(-1),
        }
    }))
}

/// SpatiaLite stores geometry types either as text or as OGC integer codes
/// (`1` = POINT, `1002` = LINESTRING Z, ...). Returns the type name and the
/// dimension implied by the code.
fn geometry_type_name(value: &SqlValue) -> (String, u8) {
    match value {
        SqlValue::Integer(code) => {
            let name = match code % 1000 {
                1 => "POINT",
                2 => "LINESTRING",
                3 => "POLYGON",
                4 => "MULTIPOINT",
                5 => "MULTILINESTRING",
                6 => "MULTIPOLYGON",
                7 => "GEOMETRYCOLLECTION",
                _ => "GEOMETRY",
            };
            let dimension = match code / 1000 {
                0 => 2,
                1 | 2 => 3,
                _ => 4,
            };
            (name.to_string(), dimension)
        }
        SqlValue::Text(name) => (name.to_uppercase(), 2),
        _ => ("GEOMETRY".to_string(), 2),
    }
}

fn coord_dimension(value: &SqlValue) -> Option<u8> {
    match value {
        SqlValue::Integer(n) => u8::try_from(*n).ok(),
        SqlValue::Text(dims) => match dims.to_uppercase().as_str() {
            "XY" | "2" => Some(2),
            "XYZ" | "XYM" | "3" => Some(3),
            "XYZM" | "4" => Some(4),
            _ => None,
        },
        _ => None,
    }
}
