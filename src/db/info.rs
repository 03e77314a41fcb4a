//! Descriptions of database tables and columns.

use serde::Serialize;

use crate::types::ColumnType;

/// Extra details of a geometry column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeometryInfo {
    /// Number of coordinate dimensions.
    pub coord_dimension: u8,
    pub geometry_type: String,
    /// Spatial reference ID.
    pub srid: i32,
}

/// A column in a database table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub column_name: String,
    /// The column type as this crate understands it.
    pub orm_type: ColumnType,
    /// The type as stated by the database.
    pub sql_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryInfo>,
}

impl ColumnInfo {
    pub fn is_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

/// A table in a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub schema: String,
    pub table_name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    /// The table's geometry column, if it has one.
    pub fn geometry_column(&self) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.is_geometry())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.column_name.eq_ignore_ascii_case(name))
    }
}
