//! # modlit
//!
//! Descriptive metadata for the columns and tables of relational data models.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │   Model declarations (ModelBuilder or a TOML catalog)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [registry: register + discover]
//! ┌─────────────────────────────────────────────────────────┐
//! │   MetadataRegistry: FieldId -> ColumnMeta side table    │
//! │   + TypeClassifier (ColumnType -> DeclarativeType)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [table_meta / model_meta]
//! ┌─────────────────────────────────────────────────────────┐
//! │   TableMeta / ModelMeta  ──►  schema::api, schema::serial│
//! └─────────────────────────────────────────────────────────┘
//!
//!   db::{connection, introspect, script}: SQLite helpers
//! ```
//!
//! ## Example
//!
//! ```
//! use modlit::prelude::*;
//!
//! let mut registry = MetadataRegistry::new();
//! let road = registry
//!     .register(
//!         ModelBuilder::new("Road")
//!             .tablename("roads")
//!             .table("Roads", ["street"])
//!             .column_with_meta(
//!                 "name",
//!                 ColumnDef::new(ColumnType::Varchar { length: Some(64) }),
//!                 ColumnMeta::builder()
//!                     .label("Road Name")
//!                     .source(Source::required())
//!                     .target(Target::new(true, false, Usage::SEARCH | Usage::DISPLAY))
//!                     .build(),
//!             ),
//!     )
//!     .unwrap();
//!
//! let table = registry.table_meta(road).unwrap();
//! assert_eq!(table.column("NAME").unwrap().label(), "Road Name");
//! assert!(table.is_synonym("Streets"));
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod logging;
pub mod meta;
pub mod registry;
pub mod schema;
pub mod transform;
pub mod types;

pub use error::{ModlitError, ModlitResult, UnsupportedTypeError};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::{ModlitError, ModlitResult, UnsupportedTypeError};
    pub use crate::meta::{
        ColumnMeta, DataTypeMeta, DomainValue, Export, ModelMeta, Requirement, Source, Synonyms,
        TableMeta, Target, Usage, ValueDomain, ValueDomainItem,
    };
    pub use crate::registry::{
        ColumnDef, FieldId, FieldKind, MetadataRegistry, ModelBuilder, ModelId,
    };
    pub use crate::types::{ColumnType, DeclarativeType, TypeClassifier, TypeKind};
}
