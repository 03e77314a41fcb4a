//! Metadata records attached to columns, tables and whole data models.
//!
//! Every record is immutable once built. The one lazily filled slot is the
//! [`DataTypeMeta`] cached inside a [`ColumnMeta`].

mod caseless;
mod column;
mod contract;
mod data_type;
mod domain;
mod model;
mod synonyms;
mod table;

pub use caseless::CaseInsensitiveMap;
pub use column::{ColumnMeta, ColumnMetaBuilder};
pub use contract::{Requirement, Source, Target, Usage, UsageFlag};
pub use data_type::DataTypeMeta;
pub use domain::{DomainValue, ValueDomain, ValueDomainItem};
pub use model::ModelMeta;
pub use synonyms::Synonyms;
pub use table::TableMeta;

use serde_json::Value;

/// Records that can be exported to a JSON document.
pub trait Export {
    /// The exported JSON, or `None` when there is nothing worth exporting.
    fn export(&self) -> Option<Value>;
}
