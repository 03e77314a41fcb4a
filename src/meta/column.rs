//! Column metadata.

use once_cell::sync::OnceCell;
use serde_json::{json, Map, Value};

use super::{
    DataTypeMeta, Export, Requirement, Source, Synonyms, Target, Usage, ValueDomain,
    ValueDomainItem,
};
use crate::error::UnsupportedTypeError;
use crate::types::{ColumnType, TypeClassifier};

/// Metadata for table columns.
///
/// Built once with [`ColumnMeta::builder`] and read-only afterwards. The one
/// exception is the data type descriptor, which may be derived from the
/// column's type on first use and is cached from then on.
#[derive(Debug, Clone, Default)]
pub struct ColumnMeta {
    label: String,
    description: String,
    nena: Option<String>,
    source: Source,
    target: Target,
    synonyms: Synonyms,
    data_type: OnceCell<DataTypeMeta>,
    domain: Option<ValueDomain>,
}

impl ColumnMeta {
    pub fn builder() -> ColumnMetaBuilder {
        ColumnMetaBuilder::default()
    }

    /// The human-friendly label for the column.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The equivalent field name in the NENA data standard, if any.
    pub fn nena(&self) -> Option<&str> {
        self.nena.as_deref()
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn synonyms(&self) -> &Synonyms {
        &self.synonyms
    }

    /// Test a name to see if it's a synonym for the column's name.
    pub fn is_synonym(&self, name: &str) -> bool {
        self.synonyms.is_synonym(name)
    }

    pub fn domain(&self) -> Option<&ValueDomain> {
        self.domain.as_ref()
    }

    /// The source contract's requirement.
    pub fn requirement(&self) -> Requirement {
        self.source.requirement()
    }

    /// The target contract's usage flags.
    pub fn usage(&self) -> Usage {
        self.target.usage()
    }

    /// The data type descriptor, if it was declared or has been derived.
    pub fn data_type_meta(&self) -> Option<&DataTypeMeta> {
        self.data_type.get()
    }

    /// The data type descriptor, deriving and caching it from `column_type`
    /// when none is present yet.
    pub fn data_type_meta_or_derive(
        &self,
        column_type: &ColumnType,
        primary_key: bool,
        classifier: &TypeClassifier,
    ) -> Result<&DataTypeMeta, UnsupportedTypeError> {
        self.data_type.get_or_try_init(|| {
            DataTypeMeta::from_column_type(column_type, primary_key, classifier)
        })
    }
}

impl PartialEq for ColumnMeta {
    fn eq(&self, other: &Self) -> bool {
        let data_types_agree = match (self.data_type.get(), other.data_type.get()) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        self.label == other.label
            && self.description == other.description
            && self.nena == other.nena
            && self.source == other.source
            && self.target == other.target
            && self.synonyms == other.synonyms
            && self.domain == other.domain
            && data_types_agree
    }
}

impl Export for ColumnMeta {
    fn export(&self) -> Option<Value> {
        let mut out = Map::new();
        out.insert("label".into(), json!(self.label));
        out.insert("description".into(), json!(self.description));
        if let Some(nena) = &self.nena {
            out.insert("nena".into(), json!(nena));
        }
        if let Some(source) = self.source.export() {
            out.insert("source".into(), source);
        }
        if let Some(target) = self.target.export() {
            out.insert("target".into(), target);
        }
        if !self.synonyms.is_empty() {
            out.insert(
                "synonyms".into(),
                json!(self.synonyms.iter().collect::<Vec<_>>()),
            );
        }
        if let Some(data_type) = self.data_type.get().and_then(|d| d.export()) {
            out.insert("data_type".into(), data_type);
        }
        if let Some(domain) = self.domain.as_ref().and_then(|d| d.export()) {
            out.insert("domain".into(), domain);
        }
        Some(Value::Object(out))
    }
}

/// Builder for [`ColumnMeta`].
#[derive(Debug, Clone, Default)]
pub struct ColumnMetaBuilder {
    meta: ColumnMeta,
}

impl ColumnMetaBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.meta.label = label.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    pub fn nena(mut self, nena: impl Into<String>) -> Self {
        self.meta.nena = Some(nena.into());
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.meta.source = source;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.meta.target = target;
        self
    }

    pub fn synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.synonyms = Synonyms::new(synonyms);
        self
    }

    /// Declare the data type descriptor instead of deriving it.
    pub fn data_type(mut self, data_type: DataTypeMeta) -> Self {
        self.meta.data_type = OnceCell::with_value(data_type);
        self
    }

    pub fn domain(mut self, domain: ValueDomain) -> Self {
        self.meta.domain = (!domain.is_empty()).then_some(domain);
        self
    }

    /// Build the domain from items, e.g. `[("A", "first"), ("B", "second")]`.
    pub fn domain_items<I, T>(self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ValueDomainItem>,
    {
        self.domain(ValueDomain::new(items))
    }

    pub fn build(self) -> ColumnMeta {
        self.meta
    }
}
