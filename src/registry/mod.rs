//! The metadata registry.
//!
//! Column metadata lives in a side table keyed by [`FieldId`] rather than on
//! the field itself. Models are declared with a [`ModelBuilder`] and added
//! with [`MetadataRegistry::register`], which also runs discovery so that a
//! subclass column redeclared without metadata picks up its ancestor's.
//!
//! Registration is a single-threaded build step. Once built, the registry is
//! read-only and can be shared across threads.

mod field;
mod model;
mod mro;

pub use field::{ColumnDef, Field, FieldId, FieldKind};
pub use model::{ModelBuilder, ModelClass, ModelId, TableRecord};

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ModlitError, ModlitResult};
use crate::meta::{ColumnMeta, DataTypeMeta, ModelMeta, TableMeta};
use crate::types::TypeClassifier;

/// Registered models and the metadata attached to their fields.
#[derive(Debug, Clone)]
pub struct MetadataRegistry {
    classifier: TypeClassifier,
    models: Vec<ModelClass>,
    by_name: HashMap<String, ModelId>,
    metadata: HashMap<FieldId, Arc<ColumnMeta>>,
    fields: HashMap<FieldId, (ModelId, usize)>,
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataRegistry {
    /// An empty registry using the standard type classifier.
    pub fn new() -> Self {
        Self::with_classifier(TypeClassifier::standard().clone())
    }

    pub fn with_classifier(classifier: TypeClassifier) -> Self {
        Self {
            classifier,
            models: Vec::new(),
            by_name: HashMap::new(),
            metadata: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    pub fn classifier(&self) -> &TypeClassifier {
        &self.classifier
    }

    pub fn model(&self, id: ModelId) -> Option<&ModelClass> {
        self.models.get(id.0)
    }

    pub fn model_by_name(&self, name: &str) -> Option<&ModelClass> {
        self.by_name.get(name).and_then(|&id| self.model(id))
    }

    /// Models in registration order.
    pub fn models(&self) -> impl Iterator<Item = &ModelClass> {
        self.models.iter()
    }

    fn get_model(&self, id: ModelId) -> ModlitResult<&ModelClass> {
        self.model(id)
            .ok_or_else(|| ModlitError::UnknownModel(id.to_string()))
    }

    /// The field with the given identity.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields
            .get(&id)
            .map(|&(model, i)| &self.models[model.0].members[i])
    }

    /// Associate metadata with a field, replacing any already attached.
    pub fn attach(&mut self, field: FieldId, meta: impl Into<Arc<ColumnMeta>>) -> ModlitResult<()> {
        if !self.fields.contains_key(&field) {
            return Err(ModlitError::UnknownFieldId(field));
        }
        self.metadata.insert(field, meta.into());
        Ok(())
    }

    /// Is the field field-like, and does it carry metadata?
    pub fn has_metadata(&self, field: FieldId) -> bool {
        self.field(field).is_some_and(Field::is_field_like) && self.metadata.contains_key(&field)
    }

    pub fn get_metadata(&self, field: FieldId) -> Option<Arc<ColumnMeta>> {
        self.metadata.get(&field).cloned()
    }

    /// The model's linearized ancestor chain, the model itself first.
    pub fn ancestors(&self, model: ModelId) -> ModlitResult<&[ModelId]> {
        Ok(&self.get_model(model)?.mro)
    }

    /// The field visible on `model` under `name`: the first declarer along
    /// the ancestor chain.
    pub fn resolve(&self, model: ModelId, name: &str) -> Option<&Field> {
        let class = self.model(model)?;
        class
            .mro
            .iter()
            .find_map(|&ancestor| self.models[ancestor.0].member(name))
    }

    /// Every field visible on `model`.
    ///
    /// Fields come in linearization order from the root, so in a diamond the
    /// later base's fields precede the earlier base's. A redeclaration
    /// replaces the inherited field in place.
    pub fn visible_fields(&self, model: ModelId) -> Vec<(&str, &Field)> {
        let Some(class) = self.model(model) else {
            return Vec::new();
        };
        let mut fields: Vec<(&str, &Field)> = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for &ancestor in class.mro.iter().rev() {
            for field in &self.models[ancestor.0].members {
                match seen.get(field.name()) {
                    Some(&i) => fields[i].1 = field,
                    None => {
                        seen.insert(field.name(), fields.len());
                        fields.push((field.name(), field));
                    }
                }
            }
        }
        fields
    }

    /// The table name of `model`, inherited from the nearest ancestor that
    /// declares one.
    pub fn tablename(&self, model: ModelId) -> Option<&str> {
        let class = self.model(model)?;
        class
            .mro
            .iter()
            .find_map(|&ancestor| self.models[ancestor.0].own_tablename())
    }

    /// Copy ancestors' column metadata onto same-named columns of `model`
    /// that have none of their own.
    ///
    /// Metadata already attached is never overwritten. Returns the number of
    /// fields that received metadata.
    pub fn discover(&mut self, model: ModelId) -> ModlitResult<usize> {
        let class = self.get_model(model)?;
        let mut inherited: Vec<(FieldId, Arc<ColumnMeta>)> = Vec::new();
        for &ancestor in &class.mro {
            for field in &self.models[ancestor.0].members {
                if !field.is_column() {
                    continue;
                }
                let Some(meta) = self.metadata.get(&field.id) else {
                    continue;
                };
                let Some(visible) = self.resolve(model, field.name()) else {
                    continue;
                };
                if visible.is_column()
                    && !self.metadata.contains_key(&visible.id)
                    && !inherited.iter().any(|(id, _)| *id == visible.id)
                {
                    inherited.push((visible.id, Arc::clone(meta)));
                }
            }
        }
        let count = inherited.len();
        for (id, meta) in inherited {
            tracing::debug!(
                model = %self.models[model.0].name,
                field = %self.field(id).map(Field::name).unwrap_or_default(),
                "inherited column metadata"
            );
            self.metadata.insert(id, meta);
        }
        Ok(count)
    }

    /// Register a model class.
    ///
    /// Declared column metadata gets a data type descriptor derived from the
    /// column's type unless it already has one. Discovery runs before the
    /// model's id is returned.
    pub fn register(&mut self, builder: ModelBuilder) -> ModlitResult<ModelId> {
        if self.by_name.contains_key(&builder.name) {
            return Err(ModlitError::DuplicateModel(builder.name));
        }
        let bases = builder
            .bases
            .iter()
            .map(|name| {
                self.by_name
                    .get(name)
                    .copied()
                    .ok_or_else(|| ModlitError::UnknownModel(name.clone()))
            })
            .collect::<ModlitResult<Vec<_>>>()?;

        let id = ModelId(self.models.len());
        let mro = mro::linearize(id, &bases, |b| self.models[b.0].mro.as_slice())
            .ok_or_else(|| ModlitError::InconsistentHierarchy(builder.name.clone()))?;

        let mut members = Vec::with_capacity(builder.members.len());
        let mut index = HashMap::new();
        let mut declared = Vec::new();
        for decl in builder.members {
            if index.contains_key(&decl.name) {
                return Err(ModlitError::Constraint(format!(
                    "member '{}' is declared twice on '{}'",
                    decl.name, builder.name
                )));
            }
            let field_id = FieldId::next();
            if let Some(meta) = decl.meta {
                if let FieldKind::Column(def) = &decl.kind {
                    meta.data_type_meta_or_derive(
                        &def.column_type,
                        def.primary_key,
                        &self.classifier,
                    )?;
                }
                declared.push((field_id, Arc::new(meta)));
            }
            index.insert(decl.name.clone(), members.len());
            members.push(Field {
                id: field_id,
                name: decl.name,
                kind: decl.kind,
            });
        }

        for (i, field) in members.iter().enumerate() {
            self.fields.insert(field.id, (id, i));
        }
        self.metadata.extend(declared);
        self.models.push(ModelClass {
            id,
            name: builder.name.clone(),
            tablename: builder.tablename,
            bases,
            mro,
            members,
            index,
            table: builder.table,
        });
        self.by_name.insert(builder.name, id);

        let inherited = self.discover(id)?;
        tracing::debug!(
            model = %self.models[id.0].name,
            inherited,
            "registered model"
        );
        Ok(id)
    }

    /// Full table metadata for `model`, or `None` when the model has no
    /// table record.
    ///
    /// The columns are every visible field-like member that carries metadata.
    pub fn table_meta(&self, model: ModelId) -> Option<TableMeta> {
        let class = self.model(model)?;
        let record = class.table_record()?;
        let tablename = self.tablename(model).unwrap_or(class.name());
        let mut table = TableMeta::new(tablename).with_synonyms(record.synonyms.clone());
        if let Some(label) = &record.label {
            table = table.with_label(label.clone());
        }
        for (name, field) in self.visible_fields(model) {
            if !field.is_field_like() {
                continue;
            }
            if let Some(meta) = self.metadata.get(&field.id) {
                table.add_column(name, Arc::clone(meta));
            }
        }
        Some(table)
    }

    /// The data type descriptor for a field's metadata, derived from the
    /// column type and cached on first use.
    ///
    /// `Ok(None)` when the field carries no metadata, or is not a column and
    /// declares no descriptor.
    pub fn data_type_meta(&self, field: FieldId) -> ModlitResult<Option<DataTypeMeta>> {
        let Some(meta) = self.metadata.get(&field) else {
            return Ok(None);
        };
        match self.field(field).and_then(Field::column_def) {
            Some(def) => {
                let dt = meta.data_type_meta_or_derive(
                    &def.column_type,
                    def.primary_key,
                    &self.classifier,
                )?;
                Ok(Some(*dt))
            }
            None => Ok(meta.data_type_meta().copied()),
        }
    }

    /// Model metadata built from the table records of `models`. Models
    /// without a table record are left out.
    pub fn model_meta(
        &self,
        title: impl Into<String>,
        slug: impl Into<String>,
        namespace: impl Into<String>,
        version: impl Into<String>,
        models: &[ModelId],
    ) -> ModelMeta {
        let tables = models.iter().filter_map(|&m| self.table_meta(m));
        ModelMeta::new(title, slug, namespace, version, tables)
    }
}
