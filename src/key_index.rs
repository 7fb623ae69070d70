use ahash::AHashSet;

use crate::{
    catalog::Catalog,
    element::ElementKind,
    engine::{AttributeId, AttributeKind},
    errors::TypedGraphError,
    value::DataType,
};

/// Data kind of attributes created by a key index without a declared type.
pub const DEFAULT_INDEX_DATA_TYPE: DataType = DataType::String;

pub struct KeyIndexManager<'a> {
    catalog: Catalog<'a>,
}

impl<'a> KeyIndexManager<'a> {
    pub fn new(catalog: Catalog<'a>) -> Self {
        Self { catalog }
    }

    /// Indexes `key` on the type named `label`, creating the type and the
    /// attribute when they do not exist yet. A basic attribute is promoted in
    /// place; an attribute that is already indexed is rejected.
    pub fn create(
        &self,
        kind: ElementKind,
        label: Option<&str>,
        key: &str,
        data_type: DataType,
    ) -> Result<AttributeId, TypedGraphError> {
        let label = label
            .filter(|label| !label.is_empty())
            .ok_or_else(|| TypedGraphError::invalid_input("label must be given"))?;
        let ty = self.catalog.ensure_type(label, kind)?;
        let engine = self.catalog.engine();
        let session = self.catalog.session();
        match self.catalog.attribute(ty, key)? {
            None => {
                let attr = engine.new_attribute(session, ty, key, data_type, AttributeKind::Indexed)?;
                log::debug!("created indexed attribute '{key}' ({data_type}) on '{label}'");
                Ok(attr)
            }
            Some(info) if info.kind.is_indexed() => Err(TypedGraphError::already_exists(format!(
                "index {label} {key}"
            ))),
            Some(info) => {
                engine.index_attribute(session, info.id, AttributeKind::Indexed)?;
                log::debug!("promoted attribute '{key}' on '{label}' to indexed");
                Ok(info.id)
            }
        }
    }

    /// Names of the indexed or unique attributes on any type of `kind`.
    pub fn indexed_keys(&self, kind: ElementKind) -> Result<AHashSet<String>, TypedGraphError> {
        let mut keys = AHashSet::new();
        for ty in self.catalog.types_of(kind)? {
            for attr in self.catalog.attributes(ty)? {
                if attr.kind.is_indexed() {
                    keys.insert(attr.name);
                }
            }
        }
        Ok(keys)
    }

    pub fn drop_index(&self, kind: ElementKind, key: &str) -> Result<(), TypedGraphError> {
        Err(TypedGraphError::unsupported(format!(
            "dropping the {kind} key index '{key}' is not supported"
        )))
    }
}
