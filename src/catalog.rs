use crate::{
    element::ElementKind,
    engine::{AttributeInfo, AttributeKind, GraphEngine, Oid, SessionId, TypeId, TypeInfo},
    errors::TypedGraphError,
    value::DataType,
};

/// Label and key resolution against the engine's type catalog, bound to one
/// transaction.
pub struct Catalog<'a> {
    engine: &'a dyn GraphEngine,
    session: SessionId,
}

impl<'a> Catalog<'a> {
    pub fn new(engine: &'a dyn GraphEngine, session: SessionId) -> Self {
        Self { engine, session }
    }

    pub fn engine(&self) -> &'a dyn GraphEngine {
        self.engine
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn find_type(&self, label: &str) -> Result<Option<TypeInfo>, TypedGraphError> {
        match self.engine.find_type(self.session, label)? {
            Some(ty) => self.engine.type_info(self.session, ty).map(Some),
            None => Ok(None),
        }
    }

    /// Type named `label` when it exists and holds elements of `kind`.
    pub fn find_type_of_kind(
        &self,
        label: &str,
        kind: ElementKind,
    ) -> Result<Option<TypeInfo>, TypedGraphError> {
        Ok(self
            .find_type(label)?
            .filter(|info| info.object_type == kind.object_type()))
    }

    /// Resolves `label` to a type of `kind`, creating it on first use.
    pub fn ensure_type(&self, label: &str, kind: ElementKind) -> Result<TypeId, TypedGraphError> {
        if let Some(info) = self.find_type(label)? {
            if info.object_type != kind.object_type() {
                return Err(TypedGraphError::invalid_input(format!(
                    "given label is not a {kind} label: {label}"
                )));
            }
            return Ok(info.id);
        }
        let ty = match kind {
            ElementKind::Vertex => self.engine.new_node_type(self.session, label)?,
            ElementKind::Edge => self.engine.new_edge_type(self.session, label, true, true)?,
        };
        log::debug!("created {kind} type '{label}' ({})", ty.0);
        Ok(ty)
    }

    pub fn types_of(&self, kind: ElementKind) -> Result<Vec<TypeId>, TypedGraphError> {
        self.engine.find_types(self.session, kind.object_type())
    }

    pub fn type_names(&self, kind: ElementKind) -> Result<Vec<String>, TypedGraphError> {
        let mut names = Vec::new();
        for ty in self.types_of(kind)? {
            names.push(self.engine.type_info(self.session, ty)?.name);
        }
        Ok(names)
    }

    pub fn attribute(
        &self,
        ty: TypeId,
        key: &str,
    ) -> Result<Option<AttributeInfo>, TypedGraphError> {
        match self.engine.find_attribute(self.session, ty, key)? {
            Some(attr) => self.engine.attribute_info(self.session, attr).map(Some),
            None => Ok(None),
        }
    }

    pub fn attributes(&self, ty: TypeId) -> Result<Vec<AttributeInfo>, TypedGraphError> {
        let mut attributes = Vec::new();
        for attr in self.engine.find_attributes(self.session, ty)? {
            attributes.push(self.engine.attribute_info(self.session, attr)?);
        }
        Ok(attributes)
    }

    /// Resolves `key` on `ty`, creating a basic attribute of `data_type` when
    /// the type does not define it yet.
    pub fn ensure_attribute(
        &self,
        ty: TypeId,
        key: &str,
        data_type: DataType,
    ) -> Result<AttributeInfo, TypedGraphError> {
        if let Some(info) = self.attribute(ty, key)? {
            if info.data_type != data_type {
                return Err(TypedGraphError::invalid_input(format!(
                    "attribute '{key}' holds {} values, got {data_type}",
                    info.data_type
                )));
            }
            return Ok(info);
        }
        let attr = self
            .engine
            .new_attribute(self.session, ty, key, data_type, AttributeKind::Basic)?;
        log::debug!("created basic attribute '{key}' ({data_type}) on type {}", ty.0);
        self.engine.attribute_info(self.session, attr)
    }

    /// Type of an existing object, or `None` for an unknown id.
    pub fn object_type(&self, oid: Oid) -> Result<Option<TypeInfo>, TypedGraphError> {
        match self.engine.object_type(self.session, oid)? {
            Some(ty) => self.engine.type_info(self.session, ty).map(Some),
            None => Ok(None),
        }
    }

    /// Whether `oid` names an existing element of `kind`.
    pub fn is_kind(&self, oid: Oid, kind: ElementKind) -> Result<bool, TypedGraphError> {
        Ok(self
            .object_type(oid)?
            .is_some_and(|info| info.object_type == kind.object_type()))
    }
}
