//! Routing of key/value lookups.
//!
//! A lookup is planned against the catalog first and executed second. The
//! [`LookupPlan`] lists one [`Route`] per type that takes part in the lookup:
//! a plain type scan for label lookups, a type scan filtered client-side for
//! basic attributes, or an index lookup for indexed and unique attributes.

use crate::{
    catalog::Catalog,
    collection::Source,
    element::ElementKind,
    engine::{AttributeId, AttributeInfo, TypeId},
    errors::TypedGraphError,
    value::{PropertyValue, Value, coerce},
};

/// Lookup key that selects elements by their type name.
pub const LABEL_KEY: &str = "label";

#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    /// Every element of the type.
    TypeScan(TypeId),
    /// Every element of the type whose stored value equals `value`.
    FilteredScan {
        type_id: TypeId,
        attribute: AttributeId,
        value: PropertyValue,
    },
    IndexLookup {
        type_id: TypeId,
        attribute: AttributeId,
        value: Value,
    },
}

impl Route {
    pub fn type_id(&self) -> TypeId {
        match self {
            Route::TypeScan(type_id)
            | Route::FilteredScan { type_id, .. }
            | Route::IndexLookup { type_id, .. } => *type_id,
        }
    }

    pub fn is_index_lookup(&self) -> bool {
        matches!(self, Route::IndexLookup { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LookupPlan {
    kind: ElementKind,
    routes: Vec<Route>,
}

impl LookupPlan {
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn index_lookups(&self) -> usize {
        self.routes.iter().filter(|r| r.is_index_lookup()).count()
    }

    pub fn scans(&self) -> usize {
        self.routes.len() - self.index_lookups()
    }
}

pub struct QueryPlanner<'a> {
    catalog: Catalog<'a>,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(catalog: Catalog<'a>) -> Self {
        Self { catalog }
    }

    /// Plan reading every element of `kind`, one type scan per type.
    pub fn plan_all(&self, kind: ElementKind) -> Result<LookupPlan, TypedGraphError> {
        let routes = self
            .catalog
            .types_of(kind)?
            .into_iter()
            .map(Route::TypeScan)
            .collect();
        Ok(LookupPlan { kind, routes })
    }

    /// Plans `key == value` over elements of `kind`, restricted to the type
    /// named `scope` when given.
    pub fn plan(
        &self,
        kind: ElementKind,
        key: &str,
        value: &PropertyValue,
        scope: Option<&str>,
    ) -> Result<LookupPlan, TypedGraphError> {
        if key == LABEL_KEY {
            let label = value.to_string();
            let routes = match self.catalog.find_type_of_kind(&label, kind)? {
                Some(info) => vec![Route::TypeScan(info.id)],
                None => Vec::new(),
            };
            return Ok(LookupPlan { kind, routes });
        }

        let plan = match scope {
            None => self.plan_unscoped(kind, key, value)?,
            Some(label) => self.plan_scoped(kind, key, value, label)?,
        };
        log::debug!(
            "lookup {kind} {key}={value}: {} scan(s), {} index lookup(s)",
            plan.scans(),
            plan.index_lookups()
        );
        Ok(plan)
    }

    fn plan_unscoped(
        &self,
        kind: ElementKind,
        key: &str,
        value: &PropertyValue,
    ) -> Result<LookupPlan, TypedGraphError> {
        let mut routes = Vec::new();
        for ty in self.catalog.types_of(kind)? {
            if let Some(attr) = self.catalog.attribute(ty, key)? {
                routes.push(route_for(&attr, value)?);
            }
        }
        if routes.is_empty() {
            return Err(TypedGraphError::invalid_input(format!(
                "the given attribute '{key}' does not exist"
            )));
        }
        Ok(LookupPlan { kind, routes })
    }

    fn plan_scoped(
        &self,
        kind: ElementKind,
        key: &str,
        value: &PropertyValue,
        label: &str,
    ) -> Result<LookupPlan, TypedGraphError> {
        let info = self.catalog.find_type(label)?.ok_or_else(|| {
            TypedGraphError::invalid_input(format!("nonexistent {kind} label: {label}"))
        })?;
        if info.object_type != kind.object_type() {
            return Err(TypedGraphError::invalid_input(format!(
                "given label is not a {kind} label: {label}"
            )));
        }
        let attr = self.catalog.attribute(info.id, key)?.ok_or_else(|| {
            TypedGraphError::invalid_input(format!(
                "the given attribute '{key}' does not exist for the given {} label '{label}'",
                info.object_type.as_str()
            ))
        })?;
        Ok(LookupPlan {
            kind,
            routes: vec![route_for(&attr, value)?],
        })
    }

    /// Runs every route of `plan`, in order, against the engine.
    pub fn execute(&self, plan: &LookupPlan) -> Result<Vec<Source>, TypedGraphError> {
        let engine = self.catalog.engine();
        let session = self.catalog.session();
        let mut sources = Vec::with_capacity(plan.len());
        for route in plan.routes() {
            let source = match route {
                Route::TypeScan(ty) => {
                    Source::Objects(engine.select_type(session, *ty)?.into_vec())
                }
                Route::FilteredScan {
                    type_id,
                    attribute,
                    value,
                } => Source::Filtered {
                    objects: engine.select_type(session, *type_id)?.into_vec(),
                    attribute: *attribute,
                    value: value.clone(),
                },
                Route::IndexLookup {
                    attribute, value, ..
                } => Source::Objects(
                    engine
                        .select_value(session, *attribute, value)?
                        .into_vec(),
                ),
            };
            sources.push(source);
        }
        Ok(sources)
    }
}

fn route_for(attr: &AttributeInfo, value: &PropertyValue) -> Result<Route, TypedGraphError> {
    if attr.kind.is_indexed() {
        Ok(Route::IndexLookup {
            type_id: attr.type_id,
            attribute: attr.id,
            value: coerce(attr.data_type, value)?,
        })
    } else {
        Ok(Route::FilteredScan {
            type_id: attr.type_id,
            attribute: attr.id,
            value: value.clone(),
        })
    }
}
