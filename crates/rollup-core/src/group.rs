use crate::{
    definition::{AggregateOp, RollupDefinition},
    error::RollupError,
    filter::FilterExpr,
    model::{FieldKind, FieldRef, SchemaRegistry},
};
use std::collections::BTreeMap;

///
/// GroupKey
///
/// Composite grouping key: definitions sharing (parent entity, relationship
/// field, filter) differ only in which fields they aggregate and collapse
/// into one context, so the engine runs one filtered child-set query per
/// group rather than one per definition.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct GroupKey {
    pub parent_entity: String,
    pub relationship_field: String,
    pub filter: Option<FilterExpr>,
}

///
/// FieldMapping
/// One (target field, source field, operation) triple inside a context.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMapping {
    /// Parent field receiving the aggregate.
    pub target_field: FieldRef,
    /// Child field being aggregated.
    pub source_field: FieldRef,
    pub op: AggregateOp,
}

///
/// AggregationContext
///
/// One grouped aggregation computation: resolved entity/field handles plus
/// the ordered mappings sharing the grouping key. Created once per distinct
/// key per invocation and never outlives the orchestration call.
///

#[derive(Clone, Debug)]
pub struct AggregationContext {
    pub parent_entity: String,
    pub child_entity: String,
    pub relationship_field: FieldRef,
    pub filter: Option<FilterExpr>,
    /// Ordered mappings; merge scoping relies on this being exactly the
    /// set of fields this context computes.
    pub mappings: Vec<FieldMapping>,
}

impl AggregationContext {
    /// Target-field names this context computes, in mapping order.
    pub fn target_field_names(&self) -> impl Iterator<Item = &str> {
        self.mappings
            .iter()
            .map(|mapping| mapping.target_field.name.as_str())
    }
}

///
/// ContextGrouper
///
/// Partitions rollup definitions into aggregation contexts. Accumulates
/// into maps scoped to one call and hands the finished, insertion-ordered
/// context list to the pipeline as an immutable view.
///

pub struct ContextGrouper<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> ContextGrouper<'a> {
    #[must_use]
    pub const fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Group definitions for one child entity into aggregation contexts.
    ///
    /// Every definition is fully resolved before any context is returned;
    /// a single unresolvable reference fails the whole call so no engine
    /// work starts on a misconfigured definition set.
    pub fn group(
        &self,
        definitions: &[RollupDefinition],
        child_entity: &str,
    ) -> Result<Vec<AggregationContext>, RollupError> {
        let child = self.registry.child_entity(child_entity)?;

        let mut contexts: Vec<AggregationContext> = Vec::new();
        let mut by_key: BTreeMap<GroupKey, usize> = BTreeMap::new();

        for definition in definitions {
            let parent = self.registry.parent_entity(&definition.parent_entity)?;

            let relationship_field = resolve_relationship_field(
                child,
                &definition.relationship_field,
                &definition.parent_entity,
            )?;
            let source_field = child
                .field(&definition.aggregated_field)
                .map(FieldRef::from)
                .ok_or_else(|| {
                    RollupError::invalid_definition(&child.entity_name, &definition.aggregated_field)
                })?;
            let target_field = parent
                .field(&definition.target_field)
                .map(FieldRef::from)
                .ok_or_else(|| {
                    RollupError::invalid_definition(&parent.entity_name, &definition.target_field)
                })?;
            let op = AggregateOp::parse(&definition.operation_code)?;

            // Numeric operations require a numeric source field; rejecting
            // here keeps type failures out of the engine's hot path.
            if matches!(op, AggregateOp::Sum | AggregateOp::Avg)
                && !source_field.kind.supports_numeric_aggregation()
            {
                return Err(RollupError::invalid_definition(
                    &child.entity_name,
                    &definition.aggregated_field,
                ));
            }

            let mapping = FieldMapping {
                target_field,
                source_field,
                op,
            };

            let key = GroupKey {
                parent_entity: definition.parent_entity.clone(),
                relationship_field: definition.relationship_field.clone(),
                filter: definition.relationship_filter.clone(),
            };

            if let Some(&index) = by_key.get(&key) {
                contexts[index].mappings.push(mapping);
            } else {
                by_key.insert(key, contexts.len());
                contexts.push(AggregationContext {
                    parent_entity: definition.parent_entity.clone(),
                    child_entity: child.entity_name.clone(),
                    relationship_field,
                    filter: definition.relationship_filter.clone(),
                    mappings: vec![mapping],
                });
            }
        }

        Ok(contexts)
    }
}

// A declared relation must point at the definition's parent entity; a
// mismatched target is the same configuration error as a missing field.
fn resolve_relationship_field(
    child: &crate::model::EntityModel,
    name: &str,
    parent_entity: &str,
) -> Result<FieldRef, RollupError> {
    let field = child
        .field(name)
        .ok_or_else(|| RollupError::invalid_definition(&child.entity_name, name))?;

    if let FieldKind::Relation { target } = &field.kind
        && target != parent_entity
    {
        return Err(RollupError::invalid_definition(&child.entity_name, name));
    }

    Ok(FieldRef::from(field))
}

///
/// TESTS
///
