use crate::{
    definition::DefinitionSource,
    detect,
    engine::AggregateEngine,
    error::RollupError,
    group::ContextGrouper,
    merge::ResultMerger,
    model::SchemaRegistry,
    obs::{MetricsSink, RollupEvent},
    record::{ChangeBatch, ChangeOp, ChangePhase, Record},
};

///
/// Rollup
///
/// Entry point wiring definition lookup, change detection, grouping, the
/// aggregation engine, and merging into one synchronous pipeline. Borrows
/// every collaborator; the transient context and result maps live inside
/// one call and never escape it. The caller persists the returned parents.
///

pub struct Rollup<'a, S, E> {
    registry: &'a SchemaRegistry,
    source: &'a S,
    engine: &'a E,
    sink: Option<&'a dyn MetricsSink>,
}

impl<'a, S, E> Rollup<'a, S, E>
where
    S: DefinitionSource,
    E: AggregateEngine,
{
    #[must_use]
    pub const fn new(registry: &'a SchemaRegistry, source: &'a S, engine: &'a E) -> Self {
        Self {
            registry,
            source,
            engine,
            sink: None,
        }
    }

    /// Attach an optional metrics sink; must not affect execution semantics.
    #[must_use]
    pub const fn with_sink(mut self, sink: &'a dyn MetricsSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// React to one change-event batch.
    ///
    /// No-op during the before phase. Deletes aggregate over the prior
    /// versions, everything else over the new versions. Updates run change
    /// detection first; a batch where no aggregated field changed value is
    /// a short-circuit success, not an error.
    pub fn rollup_on_change(&self, batch: &ChangeBatch) -> Result<Vec<Record>, RollupError> {
        if batch.phase == ChangePhase::Before {
            return Ok(Vec::new());
        }

        let rows = batch.effective_rows();
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let definitions = self.source.definitions_for(&batch.entity)?;
        if definitions.is_empty() {
            return Ok(Vec::new());
        }

        let total = definitions.len();
        let definitions = if batch.op == ChangeOp::Update {
            detect::affected_definitions(definitions, batch)
        } else {
            definitions
        };
        if definitions.is_empty() {
            self.emit(RollupEvent::DetectorSuppressed {
                entity: &batch.entity,
                definitions: total as u64,
            });
            return Ok(Vec::new());
        }

        self.run_pipeline(&batch.entity, &definitions, &rows)
    }

    /// Full recompute over an explicit child record list, bypassing change
    /// detection.
    pub fn rollup_explicit(
        &self,
        child_entity: &str,
        rows: &[Record],
    ) -> Result<Vec<Record>, RollupError> {
        let definitions = self.source.definitions_for(child_entity)?;
        if definitions.is_empty() || rows.is_empty() {
            return Ok(Vec::new());
        }

        let borrowed: Vec<&Record> = rows.iter().collect();
        self.run_pipeline(child_entity, &definitions, &borrowed)
    }

    // Grouper -> per-context engine -> merger. Fails whole, never partial:
    // any error surfaces before a merged result set is exposed.
    fn run_pipeline(
        &self,
        child_entity: &str,
        definitions: &[crate::definition::RollupDefinition],
        rows: &[&Record],
    ) -> Result<Vec<Record>, RollupError> {
        self.emit(RollupEvent::InvocationStart {
            entity: child_entity,
            rows: rows.len() as u64,
        });

        let result = self.compute_merged(child_entity, definitions, rows);
        match &result {
            Ok(parents) => self.emit(RollupEvent::InvocationFinish {
                entity: child_entity,
                parents: parents.len() as u64,
            }),
            Err(_) => self.emit(RollupEvent::InvocationError {
                entity: child_entity,
            }),
        }

        result
    }

    fn compute_merged(
        &self,
        child_entity: &str,
        definitions: &[crate::definition::RollupDefinition],
        rows: &[&Record],
    ) -> Result<Vec<Record>, RollupError> {
        let contexts = ContextGrouper::new(self.registry).group(definitions, child_entity)?;
        self.emit(RollupEvent::ContextsBuilt {
            entity: child_entity,
            contexts: contexts.len() as u64,
        });

        let mut merger = ResultMerger::new();
        for context in &contexts {
            let results = self.engine.compute(context, rows)?;
            merger.absorb(context, results);
        }

        Ok(merger.into_records())
    }

    fn emit(&self, event: RollupEvent<'_>) {
        if let Some(sink) = self.sink {
            sink.on_event(event);
        }
    }
}

///
/// TESTS
///
