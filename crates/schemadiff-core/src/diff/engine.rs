//! Schema diff computation engine.
//!
//! The entry point is [`SchemaDiffer::diff`], which takes two schema views
//! and produces a [`SchemaDiff`] holding every tied solution. Pipeline:
//! validate and build both graphs, pad and preprocess, search, reconstruct
//! edit lists. [`SchemaDiffer::diff_and_analyze`] also classifies the first
//! solution with a [`SchemaChangeAnalyzer`].

use crate::analysis::SchemaChangeAnalyzer;
use crate::config::{CancellationToken, DiffConfig};
use crate::core_types::RequestContext;
use crate::diff::model::{AnalyzedDiff, DiffIdentity, DiffOutcome, SchemaDiff};
use crate::edits::{reconstruct, IncompleteDiff, OptimalEdit};
use crate::errors::ExError;
use crate::ged::{isolate_vertices, search_mappings, CostModel, IsolatedVertices, SearchOutcome};
use crate::graph::{build_graph, GraphSide};
use crate::schema::SchemaView;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

const OP_DIFF: &str = "diff_schemas";

/// Configured diff runner
///
/// A differ holds no state between calls; one instance may serve any
/// number of diffs.
#[derive(Debug, Clone, Default)]
pub struct SchemaDiffer {
    config: DiffConfig,
    context: RequestContext,
    cancellation: Option<CancellationToken>,
}

impl SchemaDiffer {
    pub fn new(config: DiffConfig) -> Self {
        Self {
            config,
            context: RequestContext::new(),
            cancellation: None,
        }
    }

    /// Correlation ids attached to log events and errors
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Diff `old` against `new`
    ///
    /// # Errors
    ///
    /// - `InvalidInput`, `DuplicateDefinition`, `UnknownReference`: a schema
    ///   failed validation; nothing was built
    /// - `InvalidConfig`: the configuration was rejected
    /// - `InvariantViolation`, `CostMismatch`: internal defect; the diff was
    ///   aborted rather than returning a possibly wrong result
    ///
    /// Running out of search budget is not an error: the outcome is
    /// [`DiffOutcome::Incomplete`].
    pub fn diff<S, T>(&self, old: &S, new: &T) -> Result<SchemaDiff, ExError>
    where
        S: SchemaView + ?Sized,
        T: SchemaView + ?Sized,
    {
        let started = Instant::now();
        log_op_start!(OP_DIFF, request_id = %self.context.request_id);

        match self.compute(old, new) {
            Ok(diff) => {
                log_op_end!(
                    OP_DIFF,
                    duration_ms = started.elapsed().as_millis() as u64,
                    request_id = %self.context.request_id,
                    source_vertices = diff.identity.source_vertices as u64,
                    target_vertices = diff.identity.target_vertices as u64,
                    padded_size = diff.identity.padded_size as u64,
                    complete = diff.is_complete(),
                    cost = diff.cost(),
                    solutions = diff.solutions().len() as u64,
                    steps = diff.stats.steps,
                    forced = diff.stats.forced as u64,
                );
                Ok(diff)
            }
            Err(err) => {
                let err = self.attach_context(err);
                log_op_error!(
                    OP_DIFF,
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    request_id = %self.context.request_id,
                );
                Err(err)
            }
        }
    }

    fn compute<S, T>(&self, old: &S, new: &T) -> Result<SchemaDiff, ExError>
    where
        S: SchemaView + ?Sized,
        T: SchemaView + ?Sized,
    {
        self.config.validate()?;

        let source = build_graph(old, GraphSide::Source)
            .map_err(|e| in_op(e.into(), "build_graph").with_message_prefix("old schema"))?;
        let target = build_graph(new, GraphSide::Target)
            .map_err(|e| in_op(e.into(), "build_graph").with_message_prefix("new schema"))?;

        let iso = isolate_vertices(&source, &target, self.config.preprocess)
            .map_err(|e| in_op(e.into(), "isolate_vertices"))?;
        let search = search_mappings(&iso, &self.config, self.cancellation.as_ref())
            .map_err(|e| in_op(e.into(), "search_mappings"))?;

        let costs = CostModel::new(&iso.source, &iso.target)?;
        let outcome = match search.outcome {
            SearchOutcome::Complete {
                cost,
                mappings,
                ties_truncated,
            } => DiffOutcome::Optimal(OptimalEdit {
                cost,
                solutions: reconstruct(&costs, mappings)?,
                ties_truncated,
            }),
            SearchOutcome::Exhausted {
                best_cost,
                mappings,
                reason,
            } => DiffOutcome::Incomplete(IncompleteDiff {
                best_cost,
                solutions: reconstruct(&costs, mappings)?,
                reason,
                steps: search.stats.steps,
            }),
        };

        let identity = DiffIdentity {
            source_digest: source.content_digest(),
            target_digest: target.content_digest(),
            source_vertices: source.len(),
            target_vertices: target.len(),
            padded_size: iso.size(),
        };
        let IsolatedVertices {
            source: source_graph,
            target: target_graph,
            ..
        } = iso;

        Ok(SchemaDiff {
            identity,
            source_graph,
            target_graph,
            outcome,
            stats: search.stats,
        })
    }

    /// Diff, then classify the first solution's operations
    ///
    /// An incomplete diff is classified from its best-known solution; check
    /// [`SchemaDiff::is_complete`] before treating the changes as minimal.
    ///
    /// # Errors
    ///
    /// See [`SchemaDiffer::diff`].
    pub fn diff_and_analyze<S, T>(
        &self,
        old: &S,
        new: &T,
        analyzer: &dyn SchemaChangeAnalyzer,
    ) -> Result<AnalyzedDiff, ExError>
    where
        S: SchemaView,
        T: SchemaView,
    {
        let diff = self.diff(old, new)?;
        let changes = analyzer.analyze_edits(diff.primary_operations(), old, new);
        Ok(AnalyzedDiff { diff, changes })
    }

    fn attach_context(&self, err: ExError) -> ExError {
        let mut err = in_op(err, OP_DIFF).with_request_id(self.context.request_id.clone());
        if let Some(trace_id) = &self.context.trace_id {
            err = err.with_trace_id(trace_id.clone());
        }
        err
    }
}

/// Diff two schemas with a one-off [`SchemaDiffer`]
///
/// ```
/// use schemadiff_core::schema::{FieldDef, Schema, TypeDef};
/// use schemadiff_core::{diff_schemas, DiffConfig};
///
/// let old = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("bar", "String")));
/// let new = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("baz", "String")));
///
/// let diff = diff_schemas(&old, &new, &DiffConfig::default()).unwrap();
/// assert_eq!(diff.cost(), Some(1));
/// ```
///
/// # Errors
///
/// See [`SchemaDiffer::diff`].
pub fn diff_schemas<S, T>(old: &S, new: &T, config: &DiffConfig) -> Result<SchemaDiff, ExError>
where
    S: SchemaView + ?Sized,
    T: SchemaView + ?Sized,
{
    SchemaDiffer::new(config.clone()).diff(old, new)
}

fn in_op(err: ExError, op: &str) -> ExError {
    if err.op().is_some() {
        err
    } else {
        err.with_op(op)
    }
}
