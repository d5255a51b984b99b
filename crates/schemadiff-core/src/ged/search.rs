//! Branch-and-bound search over admissible bijections.
//!
//! Open source vertices are assigned most-constrained-first on an explicit
//! frame stack, one frame per depth. Each frame tries its candidates in
//! ascending incremental cost; a branch survives only while its accumulated
//! cost plus the matching lower bound can still reach or tie the best
//! complete mapping. Every leaf is re-priced by the exact cost model.
//!
//! Placeholders of one class are interchangeable, so they are only tried in
//! canonical order: a source vertex takes at most the lowest free target
//! placeholder of its class, and source placeholders of one class take
//! increasing target indices. Ties are complete up to placeholder renaming.

use crate::config::{CancellationToken, DiffConfig};
use crate::errors::{Result, SchemaDiffError};
use crate::ged::bound::lower_bound;
use crate::ged::cost::CostModel;
use crate::ged::isolation::IsolatedVertices;
use crate::ged::mapping::Mapping;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Wall clock is polled once per this many steps
const CLOCK_POLL_INTERVAL: u64 = 64;

/// Why a search stopped before proving optimality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    StepLimit,
    TimeLimit,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Candidate assignments tried
    pub steps: u64,
    /// Branches cut by the bound or the tie cap
    pub pruned: u64,
    /// Complete mappings priced
    pub leaves: u64,
    /// Assignments fixed by preprocessing
    pub forced: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Search tree exhausted: `cost` is the proven minimum
    Complete {
        cost: u64,
        mappings: Vec<Mapping>,
        /// A configured tie cap was hit and further ties were not explored
        ties_truncated: bool,
    },
    /// Budget ran out; `mappings` share the best cost seen so far, unproven
    Exhausted {
        best_cost: Option<u64>,
        mappings: Vec<Mapping>,
        reason: StopReason,
    },
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

struct Frame {
    depth: usize,
    /// `(incremental cost, target)`, ascending
    candidates: Vec<(u64, u32)>,
    cursor: usize,
    base_cost: u64,
}

/// Find every minimum-cost total mapping extending `iso.fixed`
///
/// # Errors
///
/// `CostMismatch` if a leaf's exact cost disagrees with the accumulated
/// incremental cost; mapping invariant violations.
pub fn search_mappings(
    iso: &IsolatedVertices,
    config: &DiffConfig,
    cancellation: Option<&CancellationToken>,
) -> Result<SearchResult> {
    let started = Instant::now();
    let costs = CostModel::new(&iso.source, &iso.target)?;
    let size = iso.size();

    let mut mapping = Mapping::new(size);
    let mut fixed_cost = 0;
    for (u, v) in iso.fixed.pairs() {
        fixed_cost += costs.incremental_cost(&mapping, u, v);
        mapping.insert(u, v)?;
    }

    let mut order: Vec<u32> = iso.open_vertices().collect();
    order.sort_by_key(|&u| (iso.possible[u as usize].len(), u));

    let mut stats = SearchStats {
        forced: iso.forced,
        ..SearchStats::default()
    };

    if order.is_empty() {
        let exact = costs.mapping_cost(&mapping)?;
        if exact != fixed_cost {
            return Err(SchemaDiffError::CostMismatch {
                accumulated: fixed_cost,
                exact,
            });
        }
        stats.leaves = 1;
        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        return Ok(SearchResult {
            outcome: SearchOutcome::Complete {
                cost: exact,
                mappings: vec![mapping],
                ties_truncated: false,
            },
            stats,
        });
    }

    let search = Search {
        iso,
        costs,
        prev_placeholder_depth: placeholder_chain(iso, &order),
        order,
        config,
        cancellation,
        started,
    };
    search.run(mapping, fixed_cost, stats)
}

/// For each depth holding a source placeholder, the depth of the previous
/// placeholder of the same class
fn placeholder_chain(iso: &IsolatedVertices, order: &[u32]) -> Vec<Option<usize>> {
    let mut chain = vec![None; order.len()];
    for (depth, &u) in order.iter().enumerate() {
        if !iso.source.vertex(u).is_isolated() {
            continue;
        }
        let class = iso.source_classes[u as usize];
        chain[depth] = (0..depth).rev().find(|&d| {
            let w = order[d];
            iso.source.vertex(w).is_isolated() && iso.source_classes[w as usize] == class
        });
    }
    chain
}

struct Search<'a> {
    iso: &'a IsolatedVertices,
    costs: CostModel<'a>,
    order: Vec<u32>,
    prev_placeholder_depth: Vec<Option<usize>>,
    config: &'a DiffConfig,
    cancellation: Option<&'a CancellationToken>,
    started: Instant,
}

impl Search<'_> {
    fn run(&self, mut mapping: Mapping, fixed_cost: u64, mut stats: SearchStats) -> Result<SearchResult> {
        let max_ties = self.config.max_tied_solutions.unwrap_or(usize::MAX).max(1);
        let mut best: Option<u64> = None;
        let mut solutions: Vec<Mapping> = Vec::new();
        let mut ties_truncated = false;

        let mut stack = vec![Frame {
            depth: 0,
            candidates: self.candidates(0, &mapping),
            cursor: 0,
            base_cost: fixed_cost,
        }];

        while let Some(frame) = stack.last_mut() {
            let depth = frame.depth;
            let u = self.order[depth];
            mapping.remove(u);

            let Some(&(incremental, v)) = frame.candidates.get(frame.cursor) else {
                stack.pop();
                continue;
            };
            frame.cursor += 1;
            let cost = frame.base_cost + incremental;

            stats.steps += 1;
            if let Some(reason) = self.stop_reason(stats.steps) {
                stats.elapsed_ms = self.started.elapsed().as_millis() as u64;
                debug!(steps = stats.steps, reason = ?reason, "search budget exhausted");
                return Ok(SearchResult {
                    outcome: SearchOutcome::Exhausted {
                        best_cost: best,
                        mappings: solutions,
                        reason,
                    },
                    stats,
                });
            }

            // Candidates are sorted, so the rest of the frame is no cheaper.
            match admit(best, cost, solutions.len(), max_ties) {
                Admit::Yes => {}
                verdict => {
                    stats.pruned += (frame.candidates.len() - frame.cursor + 1) as u64;
                    frame.cursor = frame.candidates.len();
                    ties_truncated |= verdict == Admit::TieCapReached;
                    continue;
                }
            }

            mapping.insert(u, v)?;

            if depth + 1 == self.order.len() {
                stats.leaves += 1;
                let exact = self.costs.mapping_cost(&mapping)?;
                if exact != cost {
                    return Err(SchemaDiffError::CostMismatch {
                        accumulated: cost,
                        exact,
                    });
                }
                if best.map_or(true, |b| exact < b) {
                    best = Some(exact);
                    solutions.clear();
                    ties_truncated = false;
                }
                if solutions.len() < max_ties {
                    solutions.push(mapping.clone());
                }
                continue;
            }

            let bound = lower_bound(&self.costs, self.iso, &mapping, &self.order[depth + 1..]);
            let verdict = match bound {
                Some(bound) => admit(best, cost + bound, solutions.len(), max_ties),
                None => Admit::No,
            };
            if verdict != Admit::Yes {
                stats.pruned += 1;
                ties_truncated |= verdict == Admit::TieCapReached;
                continue;
            }

            stack.push(Frame {
                depth: depth + 1,
                candidates: self.candidates(depth + 1, &mapping),
                cursor: 0,
                base_cost: cost,
            });
        }

        stats.elapsed_ms = self.started.elapsed().as_millis() as u64;
        let cost = best.ok_or_else(|| SchemaDiffError::Internal {
            message: "search exhausted without reaching a complete mapping".to_string(),
        })?;
        debug!(
            cost,
            steps = stats.steps,
            leaves = stats.leaves,
            pruned = stats.pruned,
            solutions = solutions.len(),
            "search complete"
        );
        Ok(SearchResult {
            outcome: SearchOutcome::Complete {
                cost,
                mappings: solutions,
                ties_truncated,
            },
            stats,
        })
    }

    fn candidates(&self, depth: usize, mapping: &Mapping) -> Vec<(u64, u32)> {
        let u = self.order[depth];
        let floor = self.prev_placeholder_depth[depth].and_then(|d| mapping.get(self.order[d]));
        let mut placeholder_offered = false;
        let mut candidates = Vec::new();
        for &v in &self.iso.possible[u as usize] {
            if mapping.is_target_used(v) || floor.is_some_and(|f| v <= f) {
                continue;
            }
            if self.iso.target.vertex(v).is_isolated() {
                if placeholder_offered {
                    continue;
                }
                placeholder_offered = true;
            }
            candidates.push((self.costs.incremental_cost(mapping, u, v), v));
        }
        candidates.sort_unstable();
        candidates
    }

    fn stop_reason(&self, steps: u64) -> Option<StopReason> {
        let budget = &self.config.budget;
        if budget.max_steps.is_some_and(|max| steps > max) {
            return Some(StopReason::StepLimit);
        }
        if self.cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Some(StopReason::Cancelled);
        }
        if (steps - 1) % CLOCK_POLL_INTERVAL == 0 {
            if let Some(limit) = budget.time_limit_ms {
                if self.started.elapsed().as_millis() >= u128::from(limit) {
                    return Some(StopReason::TimeLimit);
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admit {
    Yes,
    No,
    TieCapReached,
}

fn admit(best: Option<u64>, cost: u64, retained: usize, max_ties: usize) -> Admit {
    match best {
        None => Admit::Yes,
        Some(b) if cost < b => Admit::Yes,
        Some(b) if cost == b && retained < max_ties => Admit::Yes,
        Some(b) if cost == b => Admit::TieCapReached,
        Some(_) => Admit::No,
    }
}
