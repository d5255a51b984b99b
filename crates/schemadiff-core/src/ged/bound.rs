//! Admissible lower bound on the cost of completing a partial mapping.
//!
//! Each unassigned source vertex is priced against each free target as if
//! it were assigned next (vertex cost plus edges to already assigned
//! vertices); edges between two unassigned vertices are ignored. The
//! cheapest perfect matching of that matrix never exceeds the true
//! completion cost. Vertices only match within their compatibility class,
//! so the matching is solved class by class.

use crate::ged::cost::CostModel;
use crate::ged::isolation::{CompatibilityClass, IsolatedVertices};
use crate::ged::mapping::Mapping;
use std::collections::BTreeMap;

/// Cost of a pair outside the possible-mapping relation
const FORBIDDEN: i64 = 1_000_000_000;

/// Lower bound for assigning `open` given `partial`, or `None` if no
/// admissible completion exists
pub fn lower_bound(
    costs: &CostModel<'_>,
    iso: &IsolatedVertices,
    partial: &Mapping,
    open: &[u32],
) -> Option<u64> {
    let mut groups: BTreeMap<CompatibilityClass, (Vec<u32>, Vec<u32>)> = BTreeMap::new();
    for &u in open {
        groups.entry(iso.source_classes[u as usize]).or_default().0.push(u);
    }
    for v in 0..iso.size() as u32 {
        if !partial.is_target_used(v) {
            groups.entry(iso.target_classes[v as usize]).or_default().1.push(v);
        }
    }

    let mut total: u64 = 0;
    for (sources, targets) in groups.values() {
        if sources.len() != targets.len() {
            return None;
        }
        if sources.is_empty() {
            continue;
        }
        let matrix: Vec<Vec<i64>> = sources
            .iter()
            .map(|&u| {
                let possible = &iso.possible[u as usize];
                targets
                    .iter()
                    .map(|&v| {
                        if possible.binary_search(&v).is_ok() {
                            costs.incremental_cost(partial, u, v) as i64
                        } else {
                            FORBIDDEN
                        }
                    })
                    .collect()
            })
            .collect();
        let cost = min_cost_assignment(&matrix);
        if cost >= FORBIDDEN {
            return None;
        }
        total += cost as u64;
    }
    Some(total)
}

/// Hungarian algorithm with potentials on a square matrix, O(n³)
pub fn min_cost_assignment(matrix: &[Vec<i64>]) -> i64 {
    let n = matrix.len();
    if n == 0 {
        return 0;
    }
    // 1-based; column 0 is the virtual start column
    let mut row_pot = vec![0i64; n + 1];
    let mut col_pot = vec![0i64; n + 1];
    let mut row_of_col = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        row_of_col[0] = row;
        let mut col0 = 0usize;
        let mut min_slack = vec![i64::MAX; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[col0] = true;
            let row0 = row_of_col[col0];
            let mut delta = i64::MAX;
            let mut col1 = 0usize;
            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let slack = matrix[row0 - 1][col - 1] - row_pot[row0] - col_pot[col];
                if slack < min_slack[col] {
                    min_slack[col] = slack;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }
            for col in 0..=n {
                if used[col] {
                    row_pot[row_of_col[col]] += delta;
                    col_pot[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }
            col0 = col1;
            if row_of_col[col0] == 0 {
                break;
            }
        }
        loop {
            let col1 = way[col0];
            row_of_col[col0] = row_of_col[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    (1..=n)
        .map(|col| matrix[row_of_col[col] - 1][col - 1])
        .sum()
}
