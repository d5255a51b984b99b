//! Human-readable summary renderer for schema diffs.

use crate::diff::model::{DiffOutcome, SchemaDiff};
use crate::edits::EditOperation;
use crate::ged::StopReason;

/// Render a Markdown summary of a [`SchemaDiff`].
///
/// Shows the first solution's operations only; further tied solutions are
/// counted, not listed. Informational only.
pub fn render_human_summary(diff: &SchemaDiff) -> String {
    let mut out = String::new();

    out.push_str("## Schema Diff\n\n");

    let (status, cost) = match &diff.outcome {
        DiffOutcome::Optimal(optimal) => ("Optimal".to_string(), optimal.cost.to_string()),
        DiffOutcome::Incomplete(incomplete) => (
            format!("Incomplete ({})", reason_label(incomplete.reason)),
            match incomplete.best_cost {
                Some(c) => format!("<= {}", c),
                None => "unknown".to_string(),
            },
        ),
    };
    out.push_str(&format!("**Status**: {status}  \n**Cost**: {cost}\n\n"));

    out.push_str("### Identity\n\n");
    out.push_str(&format!(
        "| | Graph Digest | Vertices |\n\
         |---|---|---|\n\
         | Old | `{}` | {} |\n\
         | New | `{}` | {} |\n\n",
        short(&diff.identity.source_digest),
        diff.identity.source_vertices,
        short(&diff.identity.target_digest),
        diff.identity.target_vertices,
    ));

    if diff.is_identical() {
        out.push_str("_No structural changes detected._\n");
        return out;
    }

    let (solutions, truncated) = match &diff.outcome {
        DiffOutcome::Optimal(optimal) => (optimal.solutions.len(), optimal.ties_truncated),
        DiffOutcome::Incomplete(incomplete) => (incomplete.solutions.len(), false),
    };

    if solutions == 0 {
        out.push_str("_No complete mapping was reached before the search stopped._\n\n");
    } else {
        out.push_str("### Edit Operations\n\n");
        let operations = diff.primary_operations();
        push_group(&mut out, "Vertices", operations.iter().filter(|op| op.is_vertex_operation()));
        push_group(&mut out, "Edges", operations.iter().filter(|op| !op.is_vertex_operation()));
        if solutions > 1 {
            out.push_str(&format!(
                "_{} further solution(s) tie at the same cost._\n",
                solutions - 1
            ));
        }
        if truncated {
            out.push_str("_Tie set truncated at the configured limit._\n");
        }
        out.push('\n');
    }

    let stats = &diff.stats;
    out.push_str("### Search\n\n");
    out.push_str(&format!(
        "- **Padded size**: {}\n\
         - **Forced assignments**: {}\n\
         - **Steps**: {}\n\
         - **Pruned**: {}\n\
         - **Leaves**: {}\n\
         - **Elapsed**: {} ms\n",
        diff.identity.padded_size,
        stats.forced,
        stats.steps,
        stats.pruned,
        stats.leaves,
        stats.elapsed_ms,
    ));

    out
}

fn push_group<'a>(out: &mut String, title: &str, ops: impl Iterator<Item = &'a EditOperation>) {
    let lines: Vec<String> = ops.map(|op| format!("- {}\n", op.description())).collect();
    if lines.is_empty() {
        return;
    }
    out.push_str(&format!("**{}** ({})\n\n", title, lines.len()));
    for line in lines {
        out.push_str(&line);
    }
    out.push('\n');
}

fn reason_label(reason: StopReason) -> &'static str {
    match reason {
        StopReason::StepLimit => "step limit",
        StopReason::TimeLimit => "time limit",
        StopReason::Cancelled => "cancelled",
    }
}

/// First 12 hex characters of a digest
fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
