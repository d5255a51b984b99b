//! Schema diff walkthrough
//!
//! Demonstrates:
//! - Loading schema snapshots from JSON
//! - Computing the minimum-cost edit between them
//! - Tied optimal solutions
//! - Classifying edits into schema changes
//! - Running under a search budget
//! - Markdown summaries

use schemadiff_core::logging_facility::{init, Profile};
use schemadiff_core::schema::Schema;
use schemadiff_core::{
    diff_schemas, render_human_summary, DiffConfig, SchemaDiffer, SearchBudget,
    StructuralChangeAnalyzer,
};

const OLD_SCHEMA: &str = r#"{
  "types": [
    { "name": "Query", "kind": "OBJECT", "fields": [
      { "name": "book", "type": "Book", "arguments": [ { "name": "id", "type": "ID" } ] },
      { "name": "books", "type": "[Book!]!" }
    ] },
    { "name": "Book", "kind": "OBJECT", "fields": [
      { "name": "id", "type": "ID!" },
      { "name": "title", "type": "String!" },
      { "name": "writer", "type": "String" }
    ] },
    { "name": "Genre", "kind": "ENUM", "enum_values": [ { "name": "FICTION" }, { "name": "SCIENCE" } ] }
  ]
}"#;

const NEW_SCHEMA: &str = r#"{
  "types": [
    { "name": "Query", "kind": "OBJECT", "fields": [
      { "name": "book", "type": "Book", "arguments": [ { "name": "id", "type": "ID!" } ] },
      { "name": "books", "type": "[Book!]!" }
    ] },
    { "name": "Book", "kind": "OBJECT", "fields": [
      { "name": "id", "type": "ID!" },
      { "name": "title", "type": "String!" },
      { "name": "author", "type": "String" },
      { "name": "genre", "type": "Genre" }
    ] },
    { "name": "Genre", "kind": "ENUM", "enum_values": [ { "name": "FICTION" }, { "name": "SCIENCE" }, { "name": "HISTORY" } ] }
  ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  schemadiff - Structural Schema Diff Demo               ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    // ═══════════════════════════════════════════════════════════
    // SECTION 1: Load snapshots
    // ═══════════════════════════════════════════════════════════
    println!("📦 SECTION 1: Loading schema snapshots\n");

    let old: Schema = serde_json::from_str(OLD_SCHEMA)?;
    let new: Schema = serde_json::from_str(NEW_SCHEMA)?;
    println!("✓ Old schema: {} types", old.types.len());
    println!("✓ New schema: {} types", new.types.len());
    println!();

    // ═══════════════════════════════════════════════════════════
    // SECTION 2: Exact diff
    // ═══════════════════════════════════════════════════════════
    println!("🔍 SECTION 2: Minimum-cost edit\n");

    let diff = diff_schemas(&old, &new, &DiffConfig::default())?;
    if let Some(optimal) = diff.optimal() {
        println!("✓ Proven optimal cost: {}", optimal.cost);
        println!("  Tied solutions: {}", optimal.solutions.len());
        for op in diff.primary_operations() {
            println!("  - {}", op.description());
        }
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // SECTION 3: Change classification
    // ═══════════════════════════════════════════════════════════
    println!("🏷  SECTION 3: Schema changes\n");

    let analyzed = SchemaDiffer::default().diff_and_analyze(&old, &new, &StructuralChangeAnalyzer)?;
    for change in &analyzed.changes {
        println!("  {:?}: {}", change.kind, change.description);
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // SECTION 4: Budgeted search
    // ═══════════════════════════════════════════════════════════
    println!("⏱  SECTION 4: Search under a step budget\n");

    let config = DiffConfig::default()
        .with_preprocess(false)
        .with_budget(SearchBudget::steps(10));
    let budgeted = SchemaDiffer::new(config).diff(&old, &new)?;
    match budgeted.incomplete() {
        Some(incomplete) => println!(
            "✓ Stopped early ({:?}) after {} steps, best cost so far: {:?}",
            incomplete.reason, incomplete.steps, incomplete.best_cost
        ),
        None => println!("✓ Finished within budget at cost {:?}", budgeted.cost()),
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // SECTION 5: Summary
    // ═══════════════════════════════════════════════════════════
    println!("📄 SECTION 5: Markdown summary\n");
    println!("{}", render_human_summary(&diff));

    Ok(())
}
