//! Tabular Report: Shape-Dispatched Collections End to End
//!
//! Run with: cargo run -p shaped-variants --example tabular_report
//! Set RUST_LOG=debug to watch the factory's dispatch decisions.
//!
//! This example demonstrates:
//! - How `collect` picks a variant from the shape of its input
//! - Column statistics on a table, by operation and by name
//! - Recursive search through nested data
//! - Validation errors from constrained variants

use shaped_variants::{
    array, collect, CollectionError, ColumnOp, Factory, KeyFilter, NumericSeries, Object,
    ObjectSet, Value,
};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), CollectionError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    println!("=== Tabular Report ===\n");

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------
    println!("1. Dispatch");
    println!("-----------");

    let inputs = [
        array![10, 20, 30, 100, 60, 80],
        Value::from("hello"),
        array![1, array![2, array![3]]],
        Value::from(vec![Object::new("User")]),
        array!["mixed", 1, true],
    ];
    for input in inputs {
        let coll = collect(input.clone())?;
        println!("{:<24} -> {}", input.to_string(), coll.kind());
    }
    println!();

    // -------------------------------------------------------------------------
    // Column Statistics
    // -------------------------------------------------------------------------
    println!("2. Column Statistics");
    println!("--------------------");

    let sales = collect(array![
        array!["region" => "north", "units" => 10, "price" => 2.5],
        array!["region" => "south", "units" => 17, "price" => 3.0],
        array!["region" => "east", "units" => 15, "price" => 2.5],
        array!["region" => "west", "units" => 15, "price" => 4.0],
    ])?;
    let table = sales
        .as_tabular()
        .ok_or_else(|| CollectionError::InvalidOperation {
            reason: format!("expected a table, got {}", sales.kind()),
        })?;

    println!("Columns: {}", table.columns());
    for op in [ColumnOp::Sum, ColumnOp::Average, ColumnOp::Median, ColumnOp::Mode] {
        println!("{:>8}(units) = {}", op, table.delegate(op, "units")?);
    }
    println!("  counts(price) = {}", table.call("counts", "price")?);
    println!("  unique(region) = {}", table.call("unique", "region")?);
    match table.call("sum", "region") {
        Ok(v) => println!("  sum(region) = {}", v),
        Err(e) => println!("  sum(region) failed: {}", e),
    }
    println!();

    // -------------------------------------------------------------------------
    // Recursive Search
    // -------------------------------------------------------------------------
    println!("3. Recursive Search");
    println!("-------------------");

    let tree = Factory::from_json(
        r#"{"name": "root", "children": [{"name": "left"}, {"name": "right"}]}"#,
    )?;
    println!("tree kind: {}", tree.kind());
    println!("contains \"right\":            {}", tree.contains("right", KeyFilter::Any));
    println!("contains \"right\" at \"name\":  {}", tree.contains("right", "name"));
    println!(
        "flat contains \"right\":       {}",
        tree.as_collection().contains("right", KeyFilter::Any)
    );
    println!();

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------
    println!("4. Validation");
    println!("-------------");

    let series = NumericSeries::new(array![1, 2, 3])?;
    if let Err(e) = series.append("four") {
        println!("numeric append rejected: {}", e);
    }
    let users = ObjectSet::with_type(Value::from(vec![Object::new("User")]), "User")?;
    if let Err(e) = users.append(Object::new("Droid")) {
        println!("object append rejected:  {}", e);
    }
    println!("series after increment:   {}", series.increment(0, 41).as_collection());

    Ok(())
}
