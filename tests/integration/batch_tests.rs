//! Folder conversion tests
//!
//! These run `convert_directory` against temporary folders and check the `.tf`
//! files written next to each input.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use snowflake_tf::batch::{convert_directory, convert_file, find_sql_files, FileOutcome};
use snowflake_tf::{ConvertError, ConvertOptions};

use crate::common::{relative_paths, TestContext};

// ============================================================================
// Folder Conversion
// ============================================================================

#[test]
fn test_fixture_folder_conversion() {
    let ctx = TestContext::with_fixture("sales_schema.sql");

    let reports = convert_directory(&ctx.dir, "sql", &ConvertOptions::default()).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_success());

    let FileOutcome::Converted {
        output,
        objects,
        resources,
        diagnostics,
    } = &reports[0].outcome
    else {
        panic!("expected a converted file, got {:?}", reports[0].outcome);
    };
    assert_eq!(output, &ctx.dir.join("sales_schema.tf"));
    assert_eq!(*objects, 5);
    assert_eq!(*resources, 8);
    assert!(diagnostics.is_empty());

    let written = ctx.read_file("sales_schema.tf");
    let in_memory = convert_file(&ctx.dir.join("sales_schema.sql"), &ConvertOptions::default())
        .unwrap();
    assert_eq!(written, in_memory.output);
    assert!(written.starts_with("resource \"snowflake_table\" \"SALES_CUSTOMERS\" {\n"));
}

#[test]
fn test_nested_folders_write_beside_inputs() {
    let ctx = TestContext::new();
    ctx.write_file("raw/events.sql", "CREATE TABLE RAW.events (id INT);");
    ctx.write_file("reporting/views/daily.SQL", "CREATE VIEW RAW.daily AS SELECT * FROM events;");
    ctx.write_file("README.md", "not sql");

    let reports = convert_directory(&ctx.dir, ".sql", &ConvertOptions::default()).unwrap();
    let inputs: Vec<PathBuf> = reports.iter().map(|r| r.input.clone()).collect();
    assert_eq!(
        relative_paths(&ctx.dir, &inputs),
        vec![
            PathBuf::from("raw").join("events.sql"),
            PathBuf::from("reporting").join("views").join("daily.SQL"),
        ]
    );

    assert!(ctx.exists("raw/events.tf"));
    assert!(ctx.exists("reporting/views/daily.tf"));
    assert!(!ctx.exists("README.tf"));

    // Each file is converted on its own, so the view infers its table dependency
    let daily = ctx.read_file("reporting/views/daily.tf");
    assert!(daily.contains("  depends_on = [snowflake_table.RAW_EVENTS]\n"));
}

#[test]
fn test_parallel_conversion_keeps_file_order() {
    let ctx = TestContext::new();
    for i in 0..12 {
        ctx.write_file(
            &format!("t{:02}.sql", i),
            format!("CREATE TABLE t{:02} (id INT);", i),
        );
    }

    let reports = convert_directory(&ctx.dir, "sql", &ConvertOptions::default()).unwrap();
    assert_eq!(reports.len(), 12);
    assert!(reports.iter().all(|r| r.is_success()));
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.input, ctx.dir.join(format!("t{:02}.sql", i)));
    }
    assert_eq!(
        ctx.read_file("t07.tf"),
        "resource \"snowflake_table\" \"T07\" {\n  name = \"t07\"\n\n  column {\n    name = \"id\"\n    type = \"NUMBER(38,0)\"\n  }\n}\n"
    );
}

#[test]
fn test_windows_1252_input() {
    let ctx = TestContext::new();
    ctx.write_file(
        "legacy.sql",
        b"CREATE TABLE t (id INT) COMMENT = 'Caf\xE9 orders';".as_slice(),
    );

    let reports = convert_directory(&ctx.dir, "sql", &ConvertOptions::default()).unwrap();
    assert!(reports[0].is_success());
    assert!(ctx.read_file("legacy.tf").contains("  comment = \"Café orders\"\n"));
}

#[test]
fn test_diagnostics_reported_per_file() {
    let ctx = TestContext::new();
    ctx.write_file("good.sql", "CREATE TABLE a (id INT);");
    ctx.write_file("partial.sql", "CREATE TABLE b (id INT);\nCREATE TABLE broken;");

    let reports = convert_directory(&ctx.dir, "sql", &ConvertOptions::default()).unwrap();
    let counts: Vec<usize> = reports
        .iter()
        .map(|r| match &r.outcome {
            FileOutcome::Converted { diagnostics, .. } => diagnostics.len(),
            FileOutcome::Failed(e) => panic!("unexpected failure: {:#}", e),
        })
        .collect();
    assert_eq!(counts, vec![0, 1]);
    assert!(ctx.read_file("partial.tf").contains("\"snowflake_table\" \"B\""));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unwritable_output_does_not_stop_others() {
    let ctx = TestContext::new();
    ctx.write_file("a.sql", "CREATE TABLE a (id INT);");
    ctx.write_file("b.sql", "CREATE TABLE b (id INT);");
    // A directory where the output file would go
    fs::create_dir(ctx.dir.join("a.tf")).unwrap();

    let reports = convert_directory(&ctx.dir, "sql", &ConvertOptions::default()).unwrap();
    assert_eq!(reports.len(), 2);

    let FileOutcome::Failed(error) = &reports[0].outcome else {
        panic!("expected a write failure, got {:?}", reports[0].outcome);
    };
    assert!(matches!(
        error.downcast_ref::<ConvertError>(),
        Some(ConvertError::FileWriteError { .. })
    ));
    assert!(reports[1].is_success());
    assert!(ctx.exists("b.tf"));
}

#[test]
fn test_no_matching_files() {
    let ctx = TestContext::new();
    ctx.write_file("schema.ddl", "CREATE TABLE a (id INT);");

    let error = convert_directory(&ctx.dir, "sql", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<ConvertError>(),
        Some(ConvertError::NoInputFiles { .. })
    ));

    let files = find_sql_files(&ctx.dir, "ddl").unwrap();
    assert_eq!(relative_paths(&ctx.dir, &files), vec![PathBuf::from("schema.ddl")]);
}
