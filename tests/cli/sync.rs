use anyhow::Result;

use crate::{CliTest, stderr_of};

#[test]
fn test_sync_file_to_table() -> Result<()> {
    let test = CliTest::with_config()?;
    test.command()
        .args(["add-key", "en", "hello", "Hello", "--group", "test"])
        .output()?;
    test.command()
        .args(["add-key", "en", "Welcome back.", "Welcome back."])
        .output()?;

    let output = test.command().args(["sync", "file", "table"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let table = test.read_file("table.json")?;
    assert!(table.contains("\"hello\""));
    assert!(table.contains("\"Welcome back.\""));

    Ok(())
}

#[test]
fn test_sync_table_to_file() -> Result<()> {
    let test = CliTest::with_config()?;
    test.command()
        .args([
            "add-key", "es", "hello", "Hola!", "--group", "test", "--driver", "table",
        ])
        .output()?;

    let output = test.command().args(["sync", "table", "file"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    assert_eq!(
        test.read_file("lang/es/test.php")?,
        "<?php\n\nreturn array (\n  'hello' => 'Hola!',\n);\n"
    );

    Ok(())
}

#[test]
fn test_sync_single_language_only() -> Result<()> {
    let test = CliTest::with_config()?;
    test.command()
        .args(["add-key", "en", "hello", "Hello", "--group", "test"])
        .output()?;
    test.command()
        .args(["add-key", "es", "hello", "Hola!", "--group", "test"])
        .output()?;

    let output = test
        .command()
        .args(["sync", "file", "table", "--language", "es"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let table = test.read_file("table.json")?;
    assert!(table.contains("\"es\""));
    assert!(table.contains("Hola!"));
    assert!(!table.contains("\"Hello\""));

    Ok(())
}

#[test]
fn test_sync_unknown_backend_is_a_failure() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test.command().args(["sync", "file", "redis"]).output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("redis"));

    Ok(())
}
