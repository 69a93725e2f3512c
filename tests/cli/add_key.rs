use anyhow::Result;

use crate::{CliTest, stderr_of};

#[test]
fn test_add_group_key_writes_php_array_file() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test
        .command()
        .args(["add-key", "en", "hello", "Hello", "--group", "test"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    assert_eq!(
        test.read_file("lang/en/test.php")?,
        "<?php\n\nreturn array (\n  'hello' => 'Hello',\n);\n"
    );

    Ok(())
}

#[test]
fn test_add_nested_group_key() -> Result<()> {
    let test = CliTest::with_config()?;

    test.command()
        .args(["add-key", "en", "user.missing", "Not found", "--group", "errors"])
        .output()?;

    assert_eq!(
        test.read_file("lang/en/errors.php")?,
        "<?php\n\nreturn array (\n  'user' => \n  array (\n    'missing' => 'Not found',\n  ),\n);\n"
    );

    Ok(())
}

#[test]
fn test_add_single_key_writes_json() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test
        .command()
        .args(["add-key", "es", "Hello, friend!", "Hola, amigo!"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let parsed: serde_json::Value = serde_json::from_str(&test.read_file("lang/es.json")?)?;
    assert_eq!(parsed["Hello, friend!"], "Hola, amigo!");

    Ok(())
}

#[test]
fn test_add_key_to_table_backend() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test
        .command()
        .args([
            "add-key", "en", "hello", "Hello", "--group", "test", "--driver", "table",
        ])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let table: serde_json::Value = serde_json::from_str(&test.read_file("table.json")?)?;
    assert_eq!(table["translations"][0]["group"], "test");
    assert_eq!(table["translations"][0]["key"], "hello");
    assert_eq!(table["translations"][0]["value"], "Hello");

    Ok(())
}
