use anyhow::Result;

use crate::{CliTest, stderr_of};

#[test]
fn test_add_language_creates_layout() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test.command().args(["add-language", "fr"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    assert!(test.root().join("lang").join("fr").is_dir());
    assert_eq!(test.read_file("lang/fr.json")?, "{}");

    Ok(())
}

#[test]
fn test_duplicate_language_is_a_failure() -> Result<()> {
    let test = CliTest::with_config()?;

    test.command().args(["add-language", "fr"]).output()?;
    let output = test.command().args(["add-language", "fr"]).output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("already exists"));

    Ok(())
}

#[test]
fn test_add_language_to_table_backend() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test
        .command()
        .args(["add-language", "es", "--driver", "table"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let table = test.read_file("table.json")?;
    assert!(table.contains("\"es\""));

    Ok(())
}
