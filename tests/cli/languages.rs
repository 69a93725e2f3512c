use anyhow::Result;

use crate::{CliTest, stderr_of, stdout_of};

#[test]
fn test_no_languages_registered() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test.command().arg("languages").output()?;
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("No languages registered"));

    Ok(())
}

#[test]
fn test_lists_languages_sorted() -> Result<()> {
    let test = CliTest::with_config()?;

    test.command().args(["add-language", "es"]).output()?;
    test.command().args(["add-language", "de"]).output()?;

    let output = test.command().arg("languages").output()?;
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "de\nes\n");

    Ok(())
}

#[test]
fn test_table_driver_shows_display_names() -> Result<()> {
    let test = CliTest::with_config()?;

    test.command()
        .args(["add-language", "es", "--name", "Español", "--driver", "table"])
        .output()?;

    let output = test
        .command()
        .args(["languages", "--driver", "table"])
        .output()?;
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "es\tEspañol\n");

    Ok(())
}

#[test]
fn test_unknown_driver_is_a_failure() -> Result<()> {
    let test = CliTest::with_config()?;

    let output = test
        .command()
        .args(["languages", "--driver", "redis"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("redis"));

    Ok(())
}
