use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr_of};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(test.root().join(".lingorc.json").exists());

    let content = test.read_file(".lingorc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["driver"], "file");
    assert_eq!(parsed["sourceLanguage"], "en");
    assert!(parsed.get("languagesRoot").is_some());
    assert!(parsed.get("translationMethods").is_some());

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".lingorc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("already exists"));

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());

    let output = test.command().arg("languages").output()?;
    assert!(
        output.status.success(),
        "languages should work with the generated config. stderr: {}",
        stderr_of(&output)
    );

    Ok(())
}
