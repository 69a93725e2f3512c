use anyhow::Result;

use crate::{CliTest, stderr_of};

#[test]
fn test_sync_missing_stores_placeholders() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file(
        "app/welcome.php",
        "<?php echo trans('test.hello'); echo __('Hi there');",
    )?;

    let output = test.command().args(["sync-missing", "en"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    assert_eq!(
        test.read_file("lang/en/test.php")?,
        "<?php\n\nreturn array (\n  'hello' => '',\n);\n"
    );
    let singles: serde_json::Value = serde_json::from_str(&test.read_file("lang/en.json")?)?;
    assert_eq!(singles["Hi there"], "");

    Ok(())
}

#[test]
fn test_sync_missing_keeps_existing_values() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("app/welcome.php", "<?php echo trans('test.hello');")?;
    test.command()
        .args(["add-key", "en", "hello", "Hello", "--group", "test"])
        .output()?;

    let output = test.command().args(["sync-missing", "en"]).output()?;
    assert!(output.status.success());

    assert_eq!(
        test.read_file("lang/en/test.php")?,
        "<?php\n\nreturn array (\n  'hello' => 'Hello',\n);\n"
    );

    Ok(())
}

#[test]
fn test_sync_missing_covers_all_registered_languages() -> Result<()> {
    let test = CliTest::with_config()?;
    test.write_file("app/view.php", "<?php trans('test.bye');")?;
    test.command().args(["add-language", "en"]).output()?;
    test.command().args(["add-language", "es"]).output()?;

    let output = test.command().arg("sync-missing").output()?;
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    for language in ["en", "es"] {
        assert_eq!(
            test.read_file(&format!("lang/{language}/test.php"))?,
            "<?php\n\nreturn array (\n  'bye' => '',\n);\n"
        );
    }

    Ok(())
}
