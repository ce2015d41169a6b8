use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli(data_dir: &std::path::Path) -> Result<Command, Box<dyn Error>> {
    let mut command = Command::cargo_bin("markdownizr-cli")?;
    command.arg("--data-dir").arg(data_dir);
    Ok(command)
}

#[test]
fn convert_reads_stdin_and_prints_markdown() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli(dir.path())?
        .arg("convert")
        .write_stdin("<h1>Title</h1><p>Hello <strong>there</strong></p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Title"))
        .stdout(predicate::str::contains("**there**"));
    Ok(())
}

#[test]
fn convert_records_history_and_list_shows_it() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli(dir.path())?
        .arg("convert")
        .write_stdin("<p>remember me</p>")
        .assert()
        .success();

    cli(dir.path())?
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0\t").and(predicate::str::contains("remember me")));

    cli(dir.path())?
        .args(["history", "show", "0", "--source"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>remember me</p>"));
    Ok(())
}

#[test]
fn no_history_flag_skips_recording() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli(dir.path())?
        .args(["convert", "--no-history"])
        .write_stdin("<p>secret</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("secret"));

    cli(dir.path())?
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversion history yet."));
    Ok(())
}

#[test]
fn convert_file_to_output_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("page.html");
    let output = dir.path().join("page.md");
    fs::write(&input, "<ul><li>one</li><li>two</li></ul><script>alert(1)</script>")?;

    cli(dir.path())?
        .arg("convert")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved Markdown to"));

    let markdown = fs::read_to_string(&output)?;
    assert!(markdown.contains("one"));
    assert!(markdown.contains("two"));
    assert!(!markdown.contains("alert"));
    Ok(())
}

#[test]
fn convert_rejects_oversized_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("huge.html");
    fs::File::create(&input)?.set_len(11 * 1024 * 1024)?;

    cli(dir.path())?
        .arg("convert")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("File is too large"));
    Ok(())
}

#[test]
fn missing_input_file_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli(dir.path())?
        .args(["convert", "does-not-exist.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: File does not exist"));
    Ok(())
}

#[test]
fn preview_renders_html() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli(dir.path())?
        .arg("preview")
        .write_stdin("## Sub\n\n- item")
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>Sub</h2>"))
        .stdout(predicate::str::contains("<li>item</li>"));

    cli(dir.path())?
        .arg("preview")
        .write_stdin("   ")
        .assert()
        .success()
        .stdout(predicate::str::contains("No markdown to preview yet."));
    Ok(())
}
