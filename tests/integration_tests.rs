mod common;

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use std::fs;

fn cmd() -> Command {
    Command::cargo_bin("webp-squeeze").unwrap()
}

#[test]
fn test_cli_help() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_missing_input_arg() {
    cmd().assert().failure();
}

#[test]
fn test_nonexistent_input_directory() {
    cmd()
        .args(["-i", "definitely/not/here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_input_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("photo.jpg");
    common::write_jpg(file.path());

    cmd()
        .arg("-i")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_quality_out_of_range_rejected_before_processing() {
    let temp = TempDir::new().unwrap();
    common::write_jpg(temp.child("photo.jpg").path());

    for quality in ["101", "-1"] {
        cmd()
            .arg("-i")
            .arg(temp.path())
            .args(["-q", quality])
            .assert()
            .failure()
            .stderr(predicate::str::contains("between 0 and 100"));
    }

    temp.child("photo.webp").assert(predicate::path::missing());
}

#[test]
fn test_quality_bounds_accepted() {
    let temp = TempDir::new().unwrap();
    common::write_jpg(temp.child("photo.jpg").path());

    for quality in ["0", "100"] {
        cmd()
            .arg("-i")
            .arg(temp.path())
            .args(["-q", quality])
            .assert()
            .success()
            .stdout(predicate::str::contains("Errors: 0"));
    }
}

#[test]
fn test_method_out_of_range_rejected() {
    let temp = TempDir::new().unwrap();

    cmd()
        .arg("-i")
        .arg(temp.path())
        .args(["-m", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 6"));
}

#[test]
fn test_empty_directory() {
    let temp = TempDir::new().unwrap();

    cmd()
        .arg("-i")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found"))
        .stdout(predicate::str::contains(
            "Success: 0 (Animated: 0, Static: 0), Errors: 0",
        ));
}

#[test]
fn test_animated_gif_and_jpg() {
    let temp = TempDir::new().unwrap();
    common::write_gif(temp.child("anim.gif").path(), 4);
    common::write_jpg(temp.child("photo.jpg").path());

    cmd()
        .arg("-i")
        .arg(temp.path())
        .args(["-t", "all", "-q", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 file(s) to convert"))
        .stdout(predicate::str::contains("✓ Converted (animated gif): anim.gif -> anim.webp"))
        .stdout(predicate::str::contains("✓ Converted (jpg): photo.jpg -> photo.webp"))
        .stdout(predicate::str::contains(
            "Success: 2 (Animated: 1, Static: 1), Errors: 0",
        ));

    temp.child("anim.gif").assert(predicate::path::exists());
    temp.child("photo.jpg").assert(predicate::path::exists());
    assert_eq!(common::webp_frames(temp.child("anim.webp").path()), (true, 4));
    assert_eq!(common::webp_frames(temp.child("photo.webp").path()), (false, 1));
}

#[test]
fn test_no_animation_flag() {
    let temp = TempDir::new().unwrap();
    common::write_gif(temp.child("anim.gif").path(), 3);

    cmd()
        .arg("-i")
        .arg(temp.path())
        .arg("--no-animation")
        .assert()
        .success()
        .stdout(predicate::str::contains("preserve_animation=false"))
        .stdout(predicate::str::contains(
            "Success: 1 (Animated: 0, Static: 1), Errors: 0",
        ));

    assert_eq!(common::webp_frames(temp.child("anim.webp").path()), (false, 1));
}

#[test]
fn test_corrupt_jpg_is_reported_not_fatal() {
    let temp = TempDir::new().unwrap();
    common::write_corrupt(temp.child("broken.jpg").path());

    cmd()
        .arg("-i")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ Failed to convert broken.jpg: Decode error"))
        .stdout(predicate::str::contains("Errors: 1"));

    temp.child("broken.webp").assert(predicate::path::missing());
    temp.child("broken.jpg").assert(predicate::path::exists());
}

#[test]
fn test_type_filter() {
    let temp = TempDir::new().unwrap();
    common::write_png(temp.child("keep.png").path());
    common::write_jpg(temp.child("skip.jpg").path());

    cmd()
        .arg("-i")
        .arg(temp.path())
        .args(["-t", "png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 PNG file(s) to convert"));

    temp.child("keep.webp").assert(predicate::path::exists());
    temp.child("skip.webp").assert(predicate::path::missing());
}

#[test]
fn test_recursive_with_output_directory() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("in");
    input.create_dir_all().unwrap();
    common::write_png(input.child("top.png").path());
    input.child("nested/deeper").create_dir_all().unwrap();
    common::write_jpg(input.child("nested/deeper/photo.JPEG").path());
    let output = temp.child("out");

    cmd()
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .arg("-r")
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: 2"));

    output.child("top.webp").assert(predicate::path::exists());
    output
        .child("nested/deeper/photo.webp")
        .assert(predicate::path::exists());
}

#[test]
fn test_non_recursive_skips_subdirectories() {
    let temp = TempDir::new().unwrap();
    temp.child("nested").create_dir_all().unwrap();
    common::write_png(temp.child("nested/inner.png").path());

    cmd()
        .arg("-i")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found"));

    temp.child("nested/inner.webp").assert(predicate::path::missing());
}

#[test]
fn test_hidden_files_and_directories_are_converted() {
    let temp = TempDir::new().unwrap();
    common::write_png(temp.child(".dotted.png").path());
    temp.child(".cache").create_dir_all().unwrap();
    common::write_jpg(temp.child(".cache/thumb.jpg").path());

    cmd()
        .arg("-i")
        .arg(temp.path())
        .arg("-r")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 file(s) to convert"))
        .stdout(predicate::str::contains("Errors: 0"));

    temp.child(".dotted.webp").assert(predicate::path::exists());
    temp.child(".cache/thumb.webp").assert(predicate::path::exists());
}

#[test]
fn test_delete_original() {
    let temp = TempDir::new().unwrap();
    common::write_png(temp.child("gone.png").path());

    cmd()
        .arg("-i")
        .arg(temp.path())
        .arg("-d")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted original file"));

    temp.child("gone.png").assert(predicate::path::missing());
    temp.child("gone.webp").assert(predicate::path::exists());
}

#[test]
fn test_repeat_run_is_idempotent() {
    let temp = TempDir::new().unwrap();
    common::write_gif(temp.child("anim.gif").path(), 2);
    common::write_jpg(temp.child("photo.jpg").path());

    let run = || {
        cmd()
            .arg("-i")
            .arg(temp.path())
            .args(["-q", "70", "-m", "5"])
            .assert()
            .success();
        (
            fs::read(temp.child("anim.webp").path()).unwrap(),
            fs::read(temp.child("photo.webp").path()).unwrap(),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn test_quiet_prints_only_summary() {
    let temp = TempDir::new().unwrap();
    common::write_png(temp.child("a.png").path());

    cmd()
        .arg("-i")
        .arg(temp.path())
        .args(["--quiet", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted").not())
        .stdout(predicate::str::contains("Success: 1 (Animated: 0, Static: 1), Errors: 0"));
}

#[test]
fn test_parallel_threads() {
    let temp = TempDir::new().unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        common::write_png(temp.child(name).path());
    }

    cmd()
        .arg("-i")
        .arg(temp.path())
        .args(["-j", "2", "--lossless"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: 3 (Animated: 0, Static: 3), Errors: 0"));
}
