use dirsort::cli::{Cli, CliError, run_cli};
/// Integration tests for dirsort
///
/// These tests drive complete runs against temporary directories.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Collisions and repeated runs
/// 3. Dry-run mode
/// 4. Configuration and filtering
/// 5. The binary: log lines and exit status
use dirsort::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers for building and checking file trees.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_text_file(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).expect("Failed to create file");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_text_file(name, name);
        }
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Count regular files directly in the test directory.
    fn count_files(&self) -> usize {
        self.entries().iter().filter(|p| p.is_file()).count()
    }

    /// Count directories directly in the test directory.
    fn count_dirs(&self) -> usize {
        self.entries().iter().filter(|p| p.is_dir()).count()
    }

    fn entries(&self) -> Vec<PathBuf> {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .flatten()
            .map(|e| e.path())
            .collect()
    }

    fn run(&self) -> dirsort::RunSummary {
        run_cli(&Cli::for_source(self.path())).expect("Run should succeed")
    }
}

fn run_binary(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dirsort"))
        .args(args)
        .output()
        .expect("Failed to run dirsort binary")
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let summary = fixture.run();

    assert_eq!(summary.moved(), 0);
    assert_eq!(fixture.count_dirs(), 0, "Should create no subdirectories");
}

#[test]
fn test_organize_mixed_file_types() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "photo.JPG",
        "notes.txt",
        "archive.tar.gz",
        "run.sh",
        "unknown.xyz",
    ]);

    let summary = fixture.run();

    assert_eq!(summary.moved(), 5);
    assert_eq!(summary.failed, 0);
    fixture.assert_file_exists("Images/photo.JPG");
    fixture.assert_file_exists("Documents/notes.txt");
    fixture.assert_file_exists("Archives/archive.tar.gz");
    fixture.assert_file_exists("Scripts/run.sh");
    fixture.assert_file_exists("Others/unknown.xyz");
    assert_eq!(fixture.count_files(), 0, "Root should hold no files");
}

#[test]
fn test_organize_files_without_extension() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Makefile", ".bashrc", "trailing."]);

    fixture.run();

    fixture.assert_file_exists("Others/Makefile");
    fixture.assert_file_exists("Others/.bashrc");
    fixture.assert_file_exists("Others/trailing.");
}

#[test]
fn test_organize_names_with_leading_dots() {
    let fixture = TestFixture::new();
    fixture.create_files(&["..txt", "...png", ".hidden.png"]);

    fixture.run();

    fixture.assert_file_exists("Others/..txt");
    fixture.assert_file_exists("Others/...png");
    fixture.assert_file_exists("Images/.hidden.png");
    fixture.assert_file_not_exists("Documents");
}

#[test]
fn test_organize_leaves_existing_directories_alone() {
    let fixture = TestFixture::new();
    fixture.create_subdir("projects");
    fixture.create_text_file("projects/inner.txt", "nested");
    fixture.create_text_file("top.txt", "top");

    let summary = fixture.run();

    assert_eq!(summary.skipped, 1);
    fixture.assert_file_exists("projects/inner.txt");
    fixture.assert_file_exists("Documents/top.txt");
    fixture.assert_file_not_exists("Documents/inner.txt");
}

#[test]
fn test_organize_many_files() {
    let fixture = TestFixture::new();
    for i in 0..50 {
        let name = match i % 5 {
            0 => format!("image_{}.png", i),
            1 => format!("doc_{}.txt", i),
            2 => format!("audio_{}.mp3", i),
            3 => format!("archive_{}.zip", i),
            _ => format!("clip_{}.mp4", i),
        };
        fixture.create_text_file(&name, "content");
    }

    let summary = fixture.run();

    assert_eq!(summary.moved(), 50);
    assert_eq!(fixture.count_files(), 0);
    for dir in ["Images", "Documents", "Music", "Archives", "Videos"] {
        fixture.assert_dir_exists(dir);
        assert_eq!(
            fs::read_dir(fixture.path().join(dir)).unwrap().count(),
            10,
            "{} should hold 10 files",
            dir
        );
    }
}

// ============================================================================
// Test Suite 2: Collisions and Repeated Runs
// ============================================================================

#[test]
fn test_collision_with_previous_run() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_text_file("Documents/report.pdf", "first");
    fixture.create_text_file("report.pdf", "second");

    fixture.run();

    assert_eq!(
        fs::read_to_string(fixture.path().join("Documents/report.pdf")).unwrap(),
        "first"
    );
    assert_eq!(
        fs::read_to_string(fixture.path().join("Documents/report(1).pdf")).unwrap(),
        "second"
    );
}

#[test]
fn test_repeated_collisions_count_upwards() {
    let fixture = TestFixture::new();
    for round in 0..3 {
        fixture.create_text_file("report.pdf", &format!("round {}", round));
        fixture.run();
    }

    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Documents/report(1).pdf");
    fixture.assert_file_exists("Documents/report(2).pdf");
    assert_eq!(
        fs::read_to_string(fixture.path().join("Documents/report(2).pdf")).unwrap(),
        "round 2"
    );
}

#[test]
fn test_second_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.pdf", "c.xyz"]);

    let first = fixture.run();
    let second = fixture.run();

    assert_eq!(first.moved(), 3);
    assert_eq!(second.moved(), 0);
    assert_eq!(second.skipped, 3, "Category directories are skipped");
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_not_exists("Images/a(1).jpg");
}

// ============================================================================
// Test Suite 3: Dry-Run Mode
// ============================================================================

#[test]
fn test_dry_run_doesnt_move_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.png", "report.pdf"]);

    let cli = Cli {
        dry_run: true,
        ..Cli::for_source(fixture.path())
    };
    let summary = run_cli(&cli).expect("Dry run should succeed");

    assert_eq!(summary.moved(), 0);
    assert_eq!(summary.operations.len(), 2);
    fixture.assert_file_exists("photo.png");
    fixture.assert_file_exists("report.pdf");
    assert_eq!(fixture.count_dirs(), 0, "Dry-run should not create directories");
}

#[test]
fn test_dry_run_plans_deduplicated_names() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_text_file("Documents/report.pdf", "old");
    fixture.create_text_file("report.pdf", "new");

    let cli = Cli {
        dry_run: true,
        ..Cli::for_source(fixture.path())
    };
    let summary = run_cli(&cli).expect("Dry run should succeed");

    assert_eq!(
        summary.operations[0].new_path,
        fixture.path().join("Documents/report(1).pdf")
    );
    fixture.assert_file_exists("report.pdf");
}

// ============================================================================
// Test Suite 4: Configuration and Filtering
// ============================================================================

#[test]
fn test_custom_categories_from_config() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("dirsort.toml");
    fs::write(
        &config_path,
        r#"
default_category = "Misc"

[categories]
Ebooks = ["epub"]

[filters]
exclude_filenames = ["keep.txt"]
exclude_patterns = ["*.part"]
"#,
    )
    .unwrap();
    fixture.create_files(&["novel.epub", "keep.txt", "download.zip.part", "x.unknown"]);

    let cli = Cli {
        config: Some(config_path),
        ..Cli::for_source(fixture.path())
    };
    let summary = run_cli(&cli).expect("Run should succeed");

    assert_eq!(summary.excluded, 2);
    fixture.assert_file_exists("Ebooks/novel.epub");
    fixture.assert_file_exists("Misc/x.unknown");
    fixture.assert_file_exists("keep.txt");
    fixture.assert_file_exists("download.zip.part");
}

#[test]
fn test_invalid_config_aborts_before_moving() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("bad.toml");
    fs::write(&config_path, "[categories]\nPictures = [\".png\"]\n").unwrap();
    fixture.create_files(&["photo.png"]);

    let cli = Cli {
        config: Some(config_path),
        ..Cli::for_source(fixture.path())
    };
    let result = run_cli(&cli);

    assert!(matches!(
        result,
        Err(CliError::Config(ConfigError::DuplicateExtension { .. }))
    ));
    fixture.assert_file_exists("photo.png");
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let fixture = TestFixture::new();
    let cli = Cli {
        config: Some(fixture.path().join("nope.toml")),
        ..Cli::for_source(fixture.path())
    };

    assert!(matches!(
        run_cli(&cli),
        Err(CliError::Config(ConfigError::ConfigNotFound(_)))
    ));
}

// ============================================================================
// Test Suite 5: The Binary
// ============================================================================

#[test]
fn test_binary_nonexistent_source_fails() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("does-not-exist");

    let output = run_binary(&[missing.to_str().unwrap()]);

    assert!(!output.status.success(), "Should exit with nonzero status");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: The directory") && stderr.contains("does not exist."),
        "Unexpected stderr: {}",
        stderr
    );
    assert!(!missing.exists());
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_binary_file_as_source_fails() {
    let fixture = TestFixture::new();
    fixture.create_text_file("plain.txt", "not a directory");

    let output = run_binary(&[fixture.path().join("plain.txt").to_str().unwrap()]);

    assert!(!output.status.success());
    fixture.assert_file_exists("plain.txt");
}

#[test]
fn test_binary_logs_moves_and_completion() {
    let fixture = TestFixture::new();
    fixture.create_files(&["notes.txt"]);
    fixture.create_subdir("Images");

    let output = run_binary(&["-v", fixture.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DEBUG: Skipped directory: Images"), "{}", stderr);
    assert!(stderr.contains("INFO: Moved: notes.txt to Documents/"), "{}", stderr);
    assert!(stderr.contains("INFO: File organization complete."), "{}", stderr);
}

#[test]
fn test_binary_hides_debug_lines_by_default() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");

    let output = run_binary(&[fixture.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Skipped directory"), "{}", stderr);
    assert!(stderr.contains("INFO: File organization complete."), "{}", stderr);
}

#[test]
fn test_binary_dry_run_reports_plan() {
    let fixture = TestFixture::new();
    fixture.create_files(&["song.mp3"]);

    let output = run_binary(&["--dry-run", fixture.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("INFO: Would move: song.mp3 to Music/"), "{}", stderr);
    assert!(stderr.contains("Dry run complete."), "{}", stderr);
    fixture.assert_file_exists("song.mp3");
}
