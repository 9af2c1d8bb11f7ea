//! Integration tests for artcache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    const PHOTO_HASH: &str = "ba7816bf8f01cfea414140de5dae2223";

    /// Command isolated from the user's global and local config
    fn artcache(config: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("artcache");
        cmd.arg("--no-local").arg("--config").arg(config);
        cmd
    }

    /// Site root containing `photo.jpg` with known content
    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"abc").unwrap();
        dir
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("artcache")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("ontent-addressed cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("artcache")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("artcache"));
    }

    #[test]
    fn key_prints_filename_without_side_effects() {
        let dir = site();
        let config = dir.path().join("config.toml");

        artcache(&config)
            .args(["key", "photo.jpg", "800x800>,webp,80", "--root"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(format!("{PHOTO_HASH}_800x800webp80.webp\n"));

        assert!(!dir.path().join("cache").exists());
    }

    #[test]
    fn key_normalizes_equivalent_options() {
        let dir = site();
        let config = dir.path().join("config.toml");

        artcache(&config)
            .args(["key", "photo.jpg", "800 x 800 >", "--root"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(format!("{PHOTO_HASH}_800x800.jpg\n"));
    }

    #[test]
    fn key_missing_source_fails() {
        let dir = site();
        let config = dir.path().join("config.toml");

        artcache(&config)
            .args(["key", "missing.jpg", "10x10", "--root"])
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("not readable"));
    }

    #[test]
    fn resolve_empty_options_fails() {
        let dir = site();
        let config = dir.path().join("config.toml");

        artcache(&config)
            .args(["resolve", "photo.jpg", "", "--root"])
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("may not be empty"));

        assert!(!dir.path().join("cache").exists());
    }

    #[test]
    fn resolve_with_missing_producer_fails_cleanly() {
        let dir = site();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "[producer]\nprogram = \"artcache-no-such-program\"\n").unwrap();

        artcache(&config)
            .args(["resolve", "photo.jpg", "10x10", "--root"])
            .arg(dir.path())
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Failed to produce"))
            .stderr(predicate::str::contains("artcache-no-such-program"))
            .stderr(predicate::str::contains("Install ImageMagick"));

        let cache_dir = dir.path().join("cache/resize");
        assert_eq!(std::fs::read_dir(cache_dir).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn resolve_generates_once_then_hits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = site();

        // Stand-in for ImageMagick: copy the first argument to the last.
        let script = dir.path().join("fake-magick");
        std::fs::write(
            &script,
            "#!/bin/sh\nfor last; do :; done\ncp \"$1\" \"$last\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let source = dir.path().join("photo.jpg");
        std::fs::File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(std::time::SystemTime::now() - std::time::Duration::from_secs(3600))
            .unwrap();

        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "[producer]\nprogram = \"{}\"\n\n[site]\nbase_url = \"/blog\"\n",
                script.display()
            ),
        )
        .unwrap();

        let expected_url = format!("/blog/cache/resize/{PHOTO_HASH}_800x800webp80.webp");

        artcache(&config)
            .args(["resolve", "photo.jpg", "800x800>,webp,80", "--format", "json", "--root"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(&expected_url))
            .stdout(predicate::str::contains("\"regenerated\": true"));

        artcache(&config)
            .args(["resolve", "photo.jpg", "800x800>,webp,80", "--format", "json", "--root"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"regenerated\": false"));

        artcache(&config)
            .args(["resolve", "photo.jpg", "800x800>,webp,80", "--root"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(format!("{expected_url}\n"));

        let artifact = dir
            .path()
            .join("cache/resize")
            .join(format!("{PHOTO_HASH}_800x800webp80.webp"));
        assert_eq!(std::fs::read(artifact).unwrap(), b"abc");
    }

    #[test]
    fn config_path() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("custom.toml");

        artcache(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");

        artcache(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("cache/resize"));
    }

    #[test]
    fn config_set_persists() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");

        artcache(&config)
            .args(["config", "set", "site.base_url", "/docs"])
            .assert()
            .success();

        let saved = std::fs::read_to_string(&config).unwrap();
        assert!(saved.contains("/docs"));
    }
}
