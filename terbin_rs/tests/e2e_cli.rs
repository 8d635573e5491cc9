//! End-to-end CLI tests for terbin.
//!
//! Every test runs the real binary inside a temporary project folder with
//! `TERBIN_HOME` pointing at a temporary home, so no real config is touched.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Sandbox {
    work: TempDir,
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            work: TempDir::new().expect("temp work dir"),
            home: TempDir::new().expect("temp home dir"),
        }
    }

    fn terbin(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("terbin");
        cmd.current_dir(self.work.path())
            .env("TERBIN_HOME", self.home.path())
            .env("TERBIN_DOTNET", "terbin-test-missing-dotnet")
            .env_remove("TERBIN_LOG");
        cmd
    }

    fn work(&self) -> &Path {
        self.work.path()
    }

    fn config(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.home.path().join("config.json")).expect("config");
        serde_json::from_str(&raw).expect("config json")
    }

    fn write_manifest(&self, versions: &[&str]) {
        let manifest = serde_json::json!({
            "Name": "CoolMod",
            "Type": "NORMAL",
            "GUID": "fm.cool",
            "Versions": versions,
            "url": "https://github.com/someone/CoolMod",
            "Dependencies": ["fm.fcm"],
        });
        fs::write(self.work().join("manifest.json"), manifest.to_string()).expect("manifest");
    }

    fn manifest(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.work().join("manifest.json")).expect("manifest");
        serde_json::from_str(&raw).expect("manifest json")
    }
}

// ============================================
// Help and dispatch
// ============================================

mod help {
    use super::*;

    #[test]
    fn no_arguments_shows_help() {
        Sandbox::new()
            .terbin()
            .assert()
            .success()
            .stdout(predicate::str::contains("Available commands:"))
            .stdout(predicate::str::contains("  build - "))
            .stdout(predicate::str::contains("i -> instances"));
    }

    #[test]
    fn prefixed_and_aliased_help_are_the_same() {
        let sandbox = Sandbox::new();
        let plain = sandbox.terbin().arg("help").output().expect("run");
        for form in ["-h", "--help", "-help", "HELP", "h"] {
            let other = sandbox.terbin().arg(form).output().expect("run");
            assert_eq!(other.stdout, plain.stdout, "form {form}");
        }
    }

    #[test]
    fn help_for_one_command() {
        Sandbox::new()
            .terbin()
            .args(["help", "version"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Help: version"))
            .stdout(predicate::str::contains("terbin version upgrade"))
            .stdout(predicate::str::contains("Aliases: v"));
    }

    #[test]
    fn unknown_command_lists_commands() {
        Sandbox::new()
            .terbin()
            .arg("--buidl")
            .assert()
            .success()
            .stderr(predicate::str::contains("Unknown command: buidl"))
            .stdout(predicate::str::contains("Did you mean 'build'?"))
            .stdout(predicate::str::contains(
                "Available commands (use 'terbin help <command>' for details):",
            ))
            .stdout(predicate::str::contains("  mods - "));
    }
}

// ============================================
// Config
// ============================================

mod config {
    use super::*;

    #[test]
    fn sets_and_shows_farlands_path() {
        let sandbox = Sandbox::new();
        let game = sandbox.home.path().join("Farlands");
        fs::create_dir_all(&game).expect("mkdir");

        sandbox
            .terbin()
            .args(["config", "fpath", &game.to_string_lossy()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Farlands path set to:"));
        assert_eq!(
            sandbox.config()["FarlandsPath"],
            game.to_string_lossy().as_ref()
        );

        sandbox
            .terbin()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains(game.to_string_lossy().as_ref()));
    }

    #[test]
    fn unknown_module_prints_usage() {
        Sandbox::new()
            .terbin()
            .args(["config", "colour"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Unknown config module: colour"))
            .stdout(predicate::str::contains("terbin config fpath [path]"));
    }
}

// ============================================
// Project: manifest, version, bman, inf
// ============================================

mod project {
    use super::*;

    #[test]
    fn creates_manifest_from_flags() {
        let sandbox = Sandbox::new();
        sandbox
            .terbin()
            .args([
                "manifest",
                "--name",
                "CoolMod",
                "--guid",
                "fm.cool",
                "--version",
                "0.1.0",
                "--url",
                "https://github.com/someone/CoolMod",
                "-y",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Project created successfully."));

        let manifest = sandbox.manifest();
        assert_eq!(manifest["Name"], "CoolMod");
        assert_eq!(manifest["Type"], "NORMAL");
        assert_eq!(manifest["Versions"], serde_json::json!(["0.1.0"]));
        assert_eq!(manifest["Dependencies"], serde_json::json!(["fm.fcm"]));
    }

    #[test]
    fn refuses_second_manifest() {
        let sandbox = Sandbox::new();
        sandbox.write_manifest(&["1.0.0"]);
        sandbox
            .terbin()
            .args(["manifest", "-y"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Manifest already exists"));
    }

    #[test]
    fn version_upgrade_and_downgrade() {
        let sandbox = Sandbox::new();
        sandbox.write_manifest(&["1.2.3"]);

        sandbox
            .terbin()
            .args(["v", "upgrade", "minor"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Version set to: 1.3.0"));
        sandbox
            .terbin()
            .args(["version", "upgrade"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Version set to: 1.3.1"));
        assert_eq!(
            sandbox.manifest()["Versions"],
            serde_json::json!(["1.2.3", "1.3.0", "1.3.1"])
        );

        sandbox
            .terbin()
            .args(["version", "downgrade"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed version: 1.3.1"));
        sandbox
            .terbin()
            .args(["version", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Current: 1.3.0"));
    }

    #[test]
    fn bman_writes_plugin() {
        let sandbox = Sandbox::new();
        sandbox.write_manifest(&["0.2.0"]);
        sandbox.terbin().arg("bman").assert().success();

        let plugin = fs::read_to_string(sandbox.work().join("plugin.cs")).expect("plugin");
        assert!(plugin.contains(r#"[BepInPlugin("fm.cool", "CoolMod", "0.2.0")]"#));
    }

    #[test]
    fn inf_copies_game_libraries() {
        let sandbox = Sandbox::new();
        let game = sandbox.home.path().join("Farlands");
        let managed = game.join("Farlands_Data").join("Managed");
        fs::create_dir_all(&managed).expect("mkdir");
        fs::write(managed.join("Assembly-CSharp.dll"), b"x").expect("write");
        fs::write(managed.join("mscorlib.dll"), b"x").expect("write");

        sandbox
            .terbin()
            .args(["config", "fpath", &game.to_string_lossy()])
            .assert()
            .success();
        sandbox
            .terbin()
            .arg("inf")
            .assert()
            .success()
            .stdout(predicate::str::contains("Copied 1 DLLs"));
        assert!(sandbox.work().join("libs/Assembly-CSharp.dll").is_file());
        assert!(!sandbox.work().join("libs/mscorlib.dll").exists());
    }
}

// ============================================
// Instances and mods
// ============================================

mod instances {
    use super::*;

    #[test]
    fn list_without_instances() {
        Sandbox::new()
            .terbin()
            .args(["i", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No instances registered."));
    }

    #[test]
    fn delete_unknown_instance() {
        Sandbox::new()
            .terbin()
            .args(["instances", "delete", "ghost", "-y"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Instance not found: ghost"));
    }

    #[test]
    fn mods_list_from_local_index() {
        let sandbox = Sandbox::new();
        let index = sandbox.home.path().join("mods.json");
        fs::write(
            &index,
            r#"[{"name": "CoolMod", "guid": "fm.cool", "url": "https://example.com/manifest.json"}]"#,
        )
        .expect("write");
        sandbox
            .terbin()
            .args(["config", "index-url", &index.to_string_lossy()])
            .assert()
            .success();

        sandbox
            .terbin()
            .arg("index")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "- CoolMod [fm.cool] -> https://example.com/manifest.json",
            ));
        assert_eq!(
            sandbox.config()["Index"]["references"][0]["guid"],
            "fm.cool"
        );
    }
}

// ============================================
// Interactive mode
// ============================================

mod interactive {
    use super::*;

    #[test]
    fn runs_lines_until_exit() {
        let sandbox = Sandbox::new();
        sandbox.write_manifest(&["1.0.0"]);
        sandbox
            .terbin()
            .arg("--interactive")
            .write_stdin("version show\n\"version\" upgrade patch\nexit\nversion upgrade\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Current: 1.0.0"))
            .stdout(predicate::str::contains("Version set to: 1.0.1"));
        assert_eq!(
            sandbox.manifest()["Versions"],
            serde_json::json!(["1.0.0", "1.0.1"])
        );
    }
}
