//! `inf`: copy the game's managed assemblies into `./libs`.

use std::path::PathBuf;

use serde_json::json;

use super::checks;
use crate::context::Context;
use crate::fs_utils;
use crate::response::Response;

/// `<game>/Farlands_Data/Managed`
pub fn managed_dir(farlands_path: &str) -> PathBuf {
    PathBuf::from(farlands_path)
        .join("Farlands_Data")
        .join("Managed")
}

pub fn run(ctx: &mut Context, _args: &[String]) -> anyhow::Result<()> {
    let Some(config) = ctx.config.as_ref() else {
        ctx.log.reject(checks::CONFIG_NOT_LOADED);
        return Ok(());
    };
    let Some(farlands) = config.farlands_path() else {
        ctx.log.reject(checks::NO_FARLANDS_PATH);
        return Ok(());
    };
    let managed = managed_dir(farlands);
    if !managed.is_dir() {
        ctx.log
            .reject(format!("Managed folder not found: {}", managed.display()));
        return Ok(());
    }

    let libs = ctx.paths.work_dir.join("libs");
    match fs_utils::copy_managed_libs(&managed, &libs) {
        Ok(copied) => {
            ctx.log.success(format!(
                "Copied {} DLLs from Managed to libs (excluding System.* and mscorlib.*).",
                copied.len()
            ));
            ctx.log
                .respond(Response::ok_with(json!({ "Copied": copied })));
        }
        Err(e) => ctx.log.fail(format!("Failed to copy libraries: {e}")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Logger, MemorySink, NoPrompt};
    use crate::paths::Paths;
    use std::fs;
    use tempfile::TempDir;

    fn context(work: &TempDir, home: &TempDir) -> (Context, MemorySink) {
        let sink = MemorySink::structured();
        let ctx = Context::load(
            Paths::new(work.path(), home.path()),
            Logger::new(Box::new(sink.clone()), Box::new(NoPrompt)),
        );
        (ctx, sink)
    }

    #[test]
    fn test_requires_farlands_path() {
        let work = TempDir::new().expect("temp dir");
        let home = TempDir::new().expect("temp dir");
        let (mut ctx, sink) = context(&work, &home);
        run(&mut ctx, &[]).expect("run");
        assert!(sink.contains("Farlands path is not configured"));
        assert_eq!(sink.responses()[0].status.code, 400);
    }

    #[test]
    fn test_copies_game_dlls() {
        let work = TempDir::new().expect("temp dir");
        let home = TempDir::new().expect("temp dir");
        let game = home.path().join("Farlands");
        let managed = managed_dir(&game.to_string_lossy());
        fs::create_dir_all(&managed).expect("mkdir");
        fs::write(managed.join("Assembly-CSharp.dll"), b"x").expect("write");
        fs::write(managed.join("System.Xml.dll"), b"x").expect("write");

        let (mut ctx, sink) = context(&work, &home);
        if let Some(config) = ctx.config.as_mut() {
            config
                .set_farlands_path(game.to_string_lossy().to_string())
                .expect("save");
        }
        run(&mut ctx, &[]).expect("run");

        assert!(work.path().join("libs").join("Assembly-CSharp.dll").is_file());
        assert!(!work.path().join("libs").join("System.Xml.dll").exists());
        assert!(sink.contains("Copied 1 DLLs"));
    }
}
