//! prepare-commit-msg hook installation.

use std::path::Path;

use crate::error::GitError;
use crate::git::GitCli;

const HOOK_FILE_NAME: &str = "prepare-commit-msg";

const HOOK_SCRIPT: &str = "#!/bin/sh

epitome commit --file \"$1\" --preview
";

/// Install the prepare-commit-msg hook, refusing to clobber an existing one.
pub async fn install(git: &GitCli) -> Result<(), GitError> {
    let target = git.hooks_dir().await?.join(HOOK_FILE_NAME);
    if target.is_file() {
        return Err(GitError::HookExists(target.display().to_string()));
    }

    write_executable(&target, HOOK_SCRIPT).map_err(GitError::HookWriteFailed)
}

/// Remove a previously installed hook.
pub async fn uninstall(git: &GitCli) -> Result<(), GitError> {
    let target = git.hooks_dir().await?.join(HOOK_FILE_NAME);
    if !target.is_file() {
        return Err(GitError::HookMissing(target.display().to_string()));
    }
    std::fs::remove_file(&target).map_err(GitError::HookRemoveFailed)
}

fn write_executable(path: &Path, content: &str) -> std::io::Result<()> {
    std::fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_script_runs_in_preview_mode() {
        assert!(HOOK_SCRIPT.starts_with("#!/bin/sh"));
        assert!(HOOK_SCRIPT.contains("--preview"));
        assert!(HOOK_SCRIPT.contains("--file \"$1\""));
    }

    #[test]
    fn write_executable_sets_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HOOK_FILE_NAME);
        write_executable(&path, HOOK_SCRIPT).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, HOOK_SCRIPT);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }
}
