use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Write captured output to `path`, creating `dir` (recursively) first.
pub async fn write_output(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    if !dir.as_os_str().is_empty() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create directory {}", dir.display()))?;
    }

    let mut opts = tokio::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    opts.mode(0o644);

    let mut file = opts
        .open(path)
        .await
        .with_context(|| format!("open {}", path.display()))?;
    file.write_all(bytes)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    file.flush().await.context("flush output file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("case-42").join("vol");
        let path = dir.join("mem-PsList.txt");
        write_output(&dir, &path, b"PID\tPPID\n4\t0\n").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"PID\tPPID\n4\t0\n");
    }

    #[tokio::test]
    async fn overwrites_previous_output() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("mem-PsList.txt");
        write_output(root.path(), &path, b"first run, longer").await.unwrap();
        write_output(root.path(), &path, b"second").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn output_is_not_executable() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("mem-SSDT.csv");
        write_output(root.path(), &path, b"x").await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }

    #[tokio::test]
    async fn file_in_place_of_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("out");
        std::fs::write(&blocker, b"").unwrap();
        let err = write_output(&blocker, &blocker.join("a.txt"), b"x")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("create directory"));
    }
}
