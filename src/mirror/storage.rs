use std::io;
use std::path::Path;

/// Filesystem operations used by the mirror.
pub trait Storage: Send + Sync {
    /// Succeeds when the directory already exists.
    fn ensure_dir(&self, path: &Path) -> impl Future<Output = io::Result<()>> + Send;

    /// Bodies are stored exactly as received, whatever their charset.
    fn write_file(&self, path: &Path, bytes: Vec<u8>) -> impl Future<Output = io::Result<()>> + Send;
}

/// Writes to the local disk through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn write_file(&self, path: &Path, bytes: Vec<u8>) -> io::Result<()> {
        tokio::fs::write(path, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path().join("example-com_files");

        LocalStorage.ensure_dir(&dir).await?;
        LocalStorage.ensure_dir(&dir).await?;
        assert!(dir.is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_write_keeps_bytes() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let css_path = tmp.path().join("main.css");
        let png_path = tmp.path().join("cat.png");

        LocalStorage.write_file(&css_path, vec![b'a', 0xE9, b'b']).await?;
        LocalStorage.write_file(&png_path, vec![0x89, 0x50, 0x4e, 0x47]).await?;

        assert_eq!(std::fs::read(&css_path)?, vec![b'a', 0xE9, b'b']);
        assert_eq!(std::fs::read(&png_path)?, vec![0x89, 0x50, 0x4e, 0x47]);
        Ok(())
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("missing").join("file.js");
        assert!(LocalStorage.write_file(&path, Vec::new()).await.is_err());
        Ok(())
    }
}
