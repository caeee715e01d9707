use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::editor::Editor;

const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;
const MAX_ATTEMPTS: u32 = 3;

pub struct FileManager {
    pub current_path: Option<PathBuf>,
    pub is_readonly: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            current_path: None,
            is_readonly: false,
        }
    }

    pub fn get_current_path(&self) -> Option<&PathBuf> {
        self.current_path.as_ref()
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    /// Names a file that does not exist yet; the first save creates it.
    pub fn new_file(&mut self, path: PathBuf) {
        log::info!("New file: {}", path.display());
        self.current_path = Some(path);
        self.is_readonly = false;
    }

    /// Reads `path` as line records, without their line terminators.
    ///
    /// An empty file yields no records.
    pub async fn open_file(&mut self, path: PathBuf) -> Result<Vec<String>> {
        if !path.exists() {
            return Err(anyhow::anyhow!("File not found: {}", path.display()));
        }

        if !path.is_file() {
            return Err(anyhow::anyhow!("Not a regular file: {}", path.display()));
        }

        match fs::metadata(&path).await {
            Ok(metadata) => {
                self.is_readonly = metadata.permissions().readonly();

                if metadata.len() > LARGE_FILE_THRESHOLD {
                    log::warn!(
                        "Large file detected ({} bytes): {}",
                        metadata.len(),
                        path.display()
                    );
                }
            }
            Err(e) => {
                log::warn!("Failed to get file metadata: {}", e);
                self.is_readonly = false;
            }
        }

        match fs::read_to_string(&path).await {
            Ok(content) => {
                if content.contains('\0') {
                    return Err(anyhow::anyhow!(
                        "File appears to be binary: {}",
                        path.display()
                    ));
                }

                let records: Vec<String> = content.lines().map(str::to_owned).collect();
                self.current_path = Some(path.clone());
                log::info!(
                    "Successfully opened file: {} ({} lines)",
                    path.display(),
                    records.len()
                );
                Ok(records)
            }
            Err(e) => {
                let error_msg = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        format!("Permission denied: {}", path.display())
                    }
                    std::io::ErrorKind::NotFound => {
                        format!("File not found: {}", path.display())
                    }
                    std::io::ErrorKind::InvalidData => {
                        format!("File is not valid UTF-8: {}", path.display())
                    }
                    _ => format!("Failed to read file: {} - {}", path.display(), e),
                };
                Err(anyhow::anyhow!(error_msg))
            }
        }
    }

    pub async fn save_file(&self, editor: &mut Editor) -> Result<String> {
        let Some(ref path) = self.current_path else {
            return Err(anyhow::anyhow!("No file name specified"));
        };

        if self.is_readonly {
            return Err(anyhow::anyhow!("File is read-only: {}", path.display()));
        }

        let lines = Self::write_lines(path, editor).await?;
        Ok(format!("{} lines written", lines))
    }

    pub async fn save_file_as(&mut self, path: PathBuf, editor: &mut Editor) -> Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to create directory: {} - {}",
                        parent.display(),
                        e
                    )
                })?;
                log::info!("Created directory: {}", parent.display());
            }
        }

        if path.exists() {
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.permissions().readonly() => {
                    return Err(anyhow::anyhow!(
                        "Target file is read-only: {}",
                        path.display()
                    ));
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to check target file metadata: {}", e),
            }
        }

        let lines = Self::write_lines(&path, editor).await?;
        let message = format!("{} lines written to '{}'", lines, path.display());
        self.current_path = Some(path);
        self.is_readonly = false;
        Ok(message)
    }

    /// Writes one record per line, each followed by `\n`.
    async fn write_lines(path: &Path, editor: &mut Editor) -> Result<usize> {
        let lines = editor.lines();
        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in &lines {
            content.push_str(line);
            content.push('\n');
        }

        if let Ok(metadata) = fs::metadata(path).await {
            if metadata.len() > 0 {
                let backup_path = path.with_extension("bak");
                if let Err(e) = fs::copy(path, &backup_path).await {
                    log::warn!("Failed to create backup: {}", e);
                } else {
                    log::info!("Created backup: {}", backup_path.display());
                }
            }
        }

        let mut attempts = 0;
        loop {
            match fs::write(path, content.as_bytes()).await {
                Ok(_) => {
                    editor.mark_saved();
                    log::info!("Successfully saved file: {}", path.display());
                    return Ok(lines.len());
                }
                Err(e) => {
                    attempts += 1;
                    if attempts >= MAX_ATTEMPTS {
                        let error_msg = match e.kind() {
                            std::io::ErrorKind::PermissionDenied => {
                                format!("Permission denied: {}", path.display())
                            }
                            std::io::ErrorKind::WriteZero => {
                                format!("Disk may be full: {}", path.display())
                            }
                            _ => format!("Failed to write file: {} - {}", path.display(), e),
                        };
                        return Err(anyhow::anyhow!(error_msg));
                    }

                    log::warn!(
                        "Save attempt {} failed for {}, retrying...",
                        attempts,
                        path.display()
                    );
                    tokio::time::sleep(tokio::time::Duration::from_millis(100 * attempts as u64))
                        .await;
                }
            }
        }
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}
