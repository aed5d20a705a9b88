//! Backup service - data file backup management
//!
//! Creates ZIP archives of the flat data files under `backups/` in the data
//! directory, named `backup_YYYYMMDD_HHMMSS.zip`.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::adapters::DATA_FILES;

/// Config files to include in backups alongside the data files.
const CONFIG_FILES: &[&str] = &["settings.json"];

const BACKUP_PREFIX: &str = "backup_";
const NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

pub struct BackupService {
    data_dir: PathBuf,
}

impl BackupService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    fn zip_files(&self, target: &PathBuf, files: &[&str]) -> Result<()> {
        let file = File::create(target).context("failed to create backup file")?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut buffer = Vec::new();
        for name in files {
            let path = self.data_dir.join(name);
            if !path.exists() {
                continue;
            }
            zip.start_file(*name, options)?;
            buffer.clear();
            File::open(&path)?.read_to_end(&mut buffer)?;
            zip.write_all(&buffer)?;
        }
        zip.finish()?;
        Ok(())
    }

    /// Create a timestamped backup of the data and config files.
    pub fn create(&self, max_backups: Option<usize>) -> Result<BackupMetadata> {
        let existing: Vec<&str> = DATA_FILES
            .iter()
            .copied()
            .filter(|f| self.data_dir.join(f).exists())
            .collect();
        if existing.is_empty() {
            anyhow::bail!("no data files found to back up");
        }

        fs::create_dir_all(self.backups_dir())?;

        let now = Local::now().naive_local();
        let backup_name = format!("{}{}.zip", BACKUP_PREFIX, now.format(NAME_FORMAT));
        let backup_path = self.backups_dir().join(&backup_name);

        let mut files = existing;
        files.extend(CONFIG_FILES.iter().copied());
        self.zip_files(&backup_path, &files)?;

        let size_bytes = fs::metadata(&backup_path)?.len();

        if let Some(max) = max_backups {
            self.apply_retention(max)?;
        }

        Ok(BackupMetadata {
            name: backup_name,
            created_at: now,
            size_bytes,
        })
    }

    /// List all backups, newest first.
    pub fn list(&self) -> Result<Vec<BackupMetadata>> {
        let backups_dir = self.backups_dir();
        if !backups_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();
            if !name.starts_with(BACKUP_PREFIX) {
                continue;
            }

            let created_at = parse_backup_time(&name);
            let size_bytes = fs::metadata(&path)?.len();
            backups.push(BackupMetadata {
                name,
                created_at,
                size_bytes,
            });
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Restore the data files from a backup.
    ///
    /// The current state is archived first so a restore can be undone.
    pub fn restore(&self, backup_name: &str) -> Result<()> {
        let backup_path = self.backups_dir().join(backup_name);
        if !backup_path.exists() {
            anyhow::bail!("backup not found: {}", backup_name);
        }

        // Safety copy of whatever is on disk right now
        let has_data = DATA_FILES.iter().any(|f| self.data_dir.join(f).exists());
        if has_data {
            let now = Local::now().naive_local();
            let pre_restore = format!("{}pre_restore_{}.zip", BACKUP_PREFIX, now.format(NAME_FORMAT));
            let pre_restore_path = self.backups_dir().join(pre_restore);
            let mut files: Vec<&str> = DATA_FILES.to_vec();
            files.extend(CONFIG_FILES.iter().copied());
            self.zip_files(&pre_restore_path, &files)?;
        }

        let file = File::open(&backup_path)?;
        let mut archive = ZipArchive::new(file)?;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            // Only plain file names; anything with a path component is not ours
            if name.contains('/') || name.contains('\\') {
                continue;
            }
            let mut outfile = File::create(self.data_dir.join(&name))?;
            std::io::copy(&mut entry, &mut outfile)?;
        }

        Ok(())
    }

    /// Delete all backups.
    pub fn clear(&self) -> Result<ClearResult> {
        let backups = self.list()?;
        let deleted = backups.len();
        for backup in &backups {
            fs::remove_file(self.backups_dir().join(&backup.name))?;
        }
        Ok(ClearResult { deleted })
    }

    fn apply_retention(&self, max_backups: usize) -> Result<()> {
        let mut backups = self.list()?;
        while backups.len() > max_backups {
            if let Some(oldest) = backups.pop() {
                fs::remove_file(self.backups_dir().join(&oldest.name))?;
            }
        }
        Ok(())
    }
}

/// Parse the creation time out of `backup_YYYYMMDD_HHMMSS.zip`.
fn parse_backup_time(backup_name: &str) -> NaiveDateTime {
    backup_name
        .strip_prefix(BACKUP_PREFIX)
        .and_then(|s| s.strip_suffix(".zip"))
        .and_then(|ts| NaiveDateTime::parse_from_str(ts, NAME_FORMAT).ok())
        .unwrap_or_else(|| Local::now().naive_local())
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupMetadata {
    pub name: String,
    pub created_at: NaiveDateTime,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::USERS_FILE;
    use tempfile::tempdir;

    fn write_data_files(dir: &std::path::Path) {
        for name in DATA_FILES {
            fs::write(dir.join(name), format!("{} contents\n", name)).unwrap();
        }
    }

    #[test]
    fn test_create_requires_data_files() {
        let dir = tempdir().unwrap();
        let service = BackupService::new(dir.path().to_path_buf());
        assert!(service.create(None).is_err());
    }

    #[test]
    fn test_create_list_and_clear() {
        let dir = tempdir().unwrap();
        write_data_files(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());

        let metadata = service.create(None).unwrap();
        assert!(metadata.name.starts_with(BACKUP_PREFIX));
        assert!(metadata.size_bytes > 0);

        let backups = service.list().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].name, metadata.name);

        let cleared = service.clear().unwrap();
        assert_eq!(cleared.deleted, 1);
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_restore_round_trip() {
        let dir = tempdir().unwrap();
        write_data_files(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());

        let metadata = service.create(None).unwrap();

        // Corrupt the live data, then restore
        fs::write(dir.path().join(USERS_FILE), "tampered\n").unwrap();
        service.restore(&metadata.name).unwrap();

        let restored = fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
        assert_eq!(restored, format!("{} contents\n", USERS_FILE));

        // A pre-restore safety backup was created
        let backups = service.list().unwrap();
        assert!(backups.iter().any(|b| b.name.contains("pre_restore")));
    }

    #[test]
    fn test_parse_backup_time() {
        let parsed = parse_backup_time("backup_20240304_091500.zip");
        assert_eq!(
            parsed,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap()
        );
    }
}
