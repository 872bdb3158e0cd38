//! budgetbud-storage-json
//!
//! One pretty-printed JSON file per user book, plus timestamped backups.

use std::{
    cmp::Reverse,
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use budgetbud_core::{
    storage::{book_warnings, BookBackupInfo, BookStorage, BookUpdate},
    CoreError,
};
use budgetbud_domain::BudgetBook;
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

const BOOK_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;
const AUTO_BACKUP_DIR: &str = "auto";

/// Filesystem-backed JSON persistence for budget books and their backups.
///
/// Layout: `<books_dir>/<slug>.json`, requested backups at
/// `<backups_dir>/<slug>/<slug>_<YYYYMMDD_HHMMSS>[-n][_note].json` and the
/// snapshots taken before each overwrite under `<backups_dir>/<slug>/auto/`.
/// Each folder keeps its own `retention` newest files.
#[derive(Clone)]
pub struct JsonBookStorage {
    books_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl JsonBookStorage {
    pub fn new(books_dir: PathBuf, backups_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(books_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        books_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> Result<Self, CoreError> {
        fs::create_dir_all(&books_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            books_dir,
            backups_dir,
            retention: retention.max(1),
            locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn book_path(&self, user_id: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", user_slug(user_id), BOOK_EXTENSION))
    }

    fn backup_dir(&self, user_id: &str) -> PathBuf {
        self.backups_dir.join(user_slug(user_id))
    }

    fn auto_backup_dir(&self, user_id: &str) -> PathBuf {
        self.backup_dir(user_id).join(AUTO_BACKUP_DIR)
    }

    fn user_lock(&self, user_id: &str) -> Result<Arc<Mutex<()>>, CoreError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| CoreError::Storage("book lock table poisoned".into()))?;
        Ok(locks
            .entry(user_slug(user_id))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    fn read_book(&self, user_id: &str) -> Result<BudgetBook, CoreError> {
        let path = self.book_path(user_id);
        if !path.exists() {
            debug!(user = user_id, "no stored book; starting empty");
            return Ok(BudgetBook::new(user_id));
        }
        let book = load_book_from_path(&path)?;
        if book.user_id != user_id {
            return Err(CoreError::Storage(format!(
                "{} belongs to `{}`, not `{}`",
                path.display(),
                book.user_id,
                user_id
            )));
        }
        for warning in book_warnings(&book) {
            warn!(user = user_id, "{warning}");
        }
        Ok(book)
    }

    /// Snapshots the previous file into the backups folder, then replaces it.
    fn write_book(&self, book: &BudgetBook) -> Result<(), CoreError> {
        let path = self.book_path(&book.user_id);
        if path.exists() {
            let dir = self.auto_backup_dir(&book.user_id);
            let (_, backup) = next_backup(&dir, &user_slug(&book.user_id), None)?;
            fs::copy(&path, &backup)?;
            self.prune_backups(&book.user_id, BackupKind::Automatic)?;
        }
        save_book_to_path(book, &path)
    }

    /// Backups of one kind, newest first.
    fn scan_backups(
        &self,
        user_id: &str,
        kind: BackupKind,
    ) -> Result<Vec<BookBackupInfo>, CoreError> {
        let dir = match kind {
            BackupKind::Requested => self.backup_dir(user_id),
            BackupKind::Automatic => self.auto_backup_dir(user_id),
        };
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = user_slug(user_id);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION)
            {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let id = match kind {
                BackupKind::Requested => file_name.to_string(),
                BackupKind::Automatic => format!("{AUTO_BACKUP_DIR}/{file_name}"),
            };
            let Some(created_at) = backup_created_at(&slug, &id) else {
                continue;
            };
            entries.push(BookBackupInfo {
                user_id: user_id.to_string(),
                id,
                created_at,
                path: path.clone(),
            });
        }
        sort_newest_first(&slug, &mut entries);
        Ok(entries)
    }

    fn prune_backups(&self, user_id: &str, kind: BackupKind) -> Result<(), CoreError> {
        for stale in self
            .scan_backups(user_id, kind)?
            .into_iter()
            .skip(self.retention)
        {
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(path = %stale.path.display(), "failed to prune backup: {err}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackupKind {
    /// Made through `backup_book`, optionally with a note.
    Requested,
    /// Snapshot of the previous file taken before an overwrite.
    Automatic,
}

impl BookStorage for JsonBookStorage {
    fn load_book(&self, user_id: &str) -> Result<BudgetBook, CoreError> {
        let lock = self.user_lock(user_id)?;
        let _guard = acquire(&lock)?;
        self.read_book(user_id)
    }

    fn save_book(&self, book: &BudgetBook) -> Result<(), CoreError> {
        let lock = self.user_lock(&book.user_id)?;
        let _guard = acquire(&lock)?;
        self.write_book(book)
    }

    fn list_users(&self) -> Result<Vec<String>, CoreError> {
        let mut users = Vec::new();
        for entry in fs::read_dir(&self.books_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION)
            {
                continue;
            }
            let owner: BookOwner = serde_json::from_str(&fs::read_to_string(&path)?)
                .map_err(|err| CoreError::Serde(format!("{}: {err}", path.display())))?;
            users.push(owner.user_id);
        }
        users.sort();
        Ok(users)
    }

    fn delete_book(&self, user_id: &str) -> Result<(), CoreError> {
        let lock = self.user_lock(user_id)?;
        let _guard = acquire(&lock)?;
        let path = self.book_path(user_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn update_book(
        &self,
        user_id: &str,
        update: &mut BookUpdate<'_>,
    ) -> Result<BudgetBook, CoreError> {
        let lock = self.user_lock(user_id)?;
        let _guard = acquire(&lock)?;
        let mut book = self.read_book(user_id)?;
        update(&mut book)?;
        self.write_book(&book)?;
        Ok(book)
    }

    fn backup_book(&self, user_id: &str, note: Option<&str>) -> Result<BookBackupInfo, CoreError> {
        let lock = self.user_lock(user_id)?;
        let _guard = acquire(&lock)?;
        let book = self.read_book(user_id)?;
        let (id, path) = next_backup(&self.backup_dir(user_id), &user_slug(user_id), note)?;
        write_file(&path, &serialize_book(&book)?)?;
        debug!(user = user_id, backup = %id, "wrote book backup");
        self.prune_backups(user_id, BackupKind::Requested)?;

        let created_at = backup_created_at(&user_slug(user_id), &id).unwrap_or_default();
        Ok(BookBackupInfo {
            user_id: user_id.to_string(),
            id,
            created_at,
            path,
        })
    }

    fn list_backups(&self, user_id: &str) -> Result<Vec<BookBackupInfo>, CoreError> {
        let mut entries = self.scan_backups(user_id, BackupKind::Requested)?;
        entries.extend(self.scan_backups(user_id, BackupKind::Automatic)?);
        sort_newest_first(&user_slug(user_id), &mut entries);
        Ok(entries)
    }

    fn restore_backup(&self, backup: &BookBackupInfo) -> Result<BudgetBook, CoreError> {
        if !backup.path.is_file() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let book = load_book_from_path(&backup.path)?;
        if book.user_id != backup.user_id {
            return Err(CoreError::Storage(format!(
                "backup `{}` belongs to `{}`",
                backup.id, book.user_id
            )));
        }
        let lock = self.user_lock(&backup.user_id)?;
        let _guard = acquire(&lock)?;
        self.write_book(&book)?;
        info!(user = %book.user_id, backup = %backup.id, "book restored");
        Ok(book)
    }
}

#[derive(Deserialize)]
struct BookOwner {
    user_id: String,
}

/// Saves a book to an arbitrary path via a temp file and rename.
pub fn save_book_to_path(book: &BudgetBook, path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_file(&tmp, &serialize_book(book)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_book_from_path(path: &Path) -> Result<BudgetBook, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|err| CoreError::Serde(format!("{}: {err}", path.display())))
}

fn acquire(lock: &Mutex<()>) -> Result<MutexGuard<'_, ()>, CoreError> {
    lock.lock()
        .map_err(|_| CoreError::Storage("book lock poisoned".into()))
}

/// File name stem for a user id. Lowercase ASCII letters, digits and `-`
/// are kept; every other byte becomes `_xx`, so distinct ids never share a
/// file.
fn user_slug(user_id: &str) -> String {
    if user_id.is_empty() {
        return "_".into();
    }
    let mut slug = String::with_capacity(user_id.len());
    for byte in user_id.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => slug.push(char::from(byte)),
            _ => slug.push_str(&format!("_{byte:02x}")),
        }
    }
    slug
}

/// Picks a free backup file name in `dir` for the current second.
fn next_backup(dir: &Path, slug: &str, note: Option<&str>) -> Result<(String, PathBuf), CoreError> {
    fs::create_dir_all(dir)?;
    let stamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
    let label = sanitize_note(note);

    let mut sequence = 1;
    loop {
        let mut stem = format!("{slug}_{stamp}");
        if sequence > 1 {
            stem.push_str(&format!("-{sequence}"));
        }
        if let Some(label) = &label {
            stem.push('_');
            stem.push_str(label);
        }
        let id = format!("{stem}.{BOOK_EXTENSION}");
        let path = dir.join(&id);
        if !path.exists() {
            return Ok((id, path));
        }
        sequence += 1;
    }
}

fn sort_newest_first(slug: &str, entries: &mut [BookBackupInfo]) {
    entries.sort_by_cached_key(|info| Reverse(backup_sort_key(slug, &info.id)));
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let mut label = String::new();
    for ch in note?.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            label.push(ch.to_ascii_lowercase());
        } else if !label.is_empty() && !label.ends_with('-') {
            label.push('-');
        }
    }
    let label = label.trim_end_matches('-');
    (!label.is_empty()).then(|| label.to_string())
}

/// Stamp and sequence of a backup id, with the id itself breaking ties.
fn backup_sort_key(slug: &str, id: &str) -> Option<(String, u32, String)> {
    let file_name = id
        .strip_prefix(AUTO_BACKUP_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(id);
    let rest = file_name.strip_prefix(slug)?.strip_prefix('_')?;
    let stamp = rest.get(..15)?;
    let tail = &rest[15..];
    let sequence = match tail.strip_prefix('-') {
        Some(seq) => seq
            .split(|c: char| c == '_' || c == '.')
            .next()?
            .parse()
            .ok()?,
        None => 1,
    };
    Some((stamp.to_string(), sequence, id.to_string()))
}

fn backup_created_at(slug: &str, id: &str) -> Option<String> {
    let (stamp, _, _) = backup_sort_key(slug, id)?;
    NaiveDateTime::parse_from_str(&stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".");
    tmp.push(TMP_SUFFIX);
    PathBuf::from(tmp)
}

fn write_file(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_book(book: &BudgetBook) -> Result<String, CoreError> {
    serde_json::to_string_pretty(book).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_filesystem_safe_and_distinct() {
        assert_eq!(user_slug("bob-2"), "bob-2");
        assert_eq!(user_slug("Alice Smith"), "_41lice_20_53mith");
        assert_eq!(user_slug("../"), "_2e_2e_2f");
        assert_eq!(user_slug(""), "_");

        let ids = ["alice", "Alice", "a.b", "a_b", "a_2eb", "_", ""];
        let slugs: std::collections::HashSet<_> = ids.iter().map(|id| user_slug(id)).collect();
        assert_eq!(slugs.len(), ids.len());
    }

    #[test]
    fn backup_keys_order_sequences() {
        let first = backup_sort_key("alice", "alice_20240312_093000.json").unwrap();
        let second = backup_sort_key("alice", "alice_20240312_093000-2_pre-trip.json").unwrap();
        assert!(second > first);
        assert_eq!(
            backup_created_at("alice", "alice_20240312_093000.json").as_deref(),
            Some("2024-03-12 09:30:00")
        );
        assert!(backup_sort_key("alice", "bob_20240312_093000.json").is_none());
    }

    #[test]
    fn same_second_backups_order_by_id() {
        let plain = backup_sort_key("bob", "bob_20240312_093000.json").unwrap();
        let noted = backup_sort_key("bob", "bob_20240312_093000_pre-trip.json").unwrap();
        let auto = backup_sort_key("bob", "auto/bob_20240312_093000.json").unwrap();
        assert_eq!((&plain.0, plain.1), (&noted.0, noted.1));
        assert!(noted > plain);
        assert!(plain > auto);
        assert_eq!(
            backup_created_at("bob", "auto/bob_20240312_093000.json").as_deref(),
            Some("2024-03-12 09:30:00")
        );
    }
}
