use std::{
    fs::File,
    io::{ErrorKind, Read, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs4::fs_std::FileExt;
use tracing::{debug, instrument};

use super::entities::{Frame, FrameRow};

/// Interface for abstracting access to the frames file.
#[cfg_attr(test, mockall::automock)]
pub trait FrameStorage {
    /// Reads every frame from persistent storage. A file that does not
    /// exist yet is an empty store.
    fn load(&self) -> Result<FrameStore>;

    /// Writes the whole store back, replacing whatever was on disk.
    fn save(&self, store: &FrameStore) -> Result<()>;
}

/// Insertion-ordered frames plus a dirty flag. Watson keeps the file sorted
/// by start time; the store preserves whatever order the file had.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameStore {
    frames: Vec<Frame>,
    dirty: bool,
}

impl FrameStore {
    /// Rows that stop before they start are repaired on the way in. The
    /// repair alone does not mark the store dirty.
    pub fn new(frames: Vec<Frame>) -> Self {
        let frames = frames.into_iter().map(Frame::normalized).collect();
        Self {
            frames,
            dirty: false,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Start of the frame following `index`. This is the upper bound a stop
    /// edit has to respect.
    pub fn next_start_after(&self, index: usize) -> Option<DateTime<Utc>> {
        self.frames.get(index + 1).map(|frame| frame.start)
    }

    pub fn update_start(&mut self, index: usize, start: DateTime<Utc>, updated_at: DateTime<Utc>) {
        let frame = &mut self.frames[index];
        frame.start = start;
        frame.updated_at = updated_at;
        self.dirty = true;
    }

    pub fn update_stop(&mut self, index: usize, stop: DateTime<Utc>, updated_at: DateTime<Utc>) {
        let frame = &mut self.frames[index];
        frame.stop = stop;
        frame.updated_at = updated_at;
        self.dirty = true;
    }

    pub fn update_project(&mut self, index: usize, project: Arc<str>, updated_at: DateTime<Utc>) {
        let frame = &mut self.frames[index];
        frame.project = project;
        frame.updated_at = updated_at;
        self.dirty = true;
    }

    pub fn update_message(
        &mut self,
        index: usize,
        message: Option<Arc<str>>,
        updated_at: DateTime<Utc>,
    ) {
        let frame = &mut self.frames[index];
        frame.message = message;
        frame.updated_at = updated_at;
        self.dirty = true;
    }

    pub fn remove(&mut self, index: usize) -> Frame {
        self.dirty = true;
        self.frames.remove(index)
    }
}

/// The frames file as Watson leaves it on disk: a single JSON array of rows.
/// Watson may run concurrently, so reads take a shared lock and saves take an
/// exclusive one around the truncate-and-rewrite.
#[derive(Debug)]
pub struct WatsonFrameFile {
    path: PathBuf,
}

impl WatsonFrameFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_locked(&self) -> std::io::Result<String> {
        let mut file = File::open(&self.path)?;
        // Semi-safe acquire-release for a file
        file.lock_shared()?;
        let mut content = String::new();
        let result = file.read_to_string(&mut content);
        file.unlock()?;
        result?;
        Ok(content)
    }

    fn write_locked(&self, content: &[u8]) -> std::io::Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let result = file
            .set_len(0)
            .and_then(|_| file.write_all(content))
            .and_then(|_| file.flush());
        file.unlock()?;
        result
    }
}

impl FrameStorage for WatsonFrameFile {
    #[instrument(skip(self))]
    fn load(&self) -> Result<FrameStore> {
        debug!("Loading frames from {:?}", self.path);
        let content = match self.read_locked() {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FrameStore::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read frames file {:?}", self.path))
            }
        };
        if content.trim().is_empty() {
            return Ok(FrameStore::default());
        }
        // An editor that rewrites the file in place must not skip rows it
        // could not read; they would be gone after the next save.
        let rows: Vec<FrameRow> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse frames file {:?}", self.path))?;
        Ok(FrameStore::new(rows.into_iter().map(Frame::from).collect()))
    }

    #[instrument(skip_all)]
    fn save(&self, store: &FrameStore) -> Result<()> {
        debug!("Saving {} frames to {:?}", store.len(), self.path);
        let rows: Vec<FrameRow> = store.frames().iter().map(FrameRow::from).collect();
        let content = serde_json::to_vec(&rows)?;
        self.write_locked(&content)
            .with_context(|| format!("Failed to write frames file {:?}", self.path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::{FrameStorage, FrameStore, WatsonFrameFile};
    use crate::overview::fixtures::{test_now, week_of_activity};

    const FRAMES_JSON: &str = r#"[
 [1528696800, 1528718400, "hobby", "a3f2b4", [], 1529279940, "activity #0"],
 [1528740000, 1528761600, "hobby", "b5c1d0", ["fun"], 1529279940]
]"#;

    #[test]
    fn test_load_parses_watson_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("frames");
        fs::write(&path, FRAMES_JSON)?;

        let store = WatsonFrameFile::new(path).load()?;

        assert_eq!(store.len(), 2);
        assert_eq!(&*store.frames()[0].project, "hobby");
        assert_eq!(store.frames()[0].message.as_deref(), Some("activity #0"));
        assert_eq!(store.frames()[1].message, None);
        assert_eq!(store.frames()[1].tags, vec!["fun".to_string()]);
        assert!(!store.is_dirty());
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_empty_store() -> Result<()> {
        let dir = tempdir()?;

        let store = WatsonFrameFile::new(dir.path().join("frames")).load()?;

        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_blank_file_is_empty_store() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("frames");
        fs::write(&path, "\n  \n")?;

        let store = WatsonFrameFile::new(path).load()?;

        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_refuses_unparseable_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("frames");
        fs::write(&path, "[[1528696800, oops")?;

        let result = WatsonFrameFile::new(path).load();

        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_save_and_reload_preserves_watson_fields() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("frames");
        fs::write(&path, FRAMES_JSON)?;
        let file = WatsonFrameFile::new(path.clone());

        let mut store = file.load()?;
        store.update_project(0, "work".into(), test_now());
        file.save(&store)?;

        let reloaded = file.load()?;
        assert_eq!(&*reloaded.frames()[0].project, "work");
        assert_eq!(reloaded.frames()[0].id, "a3f2b4");
        assert_eq!(reloaded.frames()[1].tags, vec!["fun".to_string()]);

        // The messageless row must stay 6 elements wide for Watson.
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(raw[0].as_array().map(Vec::len), Some(7));
        assert_eq!(raw[1].as_array().map(Vec::len), Some(6));
        Ok(())
    }

    #[test]
    fn test_mutators_set_dirty_and_refresh_updated_at() {
        let mut store = FrameStore::new(week_of_activity());
        assert!(!store.is_dirty());

        let touched = Utc.with_ymd_and_hms(2018, 6, 18, 8, 0, 0).unwrap();
        store.update_stop(0, store.frames()[0].stop, touched);

        assert!(store.is_dirty());
        assert_eq!(store.frames()[0].updated_at, touched);
    }

    #[test]
    fn test_remove_drops_the_frame() {
        let mut store = FrameStore::new(week_of_activity());
        let second = store.frames()[1].clone();

        let removed = store.remove(0);

        assert!(store.is_dirty());
        assert_ne!(removed, second);
        assert_eq!(store.frames()[0], second);
    }

    #[test]
    fn test_next_start_after() {
        let store = FrameStore::new(week_of_activity());

        assert_eq!(store.next_start_after(0), Some(store.frames()[1].start));
        assert_eq!(store.next_start_after(store.len() - 1), None);
    }
}
