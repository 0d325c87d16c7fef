//! Persisted packaging settings.
//!
//! Each setting lives in its own sentinel file. The first run prompts for a
//! missing value and stores it; later runs read it back verbatim without
//! checking that it is still valid. Storage goes through [`SettingsBackend`]
//! so the resolution rules can be exercised without touching the filesystem.

use crate::constants::{
    DEFAULT_PACKAGING_FLAGS, ENGINE_DIRECTORY_FILE, OUTPUT_DIRECTORY_FILE, PACKAGED_DIR,
    PACKAGING_ARGUMENTS_FILE,
};
use crate::error::PakResult;
use crate::prompt::LineSource;
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A persisted setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    /// Engine installation directory.
    EngineDirectory,
    /// Directory the archive is written to.
    OutputDirectory,
    /// Raw flags appended to the packager command line.
    PackagingFlags,
}

/// Storage for setting values.
pub trait SettingsBackend {
    /// Load the stored value for `key`, trimmed. `None` if nothing is stored.
    fn load(&self, key: SettingKey) -> PakResult<Option<String>>;

    /// Store `value` for `key`. An existing value is left untouched.
    fn store(&mut self, key: SettingKey, value: &str) -> PakResult<()>;
}

/// Sentinel files in a configuration directory, one file per setting.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

/// In-memory storage, used when sentinel files must not be touched.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: BTreeMap<SettingKey, String>,
}

/// Resolves settings from a backend, prompting for missing values.
#[derive(Debug)]
pub struct SettingsStore<B> {
    backend: B,
}

/// Settings resolved for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingConfiguration {
    /// Engine installation directory.
    pub engine_dir: PathBuf,

    /// Directory the archive is written to.
    pub output_dir: PathBuf,

    /// Raw packaging flags, passed through unparsed.
    pub flags: String,
}

/// Per-run values that take precedence over stored settings. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub engine_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub flags: Option<String>,

    /// Write into the fixed `Packaged` folder instead of an output directory.
    pub packaged: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SettingKey {
    /// Sentinel file name for this setting.
    pub fn file_name(self) -> &'static str {
        match self {
            SettingKey::EngineDirectory => ENGINE_DIRECTORY_FILE,
            SettingKey::OutputDirectory => OUTPUT_DIRECTORY_FILE,
            SettingKey::PackagingFlags => PACKAGING_ARGUMENTS_FILE,
        }
    }

    /// Prompt shown when the value must be acquired. `None` for settings
    /// that fall back to a default instead.
    fn prompt(self) -> Option<&'static str> {
        match self {
            SettingKey::EngineDirectory => {
                Some("[Engine Directory] Specify your Unreal Engine installation directory")
            }
            SettingKey::OutputDirectory => {
                Some("[Output Directory] Specify destination folder for your mods")
            }
            SettingKey::PackagingFlags => None,
        }
    }
}

impl FileBackend {
    /// Sentinel files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the sentinel file for `key`.
    pub fn path_for(&self, key: SettingKey) -> PathBuf {
        self.root.join(key.file_name())
    }
}

impl MemoryBackend {
    /// Builder-style insert.
    pub fn with(mut self, key: SettingKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Raw stored value, untrimmed.
    pub fn get(&self, key: SettingKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<B: SettingsBackend> SettingsStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Resolve `key`: stored value first, then the operator.
    ///
    /// Path settings loop until the entered value is a usable directory and
    /// persist the answer. Packaging flags are never prompted: without a
    /// stored value the built-in default is used and nothing is written.
    pub fn resolve(&mut self, key: SettingKey, lines: &mut dyn LineSource) -> PakResult<String> {
        if let Some(value) = self.backend.load(key)? {
            tracing::debug!("Using stored {:?}: {}", key, value);
            return Ok(value);
        }

        let Some(prompt) = key.prompt() else {
            tracing::debug!("No stored {:?}, using default", key);
            return Ok(DEFAULT_PACKAGING_FLAGS.to_string());
        };

        let accept: fn(&str) -> bool = match key {
            SettingKey::OutputDirectory => ensure_directory,
            _ => is_existing_directory,
        };
        let value = acquire(prompt, lines, accept)?;

        self.backend.store(key, &value)?;
        println!(
            "  {} [{}] Path has been stored.",
            "✓".bright_green(),
            key.file_name()
        );

        Ok(value)
    }

    pub fn resolve_engine_dir(&mut self, lines: &mut dyn LineSource) -> PakResult<PathBuf> {
        self.resolve(SettingKey::EngineDirectory, lines)
            .map(PathBuf::from)
    }

    pub fn resolve_output_dir(&mut self, lines: &mut dyn LineSource) -> PakResult<PathBuf> {
        self.resolve(SettingKey::OutputDirectory, lines)
            .map(PathBuf::from)
    }

    pub fn resolve_flags(&mut self, lines: &mut dyn LineSource) -> PakResult<String> {
        self.resolve(SettingKey::PackagingFlags, lines)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl SettingsBackend for FileBackend {
    fn load(&self, key: SettingKey) -> PakResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&mut self, key: SettingKey, value: &str) -> PakResult<()> {
        let path = self.path_for(key);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::warn!("{} already exists, keeping it", path.display());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(value.as_bytes())?;
        tracing::info!("Stored {:?} in {}", key, path.display());
        Ok(())
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self, key: SettingKey) -> PakResult<Option<String>> {
        Ok(self.values.get(&key).map(|v| v.trim().to_string()))
    }

    fn store(&mut self, key: SettingKey, value: &str) -> PakResult<()> {
        self.values
            .entry(key)
            .or_insert_with(|| value.to_string());
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Resolve every setting for this run, applying `overrides` first.
pub fn resolve_configuration<B: SettingsBackend>(
    store: &mut SettingsStore<B>,
    lines: &mut dyn LineSource,
    overrides: &SettingsOverrides,
) -> PakResult<PackagingConfiguration> {
    let engine_dir = match &overrides.engine_dir {
        Some(dir) => dir.clone(),
        None => store.resolve_engine_dir(lines)?,
    };

    let output_dir = match &overrides.output_dir {
        Some(dir) => dir.clone(),
        None if overrides.packaged => {
            let dir = PathBuf::from(PACKAGED_DIR);
            std::fs::create_dir_all(&dir)?;
            dir
        }
        None => store.resolve_output_dir(lines)?,
    };

    let flags = match &overrides.flags {
        Some(flags) => flags.clone(),
        None => store.resolve_flags(lines)?,
    };

    Ok(PackagingConfiguration {
        engine_dir,
        output_dir,
        flags,
    })
}

/// Accepts a value naming an existing directory.
pub fn is_existing_directory(value: &str) -> bool {
    !value.is_empty() && Path::new(value).is_dir()
}

/// Accepts a value naming a directory, creating it if needed.
///
/// Creation failures are swallowed; the value is simply rejected.
pub fn ensure_directory(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }

    let path = Path::new(value);
    if !path.is_dir()
        && let Err(e) = std::fs::create_dir_all(path)
    {
        tracing::debug!("Could not create {}: {}", path.display(), e);
    }

    path.is_dir()
}

/// Prompt until `accept` passes.
fn acquire(
    prompt: &str,
    lines: &mut dyn LineSource,
    accept: fn(&str) -> bool,
) -> PakResult<String> {
    loop {
        let value = lines.read_line(prompt)?;
        if accept(&value) {
            return Ok(value);
        }
        tracing::debug!("Rejected directory input: {:?}", value);
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PakError;
    use crate::prompt::ScriptedLines;
    use tempfile::TempDir;

    #[test]
    fn test_stored_value_skips_prompt() {
        let backend = MemoryBackend::default().with(SettingKey::EngineDirectory, "  /ue/5.1 \n");
        let mut store = SettingsStore::new(backend);
        let mut lines = ScriptedLines::default();

        let value = store
            .resolve(SettingKey::EngineDirectory, &mut lines)
            .unwrap();
        assert_eq!(value, "/ue/5.1");
        assert!(lines.prompts().is_empty());
    }

    #[test]
    fn test_stored_value_is_not_revalidated() {
        let backend =
            MemoryBackend::default().with(SettingKey::OutputDirectory, "/does/not/exist/anywhere");
        let mut store = SettingsStore::new(backend);
        let mut lines = ScriptedLines::default();

        let dir = store.resolve_output_dir(&mut lines).unwrap();
        assert_eq!(dir, PathBuf::from("/does/not/exist/anywhere"));
    }

    #[test]
    fn test_engine_dir_prompts_until_existing() {
        let engine = TempDir::new().unwrap();
        let engine_str = engine.path().to_str().unwrap().to_string();
        let mut store = SettingsStore::new(MemoryBackend::default());
        let mut lines = ScriptedLines::new(["", "/no/such/engine", engine_str.as_str()]);

        let dir = store.resolve_engine_dir(&mut lines).unwrap();
        assert_eq!(dir, engine.path());
        assert_eq!(lines.prompts().len(), 3);
        assert_eq!(
            store.backend().get(SettingKey::EngineDirectory),
            Some(engine_str.as_str())
        );
    }

    #[test]
    fn test_output_dir_is_created() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("nested").join("out");
        let target_str = target.to_str().unwrap().to_string();
        let mut store = SettingsStore::new(MemoryBackend::default());
        let mut lines = ScriptedLines::new([target_str.as_str()]);

        let dir = store.resolve_output_dir(&mut lines).unwrap();
        assert_eq!(dir, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_output_dir_reprompts_when_creation_fails() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let bad = blocker.join("out");
        let good = root.path().join("out");
        let mut store = SettingsStore::new(MemoryBackend::default());
        let mut lines = ScriptedLines::new([bad.to_str().unwrap(), good.to_str().unwrap()]);

        let dir = store.resolve_output_dir(&mut lines).unwrap();
        assert_eq!(dir, good);
        assert_eq!(lines.prompts().len(), 2);
    }

    #[test]
    fn test_flags_default_without_prompt_or_persist() {
        let mut store = SettingsStore::new(MemoryBackend::default());
        let mut lines = ScriptedLines::default();

        let flags = store.resolve_flags(&mut lines).unwrap();
        assert_eq!(flags, DEFAULT_PACKAGING_FLAGS);
        assert!(lines.prompts().is_empty());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_acquisition_stops_when_input_closes() {
        let mut store = SettingsStore::new(MemoryBackend::default());
        let mut lines = ScriptedLines::new(["/no/such/dir"]);

        let result = store.resolve_engine_dir(&mut lines);
        assert!(matches!(result, Err(PakError::InputClosed)));
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_file_backend_round_trip_and_no_overwrite() {
        let dir = TempDir::new().unwrap();
        let mut backend = FileBackend::new(dir.path());

        assert_eq!(backend.load(SettingKey::PackagingFlags).unwrap(), None);

        backend
            .store(SettingKey::PackagingFlags, "-compress -patchpaddingalign=2048\n")
            .unwrap();
        backend
            .store(SettingKey::PackagingFlags, "-overwritten")
            .unwrap();

        assert_eq!(
            backend.load(SettingKey::PackagingFlags).unwrap().as_deref(),
            Some("-compress -patchpaddingalign=2048")
        );
        assert!(dir.path().join(PACKAGING_ARGUMENTS_FILE).is_file());
    }

    #[test]
    fn test_resolve_configuration_overrides_win() {
        let backend = MemoryBackend::default()
            .with(SettingKey::EngineDirectory, "/stored/engine")
            .with(SettingKey::OutputDirectory, "/stored/out")
            .with(SettingKey::PackagingFlags, "-stored");
        let mut store = SettingsStore::new(backend);
        let mut lines = ScriptedLines::default();
        let overrides = SettingsOverrides {
            engine_dir: Some(PathBuf::from("/cli/engine")),
            output_dir: None,
            flags: Some("-compress -encrypt".to_string()),
            packaged: false,
        };

        let config = resolve_configuration(&mut store, &mut lines, &overrides).unwrap();
        assert_eq!(config.engine_dir, PathBuf::from("/cli/engine"));
        assert_eq!(config.output_dir, PathBuf::from("/stored/out"));
        assert_eq!(config.flags, "-compress -encrypt");

        let backend = store.into_backend();
        assert_eq!(backend.len(), 3);
        assert_eq!(backend.get(SettingKey::EngineDirectory), Some("/stored/engine"));
    }

    #[test]
    fn test_predicates() {
        let dir = TempDir::new().unwrap();
        assert!(is_existing_directory(dir.path().to_str().unwrap()));
        assert!(!is_existing_directory(""));
        assert!(!is_existing_directory("/definitely/not/here"));
        assert!(!ensure_directory(""));
    }
}
