//! Mod identity: source directory, package index, name and archive path.

use crate::constants::{FORCED_INDEX_FLAG, INDEX_ARG_PREFIX, PAK_PREFIX, PAK_SUFFIX};
use crate::error::{PakError, PakResult};
use crate::prompt::LineSource;
use std::path::{Path, PathBuf};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const INDEX_PROMPT: &str = "[UnrealPak] Specify index for your mod package";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Everything needed to package one mod. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPackageRequest {
    /// Mod source directory, as given on the command line (cleaned).
    pub source_dir: PathBuf,

    /// Package (chunk) index embedded in the archive name.
    pub index: i32,

    /// Mod name, the last component of `source_dir`.
    pub name: String,

    /// Full path of the archive to produce.
    pub output_file: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ModPackageRequest {
    pub fn new(source_dir: impl Into<PathBuf>, index: i32, output_dir: &Path) -> Self {
        let source_dir = source_dir.into();
        let name = derive_name(&source_dir.to_string_lossy());
        let output_file = output_file_path(output_dir, index, &name);

        Self {
            source_dir,
            index,
            name,
            output_file,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Strip surrounding whitespace and double quotes from a path argument.
pub fn clean_path_arg(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// Final path component of a directory argument.
///
/// Accepts both `/` and `\` as separators and ignores trailing ones.
pub fn derive_name(source_dir: &str) -> String {
    clean_path_arg(source_dir)
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Validate the mod directory argument.
///
/// The directory only ever comes from the command line; a missing or
/// nonexistent directory is a terminal error, never a prompt.
pub fn resolve_mod_directory(arg: Option<&str>) -> PakResult<PathBuf> {
    let cleaned = arg.map(clean_path_arg).unwrap_or_default();
    if cleaned.is_empty() {
        return Err(PakError::MissingModDirectory);
    }

    let dir = PathBuf::from(cleaned);
    if !dir.is_dir() {
        return Err(PakError::ModDirectoryNotFound(dir));
    }

    Ok(dir)
}

/// Parse an index as typed by the operator or given in `-index=`.
pub fn parse_index(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Index forced through legacy arguments.
///
/// Returns `None` unless `-forcedIndex` is present. When it is, the first
/// `-index=<N>` that parses wins; if none does, the index is 0.
pub fn forced_index(args: &[String]) -> Option<i32> {
    if !args.iter().any(|arg| arg == FORCED_INDEX_FLAG) {
        return None;
    }

    let index = args
        .iter()
        .filter_map(|arg| arg.strip_prefix(INDEX_ARG_PREFIX))
        .find_map(parse_index);

    if index.is_none() {
        tracing::warn!(
            "{} given without a valid {}<N>, using 0",
            FORCED_INDEX_FLAG,
            INDEX_ARG_PREFIX
        );
    }

    Some(index.unwrap_or(0))
}

/// Resolve the package index from `args`, prompting until an integer is entered.
pub fn derive_index(args: &[String], lines: &mut dyn LineSource) -> PakResult<i32> {
    if let Some(index) = forced_index(args) {
        return Ok(index);
    }

    loop {
        let answer = lines.read_line(INDEX_PROMPT)?;
        if let Some(index) = parse_index(&answer) {
            return Ok(index);
        }
        tracing::debug!("Rejected index input: {:?}", answer);
    }
}

/// Archive file name for a mod: `pakchunk<index>(<name>)-WindowsNoEditor.pak`.
pub fn pak_file_name(index: i32, name: &str) -> String {
    format!("{}{}({}){}", PAK_PREFIX, index, name, PAK_SUFFIX)
}

/// Full archive path under `output_dir`.
pub fn output_file_path(output_dir: &Path, index: i32, name: &str) -> PathBuf {
    output_dir.join(pak_file_name(index, name))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedLines;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_derive_name() {
        assert_eq!(derive_name("/mods/CookieHat"), "CookieHat");
        assert_eq!(derive_name("/mods/CookieHat/"), "CookieHat");
        assert_eq!(derive_name("\"/mods/CookieHat\""), "CookieHat");
        assert_eq!(derive_name("  \"/mods/CookieHat/\"  "), "CookieHat");
        assert_eq!(derive_name(r"C:\ModFiles\CookieHat"), "CookieHat");
        assert_eq!(derive_name(r"C:\ModFiles\CookieHat\"), "CookieHat");
        assert_eq!(derive_name("CookieHat"), "CookieHat");
    }

    #[test]
    fn test_pak_file_name() {
        assert_eq!(
            pak_file_name(3, "CookieHat"),
            "pakchunk3(CookieHat)-WindowsNoEditor.pak"
        );
        assert_eq!(
            pak_file_name(-7, "Hat"),
            "pakchunk-7(Hat)-WindowsNoEditor.pak"
        );
    }

    #[test]
    fn test_output_file_path_is_deterministic() {
        let a = output_file_path(Path::new("/out"), 3, "CookieHat");
        let b = output_file_path(Path::new("/out"), 3, "CookieHat");
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("/out/pakchunk3(CookieHat)-WindowsNoEditor.pak"));
    }

    #[test]
    fn test_request_from_cookie_hat() {
        let request = ModPackageRequest::new("/mods/CookieHat", 3, Path::new("/out"));
        assert_eq!(request.name, "CookieHat");
        assert_eq!(
            request.output_file,
            PathBuf::from("/out/pakchunk3(CookieHat)-WindowsNoEditor.pak")
        );
    }

    #[test]
    fn test_forced_index() {
        assert_eq!(forced_index(&args(&["-forcedIndex", "-index=12"])), Some(12));
        assert_eq!(forced_index(&args(&["-index=-4", "-forcedIndex"])), Some(-4));
        assert_eq!(
            forced_index(&args(&["-forcedIndex", "-index=abc", "-index=9"])),
            Some(9)
        );
        assert_eq!(forced_index(&args(&["-forcedIndex", "-index=abc"])), Some(0));
        assert_eq!(forced_index(&args(&["-forcedIndex"])), Some(0));
        assert_eq!(forced_index(&args(&["-index=5"])), None);
        assert_eq!(forced_index(&[]), None);
    }

    #[test]
    fn test_forced_index_extremes() {
        for n in [i32::MIN, -1, 0, 1, i32::MAX] {
            let list = vec!["-forcedIndex".to_string(), format!("-index={}", n)];
            assert_eq!(forced_index(&list), Some(n));
        }
    }

    #[test]
    fn test_derive_index_prompts_until_integer() {
        let mut lines = ScriptedLines::new(["", "three", "3.5", " 42 "]);
        let index = derive_index(&[], &mut lines).unwrap();
        assert_eq!(index, 42);
        assert_eq!(lines.prompts().len(), 4);
    }

    #[test]
    fn test_derive_index_ignores_index_without_marker() {
        let mut lines = ScriptedLines::new(["8"]);
        let index = derive_index(&args(&["-index=5"]), &mut lines).unwrap();
        assert_eq!(index, 8);
    }

    #[test]
    fn test_derive_index_forced_never_prompts() {
        let mut lines = ScriptedLines::default();
        let index = derive_index(&args(&["-forcedIndex", "-index=2"]), &mut lines).unwrap();
        assert_eq!(index, 2);
        assert!(lines.prompts().is_empty());
    }

    #[test]
    fn test_resolve_mod_directory() {
        assert!(matches!(
            resolve_mod_directory(None),
            Err(PakError::MissingModDirectory)
        ));
        assert!(matches!(
            resolve_mod_directory(Some("\"\"")),
            Err(PakError::MissingModDirectory)
        ));
        assert!(matches!(
            resolve_mod_directory(Some("/no/such/mod")),
            Err(PakError::ModDirectoryNotFound(_))
        ));

        let dir = TempDir::new().unwrap();
        let quoted = format!("\"{}\"", dir.path().display());
        assert_eq!(resolve_mod_directory(Some(&quoted)).unwrap(), dir.path());
    }
}
