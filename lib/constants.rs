//! Constants for modpak.
//!
//! This module contains all file name and path constants.
//! Review these to ensure they match your engine installation.

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Sentinel file holding the engine installation directory.
pub const ENGINE_DIRECTORY_FILE: &str = "EngineDirectory.txt";

/// Sentinel file holding the archive output directory.
pub const OUTPUT_DIRECTORY_FILE: &str = "OutputDirectory.txt";

/// Sentinel file holding the raw packaging flags.
pub const PACKAGING_ARGUMENTS_FILE: &str = "PackagingArguments.txt";

/// Optional banner printed before anything else.
pub const STARTUP_MESSAGE_FILE: &str = "StartupMessage.txt";

/// Transient manifest consumed by the packager.
pub const MANIFEST_FILE: &str = "filesList.txt";

/// Flags used when no `PackagingArguments.txt` exists.
pub const DEFAULT_PACKAGING_FLAGS: &str = "-compress";

/// Packager location relative to the engine installation directory.
pub const PACKAGER_RELATIVE_PATH: [&str; 4] = ["Engine", "Binaries", "Win64", "UnrealPak.exe"];

/// Output folder used with `--packaged`, relative to the working directory.
pub const PACKAGED_DIR: &str = "Packaged";

/// Second tree included by every manifest: the game's own root.
pub const GAME_ROOT_GLOB: &str = r"..\..\..\*.*";

/// Archive name prefix, followed by the package index.
pub const PAK_PREFIX: &str = "pakchunk";

/// Archive name suffix, following the parenthesised mod name.
pub const PAK_SUFFIX: &str = "-WindowsNoEditor.pak";

/// Legacy token that switches index resolution to the `-index=` argument.
pub const FORCED_INDEX_FLAG: &str = "-forcedIndex";

/// Legacy prefix carrying the forced package index.
pub const INDEX_ARG_PREFIX: &str = "-index=";
