//! `modpak` library.

pub mod commands;
pub mod constants;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod packager;
pub mod pipeline;
pub mod prompt;
pub mod settings;
pub mod styles;

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use identity::*;
pub use manifest::*;
pub use packager::*;
pub use pipeline::*;
pub use prompt::*;
pub use settings::*;
