//! Adapters that connect the DCE core to git, tree-sitter and the filesystem.

pub mod config_loader;
pub mod git;
pub mod paths;
pub mod symbols;

pub use config_loader::ConfigLoader;
pub use git::GitCli;
pub use paths::DcePaths;
pub use symbols::TreeSitterSymbolExtractor;
