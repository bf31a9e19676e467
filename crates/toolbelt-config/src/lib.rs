//! Configuration resolution and merging for toolbelt
//!
//! This crate turns a project directory into one effective
//! [`ToolbeltConfig`]:
//!
//! - **Discovery**: explicit paths, `pyproject.toml` includes, or a
//!   standalone `toolbelt.yaml` / `toolbelt.yml` / `toolbelt.py`
//! - **Includes**: depth-first expansion of `include` directives, with
//!   `@package:path` references into bundled resources and cycle detection
//! - **Merging**: a raw merge while expanding includes, then a typed merge
//!   across top-level files, then the allow-listed environment overlay
//! - **Templates**: `${NAME}` / `${NAME:default}` expansion when a tool's
//!   command line is materialized
//!
//! ```text
//! discovery -> load file -> includes -> parse -> typed merge -> env overlay
//! ```
//!
//! # Example
//!
//! ```ignore
//! use toolbelt_config::{ConfigLoader, Result};
//!
//! fn example() -> Result<()> {
//!     let config = ConfigLoader::new().load(None)?;
//!     for name in config.list_profiles() {
//!         println!("{name}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod discovery;
pub mod env;
pub mod error;
pub mod format;
pub mod includes;
pub mod loader;
pub mod model;
pub mod parser;
pub mod raw;
pub mod reference;
pub mod resources;
pub mod script;
pub mod template;

pub use command::ToolCommand;
pub use discovery::{find_config_sources, load_pyproject_toml};
pub use env::{ALLOWED_PREFIXES, Environment};
pub use error::{Error, Result};
pub use format::ConfigFormat;
pub use includes::{Expanded, IncludeProcessor, MAX_INCLUDE_DEPTH};
pub use loader::{ConfigLoader, DEFAULT_SOURCE, load_config};
pub use model::{FileHandlingMode, ProfileConfig, ToolConfig, ToolbeltConfig, normalize_extensions};
pub use parser::parse_toolbelt_config;
pub use raw::RawDocument;
pub use reference::ReferenceResolver;
pub use resources::{
    PackageResources, ResourceResolver, is_package_resource_reference, validate_package_reference,
};
pub use script::{ModuleConfig, NoScripts, PythonEvaluator, ScriptEvaluator};
pub use template::{expand_list, expand_string};
