//! Configuration types and loading.
//!
//! - `LintConfig`: top-level configuration with validation
//! - Section configs for discovery, front-matter, bundles and rules

mod settings;

pub use settings::{
    BundleConfig, CONFIG_FILE_NAME, DEFAULT_SEPARATOR, DiscoveryConfig, FrontMatterConfig,
    LintConfig, RulesConfig,
};
