pub mod loader;
pub mod templates;
pub mod types;
pub mod validator;

pub use loader::ConfigLoader;
pub use templates::{ensure_config_file_exists, generate_default_config_template};
pub use types::{ReportConfig, DEFAULT_CONFIG_PATH};
pub use validator::ConfigValidator;
