pub mod settings;
pub mod user;

pub use settings::{EngineSettings, ReplacePolicy};
pub use user::{
    UserConfigError, UserConfigResult, load_settings, load_user_config, user_config_path,
};
