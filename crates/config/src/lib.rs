//! Gateway configuration: schema, discovery, loading, persistence.
//!
//! Config files are discovered as `wagate.{toml,yaml,yml,json}` in the
//! working directory and then `~/.config/wagate/`. `${ENV_VAR}` placeholders
//! in the raw file text are substituted before parsing.

mod env_subst;
mod loader;
mod schema;

pub use {
    env_subst::substitute_env,
    loader::{
        clear_config_dir, config_dir, data_dir, discover_and_load, find_or_default_config_path,
        load_config, save_config, set_config_dir, update_config,
    },
    schema::{
        AuthConfig, BulkConfig, ServerConfig, SessionConfig, WagateConfig, WebhookConfig,
    },
};
