//! CLI entrypoint module structure.

pub mod args;
pub mod profile;

pub use args::LaunchProfileArgs;
pub use profile::{
    build_launch_args, resolve_api_key_override, resolve_config_path, resolve_transport,
    ApiKeySource, LaunchProfile, TransportMode,
};
