//! Service definitions: the record describing one containerised service.
//!
//! A [`ServiceDefinition`] is assembled through [`ServiceDefinitionBuilder`],
//! either from interactive answers or from a YAML [`DefinitionFile`]. All
//! validation lives in [`normalize`] and the builder, so it is independent of
//! how the input was gathered.

mod builder;
mod file;
mod model;
pub mod normalize;
pub mod types;


pub use builder::ServiceDefinitionBuilder;
pub use file::{DefinitionFile, LoadedDefinition};
pub use model::ServiceDefinition;
pub use normalize::{
    expand_volume_path, expand_volume_path_in, normalize_health_check, normalize_image_name,
    parse_env_pair, parse_list_input, parse_port_mapping, parse_volume_spec, relative_form,
    validate_name,
};
pub use types::{
    EnvVar, ExpandedPath, HealthCheck, NetworkMode, PortMapping, PullPolicy, UserMode,
    VolumeMount,
};
