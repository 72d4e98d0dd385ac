//! Host-boundary glue: tabular data shaping, flat props parsing, and the
//! adapter that wires the engine's filter bus to the host's filter API.

mod adapter;
mod data_model;
mod props;

pub use adapter::{FieldFilter, FilterDescriptor, FilterSink, HostAdapter};
pub use data_model::{FieldMeta, FieldRole, nest_rows, shape_rows};
pub use props::build_config;
