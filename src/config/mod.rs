//! Run configuration: YAML run spec, validation, and CLI argument types.

mod cli;
mod schema;
mod validate;

pub use cli::{
    apply_overrides, parse_args, Cli, Command, CurvesArgs, InfoArgs, PredictArgs, SelectArgs,
    StackArgs, SummarizeArgs, TuneArgs, ValidateArgs,
};
pub use schema::{
    load_spec, DataSpec, FeatureFiles, MetaSpec, OutputSpec, RunSpec, SearchSpec, SplitSpec,
};
pub use validate::validate_spec;
