//! DAG lowering and JIT hand-off for the Lume shading graph.
//!
//! Walks a fully bound call node's arguments, converts them into the DAG
//! intermediate form consumed by an external JIT code generator, applies
//! the legacy struct-unwrapping shim for the historical two-field result
//! convention, and invokes the generator's context-specific compile entry
//! point.

pub mod config;
pub mod dag;
pub mod generator;
pub mod lower;

pub use config::JitConfig;
pub use dag::{CallArgument, DagNode, DagNodeId, LambdaContext, LambdaFunction};
pub use generator::{
    CallResolver, CodeGenerator, CompiledFunction, Options, TransactionResolver,
    OPTION_ENABLE_RO_SEGMENT, OPTION_FAST_MATH, OPTION_OPT_LEVEL, OPTION_USE_BITANGENT,
};
pub use lower::{lower_and_compile, LowerError, UnitScale, LEGACY_TEXTURE_RETURN};
