//! Declarative alert and telemetry definitions
//!
//! Definitions arrive as a JSON array with string-encoded conditions and
//! counts; loading validates everything up front so the evaluator works
//! with typed, immutable definitions.

pub mod condition;
pub mod model;
pub mod registry;

pub use condition::{CompareOp, Condition, ConditionError};
pub use model::{AlertDefinition, DefinitionError, DefinitionKind, RawDefinition};
pub use registry::{Registry, RegistryError};
