//! # pipeboost-core
//!
//! A minimal sequential workflow engine: an ordered list of named steps,
//! each consuming the output of the previous one, with optional per-step
//! run conditions.
//!
//! ## Core Concepts
//!
//! - **Step**: a named, optionally conditional, single-input/single-output
//!   unit of work
//! - **Workflow**: an ordered sequence of steps threading one JSON value
//!   through all of them
//! - **WorkflowConfig**: declarative YAML/JSON workflow definitions
//!
//! ## Quick Start
//!
//! ```rust
//! use pipeboost_core::prelude::*;
//! use serde_json::{Value, json};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let workflow = Workflow::builder()
//!     .name("arithmetic")
//!     .step(Step::new("double", |data: Value| async move {
//!         Ok(json!(data.as_i64().unwrap_or(0) * 2))
//!     }))
//!     .step(Step::new("add_one", |data: Value| async move {
//!         Ok(json!(data.as_i64().unwrap_or(0) + 1))
//!     }))
//!     .build()?;
//!
//! let result = workflow.run(json!(3)).await?;
//! assert_eq!(result, json!(7));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod step;
pub mod workflow;

/// Convenient re-exports for common use.
pub mod prelude {
    pub use eyre;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;

    pub use crate::{
        config::{StepConfig, WorkflowConfig, merge_values, value_at_path},
        error::{FlowError, Result},
        step::{Step, StepFn, StepSpec, step_fn},
        workflow::{Workflow, WorkflowBuilder},
    };
}
