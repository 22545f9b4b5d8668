mod error;
mod operation;
mod registry;
mod schema;
pub mod validators;

pub use cloudmaker_config::Parameters;
pub use error::{OperationError, RegistryError};
pub use operation::Operation;
pub use registry::{FunctionRegistry, FunctionRegistryBuilder, RegisteredOperation};
pub use schema::{ParamSpec, ParameterSchema};
