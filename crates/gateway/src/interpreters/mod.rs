mod alert;
mod deployment;
mod traits;

pub use alert::AlertInterpreter;
pub use deployment::DeploymentInterpreter;
pub use traits::{InterpretError, PayloadInterpreter};
