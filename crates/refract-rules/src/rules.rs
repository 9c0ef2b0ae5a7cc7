//! The bundled matcher and rewrite-rule pairs.

mod compound;
mod increment;
pub(crate) mod infer;
mod loops;
mod return_type;

pub use compound::{CompoundOperator, ContractCompound, ExpandCompound};
pub use increment::{AssignmentToIncrement, IncrementToAssignment, Polarity};
pub use loops::{ForToWhile, WhileToFor};
pub use return_type::{ReturnTypeDeduction, ReturnTypeToAuto};
