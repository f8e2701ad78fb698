//! Loader for line-oriented instruction set definitions.
//!
//! ```text
//! ARCH toy8
//! OPERAND R r0 00
//! OPERAND R r1 01
//! INS add@d<R> 101@d
//! ```
//!
//! [`loader::isa::IsaLoader`] folds such text into a [`soc::isa::InstructionSet`].

pub mod loader;
pub mod soc;

pub use loader::isa::{IsaLoader, LoadOptions, LoadReport};
pub use soc::isa::{InstructionSet, IsaDiagnostic, IsaError};
