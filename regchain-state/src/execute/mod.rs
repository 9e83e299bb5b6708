//! Transaction execution module.
//!
//! This module contains the stateless registration check, the stateful
//! registration executor, and the boolean driver surface that reports
//! failures through a [`ValidationState`](crate::ValidationState).

mod check;
mod context;
mod executor;
mod register;

pub use check::check_account_register;
pub use context::ExecutionContext;
pub use executor::{check_tx, execute_tx};
pub use register::execute_account_register;
