mod balance;
mod category;
mod deposit;
mod expense;
mod money;
mod participant;

pub use balance::*;
pub use category::*;
pub use deposit::*;
pub use expense::*;
pub use money::*;
pub use participant::*;
