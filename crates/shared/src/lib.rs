mod command;
mod completion;
mod date;
pub mod mealplan;

pub use command::*;
pub use completion::*;
pub use date::*;
