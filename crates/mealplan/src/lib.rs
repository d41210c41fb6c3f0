mod command;
mod generator;
mod ledger;
mod memory;
mod plan;
mod progress;
mod schedule;
mod store;

pub use command::*;
pub use generator::*;
pub use ledger::*;
pub use memory::*;
pub use plan::*;
pub use progress::*;
pub use schedule::*;
pub use store::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod sqlite;

        pub use sqlite::*;
    }
}
