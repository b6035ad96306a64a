mod account;
mod console;
mod operation;
mod registry;
mod summary;

pub use self::{
    console::Console,
    operation::replay,
    registry::AccountRegistry,
    summary::{write_summary, SummaryFormat},
};
