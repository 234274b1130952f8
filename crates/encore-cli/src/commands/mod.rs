pub mod config;
pub mod load;
pub mod search;
pub mod status;

pub use load::run_load;
pub use search::run_search;
pub use status::show_status;
