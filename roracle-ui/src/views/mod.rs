//! View controllers
//!
//! Each view combines the API client with the pure logic in
//! `roracle_common` and produces the state one page of the workbench shows.

pub mod results;
pub mod tests;

pub use results::{load_results, ResultsView};
pub use tests::{default_dataset, load_catalog, load_tests, TestsSelection, TestsView};
