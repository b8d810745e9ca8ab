//! Test suite.

mod test_utils;

mod clock_tests;
mod concurrent_tests;
mod config_tests;
mod layout_tests;
