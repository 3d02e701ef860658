//! Library integration tests through the public API.

mod composite_tests;
