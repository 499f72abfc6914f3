//! Unit tests for the TIFF layer

mod types_tests;
mod geo_key_tests;
