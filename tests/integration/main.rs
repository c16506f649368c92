//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock adapters in `mock_hw`.  All tests run on the host with
//! no GPIO required.

mod controller_tests;
mod mock_hw;
mod pipette_tests;
