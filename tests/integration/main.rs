//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives one facade end to end
//! over the simulated drivers. All tests run on the host with no real
//! hardware required.

mod bus_tests;
mod capture;
mod instrumentation_tests;
mod pwm_tests;
