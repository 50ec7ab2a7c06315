//! Shared test harness modules for the `routr` CLI.

use super::*;

mod helpers;
mod steps;
