//! Shared test harness modules for the UniRoute CLI.

use super::*;
