//! Cross-module test suites.

mod check;
