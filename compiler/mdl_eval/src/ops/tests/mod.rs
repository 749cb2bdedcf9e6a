//! Operator semantics tests, one file per family.

mod sum_tests;
