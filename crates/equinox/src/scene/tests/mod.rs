//! Scene-level scenario tests

mod lifecycle;
