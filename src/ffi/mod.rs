//! Foreign-function bindings, compiled only with the `python` feature.

pub mod python;
