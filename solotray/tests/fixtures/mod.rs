// Each test crate uses a different subset of the fixtures.
#![allow(dead_code)]

mod leader;

pub use leader::*;
