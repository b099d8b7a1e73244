//! Database driver implementations

pub mod postgres;
