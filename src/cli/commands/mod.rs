pub(crate) mod catalog;
pub(crate) mod config;
pub(crate) mod simulate;
