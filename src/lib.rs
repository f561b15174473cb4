#![doc(test(attr(deny(warnings))))]

//! Family Budget tracks household income and expenses against a two-level
//! category tree, monthly spending limits per main category, and the
//! statistics derived from them (totals, monthly trend, category breakdown
//! and budget control).

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

/// Initializes global tracing and emits a startup info log once.
pub fn init() {
    if utils::init_tracing() {
        tracing::info!("Family budget tracing initialized.");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
        assert!(!super::utils::init_tracing());
    }
}
