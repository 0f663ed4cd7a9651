pub mod backtest;
pub mod display;
pub mod ensemble;
pub mod error;
pub mod hits;
pub mod models;
pub mod permute;
