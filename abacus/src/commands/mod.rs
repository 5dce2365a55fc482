// abacus/src/commands/mod.rs

pub mod clean;
pub mod generate;
pub mod list;
pub mod run;
pub mod show;
