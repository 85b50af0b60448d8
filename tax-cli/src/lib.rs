pub mod cli;
pub mod input;
pub mod logging;
pub mod output;
pub mod report;
pub mod run;
pub mod utils;
