//! CLI domain: parse, route, output and presentation only.
//! No generation logic; the run context hands off to the pipeline.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use presentation::ConsoleReporter;
pub use route::RunContext;
