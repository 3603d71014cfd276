pub mod line_map;
pub mod runner;

pub use line_map::{map_new_to_old, map_old_to_new, new_lines_touched};
pub use runner::{
    CorrelateOptions, CorrelationReport, FileCorrelation, FileFailure, correlate,
};
