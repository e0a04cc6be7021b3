pub mod commands;
pub mod output;
pub mod step_up;
