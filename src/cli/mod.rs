pub mod config_cmd;
pub mod logs_cmd;
pub mod output;
pub mod renderer;
