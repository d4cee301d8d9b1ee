pub mod args;
pub mod check;
pub mod config;
pub mod lists;

pub use args::{Cli, CliCommand, ConfigCliArgs, ConfigCommand, PresentCliArgs};
pub use check::handle_check_command;
pub use config::handle_config_command;
pub use lists::{
    handle_add_command, handle_create_command, handle_delete_command, handle_lists_command,
    handle_remove_command, handle_rename_command, handle_show_command,
};
