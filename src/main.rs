use anyhow::Result;
use clap::Parser;
use cuecard::{
    app,
    cli::{
        handle_add_command, handle_check_command, handle_config_command, handle_create_command,
        handle_delete_command, handle_lists_command, handle_remove_command, handle_rename_command,
        handle_show_command, Cli, CliCommand,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        CliCommand::Version => {
            println!("cuecard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliCommand::Lists => handle_lists_command(),
        CliCommand::Create { name } => handle_create_command(&name),
        CliCommand::Show { list } => handle_show_command(&list),
        CliCommand::Add { list, text } => handle_add_command(&list, &text),
        CliCommand::Remove { list, keyword_id } => handle_remove_command(&list, &keyword_id),
        CliCommand::Rename { list, name } => handle_rename_command(&list, &name),
        CliCommand::Delete { list } => handle_delete_command(&list),
        CliCommand::Check { list, transcript } => handle_check_command(&list, &transcript),
        CliCommand::Config(args) => handle_config_command(args),
        CliCommand::Present(args) => app::run_presentation(args).await,
    }
}
