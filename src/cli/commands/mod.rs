pub mod auth;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";
pub const CMD_DB: &str = "db";
pub const CMD_DB_INIT: &str = "init";
pub const CMD_DB_RESET: &str = "reset";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("vestly")
        .about("Personal finance API gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("3000")
                .env("VESTLY_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .env("VESTLY_DSN")
                .hide_env_values(true)
                .global(true),
        )
        .subcommand(
            Command::new(CMD_DB)
                .about("Manage the database schema")
                .subcommand_required(true)
                .subcommand(
                    Command::new(CMD_DB_INIT)
                        .about("Create every table the app and the auth delegate use"),
                )
                .subcommand(
                    Command::new(CMD_DB_RESET)
                        .about("Drop every table, including migration bookkeeping"),
                ),
        );

    let command = auth::with_args(command);
    logging::with_args(command)
}
