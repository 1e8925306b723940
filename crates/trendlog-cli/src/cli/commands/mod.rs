use super::args::*;

pub(crate) mod history;
pub(crate) mod ingest;

use crate::exit_codes::EXIT_SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Ingest(args) => ingest::run(args),
        Command::History(args) => history::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}
