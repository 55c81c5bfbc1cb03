pub mod check;
pub mod history;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze Python submissions (files or stdin) and report skill level
    Check(check::CheckArgs),
    /// List stored analyses, newest first
    History(history::HistoryArgs),
    /// Show one stored analysis
    Show(history::ShowArgs),
    /// Delete one stored analysis
    Delete(history::DeleteArgs),
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Check(args) => check::run(args),
        Command::History(args) => history::run_list(args),
        Command::Show(args) => history::run_show(args),
        Command::Delete(args) => history::run_delete(args),
    }
}
