mod commands;
mod terminal;

use commands::{CommandLine, Commands, analytics, complete, predict, records, train};
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.config();

    logging::init(cfg.quiet);

    match commands.command {
        Commands::Train { retrain } => train::train(retrain, &cfg),
        Commands::Predict(args) => predict::predict(args, &cfg),
        Commands::Records { limit } => records::records(limit, &cfg),
        Commands::Complete { id, at } => complete::complete(id, at, &cfg),
        Commands::Analytics { report } => analytics::analytics(report, &cfg),
    }
}
