mod commands;
mod terminal;

use commands::{CommandLine, scan};
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    print::banner(commands.no_banner, commands.quiet);

    // Certificates needing attention are reported, not signalled through the exit code.
    if let Err(e) = run(&commands).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(commands: &CommandLine) -> anyhow::Result<()> {
    let cfg = commands.loader().load(&commands.overrides())?;

    scan::scan(&cfg, commands.quiet).await?;
    Ok(())
}
