use anyhow::Result;
use lunar_ics::cli::{self, Command};
use lunar_ics::config::Config;
use lunar_ics::context::StandardContext;
use lunar_ics::logging;
use std::env;
use std::io::Write;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = cli::parse_args(&args)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if parsed.command == Command::Help {
        cli::print_help(&mut out)?;
        return Ok(());
    }

    let ctx = StandardContext::new(parsed.root);
    let config = Config::load_or_default(&ctx)?;
    logging::init(
        logging::resolve_level(&config.log_level),
        config.log_to_file,
        &ctx,
    )?;

    cli::execute(parsed.command, &ctx, &config, &mut out)?;
    out.flush()?;
    Ok(())
}
