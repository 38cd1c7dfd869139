use anyhow::{anyhow, Result};
use dotenv::dotenv;
use env_logger::Env;

use pisense::{argsets, command, constants::defaults, constants::envvars};

const CMD_READ: &str = "read";
const CMD_PROBE: &str = "probe";

fn main() -> Result<()> {
    let _ = dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_READ) => command::read(argsets::ReadArgs {
            dry_run: args.contains(["-n", "--dry-run"]),
            config: args.value_from_str(["-c", "--config"])?,
        }),
        Some(CMD_PROBE) => command::probe(argsets::ProbeArgs {
            config: args.value_from_str(["-c", "--config"])?,
            sensor: args.free_from_str()?,
        }),
        _ => Err(anyhow!(
            "Subcommand must be one of '{CMD_READ}', '{CMD_PROBE}'"
        )),
    }
}
