use revivemii_patcher::{exit_status, Config, ExternalPatcher, HttpTransport, Orchestrator};
use std::env;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let root = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("Error: could not determine the current directory: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = Config::load(&root);

    let transport = match HttpTransport::new(config.request_timeout()) {
        Ok(t) => t,
        Err(e) => {
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let patcher = ExternalPatcher::new(&config);

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    let res = Orchestrator::new(&config, &transport, &patcher).run(&mut input, &mut out);
    drop(out);
    if let Err(e) = &res {
        println!("Error: {e}");
    }
    ExitCode::from(exit_status(&res))
}
