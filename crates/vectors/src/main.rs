//! psa-vectors - test-vector fixtures for PSA attestation integration tests
//!
//! Drives `cocli`, `evcli`, `go-psa` and `go-cose-cli` to produce the CBOR
//! artifacts the integration tests open from `/test-vectors/`.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
