//! srcon CLI client
//!
//! Thin wrapper over the session API: run one command, or read commands
//! from stdin interactively.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::Parser;
use srcon::{Options, Session};
use tracing_subscriber::{fmt, EnvFilter};

/// srcon CLI
#[derive(Parser, Debug)]
#[command(name = "srcon-cli")]
#[command(about = "Source RCON client")]
#[command(version)]
struct Args {
    /// Server hostname or IP address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server RCON port
    #[arg(short, long, default_value = "27015")]
    port: u16,

    /// RCON password
    #[arg(short = 'P', long)]
    password: Option<String>,

    /// Socket timeout in seconds (0 disables the timeout)
    #[arg(short, long, default_value = "10")]
    timeout: u64,

    /// Command to execute; reads commands from stdin when omitted
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let mut options = Options::builder()
        .host(&args.host)
        .port(args.port)
        .timeout(Duration::from_secs(args.timeout));
    if let Some(password) = &args.password {
        options = options.password(password);
    }

    let session = Session::new(options.build());

    let result = if args.command.is_empty() {
        interactive(&session)
    } else {
        execute(&session, &args.command.join(" "))
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = session.close() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Run a single command and print its output.
fn execute(session: &Session, command: &str) -> srcon::Result<()> {
    let output = session.exec_command(command)?;
    println!("{}", String::from_utf8_lossy(&output));
    Ok(())
}

/// Read commands from stdin until EOF, printing each result.
fn interactive(session: &Session) -> srcon::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let command = line.trim_end();
        if command.is_empty() {
            continue;
        }

        let output = session.exec_command(command)?;
        println!("{}", String::from_utf8_lossy(&output));
    }
}
