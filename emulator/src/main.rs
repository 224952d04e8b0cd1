mod command;
mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use odometer_core::OdometerConfig;
use session::Session;

fn main() -> io::Result<()> {
    let transcript = parse_transcript_path().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: odometer-emulator [--transcript <path>]");
        process::exit(2);
    });

    let mut session = Session::new(OdometerConfig::BICYCLE).unwrap_or_else(|err| {
        eprintln!("invalid odometer configuration: {err}");
        process::exit(2);
    });
    if let Some(path) = transcript {
        session = session.with_transcript(&path)?;
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut line = String::new();

    for banner in session.banner() {
        writeln!(writer, "{banner}")?;
    }
    writeln!(
        writer,
        "Odometer emulator ready. Type `help` for commands or `exit` to quit."
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_line(trimmed)? {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_transcript_path() -> Result<Option<PathBuf>, String> {
    let mut args = env::args().skip(1);
    match args.next() {
        None => Ok(None),
        Some(arg) => {
            let path = if let Some(value) = arg.strip_prefix("--transcript=") {
                PathBuf::from(value)
            } else if arg == "--transcript" {
                args.next()
                    .map(PathBuf::from)
                    .ok_or_else(|| "Expected path after --transcript".to_string())?
            } else {
                return Err(format!("Unknown argument `{arg}`"));
            };
            if let Some(extra) = args.next() {
                return Err(format!("Unexpected argument `{extra}`"));
            }
            Ok(Some(path))
        }
    }
}
