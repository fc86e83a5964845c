use std::{env, fs::read_to_string, path::Path, process::ExitCode, time::Instant};

use jangc::{compile, display_error};

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: jangc <file>");
        return ExitCode::FAILURE;
    }

    let file_path = &args[1];
    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.clone());

    let source = match read_to_string(file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path, error);
            return ExitCode::FAILURE;
        }
    };

    // JANGC_QUIET=1 keeps the checker from logging the errors it finds
    let emit_diagnostics = env::var("JANGC_QUIET").map_or(true, |value| value != "1");

    let start = Instant::now();

    match compile(&source, Some(file_name.clone()), emit_diagnostics) {
        Ok((graph, _)) => {
            println!(
                "Checked {} ({} nodes) in {:?}",
                file_name,
                graph.len(),
                start.elapsed()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            display_error(&error, &source, &file_name);
            ExitCode::FAILURE
        }
    }
}
