//! Main application entry point.

use clap::Parser;
use geodraft_app::{Options, Session};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let options = Options::parse();

    log::info!("Starting geodraft session {}", options.script.display());
    let mut session = Session::new(options.load_settings());
    if let Err(e) = session.run_file(&options.script) {
        eprintln!("{}: {e}", options.script.display());
        return ExitCode::FAILURE;
    }

    if let Some(output) = &options.out {
        if let Err(e) = session.canvas.save(&session.storage, output) {
            eprintln!("failed to save {output}: {e}");
            return ExitCode::FAILURE;
        }
    }

    for warning in &session.warnings {
        eprintln!("warning: {warning}");
    }

    let document = &session.canvas.document;
    println!(
        "{} shapes after {} frames, {} warnings",
        document.len(),
        session.frames(),
        session.warnings.len()
    );
    for (index, shape) in document.shapes().iter().enumerate() {
        println!("  [{index}] {shape}");
    }
    for angle in &session.measurements {
        println!("angle: {angle:.2} degrees");
    }
    ExitCode::SUCCESS
}
