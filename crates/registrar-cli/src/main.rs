use registrar_cli::output::print_error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match registrar_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
