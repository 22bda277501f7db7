use std::process::ExitCode;

use powerbi_provider::protocol::Status;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match powerbi_provider::run().await {
        Ok(response) if response.status != Status::Error => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}
