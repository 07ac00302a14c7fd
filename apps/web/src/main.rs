use anyhow::{anyhow, Result};
use api_client::ApiClient;
use clap::Parser;
use controller::{DispatchState, MessageController, PENDING_TRIGGER_LABEL};
use shared::domain::Source;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://localhost:3000")]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let controller = MessageController::new(Source::Web, ApiClient::new(args.api_url));

    println!("{PENDING_TRIGGER_LABEL}");
    controller.trigger().await;

    match controller.state().await {
        state @ DispatchState::Succeeded(_) => {
            if let Some(outcome) = state.render() {
                println!("{outcome}");
            }
            Ok(())
        }
        DispatchState::Failed(message) => Err(anyhow!(message)),
        state => Err(anyhow!("dispatch settled in unexpected state: {state:?}")),
    }
}
