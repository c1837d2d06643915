//! Ask command - resolves one question through the full cached stack

use clap::Args;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub query: String,

    /// Regenerate the answer even if it is cached
    #[arg(long)]
    pub refresh: bool,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let state = crate::create_app_state_with_config(&config).await?;
    let orchestrator = state.orchestrator();

    let resolution = if args.refresh {
        orchestrator.refresh(&args.query).await?
    } else {
        orchestrator.resolve(&args.query).await?
    };

    if let Some(warning) = &resolution.storage_warning {
        eprintln!("warning: answer was not cached ({})", warning);
    }
    tracing::info!(source = %resolution.source, "Answer resolved");

    println!("{}", resolution.value);
    Ok(())
}
