use email_polisher::cli::read_email;
use email_polisher::config::LlmConfig;
use email_polisher::pipeline::{build_graph, validate_input};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the polished email.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = LlmConfig::from_env()?;
    let graph = build_graph(&config)?;

    eprintln!("✉️  Email Polisher v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Backend: {} (model: {})",
        graph.llm().backend(),
        graph.llm().model_name()
    );
    eprintln!("Enter your raw email text (press Enter twice to submit):\n");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let email = read_email(stdin).await?;

    if validate_input(&email).is_err() {
        eprintln!("⚠️ No input provided. Exiting.");
        return Ok(());
    }

    match graph.run(&email).await {
        Ok(polished) => {
            println!("\nPolished Email:\n");
            println!("{polished}");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to polish email");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
