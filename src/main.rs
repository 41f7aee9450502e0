use anyhow::Context;
use story_spoiler::configuration::get_configuration;
use story_spoiler::story_client::StoryClient;
use story_spoiler::suite::{Outcome, run_suite};
use story_spoiler::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("story-spoiler".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    // Nothing else can run without a token, so a failure here ends the run.
    let client = StoryClient::authenticate(
        &configuration.api,
        &configuration.credentials.credentials(),
    )
    .await
    .context("Failed to authenticate against the story API.")?;

    let report = run_suite(&client).await;
    drop(client);

    for outcome in &report.outcomes {
        match &outcome.outcome {
            Outcome::Passed => eprintln!("PASS  {}", outcome.check),
            Outcome::Failed(e) => eprintln!("FAIL  {}: {}", outcome.check, e),
            Outcome::Skipped => eprintln!("SKIP  {}", outcome.check),
        }
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} checks did not pass (run {}).",
            report.outcomes.len() - report.passed_count(),
            report.outcomes.len(),
            report.run_id
        );
    }
    Ok(())
}
