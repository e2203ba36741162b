use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use poll_registry::{cli::Cli, registry::PollRegistry};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let registry = Arc::new(PollRegistry::new());

    let poll_id = registry.create_poll(
        "What is your favorite color?",
        vec![
            "Red".to_string(),
            "Blue".to_string(),
            "Green".to_string(),
            "Yellow".to_string(),
        ],
    );
    println!("Poll created with ID: {poll_id}");

    println!("{}", vote_outcome(&registry, &poll_id, "user1", "Red"));
    println!("{}", vote_outcome(&registry, &poll_id, "user2", "Blue"));
    // user1 again; the ledger should reject this one.
    println!("{}", vote_outcome(&registry, &poll_id, "user1", "Green"));

    print_results(&registry, &poll_id);

    let update_outcome = match registry.update_poll(
        &poll_id,
        "What is your favorite primary color?",
        vec!["Red".to_string(), "Blue".to_string(), "Yellow".to_string()],
    ) {
        Ok(()) => "Poll updated successfully.".to_string(),
        Err(err) => err.to_string(),
    };
    println!("{update_outcome}");

    println!("{}", vote_outcome(&registry, &poll_id, "user3", "Yellow"));
    print_results(&registry, &poll_id);

    run_concurrent_voters(&registry, &poll_id, cli.voters).await;
    print_results(&registry, &poll_id);

    let delete_outcome = match registry.delete_poll(&poll_id) {
        Ok(()) => "Poll deleted successfully.".to_string(),
        Err(err) => err.to_string(),
    };
    println!("{delete_outcome}");

    if registry.view_poll_results(&poll_id).is_empty() {
        println!("Poll not found or has been deleted.");
    }

    println!(
        "Registry snapshot: {}",
        serde_json::to_string_pretty(&registry.list_polls())?
    );

    Ok(())
}

fn vote_outcome(registry: &PollRegistry, poll_id: &str, user_id: &str, option: &str) -> String {
    match registry.vote_in_poll(poll_id, user_id, option) {
        Ok(()) => "Vote cast successfully.".to_string(),
        Err(err) => err.to_string(),
    }
}

fn print_results(registry: &PollRegistry, poll_id: &str) {
    println!("Poll results for poll ID {poll_id}:");
    for (option, count) in registry.view_poll_results(poll_id) {
        println!("{option}: {count} votes");
    }
}

/// Spawns `voters` tasks that all vote for the same option from distinct
/// users, demonstrating that no updates are lost under contention.
async fn run_concurrent_voters(registry: &Arc<PollRegistry>, poll_id: &str, voters: usize) {
    info!(voters, "spawning concurrent voters");

    let mut handles = Vec::with_capacity(voters);
    for i in 0..voters {
        let registry = Arc::clone(registry);
        let poll_id = poll_id.to_string();
        handles.push(tokio::spawn(async move {
            let user_id = format!("burst-user-{i}");
            registry.vote_in_poll(&poll_id, &user_id, "Blue")
        }));
    }

    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => println!("{err}"),
            Err(err) => println!("voter task failed: {err}"),
        }
    }
}
