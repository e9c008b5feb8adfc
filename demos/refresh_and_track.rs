use anyhow::Result;
use correios_api::{AuthMode, Client, EventScope};

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Configure credentials via env vars or a `.correiosrc` file.
    let mut client = Client::from_env()?;

    let info = client.refresh_token(AuthMode::PostageCard)?;
    println!("token issued {}, expires {}", info.issued_at, info.expires_at);

    let report = client.track(EventScope::LastEvent, &["AA037090154BR", "AV001914319BR"])?;
    for item in &report.results {
        match &item.message {
            Some(message) => println!("{}: {}", item.code, message),
            None => {
                for i in 0..item.descriptions.len() {
                    println!(
                        "{}: {} — {} ({}/{})",
                        item.code,
                        item.event_times[i],
                        item.descriptions[i],
                        item.cities[i],
                        item.states[i]
                    );
                }
            }
        }
    }
    for failure in &report.page_failures {
        eprintln!("page {} failed: {}", failure.page, failure.error);
    }

    Ok(())
}
