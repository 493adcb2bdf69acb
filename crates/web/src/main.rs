use directions::DirectionsGateway;
use roster::Roster;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // roster
    let source = content::source_from_env();
    let people = match source.fetch_roster().await {
        Ok(people) => people,
        Err(why) => {
            log::error!("Could not load roster from {}: {}", source.describe(), why);
            vec![]
        }
    };
    let roster = Roster::new(people);
    log::info!("Loaded {} graves from {}.", roster.len(), source.describe());

    // directions
    let directions = DirectionsGateway::google_from_env();

    // web server
    let config = WebConfig::from_env();
    if let Err(why) = start_web_server(WebState::new(roster, directions), config).await {
        log::error!("Web server stopped: {}", why);
    }
}
