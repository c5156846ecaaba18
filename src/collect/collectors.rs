use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{non_zero_id, record_count, records, results_count, Step, StepReport};
use crate::storage::JsonStore;

/// Country names whose leagues are carried into the teams step.
pub const ALLOWED_REGIONS: [&str; 3] = ["Europe", "South America", "World"];

pub fn in_allowed_region(record: &Value) -> bool {
    record
        .pointer("/country/name")
        .and_then(Value::as_str)
        .map(|name| ALLOWED_REGIONS.contains(&name.trim()))
        .unwrap_or(false)
}

/// League ids of every record in an allowed region, in response order.
pub fn regional_league_ids(data: &Value) -> Vec<u64> {
    records(data)
        .iter()
        .filter(|record| in_allowed_region(record))
        .filter_map(|record| non_zero_id(record, "/league/id"))
        .collect()
}

pub fn sorted_unique(mut ids: Vec<u64>) -> Vec<u64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub fn teams_artifact(league_id: u64) -> String {
    format!("teams_league-{}.json", league_id)
}

pub fn venue_artifact(venue_id: u64) -> String {
    format!("venues_id-{}.json", venue_id)
}

pub async fn collect_countries(client: &ApiClient, store: &JsonStore) -> Result<StepReport> {
    tracing::info!("Collecting countries...");
    let data = client.fetch("/countries", &[]).await?;
    let path = store.save("countries.json", &data)?;

    let total = results_count(&data);
    tracing::info!("Collecting countries... ok, {} records", total);
    Ok(StepReport::new(Step::Countries, total, vec![path]))
}

pub async fn collect_seasons(client: &ApiClient, store: &JsonStore) -> Result<StepReport> {
    tracing::info!("Collecting seasons...");
    let data = client.fetch("/leagues/seasons", &[]).await?;
    let path = store.save("seasons.json", &data)?;

    let total = records(&data).len() as u64;
    tracing::info!("Collecting seasons... ok, {} records", total);
    Ok(StepReport::new(Step::Seasons, total, vec![path]))
}

/// Saves the season's leagues and derives the sorted league ids of the allowed regions.
///
/// The reported record count is the number of kept leagues, not the raw
/// number of league records in the response.
pub async fn collect_leagues(
    client: &ApiClient,
    store: &JsonStore,
    year: i32,
) -> Result<StepReport> {
    tracing::info!("Collecting leagues (season={})...", year);
    let data = client
        .fetch("/leagues", &[("season", year.to_string())])
        .await?;
    let path = store.save("leagues.json", &data)?;

    let found = records(&data).len();
    let kept = regional_league_ids(&data);
    tracing::info!(
        "Collecting leagues... ok, {} leagues found, {} kept (regions: {})",
        found,
        kept.len(),
        ALLOWED_REGIONS.join(", ")
    );

    Ok(StepReport::new(Step::Leagues, kept.len() as u64, vec![path]).with_ids(sorted_unique(kept)))
}

/// Saves one teams artifact per league until `limit` team records have been
/// seen, gathering at most `limit` venue ids along the way.
///
/// The two caps are checked independently: the team total is only compared
/// before a league is requested, while venue collection can stop in the
/// middle of a response.
pub async fn collect_teams(
    client: &ApiClient,
    store: &JsonStore,
    year: i32,
    league_ids: Vec<u64>,
    limit: usize,
) -> Result<StepReport> {
    tracing::info!(
        "Collecting up to {} teams for {} leagues (season={})...",
        limit,
        league_ids.len(),
        year
    );

    let pb = progress_bar(league_ids.len() as u64, "leagues");
    let mut files = Vec::new();
    let mut venue_ids: Vec<u64> = Vec::new();
    let mut total = 0u64;

    for league_id in league_ids {
        if total >= limit as u64 {
            break;
        }

        let data = client
            .fetch(
                "/teams",
                &[("league", league_id.to_string()), ("season", year.to_string())],
            )
            .await?;
        files.push(store.save(&teams_artifact(league_id), &data)?);
        total += record_count(&data);

        for record in records(&data) {
            if venue_ids.len() >= limit {
                break;
            }
            if let Some(venue_id) = non_zero_id(record, "/venue/id") {
                venue_ids.push(venue_id);
            }
        }

        pb.inc(1);
    }
    pb.finish_and_clear();

    let venue_ids = sorted_unique(venue_ids);
    tracing::info!(
        "Collecting teams... ok, {} records (limit {}); unique venues: {}",
        total,
        limit,
        venue_ids.len()
    );

    Ok(StepReport::new(Step::Teams, total, files).with_ids(venue_ids))
}

pub async fn collect_venues(
    client: &ApiClient,
    store: &JsonStore,
    venue_ids: Vec<u64>,
    limit: usize,
) -> Result<StepReport> {
    tracing::info!(
        "Collecting up to {} venues (of {} from collected teams)...",
        limit,
        venue_ids.len()
    );

    let mut files = Vec::new();
    let mut total = 0u64;

    for venue_id in venue_ids.into_iter().take(limit) {
        let data = client
            .fetch("/venues", &[("id", venue_id.to_string())])
            .await?;
        files.push(store.save(&venue_artifact(venue_id), &data)?);
        total += record_count(&data);
    }

    tracing::info!("Collecting venues... ok, {} records (limit {})", total, limit);
    Ok(StepReport::new(Step::Venues, total, files))
}

fn progress_bar(len: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {}",
        unit
    );
    let style = ProgressStyle::with_template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
