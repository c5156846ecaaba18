use chrono::Utc;

use crate::api::ApiClient;
use crate::collect::collectors::{
    collect_countries, collect_leagues, collect_seasons, collect_teams, collect_venues,
};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::RunSummary;
use crate::storage::JsonStore;

pub struct CollectionPipeline {
    client: ApiClient,
    store: JsonStore,
    config: PipelineConfig,
}

impl CollectionPipeline {
    pub fn new(client: ApiClient, store: JsonStore, config: PipelineConfig) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Runs every step in order. The first failure aborts the run; artifacts
    /// already written stay on disk.
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!(
            "Seeding season {} into {}",
            self.config.year,
            self.store.dir().display()
        );

        // Step 1: Countries
        let countries = collect_countries(&self.client, &self.store).await?;

        // Step 2: Seasons
        let seasons = collect_seasons(&self.client, &self.store).await?;

        // Step 3: Leagues in the allowed regions
        let leagues = collect_leagues(&self.client, &self.store, self.config.year).await?;
        let league_ids = leagues.ids().to_vec();

        // Step 4: Teams of those leagues, yielding venue ids
        let teams = collect_teams(
            &self.client,
            &self.store,
            self.config.year,
            league_ids,
            self.config.team_limit,
        )
        .await?;
        let venue_ids = teams.ids().to_vec();

        // Step 5: Venues
        let venues = collect_venues(
            &self.client,
            &self.store,
            venue_ids,
            self.config.venue_limit,
        )
        .await?;

        Ok(RunSummary {
            year: self.config.year,
            output_dir: self.store.dir().to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            steps: vec![countries, seasons, leagues, teams, venues],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::mock::MockTransport;
    use crate::api::{RawResponse, RetryPolicy};
    use crate::models::Step;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    fn upstream() -> Arc<MockTransport> {
        Arc::new(MockTransport::new(|url, query| {
            let param = |key: &str| {
                query
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            };
            let path = url.trim_start_matches("http://mock");
            let body: Value = match path {
                "/countries" => json!({"results": 2, "response": [
                    {"name": "England", "code": "GB"},
                    {"name": "São Tomé", "code": null}
                ]}),
                "/leagues/seasons" => json!({"results": 3, "response": [2023, 2024, 2025]}),
                "/leagues" => json!({"results": 4, "response": [
                    {"league": {"id": 39}, "country": {"name": "England"}},
                    {"league": {"id": 2}, "country": {"name": "World"}},
                    {"league": {"id": 13}, "country": {"name": "South America"}},
                    {"league": {"id": 17}, "country": {"name": "Asia"}}
                ]}),
                "/teams" => {
                    let league: u64 = param("league").parse().unwrap_or(0);
                    json!({"results": 2, "response": [
                        {"team": {"id": league * 10}, "venue": {"id": league * 100}},
                        {"team": {"id": league * 10 + 1}, "venue": {"id": league * 100 + 1}}
                    ]})
                }
                "/venues" => json!({"results": 1, "response": [{"id": param("id")}]}),
                other => panic!("unexpected path {}", other),
            };
            RawResponse::new(200, body.to_string())
        }))
    }

    fn pipeline(mock: &Arc<MockTransport>, dir: &Path) -> CollectionPipeline {
        let client = ApiClient::with_transport(mock.clone(), "http://mock", RetryPolicy::default());
        let store = JsonStore::new(dir).unwrap();
        let config = PipelineConfig {
            year: 2025,
            team_limit: 3,
            venue_limit: 2,
        };
        CollectionPipeline::new(client, store, config)
    }

    fn read_dir_sorted(dir: &Path) -> Vec<(String, Vec<u8>)> {
        let mut files: Vec<(String, Vec<u8>)> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let path = entry.unwrap().path();
                let name = path.file_name().unwrap().to_string_lossy().to_string();
                (name, fs::read(&path).unwrap())
            })
            .collect();
        files.sort();
        files
    }

    #[tokio::test]
    async fn test_threads_ids_through_steps() {
        let mock = upstream();
        let tmp = tempfile::tempdir().unwrap();

        let summary = pipeline(&mock, tmp.path()).run().await.unwrap();

        let order: Vec<Step> = summary.steps.iter().map(|s| s.step).collect();
        assert_eq!(order, Step::ORDER.to_vec());

        assert_eq!(summary.step(Step::Countries).unwrap().records, 2);
        assert_eq!(summary.step(Step::Seasons).unwrap().records, 3);
        assert_eq!(summary.step(Step::Leagues).unwrap().ids(), &[2, 13]);

        // League 2 yields 2 teams (< 3), league 13 is requested and tips it over.
        let teams = summary.step(Step::Teams).unwrap();
        assert_eq!(teams.records, 4);
        assert_eq!(teams.ids(), &[200, 201, 1300]);

        let venues = summary.step(Step::Venues).unwrap();
        assert_eq!(venues.records, 2);
        assert_eq!(summary.files_written(), 3 + 2 + 2);

        let names: Vec<String> = read_dir_sorted(tmp.path()).into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "countries.json",
                "leagues.json",
                "seasons.json",
                "teams_league-13.json",
                "teams_league-2.json",
                "venues_id-200.json",
                "venues_id-201.json",
            ]
        );

        let paths: Vec<String> = mock
            .calls()
            .iter()
            .map(|c| c.url.trim_start_matches("http://mock").to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/countries",
                "/leagues/seasons",
                "/leagues",
                "/teams",
                "/teams",
                "/venues",
                "/venues"
            ]
        );
    }

    #[tokio::test]
    async fn test_identical_upstream_gives_identical_artifacts() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        pipeline(&upstream(), first.path()).run().await.unwrap();
        pipeline(&upstream(), second.path()).run().await.unwrap();

        assert_eq!(read_dir_sorted(first.path()), read_dir_sorted(second.path()));
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_artifacts() {
        let mock = Arc::new(MockTransport::new(|url, _| {
            if url.ends_with("/leagues") {
                RawResponse::new(401, r#"{"errors": {"token": "invalid"}}"#)
            } else {
                RawResponse::new(200, r#"{"results": 0, "response": []}"#)
            }
        }));
        let tmp = tempfile::tempdir().unwrap();

        let err = pipeline(&mock, tmp.path()).run().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(tmp.path().join("countries.json").is_file());
        assert!(tmp.path().join("seasons.json").is_file());
        assert!(!tmp.path().join("leagues.json").exists());
    }
}
