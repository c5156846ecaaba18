pub mod collectors;
pub mod pipeline;

pub use collectors::{
    collect_countries, collect_leagues, collect_seasons, collect_teams, collect_venues,
    ALLOWED_REGIONS,
};
pub use pipeline::CollectionPipeline;
