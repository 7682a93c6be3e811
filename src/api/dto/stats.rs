//! DTO for access statistics.

use serde::Serialize;

use crate::domain::entities::UrlStatistics;

/// Response body for `GET /urls/{short_path}/stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(rename = "shortPath")]
    pub short_path: String,
    #[serde(rename = "last24Hours")]
    pub last_24_hours: i64,
    #[serde(rename = "pastWeek")]
    pub past_week: i64,
    #[serde(rename = "allTime")]
    pub all_time: i64,
}

impl From<UrlStatistics> for StatsResponse {
    fn from(stats: UrlStatistics) -> Self {
        Self {
            short_path: stats.short_path,
            last_24_hours: stats.last_24_hours,
            past_week: stats.past_week,
            all_time: stats.all_time,
        }
    }
}
