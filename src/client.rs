// Stateless façade over the three source tables.
//
// Every method independently fetches and fully re-parses its table: there is
// no cache and no shared mutable state, so concurrent loads cannot race. A
// fetch failure is logged and absorbed into an empty result or `None`; it is
// never propagated to the caller.

use tracing::error;

use crate::config::Config;
use crate::encoding;
use crate::history::{self, HistoricalArbitrationRecord};
use crate::predictions::{self, ArbitrationPrediction, ComparableWithStats};
use crate::source::TableFetcher;
use crate::stats::{self, SeasonStats};

pub struct ArbDataClient<F: TableFetcher> {
    fetcher: F,
    config: Config,
}

impl<F: TableFetcher> ArbDataClient<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch one table as UTF-8 text. `None` (with a diagnostic) when the
    /// source is unavailable.
    async fn table_text(&self, source: &str) -> Option<String> {
        match self.fetcher.fetch_bytes(source).await {
            Ok(bytes) => Some(encoding::decode_utf8_lossy(&bytes)),
            Err(e) => {
                error!("failed to load table {source}: {e}");
                None
            }
        }
    }

    /// The historical table mixes encodings, so it goes through the
    /// strict-UTF-8-then-Latin-1 decoder instead of the plain one.
    async fn historical_text(&self) -> Option<String> {
        let source = &self.config.sources.historical;
        match self.fetcher.fetch_bytes(source).await {
            Ok(bytes) => Some(encoding::decode_mixed(&bytes)),
            Err(e) => {
                error!("failed to load historical table {source}: {e}");
                None
            }
        }
    }

    // -- Season stats --

    /// All of the reference player's seasons, most recent first.
    pub async fn reference_seasons(&self) -> Vec<SeasonStats> {
        match self.table_text(&self.config.sources.pitching_stats).await {
            Some(text) => {
                stats::load_season_stats(&text, &self.config.matching.reference_player)
            }
            None => Vec::new(),
        }
    }

    /// The reference player's most recent season.
    pub async fn latest_reference_season(&self) -> Option<SeasonStats> {
        self.reference_seasons().await.into_iter().next()
    }

    /// Resolve one player-season; `season: None` means the configured
    /// default, falling back to the player's latest available season.
    pub async fn season_stats(&self, player: &str, season: Option<i32>) -> Option<SeasonStats> {
        let text = self.table_text(&self.config.sources.pitching_stats).await?;
        stats::find_player_season(&text, player, season, self.config.matching.default_season)
    }

    // -- Predictions --

    pub async fn predictions(&self) -> Vec<ArbitrationPrediction> {
        match self.table_text(&self.config.sources.predictions).await {
            Some(text) => predictions::load_predictions(&text),
            None => Vec::new(),
        }
    }

    /// The reference player's own prediction row, if the table has one.
    pub async fn reference_prediction(&self) -> Option<ArbitrationPrediction> {
        let text = self.table_text(&self.config.sources.predictions).await?;
        let (first, last) = predictions::name_fragments(&self.config.matching.reference_player);
        predictions::find_prediction(&text, &first, &last)
    }

    /// The curated comparable roster resolved against the prediction table,
    /// at most `limit` entries, roster order preserved.
    pub async fn comparables(&self, limit: usize) -> Vec<ArbitrationPrediction> {
        match self.table_text(&self.config.sources.predictions).await {
            Some(text) => predictions::select_comparables(&text, &self.config.roster, limit),
            None => Vec::new(),
        }
    }

    /// Curated comparables with their default-season stats attached where
    /// resolvable.
    pub async fn comparables_with_stats(&self, limit: usize) -> Vec<ComparableWithStats> {
        let Some(predictions_text) = self.table_text(&self.config.sources.predictions).await
        else {
            return Vec::new();
        };
        let Some(stats_text) = self.table_text(&self.config.sources.pitching_stats).await else {
            // Predictions still come back, just without stats.
            return predictions::select_comparables(&predictions_text, &self.config.roster, limit)
                .into_iter()
                .map(|prediction| ComparableWithStats {
                    prediction,
                    stats: None,
                })
                .collect();
        };
        predictions::comparables_with_stats(
            &predictions_text,
            &stats_text,
            &self.config.roster,
            limit,
            self.config.matching.default_season,
        )
    }

    // -- Historical comparables --

    pub async fn historical_records(&self) -> Vec<HistoricalArbitrationRecord> {
        match self.historical_text().await {
            Some(text) => history::load_historical(&text),
            None => Vec::new(),
        }
    }

    /// Rank the historical pool against a reference season, closest first.
    pub async fn historical_comparables(
        &self,
        reference: &SeasonStats,
        limit: usize,
    ) -> Vec<HistoricalArbitrationRecord> {
        let records = self.historical_records().await;
        history::find_historical_comparables(&records, reference, limit)
    }
}
