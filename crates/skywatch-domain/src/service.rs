use crate::narrative::NarrativeGenerator;
use crate::reading::ReadingStore;
use crate::report::{render_report, NARRATIVE_FALLBACK, STORE_FAILURE_MESSAGE};
use crate::snapshot::build_snapshot;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Builds on-demand sensor reports: query the store for the lookback
/// window, aggregate the latest readings, attach a narrative summary,
/// render the reply text.
pub struct ReportService {
    reading_store: Arc<dyn ReadingStore>,
    narrative_generator: Arc<dyn NarrativeGenerator>,
    site_label: String,
    lookback: Duration,
}

impl ReportService {
    pub fn new(
        reading_store: Arc<dyn ReadingStore>,
        narrative_generator: Arc<dyn NarrativeGenerator>,
        site_label: String,
        lookback: Duration,
    ) -> Self {
        Self {
            reading_store,
            narrative_generator,
            site_label,
            lookback,
        }
    }

    /// Assemble the report text for the current moment.
    ///
    /// Always returns sendable text: a store failure collapses to the fixed
    /// failure message, a narrative failure degrades to the fallback
    /// sentence, and absent channels render as placeholders.
    #[instrument(skip(self))]
    pub async fn build_report(&self) -> String {
        let window_end = Utc::now();
        let window_start = window_end - self.lookback;

        let readings = match self
            .reading_store
            .readings_between(window_start, window_end)
            .await
        {
            Ok(readings) => readings,
            Err(e) => {
                error!(error = %e, "failed to query sensor readings");
                return STORE_FAILURE_MESSAGE.to_string();
            }
        };

        let snapshot = build_snapshot(&readings, window_end, self.lookback);
        if snapshot.is_empty() {
            warn!("no readings inside the lookback window");
        }

        let narrative = match self.narrative_generator.summarize(&snapshot).await {
            Ok(sentence) => sentence,
            Err(e) => {
                warn!(error = %e, "narrative generation failed, using fallback");
                NARRATIVE_FALLBACK.to_string()
            }
        };

        info!(readings = readings.len(), empty = snapshot.is_empty(), "report assembled");
        render_report(&snapshot, &narrative, &self.site_label)
    }
}
