//! Page Commands
//!
//! Handle what content scripts report about the page they run in.

use super::message::Badge;
use crate::domain::compat::{find_compatible_ides, ides_for_repository};
use crate::domain::{CompatibilityData, CompatibleIde, PerformanceSample, RepoRef};
use crate::AppState;

pub const BADGE_COLOR: &str = "#4CAF50";

/// Compatible IDEs for the page, plus the badge to show when there are any
pub fn ide_compatibility(data: &CompatibilityData, tab_id: Option<i64>) -> (Vec<CompatibleIde>, Option<Badge>) {
    let ides = find_compatible_ides(data);
    let badge = (!ides.is_empty()).then(|| Badge {
        text: ides.len().to_string(),
        color: BADGE_COLOR.to_string(),
        tab_id,
    });
    (ides, badge)
}

pub async fn performance_data(state: &AppState, tab_id: i64, sample: &PerformanceSample) -> Vec<String> {
    let now = state.clock.now_millis();
    state.monitor.record(tab_id, sample, now).await
}

/// Drop the performance sample of a closed tab
pub async fn tab_closed(state: &AppState, tab_id: i64) {
    if state.monitor.forget(tab_id).await {
        log::debug!("Forgot performance sample for tab {}", tab_id);
    }
}

pub fn repository_ides(url: &str) -> Result<(RepoRef, Vec<CompatibleIde>), String> {
    ides_for_repository(url).map_err(|e| e.to_string())
}
