//! Turning sites and samples into map markers.
//!
//! Each located site is joined against the samples, classified, and handed
//! to a [`Presenter`] as a [`Marker`]. Sites without coordinates never reach
//! the presenter.

use crate::{
    config::Config,
    health::HealthStatus,
    join::{join_on, JoinedDataset},
    labels::Labels,
    record::Record,
    site::{Coordinates, Site},
};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// What the popup of a marker shows.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SiteInfo {
    pub site: String,
    /// Passthrough columns of the site record (description, photo, ...)
    pub fields: Record,
    /// Display label of each joined column, same order as `data.columns()`
    pub labels: Vec<String>,
    pub data: JoinedDataset,
}

/// One flag on the map.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Marker {
    pub title: String,
    pub position: Coordinates,
    pub status: HealthStatus,
    pub flag: usize,
    pub icon: &'static str,
    pub info: SiteInfo,
}

/// Sink for markers, called once per located site in site order.
pub trait Presenter {
    fn present(&mut self, marker: Marker);
}

impl Presenter for Vec<Marker> {
    fn present(&mut self, marker: Marker) {
        self.push(marker);
    }
}

/// Presenter that only counts sites per status, without keeping markers.
#[derive(Debug, Default)]
pub struct StatusTally(pub BTreeMap<HealthStatus, usize>);

impl Presenter for StatusTally {
    fn present(&mut self, marker: Marker) {
        *self.0.entry(marker.status).or_default() += 1;
    }
}

/// Outcome of one pass over the sites.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct RenderSummary {
    pub sites: usize,
    pub presented: usize,
    /// Sites dropped for lack of coordinates
    pub skipped: Vec<String>,
    pub by_status: BTreeMap<HealthStatus, usize>,
}

/// Join, classify and present every located site.
///
/// `now` is the reference time for the staleness window.
pub fn build_markers<P: Presenter + ?Sized>(
    sites: &[Site],
    samples: &[Record],
    labels: &Labels,
    config: &Config,
    now: DateTime<Utc>,
    presenter: &mut P,
) -> RenderSummary {
    let classifier = config.classifier();
    let mut summary = RenderSummary {
        sites: sites.len(),
        ..RenderSummary::default()
    };
    for site in sites {
        let Some(position) = site.coordinates() else {
            warn!("{} location unknown.", site.site_id);
            summary.skipped.push(site.site_id.clone());
            continue;
        };
        let data = join_on(
            samples,
            &config.sample_site_field,
            &site.site_id,
            labels.columns(),
        );
        let status = classifier.classify(&data, now);
        *summary.by_status.entry(status).or_default() += 1;
        summary.presented += 1;
        presenter.present(Marker {
            title: site.site_id.clone(),
            position,
            status,
            flag: status.flag_index(),
            icon: status.icon(),
            info: SiteInfo {
                site: site.site_id.clone(),
                fields: site.fields.clone(),
                labels: labels.display_labels().to_vec(),
                data,
            },
        });
    }
    info!(
        "Presented {} of {} sites ({} without location)",
        summary.presented,
        summary.sites,
        summary.skipped.len()
    );
    summary
}
