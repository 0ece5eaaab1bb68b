//! Marker rendering and site classification commands.

use crate::{source, InputArgs};
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{info, warn};
use wqm_core::{
    config::Config,
    labels::Labels,
    marker::{build_markers, Marker, RenderSummary, StatusTally},
    record::Record,
    site::Site,
};
use wqm_utils::dates::parse_timestamp;

/// Everything one pass over the sites needs, loaded and resolved.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub sites: Vec<Site>,
    pub samples: Vec<Record>,
    pub labels: Labels,
    pub config: Config,
    pub now: DateTime<Utc>,
}

/// Config file (or defaults) with command-line overrides applied.
pub fn resolve_config(args: &InputArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            Config::from_json(&body)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(days) = args.staleness_days {
        config.staleness_days = days;
    }
    if let Some(good) = args.good {
        config.good_threshold = good;
    }
    if let Some(caution) = args.caution {
        config.caution_threshold = caution;
    }
    config.validate()?;
    Ok(config)
}

pub fn resolve_now(args: &InputArgs) -> anyhow::Result<DateTime<Utc>> {
    match &args.now {
        Some(s) => parse_timestamp(s).ok_or_else(|| anyhow::anyhow!("Invalid --now value: {}", s)),
        None => Ok(Utc::now()),
    }
}

/// Desired columns come from the labels table, then `--columns`, then the
/// configured date and count columns.
fn resolve_labels(args: &InputArgs, config: &Config, labels: Option<Labels>) -> Labels {
    match labels {
        Some(labels) => {
            if !args.columns.is_empty() {
                warn!("Both --labels and --columns given; using the labels table");
            }
            labels
        }
        None if !args.columns.is_empty() => Labels::from_columns(
            args.columns
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        ),
        None => Labels::from_columns(vec![config.date_column.clone(), config.count_column.clone()]),
    }
}

/// Load the sites, the samples and the labels, in that order.
pub async fn load_inputs(args: &InputArgs) -> anyhow::Result<Inputs> {
    let config = resolve_config(args)?;
    let now = resolve_now(args)?;
    let client = source::build_client()?;

    let site_records = source::load_records(&client, &args.sites).await?;
    let samples = source::load_records(&client, &args.samples).await?;
    let labels = match &args.labels {
        Some(location) => Some(source::load_labels(&client, location).await?),
        None => None,
    };
    let labels = resolve_labels(args, &config, labels);
    let sites = Site::from_records(&site_records, &config.site_field);

    info!(
        "{} sites, {} samples, {} columns, reference time {}",
        sites.len(),
        samples.len(),
        labels.columns().len(),
        now.to_rfc3339()
    );
    Ok(Inputs {
        sites,
        samples,
        labels,
        config,
        now,
    })
}

pub fn render(inputs: &Inputs) -> (Vec<Marker>, RenderSummary) {
    let mut markers: Vec<Marker> = Vec::new();
    let summary = build_markers(
        &inputs.sites,
        &inputs.samples,
        &inputs.labels,
        &inputs.config,
        inputs.now,
        &mut markers,
    );
    (markers, summary)
}

/// Sites per status, without building the marker list.
pub fn tally(inputs: &Inputs) -> StatusTally {
    let mut tally = StatusTally::default();
    build_markers(
        &inputs.sites,
        &inputs.samples,
        &inputs.labels,
        &inputs.config,
        inputs.now,
        &mut tally,
    );
    tally
}

/// One `status<TAB>count` line per status seen.
pub fn count_lines(tally: &StatusTally) -> Vec<String> {
    tally
        .0
        .iter()
        .map(|(status, count)| format!("{}\t{}", status, count))
        .collect()
}

/// One `site<TAB>status` line per marker.
pub fn status_lines(markers: &[Marker]) -> Vec<String> {
    markers
        .iter()
        .map(|m| format!("{}\t{}", m.title, m.status))
        .collect()
}

pub async fn run_markers(args: &InputArgs, output: Option<&str>) -> anyhow::Result<()> {
    let inputs = load_inputs(args).await?;
    let (markers, summary) = render(&inputs);
    let json = serde_json::to_string_pretty(&markers)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("Failed to write {}", path))?;
            info!("Wrote {} markers to {}", markers.len(), path);
        }
        None => println!("{}", json),
    }
    for (status, count) in &summary.by_status {
        info!("  {}: {}", status, count);
    }
    Ok(())
}

pub async fn run_classify(args: &InputArgs, counts: bool) -> anyhow::Result<()> {
    let inputs = load_inputs(args).await?;
    let lines = if counts {
        count_lines(&tally(&inputs))
    } else {
        status_lines(&render(&inputs).0)
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
