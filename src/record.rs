use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

use std::{io::Read, path::Path};

use crate::usd::Usd;

/// Columns the export must contain. Any other columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Day",
    "Campaign name",
    "Amount spent (USD)",
    "Link clicks",
    "Leads",
    "Messaging conversations started",
];

/// Defines the CSV format for one campaign's performance on one day.
///
/// Metric cells left empty by the export are read as zero.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct CampaignRecord {
    #[serde(rename = "Day")]
    pub day: NaiveDate,
    #[serde(rename = "Campaign name")]
    pub campaign_name: String,
    #[serde(rename = "Amount spent (USD)")]
    #[serde_as(as = "DefaultOnNull")]
    pub amount_spent: Usd,
    #[serde(rename = "Link clicks")]
    #[serde_as(as = "DefaultOnNull")]
    pub link_clicks: u64,
    #[serde(rename = "Leads")]
    #[serde_as(as = "DefaultOnNull")]
    pub leads: u64,
    #[serde(rename = "Messaging conversations started")]
    #[serde_as(as = "DefaultOnNull")]
    pub messages_started: u64,
}

/// Reads every campaign record from the CSV file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, if any required column is
/// missing, or if any row fails to parse. A single bad row fails the whole
/// file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<CampaignRecord>> {
    let path = path.as_ref();
    let rdr = csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    read_records(rdr, &path.display().to_string())
}

/// Reads every campaign record from CSV data in `data`.
///
/// `source` names the data in error messages.
///
/// # Errors
///
/// As for [`read_csv`].
pub fn from_reader(data: impl Read, source: &str) -> Result<Vec<CampaignRecord>> {
    read_records(csv::Reader::from_reader(data), source)
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>, source: &str) -> Result<Vec<CampaignRecord>> {
    let headers = rdr
        .headers()
        .with_context(|| format!("reading header row of {source}"))?;
    let missing: Vec<_> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| format!("{column:?}"))
        .collect();
    if !missing.is_empty() {
        bail!("{source}: missing required column(s): {}", missing.join(", "));
    }
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: CampaignRecord = result.with_context(|| source.to_string())?;
        if record.campaign_name.is_empty() {
            bail!("{source}: row {}: empty campaign name", records.len() + 1);
        }
        records.push(record);
    }
    tracing::info!(source, records = records.len(), "loaded campaign records");
    Ok(records)
}
