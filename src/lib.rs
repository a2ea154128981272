#![doc = include_str!("../README.md")]
pub mod campaigns;
pub mod daily;
pub mod discover;
pub mod export;
pub mod layout;
pub mod record;
pub mod usd;

pub use campaigns::{Campaigns, Category};
pub use daily::{aggregate, DailyAggregate, Metrics, MissingCampaigns};
pub use layout::{assemble, Table, Variant, VARIANTS};
pub use record::{read_csv, CampaignRecord};
pub use usd::Usd;

/// Aggregates `records` by day and lays the result out once per variant.
///
/// # Errors
///
/// Returns an error if any day's sums overflow.
///
/// # Examples
///
/// ```
/// # use adreport::{reports, Campaigns, Category, VARIANTS};
/// let data = "\
/// Day,Campaign name,Amount spent (USD),Link clicks,Leads,Messaging conversations started
/// 2024-09-22,SITE / Cold,50.00,25,2,1
/// ";
/// let records = adreport::record::from_reader(data.as_bytes(), "example").unwrap();
/// let mut campaigns = Campaigns::new();
/// campaigns.add(Category::Website, "SITE / Cold").unwrap();
/// let tables = reports(&records, &campaigns, &VARIANTS).unwrap();
/// assert_eq!(tables.len(), 2);
/// assert_eq!(tables[0].rows.len(), 1);
/// ```
pub fn reports(
    records: &[CampaignRecord],
    campaigns: &Campaigns,
    variants: &[Variant],
) -> anyhow::Result<Vec<Table>> {
    let days = aggregate(records, campaigns)?;
    Ok(variants
        .iter()
        .map(|variant| assemble(*variant, &days))
        .collect())
}
