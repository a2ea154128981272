use anyhow::{Context, Result};
use chrono::NaiveDate;

use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
};

use crate::{
    campaigns::{Campaigns, Category},
    record::CampaignRecord,
    usd::Usd,
};

/// Summed metrics for one category on one day.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Metrics {
    pub spent: Usd,
    pub link_clicks: u64,
    pub leads: u64,
    pub messages_started: u64,
}

impl Metrics {
    /// Adds `rhs`, or returns `None` if any sum overflows.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            spent: self.spent.checked_add(rhs.spent)?,
            link_clicks: self.link_clicks.checked_add(rhs.link_clicks)?,
            leads: self.leads.checked_add(rhs.leads)?,
            messages_started: self.messages_started.checked_add(rhs.messages_started)?,
        })
    }
}

impl From<&CampaignRecord> for Metrics {
    fn from(record: &CampaignRecord) -> Self {
        Self {
            spent: record.amount_spent,
            link_clicks: record.link_clicks,
            leads: record.leads,
            messages_started: record.messages_started,
        }
    }
}

/// Configured campaigns with no records on a given day, by category.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MissingCampaigns {
    pub instagram_facebook: Vec<String>,
    pub website: Vec<String>,
}

impl MissingCampaigns {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instagram_facebook.is_empty() && self.website.is_empty()
    }
}

/// Formats the note for the report's comments column, for example:
///
/// ```txt
/// Missing Instagram & Facebook: A; B | Missing Website: C
/// ```
///
/// Names are separated by `; ` since campaign names may contain commas. A
/// category with nothing missing is left out, and nothing missing at all
/// gives an empty string.
impl Display for MissingCampaigns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let groups: Vec<_> = [
            (Category::InstagramFacebook, &self.instagram_facebook),
            (Category::Website, &self.website),
        ]
        .into_iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(category, names)| format!("Missing {category}: {}", names.join("; ")))
        .collect();
        f.write_str(&groups.join(" | "))
    }
}

/// One day's performance, split by category.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DailyAggregate {
    pub day: NaiveDate,
    pub instagram_facebook: Metrics,
    pub website: Metrics,
    /// Unlisted campaigns. Kept for totals, never reported.
    pub other: Metrics,
    /// Instagram & Facebook leads and messaging starts, plus Website
    /// messaging starts.
    pub target_leads: u64,
    pub cost_per_lead_ig: Usd,
    pub cost_per_click_site: Usd,
    pub cost_per_lead_site: Usd,
    pub missing: MissingCampaigns,
}

impl DailyAggregate {
    fn new(day: NaiveDate, records: &[&CampaignRecord], campaigns: &Campaigns) -> Result<Self> {
        let mut instagram_facebook = Metrics::default();
        let mut website = Metrics::default();
        let mut other = Metrics::default();
        let mut seen = HashSet::new();
        for &record in records {
            seen.insert(record.campaign_name.as_str());
            let sum = match campaigns.classify(&record.campaign_name) {
                Category::InstagramFacebook => &mut instagram_facebook,
                Category::Website => &mut website,
                Category::Other => {
                    tracing::debug!(%day, campaign = %record.campaign_name, "unlisted campaign");
                    &mut other
                }
            };
            *sum = sum.checked_add(Metrics::from(record)).with_context(|| {
                format!("{day}: totals overflow at campaign {:?}", record.campaign_name)
            })?;
        }
        let absent = |category: Category| -> Vec<String> {
            campaigns
                .names(category)
                .iter()
                .filter(|name| !seen.contains(name.as_str()))
                .cloned()
                .collect()
        };
        let missing = MissingCampaigns {
            instagram_facebook: absent(Category::InstagramFacebook),
            website: absent(Category::Website),
        };
        let target_leads = instagram_facebook
            .leads
            .checked_add(instagram_facebook.messages_started)
            .and_then(|n| n.checked_add(website.messages_started))
            .with_context(|| format!("{day}: target leads overflow"))?;
        let aggregate = Self {
            day,
            instagram_facebook,
            website,
            other,
            target_leads,
            cost_per_lead_ig: instagram_facebook.spent.per(target_leads),
            cost_per_click_site: website.spent.per(website.link_clicks),
            cost_per_lead_site: website.spent.per(website.leads),
            missing,
        };
        aggregate
            .total()
            .with_context(|| format!("{day}: day totals overflow"))?;
        Ok(aggregate)
    }

    /// Returns the day's metrics over every record, listed or not.
    ///
    /// Always `Some` for an aggregate built by [`aggregate`].
    #[must_use]
    pub fn total(&self) -> Option<Metrics> {
        self.instagram_facebook
            .checked_add(self.website)?
            .checked_add(self.other)
    }
}

/// Groups `records` by day and sums each day's metrics per category.
///
/// Returns one aggregate per distinct day, in ascending date order whatever
/// the order of the input.
///
/// # Errors
///
/// Returns an error if any day's sums overflow.
pub fn aggregate(records: &[CampaignRecord], campaigns: &Campaigns) -> Result<Vec<DailyAggregate>> {
    let mut days: BTreeMap<NaiveDate, Vec<&CampaignRecord>> = BTreeMap::new();
    for record in records {
        days.entry(record.day).or_default().push(record);
    }
    days.into_iter()
        .map(|(day, records)| -> Result<DailyAggregate> {
            let aggregate = DailyAggregate::new(day, &records, campaigns)?;
            tracing::debug!(
                %day,
                records = records.len(),
                target_leads = aggregate.target_leads,
                missing = %aggregate.missing,
                "aggregated day"
            );
            Ok(aggregate)
        })
        .collect()
}
