//! Report variants: which aggregate fields appear, in which column, under
//! which header.
//!
//! A [`Variant`] is a fixed list of [`Column`]s. Assembling a variant over the
//! daily aggregates gives a [`Table`] of plain [`Cell`] values that the
//! exporter renders. Nothing here computes; it only selects and renames.

use chrono::NaiveDate;

use crate::{daily::DailyAggregate, usd::Usd};

use Column::{Blank, Data};

/// An aggregate field that can be placed in a report column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Day,
    IgBudget,
    IgLinkClicks,
    IgLeads,
    IgMessagesStarted,
    SiteMessagesStarted,
    IgTargetLeads,
    IgCostPerLead,
    SiteBudget,
    SiteLinkClicks,
    SiteLeads,
    SiteCostPerClick,
    SiteCostPerLead,
    Comments,
}

/// Column groups share a background colour in the exported document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnGroup {
    Day,
    InstagramFacebook,
    Website,
    Comments,
    Blank,
}

impl Field {
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Field::Day => "Day",
            Field::IgBudget => "Instagram&Facebook_Budget",
            Field::IgLinkClicks => "Instagram&Facebook_Link_Clicks",
            Field::IgLeads => "Instagram&Facebook_Leads",
            Field::IgMessagesStarted => "Instagram&Facebook_Messaging_Conversations_Started",
            Field::SiteMessagesStarted => "Website_Messaging_Conversations_Started",
            Field::IgTargetLeads => "Instagram&Facebook_Target_Leads",
            Field::IgCostPerLead => "Instagram&Facebook_Cost_Per_Lead",
            Field::SiteBudget => "Website_Budget",
            Field::SiteLinkClicks => "Website_Link_Clicks",
            Field::SiteLeads => "Website_Leads",
            Field::SiteCostPerClick => "Website_Cost_Per_Link_Click",
            Field::SiteCostPerLead => "Website_Cost_Per_Lead",
            Field::Comments => "Comments",
        }
    }

    /// Website messaging starts count towards the Instagram & Facebook lead
    /// target, so they are coloured with that group.
    #[must_use]
    pub fn group(self) -> ColumnGroup {
        match self {
            Field::Day => ColumnGroup::Day,
            Field::IgBudget
            | Field::IgLinkClicks
            | Field::IgLeads
            | Field::IgMessagesStarted
            | Field::SiteMessagesStarted
            | Field::IgTargetLeads
            | Field::IgCostPerLead => ColumnGroup::InstagramFacebook,
            Field::SiteBudget
            | Field::SiteLinkClicks
            | Field::SiteLeads
            | Field::SiteCostPerClick
            | Field::SiteCostPerLead => ColumnGroup::Website,
            Field::Comments => ColumnGroup::Comments,
        }
    }

    fn cell(self, day: &DailyAggregate) -> Cell {
        let ig = &day.instagram_facebook;
        let site = &day.website;
        match self {
            Field::Day => Cell::Date(day.day),
            Field::IgBudget => Cell::Money(ig.spent),
            Field::IgLinkClicks => Cell::Count(ig.link_clicks),
            Field::IgLeads => Cell::Count(ig.leads),
            Field::IgMessagesStarted => Cell::Count(ig.messages_started),
            Field::SiteMessagesStarted => Cell::Count(site.messages_started),
            Field::IgTargetLeads => Cell::Count(day.target_leads),
            Field::IgCostPerLead => Cell::Money(day.cost_per_lead_ig),
            Field::SiteBudget => Cell::Money(site.spent),
            Field::SiteLinkClicks => Cell::Count(site.link_clicks),
            Field::SiteLeads => Cell::Count(site.leads),
            Field::SiteCostPerClick => Cell::Money(day.cost_per_click_site),
            Field::SiteCostPerLead => Cell::Money(day.cost_per_lead_site),
            Field::Comments => Cell::Text(day.missing.to_string()),
        }
    }
}

/// One column of a report layout: an aggregate field, or a placeholder kept
/// empty so that later columns stay where the manual tracker expects them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Column {
    Data(Field),
    Blank,
}

impl Column {
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::Data(field) => field.header(),
            Column::Blank => "",
        }
    }

    #[must_use]
    pub fn group(self) -> ColumnGroup {
        match self {
            Column::Data(field) => field.group(),
            Column::Blank => ColumnGroup::Blank,
        }
    }
}

/// How the output file for a variant is named.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Naming {
    /// Always `{file_stem}.xlsx`.
    Fixed,
    /// `{file_stem}` followed by the calendar months the data covers.
    ByMonth,
}

/// A named, fixed report layout.
#[derive(Clone, Copy, Debug)]
pub struct Variant {
    pub name: &'static str,
    pub sheet: &'static str,
    pub file_stem: &'static str,
    pub naming: Naming,
    pub columns: &'static [Column],
}

/// Every metric, with the cost ratios next to the sums they derive from.
pub const SUMMARY: Variant = Variant {
    name: "summary",
    sheet: "Haircheck Report",
    file_stem: "Haircheck_Report",
    naming: Naming::Fixed,
    columns: &[
        Data(Field::Day),
        Data(Field::IgBudget),
        Data(Field::IgLinkClicks),
        Data(Field::IgLeads),
        Data(Field::IgMessagesStarted),
        Data(Field::SiteMessagesStarted),
        Data(Field::IgTargetLeads),
        Data(Field::IgCostPerLead),
        Data(Field::SiteBudget),
        Data(Field::SiteLinkClicks),
        Data(Field::SiteLeads),
        Data(Field::SiteCostPerClick),
        Data(Field::SiteCostPerLead),
        Data(Field::Comments),
    ],
};

/// The layout of the manually maintained tracker sheet. Blank columns are
/// filled in by hand after pasting.
pub const TRACKER: Variant = Variant {
    name: "tracker",
    sheet: "Tracker",
    file_stem: "Tracker",
    naming: Naming::ByMonth,
    columns: &[
        Data(Field::Day),
        Data(Field::IgBudget),
        Blank,
        Data(Field::IgTargetLeads),
        Data(Field::IgCostPerLead),
        Blank,
        Blank,
        Data(Field::SiteBudget),
        Data(Field::SiteLinkClicks),
        Data(Field::SiteCostPerClick),
        Data(Field::SiteLeads),
        Data(Field::SiteCostPerLead),
        Blank,
        Data(Field::Comments),
    ],
};

pub const VARIANTS: [Variant; 2] = [SUMMARY, TRACKER];

/// Looks up a variant by name.
#[must_use]
pub fn variant(name: &str) -> Option<Variant> {
    VARIANTS.into_iter().find(|v| v.name == name)
}

/// A single output value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Cell {
    Date(NaiveDate),
    Money(Usd),
    Count(u64),
    Text(String),
    Blank,
}

/// A finished report, ready for export.
#[derive(Clone, Debug)]
pub struct Table {
    pub variant: Variant,
    pub days: Vec<NaiveDate>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    #[must_use]
    pub fn columns(&self) -> &'static [Column] {
        self.variant.columns
    }
}

/// Lays out `days` in the columns of `variant`, one row per day.
#[must_use]
pub fn assemble(variant: Variant, days: &[DailyAggregate]) -> Table {
    let rows = days
        .iter()
        .map(|day| {
            variant
                .columns
                .iter()
                .map(|column| match column {
                    Data(field) => field.cell(day),
                    Blank => Cell::Blank,
                })
                .collect()
        })
        .collect();
    Table {
        variant,
        days: days.iter().map(|d| d.day).collect(),
        rows,
    }
}
