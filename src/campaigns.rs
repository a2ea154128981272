use anyhow::{bail, Context, Result};

use std::{
    collections::HashMap,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

/// The reporting bucket a campaign belongs to.
///
/// `Other` is where every campaign not listed in the configuration ends up.
/// Its records are kept, but never published in a report column.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum Category {
    InstagramFacebook,
    Website,
    Other,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Category::InstagramFacebook => "Instagram & Facebook",
            Category::Website => "Website",
            Category::Other => "Other",
        })
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "website" | "site" => Ok(Category::Website),
            "instagram & facebook" | "instagram&facebook" | "instagramfacebook" | "ig/fb" => {
                Ok(Category::InstagramFacebook)
            }
            "other" => bail!("campaigns cannot be configured as {s:?}; unlisted campaigns are Other"),
            _ => bail!("unknown category {s:?} (expected Website or Instagram & Facebook)"),
        }
    }
}

/// Holds the campaign names that make up each reporting category.
///
/// Names are matched exactly: no trimming, no case folding. A campaign whose
/// name drifts in the export (an extra space, say) is classified as
/// [`Category::Other`], and shows up as missing in that day's comments.
///
/// To create an empty configuration, use [`Self::new`]. The default lists
/// are available from [`Self::builtin`].
#[derive(Clone, Debug, Default)]
pub struct Campaigns {
    instagram_facebook: Vec<String>,
    website: Vec<String>,
    lookup: HashMap<String, Category>,
}

impl Campaigns {
    /// Creates a configuration with no campaigns in either category.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the standard campaign lists.
    #[must_use]
    pub fn builtin() -> Self {
        let mut campaigns = Self::new();
        for name in [
            "NL / Lead / CBO / Kyiv Odesa / 26.07.2024",
            "SITE / Cold / ABO / Lead / 29.05.2024",
            "SITE / NLAS / Warm / ABO / 12.02.2024",
        ] {
            campaigns.insert(Category::Website, name);
        }
        for name in [
            "INST / Engagement / COLD - 22.05.2024",
            "INST / Engagement Messages / WARM - 20.05.2024",
            "NL / Fb Lead Form / Ugly hair / Lookalike (UA, 1%) - LTV ALL/ 26/08/2024 Campaign",
            "NL / TRAFF / Inst / 24.07.2024",
            "NL / Tailored leads campaign / Lookalike (UA, 1%) - LTV ALL/ 15/07/2024 Campaign",
        ] {
            campaigns.insert(Category::InstagramFacebook, name);
        }
        campaigns
    }

    /// Reads campaign configuration from `path`.
    ///
    /// The file lists one campaign per line, in the following format:
    ///
    /// ```txt
    /// CATEGORY | CAMPAIGN NAME
    /// ```
    ///
    /// where `CATEGORY` is `Website` or `Instagram & Facebook`, in any case.
    /// `Site` is accepted for `Website`, and `Instagram&Facebook`,
    /// `InstagramFacebook` and `IG/FB` for `Instagram & Facebook`. Blank lines
    /// and lines starting with `#` are ignored. Everything after the first
    /// ` | ` is the campaign name, exactly as it appears in the export.
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// * The file cannot be opened or read
    /// * There is a line with an invalid format (no `|` character)
    /// * A category is not recognised
    /// * A campaign is listed under both categories
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut campaigns = Self::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("reading {}", path.display()))?;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((category, name)) = line.split_once(" | ") else {
                bail!(
                    "reading {}: line {}: bad line format (missing |): {line}",
                    path.display(),
                    number + 1,
                );
            };
            let category = category
                .parse::<Category>()
                .with_context(|| format!("reading {}: line {}", path.display(), number + 1))?;
            campaigns
                .add(category, name)
                .with_context(|| format!("reading {}: line {}", path.display(), number + 1))?;
        }
        Ok(campaigns)
    }

    /// Adds campaign `name` to `category`.
    ///
    /// Adding a name that is already in the same category has no effect.
    ///
    /// # Examples
    ///
    /// ```
    /// # use adreport::{Campaigns, Category};
    /// let mut campaigns = Campaigns::new();
    /// campaigns.add(Category::Website, "SITE / Cold").unwrap();
    /// assert_eq!(campaigns.classify("SITE / Cold"), Category::Website);
    /// assert_eq!(campaigns.classify("SITE /  Cold"), Category::Other);
    /// assert!(campaigns.add(Category::InstagramFacebook, "SITE / Cold").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if `category` is [`Category::Other`], or if `name` is
    /// already configured under the other category. Counting one campaign
    /// towards both categories would double its spend.
    pub fn add(&mut self, category: Category, name: &str) -> Result<()> {
        if category == Category::Other {
            bail!("campaign {name:?}: unlisted campaigns are Other; it cannot be configured");
        }
        match self.lookup.get(name) {
            Some(&existing) if existing == category => Ok(()),
            Some(&existing) => bail!(
                "campaign {name:?} is configured as both {existing} and {category}"
            ),
            None => {
                self.insert(category, name);
                Ok(())
            }
        }
    }

    fn insert(&mut self, category: Category, name: &str) {
        self.lookup.insert(name.to_string(), category);
        match category {
            Category::InstagramFacebook => self.instagram_facebook.push(name.to_string()),
            Category::Website => self.website.push(name.to_string()),
            Category::Other => {}
        }
    }

    /// Returns the category for `campaign_name`.
    #[must_use]
    pub fn classify(&self, campaign_name: &str) -> Category {
        self.lookup
            .get(campaign_name)
            .copied()
            .unwrap_or(Category::Other)
    }

    /// Returns the configured names for `category`, in configuration order.
    ///
    /// [`Category::Other`] has no configured names.
    #[must_use]
    pub fn names(&self, category: Category) -> &[String] {
        match category {
            Category::InstagramFacebook => &self.instagram_facebook,
            Category::Website => &self.website,
            Category::Other => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_fn_correctly_parses_campaigns_config_file() {
        let campaigns = Campaigns::from_file("testdata/campaigns").unwrap();
        assert_eq!(
            campaigns.classify("SITE / Cold / ABO / Lead / 29.05.2024"),
            Category::Website
        );
        assert_eq!(
            campaigns.classify("INST / Engagement / COLD - 22.05.2024"),
            Category::InstagramFacebook
        );
        assert_eq!(
            campaigns.classify("NL / Fb Lead Form / Lookalike (UA, 1%)"),
            Category::InstagramFacebook
        );
        assert_eq!(campaigns.classify("bogus campaign"), Category::Other);
        assert_eq!(campaigns.names(Category::Website).len(), 1);
        assert_eq!(campaigns.names(Category::InstagramFacebook).len(), 3);
    }

    #[test]
    fn from_file_fn_returns_error_for_bad_line_format() {
        assert!(Campaigns::from_file("testdata/campaigns.bad").is_err());
    }

    #[test]
    fn from_file_fn_returns_error_for_campaign_in_both_categories() {
        let err = Campaigns::from_file("testdata/campaigns.overlap").unwrap_err();
        assert!(format!("{err:#}").contains("configured as both"), "{err:#}");
    }

    #[test]
    fn from_file_fn_returns_error_for_unknown_category() {
        assert!(Campaigns::from_file("testdata/campaigns.unknown").is_err());
    }

    #[test]
    fn classify_fn_matches_names_exactly() {
        let mut campaigns = Campaigns::new();
        campaigns.add(Category::Website, "SITE / Warm").unwrap();
        assert_eq!(campaigns.classify("SITE / Warm"), Category::Website);
        assert_eq!(campaigns.classify("site / warm"), Category::Other);
        assert_eq!(campaigns.classify("SITE /  Warm"), Category::Other);
        assert_eq!(campaigns.classify(" SITE / Warm"), Category::Other);
        assert_eq!(campaigns.classify(""), Category::Other);
    }

    #[test]
    fn add_fn_ignores_repeat_in_same_category() {
        let mut campaigns = Campaigns::new();
        campaigns.add(Category::Website, "A").unwrap();
        campaigns.add(Category::Website, "A").unwrap();
        assert_eq!(campaigns.names(Category::Website), ["A".to_string()]);
    }

    #[test]
    fn add_fn_rejects_other_category() {
        let mut campaigns = Campaigns::new();
        assert!(campaigns.add(Category::Other, "A").is_err());
        assert_eq!(campaigns.classify("A"), Category::Other);
    }

    #[test]
    fn builtin_fn_has_disjoint_category_lists() {
        let campaigns = Campaigns::builtin();
        assert_eq!(campaigns.names(Category::Website).len(), 3);
        assert_eq!(campaigns.names(Category::InstagramFacebook).len(), 5);
        for name in campaigns.names(Category::Website) {
            assert_eq!(campaigns.classify(name), Category::Website);
        }
        for name in campaigns.names(Category::InstagramFacebook) {
            assert_eq!(campaigns.classify(name), Category::InstagramFacebook);
        }
    }

    #[test]
    fn category_from_str_fn_accepts_aliases() {
        assert_eq!(Category::from_str("Website").unwrap(), Category::Website);
        assert_eq!(
            Category::from_str("Instagram & Facebook").unwrap(),
            Category::InstagramFacebook
        );
        assert_eq!(
            Category::from_str("instagram&facebook").unwrap(),
            Category::InstagramFacebook
        );
        assert_eq!(Category::from_str(" SITE ").unwrap(), Category::Website);
        assert_eq!(
            Category::from_str("InstagramFacebook").unwrap(),
            Category::InstagramFacebook
        );
        assert_eq!(Category::from_str("IG/FB").unwrap(), Category::InstagramFacebook);
        assert!(Category::from_str("Other").is_err());
        assert!(Category::from_str("TikTok").is_err());
        assert!(Category::from_str("web").is_err());
    }
}
