/// Curated organization names and their canonical domains.
///
/// Keys are normalized (trimmed, lower-case). Variants that only differ in
/// punctuation do not need their own entry: lookups are retried against the
/// cleaned name.
pub const KNOWN_COMPANIES: &[(&str, &str)] = &[
    ("pwc", "pwc.com"),
    ("pricewaterhousecoopers", "pwc.com"),
    ("deloitte", "deloitte.com"),
    ("ey", "ey.com"),
    ("ernst young", "ey.com"),
    ("kpmg", "kpmg.com"),
    ("accenture", "accenture.com"),
    ("mckinsey", "mckinsey.com"),
    ("mckinsey company", "mckinsey.com"),
    ("boston consulting group", "bcg.com"),
    ("bcg", "bcg.com"),
    ("bain", "bain.com"),
    ("bain company", "bain.com"),
    ("goldman sachs", "goldmansachs.com"),
    ("morgan stanley", "morganstanley.com"),
    ("j.p. morgan", "jpmorgan.com"),
    ("jp morgan", "jpmorgan.com"),
    ("jpmorgan chase", "jpmorganchase.com"),
    ("barclays", "barclays.com"),
    ("hsbc", "hsbc.com"),
    ("citi", "citi.com"),
    ("citigroup", "citi.com"),
    ("blackrock", "blackrock.com"),
    ("google", "google.com"),
    ("alphabet", "abc.xyz"),
    ("microsoft", "microsoft.com"),
    ("apple", "apple.com"),
    ("amazon", "amazon.com"),
    ("amazon web services", "aws.amazon.com"),
    ("aws", "aws.amazon.com"),
    ("meta", "meta.com"),
    ("facebook", "facebook.com"),
    ("netflix", "netflix.com"),
    ("ibm", "ibm.com"),
    ("oracle", "oracle.com"),
    ("salesforce", "salesforce.com"),
    ("nvidia", "nvidia.com"),
    ("intel", "intel.com"),
    ("tesla", "tesla.com"),
    ("spotify", "spotify.com"),
    ("stripe", "stripe.com"),
    ("uber", "uber.com"),
    ("airbnb", "airbnb.com"),
    ("linkedin", "linkedin.com"),
    ("unilever", "unilever.com"),
    ("procter gamble", "pg.com"),
    ("p&g", "pg.com"),
    ("loreal", "loreal.com"),
    ("nestle", "nestle.com"),
    ("bbc", "bbc.co.uk"),
    ("nhs", "nhs.uk"),
];

pub const KNOWN_INSTITUTIONS: &[(&str, &str)] = &[
    ("harvard", "harvard.edu"),
    ("harvard university", "harvard.edu"),
    ("mit", "mit.edu"),
    ("massachusetts institute of technology", "mit.edu"),
    ("stanford", "stanford.edu"),
    ("stanford university", "stanford.edu"),
    ("yale university", "yale.edu"),
    ("princeton university", "princeton.edu"),
    ("columbia university", "columbia.edu"),
    ("university of oxford", "ox.ac.uk"),
    ("oxford university", "ox.ac.uk"),
    ("oxford", "ox.ac.uk"),
    ("university of cambridge", "cam.ac.uk"),
    ("cambridge university", "cam.ac.uk"),
    ("cambridge", "cam.ac.uk"),
    ("imperial college london", "imperial.ac.uk"),
    ("imperial college", "imperial.ac.uk"),
    ("london school of economics", "lse.ac.uk"),
    ("lse", "lse.ac.uk"),
    ("university college london", "ucl.ac.uk"),
    ("ucl", "ucl.ac.uk"),
    ("kings college london", "kcl.ac.uk"),
    ("university of edinburgh", "ed.ac.uk"),
    ("university of manchester", "manchester.ac.uk"),
    ("university of warwick", "warwick.ac.uk"),
    ("eth zurich", "ethz.ch"),
    ("insead", "insead.edu"),
    ("hec paris", "hec.edu"),
    ("university of toronto", "utoronto.ca"),
    ("national university of singapore", "nus.edu.sg"),
];

pub fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, domain)| *domain)
}

#[cfg(test)]
mod tests {
    use super::{lookup, KNOWN_COMPANIES, KNOWN_INSTITUTIONS};
    use crate::domain::name::{clean_name, NormalizedKey};

    #[test]
    fn table_keys_are_normalized() {
        for (name, domain) in KNOWN_COMPANIES.iter().chain(KNOWN_INSTITUTIONS.iter()) {
            assert_eq!(NormalizedKey::new(name).as_str(), *name);
            assert!(domain.contains('.'), "{} has no dot", domain);
        }
    }

    #[test]
    fn cleaned_keys_reach_entries() {
        let cleaned = clean_name("procter & gamble");
        assert_eq!(lookup(KNOWN_COMPANIES, &cleaned), Some("pg.com"));
    }
}
