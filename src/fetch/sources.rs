// src/fetch/sources.rs

use crate::schema::SourceKind;

/// Where one raw table lives and how to pick it out of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub kind: SourceKind,
    pub url: &'static str,
    /// CSS selector for the target `<table>`.
    pub selector: &'static str,
    /// File stem used for snapshots.
    pub slug: &'static str,
}

static SOURCES: [Source; 4] = [
    Source {
        kind: SourceKind::Expenditure,
        url: "https://en.wikipedia.org/wiki/List_of_countries_by_total_health_expenditure_per_capita",
        selector: "table.wikitable.sortable.static-row-numbers.mw-datatable.sticky-table-head.sticky-table-col1.sort-under",
        slug: "expenditure",
    },
    Source {
        kind: SourceKind::LifeExpectancy,
        url: "https://en.wikipedia.org/wiki/List_of_countries_by_life_expectancy",
        selector: "table.wikitable.sortable.mw-datatable.sort-under.sticky-table-head.sticky-table-col1.static-row-numbers",
        slug: "life_expectancy",
    },
    Source {
        kind: SourceKind::DisposableIncome,
        url: "https://en.wikipedia.org/wiki/Disposable_household_and_per_capita_income",
        selector: "table.sortable.wikitable.static-row-numbers.sticky-table-head",
        slug: "disposable_income",
    },
    Source {
        kind: SourceKind::ObesityRate,
        url: "https://en.wikipedia.org/wiki/List_of_countries_by_obesity_rate",
        selector: "table.wikitable.plainrowheaders.sortable.sticky-header.sort-under",
        slug: "obesity_rate",
    },
];

/// All built-in sources, in fetch order.
pub fn all() -> &'static [Source] {
    &SOURCES
}

pub fn source(kind: SourceKind) -> &'static Source {
    let idx = match kind {
        SourceKind::Expenditure => 0,
        SourceKind::LifeExpectancy => 1,
        SourceKind::DisposableIncome => 2,
        SourceKind::ObesityRate => 3,
    };
    &SOURCES[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn every_kind_has_a_valid_source() {
        for kind in SourceKind::ALL {
            let s = source(kind);
            assert_eq!(s.kind, kind);
            assert!(Selector::parse(s.selector).is_ok(), "{}", s.selector);
            assert!(url::Url::parse(s.url).is_ok());
        }
        assert_eq!(all().len(), 4);
    }
}
