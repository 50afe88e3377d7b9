//! Fixed dataset written by the seeding operation.

use crate::domain::{BeerRecord, Collection};

pub fn starter_collection() -> Collection {
    vec![
        BeerRecord::new("Almond Nights")
            .with_style("Dark Ale")
            .with_field("info", "+ Roasted Almonds")
            .with_field("metrics", "5% ABV | 27 IBU | 12°P"),
        BeerRecord::new("Earl of Paradise")
            .with_style("Saison")
            .with_field("info", "+ Earl Grey & Paradise Seeds")
            .with_field("metrics", "6.7% ABV | 31 IBU | 1.061OG"),
        BeerRecord::new("Sour Sweet Symphony")
            .with_style("French Saison")
            .with_field("info", "+ Cherry & Black Currant")
            .with_field("metrics", "4% ABV | 20 IBU | 10°P"),
        BeerRecord::new("Red Out")
            .with_style("Table Sour")
            .with_field("info", "+ Cherry & Black Currant")
            .with_field("metrics", "2.8% ABV | 0 IBU | 1.035 OG"),
    ]
}
