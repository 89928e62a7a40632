use crate::aggregate::StatisticsRecord;

/// Renders statistics as human-readable text.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Single-sentence summary embedding all four statistics.
    pub fn format(stats: &StatisticsRecord) -> String {
        format!(
            "There are {} stores worldwide, spread across {} countries and regions. \
             The country with the most stores is {}, and the city with the most stores is {}.",
            stats.total_stores, stats.total_countries, stats.top_country, stats.top_city
        )
    }
}
