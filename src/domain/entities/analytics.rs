//! Per-link click analytics aggregate.

use chrono::NaiveDate;

use super::click::NewClick;

/// Counters for one observed OS or device name.
///
/// `unique_users` is incremented on every click, exactly like
/// `unique_clicks`; it is not gated on per-dimension visitor uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionStats {
    pub name: String,
    pub unique_clicks: i64,
    pub unique_users: i64,
}

/// Clicks recorded on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub clicks: i64,
}

/// Accumulated analytics for a single link.
///
/// `os_type` and `device_type` keep first-observation order;
/// `clicks_by_date` is kept sorted by date. Every collection holds at most
/// one entry per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAnalytics {
    pub total_clicks: i64,
    pub unique_clicks: i64,
    pub os_type: Vec<DimensionStats>,
    pub device_type: Vec<DimensionStats>,
    pub clicks_by_date: Vec<DailyClicks>,
}

impl LinkAnalytics {
    /// Applies one click.
    ///
    /// `is_new_visitor` must be true when the click's IP was not yet part of
    /// the link's unique-IP set; the caller owns that set.
    pub fn record(&mut self, click: &NewClick, is_new_visitor: bool) {
        self.total_clicks += 1;

        bump_dimension(&mut self.os_type, &click.os_type);
        bump_dimension(&mut self.device_type, &click.device_type);

        if is_new_visitor {
            self.unique_clicks += 1;
        }

        let day = click.day();
        match self.clicks_by_date.binary_search_by(|d| d.date.cmp(&day)) {
            Ok(idx) => self.clicks_by_date[idx].clicks += 1,
            Err(idx) => self
                .clicks_by_date
                .insert(idx, DailyClicks { date: day, clicks: 1 }),
        }
    }
}

fn bump_dimension(entries: &mut Vec<DimensionStats>, name: &str) {
    match entries.iter_mut().find(|e| e.name == name) {
        Some(entry) => {
            entry.unique_clicks += 1;
            entry.unique_users += 1;
        }
        None => entries.push(DimensionStats {
            name: name.to_string(),
            unique_clicks: 1,
            unique_users: 1,
        }),
    }
}
