use crate::domain::model::{MenuStore, SiteConfig, WeekdayIndex};
use chrono::NaiveDate;

pub const NO_MENU_TODAY: &str = "No menus today.\n";
pub const NO_MENU_TOMORROW: &str = "No menus tomorrow.\n";

pub fn target_weekday(today: NaiveDate, want_tomorrow: bool) -> WeekdayIndex {
    let day = WeekdayIndex::from_date(&today);
    if want_tomorrow {
        day.next()
    } else {
        day
    }
}

pub fn no_menu_message(want_tomorrow: bool) -> &'static str {
    if want_tomorrow {
        NO_MENU_TOMORROW
    } else {
        NO_MENU_TODAY
    }
}

/// Renders the target weekday's buckets in configured site order.
///
/// Sites with nothing to show are left out entirely. Buckets with more than
/// one entry are numbered from 1.
pub fn render(
    store: &MenuStore,
    sites: &[SiteConfig],
    want_tomorrow: bool,
    today: NaiveDate,
) -> String {
    let day = target_weekday(today, want_tomorrow);
    let mut output = String::new();

    for site in sites {
        let entries = store.entries(&site.name, day);
        if entries.is_empty() {
            continue;
        }

        output.push_str(&format!("#= **{}** =\n", site.name));
        let numbered = entries.len() > 1;
        for (index, entry) in entries.iter().enumerate() {
            if numbered {
                output.push_str(&format!(" ### {} {}\n", index + 1, entry));
            } else {
                output.push_str(&format!(" ### {}\n", entry));
            }
        }
    }

    if output.is_empty() {
        return no_menu_message(want_tomorrow).to_string();
    }
    output
}
