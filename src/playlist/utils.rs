use super::config::PlaylistConfig;
use chrono::{Local, NaiveDate};

/// Helper trait for string formatting
pub trait ToTitleCase {
    fn to_title_case(&self) -> String;
}

impl ToTitleCase for str {
    fn to_title_case(&self) -> String {
        self.split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Playlist naming utilities
pub struct PlaylistNaming;

impl PlaylistNaming {
    /// The configured name, or one built from the source, city and month
    pub fn playlist_name(config: &PlaylistConfig) -> String {
        match &config.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => Self::default_name(config, Local::now().date_naive()),
        }
    }

    /// e.g. "SeatGeek New York January 2018 Concerts".
    /// Falls back to `today` for the month when no start date is configured.
    pub fn default_name(config: &PlaylistConfig, today: NaiveDate) -> String {
        let month = config
            .start_date
            .unwrap_or(today)
            .format("%B %Y")
            .to_string();

        match config.city.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() => {
                format!("{} {} {} Concerts", config.source, city.to_title_case(), month)
            }
            _ => format!("{} {} Concerts", config.source, month),
        }
    }
}
