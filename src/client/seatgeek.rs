use super::{EventQuery, EventSource, id_string, read_json};
use crate::config::SeatGeekConfig;
use crate::error::Result;
use crate::models::{Event, Genre, Performer, Venue};
use chrono::NaiveDateTime;
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use ureq::Agent;

const SEATGEEK_API: &str = "https://api.seatgeek.com/2";
const SOURCE: &str = "SeatGeek";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Client for the SeatGeek platform API (http://platform.seatgeek.com/)
pub struct SeatGeekClient {
    agent: Agent,
    base_url: String,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: Value,
    title: String,
    datetime_local: String,
    venue: RawVenue,
    #[serde(default)]
    performers: Vec<RawPerformer>,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    id: Value,
    name: String,
    address: Option<String>,
    extended_address: Option<String>,
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPerformer {
    id: Value,
    name: String,
    genres: Option<Vec<RawGenre>>,
}

#[derive(Debug, Deserialize)]
struct RawGenre {
    id: Value,
    name: String,
}

impl SeatGeekClient {
    pub fn new(config: SeatGeekConfig) -> Self {
        SeatGeekClient {
            agent: Agent::new(),
            base_url: SEATGEEK_API.to_string(),
            client_id: config.client_id,
            client_secret: config.client_secret,
        }
    }

    /// Query parameters for one page of concert listings
    fn query_params(&self, query: &EventQuery, page: u32, per_page: u32) -> Vec<(String, String)> {
        let mut params = vec![
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
            ("per_page".to_string(), per_page.to_string()),
            ("page".to_string(), page.to_string()),
            ("geoip".to_string(), "true".to_string()),
            ("sort".to_string(), "score.desc".to_string()),
            ("listing_count.gt".to_string(), "0".to_string()),
            ("taxonomies.name".to_string(), "concert".to_string()),
        ];

        if let Some(max_price) = query.max_price {
            params.push(("lowest_price.lte".to_string(), (max_price as i64).to_string()));
        }
        if let Some(start) = query.start_date {
            params.push(("datetime_utc.gte".to_string(), start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = query.end_date {
            params.push(("datetime_utc.lte".to_string(), end.format(DATE_FORMAT).to_string()));
        }
        if let Some(city) = &query.city {
            params.push(("venue.city".to_string(), city.clone()));
        }

        params
    }

    fn parse_event(raw: RawEvent) -> Option<Event> {
        let start_time = match NaiveDateTime::parse_from_str(&raw.datetime_local, DATETIME_FORMAT) {
            Ok(time) => time,
            Err(e) => {
                warn!(
                    "Skipping SeatGeek event {} with unreadable datetime_local '{}': {}",
                    id_string(&raw.id),
                    raw.datetime_local,
                    e
                );
                return None;
            }
        };

        let performers = raw
            .performers
            .into_iter()
            .map(|performer| Performer {
                source: SOURCE.to_string(),
                source_id: id_string(&performer.id),
                name: performer.name,
                genres: performer
                    .genres
                    .unwrap_or_default()
                    .into_iter()
                    .map(|genre| Genre {
                        source: SOURCE.to_string(),
                        source_id: id_string(&genre.id),
                        name: genre.name,
                    })
                    .collect(),
            })
            .collect();

        let address = [raw.venue.address, raw.venue.extended_address]
            .into_iter()
            .flatten()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Some(Event {
            source: SOURCE.to_string(),
            source_id: id_string(&raw.id),
            name: raw.title,
            start_time,
            venue: Venue {
                source: SOURCE.to_string(),
                source_id: id_string(&raw.venue.id),
                name: raw.venue.name,
                address,
                city: raw.venue.city.unwrap_or_default(),
            },
            performers,
        })
    }

    fn parse_events(response: EventsResponse) -> Vec<Event> {
        response
            .events
            .into_iter()
            .filter_map(Self::parse_event)
            .collect()
    }
}

impl EventSource for SeatGeekClient {
    fn name(&self) -> &str {
        SOURCE
    }

    fn fetch_page(&self, query: &EventQuery, page: u32, per_page: u32) -> Result<Vec<Event>> {
        let mut request = self.agent.get(&format!("{}/events", self.base_url));
        for (key, value) in self.query_params(query, page, per_page) {
            request = request.query(&key, &value);
        }

        let response = request.call()?;
        let parsed: EventsResponse = read_json(response)?;
        Ok(Self::parse_events(parsed))
    }
}
