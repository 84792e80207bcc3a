use crate::models::Event;
use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

/// Include / exclude sets for one event attribute.
/// An absent set never excludes anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Eq + Hash + Deserialize<'de>"))]
pub struct IncludeExclude<T: Eq + Hash> {
    #[serde(default)]
    pub include: Option<HashSet<T>>,
    #[serde(default)]
    pub exclude: Option<HashSet<T>>,
}

impl<T: Eq + Hash> Default for IncludeExclude<T> {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }
}

impl<T: Eq + Hash> IncludeExclude<T> {
    pub fn is_active(&self) -> bool {
        self.include.is_some() || self.exclude.is_some()
    }

    /// Check an event's attribute values against both sets: at least one value
    /// must be included (when an include set exists) and none may be excluded
    pub fn admits<'a, I, Q>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Q> + Clone,
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized + 'a,
    {
        if let Some(include) = &self.include {
            if !values.clone().into_iter().any(|value| include.contains(value)) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if values.into_iter().any(|value| exclude.contains(value)) {
                return false;
            }
        }
        true
    }
}

/// Which events to keep. Every active predicate must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub venue: IncludeExclude<String>,
    #[serde(default)]
    pub genre: IncludeExclude<String>,
    #[serde(default)]
    pub city: IncludeExclude<String>,
    /// Configured as ISO indices, Monday = 0 ... Sunday = 6
    #[serde(
        default,
        serialize_with = "serialize_weekdays",
        deserialize_with = "deserialize_weekdays"
    )]
    pub day_of_week: IncludeExclude<Weekday>,
}

/// Weekday for an ISO index (Monday = 0)
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_set(indices: Option<HashSet<u8>>) -> Result<Option<HashSet<Weekday>>, String> {
    indices
        .map(|set| {
            set.into_iter()
                .map(|i| {
                    weekday_from_index(i)
                        .ok_or_else(|| format!("day_of_week index {i} is outside 0 (Monday) to 6 (Sunday)"))
                })
                .collect::<Result<HashSet<Weekday>, String>>()
        })
        .transpose()
}

fn deserialize_weekdays<'de, D>(deserializer: D) -> Result<IncludeExclude<Weekday>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IncludeExclude::<u8>::deserialize(deserializer)?;
    Ok(IncludeExclude {
        include: weekday_set(raw.include).map_err(serde::de::Error::custom)?,
        exclude: weekday_set(raw.exclude).map_err(serde::de::Error::custom)?,
    })
}

fn serialize_weekdays<S>(days: &IncludeExclude<Weekday>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let to_indices = |set: &Option<HashSet<Weekday>>| {
        set.as_ref().map(|days| {
            days.iter()
                .map(|day| day.num_days_from_monday() as u8)
                .collect::<HashSet<u8>>()
        })
    };
    IncludeExclude {
        include: to_indices(&days.include),
        exclude: to_indices(&days.exclude),
    }
    .serialize(serializer)
}

#[cfg(test)]
fn string_set<I, S>(values: I) -> Option<HashSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Some(values.into_iter().map(Into::into).collect())
}

#[cfg(test)]
fn weekday_indices<I: IntoIterator<Item = u8>>(indices: I) -> Option<HashSet<Weekday>> {
    Some(indices.into_iter().filter_map(weekday_from_index).collect())
}

/// Builders for assembling criteria in code
#[cfg(test)]
impl FilterCriteria {
    pub fn include_venue<I: IntoIterator<Item = S>, S: Into<String>>(mut self, venues: I) -> Self {
        self.venue.include = string_set(venues);
        self
    }

    pub fn exclude_venue<I: IntoIterator<Item = S>, S: Into<String>>(mut self, venues: I) -> Self {
        self.venue.exclude = string_set(venues);
        self
    }

    pub fn include_genre<I: IntoIterator<Item = S>, S: Into<String>>(mut self, genres: I) -> Self {
        self.genre.include = string_set(genres);
        self
    }

    pub fn exclude_genre<I: IntoIterator<Item = S>, S: Into<String>>(mut self, genres: I) -> Self {
        self.genre.exclude = string_set(genres);
        self
    }

    pub fn include_city<I: IntoIterator<Item = S>, S: Into<String>>(mut self, cities: I) -> Self {
        self.city.include = string_set(cities);
        self
    }

    pub fn exclude_city<I: IntoIterator<Item = S>, S: Into<String>>(mut self, cities: I) -> Self {
        self.city.exclude = string_set(cities);
        self
    }

    /// Indices outside 0..=6 are ignored here; config loading rejects them
    pub fn include_day_of_week<I: IntoIterator<Item = u8>>(mut self, days: I) -> Self {
        self.day_of_week.include = weekday_indices(days);
        self
    }

    pub fn exclude_day_of_week<I: IntoIterator<Item = u8>>(mut self, days: I) -> Self {
        self.day_of_week.exclude = weekday_indices(days);
        self
    }
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        !(self.venue.is_active()
            || self.genre.is_active()
            || self.city.is_active()
            || self.day_of_week.is_active())
    }
}

/// Event filtering functionality using static helper functions
pub struct EventFilters;

impl EventFilters {
    pub fn matches_venue(event: &Event, criteria: &FilterCriteria) -> bool {
        criteria.venue.admits([event.venue.name.as_str()])
    }

    /// Matched against every genre of every performer
    pub fn matches_genre(event: &Event, criteria: &FilterCriteria) -> bool {
        criteria.genre.admits(event.genre_names())
    }

    pub fn matches_city(event: &Event, criteria: &FilterCriteria) -> bool {
        criteria.city.admits([event.venue.city.as_str()])
    }

    pub fn matches_day_of_week(event: &Event, criteria: &FilterCriteria) -> bool {
        criteria.day_of_week.admits([&event.weekday()])
    }

    /// Apply all filters to determine if an event should be kept
    pub fn should_include_event(event: &Event, criteria: &FilterCriteria) -> bool {
        Self::matches_venue(event, criteria)
            && Self::matches_genre(event, criteria)
            && Self::matches_city(event, criteria)
            && Self::matches_day_of_week(event, criteria)
    }
}

/// Lazily keep the events that pass every active predicate, in input order
pub fn filter_events<'a>(
    events: &'a [Event],
    criteria: &'a FilterCriteria,
) -> impl Iterator<Item = &'a Event> + 'a {
    events
        .iter()
        .filter(move |event| EventFilters::should_include_event(event, criteria))
}
