use crate::models::{Event, Performer};
use std::collections::BTreeMap;

/// A performer together with every event they appear in
#[derive(Debug, Clone, PartialEq)]
pub struct PerformerEvents {
    pub performer: Performer,
    /// Events with their own performer lists stripped
    pub events: Vec<Event>,
}

/// Group events by performer name.
///
/// Names are matched exactly, since no API shares performer ids with another.
/// The first performer record seen under a name supplies the bucket's attributes.
/// Events keep input order, and an event listed twice for the same performer
/// shows up twice in that performer's bucket.
pub fn group_by_performer<'a, I>(events: I) -> BTreeMap<String, PerformerEvents>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut grouped: BTreeMap<String, PerformerEvents> = BTreeMap::new();

    for event in events {
        if event.performers.is_empty() {
            continue;
        }
        let stripped = event.without_performers();

        for performer in &event.performers {
            grouped
                .entry(performer.name.clone())
                .or_insert_with(|| PerformerEvents {
                    performer: performer.clone(),
                    events: Vec::new(),
                })
                .events
                .push(stripped.clone());
        }
    }

    grouped
}
