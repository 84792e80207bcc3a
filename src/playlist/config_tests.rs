#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, Weekday};
    use std::collections::HashSet;

    const FULL_CONFIG: &str = r#"[
        {
            "name": "Weekend Rock",
            "source": "seatgeek",
            "city": "New York",
            "start_date": "2018-01-01",
            "end_date": "2018-01-31",
            "filters": {
                "genre": {"exclude": ["Jazz"]},
                "day_of_week": {"include": [4, 5]}
            },
            "max_tracks": 20,
            "max_tracks_per_performer": 2,
            "offset_popularity": 5.0,
            "public": true,
            "event_limit": 100,
            "per_page": 25,
            "max_price": 40.0
        },
        {
            "source": "ohmyrockness"
        }
    ]"#;

    fn write_temp_config(file_name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_load_full_and_minimal_configs() {
        let configs = PlaylistConfig::load_all_from_str(FULL_CONFIG).unwrap();
        assert_eq!(configs.len(), 2);

        let full = &configs[0];
        assert_eq!(full.name.as_deref(), Some("Weekend Rock"));
        assert_eq!(full.source, EventSourceKind::SeatGeek);
        assert_eq!(full.start_date, NaiveDate::from_ymd_opt(2018, 1, 1));
        assert_eq!(full.end_date, NaiveDate::from_ymd_opt(2018, 1, 31));
        assert_eq!(full.max_tracks, 20);
        assert_eq!(full.max_tracks_per_performer, 2);
        assert_relative_eq!(full.offset_popularity, 5.0);
        assert!(full.public);
        assert_eq!(full.max_price, Some(40.0));
        assert_eq!(
            full.filters.genre.exclude,
            Some(HashSet::from(["Jazz".to_string()]))
        );
        assert_eq!(
            full.filters.day_of_week.include,
            Some(HashSet::from([Weekday::Fri, Weekday::Sat]))
        );

        let minimal = &configs[1];
        assert_eq!(minimal.source, EventSourceKind::OhMyRockness);
        assert_eq!(minimal.name, None);
        assert_eq!(minimal.max_tracks, 30);
        assert_eq!(minimal.max_tracks_per_performer, 3);
        assert_relative_eq!(minimal.offset_popularity, 3.0);
        assert!(!minimal.public);
        assert_eq!(minimal.event_limit, 250);
        assert_eq!(minimal.per_page, 50);
        assert!(minimal.filters.is_empty());
    }

    #[test]
    fn test_load_all_from_file() {
        let path = write_temp_config("concert_playlist_config_test.json", FULL_CONFIG);
        let configs = PlaylistConfig::load_all_from_file(&path).unwrap();
        assert_eq!(configs.len(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PlaylistConfig::load_all_from_file("/nonexistent/playlists.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let result = PlaylistConfig::load_all_from_str(r#"[{"source": "ticketmaster"}]"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let result =
            PlaylistConfig::load_all_from_str(r#"[{"source": "seatgeek", "start_date": "01/05/2018"}]"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_bad_weekday_index_is_rejected() {
        let result = PlaylistConfig::load_all_from_str(
            r#"[{"source": "seatgeek", "filters": {"day_of_week": {"exclude": [7]}}}]"#,
        );
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_validation_errors_name_the_playlist() {
        let result = PlaylistConfig::load_all_from_str(
            r#"[{"source": "seatgeek"}, {"source": "seatgeek", "max_tracks_per_performer": 0}]"#,
        );
        match result {
            Err(Error::Config(message)) => assert!(message.contains("playlist #2")),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_degenerate_settings() {
        let valid = PlaylistConfig::default();
        assert!(valid.validate().is_ok());

        let cases = [
            PlaylistConfig {
                max_tracks_per_performer: 0,
                ..PlaylistConfig::default()
            },
            PlaylistConfig {
                event_limit: 0,
                ..PlaylistConfig::default()
            },
            PlaylistConfig {
                per_page: 0,
                ..PlaylistConfig::default()
            },
            PlaylistConfig {
                offset_popularity: f64::NAN,
                ..PlaylistConfig::default()
            },
            PlaylistConfig {
                offset_popularity: -1.0,
                ..PlaylistConfig::default()
            },
            PlaylistConfig {
                start_date: NaiveDate::from_ymd_opt(2018, 2, 1),
                end_date: NaiveDate::from_ymd_opt(2018, 1, 1),
                ..PlaylistConfig::default()
            },
            PlaylistConfig {
                max_price: Some(-1.0),
                ..PlaylistConfig::default()
            },
        ];
        for config in &cases {
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn test_zero_max_tracks_is_allowed() {
        let config = PlaylistConfig {
            max_tracks: 0,
            ..PlaylistConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_offset_popularity_is_allowed() {
        let config = PlaylistConfig {
            offset_popularity: 0.0,
            ..PlaylistConfig::default()
        };
        assert!(config.validate().is_ok());

        let result = PlaylistConfig::load_all_from_str(
            r#"[{"source": "seatgeek", "offset_popularity": -2.5}]"#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_event_query_carries_limits_and_dates() {
        let configs = PlaylistConfig::load_all_from_str(FULL_CONFIG).unwrap();
        let query = configs[0].event_query();
        assert_eq!(query.city.as_deref(), Some("New York"));
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2018, 1, 1));
        assert_eq!(query.limit, 100);
        assert_eq!(query.per_page, 25);
        assert_eq!(query.max_price, Some(40.0));
    }

    #[test]
    fn test_city_becomes_include_filter() {
        let config = PlaylistConfig {
            city: Some("New York".to_string()),
            ..PlaylistConfig::default()
        };
        let criteria = config.effective_criteria();
        assert_eq!(
            criteria.city.include,
            Some(HashSet::from(["New York".to_string()]))
        );
    }

    #[test]
    fn test_explicit_city_filter_wins() {
        let config = PlaylistConfig {
            city: Some("New York".to_string()),
            filters: crate::playlist::filters::FilterCriteria::default()
                .include_city(["Brooklyn", "Queens"]),
            ..PlaylistConfig::default()
        };
        let criteria = config.effective_criteria();
        assert_eq!(
            criteria.city.include,
            Some(HashSet::from(["Brooklyn".to_string(), "Queens".to_string()]))
        );
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(EventSourceKind::SeatGeek.to_string(), "SeatGeek");
        assert_eq!(EventSourceKind::OhMyRockness.to_string(), "OhMyRockness");
    }
}
