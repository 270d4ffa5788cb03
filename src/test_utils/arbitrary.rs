use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use crate::criteria::SortKey;
use crate::record::{DateWindow, Opportunity, Provider};

const FACET_VALUES: [&str; 6] = ["Solar", "Roof Repair", "Flood", "Energy Audit", "Wind", "solar"];
const KINDS: [&str; 3] = ["grant", "rebate", "loan"];

/// Instants within roughly three years of 2025-01-01.
pub fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (-400i64..800, 0i64..86_400).prop_map(|(days, secs)| {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(days)
            + Duration::seconds(secs)
    })
}

/// Windows with either bound possibly missing and possibly inverted.
pub fn arb_window() -> impl Strategy<Value = DateWindow> {
    (
        prop::option::weighted(0.85, arb_instant()),
        prop::option::weighted(0.85, arb_instant()),
    )
        .prop_map(|(opens_at, closes_at)| DateWindow::new(opens_at, closes_at))
}

fn arb_values() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(FACET_VALUES.to_vec()), 0..4)
        .prop_map(|values| values.into_iter().map(String::from).collect())
}

pub fn arb_opportunity() -> impl Strategy<Value = Opportunity> {
    (
        "[a-z]{1,8}",
        "[A-Za-z ]{0,24}",
        arb_window(),
        prop::option::of(any::<bool>()),
        arb_values(),
        prop::collection::vec("[A-Z][a-z]{2,8}", 0..5),
        prop::option::of(prop::sample::select(KINDS.to_vec())),
    )
        .prop_map(|(id, title, window, nationwide, uses, requirements, kind)| {
            let mut grant = Opportunity::new(id, title)
                .with_window(window.opens_at, window.closes_at)
                .with_uses(uses)
                .with_requirements(requirements);
            grant.is_nationwide = nationwide;
            grant.kind = kind.map(String::from);
            grant
        })
}

pub fn arb_provider() -> impl Strategy<Value = Provider> {
    (
        "[a-z]{1,8}",
        "[A-Za-z ]{0,24}",
        prop::option::of(0u8..=50),
        prop::option::of(0u32..72),
        arb_values(),
        any::<bool>(),
    )
        .prop_map(|(id, name, rating, hours, specialties, online)| {
            let mut agent = Provider::new(id, name)
                .with_specialties(specialties)
                .online(online);
            agent.rating = rating.map(|r| f64::from(r) / 10.0);
            agent.response_hours = hours;
            agent
        })
}

pub fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop_oneof![
        prop::sample::select(SortKey::KNOWN.to_vec()),
        "[a-z]{3,10}".prop_map(|raw| SortKey::parse(&raw)),
    ]
}

#[cfg(test)]
mod properties {
    use super::*;
    use crate::criteria::FilterCriteria;
    use crate::pipeline::apply;
    use crate::scoring::ScoreCalculator;
    use crate::sort::Sorter;
    use crate::status::{Status, resolve_window};

    proptest! {
        #[test]
        fn status_is_total(window in arb_window(), now in arb_instant()) {
            let status = resolve_window(&window, now);
            if let (Some(opens_at), Some(closes_at)) = (window.opens_at, window.closes_at) {
                if opens_at <= now && now <= closes_at {
                    prop_assert_eq!(status, Status::Open);
                }
                if opens_at > closes_at {
                    prop_assert_eq!(status, Status::Indeterminate);
                }
            } else {
                prop_assert_eq!(status, Status::Indeterminate);
            }
        }

        #[test]
        fn score_stays_in_bounds(grant in arb_opportunity(), now in arb_instant()) {
            let score = ScoreCalculator::default().score(&grant, now).value();
            prop_assert!((45..=95).contains(&score));
        }

        #[test]
        fn provider_score_stays_in_bounds(agent in arb_provider(), now in arb_instant()) {
            let score = ScoreCalculator::default().score(&agent, now).value();
            prop_assert!((45..=95).contains(&score));
        }

        #[test]
        fn any_sort_key_is_a_permutation(
            grants in prop::collection::vec(arb_opportunity(), 0..20),
            key in arb_sort_key(),
            now in arb_instant(),
        ) {
            let mut results = apply(&grants, &FilterCriteria::default(), now).results;
            let mut before: Vec<String> = results.iter().map(|r| r.record.id.clone()).collect();
            Sorter::sort(&mut results, &key);
            let mut after: Vec<String> = results.iter().map(|r| r.record.id.clone()).collect();
            before.sort_unstable();
            after.sort_unstable();
            prop_assert_eq!(before, after);
        }
    }
}
