//! Subscription selection.

use crate::model::Subscription;

/// Keep the subscriptions whose id or display name exactly equals a selector.
///
/// No selectors means no filtering. Input order is preserved, each subscription
/// appears at most once, and selectors that match nothing are ignored.
#[must_use]
pub fn filter_subscriptions(all: &[Subscription], selectors: &[String]) -> Vec<Subscription> {
    if selectors.is_empty() {
        return all.to_vec();
    }

    all.iter()
        .filter(|sub| {
            selectors
                .iter()
                .any(|sel| *sel == sub.id || *sel == sub.display_name)
        })
        .cloned()
        .collect()
}

/// Selectors that matched no subscription, in the order given.
#[must_use]
pub fn unmatched_selectors<'a>(all: &[Subscription], selectors: &'a [String]) -> Vec<&'a str> {
    selectors
        .iter()
        .filter(|sel| !all.iter().any(|sub| **sel == sub.id || **sel == sub.display_name))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn subs() -> Vec<Subscription> {
        vec![
            Subscription::new("11111111-aaaa", "Production"),
            Subscription::new("22222222-bbbb", "Development"),
            Subscription::new("33333333-cccc", "Sandbox"),
        ]
    }

    fn sel(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_selectors_keep_everything() {
        assert_eq!(filter_subscriptions(&subs(), &[]), subs());
    }

    #[test]
    fn test_match_by_id_or_name() {
        let kept = filter_subscriptions(&subs(), &sel(&["Sandbox", "11111111-aaaa"]));
        let ids: Vec<_> = kept.iter().map(|s| s.id.as_str()).collect();
        // Input order, not selector order
        assert_eq!(ids, vec!["11111111-aaaa", "33333333-cccc"]);
    }

    #[test]
    fn test_match_is_case_sensitive_and_exact() {
        assert!(filter_subscriptions(&subs(), &sel(&["production"])).is_empty());
        assert!(filter_subscriptions(&subs(), &sel(&["Prod*"])).is_empty());
        assert!(filter_subscriptions(&subs(), &sel(&["11111111"])).is_empty());
    }

    #[test]
    fn test_no_duplicates_when_both_forms_match() {
        let kept = filter_subscriptions(&subs(), &sel(&["Production", "11111111-aaaa"]));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_unmatched_selectors() {
        let binding = sel(&["Sandbox", "no-such-id", "prod"]);
        let missing = unmatched_selectors(&subs(), &binding);
        assert_eq!(missing, vec!["no-such-id", "prod"]);
    }

    fn arb_subscriptions() -> impl Strategy<Value = Vec<Subscription>> {
        prop::collection::vec(("[a-d]{1,2}", "[A-D]{1,2}"), 0..8).prop_map(|pairs| {
            let mut seen = std::collections::HashSet::new();
            pairs
                .into_iter()
                .filter(|(id, _)| seen.insert(id.clone()))
                .map(|(id, name)| Subscription::new(id, name))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_empty_selectors_is_identity(all in arb_subscriptions()) {
            prop_assert_eq!(filter_subscriptions(&all, &[]), all);
        }

        #[test]
        fn prop_every_kept_subscription_matches(
            all in arb_subscriptions(),
            selectors in prop::collection::vec("[a-dA-D]{1,2}", 1..4),
        ) {
            let kept = filter_subscriptions(&all, &selectors);
            for sub in &kept {
                prop_assert!(selectors.iter().any(|s| *s == sub.id || *s == sub.display_name));
            }

            // Kept entries are unique and form a subsequence of the input
            let mut ids: Vec<_> = kept.iter().map(|s| s.id.clone()).collect();
            let expected: Vec<_> = all
                .iter()
                .filter(|s| kept.contains(s))
                .map(|s| s.id.clone())
                .collect();
            prop_assert_eq!(&ids, &expected);
            ids.dedup();
            prop_assert_eq!(ids.len(), kept.len());
        }

        #[test]
        fn prop_no_matching_subscription_is_dropped(
            all in arb_subscriptions(),
            selectors in prop::collection::vec("[a-dA-D]{1,2}", 1..4),
        ) {
            let kept = filter_subscriptions(&all, &selectors);
            let matching = all
                .iter()
                .filter(|s| selectors.iter().any(|sel| *sel == s.id || *sel == s.display_name))
                .count();
            prop_assert_eq!(kept.len(), matching);
        }
    }
}
