use proptest::prelude::*;
use riadesk::data::catalog::{builtin_catalog, Category, Vendor};
use riadesk::scoring::{final_score, rank_vendors, score_catalog, WeightState};

fn categories(count: usize) -> Vec<Category> {
    (0..count)
        .map(|i| Category {
            id: format!("c{i}"),
            name: format!("Category {i}"),
            default_weight: 1.0 / count as f64,
        })
        .collect()
}

fn weights_for(categories: &[Category], values: &[f64]) -> WeightState {
    categories
        .iter()
        .zip(values)
        .map(|(c, w)| (c.id.clone(), *w))
        .collect()
}

fn vendor_strategy(category_count: usize) -> impl Strategy<Value = Vec<Vendor>> {
    prop::collection::vec(prop::collection::vec(1u8..=10, category_count), 1..12).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, scores)| Vendor {
                    name: format!("Vendor {i}"),
                    scores,
                })
                .collect()
        },
    )
}

#[test]
fn single_category_weight_reduces_to_that_score() {
    let catalog = builtin_catalog();
    let weights = WeightState::new().with("plan", 100.0);
    let results = score_catalog(&catalog, &weights);

    assert_eq!(results[0].name, "RightCapital");
    assert_eq!(results[0].final_score, 10.0);
    let wealthbox = results
        .iter()
        .find(|r| r.name == "Wealthbox")
        .expect("Wealthbox should be ranked");
    assert_eq!(wealthbox.final_score, 4.0);
}

#[test]
fn default_weights_rank_every_builtin_vendor() {
    let catalog = builtin_catalog();
    let weights = WeightState::from_defaults(&catalog.categories);
    let results = score_catalog(&catalog, &weights);
    assert_eq!(results.len(), catalog.vendors.len());
    assert!(results.iter().all(|r| (1.0..=10.0).contains(&r.final_score)));
}

proptest! {
    #[test]
    fn ranking_is_sorted_descending(
        (weights, vendors) in (1usize..8).prop_flat_map(|n| (
            prop::collection::vec(0.0f64..100.0, n),
            vendor_strategy(n),
        ))
    ) {
        let categories = categories(weights.len());
        let state = weights_for(&categories, &weights);
        let results = rank_vendors(&vendors, &categories, &state);
        prop_assert_eq!(results.len(), vendors.len());
        for pair in results.windows(2) {
            prop_assert!(pair[0].final_score >= pair[1].final_score);
        }
    }

    #[test]
    fn zero_weights_fall_back_to_plain_mean(vendors in vendor_strategy(6)) {
        let categories = categories(6);
        let zeros = weights_for(&categories, &[0.0; 6]);
        for vendor in &vendors {
            let mean = vendor.scores.iter().map(|s| f64::from(*s)).sum::<f64>() / 6.0;
            let score = final_score(vendor, &categories, &zeros);
            prop_assert!((score - mean).abs() <= 0.05 + 1e-9, "score {} mean {}", score, mean);
        }
    }

    #[test]
    fn uniform_scaling_does_not_change_scores(
        weights in prop::collection::vec(0.0f64..100.0, 5),
        vendors in vendor_strategy(5),
        factor in prop::sample::select(vec![0.25, 0.5, 2.0, 4.0, 8.0]),
    ) {
        let categories = categories(5);
        let base = weights_for(&categories, &weights);
        let scaled = base.scaled(factor);
        for vendor in &vendors {
            prop_assert_eq!(
                final_score(vendor, &categories, &base),
                final_score(vendor, &categories, &scaled)
            );
        }
    }

    #[test]
    fn arbitrary_scaling_stays_within_rounding(
        weights in prop::collection::vec(1.0f64..100.0, 4),
        vendors in vendor_strategy(4),
        factor in 0.1f64..10.0,
    ) {
        let categories = categories(4);
        let base = weights_for(&categories, &weights);
        let scaled = base.scaled(factor);
        for vendor in &vendors {
            let a = final_score(vendor, &categories, &base);
            let b = final_score(vendor, &categories, &scaled);
            prop_assert!((a - b).abs() <= 0.1 + 1e-9);
        }
    }
}
