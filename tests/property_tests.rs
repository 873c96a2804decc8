use agglo::cluster::{Agglomerative, DistanceMatrix, Euclidean, Linkage, MergeTree, Pearson};
use agglo::Error;
use proptest::prelude::*;

fn points(max_n: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    (1usize..5).prop_flat_map(move |d| {
        prop::collection::vec(prop::collection::vec(-10.0f32..10.0, d), 2..max_n)
    })
}

fn linkage() -> impl Strategy<Value = Linkage> {
    prop_oneof![
        Just(Linkage::Single),
        Just(Linkage::Complete),
        Just(Linkage::Average)
    ]
}

fn check_shape(tree: &MergeTree, n: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(tree.n_leaves(), n);
    prop_assert_eq!(tree.n_merges(), n - 1);

    let mut leaves = tree.root().leaves();
    leaves.sort_unstable();
    prop_assert_eq!(leaves, (0..n).collect::<Vec<_>>());

    for node in tree.root().iter() {
        if node.is_leaf() {
            prop_assert!(node.id < n);
            prop_assert_eq!(node.height, 0.0);
        } else {
            prop_assert!(node.id >= n);
            prop_assert_eq!(node.children.len(), 2);
        }
    }

    let ids: Vec<usize> = tree.merges().iter().map(|m| m.id).collect();
    prop_assert_eq!(ids, (n..(2 * n - 1)).collect::<Vec<_>>());
    prop_assert_eq!(tree.root().id, 2 * n - 2);
    prop_assert_eq!(tree.edges().len(), 2 * (n - 1));
    Ok(())
}

proptest! {
    #[test]
    fn prop_tree_shape(data in points(16), linkage in linkage()) {
        let tree = Agglomerative::new(linkage).fit(&data).unwrap();
        check_shape(&tree, data.len())?;
    }

    #[test]
    fn prop_tree_shape_euclidean(data in points(16), linkage in linkage()) {
        let tree = Agglomerative::new(linkage)
            .with_metric(Euclidean)
            .fit(&data)
            .unwrap();
        check_shape(&tree, data.len())?;
    }

    #[test]
    fn prop_average_and_complete_are_monotone(
        data in points(16),
        linkage in prop_oneof![Just(Linkage::Complete), Just(Linkage::Average)],
        euclidean in any::<bool>(),
    ) {
        let hc = Agglomerative::new(linkage);
        let tree = if euclidean {
            hc.with_metric(Euclidean).fit(&data).unwrap()
        } else {
            hc.fit(&data).unwrap()
        };
        for edge in tree.edges() {
            prop_assert!(edge.length >= -1e-9, "negative branch {:?}", edge);
        }
    }

    #[test]
    fn prop_deterministic(data in points(12), linkage in linkage()) {
        let hc = Agglomerative::new(linkage);
        let a = hc.fit(&data).unwrap();
        let b = hc.fit(&data).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_matrix_symmetric_through_merges(data in points(10)) {
        let mut m = DistanceMatrix::build(&data, &Pearson).unwrap();
        let mut members: std::collections::BTreeMap<usize, Vec<usize>> =
            (0..data.len()).map(|i| (i, vec![i])).collect();

        while m.n_active() > 1 {
            let ids: Vec<usize> = m.active_ids().collect();
            for &i in &ids {
                for &j in &ids {
                    prop_assert_eq!(m.get(i, j).unwrap(), m.get(j, i).unwrap());
                }
                prop_assert_eq!(m.get(i, i).unwrap(), 0.0);
            }

            let (i, j, _) = m.closest_pair().unwrap();
            let mut merged = members.remove(&i).unwrap();
            merged.extend(members.remove(&j).unwrap());
            m.retire(i).unwrap();
            m.retire(j).unwrap();
            let row: std::collections::BTreeMap<usize, f64> = members
                .iter()
                .map(|(&k, other)| (k, Linkage::Average.combine(&merged, other, &m).unwrap()))
                .collect();
            let new_id = m.next_id();
            m.extend_with(new_id, &row).unwrap();
            members.insert(new_id, merged);
        }
        prop_assert_eq!(m.version(), data.len() - 1);
    }

    #[test]
    fn prop_cut_to_k_has_k_labels(data in points(16), k in 1usize..6) {
        prop_assume!(k <= data.len());
        let tree = Agglomerative::default().fit(&data).unwrap();
        let labels = tree.cut_to_k(k).unwrap();
        let mut unique = labels.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique, (0..k).collect::<Vec<_>>());
    }
}

#[test]
fn mismatched_lengths_fail_before_distances() {
    // A NaN in the first pair would be a numeric error if distances ran first.
    let data = vec![vec![f32::NAN, 1.0], vec![1.0, 2.0], vec![1.0]];
    let err = Agglomerative::default().fit(&data).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err,
        Error::DimensionMismatch {
            expected: 2,
            found: 1
        }
    );
}
