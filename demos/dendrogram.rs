//! Average-linkage dendrogram over a small 4-dimensional dataset.
//!
//! Pass a linkage name (`min`, `max`, `avg`) as the first argument to switch
//! policies.

use agglo::cluster::{Agglomerative, Euclidean, Linkage};

fn main() -> agglo::Result<()> {
    // Two near-identical pairs and one point in between.
    let data: Vec<Vec<f32>> = vec![
        vec![1.0, 2.0, 3.0, 4.0],
        vec![1.1, 2.1, 2.9, 4.1],
        vec![9.0, 8.9, 9.1, 9.2],
        vec![8.8, 9.2, 9.0, 9.1],
        vec![4.9, 5.1, 5.0, 5.2],
    ];

    let linkage: Linkage = match std::env::args().nth(1) {
        Some(name) => name.parse()?,
        None => Linkage::Average,
    };

    // --- Pearson distance (default metric) ---
    let tree = Agglomerative::new(linkage).fit(&data)?;
    println!("=== Pearson distance, linkage={linkage} ===");
    print!("{tree}");

    println!("\nEdges (parent, child, length):");
    for edge in tree.edges() {
        println!("  ({}, {}, {:.4})", edge.parent, edge.child, edge.length);
    }

    // --- Euclidean distance ---
    let tree = Agglomerative::new(linkage)
        .with_metric(Euclidean)
        .fit(&data)?;
    println!("\n=== Euclidean distance, linkage={linkage} ===");
    print!("{tree}");

    println!("\nMerges:");
    for m in tree.merges() {
        println!(
            "  {} + {} -> {} at distance {:.4} (height {:.4}, size {})",
            m.left, m.right, m.id, m.distance, m.height, m.size
        );
    }

    println!("\nTwo flat clusters: {:?}", tree.cut_to_k(2)?);
    Ok(())
}
