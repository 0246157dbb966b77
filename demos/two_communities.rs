use cleave::io::{load_graph, save_communities, write_graph};
use cleave::{modularity_score, LeadingEigenvector, SparseGraph};
use std::fs::File;
use std::io::BufWriter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two 4-cliques joined by a single bridge edge (3-4), round-tripped
    // through the binary graph format to exercise the file boundary.
    let graph = SparseGraph::from_rows(&[
        vec![1, 2, 3],
        vec![0, 2, 3],
        vec![0, 1, 3],
        vec![0, 1, 2, 4],
        vec![3, 5, 6, 7],
        vec![4, 6, 7],
        vec![4, 5, 7],
        vec![4, 5, 6],
    ])?;

    let dir = std::env::temp_dir();
    let input = dir.join("cleave_two_communities.graph");
    let output = dir.join("cleave_two_communities.groups");

    write_graph(&mut BufWriter::new(File::create(&input)?), &graph)?;
    let graph = load_graph(&input)?;

    let communities = LeadingEigenvector::new().with_seed(42).partition(&graph)?;
    save_communities(&output, &communities)?;

    println!(
        "n_nodes={} n_edges={}",
        graph.len(),
        graph.total_degree() / 2
    );
    println!("communities={}", communities.len());
    for (cid, ids) in communities.iter().enumerate() {
        println!("  community {}: {:?}", cid, ids);
    }
    println!("modularity={:.4}", modularity_score(&graph, &communities)?);

    Ok(())
}
