//! End-to-end tests: edge list in, vector file out.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use walkvec_core::algo::random_walk::{generate_walks, Method, WalkMode};
use walkvec_core::Graph;
use walkvec_nn::{
    embed, EmbedConfig, NegativeTable, SkipGram, TrainStats, VectorFile, Vocab,
    DEFAULT_TABLE_SIZE,
};

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn triangle_config() -> EmbedConfig {
    EmbedConfig::default()
        .with_method(Method::DeepWalk)
        .with_embedding_dim(4)
        .with_walk_length(3)
        .with_num_walks(2)
        .with_window(1)
        .with_epochs(1)
        .with_negative_samples(1)
        .with_learning_rate(0.025)
        .with_seed(42)
}

fn run(edges: &str, config: &EmbedConfig) -> String {
    let graph = Graph::read(edges.as_bytes()).unwrap();
    let (embedding, _) = embed(&graph, config, None).unwrap();
    embedding.to_vector_string()
}

#[test]
fn triangle_end_to_end() {
    let out = run("0 1\n1 2\n2 0\n", &triangle_config());

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);

    let rows = VectorFile::read(out.as_bytes()).unwrap();
    let ids: Vec<u64> = rows.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![0, 1, 2]);

    for (line, (_, v)) in lines.iter().zip(&rows) {
        assert_eq!(v.len(), 4);
        assert!((norm(v) - 1.0).abs() < 1e-4, "norm of {line}");
        for field in line.split(' ').skip(1) {
            let decimals = field.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 8, "{field}");
        }
    }

    assert_eq!(out, run("0 1\n1 2\n2 0\n", &triangle_config()));
}

#[test]
fn node2vec_deterministic() {
    let edges = "0 1\n1 2\n2 3\n3 0\n0 2\n4 0\n4 4\n";
    let config = EmbedConfig::default()
        .with_method(Method::Node2Vec)
        .with_bias(0.5, 2.0)
        .with_embedding_dim(16)
        .with_walk_length(10)
        .with_num_walks(4)
        .with_epochs(2)
        .with_seed(7);

    let first = run(edges, &config);
    assert_eq!(first, run(edges, &config));
    assert_ne!(first, run(edges, &config.with_seed(8)));
}

#[test]
fn parallel_walks_deterministic() {
    let edges = "0 1\n1 2\n2 3\n3 4\n4 0\n";
    let config = EmbedConfig::default()
        .with_embedding_dim(8)
        .with_walk_length(6)
        .with_num_walks(6)
        .with_walk_mode(WalkMode::Parallel);
    assert_eq!(run(edges, &config), run(edges, &config));
}

#[test]
fn ids_sparse_and_sorted() {
    let out = run("1000 5\n5 77\n", &triangle_config());
    let ids: Vec<u64> = VectorFile::read(out.as_bytes())
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(ids, vec![5, 77, 1000]);
}

#[test]
fn default_table_covers_every_walked_node() {
    // One hub with many leaves: leaves are rare in walks but must still get a slot.
    let edges: Vec<_> = (1..=500).map(|leaf| (0, leaf)).collect();
    let graph = Graph::from_edges(&edges);
    let config = EmbedConfig::default().walk_config();
    let walks = generate_walks(&graph, &config);

    let vocab = Vocab::from_walks(&walks);
    let freq = vocab.frequencies(&walks).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(1);
    let table = NegativeTable::build(&freq, DEFAULT_TABLE_SIZE, &mut rng);

    for (i, &c) in freq.iter().enumerate() {
        assert!(c > 0);
        assert!(table.count(i as u32) >= 1, "node index {i} has no slot");
    }
}

#[test]
fn negatives_equal_to_context_are_skipped() {
    let mut rng = XorShiftRng::seed_from_u64(3);
    let mut model = SkipGram::new(3, 8, &mut rng).unwrap();
    let before: Vec<Vec<f32>> = (0..3).map(|i| model.output_vector(i).to_vec()).collect();
    let table = NegativeTable::from_slots(vec![2; 16]);
    let mut stats = TrainStats::default();

    model.train_pair(0, 2, &table, 4, 0.025, &mut rng, &mut stats);

    assert_eq!(stats.positive_updates, 1);
    assert_eq!(stats.negatives_skipped, 4);
    assert_eq!(stats.negative_updates, 0);
    // Only the context row moved.
    assert_eq!(model.output_vector(0), before[0].as_slice());
    assert_eq!(model.output_vector(1), before[1].as_slice());
    assert_ne!(model.output_vector(2), before[2].as_slice());
}

#[test]
fn unknown_method_rejected_before_work() {
    let err = "line".parse::<Method>().unwrap_err();
    assert!(err.to_string().contains("unknown method"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_vector_is_unit_length(
        edges in prop::collection::vec((0u64..12, 0u64..12), 1..20),
        node2vec in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let graph = Graph::from_edges(&edges);
        let config = EmbedConfig::default()
            .with_method(if node2vec { Method::Node2Vec } else { Method::DeepWalk })
            .with_embedding_dim(8)
            .with_walk_length(6)
            .with_num_walks(2)
            .with_window(2)
            .with_epochs(2)
            .with_seed(seed);

        let (embedding, report) = embed(&graph, &config, None).unwrap();
        prop_assert_eq!(embedding.ids.as_slice(), graph.node_ids());
        prop_assert_eq!(report.train.epochs_completed, 2);
        for v in &embedding.vectors {
            prop_assert_eq!(v.len(), 8);
            prop_assert!((norm(v) - 1.0).abs() < 1e-4);
        }
    }
}
