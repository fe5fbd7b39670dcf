use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kd_index::kdtree::{KdTree, KdTreeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::RTree;

fn load_data() -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..100_000)
        .map(|_| [rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)])
        .collect()
}

fn construct_kdtree(points: &[[f64; 2]]) -> KdTree<f64, 2, usize> {
    let mut tree = KdTree::new();
    for (i, point) in points.iter().enumerate() {
        tree.add(*point, i).unwrap();
    }
    tree
}

fn construct_kdtree_bulk(points: &[[f64; 2]]) -> KdTree<f64, 2, usize> {
    let mut builder = KdTreeBuilder::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        builder.add(*point, i);
    }
    builder.finish().unwrap()
}

fn construct_rstar(points: Vec<[f64; 2]>) -> RTree<[f64; 2]> {
    RTree::bulk_load(points)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let points = load_data();

    c.bench_function("construction (kdtree)", |b| {
        b.iter(|| construct_kdtree(&points))
    });

    c.bench_function("construction (kdtree bulk)", |b| {
        b.iter(|| construct_kdtree_bulk(&points))
    });

    c.bench_function("construction (rstar bulk)", |b| {
        b.iter(|| construct_rstar(points.to_vec()))
    });

    let tree = construct_kdtree_bulk(&points);
    let rstar_tree = construct_rstar(points.to_vec());
    let query = [-111.9, 40.7];

    c.bench_function("nearest 10 (kdtree)", |b| {
        b.iter(|| tree.nearest_neighbours(black_box(&query), Some(10)))
    });

    c.bench_function("nearest 10 (rstar)", |b| {
        b.iter(|| {
            rstar_tree
                .nearest_neighbor_iter(black_box(&query))
                .take(10)
                .collect::<Vec<_>>()
        })
    });

    c.bench_function("radial 2 degrees (kdtree)", |b| {
        b.iter(|| tree.radial_search(black_box(&query), 2., None).unwrap())
    });

    c.bench_function("radial 2 degrees (rstar)", |b| {
        b.iter(|| {
            rstar_tree
                .locate_within_distance(black_box(query), 4.)
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
