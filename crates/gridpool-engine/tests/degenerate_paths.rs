//! Integration test: reference cells, tie-breaking and degenerate scenes.
//!
//! Degenerate geometry (no agents, a single agent, everyone out of range,
//! everyone masked) is never an error: the affected rows are all zeros
//! and the output shape is unchanged.

use gridpool_core::{Point2, SceneStep, Variant};
use gridpool_engine::{
    compute_descriptor, BatchedEngine, EngineConfig, PerAgentEngine, PoolingEngine,
};
use gridpool_obs::DescriptorLayout;
use gridpool_test_utils::{init_test_tracing, SceneBuilder};
use proptest::prelude::*;

fn p(x: f32, y: f32) -> Point2 {
    Point2::new(x, y)
}

/// `n = 4`, `cell_side = 2`, `pool_size = 1`: sixteen 2 x 2 cells over
/// `[-4, 4)^2`.
fn coarse(variant: Variant) -> EngineConfig {
    EngineConfig::builder()
        .cell_side(2.0)
        .n(4)
        .pool_size(1)
        .variant(variant)
        .build()
        .unwrap()
}

fn both(config: EngineConfig) -> [Box<dyn PoolingEngine>; 2] {
    [
        Box::new(BatchedEngine::new(config.clone()).unwrap()),
        Box::new(PerAgentEngine::new(config).unwrap()),
    ]
}

#[test]
fn single_neighbour_lands_in_the_hand_computed_cell() {
    init_test_tracing();
    let layout = DescriptorLayout::new(4, 1);
    for engine in both(coarse(Variant::Occupancy)) {
        let batch = compute_descriptor(engine.as_ref(), &[p(0.0, 0.0), p(1.0, 1.0)], None, None)
            .unwrap();
        let row = batch.row(0).unwrap();
        // (floor(1/2 + 2), floor(1/2 + 2)) = (2, 2)
        assert_eq!(layout.nonzero(row), vec![(0, 2, 2)], "{}", engine.name());
        assert_eq!(row[layout.index(0, 2, 2)], 1.0);
    }
}

#[test]
fn later_neighbour_wins_a_shared_sub_cell() {
    let layout = DescriptorLayout::new(4, 1);
    let now = [p(0.0, 0.0), p(0.5, 0.5), p(1.5, 1.5)];
    let hidden = [0.0, 3.0, -8.0];
    for engine in both(coarse(Variant::Social { hidden_dim: 1 })) {
        let batch = engine
            .compute(&SceneStep::new(&now).with_hidden(&hidden))
            .unwrap();
        // Both neighbours fall in cell (2, 2); agent 2 overwrites agent 1.
        assert_eq!(batch.row(0).unwrap()[layout.index(0, 2, 2)], -8.0);
        assert!(batch.metrics().cell_overwrites >= 1);
    }
}

#[test]
fn empty_and_single_agent_scenes_keep_their_shape() {
    for engine in both(coarse(Variant::Occupancy)) {
        let empty = engine.compute(&SceneStep::new(&[])).unwrap();
        assert_eq!(empty.agents(), 0);
        assert!(empty.is_empty());

        let single = engine.compute(&SceneStep::new(&[p(2.0, -1.0)])).unwrap();
        assert_eq!(single.len(), 16);
        assert!(single.as_slice().iter().all(|&v| v == 0.0));
    }
}

#[test]
fn neighbours_beyond_the_grid_contribute_nothing() {
    // Half-extent is n * cell_side / 2 = 4.
    let now = [p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.5), p(-4.01, 0.0), p(9.0, -9.0)];
    for engine in both(coarse(Variant::Occupancy)) {
        let batch = engine.compute(&SceneStep::new(&now)).unwrap();
        assert!(
            batch.row(0).unwrap().iter().all(|&v| v == 0.0),
            "{}",
            engine.name()
        );
        assert!(batch.metrics().out_of_range >= 4);
    }
}

#[test]
fn fully_masked_neighbourhood_is_zero() {
    let engine = PerAgentEngine::new(coarse(Variant::Occupancy)).unwrap();
    let now = [p(0.0, 0.0), Point2::MISSING, Point2::MISSING];
    let batch = engine.compute(&SceneStep::new(&now)).unwrap();
    assert!(batch.as_slice().iter().all(|&v| v == 0.0));
    let m = batch.metrics();
    assert_eq!(m.masked, 2);
    assert_eq!(m.degenerate_agents, 3);
}

#[test]
fn directional_neighbour_without_previous_is_masked() {
    let engine = PerAgentEngine::new(coarse(Variant::Directional)).unwrap();
    let now = [p(0.0, 0.0), p(1.0, 1.0), p(-1.0, 1.0)];
    let prev = [p(0.0, 0.0), Point2::MISSING, p(-1.0, 0.0)];
    let batch = engine
        .compute(&SceneStep::new(&now).with_previous(&prev))
        .unwrap();
    let layout = DescriptorLayout::new(4, 2);
    // Only agent 2 (cell (1, 2), velocity (0, 1)) survives for ego 0.
    assert_eq!(layout.nonzero(batch.row(0).unwrap()), vec![(1, 1, 2)]);
    // Agent 1 is masked for both other egos and has no frame of its own.
    assert!(batch.row(1).unwrap().iter().all(|&v| v == 0.0));
    assert_eq!(batch.metrics().masked, 2);
}

#[test]
fn blur_keeps_only_the_in_grid_share_of_a_border_neighbour() {
    // n = 2, pool_size = 2, cell_side = 2: 4 x 4 unit sub-cells.
    let config = EngineConfig::builder()
        .cell_side(2.0)
        .n(2)
        .pool_size(2)
        .blur_size(3)
        .build()
        .unwrap();
    for engine in both(config) {
        let batch = engine
            .compute(&SceneStep::new(&[p(0.0, 0.0), p(-1.5, -1.5)]))
            .unwrap();
        let row = batch.row(0).unwrap();
        assert!((row[0] - 4.0 / 9.0).abs() < 1e-6, "got {}", row[0]);
        assert_eq!(&row[1..], &[0.0, 0.0, 0.0]);
    }
}

#[test]
fn even_blur_width_keeps_descriptor_length() {
    let config = EngineConfig::builder()
        .cell_side(2.0)
        .n(4)
        .pool_size(1)
        .blur_size(2)
        .build()
        .unwrap();
    let scene = SceneBuilder::new(3, 6).extent(3.0).build();
    for engine in both(config) {
        let batch = engine.compute(&scene.positions_only()).unwrap();
        assert_eq!(batch.descriptor_len(), 16);
        assert_eq!(batch.len(), 6 * 16);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Hiding a neighbour is the same as removing it from the scene.
    #[test]
    fn sentinel_equals_removal(seed in any::<u64>(), agents in 2usize..10, pick in any::<prop::sample::Index>()) {
        let engine = PerAgentEngine::new(coarse(Variant::Social { hidden_dim: 2 })).unwrap();
        let scene = SceneBuilder::new(seed, agents).extent(3.0).hidden_dim(2).build();
        let hidden_agent = pick.index(agents);

        let mut masked = scene.clone();
        masked.hide(hidden_agent);
        let with_sentinel = engine.compute(&masked.step()).unwrap();

        let mut removed = scene.clone();
        removed.now.remove(hidden_agent);
        removed.prev.remove(hidden_agent);
        removed.hidden.drain(hidden_agent * 2..hidden_agent * 2 + 2);
        let without = engine.compute(&removed.step()).unwrap();

        let kept: Vec<usize> = (0..agents).filter(|&i| i != hidden_agent).collect();
        for (r, &i) in kept.iter().enumerate() {
            prop_assert_eq!(with_sentinel.row(i).unwrap(), without.row(r).unwrap());
        }
        prop_assert!(with_sentinel.row(hidden_agent).unwrap().iter().all(|&v| v == 0.0));
    }

    /// Without a previous position a directional neighbour is dropped like
    /// a removed agent, and its own row is zero.
    #[test]
    fn unobserved_previous_equals_removal(seed in any::<u64>(), agents in 2usize..10, pick in any::<prop::sample::Index>()) {
        let engine = PerAgentEngine::new(coarse(Variant::Directional)).unwrap();
        let scene = SceneBuilder::new(seed, agents).extent(3.0).build();
        let blind_agent = pick.index(agents);

        let mut blind = scene.clone();
        blind.hide_previous(blind_agent);
        let masked = engine.compute(&blind.step()).unwrap();

        let mut removed = scene.clone();
        removed.now.remove(blind_agent);
        removed.prev.remove(blind_agent);
        let without = engine.compute(&removed.step()).unwrap();

        let kept: Vec<usize> = (0..agents).filter(|&i| i != blind_agent).collect();
        for (r, &i) in kept.iter().enumerate() {
            prop_assert_eq!(masked.row(i).unwrap(), without.row(r).unwrap());
        }
        prop_assert!(masked.row(blind_agent).unwrap().iter().all(|&v| v == 0.0));
    }

    /// Occupancy descriptors are non-negative counts.
    #[test]
    fn occupancy_is_non_negative(seed in any::<u64>(), agents in 0usize..16) {
        let engine = PerAgentEngine::new(EngineConfig::default()).unwrap();
        let scene = SceneBuilder::new(seed, agents).build();
        let batch = engine.compute(&scene.positions_only()).unwrap();
        prop_assert_eq!(batch.len(), agents * 16);
        prop_assert!(batch.as_slice().iter().all(|&v| v >= 0.0 && v.fract() == 0.0));
    }
}
