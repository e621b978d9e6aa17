use pretty_assertions::assert_eq;

use super::*;

#[test]
fn table_size_rounds_up() {
    assert_eq!(table_size_for(0), 1);
    assert_eq!(table_size_for(1), 1);
    assert_eq!(table_size_for(2), 2);
    assert_eq!(table_size_for(17), 32);
    assert_eq!(table_size_for(32), 32);
    assert_eq!(table_size_for(usize::MAX / 2), TableConfig::MAXIMUM_CAPACITY);
}

#[test]
fn default_buckets() {
    let cfg = TableConfig::default();
    // 16 / 0.75 = 21, rounded up.
    assert_eq!(cfg.buckets_for(0), 32);
    assert_eq!(cfg.buckets_for(3), 4);
}

#[test]
fn builders() {
    let cfg = TableConfig::new()
        .with_initial_capacity(4)
        .with_load_factor(0.5);
    assert_eq!(cfg.initial_capacity, 4);
    assert_eq!(cfg.load_factor, 0.5);
    assert_eq!(cfg.buckets_for(0), 8);
    assert_eq!(
        TableConfig::new().with_load_factor(7.0).load_factor,
        TableConfig::DEFAULT_LOAD_FACTOR
    );
}
