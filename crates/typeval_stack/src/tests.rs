use super::*;

#[derive(Debug)]
enum Nest {
    Leaf(u32),
    Wrap(Box<Nest>),
}

fn build(depth: u32) -> Nest {
    let mut n = Nest::Leaf(depth);
    for _ in 0..depth {
        n = Nest::Wrap(Box::new(n));
    }
    n
}

fn depth_of(n: &Nest) -> u32 {
    ensure_sufficient_stack(|| match n {
        Nest::Leaf(_) => 0,
        Nest::Wrap(inner) => depth_of(inner) + 1,
    })
}

fn dismantle(n: Nest) {
    // Iterative drop so the test itself does not overflow on teardown.
    let mut cur = n;
    while let Nest::Wrap(inner) = cur {
        cur = *inner;
    }
}

#[test]
fn shallow_walk() {
    let n = build(8);
    assert_eq!(depth_of(&n), 8);
    dismantle(n);
}

#[test]
fn deep_walk_grows_stack() {
    let n = build(200_000);
    assert_eq!(depth_of(&n), 200_000);
    dismantle(n);
}

#[test]
fn config_builders() {
    let cfg = StackConfig::default().with_red_zone(64).with_segment(4096);
    assert_eq!(cfg.red_zone, 64);
    assert_eq!(cfg.segment, 4096);
    assert_eq!(StackConfig::new(), StackConfig::default());
}

#[test]
fn passes_results_through() {
    let r: Result<u8, &str> = grow_with(StackConfig::new(), || Err("boom"));
    assert_eq!(r, Err("boom"));
}
