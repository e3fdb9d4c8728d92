use crate::utils::bitset::BitSet;

const BITS: usize = std::mem::size_of::<usize>() * 8;

type Set = BitSet<usize, 2>;

#[test]
fn get_and_set() {
    let indices = [0, 3, 63, 64, 100, 127, 128, 300];
    let mut set = Set::from_ones(indices);
    assert_eq!(set.count_ones(), indices.len());
    for i in 0..(4 * BITS + 64) {
        assert_eq!(set.get(i), indices.contains(&i), "bit {i}");
    }
    set.set(64, false);
    assert!(!set.get(64));
    assert_eq!(set.count_ones(), indices.len() - 1);
    // clearing past the end doesn't grow the set
    set.set(10_000, false);
    assert_eq!(set.as_slice().len(), 300 / BITS + 1);
    set.clear();
    assert!(set.all_zero());
    assert_eq!(set.count_ones(), 0);
}

#[test]
fn capacity() {
    let set = Set::with_capacity(BITS + 1);
    assert_eq!(set.as_slice().len(), 2);
    assert!(set.all_zero());
    assert_eq!(Set::new(), Set::from_ones([]));
}

#[test]
fn last_one() {
    let empty = Set::new();
    assert_eq!(empty.last_one(), None);
    let mut set = Set::from_ones([65]);
    set.set(65, false);
    assert_eq!(set.last_one(), None);
    let set = Set::from_ones([5, 64, 96, 128]);
    assert_eq!(set.last_one(), Some(128));
}

#[test]
fn iteration() {
    let set = Set::from_ones([128, 0, 64, 96, 1]);
    assert_eq!(set.iter_ones().collect::<Vec<_>>(), [0, 1, 64, 96, 128]);
    assert_eq!(Set::new().iter_ones().count(), 0);
}

#[test]
fn operators() {
    let a = Set::from_ones([0, 2, 70]);
    let b = Set::from_ones([2, 3, 200]);
    assert_eq!((&a & &b).iter_ones().collect::<Vec<_>>(), [2]);
    assert_eq!((&a | &b).iter_ones().collect::<Vec<_>>(), [0, 2, 3, 70, 200]);
    assert_eq!((&a ^ &b).iter_ones().collect::<Vec<_>>(), [0, 3, 70, 200]);

    let mut c = a.clone();
    c ^= &b;
    assert_eq!(c, &a ^ &b);
    c ^= &b;
    // xor twice restores the original bits, padded with zero words
    assert_eq!(c.iter_ones().collect::<Vec<_>>(), [0, 2, 70]);
    assert_eq!(c.count_ones(), a.count_ones());
    let mut d = Set::new();
    d |= &a;
    assert_eq!(d, a);
}
