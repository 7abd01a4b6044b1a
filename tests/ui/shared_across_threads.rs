use dense_bitset::BitSet;

fn assert_send_sync<T: Send + Sync>() {}

fn main() {
    assert_send_sync::<BitSet>();

    let mut visited = BitSet::new(256).unwrap();
    visited.set(7);
    visited.set(200);

    // any number of readers may share a bitset
    let (count, first) = std::thread::scope(|s| {
        let count = s.spawn(|| visited.popcount());
        let first = s.spawn(|| visited.first_set());
        (count.join().unwrap(), first.join().unwrap())
    });
    assert_eq!(count, 2);
    assert_eq!(first, Some(7));

    // and a bitset can be handed to another thread for writing
    let handle = std::thread::spawn(move || {
        visited.set(8);
        visited
    });
    let visited = handle.join().unwrap();
    assert_eq!(visited.next_set(8), Some(8));
}
