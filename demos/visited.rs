use std::collections::VecDeque;

use dense_bitset::BitSet;

// adjacency list of a small directed graph
const EDGES: [&[usize]; 10] = [
    &[1, 2],
    &[3],
    &[3, 4],
    &[5],
    &[5],
    &[],
    &[7],
    &[8],
    &[6],
    &[0],
];

fn reachable(start: usize) -> dense_bitset::Result<BitSet> {
    let mut visited = BitSet::new(EDGES.len())?;
    let mut queue = VecDeque::from([start]);
    visited.set(start);
    while let Some(node) = queue.pop_front() {
        for &next in EDGES[node] {
            if !visited.get(next) {
                visited.set(next);
                queue.push_back(next);
            }
        }
    }
    Ok(visited)
}

fn print_members(label: &str, bitset: &BitSet) {
    let mut members = Vec::new();
    let mut from = 0;
    while let Some(idx) = bitset.next_set(from) {
        members.push(idx);
        from = idx + 1;
    }
    println!("{label}: {members:?} ({} nodes)", bitset.popcount());
}

fn main() -> dense_bitset::Result<()> {
    let from_zero = reachable(0)?;
    let from_two = reachable(2)?;
    let from_nine = reachable(9)?;
    print_members("reachable from 0", &from_zero);
    print_members("reachable from 2", &from_two);
    print_members("reachable from 9", &from_nine);

    let mut both = BitSet::new(EDGES.len())?;
    both.intersection_of(&from_zero, &from_nine);
    print_members("reachable from 0 and 9", &both);

    let mut any = from_two.clone();
    any |= &reachable(6)?;
    print_members("reachable from 2 or 6", &any);

    // room for nodes added later
    any.resize(1000)?;
    any.set(999);
    print_members("after resize", &any);
    Ok(())
}
