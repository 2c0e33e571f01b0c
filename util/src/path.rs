use std::hash::Hash;

/// Find a shortest path from start to dest, given as a full node sequence
/// including both endpoints. Deterministic for a fixed neighbors function.
pub fn astar_path<T, I>(
    start: &T,
    dest: &T,
    mut neighbors: impl FnMut(&T) -> I,
    mut heuristic: impl FnMut(&T, &T) -> usize,
) -> Option<Vec<T>>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let (path, _) = pathfinding::prelude::astar(
        start,
        |n| neighbors(n).into_iter().map(|n| (n, 1)),
        |n| heuristic(n, dest),
        |n| n == dest,
    )?;
    Some(path)
}
