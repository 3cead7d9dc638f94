use std::collections::BTreeMap;

use tracing::trace;

use crate::{board::Position, movegen::legal_moves_into, moves::Move};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(pos, depth, &mut layers[..])
}

/// Node count of each root move's subtree at `depth - 1`. The values sum to
/// `perft(pos, depth)`; depth 0 has no root moves and yields an empty map.
pub fn perft_divide(pos: &mut Position, depth: u32) -> BTreeMap<Move, u64> {
    let mut out = BTreeMap::new();
    if depth == 0 {
        return out;
    }

    let mut roots = Vec::with_capacity(64);
    legal_moves_into(pos, &mut roots);
    let mut layers = vec![Vec::with_capacity(64); depth as usize - 1];

    for mv in roots {
        let undo = pos.make_move_unchecked(mv);
        let nodes = inner(pos, depth - 1, &mut layers[..]);
        pos.unmake_move(mv, undo);
        trace!(%mv, nodes, "divide");
        out.insert(mv, nodes);
    }
    out
}

/// One move buffer per remaining ply, so the recursion never allocates.
fn inner(pos: &mut Position, depth: u32, layers: &mut [Vec<Move>]) -> u64 {
    if depth == 0 {
        return 1;
    }

    let Some((buf, rest)) = layers.split_first_mut() else {
        unreachable!("perft requires one buffer per remaining ply");
    };
    legal_moves_into(pos, buf);

    // Leaf counts are exactly the number of legal moves.
    if depth == 1 {
        return buf.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in buf.iter().copied() {
        let undo = pos.make_move_unchecked(mv);
        nodes += inner(pos, depth - 1, rest);
        pos.unmake_move(mv, undo);
    }
    nodes
}
