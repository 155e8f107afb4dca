use fastrand::Rng;

/// In-place Fisher–Yates: for i from the last index down to 1, swap with a
/// uniform index in 0..=i.
pub fn fisher_yates<T>(rng: &mut Rng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.usize(0..=i);
        items.swap(i, j);
    }
}

/// Non-leader share of each cell: the first `remaining % cells` cells take
/// one extra member.
pub fn cell_sizes(remaining: usize, cells: usize) -> Vec<usize> {
    let base = remaining / cells;
    let extra = remaining % cells;
    (0..cells)
        .map(|c| if c < extra { base + 1 } else { base })
        .collect()
}

/// Refills `cells` with one leader per seeded cell followed by a contiguous
/// run of `shuffled`. `sizes` must come from [`cell_sizes`].
pub fn fill_cells(leaders: &[u32], shuffled: &[u32], sizes: &[usize], cells: &mut Vec<Vec<u32>>) {
    cells.resize_with(sizes.len(), Vec::new);

    let mut cursor = 0;
    for (c, cell) in cells.iter_mut().enumerate() {
        cell.clear();
        if let Some(&leader) = leaders.get(c) {
            cell.push(leader);
        }
        let end = cursor + sizes[c];
        cell.extend_from_slice(&shuffled[cursor..end]);
        cursor = end;
    }
}
