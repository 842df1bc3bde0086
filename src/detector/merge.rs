use std::collections::BTreeMap;

use crate::region::Region;

/// Disjoint-set over region indices, used to accumulate pairwise merge
/// decisions transitively.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // path compression
        let mut x = x;
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }

        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x != root_y {
            self.parent[root_x] = root_y;
        }
    }
}

/// Whether two line regions belong to the same multi-line label.
///
/// The vertical gap is computed assuming `first` sits above `second`; pairs
/// are not retested in the opposite order.
fn should_merge(first: &Region, second: &Region, vertical_threshold: f32) -> bool {
    let vertical_gap = second.top - first.bottom();
    if vertical_gap < 0.0 || vertical_gap >= vertical_threshold {
        return false;
    }

    let overlap_width =
        (first.right().min(second.right()) - first.left.max(second.left)).max(0.0);
    let horizontal_offset = (second.left - first.left).abs();
    let min_width = first.width.min(second.width);

    // significant horizontal overlap, or left edges roughly aligned; regions
    // sitting in separate columns fail both
    overlap_width > min_width * 0.3 || horizontal_offset < min_width
}

/// Collapse vertically adjacent line regions (multi-line labels) into one
/// region per cluster.
///
/// The merge distance scales with the mean region height of this call, so
/// tightly set small labels and large headings both merge at their own
/// scale. Clusters are built with a disjoint-set, so chains of pairwise
/// matches end up in a single region even when their extremes would not
/// match each other directly.
pub fn merge_vertically_close(regions: Vec<Region>, vertical_merge_factor: f32) -> Vec<Region> {
    if regions.is_empty() {
        return regions;
    }

    let avg_height = regions.iter().map(|r| r.height).sum::<f32>() / regions.len() as f32;
    let vertical_threshold = avg_height * vertical_merge_factor;

    let mut set = DisjointSet::new(regions.len());
    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            if should_merge(&regions[i], &regions[j], vertical_threshold) {
                set.union(i, j);
            }
        }
    }

    let mut clusters: BTreeMap<usize, Region> = BTreeMap::new();
    for (i, region) in regions.iter().enumerate() {
        let root = set.find(i);
        clusters
            .entry(root)
            .and_modify(|merged| *merged = merged.union(region))
            .or_insert(*region);
    }

    clusters.into_values().collect()
}
