//! Point quadtree with a per-region max-radius side table.
//!
//! Regions live in an arena (`Vec<Quad>`), addressed by index. The root is
//! region 0 and every child is allocated after its parent, so a reverse sweep
//! over the arena visits children before parents. That sweep fills
//! `max_radius`, the bottom-up maximum entry radius of each region, which lets
//! a traversal skip any region that cannot hold a node within reach.
//!
//! The tree is meant to be built, queried and dropped within one step.

/// Maximum subdivision depth. Entries closer together than the region size
/// at this depth share a leaf.
const MAX_DEPTH: usize = 32;

/// An item stored in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadEntry {
    /// Caller-defined item index (the node slot).
    pub item: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Axis-aligned region bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bounds {
    fn quadrant(&self, x: f64, y: f64) -> usize {
        let xm = (self.x0 + self.x1) * 0.5;
        let ym = (self.y0 + self.y1) * 0.5;
        (usize::from(y >= ym) << 1) | usize::from(x >= xm)
    }

    fn child(&self, quadrant: usize) -> Bounds {
        let xm = (self.x0 + self.x1) * 0.5;
        let ym = (self.y0 + self.y1) * 0.5;
        let (x0, x1) = if quadrant & 1 == 0 { (self.x0, xm) } else { (xm, self.x1) };
        let (y0, y1) = if quadrant & 2 == 0 { (self.y0, ym) } else { (ym, self.y1) };
        Bounds { x0, y0, x1, y1 }
    }

    /// True when this box lies entirely outside `[x - reach, x + reach]` or
    /// `[y - reach, y + reach]`.
    #[inline]
    pub fn outside(&self, x: f64, y: f64, reach: f64) -> bool {
        self.x0 > x + reach || self.x1 < x - reach || self.y0 > y + reach || self.y1 < y - reach
    }
}

#[derive(Debug)]
enum QuadKind {
    Leaf(Vec<QuadEntry>),
    Internal([Option<usize>; 4]),
}

#[derive(Debug)]
struct Quad {
    bounds: Bounds,
    kind: QuadKind,
}

/// A region handed to [`QuadTree::visit`] callbacks.
#[derive(Debug, Clone, Copy)]
pub struct QuadVisit<'a> {
    pub bounds: Bounds,
    /// Largest entry radius anywhere in this region.
    pub max_radius: f64,
    /// Entries when the region is a leaf, `None` for internal regions.
    pub entries: Option<&'a [QuadEntry]>,
}

/// Quadtree over entry positions.
#[derive(Debug)]
pub struct QuadTree {
    quads: Vec<Quad>,
    max_radius: Vec<f64>,
    len: usize,
}

impl QuadTree {
    /// Build a tree over `entries` and compute the max-radius side table.
    pub fn build(entries: &[QuadEntry]) -> Self {
        let mut tree = Self {
            quads: Vec::with_capacity(entries.len() * 2 + 1),
            max_radius: Vec::new(),
            len: 0,
        };
        tree.quads.push(Quad {
            bounds: cover(entries),
            kind: QuadKind::Leaf(Vec::new()),
        });

        for &entry in entries {
            tree.insert(entry);
        }
        tree.compute_max_radius();
        tree
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of regions in the arena.
    pub fn region_count(&self) -> usize {
        self.quads.len()
    }

    /// Root bounds.
    pub fn bounds(&self) -> Bounds {
        self.quads[0].bounds
    }

    /// Max entry radius over the whole tree.
    pub fn max_radius(&self) -> f64 {
        self.max_radius[0]
    }

    /// Pre-order traversal. The callback returns `true` to skip the region's
    /// children.
    pub fn visit<F>(&self, mut callback: F)
    where
        F: FnMut(QuadVisit<'_>) -> bool,
    {
        if self.is_empty() {
            return;
        }
        let mut stack = vec![0usize];
        while let Some(id) = stack.pop() {
            let quad = &self.quads[id];
            let view = QuadVisit {
                bounds: quad.bounds,
                max_radius: self.max_radius[id],
                entries: match &quad.kind {
                    QuadKind::Leaf(entries) => Some(entries.as_slice()),
                    QuadKind::Internal(_) => None,
                },
            };
            if callback(view) {
                continue;
            }
            if let QuadKind::Internal(children) = &quad.kind {
                stack.extend(children.iter().rev().flatten());
            }
        }
    }

    fn insert(&mut self, entry: QuadEntry) {
        self.len += 1;
        let mut id = 0;
        let mut depth = 0;
        loop {
            let bounds = self.quads[id].bounds;
            if matches!(self.quads[id].kind, QuadKind::Internal(_)) {
                id = self.child_or_create(id, bounds.quadrant(entry.x, entry.y));
                depth += 1;
                continue;
            }

            let QuadKind::Leaf(entries) = &mut self.quads[id].kind else {
                unreachable!("internal regions handled above");
            };
            let coincident = entries
                .first()
                .is_none_or(|e| e.x == entry.x && e.y == entry.y);
            if coincident || depth >= MAX_DEPTH {
                entries.push(entry);
                return;
            }

            // Split: this leaf becomes internal and its entries move one
            // level down before the insert retries at this region.
            let existing = std::mem::take(entries);
            self.quads[id].kind = QuadKind::Internal([None; 4]);
            for old in existing {
                let child = self.child_or_create(id, bounds.quadrant(old.x, old.y));
                if let QuadKind::Leaf(child_entries) = &mut self.quads[child].kind {
                    child_entries.push(old);
                }
            }
        }
    }

    fn child_or_create(&mut self, id: usize, quadrant: usize) -> usize {
        let bounds = self.quads[id].bounds;
        let next = self.quads.len();
        let QuadKind::Internal(children) = &mut self.quads[id].kind else {
            unreachable!("child_or_create called on a leaf");
        };
        if let Some(child) = children[quadrant] {
            return child;
        }
        children[quadrant] = Some(next);
        self.quads.push(Quad {
            bounds: bounds.child(quadrant),
            kind: QuadKind::Leaf(Vec::new()),
        });
        next
    }

    fn compute_max_radius(&mut self) {
        self.max_radius = vec![0.0; self.quads.len()];
        for id in (0..self.quads.len()).rev() {
            let radius = match &self.quads[id].kind {
                QuadKind::Leaf(entries) => entries.iter().map(|e| e.radius).fold(0.0, f64::max),
                QuadKind::Internal(children) => children
                    .iter()
                    .flatten()
                    .map(|&child| self.max_radius[child])
                    .fold(0.0, f64::max),
            };
            self.max_radius[id] = radius;
        }
    }
}

/// Square bounds covering every entry.
fn cover(entries: &[QuadEntry]) -> Bounds {
    if entries.is_empty() {
        return Bounds {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 1.0,
        };
    }
    let mut x0 = f64::INFINITY;
    let mut y0 = f64::INFINITY;
    let mut x1 = f64::NEG_INFINITY;
    let mut y1 = f64::NEG_INFINITY;
    for e in entries {
        x0 = x0.min(e.x);
        y0 = y0.min(e.y);
        x1 = x1.max(e.x);
        y1 = y1.max(e.y);
    }
    let size = (x1 - x0).max(y1 - y0).max(1.0);
    Bounds {
        x0,
        y0,
        x1: x0 + size,
        y1: y0 + size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(item: usize, x: f64, y: f64, radius: f64) -> QuadEntry {
        QuadEntry { item, x, y, radius }
    }

    fn collect_items(tree: &QuadTree) -> Vec<usize> {
        let mut items = Vec::new();
        tree.visit(|quad| {
            if let Some(entries) = quad.entries {
                items.extend(entries.iter().map(|e| e.item));
            }
            false
        });
        items.sort_unstable();
        items
    }

    #[test]
    fn test_empty_tree() {
        let tree = QuadTree::build(&[]);
        assert!(tree.is_empty());
        let mut visited = 0;
        tree.visit(|_| {
            visited += 1;
            false
        });
        assert_eq!(visited, 0);
    }

    #[test]
    fn test_all_entries_reachable() {
        let entries: Vec<_> = (0..50)
            .map(|i| entry(i, (i * 7 % 13) as f64, (i * 5 % 11) as f64, 1.0))
            .collect();
        let tree = QuadTree::build(&entries);

        assert_eq!(tree.len(), 50);
        assert_eq!(collect_items(&tree), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_coincident_entries_share_leaf() {
        let entries = [entry(0, 3.0, 3.0, 1.0), entry(1, 3.0, 3.0, 2.0), entry(2, 9.0, 9.0, 1.0)];
        let tree = QuadTree::build(&entries);

        let mut leaf_sizes = Vec::new();
        tree.visit(|quad| {
            if let Some(entries) = quad.entries {
                leaf_sizes.push(entries.len());
            }
            false
        });
        assert!(leaf_sizes.contains(&2));
        assert_eq!(collect_items(&tree), vec![0, 1, 2]);
    }

    #[test]
    fn test_max_radius_bottom_up() {
        let entries = [
            entry(0, 0.0, 0.0, 2.0),
            entry(1, 100.0, 0.0, 9.0),
            entry(2, 0.0, 100.0, 4.0),
            entry(3, 100.0, 100.0, 1.0),
        ];
        let tree = QuadTree::build(&entries);
        assert_eq!(tree.max_radius(), 9.0);

        // Every leaf's cached radius equals its entry radius, and every
        // region's cache is at least as large as any entry below it.
        tree.visit(|quad| {
            if let Some(entries) = quad.entries {
                let expected = entries.iter().map(|e| e.radius).fold(0.0, f64::max);
                assert_eq!(quad.max_radius, expected);
            }
            false
        });
    }

    #[test]
    fn test_pruning_skips_far_regions() {
        let mut entries = vec![entry(0, 0.0, 0.0, 1.0)];
        for i in 1..20 {
            entries.push(entry(i, 1000.0 + i as f64, 1000.0 + i as f64, 1.0));
        }
        let tree = QuadTree::build(&entries);

        let mut seen = Vec::new();
        tree.visit(|quad| {
            if let Some(entries) = quad.entries {
                seen.extend(entries.iter().map(|e| e.item));
                return false;
            }
            quad.bounds.outside(0.0, 0.0, 1.0 + quad.max_radius)
        });
        assert!(seen.contains(&0));
        assert!(seen.len() < 20);
    }

    #[test]
    fn test_nearby_points_split_until_separate() {
        let entries = [entry(0, 0.0, 0.0, 1.0), entry(1, 1e-6, 0.0, 1.0)];
        let tree = QuadTree::build(&entries);
        assert_eq!(collect_items(&tree), vec![0, 1]);
        assert!(tree.region_count() > 1);
    }

    #[test]
    fn test_bounds_outside() {
        let b = Bounds {
            x0: 10.0,
            y0: 10.0,
            x1: 20.0,
            y1: 20.0,
        };
        assert!(b.outside(0.0, 15.0, 5.0));
        assert!(!b.outside(0.0, 15.0, 10.0));
        assert!(b.outside(15.0, 30.0, 5.0));
        assert!(!b.outside(15.0, 15.0, 0.0));
    }
}
