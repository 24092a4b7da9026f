//! Collision line graph.

use log::warn;

use crate::line::{CollisionLine, LineId, LineType, Link, Point};
use crate::raw::{RawCollisionItem, RawLink};

/// All collision lines of a path.
///
/// Lines live in fixed slots indexed by [`LineId`]; slot `i` holds input item
/// `i`. The sorted order is kept in a separate list, so reordering never
/// invalidates a link.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CollisionLines {
    lines: Vec<CollisionLine>,
    order: Vec<LineId>,
}

impl CollisionLines {
    /// Build the graph from raw items.
    ///
    /// Links are resolved once every line exists, lines are ordered so that
    /// chain ends come first, and track lines are snapped onto their next
    /// line's start.
    pub fn build(items: &[RawCollisionItem]) -> Self {
        let mut lines: Vec<CollisionLine> = items
            .iter()
            .map(|item| CollisionLine {
                p1: Point::new(item.p1.0 as f32, item.p1.1 as f32),
                p2: Point::new(item.p2.0 as f32, item.p2.1 as f32),
                line_type: LineType::from_raw(item.line_type),
                link: Link::default(),
                optional_link: Link::default(),
            })
            .collect();

        let count = lines.len();
        for (line, item) in lines.iter_mut().zip(items) {
            line.link = resolve_link(item.links[0], count);
            line.optional_link = resolve_link(item.links[1], count);
        }

        let mut order: Vec<LineId> = (0..count).map(LineId).collect();
        // Stable: equal keys keep input order
        order.sort_by_key(|id| {
            let link = lines[id.0].link;
            (link.next.is_some(), link.previous.is_some())
        });

        for i in 0..count {
            if lines[i].line_type != LineType::TrackLine {
                continue;
            }
            if let Some(next) = lines[i].link.next {
                let start = lines[next.0].p1;
                lines[i].p2 = start;
            }
        }

        Self { lines, order }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn get(&self, id: LineId) -> Option<&CollisionLine> {
        self.lines.get(id.0)
    }

    /// Lines in slot (input) order.
    #[inline]
    pub fn lines(&self) -> &[CollisionLine] {
        &self.lines
    }

    /// Ids in sorted order.
    #[inline]
    pub fn order(&self) -> &[LineId] {
        &self.order
    }

    /// Lines in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &CollisionLine)> {
        self.order.iter().map(move |&id| (id, &self.lines[id.0]))
    }

    /// Follow next links from `start`.
    ///
    /// Stops at a line without a next link or when a line would be visited a
    /// second time, so looping chains terminate.
    pub fn trace(&self, start: LineId) -> Vec<LineId> {
        let mut visited = vec![false; self.lines.len()];
        let mut chain = Vec::new();
        let mut current = Some(start);

        while let Some(id) = current {
            match visited.get_mut(id.0) {
                Some(seen) if !*seen => *seen = true,
                _ => break,
            }
            chain.push(id);
            current = self.lines[id.0].link.next;
        }

        chain
    }
}

fn resolve_link(raw: RawLink, count: usize) -> Link {
    Link {
        previous: resolve_index(raw.previous, count),
        next: resolve_index(raw.next, count),
    }
}

/// Index 0 and negatives are "no link" sentinels.
fn resolve_index(index: i16, count: usize) -> Option<LineId> {
    if index <= 0 {
        return None;
    }
    let index = index as usize;
    if index >= count {
        warn!("collision link {index} out of range for {count} lines");
        return None;
    }
    Some(LineId(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(p1: (i16, i16), p2: (i16, i16), line_type: u16, previous: i16, next: i16) -> RawCollisionItem {
        RawCollisionItem {
            p1,
            p2,
            line_type,
            links: [
                RawLink { previous, next },
                RawLink {
                    previous: -1,
                    next: -1,
                },
            ],
            length: 0,
        }
    }

    /// Slot 0 is a lone floor so the chain can use positive indices.
    fn chain() -> Vec<RawCollisionItem> {
        vec![
            item((0, 100), (50, 100), 0, -1, -1),
            // A
            item((0, 0), (10, 0), 8, -1, 2),
            // B, starts slightly off A's end
            item((11, 1), (20, 0), 8, 1, 3),
            // C
            item((21, 0), (30, 0), 8, 2, -1),
        ]
    }

    #[test]
    fn test_trace_visits_chain_once() {
        let lines = CollisionLines::build(&chain());
        let path = lines.trace(LineId(1));
        assert_eq!(path, vec![LineId(1), LineId(2), LineId(3)]);
    }

    #[test]
    fn test_trace_stops_on_loop() {
        let items = vec![
            item((0, 0), (1, 0), 0, -1, -1),
            item((0, 0), (1, 0), 0, 2, 2),
            item((1, 0), (2, 0), 0, 1, 1),
        ];
        let lines = CollisionLines::build(&items);
        assert_eq!(lines.trace(LineId(1)), vec![LineId(1), LineId(2)]);
    }

    #[test]
    fn test_order_puts_chain_ends_first() {
        let lines = CollisionLines::build(&chain());
        // Unlinked, then previous-only (C), then next-only (A), then both (B).
        assert_eq!(
            lines.order(),
            &[LineId(0), LineId(3), LineId(1), LineId(2)]
        );

        let both = lines.order().iter().position(|&id| id == LineId(2)).unwrap();
        let none = lines.order().iter().position(|&id| id == LineId(0)).unwrap();
        assert!(none < both);
    }

    #[test]
    fn test_track_lines_snap_to_next() {
        let lines = CollisionLines::build(&chain());
        let a = lines.get(LineId(1)).unwrap();
        let b = lines.get(LineId(2)).unwrap();
        let c = lines.get(LineId(3)).unwrap();

        assert_eq!(a.p2, b.p1);
        assert_eq!(b.p2, c.p1);
        // Last line of the chain is untouched.
        assert_eq!(c.p2, Point::new(30.0, 0.0));
    }

    #[test]
    fn test_non_track_lines_keep_endpoints() {
        let items = vec![
            item((0, 0), (1, 0), 0, -1, -1),
            item((0, 0), (5, 5), 1, -1, 2),
            item((9, 9), (10, 10), 1, 1, -1),
        ];
        let lines = CollisionLines::build(&items);
        assert_eq!(lines.get(LineId(1)).unwrap().p2, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_out_of_range_links_are_dropped() {
        let items = vec![item((0, 0), (1, 0), 8, 7, 1), item((0, 0), (1, 0), 0, 0, 300)];
        let lines = CollisionLines::build(&items);

        let first = lines.get(LineId(0)).unwrap();
        assert_eq!(first.link.previous, None);
        assert_eq!(first.link.next, Some(LineId(1)));

        let second = lines.get(LineId(1)).unwrap();
        assert_eq!(second.link, Link::default());
        assert_eq!(second.optional_link, Link::default());
    }
}
