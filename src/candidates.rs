use crate::geometry::Coord;

/// A list of candidate coordinates and the subset that survived the last
/// `filter` call.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    cand: Vec<Coord>,
    dest: Vec<Coord>,
}

impl Candidates {
    pub fn new(cand: impl IntoIterator<Item = Coord>) -> Self {
        Self {
            cand: cand.into_iter().collect(),
            dest: Vec::new(),
        }
    }

    /// Replace the accepted list with every candidate for which `keep`
    /// returns true, in candidate order. The predicate sees every candidate,
    /// so predicates with side effects run exactly once per candidate.
    pub fn filter<F: FnMut(Coord) -> bool>(&mut self, mut keep: F) -> &[Coord] {
        self.dest.clear();
        for &c in &self.cand {
            if keep(c) {
                self.dest.push(c);
            }
        }
        &self.dest
    }

    pub fn candidates(&self) -> &[Coord] {
        &self.cand
    }

    pub fn accepted(&self) -> &[Coord] {
        &self.dest
    }

    pub fn into_accepted(self) -> Vec<Coord> {
        self.dest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_order() {
        let mut cc = Candidates::new([Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)]);
        let kept = cc.filter(|c| c.x != 1);
        assert_eq!(kept, &[Coord::new(0, 0), Coord::new(2, 0)]);
        assert_eq!(cc.candidates().len(), 3);
    }

    #[test]
    fn test_filter_replaces_previous_result() {
        let mut cc = Candidates::new([Coord::new(0, 0), Coord::new(1, 0)]);
        cc.filter(|_| true);
        assert_eq!(cc.accepted().len(), 2);
        cc.filter(|_| false);
        assert!(cc.accepted().is_empty());
    }

    #[test]
    fn test_predicate_sees_every_candidate() {
        let mut seen = 0;
        let mut cc = Candidates::new([Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)]);
        cc.filter(|_| {
            seen += 1;
            false
        });
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_empty_candidates() {
        let mut cc = Candidates::default();
        assert!(cc.filter(|_| true).is_empty());
        assert!(cc.into_accepted().is_empty());
    }
}
