//! Random-walk maze carving.
//!
//! The forward phase walks from the start, opening one orthogonal neighbour
//! per iteration and refusing any cell that would touch a second passage.
//! Dead ends are escaped by teleporting the cursor to a random open cell.
//! When the forward budget runs out before the finish is touched, the
//! reverse phase walks backwards from the finish until it touches the
//! network carved by the forward phase.

use crate::candidates::Candidates;
use crate::geometry::Coord;
use crate::grid::{make_passable, with_special, Grid, OutOfBoundsError, Special};
use crate::settings::CarveSettings;
use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarveError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBoundsError),

    #[error("start and finish are both {0}")]
    SameEndpoints(Coord),

    #[error("no reverse locations to backtrack to from {at}")]
    EmptyBacktrack { at: Coord },

    #[error("failed to reverse complete maze after {} reverse iterations", .stats.reverse_iterations)]
    Unsolved { stats: FillStats },
}

/// Which walk is extending the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Forward random walk from the start
    #[default]
    Carving,
    /// Backward walk from the finish towards the forward network
    Completing,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Phase::Carving => "Carving",
            Phase::Completing => "Completing",
        }
    }
}

/// What happened during a fill call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillStats {
    pub forward_iterations: usize,
    pub reverse_iterations: usize,
    /// Dead ends recovered by teleporting the forward cursor
    pub teleports: usize,
    /// Dead ends recovered by jumping back along the reverse path
    pub backtracks: usize,
    /// Phase the fill ended in
    pub phase: Phase,
    /// Every cell opened by the walks, in carving order
    pub carved: Vec<Coord>,
    /// `carved[..forward_carved]` were opened by the forward phase
    pub forward_carved: usize,
    /// Passable cells when the fill ended
    pub passable: usize,
}

impl FillStats {
    pub fn reversed(&self) -> bool {
        self.phase == Phase::Completing
    }

    pub fn forward_cells(&self) -> &[Coord] {
        &self.carved[..self.forward_carved]
    }

    pub fn reverse_cells(&self) -> &[Coord] {
        &self.carved[self.forward_carved..]
    }
}

/// Outcome of the candidate predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Reject,
    Accept,
    /// Accepted, and opening it touches the forward network
    Weld,
    /// The candidate connects the walk to the other endpoint
    Reached,
}

/// Maze generator driven by a seeded random walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkingCarver {
    pub seed: u64,
    pub settings: CarveSettings,
}

impl WalkingCarver {
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, CarveSettings::default())
    }

    pub fn with_settings(seed: u64, settings: CarveSettings) -> Self {
        Self { seed, settings }
    }

    /// Carve `grid` until `start` and `finish` are connected.
    ///
    /// On `Err(CarveError::Unsolved)` the grid keeps whatever was carved and
    /// must not be used as a maze. Bounds and endpoint errors are reported
    /// before the grid is touched.
    pub fn fill(&self, grid: &mut Grid, start: Coord, finish: Coord) -> Result<FillStats, CarveError> {
        grid.get(start)?;
        grid.get(finish)?;
        if start == finish {
            return Err(CarveError::SameEndpoints(start));
        }

        grid.update(make_passable, &[start, finish]);
        grid.update(with_special(Special::START), &[start]);
        grid.update(with_special(Special::FINISH), &[finish]);

        let forward_budget = self.settings.forward_budget(grid.len());
        let reverse_budget = self.settings.reverse_budget(grid.len());
        debug!(
            "Filling {} grid from {} to {} with seed {} (budget {})",
            grid.dims(),
            start,
            finish,
            self.seed,
            forward_budget
        );

        let run = Run::new(grid, start, finish, StdRng::seed_from_u64(self.seed));
        run.carve(forward_budget, reverse_budget)
    }
}

/// Transient state of one fill call
struct Run<'g> {
    grid: &'g mut Grid,
    start: Coord,
    finish: Coord,
    cur: Coord,
    reached: bool,
    phase: Phase,
    /// Cells of the backward walk, in visiting order
    reverse_locations: Vec<Coord>,
    /// Membership of `reverse_locations`, by grid index
    in_reverse: Vec<bool>,
    passable: usize,
    rng: StdRng,
    stats: FillStats,
}

impl<'g> Run<'g> {
    fn new(grid: &'g mut Grid, start: Coord, finish: Coord, rng: StdRng) -> Self {
        let passable = grid.passable_count();
        let in_reverse = vec![false; grid.len()];
        Self {
            grid,
            start,
            finish,
            cur: start,
            reached: false,
            phase: Phase::Carving,
            reverse_locations: Vec::new(),
            in_reverse,
            passable,
            rng,
            stats: FillStats::default(),
        }
    }

    fn carve(mut self, forward_budget: usize, reverse_budget: usize) -> Result<FillStats, CarveError> {
        let mut budget = forward_budget;
        while !self.reached {
            match self.phase {
                Phase::Carving => {
                    if budget == 0 {
                        info!("Max passes reached at {}, reverse completing", self.cur);
                        self.begin_reverse();
                        continue;
                    }
                    budget -= 1;
                    self.stats.forward_iterations += 1;
                    self.forward_step();
                }
                Phase::Completing => {
                    if self.stats.reverse_iterations >= reverse_budget {
                        self.finish_stats();
                        error!(
                            "Failed to reverse complete maze after {} reverse iterations",
                            self.stats.reverse_iterations
                        );
                        return Err(CarveError::Unsolved { stats: self.stats });
                    }
                    self.stats.reverse_iterations += 1;
                    self.reverse_step()?;
                }
            }
        }
        self.finish_stats();
        debug!(
            "Maze connected after {} forward and {} reverse iterations",
            self.stats.forward_iterations, self.stats.reverse_iterations
        );
        Ok(self.stats)
    }

    fn finish_stats(&mut self) {
        self.stats.phase = self.phase;
        self.stats.passable = self.passable;
    }

    fn is_passable(&self, c: Coord) -> bool {
        self.grid.at(c).passable
    }

    fn is_reverse(&self, c: Coord) -> bool {
        self.in_reverse[self.grid.idx(c)]
    }

    fn push_reverse(&mut self, c: Coord) {
        let i = self.grid.idx(c);
        if !self.in_reverse[i] {
            self.in_reverse[i] = true;
            self.reverse_locations.push(c);
        }
    }

    fn open(&mut self, c: Coord) {
        if !self.is_passable(c) {
            self.passable += 1;
        }
        self.grid.update(make_passable, &[c]);
        self.stats.carved.push(c);
        if self.phase == Phase::Carving {
            self.stats.forward_carved += 1;
        }
    }

    /// Filter the cursor's orthogonal neighbours through the predicate of
    /// the current phase. Returns the accepted cells, the weld subset, and
    /// whether a candidate reached the other endpoint.
    fn candidates(&self) -> (Vec<Coord>, Vec<Coord>, bool) {
        let cur = self.cur;
        let (orth, _) = self.grid.neighbors(cur);
        let mut cands = Candidates::new(orth);
        let mut welds = Vec::new();
        let mut reached = false;
        cands.filter(|c| match self.verdict(cur, c) {
            Verdict::Reject => false,
            Verdict::Accept => true,
            Verdict::Weld => {
                welds.push(c);
                true
            }
            Verdict::Reached => {
                reached = true;
                false
            }
        });
        (cands.into_accepted(), welds, reached)
    }

    fn verdict(&self, cur: Coord, c: Coord) -> Verdict {
        match self.phase {
            Phase::Carving => self.next_verdict(cur, c),
            Phase::Completing => self.previous_verdict(cur, c),
        }
    }

    /// Passable orthogonal neighbours of `c`, in `Grid::neighbors` order
    fn open_orthogonals(&self, c: Coord) -> impl Iterator<Item = Coord> {
        self.grid
            .rels_passable(c)
            .into_iter()
            .filter(|(t, _)| t.is_orthogonal())
            .map(|(_, cn)| cn)
    }

    /// Is `c` a possible next cell for the forward walk?
    fn next_verdict(&self, cur: Coord, c: Coord) -> Verdict {
        if c == self.finish {
            trace!("Cur {cur}: {c} is the finish");
            return Verdict::Reached;
        }
        if self.is_passable(c) {
            trace!("Cur {cur}: {c} already passable");
            return Verdict::Reject;
        }
        // the finish is the one passage a new cell may touch besides cur
        let touching = self.open_orthogonals(c).find(|&cn| cn != cur && cn != self.finish);
        if let Some(cn) = touching {
            trace!("Cur {cur}: {c} neighbours passable {cn}, would loop");
            return Verdict::Reject;
        }
        Verdict::Accept
    }

    /// Is `c` a possible previous cell for the backward walk?
    fn previous_verdict(&self, cur: Coord, c: Coord) -> Verdict {
        if self.is_passable(c) {
            if self.is_reverse(c) {
                trace!("Cur {cur}: {c} is on the reverse path");
                return Verdict::Reject;
            }
            trace!("Cur {cur}: {c} is passable and off the reverse path, maze solved");
            return Verdict::Reached;
        }
        // the first open neighbour other than cur decides
        let Some(cn) = self.open_orthogonals(c).find(|&cn| cn != cur) else {
            return Verdict::Accept;
        };
        if cn == self.finish && cur != self.finish {
            trace!("Cur {cur}: {c} leads back to the finish");
            return Verdict::Reject;
        }
        if self.is_reverse(cn) {
            trace!("Cur {cur}: {c} neighbours reverse location {cn}");
            return Verdict::Reject;
        }
        trace!("Cur {cur}: {c} neighbours {cn}, completes the maze");
        Verdict::Weld
    }

    fn forward_step(&mut self) {
        let (accepted, _, reached) = self.candidates();
        if reached {
            debug!("Reached the finish from {}", self.cur);
            self.reached = true;
            return;
        }
        if let Some(&next) = accepted.choose(&mut self.rng) {
            self.open(next);
            self.cur = next;
            return;
        }

        trace!("No candidates onward from {}", self.cur);
        let cur = self.cur;
        self.grid.update(with_special(Special::CREATE_END), &[cur]);
        if !self.teleport() {
            warn!("No open cell to backtrack to from {cur}, reverse completing early");
            self.begin_reverse();
        }
    }

    /// Move the cursor to a random open cell other than the cursor and the
    /// endpoints. Returns false when no such cell exists.
    fn teleport(&mut self) -> bool {
        // the forward walk ends as soon as the finish is a candidate
        debug_assert_ne!(self.cur, self.finish, "forward cursor on the finish");
        let excluded = if self.cur == self.start { 2 } else { 3 };
        if self.passable <= excluded {
            return false;
        }
        let len = self.grid.len();
        loop {
            let i = self.rng.gen_range(0..len);
            let c = self.grid.coord_of(i);
            if c != self.cur && c != self.start && c != self.finish && self.grid.at_index(i).passable {
                trace!("Backtracking to {c}");
                self.cur = c;
                self.stats.teleports += 1;
                return true;
            }
        }
    }

    fn begin_reverse(&mut self) {
        self.grid.update(with_special(Special::MAX_PASSES), &[self.cur]);
        self.phase = Phase::Completing;
        self.cur = self.finish;
        self.push_reverse(self.finish);
    }

    fn reverse_step(&mut self) -> Result<(), CarveError> {
        let (accepted, welds, reached) = self.candidates();
        if reached {
            debug!("Reverse walk joined the maze from {}", self.cur);
            self.reached = true;
            return Ok(());
        }
        let pool = if welds.is_empty() { &accepted } else { &welds };
        if let Some(&next) = pool.choose(&mut self.rng) {
            let cur = self.cur;
            self.open(next);
            self.grid.update(with_special(Special::REVERSE), &[next]);
            self.push_reverse(cur);
            self.cur = next;
            return Ok(());
        }

        if self.reverse_locations.is_empty() {
            return Err(CarveError::EmptyBacktrack { at: self.cur });
        }
        // a dead end of the backward walk is still part of it
        let last = self.cur;
        self.push_reverse(last);
        let pick = self.rng.gen_range(0..self.reverse_locations.len());
        self.cur = self.reverse_locations[pick];
        self.stats.backtracks += 1;
        trace!("No candidates backwards from {last}, going back to {}", self.cur);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dims;
    use crate::path::shortest_path;

    fn run_on(grid: &mut Grid, start: Coord, finish: Coord) -> Run<'_> {
        grid.update(make_passable, &[start, finish]);
        Run::new(grid, start, finish, StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_forward_rejects_cells_touching_passages() {
        // S . .
        // . . .
        // # . F     '#' is open
        let mut g = Grid::new(Dims::new(3, 3));
        g.update(make_passable, &[Coord::new(0, 2)]);
        let run = run_on(&mut g, Coord::new(0, 0), Coord::new(2, 2));
        let cur = Coord::new(0, 0);
        // (0,1) touches the open (0,2)
        assert_eq!(run.next_verdict(cur, Coord::new(0, 1)), Verdict::Reject);
        // (1,0) touches nothing but the cursor
        assert_eq!(run.next_verdict(cur, Coord::new(1, 0)), Verdict::Accept);
        // already open
        assert_eq!(run.next_verdict(Coord::new(1, 2), Coord::new(0, 2)), Verdict::Reject);
    }

    #[test]
    fn test_forward_finish_detection_and_doorway() {
        let mut g = Grid::new(Dims::new(3, 3));
        let run = run_on(&mut g, Coord::new(0, 0), Coord::new(2, 2));
        assert_eq!(run.next_verdict(Coord::new(2, 1), Coord::new(2, 2)), Verdict::Reached);
        // (2,1) borders the finish; the finish does not count as a loop
        assert_eq!(run.next_verdict(Coord::new(1, 1), Coord::new(2, 1)), Verdict::Accept);
    }

    #[test]
    fn test_reverse_verdicts() {
        // S # .
        // . . .
        // . . F
        let mut g = Grid::new(Dims::new(3, 3));
        g.update(make_passable, &[Coord::new(1, 0)]);
        let mut run = run_on(&mut g, Coord::new(0, 0), Coord::new(2, 2));
        run.phase = Phase::Completing;
        run.push_reverse(Coord::new(2, 2));
        let finish = Coord::new(2, 2);

        // (2,1)'s other neighbours: (1,1) closed, (2,0) closed
        assert_eq!(run.previous_verdict(finish, Coord::new(2, 1)), Verdict::Accept);
        // open and off the reverse path
        assert_eq!(run.previous_verdict(Coord::new(1, 1), Coord::new(1, 0)), Verdict::Reached);
        // the finish itself is on the reverse path
        assert_eq!(run.previous_verdict(Coord::new(2, 1), finish), Verdict::Reject);
        // (1,1) from (1,2): neighbours (0,1) closed, (1,0) open
        assert_eq!(run.previous_verdict(Coord::new(1, 2), Coord::new(1, 1)), Verdict::Weld);
        // (1,2) from (1,1) would lead straight back into the finish
        assert_eq!(run.previous_verdict(Coord::new(1, 1), Coord::new(1, 2)), Verdict::Reject);
    }

    #[test]
    fn test_reverse_rejects_cells_touching_reverse_path() {
        let mut g = Grid::new(Dims::new(4, 4));
        let mut run = run_on(&mut g, Coord::new(0, 0), Coord::new(3, 3));
        run.phase = Phase::Completing;
        run.push_reverse(Coord::new(3, 3));
        run.push_reverse(Coord::new(3, 2));
        run.grid.update(make_passable, &[Coord::new(3, 2), Coord::new(2, 2)]);
        // (2,1) only touches closed cells besides the cursor
        assert_eq!(run.previous_verdict(Coord::new(2, 2), Coord::new(2, 1)), Verdict::Accept);
        // (3,1) touches (3,2), a reverse location
        assert_eq!(run.previous_verdict(Coord::new(2, 1), Coord::new(3, 1)), Verdict::Reject);
    }

    #[test]
    fn test_invalid_endpoints() {
        let mut g = Grid::new(Dims::new(3, 3));
        let carver = WalkingCarver::new(7);
        let err = carver.fill(&mut g, Coord::new(0, 0), Coord::new(3, 0)).unwrap_err();
        assert!(matches!(err, CarveError::OutOfBounds(_)));
        let err = carver.fill(&mut g, Coord::new(1, 1), Coord::new(1, 1)).unwrap_err();
        assert_eq!(err, CarveError::SameEndpoints(Coord::new(1, 1)));
        // nothing was touched
        assert_eq!(g.passable_count(), 0);
    }

    #[test]
    fn test_two_by_two() {
        for seed in 0..20 {
            let mut g = Grid::new(Dims::new(2, 2));
            let stats = WalkingCarver::new(seed)
                .fill(&mut g, Coord::new(0, 0), Coord::new(1, 1))
                .unwrap();
            assert!(!stats.reversed());
            assert_eq!(stats.carved.len(), 1);
            assert!(shortest_path(&g, Coord::new(0, 0), Coord::new(1, 1)).is_some());
        }
    }

    #[test]
    fn test_adjacent_endpoints() {
        let mut g = Grid::new(Dims::new(4, 4));
        let stats = WalkingCarver::new(3)
            .fill(&mut g, Coord::new(1, 1), Coord::new(2, 1))
            .unwrap();
        assert_eq!(stats.forward_iterations, 1);
        assert!(stats.carved.is_empty());
        assert_eq!(g.passable_count(), 2);
    }

    #[test]
    fn test_single_row() {
        let mut g = Grid::new(Dims::new(6, 1));
        let stats = WalkingCarver::new(11)
            .fill(&mut g, Coord::new(0, 0), Coord::new(5, 0))
            .unwrap();
        assert_eq!(stats.passable, 6);
        assert!(g.iter().all(|l| l.passable));
    }

    #[test]
    fn test_zero_budget_goes_straight_to_reverse() {
        let mut g = Grid::new(Dims::new(5, 5));
        let settings = CarveSettings::default().with_max_passes(0);
        let result = WalkingCarver::with_settings(5, settings).fill(&mut g, Coord::new(0, 0), Coord::new(4, 4));
        assert!(g.at(Coord::new(0, 0)).is(Special::MAX_PASSES));
        assert_eq!(g.tagged(Special::MAX_PASSES).count(), 1);
        match result {
            Ok(stats) => {
                assert!(stats.reversed());
                assert_eq!(stats.forward_iterations, 0);
                assert_eq!(stats.forward_carved, 0);
                assert!(shortest_path(&g, Coord::new(0, 0), Coord::new(4, 4)).is_some());
            }
            Err(CarveError::Unsolved { stats }) => assert!(stats.reversed()),
            Err(other) => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_reverse_budget_exhaustion_is_reported() {
        let mut g = Grid::new(Dims::new(30, 30));
        let settings = CarveSettings {
            max_passes: Some(0),
            max_reverse_passes: Some(1),
            ..Default::default()
        };
        let err = WalkingCarver::with_settings(9, settings)
            .fill(&mut g, Coord::new(0, 0), Coord::new(29, 29))
            .unwrap_err();
        match err {
            CarveError::Unsolved { stats } => {
                assert_eq!(stats.reverse_iterations, 1);
                assert_eq!(stats.phase, Phase::Completing);
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(shortest_path(&g, Coord::new(0, 0), Coord::new(29, 29)).is_none());
    }

    #[test]
    fn test_teleport_refuses_when_nothing_is_open() {
        let mut g = Grid::new(Dims::new(3, 3));
        let mut run = run_on(&mut g, Coord::new(0, 0), Coord::new(2, 2));
        assert!(!run.teleport());
        run.open(Coord::new(1, 1));
        assert!(run.teleport());
        assert_eq!(run.cur, Coord::new(1, 1));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "forward cursor on the finish")]
    fn test_teleport_from_the_finish_panics() {
        let mut g = Grid::new(Dims::new(3, 3));
        let mut run = run_on(&mut g, Coord::new(0, 0), Coord::new(2, 2));
        run.open(Coord::new(1, 1));
        run.cur = Coord::new(2, 2);
        run.teleport();
    }

    #[test]
    fn test_diagonal_passages_do_not_count() {
        // S . .
        // . . #
        // . . F     '#' is open
        let mut g = Grid::new(Dims::new(3, 3));
        g.update(make_passable, &[Coord::new(2, 1)]);
        let run = run_on(&mut g, Coord::new(0, 0), Coord::new(2, 2));
        // (1,0) only touches (2,1) diagonally
        assert_eq!(run.next_verdict(Coord::new(0, 0), Coord::new(1, 0)), Verdict::Accept);
        // (1,1) touches it orthogonally
        assert_eq!(run.next_verdict(Coord::new(1, 0), Coord::new(1, 1)), Verdict::Reject);
    }

    #[test]
    fn test_reverse_locations_hold_each_cell_once() {
        let mut g = Grid::new(Dims::new(4, 4));
        let mut run = run_on(&mut g, Coord::new(0, 0), Coord::new(3, 3));
        run.begin_reverse();
        run.push_reverse(Coord::new(3, 3));
        run.push_reverse(Coord::new(3, 2));
        run.push_reverse(Coord::new(3, 2));
        assert_eq!(run.reverse_locations, vec![Coord::new(3, 3), Coord::new(3, 2)]);
        assert!(run.is_reverse(Coord::new(3, 2)));
        assert!(!run.is_reverse(Coord::new(2, 2)));
    }
}
