//! Board representation and the group/liberty engine.
//!
//! The board is a flat array of [`Color`] with `DIM * DIM` entries, indexed
//! row-major: `index = x * DIM + y`. Groups and liberties are derived on
//! demand with an iterative flood fill; nothing is cached between queries.
//!
//! Stones are never removed. A group reaching zero liberties ends the game
//! instead of being captured, so game-over and the winner are pure functions
//! of the current fields.

use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{DIM, FIELDS};

/// A field on the board, represented as an index into the flat array.
pub type Field = usize;

/// Content of a field, doubling as the color of a player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
    #[default]
    Empty,
}

impl Color {
    /// The opposing color. `Empty` stays `Empty`.
    #[inline]
    pub fn other(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Empty => Color::Empty,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Color::Empty
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Black => "Black",
            Color::White => "White",
            Color::Empty => "Empty",
        };
        f.write_str(name)
    }
}

/// Orthogonal neighbors of a field, clipped at the board edge.
pub fn neighbors(field: Field) -> impl Iterator<Item = Field> {
    debug_assert!(field < FIELDS, "field {field} out of range");
    let x = field / DIM;
    let y = field % DIM;
    [
        (x > 0).then(|| field - DIM),
        (x + 1 < DIM).then(|| field + DIM),
        (y > 0).then(|| field - 1),
        (y + 1 < DIM).then(|| field + 1),
    ]
    .into_iter()
    .flatten()
}

/// A Go board of fixed size.
///
/// `Clone` is the deep copy: the fields live inline, so a cloned board shares
/// nothing with the original.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    fields: [Color; FIELDS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An all-empty board.
    pub fn new() -> Self {
        Self {
            fields: [Color::Empty; FIELDS],
        }
    }

    /// The symmetric four-stone opening around the center.
    ///
    /// With `c = (DIM - 1) / 2`, Black holds `(c, c)` and `(c-1, c-1)`,
    /// White holds `(c-1, c)` and `(c, c-1)`. Stone counts are equal, so
    /// Black moves first.
    pub fn with_center_stones() -> Self {
        let c = (DIM - 1) / 2;
        let mut board = Self::new();
        board.set_field(Self::index_of(c, c), Color::Black);
        board.set_field(Self::index_of(c - 1, c), Color::White);
        board.set_field(Self::index_of(c - 1, c - 1), Color::Black);
        board.set_field(Self::index_of(c, c - 1), Color::White);
        board
    }

    /// Independent copy of this board.
    #[inline]
    pub fn deep_copy(&self) -> Board {
        self.clone()
    }

    #[inline]
    pub fn index_of(x: usize, y: usize) -> Field {
        x * DIM + y
    }

    #[inline]
    pub fn row(field: Field) -> usize {
        field / DIM
    }

    #[inline]
    pub fn col(field: Field) -> usize {
        field % DIM
    }

    #[inline]
    pub fn is_valid_field(field: Field) -> bool {
        field < FIELDS
    }

    #[inline]
    pub fn is_valid_xy(x: usize, y: usize) -> bool {
        x < DIM && y < DIM
    }

    #[inline]
    pub fn get(&self, field: Field) -> Color {
        self.fields[field]
    }

    #[inline]
    pub fn set_field(&mut self, field: Field, color: Color) {
        self.fields[field] = color;
    }

    #[inline]
    pub fn is_empty(&self, field: Field) -> bool {
        self.fields[field].is_empty()
    }

    /// All fields holding `color`, ascending.
    pub fn fields(&self, color: Color) -> Vec<Field> {
        (0..FIELDS).filter(|&f| self.fields[f] == color).collect()
    }

    /// All occupied fields, ascending.
    pub fn stones(&self) -> Vec<Field> {
        (0..FIELDS).filter(|&f| !self.is_empty(f)).collect()
    }

    pub fn count(&self, color: Color) -> usize {
        self.fields.iter().filter(|&&c| c == color).count()
    }

    /// Color to move, derived from stone parity.
    ///
    /// Every move adds exactly one stone and none is ever removed, so Black
    /// is to move exactly when both colors have the same number of stones.
    pub fn turn(&self) -> Color {
        if self.count(Color::Black) == self.count(Color::White) {
            Color::Black
        } else {
            Color::White
        }
    }

    /// The connected group containing `field`.
    ///
    /// # Panics
    /// If `field` is empty or out of range. Use [`Board::try_group`] for
    /// unchecked input.
    pub fn group(&self, field: Field) -> BTreeSet<Field> {
        assert!(
            !self.is_empty(field),
            "group queried at empty field {field}"
        );
        self.flood_fill(field)
    }

    /// Checked form of [`Board::group`].
    pub fn try_group(&self, field: Field) -> Option<BTreeSet<Field>> {
        (Self::is_valid_field(field) && !self.is_empty(field)).then(|| self.flood_fill(field))
    }

    /// Flood fill over same-colored neighbors with an explicit stack.
    fn flood_fill(&self, start: Field) -> BTreeSet<Field> {
        let color = self.fields[start];
        let mut visited = [false; FIELDS];
        let mut stack = vec![start];
        let mut group = BTreeSet::new();
        visited[start] = true;

        while let Some(f) = stack.pop() {
            group.insert(f);
            for n in neighbors(f) {
                if !visited[n] && self.fields[n] == color {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }
        group
    }

    /// Empty fields adjacent to a single field.
    pub fn field_liberties(&self, field: Field) -> BTreeSet<Field> {
        neighbors(field).filter(|&n| self.is_empty(n)).collect()
    }

    /// Empty fields adjacent to any member of `group`, without duplicates.
    pub fn liberties(&self, group: &BTreeSet<Field>) -> BTreeSet<Field> {
        group
            .iter()
            .flat_map(|&f| neighbors(f))
            .filter(|&n| self.is_empty(n))
            .collect()
    }

    /// Liberties of the group containing `field`.
    pub fn group_liberties(&self, field: Field) -> BTreeSet<Field> {
        self.liberties(&self.group(field))
    }

    /// Fields adjacent to `group` that are not members of it.
    pub fn neighbors_of_group(&self, group: &BTreeSet<Field>) -> BTreeSet<Field> {
        group
            .iter()
            .flat_map(|&f| neighbors(f))
            .filter(|n| !group.contains(n))
            .collect()
    }

    /// Every group of `color`, each reported once, ordered by lowest member.
    pub fn groups(&self, color: Color) -> Vec<BTreeSet<Field>> {
        let mut seen = [false; FIELDS];
        let mut groups = Vec::new();
        for f in 0..FIELDS {
            if seen[f] || self.fields[f] != color {
                continue;
            }
            let group = self.flood_fill(f);
            for &member in &group {
                seen[member] = true;
            }
            groups.push(group);
        }
        groups
    }

    /// Lowest-indexed stone whose group has no liberties.
    ///
    /// Scans fields in ascending order. Members of groups already found alive
    /// are skipped since they share the group's liberties.
    pub fn dead_field(&self) -> Option<Field> {
        let mut seen = [false; FIELDS];
        for f in 0..FIELDS {
            if seen[f] || self.is_empty(f) {
                continue;
            }
            let group = self.flood_fill(f);
            if self.liberties(&group).is_empty() {
                return Some(f);
            }
            for &member in &group {
                seen[member] = true;
            }
        }
        None
    }

    /// True as soon as any group has zero liberties.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.dead_field().is_some()
    }

    /// Winner of a finished game: the opponent of the first dead group in
    /// field order. `None` while the game is still running.
    pub fn winner(&self) -> Option<Color> {
        self.dead_field().map(|f| self.fields[f].other())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for y in 0..DIM {
            write!(f, "{y} ")?;
        }
        writeln!(f)?;
        for x in 0..DIM {
            write!(f, "{x:>2} ")?;
            for y in 0..DIM {
                let ch = match self.fields[Self::index_of(x, y)] {
                    Color::Black => 'X',
                    Color::White => 'O',
                    Color::Empty => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(black: &[Field], white: &[Field]) -> Board {
        let mut board = Board::new();
        for &f in black {
            board.set_field(f, Color::Black);
        }
        for &f in white {
            board.set_field(f, Color::White);
        }
        board
    }

    #[test]
    fn test_color_other() {
        assert_eq!(Color::Black.other(), Color::White);
        assert_eq!(Color::White.other(), Color::Black);
        assert_eq!(Color::Empty.other(), Color::Empty);
    }

    #[test]
    fn test_index_roundtrip() {
        for x in 0..DIM {
            for y in 0..DIM {
                let f = Board::index_of(x, y);
                assert_eq!(Board::row(f), x);
                assert_eq!(Board::col(f), y);
            }
        }
        assert!(!Board::is_valid_field(FIELDS));
        assert!(!Board::is_valid_xy(DIM, 0));
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let corner: Vec<_> = neighbors(0).collect();
        assert_eq!(corner.len(), 2);
        assert!(corner.contains(&1) && corner.contains(&DIM));

        // Right edge of the first row must not wrap to the next row.
        let edge: BTreeSet<_> = neighbors(DIM - 1).collect();
        assert_eq!(edge, BTreeSet::from([DIM - 2, 2 * DIM - 1]));

        let center = Board::index_of(DIM / 2, DIM / 2);
        assert_eq!(neighbors(center).count(), 4);
    }

    #[test]
    fn test_group_is_maximal_and_single_colored() {
        // L-shaped black group plus a detached black stone.
        let board = board_with(&[0, 1, DIM + 1, 3], &[2, DIM]);
        let group = board.group(0);
        assert_eq!(group, BTreeSet::from([0, 1, DIM + 1]));
        for &f in &group {
            assert_eq!(board.get(f), Color::Black);
            for n in neighbors(f) {
                if board.get(n) == Color::Black {
                    assert!(group.contains(&n));
                }
            }
        }
        assert_eq!(board.group(3), BTreeSet::from([3]));
    }

    #[test]
    #[should_panic]
    fn test_group_of_empty_field_panics() {
        Board::new().group(0);
    }

    #[test]
    fn test_try_group_rejects_empty_and_out_of_range() {
        let board = board_with(&[5], &[]);
        assert!(board.try_group(4).is_none());
        assert!(board.try_group(FIELDS).is_none());
        assert_eq!(board.try_group(5), Some(BTreeSet::from([5])));
    }

    #[test]
    fn test_liberties_have_no_duplicates() {
        // Two stones sharing the liberty at DIM + 1.
        let board = board_with(&[1, DIM, 0], &[]);
        let libs = board.group_liberties(0);
        assert_eq!(libs, BTreeSet::from([2, DIM + 1, 2 * DIM]));
        assert_eq!(board.field_liberties(0).len(), 0);
    }

    #[test]
    fn test_neighbors_of_group_excludes_members() {
        let board = board_with(&[0, 1], &[]);
        let group = board.group(0);
        assert_eq!(
            board.neighbors_of_group(&group),
            BTreeSet::from([2, DIM, DIM + 1])
        );
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let original = board_with(&[3], &[4]);
        let mut copy = original.deep_copy();
        assert_eq!(copy, original);
        copy.set_field(10, Color::Black);
        assert!(original.is_empty(10));

        let mut original = original;
        original.set_field(11, Color::White);
        assert!(copy.is_empty(11));
    }

    #[test]
    fn test_center_stones() {
        let board = Board::with_center_stones();
        let c = (DIM - 1) / 2;
        assert_eq!(board.get(Board::index_of(c, c)), Color::Black);
        assert_eq!(board.get(Board::index_of(c - 1, c - 1)), Color::Black);
        assert_eq!(board.get(Board::index_of(c - 1, c)), Color::White);
        assert_eq!(board.get(Board::index_of(c, c - 1)), Color::White);
        assert_eq!(board.stones().len(), 4);
        assert_eq!(board.turn(), Color::Black);
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_turn_from_parity() {
        let mut board = Board::new();
        assert_eq!(board.turn(), Color::Black);
        board.set_field(0, Color::Black);
        assert_eq!(board.turn(), Color::White);
        board.set_field(1, Color::White);
        assert_eq!(board.turn(), Color::Black);
    }

    #[test]
    fn test_groups_reported_once() {
        let board = board_with(&[0, 1, 5, 6], &[3]);
        let groups = board.groups(Color::Black);
        assert_eq!(groups, vec![BTreeSet::from([0, 1]), BTreeSet::from([5, 6])]);
        assert_eq!(board.groups(Color::White).len(), 1);
    }

    #[test]
    fn test_game_over_and_winner() {
        // White corner stone surrounded by black.
        let board = board_with(&[1, DIM], &[0]);
        assert!(board.is_game_over());
        assert_eq!(board.dead_field(), Some(0));
        assert_eq!(board.winner(), Some(Color::Black));

        let alive = board_with(&[1], &[0]);
        assert!(!alive.is_game_over());
        assert_eq!(alive.winner(), None);
        // Idempotent without mutation.
        assert_eq!(alive.is_game_over(), alive.is_game_over());
    }

    #[test]
    fn test_winner_uses_lowest_dead_group() {
        // Both a black group (at 0) and a white group (at 2) are dead; the
        // lower index decides.
        let mut board = Board::new();
        board.set_field(0, Color::Black);
        board.set_field(1, Color::White);
        board.set_field(DIM, Color::White);
        board.set_field(2, Color::Black);
        board.set_field(3, Color::White);
        board.set_field(DIM + 2, Color::White);
        board.set_field(DIM + 1, Color::White);
        assert_eq!(board.dead_field(), Some(0));
        assert_eq!(board.winner(), Some(Color::White));
    }

    #[test]
    fn test_display_labels() {
        let board = board_with(&[0], &[1]);
        let s = board.to_string();
        let first_row = s.lines().nth(1).unwrap_or_default();
        assert!(first_row.starts_with(" 0 X O ."));
    }
}
