use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::fs;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

use crate::common::{Direction, Position, Solution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Open,
    Start,
    Goal,
    Adversary,
}

impl CellKind {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '%' => Some(CellKind::Wall),
            ' ' | 'g' => Some(CellKind::Open),
            'P' => Some(CellKind::Start),
            '.' => Some(CellKind::Goal),
            'G' => Some(CellKind::Adversary),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CellKind::Wall => '%',
            CellKind::Open => ' ',
            CellKind::Start => 'P',
            CellKind::Goal => '.',
            CellKind::Adversary => 'G',
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    kind: CellKind,
    pub neighbors: Vec<(Direction, Position)>, // Walkable neighbours, in `Direction::ALL` order
}

impl Tile {
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_walkable(&self) -> bool {
        self.kind != CellKind::Wall
    }
}

#[derive(Debug, Clone)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
    start: Position,
    goals: Vec<Position>,
    adversary: Option<Position>,
}

impl Map {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("cannot read maze {path}"))?;
        text.parse::<Map>()
            .with_context(|| format!("error with maze file: {path}"))
    }

    fn initialize_neighbors(&mut self) {
        for row in 0..self.height {
            for col in 0..self.width {
                if self.grid[row][col].is_walkable() {
                    self.grid[row][col].neighbors = self.get_neighbors(Position::new(row, col));
                }
            }
        }
    }

    fn get_neighbors(&self, position: Position) -> Vec<(Direction, Position)> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                position
                    .step(direction)
                    .filter(|next| self.is_walkable(*next))
                    .map(|next| (direction, next))
            })
            .collect()
    }

    /// Walkable neighbours of `position` in Up, Down, Left, Right order.
    pub fn neighbors(&self, position: Position) -> &[(Direction, Position)] {
        match self.tile(position) {
            Some(tile) => &tile.neighbors,
            None => &[],
        }
    }

    fn tile(&self, position: Position) -> Option<&Tile> {
        self.grid.get(position.row)?.get(position.col)
    }

    /// Cells outside the grid read as walls.
    pub fn cell_kind(&self, position: Position) -> CellKind {
        self.tile(position).map_or(CellKind::Wall, Tile::kind)
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.cell_kind(position) != CellKind::Wall
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Goal cells in row-major order.
    pub fn goals(&self) -> &[Position] {
        &self.goals
    }

    pub fn adversary(&self) -> Option<Position> {
        self.adversary
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
            .filter(|position| self.is_walkable(*position))
    }

    /// Exact unit-cost distance from `source` to every cell; unreachable
    /// cells hold `usize::MAX`.
    pub fn distance_field(&self, source: Position) -> Vec<Vec<usize>> {
        let mut distance = vec![vec![usize::MAX; self.width]; self.height];
        if !self.is_walkable(source) {
            return distance;
        }
        let mut heap = BinaryHeap::new();

        distance[source.row][source.col] = 0;
        heap.push((Reverse(0), source));

        while let Some((Reverse(cost), position)) = heap.pop() {
            if cost > distance[position.row][position.col] {
                continue;
            }

            for &(_, next) in self.neighbors(position) {
                let next_cost = cost + 1;
                if next_cost < distance[next.row][next.col] {
                    heap.push((Reverse(next_cost), next));
                    distance[next.row][next.col] = next_cost;
                }
            }
        }

        distance
    }
}

impl FromStr for Map {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();
        let height = lines.len();
        let width = lines.first().map_or(0, |line| line.chars().count());
        if height < 3 || width < 3 {
            bail!("maze must be at least 3x3, got {height}x{width}");
        }

        let mut grid = Vec::with_capacity(height);
        let mut starts = Vec::new();
        let mut goals = Vec::new();
        let mut adversaries = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let mut tiles = Vec::with_capacity(width);
            for (col, symbol) in line.chars().enumerate() {
                let kind = CellKind::from_symbol(symbol)
                    .ok_or_else(|| anyhow!("unknown symbol {symbol:?} at ({row}, {col})"))?;
                let position = Position::new(row, col);
                match kind {
                    CellKind::Start => starts.push(position),
                    CellKind::Goal => goals.push(position),
                    CellKind::Adversary => adversaries.push(position),
                    CellKind::Wall | CellKind::Open => {}
                }
                let border = row == 0 || col == 0 || row == height - 1 || col == width - 1;
                if border && kind != CellKind::Wall {
                    bail!("maze border is open at ({row}, {col})");
                }
                tiles.push(Tile {
                    kind,
                    neighbors: Vec::new(),
                });
            }
            if tiles.len() != width {
                bail!("row {row} has {} cells, expected {width}", tiles.len());
            }
            grid.push(tiles);
        }

        let start = match starts.as_slice() {
            [start] => *start,
            _ => bail!("maze needs exactly one start, found {}", starts.len()),
        };
        if goals.is_empty() {
            bail!("maze has no goal cell");
        }
        if adversaries.len() > 1 {
            bail!("maze has {} adversaries, at most one is supported", adversaries.len());
        }

        let mut map = Map {
            height,
            width,
            grid,
            start,
            goals,
            adversary: adversaries.first().copied(),
        };
        map.initialize_neighbors();

        Ok(map)
    }
}

/// Character copy of a maze that a solution is drawn onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    cells: Vec<Vec<char>>,
}

impl Overlay {
    const PATH_MARKER: char = '.';

    pub fn new(map: &Map) -> Self {
        let cells = map
            .grid
            .iter()
            .map(|row| row.iter().map(|tile| tile.kind().symbol()).collect())
            .collect();
        Overlay { cells }
    }

    pub fn get(&self, position: Position) -> Option<char> {
        self.cells.get(position.row)?.get(position.col).copied()
    }

    /// Stamps every path cell that is not a start or goal marker, then labels
    /// goals with their visit order when there are several of them.
    pub fn stamp(&mut self, map: &Map, solution: &Solution) {
        for &position in &solution.path {
            if matches!(map.cell_kind(position), CellKind::Open | CellKind::Adversary) {
                self.cells[position.row][position.col] = Self::PATH_MARKER;
            }
        }

        if solution.visit_order.len() > 1 {
            for (index, goal) in solution.visit_order.iter().enumerate() {
                self.cells[goal.row][goal.col] = order_label(index);
            }
        }
    }
}

// 1-9, then a-z, then A-Z, wrapping around.
fn order_label(index: usize) -> char {
    const LABELS: &[u8] = b"123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    LABELS[index % LABELS.len()] as char
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row.iter().collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
