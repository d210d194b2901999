//! Board module - stacked tile layers and the board generator
//!
//! A board is an ordered list of square layers. Layer `0` is the innermost
//! (played last); the highest index is the outermost and is active right after
//! generation.

use thiserror::Error;

use crate::rng::{NotePool, SimpleRng};
use crate::types::{Difficulty, NoteId, TileId, LAYER_HEIGHT_STEP, NOTE_POOL_SIZE, TILE_SPACING};

/// Single tile on a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub layer_index: u8,
    /// Scene placement `[x, y, z]`; informational only.
    pub position: [f32; 3],
    pub note: NoteId,
    pub flipped: bool,
    pub matched: bool,
    pub active: bool,
}

/// One N×N grid of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub index: u8,
    pub grid_size: u8,
    /// Row-major, exactly `grid_size²` tiles.
    pub tiles: Vec<Tile>,
    pub active: bool,
    pub cleared: bool,
}

impl Layer {
    pub fn tile(&self, row: u8, col: u8) -> Option<&Tile> {
        if row >= self.grid_size || col >= self.grid_size {
            return None;
        }
        self.tiles
            .get(row as usize * self.grid_size as usize + col as usize)
    }

    pub fn all_matched(&self) -> bool {
        self.tiles.iter().all(|t| t.matched)
    }

    pub fn matched_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.matched).count()
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        for tile in &mut self.tiles {
            tile.active = active;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board needs at least one layer")]
    NoLayers,
    #[error("too many layers: {0}")]
    TooManyLayers(usize),
    #[error("layer {index}: grid size {size} has an odd or zero cell count")]
    UnpairableLayer { index: usize, size: u8 },
    #[error("layer {index}: {pairs} pairs exceed the note pool of {pool}")]
    PoolExhausted {
        index: usize,
        pairs: usize,
        pool: usize,
    },
}

/// Stacked layers for one game session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    layers: Vec<Layer>,
}

impl Board {
    /// Empty board (no session).
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Generate the layout for a difficulty.
    pub fn generate(difficulty: Difficulty, rng: &mut SimpleRng) -> Self {
        match Self::generate_with_sizes(difficulty.layer_sizes(), rng) {
            Ok(board) => board,
            // Difficulty layouts are validated by the types crate tests.
            Err(err) => unreachable!("difficulty {:?}: {}", difficulty, err),
        }
    }

    /// Generate a board from explicit grid sizes (index `i` is layer `i`).
    ///
    /// The last layer is activated.
    pub fn generate_with_sizes(sizes: &[u8], rng: &mut SimpleRng) -> Result<Self, BoardError> {
        if sizes.is_empty() {
            return Err(BoardError::NoLayers);
        }
        if sizes.len() > u8::MAX as usize {
            return Err(BoardError::TooManyLayers(sizes.len()));
        }
        for (index, &size) in sizes.iter().enumerate() {
            let cells = size as usize * size as usize;
            if cells == 0 || cells % 2 != 0 {
                return Err(BoardError::UnpairableLayer { index, size });
            }
            if cells / 2 > NOTE_POOL_SIZE {
                return Err(BoardError::PoolExhausted {
                    index,
                    pairs: cells / 2,
                    pool: NOTE_POOL_SIZE,
                });
            }
        }

        let mut layers = Vec::with_capacity(sizes.len());
        for (index, &size) in sizes.iter().enumerate() {
            layers.push(generate_layer(index as u8, size, rng)?);
        }

        if let Some(top) = layers.last_mut() {
            top.set_active(true);
        }

        Ok(Self { layers })
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Index of the outermost layer, the one played first.
    pub fn top_index(&self) -> Option<usize> {
        self.layers.len().checked_sub(1)
    }

    /// Index of the active layer, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.layers.iter().position(|l| l.active)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.layers
            .get(id.layer as usize)?
            .tiles
            .get(id.index as usize)
            .filter(|t| t.id == id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.layers
            .get_mut(id.layer as usize)?
            .tiles
            .get_mut(id.index as usize)
            .filter(|t| t.id == id)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.layers.iter().flat_map(|l| l.tiles.iter())
    }

    /// Mark a layer cleared and deactivate it with all of its tiles.
    ///
    /// Returns false if the layer does not exist or is already cleared.
    pub(crate) fn mark_cleared(&mut self, index: usize) -> bool {
        let Some(layer) = self.layers.get_mut(index) else {
            return false;
        };
        if layer.cleared {
            return false;
        }
        layer.cleared = true;
        layer.set_active(false);
        true
    }

    /// Activate a layer and all of its tiles.
    pub(crate) fn activate(&mut self, index: usize) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) if !layer.cleared => {
                layer.set_active(true);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }
}

fn generate_layer(index: u8, size: u8, rng: &mut SimpleRng) -> Result<Layer, BoardError> {
    let total = size as usize * size as usize;
    let pairs = total / 2;

    let mut pool = NotePool::new();
    let notes = pool
        .draw_pairs(pairs, rng)
        .ok_or(BoardError::PoolExhausted {
            index: index as usize,
            pairs,
            pool: pool.remaining(),
        })?;

    let offset = (size as f32 - 1.0) / 2.0;
    let y = index as f32 * LAYER_HEIGHT_STEP;

    let mut tiles = Vec::with_capacity(total);
    for row in 0..size {
        for col in 0..size {
            let tile_index = row as usize * size as usize + col as usize;
            tiles.push(Tile {
                id: TileId::new(index, tile_index as u16),
                layer_index: index,
                position: [
                    (col as f32 - offset) * TILE_SPACING,
                    y,
                    (row as f32 - offset) * TILE_SPACING,
                ],
                note: notes[tile_index],
                flipped: false,
                matched: false,
                active: false,
            });
        }
    }

    Ok(Layer {
        index,
        grid_size: size,
        tiles,
        active: false,
        cleared: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_pairs(layer: &Layer) {
        for tile in &layer.tiles {
            let partners = layer
                .tiles
                .iter()
                .filter(|t| t.note == tile.note && t.id != tile.id)
                .count();
            assert_eq!(partners, 1, "tile {} has {} partners", tile.id, partners);
        }
    }

    #[test]
    fn test_generate_every_difficulty() {
        for difficulty in Difficulty::ALL {
            let mut rng = SimpleRng::new(42);
            let board = Board::generate(difficulty, &mut rng);
            assert_eq!(board.layer_count(), difficulty.layer_sizes().len());

            for (i, layer) in board.layers().iter().enumerate() {
                let size = difficulty.layer_sizes()[i];
                assert_eq!(layer.index as usize, i);
                assert_eq!(layer.grid_size, size);
                assert_eq!(layer.tiles.len(), size as usize * size as usize);
                assert_eq!(layer.tiles.len() % 2, 0);
                assert!(!layer.cleared);
                assert_exact_pairs(layer);
                assert!(layer
                    .tiles
                    .iter()
                    .all(|t| !t.flipped && !t.matched && t.layer_index == layer.index));
            }
        }
    }

    #[test]
    fn test_only_outermost_layer_is_active() {
        let mut rng = SimpleRng::new(5);
        let board = Board::generate(Difficulty::Hard, &mut rng);
        let top = board.top_index().unwrap();
        assert_eq!(board.active_index(), Some(top));
        for layer in board.layers() {
            let expected = layer.index as usize == top;
            assert_eq!(layer.active, expected);
            assert!(layer.tiles.iter().all(|t| t.active == expected));
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = Board::generate(Difficulty::Medium, &mut SimpleRng::new(777));
        let b = Board::generate(Difficulty::Medium, &mut SimpleRng::new(777));
        assert_eq!(a, b);
    }

    #[test]
    fn test_positions_follow_grid() {
        let board = Board::generate(Difficulty::Easy, &mut SimpleRng::new(1));
        let layer = board.layer(1).unwrap();
        // 2x2 grid: offset 0.5, spacing 1.2
        assert_eq!(layer.tiles[0].position, [-0.6, 0.3, -0.6]);
        assert_eq!(layer.tiles[3].position, [0.6, 0.3, 0.6]);
        let inner = board.layer(0).unwrap();
        assert_eq!(inner.tiles[0].position[1], 0.0);
    }

    #[test]
    fn test_tile_lookup() {
        let board = Board::generate(Difficulty::Easy, &mut SimpleRng::new(1));
        let id = TileId::new(0, 15);
        assert_eq!(board.tile(id).map(|t| t.id), Some(id));
        assert!(board.tile(TileId::new(0, 16)).is_none());
        assert!(board.tile(TileId::new(2, 0)).is_none());
        assert_eq!(board.layer(0).unwrap().tile(3, 3).map(|t| t.id), Some(id));
        assert!(board.layer(0).unwrap().tile(4, 0).is_none());
    }

    #[test]
    fn test_generate_with_sizes_validation() {
        let mut rng = SimpleRng::new(1);
        assert_eq!(
            Board::generate_with_sizes(&[], &mut rng),
            Err(BoardError::NoLayers)
        );
        assert_eq!(
            Board::generate_with_sizes(&[4, 3], &mut rng),
            Err(BoardError::UnpairableLayer { index: 1, size: 3 })
        );
        assert_eq!(
            Board::generate_with_sizes(&[0], &mut rng),
            Err(BoardError::UnpairableLayer { index: 0, size: 0 })
        );
        assert!(matches!(
            Board::generate_with_sizes(&[18], &mut rng),
            Err(BoardError::PoolExhausted { index: 0, pairs: 162, .. })
        ));
        let board = Board::generate_with_sizes(&[16], &mut rng).unwrap();
        assert_exact_pairs(board.layer(0).unwrap());
    }

    #[test]
    fn test_mark_cleared_is_one_shot() {
        let mut board = Board::generate(Difficulty::Easy, &mut SimpleRng::new(1));
        assert!(board.mark_cleared(1));
        assert!(!board.mark_cleared(1));
        assert!(!board.mark_cleared(9));
        let layer = board.layer(1).unwrap();
        assert!(layer.cleared && !layer.active);
        assert!(layer.tiles.iter().all(|t| !t.active));
        assert!(!board.activate(1));
        assert!(board.activate(0));
        assert_eq!(board.active_index(), Some(0));
    }
}
