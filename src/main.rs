//! grid-collide demo
//!
//! Walks a player and two ghosts over a small pellet board with a seeded RNG
//! and lets the collision rules decide what happens when they meet.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use grid_collide::board::Tile;
use grid_collide::{CollisionMap, CollisionSettings, Error, KindGraph, KindId, Unit};

const DEFAULT_SEED: u64 = 12345;
const MAX_TICKS: u32 = 400;
const BOARD_SIZE: IVec2 = IVec2::new(7, 5);
const PELLET_POINTS: u32 = 10;
const DIRECTIONS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];
const SETTINGS_PATH: &str = "grid-collide.json";

const KINDS: &str = r#"[
    {"name": "Unit"},
    {"name": "Ghost", "parent": "Unit"},
    {"name": "Blinky", "parent": "Ghost"},
    {"name": "Clyde", "parent": "Ghost"},
    {"name": "Player", "parent": "Unit"},
    {"name": "Pellet", "parent": "Unit"}
]"#;

struct Piece {
    name: String,
    kind: KindId,
    pos: Cell<IVec2>,
    alive: Cell<bool>,
    points: Cell<u32>,
}

impl Unit for Piece {
    fn kind(&self) -> KindId {
        self.kind
    }
}

/// Grid of tiles holding piece indices
struct Board {
    size: IVec2,
    tiles: Vec<Tile<usize>>,
}

impl Board {
    fn new(size: IVec2) -> Self {
        Self {
            size,
            tiles: vec![Tile::new(); (size.x * size.y) as usize],
        }
    }

    fn contains(&self, pos: IVec2) -> bool {
        pos.cmpge(IVec2::ZERO).all() && pos.cmplt(self.size).all()
    }

    fn tile(&self, pos: IVec2) -> &Tile<usize> {
        &self.tiles[(pos.y * self.size.x + pos.x) as usize]
    }

    fn tile_mut(&mut self, pos: IVec2) -> &mut Tile<usize> {
        &mut self.tiles[(pos.y * self.size.x + pos.x) as usize]
    }
}

struct Game {
    board: Board,
    pieces: Vec<Piece>,
    movers: Vec<usize>,
    player: usize,
    collisions: usize,
}

impl Game {
    fn new(graph: &KindGraph) -> Result<Self, Error> {
        let kind = |name: &str| graph.require(name);

        let mut game = Self {
            board: Board::new(BOARD_SIZE),
            pieces: Vec::new(),
            movers: Vec::new(),
            player: 0,
            collisions: 0,
        };

        game.player = game.spawn("pacman", kind("Player")?, IVec2::ZERO);
        let blinky = game.spawn("blinky", kind("Blinky")?, BOARD_SIZE - IVec2::ONE);
        let clyde = game.spawn("clyde", kind("Clyde")?, IVec2::new(BOARD_SIZE.x - 1, 0));
        game.movers = vec![game.player, blinky, clyde];

        let pellet = kind("Pellet")?;
        for y in 0..BOARD_SIZE.y {
            for x in 0..BOARD_SIZE.x {
                let pos = IVec2::new(x, y);
                if (x + y) % 2 == 1 && game.board.tile(pos).is_empty() {
                    game.spawn(&format!("pellet{x}{y}"), pellet, pos);
                }
            }
        }
        Ok(game)
    }

    fn spawn(&mut self, name: &str, kind: KindId, pos: IVec2) -> usize {
        let id = self.pieces.len();
        self.pieces.push(Piece {
            name: name.to_string(),
            kind,
            pos: Cell::new(pos),
            alive: Cell::new(true),
            points: Cell::new(0),
        });
        self.board.tile_mut(pos).put(id);
        id
    }

    fn pellets_left(&self, pellet: KindId) -> usize {
        self.pieces
            .iter()
            .filter(|p| p.kind == pellet && p.alive.get())
            .count()
    }

    /// Move one piece a step and resolve collisions on the tile it enters
    fn step(&mut self, id: usize, map: &CollisionMap<Piece>, rng: &mut Pcg32) {
        let piece = &self.pieces[id];
        if !piece.alive.get() {
            return;
        }

        let from = piece.pos.get();
        let to = from + DIRECTIONS[rng.random_range(0..DIRECTIONS.len())];
        if !self.board.contains(to) {
            return;
        }

        self.board.tile_mut(from).remove(&id);
        self.board.tile_mut(to).put(id);
        piece.pos.set(to);

        let tile = self.board.tile(to);
        let occupants = tile.occupants().iter().map(|&o| &self.pieces[o]);
        self.collisions += map.collide_all(piece, occupants);

        let dead: Vec<usize> = tile
            .occupants()
            .iter()
            .copied()
            .filter(|&o| !self.pieces[o].alive.get())
            .collect();
        for o in dead {
            log::debug!("{} removed from {}", self.pieces[o].name, to);
            self.board.tile_mut(to).remove(&o);
        }
    }
}

fn build_rules(
    graph: Rc<KindGraph>,
    settings: CollisionSettings,
) -> Result<CollisionMap<Piece>, Error> {
    let ghost = graph.require("Ghost")?;
    let player = graph.require("Player")?;
    let pellet = graph.require("Pellet")?;
    let mut map = CollisionMap::with_settings(graph, settings);

    map.register(player, pellet, |player: &Piece, pellet: &Piece| {
        if pellet.alive.replace(false) {
            player.points.set(player.points.get() + PELLET_POINTS);
        }
    })?;
    map.register(ghost, player, |ghost: &Piece, player: &Piece| {
        if player.alive.replace(false) {
            log::info!("{} caught {}", ghost.name, player.name);
        }
    })?;

    log::info!("Registered {} collision rules", map.len());
    Ok(map)
}

fn main() -> Result<(), Error> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    log::info!("grid-collide demo starting with seed: {}", seed);

    let settings = CollisionSettings::load(Path::new(SETTINGS_PATH));
    let graph = Rc::new(KindGraph::from_json(KINDS)?);
    let map = build_rules(Rc::clone(&graph), settings)?;
    let mut game = Game::new(&graph)?;
    let mut rng = Pcg32::seed_from_u64(seed);
    let pellet = graph.require("Pellet")?;

    let mut ticks = 0;
    while ticks < MAX_TICKS {
        ticks += 1;
        for i in 0..game.movers.len() {
            let id = game.movers[i];
            game.step(id, &map, &mut rng);
        }

        if !game.pieces[game.player].alive.get() || game.pellets_left(pellet) == 0 {
            break;
        }
    }

    let player = &game.pieces[game.player];
    println!(
        "{} after {} ticks: {} points, {} pellets left, {} collisions handled",
        if player.alive.get() { "Survived" } else { "Caught" },
        ticks,
        player.points.get(),
        game.pellets_left(pellet),
        game.collisions
    );
    Ok(())
}
