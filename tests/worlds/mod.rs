#![allow(dead_code)]

use std::collections::VecDeque;

use platformer_arena::prelude::*;

pub const GROUND_Y: f32 = 192.0;
pub const JUMP_HEIGHT: f32 = 32.0;
pub const JUMP_TICKS: u32 = 6;
pub const TICK_MS: i64 = 30;
pub const WALK_SPEED: f32 = 2.0;
pub const RUN_SPEED: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tile {
    Empty,
    Coin,
    Enemy,
    Exit,
}

/// One-row level: `-` empty, `o` coin, `g` enemy, `F` exit.
///
/// Walking into an enemy while airborne stomps it, on the ground it hurts (or kills when small).
#[derive(Clone, Debug, PartialEq)]
pub struct CorridorWorld {
    tiles: Vec<Tile>,
    exit_tile: i32,
    x: f32,
    y: f32,
    x_speed: f32,
    y_speed: f32,
    power: PowerState,
    on_ground: bool,
    air_ticks: u32,
    tick: u32,
    time_limited: bool,
    remaining_ms: i64,
    status: GameStatus,
    events: Vec<GameEvent>,
    kill_events: Vec<GameEvent>,
}

impl CorridorWorld {
    fn emit(&mut self, kind: EventKind, param: i32) {
        self.events
            .push(GameEvent::new(kind, param, self.tick, self.x, self.y));
    }

    fn touch_tile(&mut self) {
        let tile = self.x as usize / TILE_SIZE as usize;
        if tile as i32 >= self.exit_tile {
            self.x = self.exit_tile as f32 * TILE_SIZE;
            self.status = GameStatus::Win;
            self.emit(EventKind::Win, 0);
            return;
        }
        match self.tiles[tile] {
            Tile::Coin => {
                self.tiles[tile] = Tile::Empty;
                self.emit(EventKind::Collect, 0);
            }
            Tile::Enemy => {
                self.tiles[tile] = Tile::Empty;
                if !self.on_ground {
                    self.emit(EventKind::StompKill, 1);
                } else if self.power > PowerState::Small {
                    self.power = PowerState::from_ordinal(self.power.ordinal() as i32 - 1);
                    self.emit(EventKind::Hurt, 0);
                } else {
                    self.status = GameStatus::Lose;
                    self.emit(EventKind::Lose, 0);
                }
            }
            Tile::Empty | Tile::Exit => {}
        }
    }
}

impl World for CorridorWorld {
    fn initialize(level: &str, options: &WorldOptions) -> anyhow::Result<Self> {
        let tiles = level
            .trim()
            .chars()
            .map(|c| match c {
                '-' => Ok(Tile::Empty),
                'o' => Ok(Tile::Coin),
                'g' => Ok(Tile::Enemy),
                'F' => Ok(Tile::Exit),
                other => Err(anyhow::anyhow!("unknown tile '{other}'")),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let exit_tile = tiles
            .iter()
            .position(|t| *t == Tile::Exit)
            .ok_or_else(|| anyhow::anyhow!("level has no exit"))? as i32;

        Ok(CorridorWorld {
            tiles,
            exit_tile,
            x: 0.0,
            y: GROUND_Y,
            x_speed: 0.0,
            y_speed: 0.0,
            power: PowerState::Small,
            on_ground: true,
            air_ticks: 0,
            tick: 0,
            time_limited: options.time_limit_ms > 0,
            remaining_ms: options.time_limit_ms,
            status: GameStatus::Running,
            events: vec![],
            kill_events: options.kill_events.clone(),
        })
    }

    fn set_power_state(&mut self, power: PowerState) {
        self.power = power;
    }

    fn advance(&mut self, actions: Actions) {
        if !self.status.is_running() {
            return;
        }
        self.events.clear();
        self.tick += 1;

        if self.time_limited {
            self.remaining_ms -= TICK_MS;
            if self.remaining_ms <= 0 {
                self.status = GameStatus::TimeOut;
                return;
            }
        }

        let speed = if actions.speed() { RUN_SPEED } else { WALK_SPEED };
        self.x_speed = match (actions.left(), actions.right()) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        };
        self.x = (self.x + self.x_speed).max(0.0);

        if actions.jump() && self.on_ground {
            self.on_ground = false;
            self.air_ticks = JUMP_TICKS;
            self.y = GROUND_Y - JUMP_HEIGHT;
            self.emit(EventKind::Jump, 0);
        } else if !self.on_ground {
            self.air_ticks -= 1;
            if self.air_ticks == 0 {
                self.on_ground = true;
                self.y = GROUND_Y;
                self.emit(EventKind::Land, 0);
            }
        }
        self.y_speed = if self.on_ground { 0.0 } else { -1.0 };

        self.touch_tile();

        let killed = self
            .events
            .iter()
            .any(|e| self.kill_events.iter().any(|k| k.matches(e)));
        if killed && self.status.is_running() {
            self.status = GameStatus::Lose;
            self.emit(EventKind::Lose, 0);
        }
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn current_tick(&self) -> u32 {
        self.tick
    }

    fn remaining_time_ms(&self) -> i64 {
        self.remaining_ms
    }

    fn last_tick_events(&self) -> &[GameEvent] {
        &self.events
    }

    fn character(&self) -> Character {
        Character {
            x: self.x,
            y: self.y,
            x_speed: self.x_speed,
            y_speed: self.y_speed,
            power: self.power,
            on_ground: self.on_ground,
        }
    }

    fn geometry(&self) -> LevelGeometry {
        LevelGeometry {
            exit_tile_x: self.exit_tile,
            width: self.tiles.len() as f32 * TILE_SIZE,
            height: FRAME_HEIGHT as f32,
        }
    }
}

/// Coin on tile 5, exit on tile 50
pub fn coin_level() -> String {
    format!("-----o{}F", "-".repeat(44))
}

/// Coins, enemies, and the exit on tile 40
pub fn busy_level() -> String {
    format!("---o--g---oo--g--o-g-{}F", "-".repeat(19))
}

pub const BACKGROUND: Rgb = Rgb::new(92, 148, 252);
pub const CHARACTER: Rgb = Rgb::new(200, 36, 0);

/// Paints the background and the character, replays scripted key events.
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    /// (poll index, event)
    inputs: VecDeque<(usize, KeyEvent)>,
    pub polls: usize,
    pub renders: usize,
    pub opened_scale: Option<f32>,
    pub fail_open: bool,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, poll: usize, event: KeyEvent) -> Self {
        self.inputs.push_back((poll, event));
        self
    }

    pub fn failing() -> Self {
        ScriptedRenderer {
            fail_open: true,
            ..Default::default()
        }
    }
}

impl Renderer<CorridorWorld> for ScriptedRenderer {
    fn open(&mut self, _width: usize, _height: usize, scale: f32) -> anyhow::Result<()> {
        if self.fail_open {
            anyhow::bail!("no display available");
        }
        self.opened_scale = Some(scale);
        Ok(())
    }

    fn render(&mut self, world: &CorridorWorld, target: &mut Frame) {
        self.renders += 1;
        target.fill(BACKGROUND);
        let character = world.character();
        let x = character.x as usize % target.width();
        target.fill_rect(x, character.y as usize, 16, 16, CHARACTER);
    }

    fn poll_input(&mut self) -> Vec<KeyEvent> {
        let poll = self.polls;
        self.polls += 1;
        let mut events = vec![];
        while let Some((at, event)) = self.inputs.front().copied() {
            if at > poll {
                break;
            }
            self.inputs.pop_front();
            events.push(event);
        }
        events
    }
}

/// Runs right, forever.
pub struct AlwaysRight {
    pub speed: bool,
}

impl<W: World> Agent<W> for AlwaysRight {
    fn decide(&mut self, _model: ForwardModel<W>, _deadline: &Deadline) -> Actions {
        Actions::new(false, true, false, self.speed, false)
    }
}
