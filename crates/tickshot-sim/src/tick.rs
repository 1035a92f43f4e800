//! Fixed-order tick loop.

use tickshot_common::{PlayerId, SimError, SimResult};
use tracing::{debug, info};

use crate::attack::AttackResult;
use crate::events::SimEvent;
use crate::player::Player;
use crate::rng::RandomSource;
use crate::world::World;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick that was resolved
    pub tick: u64,
    /// Events published during the tick
    pub events: Vec<SimEvent>,
    /// Shots fired, in player join order
    pub shots: Vec<(PlayerId, AttackResult)>,
}

/// Owns the world and its players and advances them one tick at a time.
///
/// Players are resolved strictly one after another in join order, so every
/// player sees the positions left by the players before it.
#[derive(Debug)]
pub struct TickRunner<R: RandomSource = fastrand::Rng> {
    world: World,
    players: Vec<Player>,
    tick: u64,
    rng: R,
    randomize_spawns: bool,
}

impl<R: RandomSource> TickRunner<R> {
    /// Creates a runner at tick 0.
    pub fn new(world: World, rng: R) -> Self {
        Self {
            world,
            players: Vec::new(),
            tick: 0,
            rng,
            randomize_spawns: false,
        }
    }

    /// Shuffles spawn candidates at the start of each round.
    #[must_use]
    pub fn with_randomized_spawns(mut self, randomize: bool) -> Self {
        self.randomize_spawns = randomize;
        self
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Next tick to resolve.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Players in join order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// A player, mutably, to set intents between ticks.
    pub fn player_mut(&mut self, id: PlayerId) -> SimResult<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(SimError::UnknownPlayer { id })
    }

    /// Adds a player and its collider.
    pub fn join(&mut self, player: Player) {
        player.join(&mut self.world);
        info!(player = %player.id(), side = %player.side(), "player joined");
        self.players.push(player);
    }

    /// Resets the round and spawns every player.
    pub fn start_round(&mut self) -> SimResult<()> {
        self.world.round_reset();
        for player in &mut self.players {
            player.round_reset();
            player.spawn(&mut self.world, self.randomize_spawns, &mut self.rng)?;
        }
        info!(tick = self.tick, players = self.players.len(), "round started");
        Ok(())
    }

    /// Reloads a player's item between ticks.
    pub fn reload(&mut self, id: PlayerId) -> SimResult<bool> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(SimError::UnknownPlayer { id })?;
        player.reload(&mut self.world)
    }

    /// Resolves one tick: gravity, movement, then attacks, player by player.
    pub fn step(&mut self) -> SimResult<TickReport> {
        let tick = self.tick;
        let mut shots = Vec::new();

        for player in &mut self.players {
            if !self.world.collider(player.id())?.alive {
                player.movement.stop();
                player.end_tick();
                continue;
            }

            player.apply_gravity(&mut self.world)?;
            if !self.world.collider(player.id())?.alive {
                player.movement.stop();
                continue;
            }
            player.resolve_movement(&mut self.world)?;

            if player.trigger_held() {
                if let Some(result) = player.attack(&mut self.world, tick, &mut self.rng)? {
                    shots.push((player.id(), result));
                }
            }
            player.end_tick();
        }

        self.tick += 1;
        let events = self.world.drain_events();
        debug!(tick, events = events.len(), shots = shots.len(), "tick resolved");
        Ok(TickReport {
            tick,
            events,
            shots,
        })
    }
}
