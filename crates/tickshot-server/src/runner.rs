//! Headless match loop.
//!
//! Drives a [`TickRunner`] with scripted bots: each bot walks towards the
//! nearest living enemy, and once within engagement distance strafes and
//! keeps the trigger held. Events are drained to the log every tick.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tickshot_common::{PlayerId, Point, SimResult, Side};
use tickshot_sim::{
    Firearm, FloorRecord, Item, MapDef, Player, SimEvent, TickReport, TickRunner, WallRecord,
    World,
};
use tracing::{debug, info, trace};

use crate::config::ServerConfig;
use crate::map_loader::{self, MapLoadResult};

/// Height above the feet bots aim at.
const CHEST_HEIGHT: i32 = 130;

/// Ticks a bot strafes in one direction before switching.
const STRAFE_PERIOD: u64 = 24;

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    /// Ticks resolved
    pub ticks: u64,
    /// Rounds started
    pub rounds: u32,
    /// Shots fired
    pub shots: usize,
    /// Bullet kills
    pub kills: usize,
    /// Headshot kills
    pub headshots: usize,
    /// Fall damage kills
    pub fall_deaths: usize,
    /// Sounds emitted
    pub sounds: usize,
}

/// Geometry dump written for debugging maps.
#[derive(Debug, Serialize)]
struct GeometrySnapshot {
    map: String,
    walls: Vec<WallRecord>,
    floors: Vec<FloorRecord>,
}

/// Builds the world from the configured map, or the practice arena.
pub fn build_world(config: &ServerConfig) -> MapLoadResult<World> {
    let map = match &config.map_path {
        Some(path) => map_loader::load_map(path)?,
        None => {
            info!("No map configured, using the practice arena");
            MapDef::practice_arena()
        },
    };

    let mut world = World::new(config.sim.clone());
    world.load_map(&map);
    Ok(world)
}

/// Writes the loaded geometry as pretty JSON.
pub fn write_snapshot<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
    let path = path.as_ref();
    let snapshot = GeometrySnapshot {
        map: world.require_map()?.name.clone(),
        walls: world.walls(),
        floors: world.floors(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;

    info!(
        "Wrote geometry snapshot to {} ({} walls, {} floors)",
        path.display(),
        snapshot.walls.len(),
        snapshot.floors.len()
    );
    Ok(())
}

/// How a round finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    /// The other side has no living players
    Won(Side),
    /// Both sides died on the same tick
    Draw,
}

/// A match between scripted bots.
#[derive(Debug)]
pub struct BotMatch {
    runner: TickRunner,
    engage_distance: i32,
    summary: MatchSummary,
}

impl BotMatch {
    /// Joins the configured bots. Attackers carry rifles, defenders pistols.
    pub fn new(world: World, config: &ServerConfig, seed: u64) -> Self {
        let mut runner = TickRunner::new(world, fastrand::Rng::with_seed(seed))
            .with_randomized_spawns(config.randomize_spawns);

        let mut next_id = 1;
        for (side, count) in [
            (Side::Attacker, config.attacker_bots),
            (Side::Defender, config.defender_bots),
        ] {
            for _ in 0..count {
                let item: Box<dyn Item> = match side {
                    Side::Attacker => Box::new(Firearm::rifle()),
                    Side::Defender => Box::new(Firearm::pistol()),
                };
                runner.join(Player::new(PlayerId::new(next_id), side, item));
                next_id += 1;
            }
        }

        Self {
            runner,
            engage_distance: config.engage_distance,
            summary: MatchSummary::default(),
        }
    }

    /// The simulation.
    #[must_use]
    pub const fn runner(&self) -> &TickRunner {
        &self.runner
    }

    /// Totals so far.
    #[must_use]
    pub const fn summary(&self) -> MatchSummary {
        self.summary
    }

    /// Starts a new round.
    pub fn start_round(&mut self) -> SimResult<()> {
        self.runner.start_round()?;
        self.summary.rounds += 1;
        info!("Round {} started", self.summary.rounds);
        Ok(())
    }

    /// Plans every bot, resolves one tick and restarts the round once a
    /// side is wiped out.
    pub fn step(&mut self) -> SimResult<TickReport> {
        self.plan_bots()?;
        let report = self.runner.step()?;
        self.record(&report);

        match self.round_end()? {
            Some(RoundEnd::Won(side)) => {
                info!(tick = report.tick, "Round {} won by {side}", self.summary.rounds);
                self.start_round()?;
            },
            Some(RoundEnd::Draw) => {
                info!(tick = report.tick, "Round {} ended in a draw", self.summary.rounds);
                self.start_round()?;
            },
            None => {},
        }
        Ok(report)
    }

    fn positions(&self) -> SimResult<Vec<(PlayerId, Side, Point, bool)>> {
        let world = self.runner.world();
        self.runner
            .players()
            .iter()
            .map(|player| {
                let collider = world.collider(player.id())?;
                Ok((player.id(), player.side(), collider.position, collider.alive))
            })
            .collect()
    }

    fn plan_bots(&mut self) -> SimResult<()> {
        let tick = self.runner.tick();
        let positions = self.positions()?;

        for &(id, side, position, alive) in &positions {
            if !alive {
                continue;
            }
            let enemy = positions
                .iter()
                .filter(|&&(_, other, _, other_alive)| other != side && other_alive)
                .map(|&(_, _, point, _)| point)
                .min_by_key(|point| flat_distance_sq(position, *point));

            if self.runner.player_mut(id)?.item().ammo() == Some(0) && self.runner.reload(id)? {
                debug!(player = %id, "bot reloaded");
            }

            let player = self.runner.player_mut(id)?;
            steer(player, position, enemy, tick, self.engage_distance);
        }
        Ok(())
    }

    fn record(&mut self, report: &TickReport) {
        self.summary.ticks += 1;
        self.summary.shots += report.shots.len();

        for (player, result) in &report.shots {
            debug!(
                tick = report.tick,
                player = %player,
                hits = result.hits.len(),
                recoil_h = result.recoil.horizontal,
                recoil_v = result.recoil.vertical,
                "shot"
            );
        }

        for event in &report.events {
            match event {
                SimEvent::AttackKill {
                    killed,
                    shooter,
                    position,
                    headshot,
                } => {
                    self.summary.kills += 1;
                    if *headshot {
                        self.summary.headshots += 1;
                    }
                    info!(
                        tick = report.tick,
                        "{shooter} killed {killed} at {position}{}",
                        if *headshot { " (headshot)" } else { "" }
                    );
                },
                SimEvent::FallDamageKill { killed } => {
                    self.summary.fall_deaths += 1;
                    info!(tick = report.tick, "{killed} died from fall damage");
                },
                SimEvent::Sound(sound) => {
                    self.summary.sounds += 1;
                    trace!(tick = report.tick, kind = ?sound.kind, position = %sound.position, "sound");
                },
            }
        }
    }

    /// Whether a side has been wiped out.
    ///
    /// Matches with an empty side never end a round.
    fn round_end(&self) -> SimResult<Option<RoundEnd>> {
        let mut alive = [0usize; 2];
        let mut joined = [0usize; 2];
        for (_, side, _, is_alive) in self.positions()? {
            let index = usize::from(side == Side::Defender);
            joined[index] += 1;
            if is_alive {
                alive[index] += 1;
            }
        }

        if joined.contains(&0) {
            return Ok(None);
        }
        Ok(match alive {
            [0, 0] => Some(RoundEnd::Draw),
            [_, 0] => Some(RoundEnd::Won(Side::Attacker)),
            [0, _] => Some(RoundEnd::Won(Side::Defender)),
            _ => None,
        })
    }
}

fn flat_distance_sq(a: Point, b: Point) -> i64 {
    let dx = i64::from(b.x - a.x);
    let dz = i64::from(b.z - a.z);
    dx * dx + dz * dz
}

/// Sets one bot's intents for the coming tick.
fn steer(player: &mut Player, position: Point, enemy: Option<Point>, tick: u64, engage_distance: i32) {
    let Some(enemy) = enemy else {
        player.release_trigger();
        return;
    };

    let dx = f64::from(enemy.x - position.x);
    let dz = f64::from(enemy.z - position.z);
    let flat = dx.hypot(dz);
    let rise = f64::from(enemy.y + CHEST_HEIGHT - (position.y + player.archetype().sight_height));
    player
        .aim
        .look_at(dx.atan2(dz).to_degrees() as f32, rise.atan2(flat).to_degrees() as f32);

    if flat > f64::from(engage_distance) {
        player.release_trigger();
        player.speed_run();
        player.move_forward();
        return;
    }

    player.press_trigger();
    player.speed_walk();
    if (tick / STRAFE_PERIOD + u64::from(player.id().raw())) % 2 == 0 {
        player.move_left();
    } else {
        player.move_right();
    }
}

/// Runs the configured match to completion.
pub fn run(config: &ServerConfig) -> Result<MatchSummary> {
    let world = build_world(config)?;
    if let Some(path) = &config.snapshot_path {
        write_snapshot(&world, path)?;
    }

    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    info!("Match seed: {seed}");

    let mut game = BotMatch::new(world, config, seed);
    game.start_round()?;

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate.max(1)));
    for _ in 0..config.ticks_to_run {
        let started = Instant::now();
        game.step()?;

        if config.realtime {
            let elapsed = started.elapsed();
            if elapsed < tick_duration {
                thread::sleep(tick_duration - elapsed);
            }
        }
    }

    debug!(
        tick = game.runner().tick(),
        players = game.runner().players().len(),
        "Match loop finished"
    );
    let summary = game.summary();
    info!(
        "Match finished after {} ticks: {} rounds, {} shots, {} kills ({} headshots), {} fall deaths",
        summary.ticks,
        summary.rounds,
        summary.shots,
        summary.kills,
        summary.headshots,
        summary.fall_deaths
    );
    Ok(summary)
}
