//! Demo entry point.
//!
//! Loads the `tortelini` map, spawns Jimbo with his Wackadoodle, walks him
//! around and lets an NPC wander. An optional first argument names a JSON
//! session config.

use std::env;
use std::error::Error;
use std::rc::Rc;

use log::{error, info, warn};

use gilbo::config::SessionConfig;
use gilbo::game::entities::{Attack, Attributes, HasInventory, Inventory, Item, Positioned};
use gilbo::game::state::Session;
use gilbo::game::systems::TerminalSurface;
use gilbo::game::types::{Coordinate, Direction, Location, MapId};

const TORTELINI: &str = r#"{
    "id": "tortelini",
    "layout": [
        ["Grass", "Grass", "Grass", "Grass"],
        ["Grass", "Building", "Mountain", "Mountain"]
    ],
    "rules": {
        "kind": "scripted",
        "entries": [
            { "row": 0, "col": 0, "message": "You walk forward, and see a massive tree.", "passable": true, "once": true },
            { "row": 1, "col": 1, "message": "The door is locked.", "passable": false }
        ]
    }
}"#;

const WANDER_STEPS: usize = 3;

fn main() {
    // Initialize logger from environment variable.
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => SessionConfig::from_path(&path).unwrap_or_else(|err| {
            warn!("[Demo] Falling back to default config: {}", err);
            SessionConfig::default()
        }),
        None => SessionConfig::default(),
    };

    if let Err(err) = run(config) {
        error!("[Demo] {}", err);
        std::process::exit(1);
    }
}

fn run(config: SessionConfig) -> Result<(), Box<dyn Error>> {
    let mut session = Session::new(config);
    let map = session.load_map_json(TORTELINI)?;

    let smash = Attack::melee(100, "You use your entire body to smash the opponent.");
    let doodle = session.register_item(Item::weapon(
        "Wackadoodle",
        "A mysterious doodle of some kind. Wacky.",
        5,
        100,
        5,
        vec![smash],
    ));

    let attributes = Attributes { health: 50, strength: 100, armor: 10, agility: 30, power: 100 };
    let mut jimbo = session.spawn_player(
        "Jimbo",
        Location::new(map.clone(), Coordinate::new(1, 0)),
        attributes,
        Inventory::new(vec![Rc::clone(&doodle)]),
        20,
    )?;
    jimbo.inventory_mut().equip(doodle.id)?;

    session.render_map(&map)?;

    for direction in [Direction::Up, Direction::Right, Direction::Down, Direction::DownLeft] {
        match session.move_entity(&jimbo, direction) {
            Ok(location) => info!("[Demo] Jimbo is now at {}", location),
            Err(err) => info!("[Demo] {}", err),
        }
    }

    let mut bob = session.spawn_npc("Bob", Location::new(map.clone(), Coordinate::new(0, 3)))?;
    bob.add_dialogue("greet", vec!["Hello, traveller.".to_string(), "Mind the mountains.".to_string()]);
    bob.speak("greet", &mut TerminalSurface);

    let mut rng = rand::rng();
    for _ in 0..WANDER_STEPS {
        if let Err(err) = session.navigator_mut().wander(&bob, &mut rng) {
            info!("[Demo] Bob stays put: {}", err);
        }
    }

    if session.navigator().current_map() != Some(&MapId::new("tortelini")) {
        warn!("[Demo] Map was never drawn");
    }
    println!("{}", session.tracker().writeout(None));
    info!("[Demo] Bob ended up at {}", bob.location());
    Ok(())
}
