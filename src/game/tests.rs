//! Cross-module scenarios on the `tortelini` map:
//!
//! ```text
//! row 0: Grass Grass    Grass    Grass
//! row 1: Grass Building Mountain Mountain
//! ```
//!
//! Coordinates are (row, col).

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::config::navigation::{MSG_ENCUMBERED, MSG_INVALID_DIRECTION, NavigationConfig};
    use crate::config::session::SessionConfig;
    use crate::game::entities::{Attributes, HasInventory, HasStats, Inventory, Item, Player, Positioned};
    use crate::game::error::MoveError;
    use crate::game::events::{Event, Topic};
    use crate::game::grid::{Entry, TileGrid, TileMap};
    use crate::game::state::Session;
    use crate::game::systems::{BufferSurface, PlainRenderer, Surface};
    use crate::game::types::{Coordinate, Direction, Location, MapId, Tile};

    const MAP: &str = "tortelini";

    struct Harness {
        session: Session,
        out: BufferSurface,
        consulted: Rc<Cell<u32>>,
        queries: Rc<Cell<u32>>,
    }

    fn tortelini() -> TileGrid {
        TileGrid::new(vec![
            vec![Tile::Grass; 4],
            vec![Tile::Grass, Tile::Building, Tile::Mountain, Tile::Mountain],
        ])
        .unwrap()
    }

    fn harness(navigation: NavigationConfig) -> Harness {
        let out = BufferSurface::new();
        let config = SessionConfig { navigation, ..SessionConfig::default() };
        let mut session = Session::with_display(config, out.clone(), PlainRenderer);

        let consulted = Rc::new(Cell::new(0));
        let counter = Rc::clone(&consulted);
        let always_open = move |_: Entry<'_>, _: &mut dyn Surface| {
            counter.set(counter.get() + 1);
            true
        };
        session
            .load_map(TileMap::with_rules(MAP, tortelini(), always_open))
            .unwrap();

        let queries = Rc::new(Cell::new(0));
        let seen = Rc::clone(&queries);
        session.bus().subscribe(Topic::PositionQuery, move |event| {
            if let Event::PositionQuery { .. } = event {
                seen.set(seen.get() + 1);
            }
            Ok(())
        });

        Harness { session, out, consulted, queries }
    }

    fn at(row: usize, col: usize) -> Location {
        Location::new(MAP, Coordinate::new(row, col))
    }

    fn jimbo(session: &mut Session, row: usize, col: usize) -> Player {
        let attributes = Attributes { health: 50, strength: 10, armor: 10, agility: 30, power: 100 };
        session
            .spawn_player("Jimbo", at(row, col), attributes, Inventory::default(), 0)
            .unwrap()
    }

    fn encumbered_jimbo(session: &mut Session, row: usize, col: usize) -> Player {
        let mut player = jimbo(session, row, col);
        let anchor = session.register_item(Item::basic("Anchor", "Rusty and huge.", 500, 1));
        player.inventory_mut().add(anchor);
        assert!(player.stats().encumbered());
        player
    }

    #[test]
    fn test_move_left_commits_and_broadcasts_once() {
        let mut h = harness(NavigationConfig::default());
        let player = jimbo(&mut h.session, 1, 1);

        let landed = h.session.move_entity(&player, Direction::Left).unwrap();

        assert_eq!(landed, at(1, 0));
        assert_eq!(player.location(), at(1, 0));
        assert_eq!(h.queries.get(), 1);
        assert_eq!(h.consulted.get(), 1);
        assert_eq!(h.out.lines(), vec![". . . .".to_string(), "@ B ^ ^".to_string()]);
        assert_eq!(h.session.navigator().current_map(), Some(&MapId::new(MAP)));
    }

    #[test]
    fn test_move_up_into_corner() {
        let mut h = harness(NavigationConfig::default());
        let player = jimbo(&mut h.session, 1, 0);

        assert_eq!(h.session.move_entity(&player, Direction::Up), Ok(at(0, 0)));
        assert_eq!(h.out.lines()[0], "@ . . .");
    }

    #[test]
    fn test_move_past_last_row_is_invalid() {
        let mut h = harness(NavigationConfig::default());
        let player = jimbo(&mut h.session, 1, 2);

        let err = h.session.move_entity(&player, Direction::Down).unwrap_err();

        assert_eq!(err, MoveError::InvalidDirection { current: Coordinate::new(1, 2) });
        assert_eq!(player.location(), at(1, 2));
        assert!(h.out.contains(MSG_INVALID_DIRECTION));
        assert_eq!(h.consulted.get(), 0);
        assert_eq!(h.queries.get(), 0);
    }

    #[test]
    fn test_overflow_is_silent_without_print_errors() {
        let mut h = harness(NavigationConfig { print_errors: false, ..NavigationConfig::default() });
        let player = jimbo(&mut h.session, 1, 3);

        assert!(h.session.move_entity(&player, Direction::Right).is_err());
        assert!(h.out.lines().is_empty());
        assert_eq!(player.location(), at(1, 3));
    }

    #[test]
    fn test_negative_moves_are_invalid() {
        let mut h = harness(NavigationConfig::default());
        let player = jimbo(&mut h.session, 0, 0);

        for direction in [Direction::Up, Direction::Left] {
            assert_eq!(
                h.session.move_entity(&player, direction),
                Err(MoveError::InvalidDirection { current: Coordinate::new(0, 0) })
            );
            assert_eq!(player.location(), at(0, 0));
        }
        assert_eq!(h.consulted.get(), 0);
    }

    #[test]
    fn test_encumbered_player_cannot_move_anywhere() {
        let mut h = harness(NavigationConfig::default());
        let player = encumbered_jimbo(&mut h.session, 0, 0);

        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
            Direction::UpLeft,
            Direction::DownRight,
        ] {
            assert_eq!(
                h.session.move_entity(&player, direction),
                Err(MoveError::Overloaded { current: Coordinate::new(0, 0) })
            );
        }
        assert_eq!(player.location(), at(0, 0));
        assert_eq!(h.consulted.get(), 0);
        assert!(h.out.contains(MSG_ENCUMBERED));
    }

    // Lighter loads leave the flag set; only a strength change re-evaluates it.
    #[test]
    fn test_encumbrance_sticks_until_strength_changes() {
        let mut h = harness(NavigationConfig::default());
        let mut player = encumbered_jimbo(&mut h.session, 1, 1);
        let anchor_id = player.inventory().items()[0].id;

        player.inventory_mut().remove(anchor_id).unwrap();
        assert_eq!(player.stats().carried_weight(), 0);
        assert!(h.session.move_entity(&player, Direction::Left).is_err());

        let strength = player.stats().strength();
        player.stats_mut().set_strength(strength);
        assert_eq!(h.session.move_entity(&player, Direction::Left), Ok(at(1, 0)));
    }

    #[test]
    fn test_teleport_to_unknown_map_changes_nothing() {
        let mut h = harness(NavigationConfig::default());
        let player = jimbo(&mut h.session, 1, 1);

        let err = h
            .session
            .teleport(&player, &MapId::new("lasagna"), Coordinate::new(0, 0))
            .unwrap_err();

        assert_eq!(err, MoveError::TargetNotFound(MapId::new("lasagna")));
        assert_eq!(player.location(), at(1, 1));
        assert_eq!(h.queries.get(), 0);
    }

    #[test]
    fn test_teleport_consults_passability_with_target() {
        let mut h = harness(NavigationConfig::default());
        let player = jimbo(&mut h.session, 1, 1);

        let landed = h
            .session
            .teleport(&player, &MapId::new(MAP), Coordinate::new(0, 3))
            .unwrap();

        assert_eq!(landed, at(0, 3));
        assert_eq!(h.consulted.get(), 1);
        assert_eq!(h.queries.get(), 1);
        assert_eq!(h.out.lines()[0], ". . . @");
    }

    #[test]
    fn test_npc_moves_refresh_without_redraw() {
        let mut h = harness(NavigationConfig::default());
        let _player = jimbo(&mut h.session, 0, 0);
        let bob = h.session.spawn_npc("Bob", at(0, 2)).unwrap();

        h.session.move_entity(&bob, Direction::Right).unwrap();

        assert_eq!(h.queries.get(), 1);
        assert!(h.out.lines().is_empty());
        assert_eq!(h.session.navigator().player_location(), Some(at(0, 0)));
    }

    #[test]
    fn test_manual_reload_mode_only_clears() {
        let mut h = harness(NavigationConfig { auto_load_map: false, ..NavigationConfig::default() });
        let player = jimbo(&mut h.session, 1, 1);

        h.session.move_entity(&player, Direction::Up).unwrap();

        assert_eq!(h.queries.get(), 0);
        assert_eq!(h.out.clears(), 1);
        assert!(h.out.lines().is_empty());
    }

    #[test]
    fn test_equipping_same_kind_twice_keeps_latest() {
        let mut h = harness(NavigationConfig::default());
        let mut player = jimbo(&mut h.session, 0, 0);
        let first = h.session.register_item(Item::armor("Leather", "Soft.", 5, 10, 2));
        let second = h.session.register_item(Item::armor("Chain", "Clinky.", 15, 40, 5));
        player.inventory_mut().add(Rc::clone(&first));
        player.inventory_mut().add(Rc::clone(&second));

        player.inventory_mut().equip(first.id).unwrap();
        player.inventory_mut().equip(second.id).unwrap();

        let equipped: Vec<_> = player.inventory().equipped().iter().map(|item| item.id).collect();
        assert_eq!(equipped, vec![second.id]);
    }
}
