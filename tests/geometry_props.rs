use std::collections::HashSet;

use battleship_server::{
    compute_cells, Coordinate, Fleet, Orientation, ProtocolError, Ship, ShipKind, BOARD_SIZE,
    FLEET_UNITS,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

fn kind_strategy() -> impl Strategy<Value = ShipKind> {
    prop::sample::select(ShipKind::ALL.to_vec())
}

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
    (0..BOARD_SIZE, 0..BOARD_SIZE).prop_map(|(x, y)| Coordinate { x, y })
}

fn full_fleet(seed: u64) -> Fleet {
    let mut rng = SmallRng::seed_from_u64(seed);
    let layout = Fleet::random_layout(&mut rng).expect("layout");
    let mut fleet = Fleet::new();
    for placement in layout {
        fleet.place(Ship::new(placement).unwrap()).unwrap();
    }
    fleet
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cells_are_distinct_and_in_bounds(
        kind in kind_strategy(),
        anchor in coordinate_strategy(),
        orientation in orientation_strategy(),
    ) {
        if let Ok(cells) = compute_cells(kind, anchor, orientation) {
            prop_assert_eq!(cells.len(), kind.length());
            prop_assert_eq!(cells[0], anchor);
            let distinct: HashSet<_> = cells.iter().copied().collect();
            prop_assert_eq!(distinct.len(), cells.len());
            prop_assert!(cells.iter().all(|c| c.x < BOARD_SIZE && c.y < BOARD_SIZE));
            prop_assert_eq!(compute_cells(kind, anchor, orientation).unwrap(), cells);
        }
    }

    #[test]
    fn random_layout_fills_the_fleet(seed in any::<u64>()) {
        let mut fleet = full_fleet(seed);
        prop_assert_eq!(fleet.placed_units(), FLEET_UNITS);
        prop_assert!(fleet.is_full());
        prop_assert!(fleet.mark_ready().is_ok());
        prop_assert_eq!(fleet.mark_ready(), Err(ProtocolError::AlreadyReady));
    }

    #[test]
    fn partial_fleet_is_never_ready(seed in any::<u64>(), keep in 0usize..11) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let layout = Fleet::random_layout(&mut rng).expect("layout");
        let mut fleet = Fleet::new();
        for placement in layout.into_iter().take(keep) {
            fleet.place(Ship::new(placement).unwrap()).unwrap();
        }
        let placed = fleet.placed_units();
        prop_assert!(placed < FLEET_UNITS);
        prop_assert_eq!(fleet.mark_ready(), Err(ProtocolError::FleetNotFull { placed }));
        prop_assert!(!fleet.is_ready());
    }

    #[test]
    fn attacks_decrement_once_per_fresh_hit(
        seed in any::<u64>(),
        targets in prop::collection::vec(coordinate_strategy(), 1..60),
    ) {
        let mut fleet = full_fleet(seed);
        let mut hit_cells = HashSet::new();
        for target in targets {
            let before = fleet.remaining_units();
            let strike = fleet.receive_attack(target);
            let occupied = fleet.ship_at(target).is_some();
            prop_assert_eq!(strike.hit, occupied);
            let fresh = occupied && hit_cells.insert(target);
            let expected = if fresh { before - 1 } else { before };
            prop_assert_eq!(fleet.remaining_units(), expected);
        }
        prop_assert_eq!(fleet.remaining_units(), FLEET_UNITS - hit_cells.len());
    }

    #[test]
    fn fleet_sinks_exactly_on_the_last_unit(seed in any::<u64>()) {
        let mut fleet = full_fleet(seed);
        let cells: Vec<Coordinate> = fleet
            .ships()
            .iter()
            .flat_map(|s| s.cells().to_vec())
            .collect();
        let mut sunk_ships = 0;
        for (i, cell) in cells.iter().enumerate() {
            prop_assert!(!fleet.all_sunk());
            let strike = fleet.receive_attack(*cell);
            prop_assert!(strike.hit);
            if strike.sunk.is_some() {
                sunk_ships += 1;
            }
            prop_assert_eq!(fleet.remaining_units(), FLEET_UNITS - i - 1);
        }
        prop_assert!(fleet.all_sunk());
        prop_assert_eq!(sunk_ships, fleet.ships().len());
    }
}
