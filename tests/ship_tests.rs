use battleship::{fleet_ship, Orientation, Ship, ShipDef, FLEET, NUM_SHIPS};

#[test]
fn test_fleet_definitions() {
    let expected = [
        ("Carrier", 5),
        ("Battleship", 4),
        ("Cruiser", 3),
        ("Submarine", 3),
        ("Destroyer", 2),
    ];
    assert_eq!(FLEET.len(), NUM_SHIPS);
    for (def, (name, len)) in FLEET.iter().zip(expected) {
        assert_eq!(def.name(), name);
        assert_eq!(def.length(), len);
    }
}

#[test]
fn test_fleet_lookup() {
    assert_eq!(fleet_ship("Cruiser"), Some(ShipDef::new("Cruiser", 3)));
    assert_eq!(fleet_ship("Rowboat"), None);
}

#[test]
fn test_unplaced_ship_not_sunk() {
    let ship = Ship::new(FLEET[4]);
    assert!(!ship.is_placed());
    assert!(ship.hits().is_empty());
    assert!(!ship.is_sunk());
}

#[test]
fn test_orientation_step() {
    assert_eq!(Orientation::Horizontal.step(3, 4, 2), (3, 6));
    assert_eq!(Orientation::Vertical.step(3, 4, 2), (5, 4));
}
