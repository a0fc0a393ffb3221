use crate::ship::ShipDef;

pub const BOARD_SIZE: u8 = 10;
pub const TOTAL_CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipDef; NUM_SHIPS] = [
    ShipDef::new("Carrier", 5),
    ShipDef::new("Battleship", 4),
    ShipDef::new("Cruiser", 3),
    ShipDef::new("Submarine", 3),
    ShipDef::new("Destroyer", 2),
];

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Random draws allowed per ship before a placement pass is abandoned.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Number of full placement passes before the generator gives up.
pub const MAX_PLACEMENT_PASSES: usize = 10_000;

