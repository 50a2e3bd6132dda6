use std::sync::Once;

pub mod analysis;
pub mod castling;
pub mod coordinates;
pub mod direction;
pub mod lines;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod position;

static INIT: Once = Once::new();

/// Warms the static topology tables. Calling this is optional, the tables build themselves on
/// first use; it exists so startup cost can be paid at a chosen moment.
pub fn initialize() {
    INIT.call_once(|| {
        lines::initialize();
    });
}
