mod layout;
mod lex;
mod patch;

use crate::*;

/// Engine with the block and edge types most tests need.
pub(crate) fn test_engine() -> Engine {
    let mut engine = Engine::new();
    engine
        .register_block_type(BlockTypeDefinition::new("shape", Size::new(200.0, 100.0)))
        .unwrap();
    engine
        .register_block_type(BlockTypeDefinition::new("text", Size::new(200.0, 60.0)))
        .unwrap();
    engine
        .register_block_type(BlockTypeDefinition::new("zone", Size::new(300.0, 200.0)).group())
        .unwrap();
    engine
}
