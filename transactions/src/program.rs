//! Control programs.
//!
//! The reference chain only understands the single-opcode program that always
//! succeeds; anything else is treated as unspendable.

/// Opcode that leaves `true` on the stack.
pub const OP_TRUE: u8 = 0x51;

/// The always-spendable locking program.
pub fn always_true() -> Vec<u8> {
    vec![OP_TRUE]
}

/// Whether `program` unlocks without any witness data.
pub fn evaluates_true(program: &[u8]) -> bool {
    program == [OP_TRUE]
}
