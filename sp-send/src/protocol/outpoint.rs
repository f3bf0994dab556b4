use crate::protocol::input::SpendableInput;
use crate::protocol::utils::hash::{serialize_outpoint, OUTPOINT_LENGTH};

/// Find `outpoint_L`, the lexicographically smallest serialized outpoint among the inputs.
///
/// Returns `None` if there are no inputs.
pub fn smallest_outpoint(inputs: &[SpendableInput]) -> Option<[u8; OUTPOINT_LENGTH]> {
    inputs
        .iter()
        .map(|input| serialize_outpoint(&input.outpoint))
        .min()
}
