//! Scenarios with every input reference resolved to an explicit kind.

use oracle_types::{Amount, Height};

use crate::document::{InputSpec, ScenarioSpec};
use crate::{ReferenceError, RunFailure, ScenarioError, Step};

/// Where a scenario input takes its output from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRef {
    /// A transaction in an already committed main-chain block.
    Historical {
        height: Height,
        tx_index: usize,
        output_index: usize,
    },
    /// A transaction earlier in the block being built. `tx_index` counts the
    /// coinbase, so the first user transaction is 1.
    IntraBlock { tx_index: usize, output_index: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioTx {
    pub inputs: Vec<InputRef>,
    pub outputs: Vec<Amount>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioBlock {
    /// Height this block will occupy once committed.
    pub build_height: Height,
    pub transactions: Vec<ScenarioTx>,
    pub extension_count: u64,
}

impl ScenarioBlock {
    /// Whether `target` falls on this block or one of its extensions.
    pub fn covers(&self, target: Height) -> bool {
        self.build_height <= target
            && target <= self.build_height.saturating_add(self.extension_count)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    /// Height of the chain tip the scenario was loaded against.
    pub base_height: Height,
    pub rollback_target: Option<Height>,
    pub blocks: Vec<ScenarioBlock>,
}

impl Scenario {
    /// Resolve `spec` against a chain whose tip is at `base_height`.
    ///
    /// Intra-block references are checked here, before anything is committed.
    pub fn load(spec: &ScenarioSpec, base_height: Height) -> Result<Self, RunFailure> {
        let mut blocks = Vec::with_capacity(spec.blocks.len());
        let mut height = base_height;

        for (index, block) in spec.blocks.iter().enumerate() {
            let build_height = height.checked_add(1).ok_or_else(|| overflow(index))?;
            let mut transactions: Vec<ScenarioTx> = Vec::with_capacity(block.transactions.len());

            for (position, tx) in block.transactions.iter().enumerate() {
                let inputs = tx
                    .inputs
                    .iter()
                    .enumerate()
                    .map(|(k, input)| {
                        resolve_reference(input, build_height, &transactions).map_err(|source| {
                            RunFailure::at(
                                index,
                                Step::Load,
                                ScenarioError::Reference {
                                    tx: position,
                                    input: k,
                                    source,
                                },
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                transactions.push(ScenarioTx {
                    inputs,
                    outputs: tx.outputs.clone(),
                });
            }

            blocks.push(ScenarioBlock {
                build_height,
                transactions,
                extension_count: block.append,
            });
            height = build_height
                .checked_add(block.append)
                .ok_or_else(|| overflow(index))?;
        }

        Ok(Self {
            base_height,
            rollback_target: spec.rollback_to,
            blocks,
        })
    }

    /// Height of the tip once every block and extension is committed.
    pub fn final_height(&self) -> Height {
        self.blocks
            .last()
            .map_or(self.base_height, |b| {
                b.build_height.saturating_add(b.extension_count)
            })
    }

    /// The block whose commit captures the rollback checkpoint, if any.
    pub fn checkpoint_block(&self) -> Option<usize> {
        let target = self.rollback_target?;
        self.blocks.iter().position(|b| b.covers(target))
    }
}

fn overflow(index: usize) -> RunFailure {
    RunFailure::at(index, Step::Load, ScenarioError::HeightOverflow { blocks: index })
}

/// `built` holds the transactions of the same block that precede the one
/// being resolved.
fn resolve_reference(
    input: &InputSpec,
    build_height: Height,
    built: &[ScenarioTx],
) -> Result<InputRef, ReferenceError> {
    if input.height > build_height {
        return Err(ReferenceError::FutureHeight {
            height: input.height,
            build_height,
        });
    }
    if input.height < build_height {
        return Ok(InputRef::Historical {
            height: input.height,
            tx_index: input.tx_index,
            output_index: input.output_index,
        });
    }

    if input.tx_index == 0 {
        return Err(ReferenceError::InFlightCoinbase);
    }
    let source = built
        .get(input.tx_index - 1)
        .ok_or(ReferenceError::IntraBlockIndexOutOfRange {
            tx_index: input.tx_index,
            built: built.len(),
        })?;
    if input.output_index >= source.outputs.len() {
        return Err(ReferenceError::OutputIndexOutOfRange {
            output_index: input.output_index,
            count: source.outputs.len(),
        });
    }
    Ok(InputRef::IntraBlock {
        tx_index: input.tx_index,
        output_index: input.output_index,
    })
}
