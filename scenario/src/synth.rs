//! Transaction and block synthesis from scenario descriptions.

use oracle_ledger::{Block, BlockAssembler, ChainEngine};
use oracle_transactions::{always_true, Transaction, TxBuilder, TxInput, TxOutput};
use oracle_types::AssetId;

use crate::resolver::InputResolver;
use crate::scenario::{ScenarioBlock, ScenarioTx};
use crate::{BuildError, ScenarioError};

/// Build the transaction at `position` in its block.
///
/// Inputs are added in declaration order, then one always-true native
/// output per declared amount.
pub fn synthesize_transaction<C: ChainEngine + ?Sized>(
    position: usize,
    spec: &ScenarioTx,
    resolver: &InputResolver<'_, C>,
) -> Result<Transaction, ScenarioError> {
    let mut builder = TxBuilder::new();
    for (k, input) in spec.inputs.iter().enumerate() {
        let spend = resolver
            .resolve(input)
            .map_err(|source| ScenarioError::Reference {
                tx: position,
                input: k,
                source,
            })?;
        builder.add_input(TxInput::Spend(spend));
    }
    for amount in &spec.outputs {
        builder.add_output(TxOutput::new(AssetId::NATIVE, *amount, always_true()));
    }
    Ok(builder.build().map_err(BuildError::from)?)
}

/// Build the next block for `spec` on top of `chain`'s tip. The block is not
/// solved.
pub fn synthesize_block<C, A>(
    spec: &ScenarioBlock,
    chain: &C,
    assembler: &A,
) -> Result<Block, ScenarioError>
where
    C: ChainEngine + ?Sized,
    A: BlockAssembler + ?Sized,
{
    let mut pending = Vec::with_capacity(spec.transactions.len());
    for (position, tx_spec) in spec.transactions.iter().enumerate() {
        let tx = {
            let resolver = InputResolver::new(chain, &pending);
            synthesize_transaction(position, tx_spec, &resolver)?
        };
        tracing::debug!(position, hash = %tx.hash, "synthesized transaction");
        pending.push(tx);
    }

    let block = assembler
        .new_block(chain, pending, &always_true())
        .map_err(BuildError::from)?;
    if block.height() != spec.build_height {
        return Err(BuildError::HeightDrift {
            expected: spec.build_height,
            actual: block.height(),
        }
        .into());
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::InputRef;
    use crate::ReferenceError;
    use oracle_ledger::{Assembler, Chain};
    use oracle_nullables::NullStore;
    use oracle_types::{Amount, ChainParams};
    use std::sync::Arc;

    fn setup() -> (Chain<NullStore>, Assembler) {
        let params = ChainParams::dev();
        let chain = Chain::new(Arc::new(NullStore::new()), params.clone()).unwrap();
        (chain, Assembler::new(params))
    }

    fn scenario_tx(inputs: Vec<InputRef>, outputs: &[u64]) -> ScenarioTx {
        ScenarioTx {
            inputs,
            outputs: outputs.iter().copied().map(Amount::new).collect(),
        }
    }

    #[test]
    fn intra_block_chain_is_ordered_after_coinbase() {
        let (chain, assembler) = setup();
        let spec = ScenarioBlock {
            build_height: 1,
            transactions: vec![
                scenario_tx(
                    vec![InputRef::Historical {
                        height: 0,
                        tx_index: 0,
                        output_index: 0,
                    }],
                    &[10, 20],
                ),
                scenario_tx(
                    vec![InputRef::IntraBlock {
                        tx_index: 1,
                        output_index: 1,
                    }],
                    &[20],
                ),
            ],
            extension_count: 0,
        };
        let block = synthesize_block(&spec, &chain, &assembler).unwrap();

        assert_eq!(block.transactions.len(), 3);
        assert!(block.transactions[0].is_coinbase());
        let first = &block.transactions[1];
        let second = &block.transactions[2];
        assert_eq!(second.spent_output_ids(), vec![first.output_id(1).unwrap()]);
        assert_eq!(second.outputs[0].amount, Amount::new(20));
    }

    #[test]
    fn zero_amount_output_is_a_build_error() {
        let (chain, assembler) = setup();
        let spec = ScenarioBlock {
            build_height: 1,
            transactions: vec![scenario_tx(
                vec![InputRef::Historical {
                    height: 0,
                    tx_index: 0,
                    output_index: 0,
                }],
                &[0],
            )],
            extension_count: 0,
        };
        let err = synthesize_block(&spec, &chain, &assembler).unwrap_err();
        assert!(matches!(err, ScenarioError::Build(BuildError::Transaction(_))));
    }

    #[test]
    fn unresolvable_input_names_its_position() {
        let (chain, assembler) = setup();
        let spec = ScenarioBlock {
            build_height: 1,
            transactions: vec![scenario_tx(
                vec![InputRef::Historical {
                    height: 0,
                    tx_index: 0,
                    output_index: 3,
                }],
                &[1],
            )],
            extension_count: 0,
        };
        let err = synthesize_block(&spec, &chain, &assembler).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Reference {
                tx: 0,
                input: 0,
                source: ReferenceError::OutputIndexOutOfRange { .. }
            }
        ));
    }

    #[test]
    fn height_drift_is_reported() {
        let (chain, assembler) = setup();
        let spec = ScenarioBlock {
            build_height: 5,
            transactions: Vec::new(),
            extension_count: 0,
        };
        let err = synthesize_block(&spec, &chain, &assembler).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Build(BuildError::HeightDrift {
                expected: 5,
                actual: 1
            })
        ));
    }
}
