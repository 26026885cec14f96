//! # Block Flows
//!
//! A block's life from the forger's point of view and from a syncing
//! peer's:
//!
//! 1. **Forged**: signed by the forger only
//! 2. **Fully signed**: delegate endorsements collected up to quorum
//! 3. **Stored**: signatures reduced to hashes for history
//! 4. **Sync**: block info and signature responses from peers

#[cfg(test)]
mod tests {
    use dc_schema_validation::{
        SchemaError, SchemaErrorKind, SchemaValidationApi, SchemaValidationService,
    };
    use serde_json::{json, Value};
    use shared_types::{Block, BlockInfo, TransactionBundle};

    use crate::fixtures::*;

    fn service() -> SchemaValidationService {
        SchemaValidationService::new(test_policy())
    }

    fn two_transfers() -> Vec<shared_types::Transaction> {
        vec![transfer(false), transfer(false)]
    }

    // =============================================================================
    // FORGING AND ENDORSEMENT
    // =============================================================================

    #[test]
    fn test_block_lifecycle() {
        let service = service();

        let forged = block(&[], two_transfers(), true);
        assert!(service.validate_forged_block(&to_json(&forged)).is_ok());
        assert_eq!(
            service.validate_fully_signed_block(&to_json(&forged)),
            Err(SchemaError::Quorum {
                distinct: 0,
                required: 3
            })
        );

        let signed = block(&[1, 2, 3], two_transfers(), true);
        assert!(service.validate_fully_signed_block(&to_json(&signed)).is_ok());
        assert!(service.validate_block(&to_json(&signed), true).is_ok());

        let stored = block(&[1, 2, 3], two_transfers(), false);
        assert!(service.validate_block(&to_json(&stored), false).is_ok());
        assert!(service.validate_block(&to_json(&stored), true).is_err());
        assert!(service.validate_fully_signed_block(&to_json(&stored)).is_err());
    }

    #[test]
    fn test_duplicate_endorsement_rejected() {
        // Two distinct delegates plus a repeat of the first.
        let mut policy = test_policy();
        policy.min_signatures = 2;
        let service = SchemaValidationService::new(policy);

        let blk = to_json(&block(&[1, 2, 1], two_transfers(), true));
        assert_eq!(
            service.validate_block(&blk, true),
            Err(SchemaError::DuplicateSigner {
                signer_address: wallet_address(1)
            })
        );

        let without_repeat = to_json(&block(&[1, 2], two_transfers(), true));
        assert!(service.validate_block(&without_repeat, true).is_ok());
    }

    #[test]
    fn test_forger_endorsement_rejected_regardless_of_count() {
        let service = service();
        let blk = to_json(&block(&[1, 2, 3, FORGER], two_transfers(), true));
        assert_eq!(
            service.validate_block(&blk, true).unwrap_err().kind(),
            SchemaErrorKind::SelfSignature
        );
        assert_eq!(
            service.validate_fully_signed_block(&blk).unwrap_err().kind(),
            SchemaErrorKind::SelfSignature
        );
    }

    #[test]
    fn test_transaction_count_cross_check() {
        let service = service();
        let mut blk = block(&[1, 2, 3], two_transfers(), true);
        blk.number_of_transactions = 3;
        assert_eq!(
            service.validate_block(&to_json(&blk), true),
            Err(SchemaError::TransactionCountMismatch {
                declared: 3,
                actual: 2
            })
        );

        blk.transactions.push(transfer(false));
        assert!(service.validate_block(&to_json(&blk), true).is_ok());
    }

    #[test]
    fn test_genesis_block_without_predecessor() {
        let mut genesis = block(&[1, 2, 3], Vec::new(), true);
        genesis.previous_block_id = None;
        genesis.height = 0;

        let value = to_json(&genesis);
        assert!(value.get("previousBlockId").is_none());
        assert!(service().validate_block(&value, true).is_ok());

        let decoded: Block = service().decode_block(&value, true).unwrap();
        assert!(decoded.is_genesis());
        assert_eq!(decoded, genesis);
    }

    #[test]
    fn test_block_rejects_unknown_property() {
        let blk = with_field(
            to_json(&block(&[1, 2, 3], two_transfers(), true)),
            "stateRoot",
            json!("00"),
        );
        assert_eq!(
            service().validate_block(&blk, true),
            Err(SchemaError::UnexpectedProperty {
                structure: "Block",
                property: "stateRoot".to_string(),
            })
        );
    }

    // =============================================================================
    // SYNC
    // =============================================================================

    #[test]
    fn test_block_info_from_stored_block() {
        let service = service();
        let blk = block(&[1, 2, 3], two_transfers(), true);
        let info = BlockInfo {
            id: blk.id.clone(),
            height: blk.height,
            signatures: blk.signatures.clone(),
        };
        assert!(service.verify_block_info(&to_json(&info)).is_ok());

        let mut foreign = info.clone();
        foreign.signatures[1].block_id = block_id('Z');
        assert_eq!(
            service.verify_block_info(&to_json(&foreign)).unwrap_err().kind(),
            SchemaErrorKind::Mismatch
        );
    }

    #[test]
    fn test_signature_responses() {
        let service = service();
        let id = block_id('B');
        let response: Vec<_> = [4, 5, 6]
            .into_iter()
            .map(|signer| block_signature(signer, &id, true))
            .collect();
        let response = to_json(&response);

        assert!(service.verify_block_signatures(&response, 3).is_ok());
        assert!(service.verify_block_signatures_response(&response, &id, 3).is_ok());
        assert_eq!(
            service
                .verify_block_signatures_response(&response, &block_id('C'), 3)
                .unwrap_err()
                .kind(),
            SchemaErrorKind::Mismatch
        );
        assert_eq!(
            service.verify_block_signatures(&response, 4).unwrap_err().kind(),
            SchemaErrorKind::Quorum
        );

        let signature = service
            .decode_block_signature(&response[0])
            .unwrap();
        assert_eq!(signature.signer_address, wallet_address(4));
    }

    #[test]
    fn test_blocks_response_only_checks_shape() {
        let service = service();
        let blocks = json!([to_json(&block(&[1, 2, 3], Vec::new(), true)), {"garbage": true}]);
        assert!(service.verify_blocks_response(&blocks).is_ok());
        assert!(service.verify_blocks_response(&Value::Null).is_err());
    }

    #[test]
    fn test_transaction_bundle() {
        let service = service();
        let bundle = TransactionBundle {
            transactions: vec![transfer(true), transfer(true)],
            signature: signature(),
        };
        assert!(service.verify_transaction_bundle(&to_json(&bundle)).is_ok());

        let tampered = with_field(to_json(&bundle), "relayedBy", json!(wallet_address(9)));
        assert_eq!(
            service.verify_transaction_bundle(&tampered).unwrap_err().kind(),
            SchemaErrorKind::UnexpectedProperty
        );
    }

    #[test]
    fn test_pagination_query() {
        let service = service();
        assert!(service.verify_pagination(&json!({ "offset": 20, "limit": 20 })).is_ok());
        assert_eq!(
            service
                .verify_pagination(&json!({ "limit": 1000 }))
                .unwrap_err()
                .kind(),
            SchemaErrorKind::FieldRange
        );
    }
}
