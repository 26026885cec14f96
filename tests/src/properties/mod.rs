//! # Property Tests
//!
//! Invariants that must hold for every input, not just the hand-picked
//! fixtures: quorum counting, idempotence, allow-list symmetry, multisig
//! membership bounds and address length.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use dc_schema_validation::domain::primitives::validate_wallet_address;
    use dc_schema_validation::domain::properties::{
        BASE_TRANSACTION_PROPERTIES, SIG_TRANSACTION_PROPERTIES,
    };
    use dc_schema_validation::{
        validate_block_schema, validate_transaction_schema, Packet, SchemaErrorKind,
        ValidationPolicy,
    };
    use proptest::prelude::*;
    use proptest::sample::Index;
    use serde_json::{json, Value};
    use shared_types::{MultisigWalletDetails, TransactionPayload, TransactionType};

    use crate::fixtures::*;

    fn quorum_policy(min_signatures: usize, max_signatures: usize) -> ValidationPolicy {
        ValidationPolicy {
            min_signatures,
            max_signatures,
            ..test_policy()
        }
    }

    fn any_json() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[ -~]{0,50}".prop_map(Value::from),
            Just(json!([])),
            Just(json!({})),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// A block passes iff its signers are distinct and meet the quorum.
        #[test]
        fn block_quorum_counts_distinct_signers(
            signers in prop::collection::vec(1u16..8, 0..6),
            min_signatures in 0usize..6,
        ) {
            let policy = quorum_policy(min_signatures, 5);
            let blk = to_json(&block(&signers, Vec::new(), false));

            let distinct: HashSet<u16> = signers.iter().copied().collect();
            let expected = distinct.len() == signers.len() && distinct.len() >= min_signatures;
            prop_assert_eq!(validate_block_schema(&blk, &policy, false).is_ok(), expected);
        }

        /// Repeating a signer never turns a short quorum into a passing one.
        #[test]
        fn repeated_signer_never_rescues_quorum(
            signers in prop::collection::btree_set(1u16..50, 1..5),
            pick in any::<Index>(),
        ) {
            let mut signers: Vec<u16> = signers.into_iter().collect();
            let policy = quorum_policy(signers.len() + 1, 10);

            let before = validate_block_schema(&to_json(&block(&signers, Vec::new(), true)), &policy, true);
            prop_assert_eq!(before.unwrap_err().kind(), SchemaErrorKind::Quorum);

            let repeat = signers[pick.index(signers.len())];
            signers.push(repeat);
            let after = validate_block_schema(&to_json(&block(&signers, Vec::new(), true)), &policy, true);
            prop_assert_eq!(after.unwrap_err().kind(), SchemaErrorKind::DuplicateSigner);
        }

        /// The forger signing its own block fails whatever else is present.
        #[test]
        fn forger_endorsement_always_rejected(
            signers in prop::collection::btree_set(1u16..50, 0..4),
            position in any::<Index>(),
            min_signatures in 0usize..4,
        ) {
            let mut signers: Vec<u16> = signers.into_iter().collect();
            let at = position.index(signers.len() + 1);
            signers.insert(at, FORGER);

            let policy = quorum_policy(min_signatures, 10);
            let blk = to_json(&block(&signers, Vec::new(), true));
            prop_assert_eq!(
                validate_block_schema(&blk, &policy, true).unwrap_err().kind(),
                SchemaErrorKind::SelfSignature
            );
        }

        /// Same input, same verdict, same error.
        #[test]
        fn validation_is_idempotent(
            field in prop::sample::select(vec![
                "id", "type", "senderAddress", "fee", "timestamp", "message",
                "recipientAddress", "amount", "sigPublicKey", "nextSigKeyIndex",
                "senderSignature", "unrelated",
            ]),
            replacement in any_json(),
            full_check in any::<bool>(),
        ) {
            let policy = test_policy();
            let tx = with_field(to_json(&transfer(full_check)), field, replacement);
            let first = validate_transaction_schema(&tx, &policy, full_check);
            let second = validate_transaction_schema(&tx, &policy, full_check);
            prop_assert_eq!(first, second);
        }

        /// The accepted property set of every kind is exactly the envelope
        /// plus that kind's extras; anything else fails on the allow-list.
        #[test]
        fn allow_list_is_envelope_plus_kind_extras(
            kind in prop::sample::select(TransactionType::ALL.to_vec()),
            extra in "[a-zA-Z]{1,16}",
            value in any_json(),
        ) {
            let policy = test_policy();
            let tx = to_json(&transaction(payload_for(kind), single_signature(true)));

            let mut canonical: HashSet<&str> = BASE_TRANSACTION_PROPERTIES.iter().copied().collect();
            canonical.extend(kind.extra_properties().iter().copied());
            canonical.extend(SIG_TRANSACTION_PROPERTIES.iter().copied());
            canonical.insert("senderSignature");

            let keys: HashSet<&str> = tx
                .as_object()
                .map(Packet::keys)
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            prop_assert_eq!(&keys, &canonical);
            prop_assert!(validate_transaction_schema(&tx, &policy, true).is_ok());

            prop_assume!(!canonical.contains(extra.as_str()));
            let tampered = with_field(tx, &extra, value);
            prop_assert_eq!(
                validate_transaction_schema(&tampered, &policy, true).unwrap_err().kind(),
                SchemaErrorKind::UnexpectedProperty
            );
        }

        /// Members in [min, max] and required count in [1, members].
        #[test]
        fn multisig_registration_bounds(
            member_count in 0usize..8,
            required in 0u64..9,
        ) {
            let policy = test_policy();
            let payload = TransactionPayload::RegisterMultisigWallet(MultisigWalletDetails {
                member_addresses: (0..member_count as u16).map(|i| wallet_address(100 + i)).collect(),
                required_signature_count: required,
            });
            let tx = to_json(&transaction(payload, single_signature(true)));

            let members_ok = (policy.min_multisig_members..=policy.max_multisig_members)
                .contains(&member_count);
            let required_ok = required >= 1 && required as usize <= member_count;
            prop_assert_eq!(
                validate_transaction_schema(&tx, &policy, true).is_ok(),
                members_ok && required_ok
            );
        }

        /// Addresses are exactly 64 hex characters after the symbol.
        #[test]
        fn wallet_address_length_tracks_symbol(
            symbol in "[a-z]{1,8}",
            body in "[0-9a-f]{64}",
            grow in any::<bool>(),
        ) {
            let address = format!("{symbol}{body}");
            let mut packet = Packet::new();
            packet.insert("a".to_string(), json!(address));
            prop_assert!(validate_wallet_address(&packet, "a", &symbol).is_ok());

            let mut mutated = address.clone();
            if grow {
                mutated.push('0');
            } else {
                mutated.pop();
            }
            packet.insert("a".to_string(), json!(mutated));
            prop_assert_eq!(
                validate_wallet_address(&packet, "a", &symbol).unwrap_err().kind(),
                SchemaErrorKind::FieldLength
            );
        }
    }
}
