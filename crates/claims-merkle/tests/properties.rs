use claims_merkle::{
    hash_pair, verify_record, Address, MerkleTree, Proof, Record, Weight, EMPTY_HASH, H256,
};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = Record> {
    (any::<[u8; 20]>(), any::<Option<u128>>()).prop_map(|(owner, weight)| Record {
        owner: Address(owner),
        weight: weight.map(Weight),
    })
}

fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 1..64)
}

proptest! {
    #[test]
    fn building_twice_is_deterministic(records in records_strategy()) {
        let a = MerkleTree::from_records(&records).unwrap();
        let b = MerkleTree::from_records(&records).unwrap();
        prop_assert_eq!(a.root(), b.root());
        prop_assert_eq!(a.proofs(), b.proofs());
    }

    #[test]
    fn every_proof_verifies(records in records_strategy()) {
        let tree = MerkleTree::from_records(&records).unwrap();
        for (record, proof) in records.iter().zip(tree.proofs()) {
            prop_assert!(verify_record(record, &proof, tree.root()));
        }
    }

    #[test]
    fn flipping_an_address_bit_breaks_the_proof(
        records in records_strategy(),
        pick in any::<prop::sample::Index>(),
        bit in 0usize..160,
    ) {
        let tree = MerkleTree::from_records(&records).unwrap();
        let i = pick.index(records.len());
        let proof = tree.proof(i).unwrap();
        let mut tampered = records[i];
        tampered.owner.0[bit / 8] ^= 0x80 >> (bit % 8);
        prop_assert!(!verify_record(&tampered, &proof, tree.root()));
    }

    #[test]
    fn flipping_a_weight_bit_breaks_the_proof(
        records in records_strategy(),
        pick in any::<prop::sample::Index>(),
        bit in 0u32..128,
    ) {
        let tree = MerkleTree::from_records(&records).unwrap();
        let i = pick.index(records.len());
        let proof = tree.proof(i).unwrap();
        let mut tampered = records[i];
        // A membership-only record gains a weight instead.
        tampered.weight = Some(Weight(tampered.weight.map_or(0, Weight::get) ^ (1u128 << bit)));
        prop_assert!(!verify_record(&tampered, &proof, tree.root()));
    }

    #[test]
    fn flipping_a_proof_bit_breaks_the_proof(
        records in prop::collection::vec(record_strategy(), 2..64),
        pick in any::<prop::sample::Index>(),
        level in any::<prop::sample::Index>(),
        bit in 0usize..256,
    ) {
        let tree = MerkleTree::from_records(&records).unwrap();
        let i = pick.index(records.len());
        let mut siblings = tree.proof(i).unwrap().into_inner();
        let j = level.index(siblings.len());
        siblings[j] = siblings[j].with_flipped_bit(bit);
        prop_assert!(!verify_record(&records[i], &Proof::new(siblings), tree.root()));
    }

    #[test]
    fn pair_hash_is_symmetric(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (H256(a), H256(b));
        prop_assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
    }

    #[test]
    fn odd_levels_are_padded_with_empty_hash(records in records_strategy()) {
        let tree = MerkleTree::from_records(&records).unwrap();
        let levels = tree.levels();
        for level in &levels[..levels.len() - 1] {
            prop_assert_eq!(level.len() % 2, 0);
        }
        let padded = records.len() % 2 == 1 && records.len() > 1;
        prop_assert_eq!(levels[0].last() == Some(&EMPTY_HASH), padded);
    }
}
