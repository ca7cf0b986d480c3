/// Property tests for the substitution cipher.
use labbook::labs::cipher::SubstitutionKey;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_decode_inverts_encode(msg in "[ -~]{0,80}", seed in any::<u64>()) {
        let key = SubstitutionKey::random(Some(seed));
        prop_assert_eq!(key.decode(&key.encode(&msg)), msg);
    }

    #[test]
    fn prop_encode_preserves_shape(msg in "[ -~]{0,80}", seed in any::<u64>()) {
        let key = SubstitutionKey::random(Some(seed));
        let out = key.encode(&msg);
        prop_assert_eq!(out.len(), msg.len());
        for (a, b) in msg.chars().zip(out.chars()) {
            prop_assert_eq!(a.is_ascii_uppercase(), b.is_ascii_uppercase());
            prop_assert_eq!(a.is_ascii_lowercase(), b.is_ascii_lowercase());
            if !a.is_ascii_alphabetic() {
                prop_assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn prop_key_display_parses_back(seed in any::<u64>()) {
        let key = SubstitutionKey::random(Some(seed));
        let parsed: SubstitutionKey = key.to_string().parse().unwrap();
        prop_assert_eq!(parsed, key);
    }
}
