//! XOR checksum

/// Running XOR of all bytes, seeded with the first one. Empty input yields 0.
pub fn checksum(data: &[u8]) -> u8 {
    fold(data.iter().copied())
}

/// Checksum over `data` leaving out the byte at `skip`.
///
/// `skip` past the end of `data` leaves out nothing.
pub fn checksum_skipping(data: &[u8], skip: usize) -> u8 {
    fold(
        data.iter()
            .enumerate()
            .filter(|&(i, _)| i != skip)
            .map(|(_, &b)| b),
    )
}

pub fn verify_checksum(data: &[u8], expected: u8) -> bool {
    checksum(data) == expected
}

fn fold(mut bytes: impl Iterator<Item = u8>) -> u8 {
    match bytes.next() {
        Some(first) => bytes.fold(first, |csum, b| csum ^ b),
        None => 0,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_values() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x05]), 0x05);
        assert_eq!(checksum(&[0x0F, 0xF0]), 0xFF);
        assert_eq!(checksum(&[0x01, 0x02, 0x03]), 0x00);
    }

    #[test]
    fn skipping() {
        assert_eq!(checksum_skipping(&[0x34, 0x12, 0xAA], 2), 0x34 ^ 0x12);
        assert_eq!(checksum_skipping(&[0xAA, 0x34, 0x12], 0), 0x34 ^ 0x12);
        assert_eq!(checksum_skipping(&[0x07], 0), 0);
        assert_eq!(checksum_skipping(&[0x01, 0x02], 5), 0x03);
    }

    #[test]
    fn verify() {
        assert!(verify_checksum(&[0x0F, 0xF0], 0xFF));
        assert!(!verify_checksum(&[0x0F, 0xF0], 0xFE));
        assert!(verify_checksum(&[], 0));
    }

    proptest! {
        #[test]
        fn order_independent(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut reversed = data.clone();
            reversed.reverse();
            prop_assert_eq!(checksum(&reversed), checksum(&data));
        }

        #[test]
        fn appending_checksum_cancels(data in proptest::collection::vec(any::<u8>(), 1..64)) {
            let mut framed = data.clone();
            framed.push(checksum(&data));
            prop_assert_eq!(checksum(&framed), 0);
        }
    }
}
